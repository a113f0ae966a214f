//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from field-ordering differences.

use serde_json::Value;
use uds_core::{
    ClientConfig, CreateOperationRequest, CustomerSelector, Error, FindCustomerParams,
    FindCustomerResponse, HttpMethod, HttpRequest, HttpResponse, Operation, Receipt, Settings,
    UdsCore,
};

const BASE_URL: &str = "http://localhost:3000";

fn core() -> UdsCore {
    UdsCore::new(&ClientConfig::new("549755813888", "api-key").with_base_url(BASE_URL))
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        other => panic!("unknown method: {other}"),
    }
}

fn parse_selector(value: &Value) -> CustomerSelector {
    let (kind, raw) = value.as_object().unwrap().iter().next().unwrap();
    let raw = raw.as_str().unwrap();
    match kind.as_str() {
        "code" => CustomerSelector::code(raw),
        "phone" => CustomerSelector::phone(raw),
        "uid" => CustomerSelector::uid(raw),
        other => panic!("unknown selector: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|pair| {
            let arr = pair.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");
    if let Some(query) = expected.get("query") {
        assert_eq!(req.query, pairs(query), "{name}: query");
    }
    if let Some(headers) = expected.get("headers") {
        assert_eq!(req.headers, pairs(headers), "{name}: headers");
    }
    match expected.get("body") {
        Some(body) => {
            let actual: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&actual, body, "{name}: body");
        }
        None => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn check_api_code<T: std::fmt::Debug>(name: &str, result: uds_core::Result<T>, expected: &Value) {
    let err = result.unwrap_err();
    let code = err.api_code().unwrap_or_else(|| panic!("{name}: expected API error, got {err}"));
    assert_eq!(code.as_str(), expected.as_str().unwrap(), "{name}: error code");
}

// ---------------------------------------------------------------------------
// Find customer
// ---------------------------------------------------------------------------

#[test]
fn find_customer_test_vectors() {
    let c = core();
    for case in load(include_str!("../../test-vectors/find_customer.json")) {
        let name = case["name"].as_str().unwrap();
        let selector = parse_selector(&case["selector"]);
        let params = case["params"].as_object().map(|p| {
            let mut params = FindCustomerParams::default();
            if p["exchange_code"].as_bool().unwrap_or(false) {
                params = params.with_exchange_code();
            }
            params.total = p["total"].as_f64();
            params.skip_loyalty_total = p["skip_loyalty_total"].as_f64();
            params.unredeemable_total = p["unredeemable_total"].as_f64();
            params
        });

        let req = c.build_find_customer(&selector, params.as_ref());
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse::<FindCustomerResponse>(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_api_code(name, result, expected_error);
        } else {
            let expected: FindCustomerResponse =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Create operation
// ---------------------------------------------------------------------------

#[test]
fn create_operation_test_vectors() {
    let c = core();
    for case in load(include_str!("../../test-vectors/create_operation.json")) {
        let name = case["name"].as_str().unwrap();
        let receipt: Receipt = serde_json::from_value(case["receipt"].clone()).unwrap();
        let input = CreateOperationRequest::new(parse_selector(&case["selector"]), receipt)
            .with_nonce(case["nonce"].as_str().unwrap());

        let req = c.build_create_operation(&input).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse::<Operation>(simulated(&case));
        if let Some(expected_error) = case.get("expected_error") {
            check_api_code(name, result, expected_error);
        } else {
            let expected: Operation = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Refund
// ---------------------------------------------------------------------------

#[test]
fn refund_test_vectors() {
    let c = core();
    for case in load(include_str!("../../test-vectors/refund.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["id"].as_i64().unwrap();
        let amount = case["partial_amount"].as_f64();

        let result = c.build_refund_operation(id, amount);
        match case.get("expected_error") {
            Some(_) => assert!(
                matches!(result, Err(Error::InvalidArgument(_))),
                "{name}: expected InvalidArgument"
            ),
            None => check_request(name, &result.unwrap(), &case["expected_request"]),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn error_test_vectors() {
    let c = core();
    for case in load(include_str!("../../test-vectors/errors.json")) {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];

        let err = c.parse::<Value>(response).unwrap_err();
        match expected["kind"].as_str().unwrap() {
            "Api" => {
                let Error::Api(api) = &err else {
                    panic!("{name}: expected Api, got {err:?}");
                };
                assert_eq!(api.error_code.as_str(), expected["code"].as_str().unwrap(), "{name}: code");
                assert_eq!(err.to_string(), expected["display"].as_str().unwrap(), "{name}: display");
            }
            "HttpStatus" => match err {
                Error::HttpStatus { status, .. } => {
                    assert_eq!(u64::from(status), expected["status"].as_u64().unwrap(), "{name}: status")
                }
                other => panic!("{name}: expected HttpStatus, got {other:?}"),
            },
            other => panic!("{name}: unknown kind: {other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[test]
fn settings_test_vectors() {
    let c = core();
    for case in load(include_str!("../../test-vectors/settings.json")) {
        let name = case["name"].as_str().unwrap();

        let req = c.build_get_settings();
        check_request(name, &req, &case["expected_request"]);

        let settings: Settings = c.parse(simulated(&case)).unwrap();
        let expected: Settings = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(settings, expected, "{name}: parsed result");
    }
}
