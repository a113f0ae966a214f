//! `/operations` endpoints.
//!
//! `create_operation` always carries a nonce: the caller's, or a fresh v4
//! UUID. The server deduplicates on it, which is what keeps transport-level
//! retries from creating the same purchase twice. Callers needing
//! exactly-once semantics across process restarts should persist and pass
//! their own nonce.

use serde::Serialize;
use uuid::Uuid;

use crate::client::{push_clamped, UdsClient, UdsCore, MAX_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest};
use crate::transport::Transport;
use crate::types::{
    CalcOperationRequest, CalcOperationResponse, CalcReceipt, CashierExternal,
    CreateOperationRequest, Operation, OperationPage, Receipt, RewardRequest, RewardResponse,
    SelectorFields,
};

#[derive(Serialize)]
struct CreateOperationBody<'a> {
    #[serde(flatten)]
    customer: SelectorFields<'a>,
    nonce: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cashier: Option<&'a CashierExternal>,
    receipt: &'a Receipt,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [i64]>,
}

#[derive(Serialize)]
struct CalcOperationBody<'a> {
    #[serde(flatten)]
    customer: SelectorFields<'a>,
    receipt: &'a CalcReceipt,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefundBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    partial_amount: Option<f64>,
}

impl UdsCore {
    /// `cursor` is the opaque token from the previous page; `max` is clamped
    /// to 1..=50.
    pub fn build_list_operations(&self, max: Option<u32>, cursor: Option<&str>) -> HttpRequest {
        let mut request = self.request(HttpMethod::Get, "operations");
        push_clamped(&mut request, "max", max, MAX_PAGE_SIZE);
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            request
                .query
                .push(("cursor".to_string(), cursor.to_string()));
        }
        request
    }

    pub fn build_create_operation(&self, operation: &CreateOperationRequest) -> Result<HttpRequest> {
        let nonce = match operation.nonce.as_deref() {
            Some(nonce) if !nonce.is_empty() => nonce.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        let body = CreateOperationBody {
            customer: operation.customer.fields(),
            nonce,
            cashier: operation.cashier.as_ref(),
            receipt: &operation.receipt,
            tags: operation.tags.as_deref(),
        };
        self.json_request(HttpMethod::Post, "operations", &body)
    }

    pub fn build_get_operation(&self, id: i64) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("operations/{id}"))
    }

    /// Refund `partial_amount`, or the whole operation when `None`.
    ///
    /// A present amount must be finite and positive; otherwise no request is
    /// built. The upper bound (the original total) is enforced by the server.
    pub fn build_refund_operation(&self, id: i64, partial_amount: Option<f64>) -> Result<HttpRequest> {
        if let Some(amount) = partial_amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "refund amount must be positive, got {amount}"
                )));
            }
        }
        self.json_request(
            HttpMethod::Post,
            &format!("operations/{id}/refund"),
            &RefundBody { partial_amount },
        )
    }

    pub fn build_calc_operation(&self, calc: &CalcOperationRequest) -> Result<HttpRequest> {
        let body = CalcOperationBody {
            customer: calc.customer.fields(),
            receipt: &calc.receipt,
        };
        self.json_request(HttpMethod::Post, "operations/calc", &body)
    }

    pub fn build_reward_operation(&self, reward: &RewardRequest) -> Result<HttpRequest> {
        self.json_request(HttpMethod::Post, "operations/reward", reward)
    }
}

impl<T: Transport> UdsClient<T> {
    pub fn list_operations(&self, max: Option<u32>, cursor: Option<&str>) -> Result<OperationPage> {
        self.call(self.core().build_list_operations(max, cursor))
    }

    /// Record a purchase.
    ///
    /// Server-side failures include `InvalidChecksum` (totals disagree with
    /// the discount policy), `InsufficientFunds` and `DiscountLimitExceed`.
    pub fn create_operation(&self, operation: &CreateOperationRequest) -> Result<Operation> {
        self.call(self.core().build_create_operation(operation)?)
    }

    pub fn get_operation(&self, id: i64) -> Result<Operation> {
        self.call(self.core().build_get_operation(id))
    }

    /// Returns the reversal operation created by the refund.
    pub fn refund_operation(&self, id: i64, partial_amount: Option<f64>) -> Result<Operation> {
        self.call(self.core().build_refund_operation(id, partial_amount)?)
    }

    /// Compute the discount and points breakdown without recording anything.
    pub fn calc_operation(&self, calc: &CalcOperationRequest) -> Result<CalcOperationResponse> {
        self.call(self.core().build_calc_operation(calc)?)
    }

    pub fn reward_operation(&self, reward: &RewardRequest) -> Result<RewardResponse> {
        self.call(self.core().build_reward_operation(reward)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::*;
    use crate::types::{ActionState, CustomerSelector};

    fn body(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    fn receipt() -> Receipt {
        Receipt {
            total: 1000.0,
            cash: 900.0,
            points: 100.0,
            ..Receipt::default()
        }
    }

    #[test]
    fn list_operations_passes_cursor_verbatim() {
        let req = builder().build_list_operations(Some(100), Some("eyJpZCI6OTAwNX0="));
        assert_eq!(req.path, "http://localhost:3000/operations");
        assert_eq!(req.query_param("max"), Some("50"));
        assert_eq!(req.query_param("cursor"), Some("eyJpZCI6OTAwNX0="));

        let req = builder().build_list_operations(None, Some(""));
        assert!(req.query.is_empty());
    }

    #[test]
    fn create_operation_generates_nonce_when_missing() {
        for nonce in [None, Some(String::new())] {
            let mut request = CreateOperationRequest::new(CustomerSelector::code("456123"), receipt());
            request.nonce = nonce;
            let req = builder().build_create_operation(&request).unwrap();
            let body = body(&req);
            let nonce = body["nonce"].as_str().unwrap();
            assert!(Uuid::parse_str(nonce).is_ok(), "not a uuid: {nonce}");
        }
    }

    #[test]
    fn create_operation_generates_distinct_nonces() {
        let request = CreateOperationRequest::new(CustomerSelector::code("456123"), receipt());
        let a = body(&builder().build_create_operation(&request).unwrap());
        let b = body(&builder().build_create_operation(&request).unwrap());
        assert_ne!(a["nonce"], b["nonce"]);
    }

    #[test]
    fn create_operation_keeps_caller_nonce() {
        let request = CreateOperationRequest::new(CustomerSelector::code("456123"), receipt())
            .with_nonce("order-42");
        let body = body(&builder().build_create_operation(&request).unwrap());
        assert_eq!(body["nonce"], "order-42");
    }

    #[test]
    fn create_operation_body_by_code() {
        let request = CreateOperationRequest::new(CustomerSelector::code("456123"), receipt())
            .with_nonce("n")
            .with_cashier(CashierExternal {
                external_id: "c-7".to_string(),
                name: None,
            })
            .with_tags(vec![1, 2]);
        let req = builder().build_create_operation(&request).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/operations");
        assert_eq!(
            body(&req),
            serde_json::json!({
                "code": "456123",
                "nonce": "n",
                "cashier": {"externalId": "c-7"},
                "receipt": {"total": 1000.0, "cash": 900.0, "points": 100.0},
                "tags": [1, 2]
            })
        );
    }

    #[test]
    fn create_operation_body_by_phone_and_uid() {
        let by_phone = CreateOperationRequest::new(CustomerSelector::phone("+79990000002"), receipt())
            .with_nonce("n");
        let body_phone = body(&builder().build_create_operation(&by_phone).unwrap());
        assert!(body_phone.get("code").is_none());
        assert_eq!(body_phone["participant"], serde_json::json!({"phone": "+79990000002"}));
        assert!(body_phone.get("tags").is_none());

        let by_uid = CreateOperationRequest::new(CustomerSelector::uid("u-1"), receipt());
        let body_uid = body(&builder().build_create_operation(&by_uid).unwrap());
        assert_eq!(body_uid["participant"], serde_json::json!({"uid": "u-1"}));
    }

    #[test]
    fn refund_rejects_non_positive_amounts_before_sending() {
        for amount in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let recorder = Recorder::new(ok("{}"));
            let err = client(&recorder).refund_operation(9001, Some(amount)).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)), "amount {amount}");
            assert!(recorder.requests.borrow().is_empty());
        }
    }

    #[test]
    fn refund_body_is_partial_or_empty() {
        let req = builder().build_refund_operation(9001, Some(250.0)).unwrap();
        assert_eq!(req.path, "http://localhost:3000/operations/9001/refund");
        assert_eq!(body(&req), serde_json::json!({"partialAmount": 250.0}));

        let req = builder().build_refund_operation(9001, None).unwrap();
        assert_eq!(body(&req), serde_json::json!({}));
    }

    #[test]
    fn calc_operation_body() {
        let calc = CalcOperationRequest {
            customer: CustomerSelector::uid("u-1"),
            receipt: CalcReceipt {
                total: 500.0,
                points: Some(20.0),
                ..CalcReceipt::default()
            },
        };
        let req = builder().build_calc_operation(&calc).unwrap();
        assert_eq!(req.path, "http://localhost:3000/operations/calc");
        assert_eq!(
            body(&req),
            serde_json::json!({
                "participant": {"uid": "u-1"},
                "receipt": {"total": 500.0, "points": 20.0}
            })
        );
    }

    #[test]
    fn reward_keeps_negative_points() {
        let reward = RewardRequest {
            points: -15.0,
            comment: None,
            participants: vec![1001, 1002],
            silent: true,
        };
        let req = builder().build_reward_operation(&reward).unwrap();
        assert_eq!(req.path, "http://localhost:3000/operations/reward");
        assert_eq!(
            body(&req),
            serde_json::json!({"points": -15.0, "participants": [1001, 1002], "silent": true})
        );
    }

    #[test]
    fn reversal_origin_only_counts_for_reversals() {
        let recorder = Recorder::new(ok(r#"{
            "id": 9002, "state": "REVERSAL", "points": 50.0, "total": -250.0, "cash": -250.0,
            "origin": {"id": 9001}, "dateCreated": "2024-03-01T12:30:00Z",
            "customer": {"id": 1001, "displayName": "Ivan Petrov"},
            "cashier": null, "branch": {"id": 1, "displayName": "Main"}
        }"#));
        let op = client(&recorder).refund_operation(9001, Some(250.0)).unwrap();
        assert_eq!(op.state, ActionState::Reversal);
        assert_eq!(op.reversal_of(), Some(9001));
        assert!(!op.is_debit());

        let normal: Operation = serde_json::from_str(
            r#"{"id": 1, "state": "NORMAL", "points": -10.0, "origin": {"id": 5}}"#,
        )
        .unwrap();
        assert_eq!(normal.reversal_of(), None);
        assert!(normal.is_debit());
    }

    #[test]
    fn list_operations_parses_cursor_page() {
        let recorder = Recorder::new(ok(
            r#"{"rows":[{"id":1,"state":"NORMAL"},{"id":2,"state":"CANCELED"}],"cursor":"abc"}"#,
        ));
        let page = client(&recorder).list_operations(Some(2), None).unwrap();
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[1].state, ActionState::Canceled);
        assert_eq!(page.cursor.as_deref(), Some("abc"));
    }
}
