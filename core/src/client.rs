//! Request builder, response parser, and the blocking client on top of them.
//!
//! # Design
//! `UdsCore` holds the base URL and the default headers and carries no
//! mutable state between calls. Each endpoint has a `build_*` method that
//! produces an `HttpRequest`; every response goes through `parse`. The
//! endpoint methods live next to their DTOs in `customers`, `operations`,
//! `goods_orders` and `settings`.
//!
//! `UdsClient` pairs a `UdsCore` with a `Transport` and exposes one blocking
//! method per endpoint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

pub(crate) const MAX_PAGE_SIZE: u32 = 50;
pub(crate) const MAX_OFFSET: u32 = 10_000;

/// Stateless request builder and response parser for the loyalty API.
#[derive(Debug, Clone)]
pub struct UdsCore {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl UdsCore {
    pub fn new(config: &ClientConfig) -> Self {
        let credentials = STANDARD.encode(format!("{}:{}", config.company_id, config.api_key));
        let headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Accept-Charset".to_string(), "utf-8".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("Accept-Language".to_string(), config.accept_language.clone()),
            ("Authorization".to_string(), format!("Basic {credentials}")),
        ];
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}/{path}", self.base_url),
            query: Vec::new(),
            headers: self.headers.clone(),
            body: None,
        }
    }

    pub(crate) fn json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest> {
        let body = serde_json::to_string(body).map_err(Error::Serialization)?;
        let mut request = self.request(method, path);
        request.body = Some(body);
        Ok(request)
    }

    /// Decode a 2xx body into `T`, or map the failure.
    ///
    /// Non-2xx bodies that carry an API error payload become `Error::Api`;
    /// anything else becomes `Error::HttpStatus` with the raw body.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T> {
        if !response.is_success() {
            return Err(map_error(response));
        }
        serde_json::from_str(&response.body).map_err(Error::Deserialization)
    }
}

fn map_error(response: HttpResponse) -> Error {
    match serde_json::from_str::<ApiError>(&response.body) {
        Ok(api_error) => Error::Api(api_error),
        Err(_) => Error::HttpStatus {
            status: response.status,
            body: response.body,
        },
    }
}

/// Append `key=value` when `value` is present and positive, clamped to
/// `1..=ceiling`. Zero means "server default" and is omitted.
pub(crate) fn push_clamped(request: &mut HttpRequest, key: &str, value: Option<u32>, ceiling: u32) {
    if let Some(value) = value.filter(|v| *v > 0) {
        request
            .query
            .push((key.to_string(), value.clamp(1, ceiling).to_string()));
    }
}

/// Append `key=amount` when `amount` is present and positive.
pub(crate) fn push_amount(request: &mut HttpRequest, key: &str, amount: Option<f64>) {
    if let Some(amount) = amount.filter(|a| *a > 0.0) {
        request.query.push((key.to_string(), amount.to_string()));
    }
}

/// Blocking client for the loyalty API.
///
/// Holds no mutable state; share it across threads if the transport allows.
#[derive(Debug, Clone)]
pub struct UdsClient<T = UreqTransport> {
    core: UdsCore,
    transport: T,
}

impl UdsClient<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(&config, transport)
    }
}

impl<T: Transport> UdsClient<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            core: UdsCore::new(config),
            transport,
        }
    }

    pub fn core(&self) -> &UdsCore {
        &self.core
    }

    pub(crate) fn call<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        debug!(method = request.method.as_str(), path = %request.path, "calling loyalty API");
        let response = self.transport.execute(&request)?;
        self.core.parse(response).inspect_err(|err| {
            if let Some(code) = err.api_code() {
                warn!(path = %request.path, code = %code, "loyalty API rejected request");
            }
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    pub const BASE_URL: &str = "http://localhost:3000";

    pub fn config() -> ClientConfig {
        ClientConfig::new("549755813888", "api-key").with_base_url(BASE_URL)
    }

    pub fn builder() -> UdsCore {
        UdsCore::new(&config())
    }

    pub fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    /// Records requests and answers each with a canned response.
    pub struct Recorder {
        pub requests: RefCell<Vec<HttpRequest>>,
        response: HttpResponse,
    }

    impl Recorder {
        pub fn new(response: HttpResponse) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                response,
            }
        }

        pub fn last(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            Ok(self.response.clone())
        }
    }

    pub fn client(recorder: &Recorder) -> UdsClient<&Recorder> {
        UdsClient::with_transport(&config(), recorder)
    }
}
