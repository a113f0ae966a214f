//! Error types for the loyalty API client.
//!
//! # Design
//! Two channels never mix. A non-2xx response whose body is a structured
//! error payload becomes `Error::Api`; connectivity and timeout failures
//! surface as `Error::Transport` once the retry budget is spent. Callers
//! should branch on `ErrorCode`, not on the message, which is localized by
//! the server.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `UdsCore` and `UdsClient`.
#[derive(Debug, Error)]
pub enum Error {
    /// The server rejected the request with a structured error body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The server returned a non-2xx status without a parseable error body.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The request never produced a response, even after retrying.
    #[error("transport error: {0}")]
    Transport(#[from] ureq::Error),

    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),

    /// A client-side precondition failed; no request was issued.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// The API error code, if this error came from the server.
    pub fn api_code(&self) -> Option<&ErrorCode> {
        match self {
            Error::Api(err) => Some(&err.error_code),
            _ => None,
        }
    }
}

/// Machine-readable error codes returned by the API.
///
/// Unknown codes are preserved in `Other` so they still display and compare.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// No customer matches the code, phone or id (or the code expired).
    NotFound,
    /// Validation failed; see `ApiError::errors` for the offending fields.
    BadRequest,
    Forbidden,
    /// `cash`, `points` and `total` do not agree with the discount policy.
    InvalidChecksum,
    /// Requested points exceed the customer's balance.
    InsufficientFunds,
    /// The points/total ratio exceeds the company's cap.
    DiscountLimitExceed,
    /// Wrong company id or API key.
    Unauthorized,
    /// Points may only be withdrawn with a payment code, not uid or phone.
    WithdrawNotPermitted,
    PurchaseByPhoneDisabled,
    GoodsNodeIndexInvalid,
    GoodsLimitIsReached,
    ParticipantIsBlocked,
    Other(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::NotFound => "notFound",
            ErrorCode::BadRequest => "badRequest",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::InvalidChecksum => "invalidChecksum",
            ErrorCode::InsufficientFunds => "insufficientFunds",
            ErrorCode::DiscountLimitExceed => "discountLimitExceed",
            ErrorCode::Unauthorized => "unauthorized",
            ErrorCode::WithdrawNotPermitted => "withdrawNotPermitted",
            ErrorCode::PurchaseByPhoneDisabled => "purchaseByPhoneDisabled",
            ErrorCode::GoodsNodeIndexInvalid => "goods.nodeIndex.invalid",
            ErrorCode::GoodsLimitIsReached => "goods.limitIsReached",
            ErrorCode::ParticipantIsBlocked => "participantIsBlocked",
            ErrorCode::Other(code) => code,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "notFound" => ErrorCode::NotFound,
            "badRequest" => ErrorCode::BadRequest,
            "forbidden" => ErrorCode::Forbidden,
            "invalidChecksum" => ErrorCode::InvalidChecksum,
            "insufficientFunds" => ErrorCode::InsufficientFunds,
            "discountLimitExceed" => ErrorCode::DiscountLimitExceed,
            "unauthorized" => ErrorCode::Unauthorized,
            "withdrawNotPermitted" => ErrorCode::WithdrawNotPermitted,
            "purchaseByPhoneDisabled" => ErrorCode::PurchaseByPhoneDisabled,
            "goods.nodeIndex.invalid" => ErrorCode::GoodsNodeIndexInvalid,
            "goods.limitIsReached" => ErrorCode::GoodsLimitIsReached,
            "participantIsBlocked" => ErrorCode::ParticipantIsBlocked,
            _ => ErrorCode::Other(code),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error payload returned by the API for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error_code: ErrorCode,
    #[serde(default)]
    pub message: String,
    /// Field-level details, only populated for `ErrorCode::BadRequest`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

/// A single validation failure inside a bad-request error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldError {
    pub error_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]: {}", self.error_code, self.message)?;
        if self.error_code != ErrorCode::BadRequest {
            return Ok(());
        }
        for err in &self.errors {
            write!(f, "\n[{}]: {}", err.error_code, err.message)?;
            if let Some(field) = err.field.as_deref().filter(|f| !f.is_empty()) {
                write!(f, "; field '{field}', value: ")?;
                match &err.value {
                    Some(serde_json::Value::String(s)) => f.write_str(s)?,
                    Some(value) => write!(f, "{value}")?,
                    None => f.write_str("null")?,
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_variants() {
        let err: ApiError =
            serde_json::from_str(r#"{"errorCode":"goods.limitIsReached","message":"limit"}"#).unwrap();
        assert_eq!(err.error_code, ErrorCode::GoodsLimitIsReached);
        assert!(err.errors.is_empty());
    }

    #[test]
    fn unknown_code_is_preserved() {
        let err: ApiError =
            serde_json::from_str(r#"{"errorCode":"somethingNew","message":"?"}"#).unwrap();
        assert_eq!(err.error_code, ErrorCode::Other("somethingNew".to_string()));
        assert_eq!(err.to_string(), "[somethingNew]: ?");
        let back = serde_json::to_value(&err).unwrap();
        assert_eq!(back["errorCode"], "somethingNew");
    }

    #[test]
    fn plain_error_formats_code_and_message() {
        let err = ApiError {
            error_code: ErrorCode::InsufficientFunds,
            message: "Not enough points".to_string(),
            errors: Vec::new(),
        };
        assert_eq!(err.to_string(), "[insufficientFunds]: Not enough points");
    }

    #[test]
    fn bad_request_lists_every_field() {
        let body = r#"{
            "errorCode": "badRequest",
            "message": "Validation failed",
            "errors": [
                {"errorCode": "range", "message": "too big", "field": "max", "value": 100},
                {"errorCode": "pattern", "message": "bad phone", "field": "phone", "value": "+7"},
                {"errorCode": "generic", "message": "no field"}
            ]
        }"#;
        let err: ApiError = serde_json::from_str(body).unwrap();
        let text = err.to_string();
        assert_eq!(
            text,
            "[badRequest]: Validation failed\n\
             [range]: too big; field 'max', value: 100\n\
             [pattern]: bad phone; field 'phone', value: +7\n\
             [generic]: no field"
        );
    }

    #[test]
    fn field_errors_ignored_for_other_codes() {
        let err = ApiError {
            error_code: ErrorCode::Forbidden,
            message: "denied".to_string(),
            errors: vec![FieldError {
                error_code: "x".to_string(),
                message: "y".to_string(),
                field: Some("z".to_string()),
                value: None,
            }],
        };
        assert_eq!(err.to_string(), "[forbidden]: denied");
    }

    #[test]
    fn api_code_only_for_api_errors() {
        let err = Error::from(ApiError {
            error_code: ErrorCode::NotFound,
            message: String::new(),
            errors: Vec::new(),
        });
        assert_eq!(err.api_code(), Some(&ErrorCode::NotFound));
        assert!(Error::InvalidArgument("x".into()).api_code().is_none());
    }
}
