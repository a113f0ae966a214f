use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// Error body in the shape the real API returns.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiFailure {
    #[serde(skip)]
    pub status: StatusCode,
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldFailure>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFailure {
    pub error_code: String,
    pub message: String,
    pub field: String,
    pub value: Value,
}

impl ApiFailure {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            error_code: code.to_string(),
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "notFound", message)
    }

    /// A 400 with a single business-rule code.
    pub fn rejected(code: &str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// A `badRequest` pointing at one field.
    pub fn invalid_field(field: &str, value: Value, message: impl Into<String>) -> Self {
        let message = message.into();
        let mut failure = Self::new(StatusCode::BAD_REQUEST, "badRequest", "Validation failed");
        failure.errors.push(FieldFailure {
            error_code: "invalid".to_string(),
            message,
            field: field.to_string(),
            value,
        });
        failure
    }

    pub fn and_field(mut self, field: &str, value: Value, message: impl Into<String>) -> Self {
        self.errors.push(FieldFailure {
            error_code: "invalid".to_string(),
            message: message.into(),
            field: field.to_string(),
            value,
        });
        self
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
