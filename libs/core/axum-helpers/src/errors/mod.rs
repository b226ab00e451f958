pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Standard error response structure.
///
/// Returned for every error response:
/// - `code`: integer error code for logging/monitoring (e.g., 1001)
/// - `error`: machine-readable identifier (e.g., "VALIDATION_ERROR")
/// - `message`: human-readable message
/// - `details`: optional structured details (validation fields, storage cause)
///
/// # JSON Example
///
/// ```json
/// {
///   "code": 1001,
///   "error": "VALIDATION_ERROR",
///   "message": "The title is required",
///   "details": {
///     "title": [{ "code": "length", "message": "The title is required", "params": {} }]
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier for programmatic handling
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// Storage failure; `message` is client-facing, `cause` is the driver error.
    #[error("{message}: {cause}")]
    Database { message: String, cause: String },
}

/// Picks the first human-readable message out of a set of validation errors.
///
/// Falls back to the generic validation message when no rule carries one.
pub fn validation_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .find_map(|err| err.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| ErrorCode::ValidationError.default_message().to_string())
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, details, code) = match self {
            AppError::InvalidJson(msg) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidJson.code(),
                    "Invalid JSON body: {}",
                    msg
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidJson.default_message().to_string(),
                    Some(serde_json::json!({ "error": msg })),
                    ErrorCode::InvalidJson,
                )
            }
            AppError::Validation(e) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Validation error: {:?}",
                    e
                );
                (
                    StatusCode::BAD_REQUEST,
                    validation_message(&e),
                    Some(serde_json::to_value(&e).unwrap_or(serde_json::Value::Null)),
                    ErrorCode::ValidationError,
                )
            }
            AppError::InvalidId(id) => {
                tracing::info!(
                    error_code = ErrorCode::InvalidId.code(),
                    id = %id,
                    "Invalid identifier"
                );
                (
                    StatusCode::BAD_REQUEST,
                    ErrorCode::InvalidId.default_message().to_string(),
                    Some(serde_json::json!({ "id": id })),
                    ErrorCode::InvalidId,
                )
            }
            AppError::BadRequest(msg) => {
                tracing::info!(
                    error_code = ErrorCode::ValidationError.code(),
                    "Bad request: {}",
                    msg
                );
                (StatusCode::BAD_REQUEST, msg, None, ErrorCode::ValidationError)
            }
            AppError::Database { message, cause } => {
                tracing::error!(
                    error_code = ErrorCode::DatabaseError.code(),
                    cause = %cause,
                    "{}",
                    message
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message,
                    Some(serde_json::json!({ "error": cause })),
                    ErrorCode::DatabaseError,
                )
            }
        };

        error_response_with_details(status, message, code, details)
    }
}

/// Helper function to create error responses.
///
/// # Example
///
/// ```rust,ignore
/// use axum_helpers::errors::{error_response, ErrorCode};
/// use axum::http::StatusCode;
///
/// let response = error_response(
///     StatusCode::BAD_REQUEST,
///     "Invalid input".to_string(),
///     ErrorCode::ValidationError,
/// );
/// ```
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    error_response_with_details(status, message, error_code, None)
}

fn error_response_with_details(
    status: StatusCode,
    message: String,
    error_code: ErrorCode,
    details: Option<serde_json::Value>,
) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details,
    });

    (status, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use validator::Validate;

    #[derive(Deserialize, Validate)]
    struct Titled {
        #[validate(length(min = 1, message = "The title is required"))]
        title: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_validation_message_uses_rule_message() {
        let errors = Titled { title: String::new() }.validate().unwrap_err();
        assert_eq!(validation_message(&errors), "The title is required");
    }

    #[tokio::test]
    async fn test_validation_error_response() {
        let errors = Titled { title: String::new() }.validate().unwrap_err();
        let response = AppError::from(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1001);
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "The title is required");
        assert!(body["details"]["title"].is_array());
    }

    #[tokio::test]
    async fn test_database_error_response_carries_cause() {
        let response = AppError::Database {
            message: "Failed to fetch todo".to_string(),
            cause: "connection refused".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "Failed to fetch todo");
        assert_eq!(body["details"]["error"], "connection refused");
    }

    #[tokio::test]
    async fn test_bad_request_uses_given_message() {
        let response = AppError::BadRequest("The title is required".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(body["message"], "The title is required");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_invalid_id_response() {
        let response = AppError::InvalidId("nope".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], 1002);
        assert_eq!(body["details"]["id"], "nope");
    }

    #[tokio::test]
    async fn test_error_response_omits_empty_details() {
        let response = error_response(
            StatusCode::NOT_FOUND,
            "gone".to_string(),
            ErrorCode::NotFound,
        );
        let body = body_json(response).await;
        assert!(body.get("details").is_none());
        assert_eq!(body["message"], "gone");
    }
}
