use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TodoError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// Listing failed; reported with its own client-facing message.
    #[error("Failed to fetch todo: {0}")]
    FetchFailed(String),
}

pub type TodoResult<T> = Result<T, TodoError>;

/// Convert TodoError to AppError for standardized error responses
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::Validation(msg) => AppError::BadRequest(msg),
            TodoError::Storage(cause) => AppError::Database {
                message: "Database error occurred".to_string(),
                cause,
            },
            TodoError::FetchFailed(cause) => AppError::Database {
                message: "Failed to fetch todo".to_string(),
                cause,
            },
        }
    }
}

impl IntoResponse for TodoError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for TodoError {
    fn from(err: mongodb::error::Error) -> Self {
        TodoError::Storage(err.to_string())
    }
}
