use thiserror::Error;
use tokio_postgres::error::SqlState;

use crate::models::response::{ApiResponse, ResponseBody};

/// Body message for failures before the query runs (secret, driver, connection).
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing the request.";

/// Body message for failures while building or running the search query.
pub const SEARCH_ERROR_MESSAGE: &str = "An error occurred while processing the search request.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Malformed event: {0}")]
    Event(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Secret error: {0}")]
    Secret(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn secret(message: impl Into<String>) -> Self {
        Self::Secret(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Whether the failure belongs to the search query rather than request setup.
    pub fn is_search_failure(&self) -> bool {
        matches!(self, ApiError::Validation(_) | ApiError::Database(_))
    }

    /// Converts the error into the 500 envelope returned to the caller.
    /// Internal detail is logged here and never copied into the body.
    pub fn into_response(self) -> ApiResponse {
        match self {
            ApiError::Validation(ref message) => {
                tracing::warn!("Rejected search parameters: {}", message);
            }
            ApiError::Database(ref message) => {
                tracing::error!("Search query failed: {}", message);
            }
            ApiError::Secret(ref message) => {
                tracing::error!("Failed to resolve database credentials: {}", message);
            }
            ApiError::Connection(ref message) => {
                tracing::error!("PostgreSQL connection issue: {}", message);
            }
            ApiError::Config(ref message) => {
                tracing::error!("Configuration error: {}", message);
            }
            ApiError::Event(ref message) => {
                tracing::error!("Malformed event reached response mapping: {}", message);
            }
        }

        let message = if self.is_search_failure() {
            SEARCH_ERROR_MESSAGE
        } else {
            GENERIC_ERROR_MESSAGE
        };

        ApiResponse::json(500, &ResponseBody::error(message))
    }
}

// PostgreSQL error mapping for query execution
impl From<tokio_postgres::Error> for ApiError {
    fn from(err: tokio_postgres::Error) -> Self {
        match err.code() {
            Some(&SqlState::UNDEFINED_TABLE) | Some(&SqlState::UNDEFINED_COLUMN) => {
                tracing::error!("PostgreSQL schema mismatch: {}", err);
                ApiError::Database("Blog post table or column is missing".to_string())
            }
            Some(&SqlState::INVALID_TEXT_REPRESENTATION)
            | Some(&SqlState::NUMERIC_VALUE_OUT_OF_RANGE)
            | Some(&SqlState::INVALID_ROW_COUNT_IN_LIMIT_CLAUSE)
            | Some(&SqlState::INVALID_ROW_COUNT_IN_RESULT_OFFSET_CLAUSE) => {
                tracing::warn!("PostgreSQL rejected search parameters: {}", err);
                ApiError::Database("Invalid search parameter value".to_string())
            }
            Some(&SqlState::CONNECTION_EXCEPTION)
            | Some(&SqlState::CONNECTION_DOES_NOT_EXIST)
            | Some(&SqlState::CONNECTION_FAILURE) => {
                tracing::error!("PostgreSQL connection error during query: {}", err);
                ApiError::Database("Database connection lost".to_string())
            }
            Some(&SqlState::INSUFFICIENT_PRIVILEGE) => {
                tracing::error!("PostgreSQL privilege error: {}", err);
                ApiError::Database("Database access denied".to_string())
            }
            _ => {
                tracing::error!("Unhandled PostgreSQL error: {} (code: {:?})", err, err.code());
                ApiError::Database("Database operation failed".to_string())
            }
        }
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn body_of(response: &ApiResponse) -> Value {
        serde_json::from_str(&response.body).expect("error body should be JSON")
    }

    #[test]
    fn test_search_failures_use_search_message() {
        for err in [
            ApiError::validation("limit is not a number"),
            ApiError::Database("syntax error".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status_code, 500);
            assert_eq!(body_of(&response), json!({ "error": SEARCH_ERROR_MESSAGE }));
        }
    }

    #[test]
    fn test_setup_failures_use_generic_message() {
        for err in [
            ApiError::secret("access denied"),
            ApiError::connection("connection refused"),
            ApiError::Config("bad url".to_string()),
        ] {
            let response = err.into_response();
            assert_eq!(response.status_code, 500);
            assert_eq!(body_of(&response), json!({ "error": GENERIC_ERROR_MESSAGE }));
        }
    }

    #[test]
    fn test_error_body_hides_internal_detail() {
        let response = ApiError::Database("relation \"blog_page.blog_post\" does not exist".to_string())
            .into_response();
        assert!(!response.body.contains("blog_page"));
        assert!(!response.is_base64_encoded);
    }
}
