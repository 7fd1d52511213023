//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Trackside API                          │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /api/sales                                                        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │  Route Handler                                                   │   │
//! │  │  Result<Json<T>, ApiError>                                       │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Database Error? ─── DbError::QueryFailed("...") ──┐             │   │
//! │  │         │                                          │             │   │
//! │  │         ▼                                          ▼             │   │
//! │  │  Validation Error? ── CoreError::Validation ──── ApiError ─────► │   │
//! │  │         │                                                        │   │
//! │  │         ▼                                                        │   │
//! │  │  Success ──────────────────────────────────────────────────────► │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                                                         │
//! │  ◄──── HTTP status + JSON body ───────────────────────────────────────  │
//! │                                                                         │
//! │  fetch('/api/sales').catch(e => {                                       │
//! │    // status = 404                                                      │
//! │    // body   = { "code": "NOT_FOUND",                                   │
//! │    //            "message": "Customer not found: abc-123" }             │
//! │  })                                                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## HTTP Serialization
//! Every failure leaves the server as a status code plus a JSON body with
//! a machine-readable `code` and a human-readable `message`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use trackside_core::{CoreError, ValidationError};
use trackside_db::DbError;

/// Result type for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from route handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Customer not found: abc-123"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
///
/// Each code maps to exactly one HTTP status, so clients can branch on
/// either the status or the code and get the same answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Missing or invalid credentials (401)
    Unauthorized,

    /// Authenticated but not allowed (403)
    Forbidden,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an unauthorized error (missing or bad credentials).
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a forbidden error with the standard message.
    pub fn forbidden() -> Self {
        ApiError::new(ErrorCode::Forbidden, "Insufficient permissions")
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// HTTP status code for this error.
    pub fn status(&self) -> StatusCode {
        match self.code {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { constraint } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Duplicate value violates '{}'", constraint),
            ),
            DbError::ForeignKeyViolation { constraint } => {
                tracing::error!("Foreign key violation: {}", constraint);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Core(e) => ApiError::from(e),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ServiceNotFound(id) => ApiError::not_found("Service", &id.to_string()),
            CoreError::PackageNotFound(id) => ApiError::not_found("Package", &id.to_string()),
            CoreError::MenuItemNotFound(id) => ApiError::not_found("Menu item", &id.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts validation errors to API errors.
impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_screaming_snake_code() {
        let err = ApiError::not_found("Customer", "abc-123");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Customer not found: abc-123");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::not_found("Sale", "x").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::validation("bad input").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::unauthorized("no token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::internal("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_not_found_maps_to_404() {
        let err: ApiError = DbError::not_found("Task", "t-1").into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Task not found: t-1");
    }

    #[test]
    fn test_unique_violation_maps_to_validation() {
        let err: ApiError = DbError::UniqueViolation {
            constraint: "customers_phone_key".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_core_validation_maps_to_400() {
        let err: ApiError = CoreError::Validation(ValidationError::EmptySale).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_forbidden_uses_standard_message() {
        let err = ApiError::forbidden();
        assert_eq!(err.message, "Insufficient permissions");
    }
}
