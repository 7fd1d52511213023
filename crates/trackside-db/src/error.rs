//! # Database Error Types
//!
//! Error types for database operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL Error (sqlx::Error)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in trackside-api) ← Serialized as {code, message} JSON       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Client displays user-friendly message                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use trackside_core::CoreError;

/// Database operation errors.
///
/// These errors wrap sqlx errors and provide additional context
/// for debugging and user feedback.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - `fetch_one` returns no rows
    /// - ID doesn't exist
    /// - Record soft-disabled and excluded by the query
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: String,
        id: String,
    },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate customer phone
    /// - Sale number collision under concurrent checkout
    /// - Any UNIQUE index violation (Postgres error 23505)
    #[error("Duplicate value violates constraint '{constraint}'")]
    UniqueViolation {
        constraint: String,
    },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent staff_id
    /// - Deleting a row another table still points at (Postgres error 23503)
    #[error("Foreign key violation on constraint '{constraint}'")]
    ForeignKeyViolation {
        constraint: String,
    },

    /// Database connection failed.
    ///
    /// ## When This Occurs
    /// - PostgreSQL is unreachable
    /// - Bad credentials in DATABASE_URL
    /// - TLS negotiation failure
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    ///
    /// ## When This Occurs
    /// - Invalid SQL in migration
    /// - Migration version conflict
    /// - Schema incompatibility
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    ///
    /// ## When This Occurs
    /// - Runtime SQL error
    /// - Type mismatch between a column and its Rust mapping
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// A pricing or validation rule rejected the input before any write.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// True when this error is a unique violation on the named constraint.
    ///
    /// The sale writer uses this to retry only on sale-number collisions
    /// instead of swallowing every conflict.
    pub fn is_unique_violation(&self, name: &str) -> bool {
        matches!(self, DbError::UniqueViolation { constraint } if constraint == name)
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound     → DbError::NotFound
/// sqlx::Error::Database(23505) → DbError::UniqueViolation
/// sqlx::Error::Database(23503) → DbError::ForeignKeyViolation
/// sqlx::Error::PoolTimedOut    → DbError::PoolExhausted
/// Other                        → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                // Postgres SQLSTATE codes:
                //   23505 = unique_violation
                //   23503 = foreign_key_violation
                let code = db_err.code().map(|c| c.to_string()).unwrap_or_default();
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();

                match code.as_str() {
                    "23505" => DbError::UniqueViolation { constraint },
                    "23503" => DbError::ForeignKeyViolation { constraint },
                    _ => DbError::QueryFailed(db_err.message().to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DbError::not_found("Customer", "abc-123");
        assert_eq!(err.to_string(), "Customer not found: abc-123");
    }

    #[test]
    fn test_is_unique_violation_matches_constraint() {
        let err = DbError::UniqueViolation {
            constraint: "sales_sale_number_key".to_string(),
        };
        assert!(err.is_unique_violation("sales_sale_number_key"));
        assert!(!err.is_unique_violation("customers_phone_key"));

        let other = DbError::PoolExhausted;
        assert!(!other.is_unique_violation("sales_sale_number_key"));
    }

    #[test]
    fn test_core_error_passes_through() {
        let core = CoreError::Validation(trackside_core::ValidationError::EmptySale);
        let err: DbError = core.into();
        assert!(matches!(err, DbError::Core(_)));
    }
}
