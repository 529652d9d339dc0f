//! # CLI Error Type
//!
//! Unified error type for every command.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the CLI                                │
//! │                                                                         │
//! │  estribo report simulate --supplier Foo                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<(), CliError>                                            │  │
//! │  │         │                                                        │  │
//! │  │  Database Error? ─── DbError::NotFound { .. } ──────┐           │  │
//! │  │         │                                            ▼           │  │
//! │  │  Validation Error? ── ValidationError::OutOfRange ── CliError   │  │
//! │  │         │                                            │           │  │
//! │  │  Success ──► stdout                                  ▼           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  stderr: error[NOT_FOUND]: Supplier not found: Foo                     │
//! │  exit status: 3                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use estribo_core::ValidationError;
use estribo_db::DbError;
use serde::Serialize;

/// Error returned from CLI commands.
///
/// With `--json` this is what gets printed to stderr:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Supplier not found: 6f1c..."
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes, each mapped to a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Record not found
    NotFound,

    /// Database operation failed
    DatabaseError,

    /// Output could not be written
    Internal,
}

impl ErrorCode {
    /// Exit status reported to the shell.
    pub fn exit_status(self) -> u8 {
        match self {
            ErrorCode::Internal => 1,
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::DatabaseError => 4,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl CliError {
    /// Creates a new CLI error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }

    /// Exit status for this error.
    pub fn exit_status(&self) -> u8 {
        self.code.exit_status()
    }
}

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            DbError::Validation(e) => CliError::validation(e.to_string()),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                CliError::validation("Invalid reference: unknown supplier or item")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::internal(format!("Failed to write output: {}", err))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to encode JSON: {}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_from_db_error() {
        let err: CliError = DbError::not_found("Supplier", "abc").into();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.to_string(), "error[NOT_FOUND]: Supplier not found: abc");
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn test_validation_from_db_error() {
        let db_err: DbError = ValidationError::MustBePositive {
            field: "price_per_kg".to_string(),
        }
        .into();
        let err: CliError = db_err.into();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn test_database_errors_hide_details() {
        let err: CliError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_json_shape() {
        let err = CliError::not_found("Item", "x");
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Item not found: x");
    }
}
