// Central Error Type for Tablemap

use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// An operation referenced a column the schema does not declare
    #[error("Schema violation: column `{column}` is not declared in the schema")]
    SchemaViolation { column: String },

    #[error("Invalid predicate: {0}")]
    InvalidPredicate(#[from] crate::domain::PredicateError),

    /// The engine rejected a statement; the enclosing batch was rolled back
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn schema_violation(column: impl Into<String>) -> Self {
        AppError::SchemaViolation {
            column: column.into(),
        }
    }
}

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Database(String)
