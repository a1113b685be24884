// Predicate Error Types

use thiserror::Error;

/// Failure to resolve a `<column>_<operator>` filter key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PredicateError {
    #[error("Operation `{operator}` not found in `{key}`, use (eq, neq, lt, lteq, gt, gteq, cont)")]
    UnsupportedOperator { key: String, operator: String },

    #[error("Filter key `{key}` has no operator suffix, use <column>_(eq, neq, lt, lteq, gt, gteq, cont)")]
    MissingOperator { key: String },

    #[error("Filter key `{key}` names no column, use <column>_<operator>")]
    MissingColumn { key: String },
}

impl PredicateError {
    /// The caller-supplied filter key that failed to parse
    pub fn key(&self) -> &str {
        match self {
            PredicateError::UnsupportedOperator { key, .. } => key,
            PredicateError::MissingOperator { key } => key,
            PredicateError::MissingColumn { key } => key,
        }
    }
}
