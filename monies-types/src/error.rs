//! Error types for money values and their adapters.

use crate::domain::Currency;

/// Errors raised by money arithmetic, codecs and registries.
///
/// Every variant is a caller-correctable precondition violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: Currency, got: Currency },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Divided by 0")]
    DivisionByZero,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl MoneyError {
    pub(crate) fn currency_mismatch(expected: &Currency, got: &Currency) -> Self {
        MoneyError::CurrencyMismatch {
            expected: expected.clone(),
            got: got.clone(),
        }
    }
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Money(#[from] MoneyError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Entity not found")]
    NotFound,
}
