//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic bookkeeping failures (unknown accounts,
/// bad amounts, bad counts). A derivation either succeeds completely or fails
/// with one of these; there are no partial results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An account name is not present in the chart of accounts.
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    /// A monetary amount was zero, negative or otherwise unusable.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A cash-count entry had a negative number of pieces.
    #[error("invalid count for {denomination}: {count}")]
    InvalidCount { denomination: String, count: i64 },

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn unknown_account(name: impl Into<String>) -> Self {
        Self::UnknownAccount(name.into())
    }

    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn invalid_count(denomination: impl Into<String>, count: i64) -> Self {
        Self::InvalidCount {
            denomination: denomination.into(),
            count,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
