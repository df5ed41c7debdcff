//! Domain error model.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, bad ranges). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A date range was empty or inverted (`start >= end`).
    #[error("invalid range: {start}..{end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

/// Fail fast on empty or inverted half-open ranges.
///
/// Every date-ranged operation calls this before touching the store.
pub fn ensure_range(start: NaiveDate, end: NaiveDate) -> DomainResult<()> {
    if start >= end {
        return Err(DomainError::InvalidRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = ensure_range(d(2024, 2, 1), d(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, DomainError::InvalidRange { .. }));
    }

    #[test]
    fn empty_range_is_rejected() {
        assert!(ensure_range(d(2024, 1, 1), d(2024, 1, 1)).is_err());
    }

    #[test]
    fn forward_range_is_accepted() {
        assert!(ensure_range(d(2024, 1, 1), d(2024, 1, 2)).is_ok());
    }
}
