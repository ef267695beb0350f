//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic data-quality and invariant failures.
/// The engine performs no IO, so there is nothing transient to retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A movement record is unusable (missing dates, no resolvable direction, ...).
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    /// Prefix the message with the position of the offending record in a batch.
    pub fn at_index(self, index: usize) -> Self {
        match self {
            Self::InvalidRecord(msg) => Self::InvalidRecord(format!("line item #{index}: {msg}")),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category() {
        let err = DomainError::invalid_record("occurred_date is missing");
        assert_eq!(err.to_string(), "invalid record: occurred_date is missing");

        let err = DomainError::invariant("stock on hand overflow");
        assert_eq!(err.to_string(), "invariant violated: stock on hand overflow");
    }

    #[test]
    fn at_index_only_rewrites_invalid_records() {
        let err = DomainError::invalid_record("quantity is negative").at_index(3);
        assert_eq!(
            err,
            DomainError::InvalidRecord("line item #3: quantity is negative".to_string())
        );

        let err = DomainError::invariant("overflow").at_index(3);
        assert_eq!(err, DomainError::InvariantViolation("overflow".to_string()));
    }
}
