//! Error types for u-prob.

use thiserror::Error;

/// Validation errors raised by distribution constructors and operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbError {
    /// A distribution parameter violates its constraint
    /// (probability outside `[0, 1]`, non-positive degrees of freedom,
    /// negative or non-integral trial count, ...).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An operation argument is out of its domain
    /// (e.g. a quantile requested for `p` outside `[0, 1]`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ProbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbError::InvalidParameter("trials must be integral, got 2.5".into());
        assert_eq!(err.to_string(), "invalid parameter: trials must be integral, got 2.5");

        let err = ProbError::InvalidArgument("p must be in [0, 1], got 1.5".into());
        assert!(err.to_string().starts_with("invalid argument"));
        assert!(err.to_string().contains("1.5"));
    }
}
