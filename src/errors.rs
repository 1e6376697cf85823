//! Error taxonomy for fitting and transforming.

use thiserror::Error;

/// Errors surfaced by the partition builder and the feature mapper.
///
/// Every error is raised before any output is produced; a failed call never
/// leaves partially mutated state behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    /// Malformed input (empty, ragged, non-finite) or invalid parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// `transform` was called on an estimator that has not been fitted.
    #[error("this IsolationKernel instance is not fitted yet; call `fit` first")]
    NotFitted,

    /// Query feature width differs from the width seen at fit time.
    #[error("dimension mismatch: model was fitted on {expected} features, query has {found}")]
    DimensionMismatch { expected: usize, found: usize },
}

pub type KernelResult<T> = Result<T, KernelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KernelError::Validation("empty input".to_string());
        assert_eq!(err.to_string(), "validation error: empty input");

        let err = KernelError::DimensionMismatch {
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "dimension mismatch: model was fitted on 3 features, query has 2"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<KernelError>();
        assert_sync::<KernelError>();
    }
}
