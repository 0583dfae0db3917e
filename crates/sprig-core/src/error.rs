//! Unified error handling for Sprig Core.
//!
//! Wraps domain and application errors with a category and user-actionable
//! suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Sprig Core operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SprigError {
    /// Errors from the domain layer (business rule violations).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (I/O orchestration failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl SprigError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { .. } => vec![
                "Run: sprig config path to locate the configuration file".into(),
                "Run: sprig init --force to restore the defaults".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in Sprig".into(),
                "Please report this issue at: https://github.com/sprig-dev/sprig/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Validation,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether running the same command again might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::FetchFailed {
                not_found: false,
                ..
            })
        )
    }

    /// Whether this belongs to the `InvalidReference` failure class.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, Self::Domain(e) if e.is_invalid_reference())
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Conflict,
    Permission,
    Network,
    Internal,
}

/// Convenient result type alias.
pub type SprigResult<T> = Result<T, SprigError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> SprigResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> SprigResult<T> {
        self.map_err(|e| SprigError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_are_retryable() {
        let err: SprigError = ApplicationError::FetchFailed {
            reference: "acme/x".into(),
            reason: "timed out".into(),
            not_found: false,
        }
        .into();
        assert!(err.is_retryable());
        assert_eq!(err.category(), ErrorCategory::Network);
    }

    #[test]
    fn domain_errors_keep_their_message() {
        let err: SprigError = DomainError::UnknownExample {
            name: "nope".into(),
        }
        .into();
        assert!(err.to_string().starts_with("Could not locate an example named"));
        assert!(err.is_invalid_reference());
        assert!(!err.is_retryable());
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let res: Result<(), std::io::Error> = Err(std::io::Error::other("boom"));
        let err = res.context("reading config").unwrap_err();
        assert!(matches!(err, SprigError::Internal { .. }));
        assert!(err.to_string().contains("reading config: boom"));
    }
}
