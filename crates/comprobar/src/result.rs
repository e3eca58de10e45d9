//! Result and error types for Comprobar.

use thiserror::Error;

/// Result type for Comprobar operations
pub type AssertResult<T> = Result<T, AssertionError>;

/// Errors that can be raised by an assertion
#[derive(Debug, Error)]
pub enum AssertionError {
    /// A constraint was not satisfied
    #[error("{message}")]
    Failed {
        /// Fully rendered diagnostic text
        message: String,
    },

    /// The caller asked for the test to be ignored
    #[error("Ignored: {message}")]
    Ignored {
        /// Reason given by the caller
        message: String,
    },

    /// The assertion API was used incorrectly (bad pattern, bad format string, ...)
    #[error("Invalid usage: {message}")]
    InvalidUsage {
        /// Error message
        message: String,
    },

    /// Several soft assertions failed
    #[error("{} assertion(s) failed:\n{}", failures.len(), failures.join("\n"))]
    Multiple {
        /// Rendered message of each failure, in order
        failures: Vec<String>,
    },

    /// Configuration could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl AssertionError {
    /// Create a failure carrying rendered text
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Create an invalid-usage error
    #[must_use]
    pub fn invalid_usage(message: impl Into<String>) -> Self {
        Self::InvalidUsage {
            message: message.into(),
        }
    }

    /// Check whether this is a constraint failure
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Multiple { .. })
    }

    /// Check whether this is an invalid-usage error
    #[must_use]
    pub const fn is_invalid_usage(&self) -> bool {
        matches!(self, Self::InvalidUsage { .. })
    }

    /// The rendered failure text, if this is a single failure
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }
}
