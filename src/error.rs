//! Error types shared across the deployment helper
//!
//! Expected failures of external systems (rejected keys, non-2xx responses,
//! failed scripts) are reported through result envelopes instead. Only
//! precondition violations, invalid input, user aborts and unexpected faults
//! travel as `DeployError`.

use inquire::InquireError;
use thiserror::Error;

/// Errors that abort an operation
#[derive(Debug, Error)]
pub enum DeployError {
    /// Required prior state is missing (e.g. generating config before a provider is chosen)
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// Malformed input, rejected before any side effect
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Name of the offending input field
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// The user declined to continue
    #[error("{0}")]
    UserAborted(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl DeployError {
    /// Shorthand for a validation error on `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error is a user-declined continuation rather than a technical failure
    pub fn is_user_abort(&self) -> bool {
        matches!(self, Self::UserAborted(_))
    }
}

impl From<InquireError> for DeployError {
    fn from(err: InquireError) -> Self {
        match err {
            InquireError::OperationCanceled | InquireError::OperationInterrupted => {
                Self::UserAborted("Wizard cancelled.".to_string())
            }
            InquireError::IO(e) => Self::Io(e),
            other => Self::Prompt(other.to_string()),
        }
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeployError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_prompt_is_user_abort() {
        let err = DeployError::from(InquireError::OperationCanceled);
        assert!(err.is_user_abort());
        let err = DeployError::from(InquireError::OperationInterrupted);
        assert!(err.is_user_abort());
    }

    #[test]
    fn test_validation_message() {
        let err = DeployError::validation("apiKey", "must be at least 10 characters");
        assert_eq!(
            err.to_string(),
            "Invalid apiKey: must be at least 10 characters"
        );
        assert!(!err.is_user_abort());
    }
}
