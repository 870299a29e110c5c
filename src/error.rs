//! Error types for terraform-provider-cdb.

use std::fmt;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Errors that can occur while talking to config-db or serving a data source.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request could not be built, sent, or was cancelled before a
    /// response arrived.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body was not valid JSON or did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A component was used before it was given what it needs to run.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The service answered with a non-success status and the client runs
    /// with a strict status policy.
    #[error("Unexpected HTTP status {status}: {body}")]
    Status {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// Provider settings could not be loaded or merged.
    #[error("Failed to load provider settings: {0}")]
    Settings(String),

    /// Provider settings were loaded but are not usable.
    #[error("Provider settings validation failed: {0}")]
    Validation(String),
}

impl ProviderError {
    /// Short label used as the diagnostic summary when this error reaches the host.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Transport(_) | Self::Decode(_) | Self::Status { .. } => "Client Error",
            Self::Configuration(_) => "Unconfigured Data Source",
            Self::Settings(_) | Self::Validation(_) => "Invalid Provider Configuration",
        }
    }
}

/// Validation error for provider settings.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific field has an invalid value.
    InvalidField {
        /// The field name
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Collapse a list of errors: `Ok` when empty, the error itself when
    /// there is exactly one, `Multiple` otherwise.
    pub fn collect(mut errors: Vec<ValidationError>) -> std::result::Result<(), Self> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(Self::Multiple(errors)),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "Field '{}' is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ProviderError {
    fn from(err: ValidationError) -> Self {
        ProviderError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_empty_is_ok() {
        assert!(ValidationError::collect(Vec::new()).is_ok());
    }

    #[test]
    fn test_collect_single_is_unwrapped() {
        let err = ValidationError::collect(vec![ValidationError::invalid_field(
            "token",
            "must not be empty",
        )])
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { .. }));
    }

    #[test]
    fn test_collect_many_is_multiple() {
        let err = ValidationError::collect(vec![
            ValidationError::custom("a"),
            ValidationError::custom("b"),
        ])
        .unwrap_err();
        let text = err.to_string();
        assert!(text.contains("1. a"));
        assert!(text.contains("2. b"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            ProviderError::Transport("boom".into()).label(),
            "Client Error"
        );
        assert_eq!(
            ProviderError::Configuration("no client".into()).label(),
            "Unconfigured Data Source"
        );
        assert_eq!(
            ProviderError::Validation("bad".into()).label(),
            "Invalid Provider Configuration"
        );
    }

    #[test]
    fn test_validation_into_provider_error() {
        let err: ProviderError = ValidationError::invalid_field("base_url", "not a URL").into();
        assert_eq!(
            err.to_string(),
            "Provider settings validation failed: Field 'base_url' is invalid: not a URL"
        );
    }
}
