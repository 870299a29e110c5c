//! Settings validation support.

use super::ProviderSettings;
use crate::error::ValidationError;

/// Trait for settings validation.
///
/// # Examples
///
/// ```rust
/// use terraform_provider_cdb::error::ValidationError;
/// use terraform_provider_cdb::settings::Validate;
///
/// struct Limits {
///     max_keys: usize,
/// }
///
/// impl Validate for Limits {
///     fn validate(&self) -> Result<(), ValidationError> {
///         if self.max_keys == 0 {
///             return Err(ValidationError::invalid_field(
///                 "max_keys",
///                 "must be greater than 0",
///             ));
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Validate {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Should return a `ValidationError` describing what validation failed.
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for ProviderSettings {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.token.trim().is_empty() {
            errors.push(ValidationError::invalid_field(
                "token",
                "must be set in the provider block or CDB_TOKEN",
            ));
        }

        if self.base_url.trim().is_empty() {
            errors.push(ValidationError::invalid_field(
                "base_url",
                "must be set in the provider block or CDB_BASE_URL",
            ));
        } else {
            match url::Url::parse(&self.base_url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => errors.push(ValidationError::invalid_field(
                    "base_url",
                    format!("scheme must be http or https, got '{}'", parsed.scheme()),
                )),
                Err(e) => errors.push(ValidationError::invalid_field(
                    "base_url",
                    format!("not a valid URL: {}", e),
                )),
            }
        }

        if self.timeout_seconds == Some(0) {
            errors.push(ValidationError::invalid_field(
                "timeout_seconds",
                "must be greater than 0",
            ));
        }

        ValidationError::collect(errors)
    }
}
