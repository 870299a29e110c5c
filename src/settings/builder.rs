//! Builder for loading provider settings.

use super::{ConfigSource, EnvSource, FileSource, HostSource, ProviderSettings, SettingsLoader};
use crate::error::Result;
use serde_json::Value as JsonValue;
use std::path::PathBuf;

#[cfg(feature = "validation")]
use super::Validate;

/// Builder for loading [`ProviderSettings`].
///
/// # Examples
///
/// ```rust,no_run
/// use terraform_provider_cdb::settings::ProviderSettings;
/// use serde_json::json;
///
/// # fn example() -> terraform_provider_cdb::error::Result<()> {
/// let settings = ProviderSettings::builder()
///     .with_optional_file("/etc/cdb/provider.yaml")
///     .with_env_overrides("CDB")
///     .with_host_config(json!({ "base_url": "https://cdb.example.com" }))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SettingsBuilder {
    files: Vec<(PathBuf, bool)>,
    env_prefix: Option<String>,
    host_config: Option<JsonValue>,
    custom_sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsBuilder {
    /// Create a new builder with no sources.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            env_prefix: None,
            host_config: None,
            custom_sources: Vec::new(),
        }
    }

    /// Add a settings file that must exist.
    ///
    /// Later files override earlier ones.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), true));
        self
    }

    /// Add a settings file that is skipped when missing.
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), false));
        self
    }

    /// Read `<prefix>_*` environment variables, e.g. `CDB_TOKEN`.
    pub fn with_env_overrides(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Use the provider block received from the host. Takes precedence over
    /// every other source.
    pub fn with_host_config(mut self, config: JsonValue) -> Self {
        self.host_config = Some(config);
        self
    }

    /// Add a custom settings source.
    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.custom_sources.push(Box::new(source));
        self
    }

    /// Load, merge and validate the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any source cannot be read
    /// - The merged settings cannot be deserialized
    /// - Validation fails
    pub fn build(self) -> Result<ProviderSettings> {
        let mut loader = SettingsLoader::new();

        for (index, (path, required)) in self.files.into_iter().enumerate() {
            let priority = 100 + (index as i32 * 10);
            let source = FileSource::new(path)
                .required(required)
                .with_priority(priority);
            loader.add_source(Box::new(source));
        }

        for source in self.custom_sources {
            loader.add_source(source);
        }

        if let Some(prefix) = self.env_prefix {
            loader.add_source(Box::new(EnvSource::new(prefix)));
        }

        if let Some(host_config) = self.host_config {
            loader.add_source(Box::new(HostSource::new(host_config)));
        }

        let settings: ProviderSettings = loader.load()?;

        #[cfg(feature = "validation")]
        settings.validate()?;

        Ok(settings)
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use serde_json::json;

    #[test]
    fn test_builder_accumulates_files() {
        let builder = SettingsBuilder::new()
            .with_file("a.yaml")
            .with_optional_file("b.yaml");

        assert_eq!(builder.files.len(), 2);
        assert!(builder.files[0].1);
        assert!(!builder.files[1].1);
    }

    #[test]
    fn test_builder_env_overrides() {
        let builder = SettingsBuilder::new().with_env_overrides("CDB");
        assert_eq!(builder.env_prefix, Some("CDB".to_string()));
    }

    #[test]
    fn test_build_from_host_config() {
        let settings = SettingsBuilder::new()
            .with_host_config(json!({
                "token": "host-token",
                "base_url": "https://cdb.example.com",
                "strict_status": true,
                "timeout_seconds": 15,
            }))
            .build()
            .unwrap();

        assert_eq!(settings.token, "host-token");
        assert_eq!(settings.base_url, "https://cdb.example.com");
        assert!(settings.strict_status);
        assert_eq!(settings.timeout_seconds, Some(15));
    }

    #[test]
    fn test_build_without_sources() {
        let result = SettingsBuilder::new().build();
        assert!(matches!(result, Err(ProviderError::Settings(_))));
    }

    #[cfg(feature = "validation")]
    #[test]
    fn test_build_rejects_missing_token() {
        let result = SettingsBuilder::new()
            .with_host_config(json!({ "base_url": "https://cdb.example.com" }))
            .build();
        assert!(matches!(result, Err(ProviderError::Validation(_))));
    }
}
