//! File-based settings source.

use super::ConfigSource;
use crate::error::{ProviderError, Result};
use config::File;
use std::collections::HashMap;
use std::path::PathBuf;

/// File-based settings source.
///
/// Loads settings from YAML, TOML, or JSON files with automatic format detection
/// based on file extension. Which formats can actually be parsed depends on the
/// `yaml`, `toml` and `json` crate features.
///
/// # Examples
///
/// ```rust,no_run
/// use terraform_provider_cdb::settings::FileSource;
///
/// let source = FileSource::new("/etc/cdb/provider.yaml").required(false);
/// ```
pub struct FileSource {
    path: PathBuf,
    priority: i32,
    required: bool,
}

impl FileSource {
    /// Create a new, required file source.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            priority: 100,
            required: true,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether a missing file is an error. A missing optional file loads as empty.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Validate that the file extension is supported.
    fn validate_extension(&self) -> Result<()> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ProviderError::Settings(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "yaml" | "yml" | "toml" | "json" => Ok(()),
            _ => Err(ProviderError::Settings(format!(
                "Unsupported file extension: {}. Supported: .yaml, .yml, .toml, .json",
                extension
            ))),
        }
    }
}

impl ConfigSource for FileSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        self.validate_extension()?;

        if !self.path.exists() {
            if self.required {
                return Err(ProviderError::Settings(format!(
                    "Settings file not found: {}",
                    self.path.display()
                )));
            }
            return Ok(HashMap::new());
        }

        let settings = config::Config::builder()
            .add_source(File::from(self.path.clone()).required(true))
            .build()
            .map_err(|e| ProviderError::Settings(format!("Failed to load file: {}", e)))?;

        settings
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| ProviderError::Settings(format!("Failed to parse file: {}", e)))
    }

    fn name(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_extension_yaml() {
        assert!(FileSource::new("provider.yaml").validate_extension().is_ok());
        assert!(FileSource::new("provider.yml").validate_extension().is_ok());
    }

    #[test]
    fn test_validate_extension_unknown() {
        assert!(FileSource::new("provider.txt").validate_extension().is_err());
        assert!(FileSource::new("provider").validate_extension().is_err());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_load_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("provider.yaml");
        fs::write(
            &path,
            r#"
token: file-token
base_url: https://cdb.example.com
"#,
        )
        .unwrap();

        let map = FileSource::new(&path).load().unwrap();
        assert_eq!(
            map.get("token").cloned().unwrap().into_string().unwrap(),
            "file-token"
        );
        assert!(map.contains_key("base_url"));
    }

    #[test]
    fn test_load_missing_required_file() {
        let result = FileSource::new("/nonexistent/provider.yaml").load();
        assert!(matches!(result, Err(ProviderError::Settings(_))));
    }

    #[test]
    fn test_load_missing_optional_file() {
        let temp_dir = TempDir::new().unwrap();
        let map = FileSource::new(temp_dir.path().join("absent.yaml"))
            .required(false)
            .load()
            .unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_with_priority_and_name() {
        let source = FileSource::new("provider.yaml").with_priority(150);
        assert_eq!(source.priority(), 150);
        assert!(source.name().starts_with("file:"));
        assert!(source.name().contains("provider.yaml"));
    }
}
