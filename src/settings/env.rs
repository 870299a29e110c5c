//! Environment variable settings source.

use super::ConfigSource;
use crate::error::{ProviderError, Result};
use config::Environment;
use std::collections::HashMap;

/// Environment variable settings source.
///
/// `CDB_TOKEN` and `CDB_BASE_URL` map to `token` and `base_url` for the prefix
/// `CDB`. Values that look like numbers or booleans are parsed as such.
///
/// # Examples
///
/// ```rust
/// use terraform_provider_cdb::settings::EnvSource;
///
/// let source = EnvSource::new("CDB");
/// ```
pub struct EnvSource {
    prefix: String,
    priority: i32,
}

impl EnvSource {
    /// Create a new environment variable source for `<prefix>_*` variables.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            priority: 300,
        }
    }

    /// Set the priority for this source.
    ///
    /// Higher priority sources override lower priority ones.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for EnvSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        // Settings are flat, so only the prefix needs a separator.
        let env_source = Environment::with_prefix(&self.prefix)
            .prefix_separator("_")
            .try_parsing(true);

        let settings = config::Config::builder()
            .add_source(env_source)
            .build()
            .map_err(|e| {
                ProviderError::Settings(format!("Failed to load environment variables: {}", e))
            })?;

        settings
            .try_deserialize::<HashMap<String, config::Value>>()
            .map_err(|e| {
                ProviderError::Settings(format!("Failed to parse environment variables: {}", e))
            })
    }

    fn name(&self) -> String {
        format!("env:{}_*", self.prefix)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
