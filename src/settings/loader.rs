//! Merges settings from multiple sources.

use super::ConfigSource;
use crate::error::{ProviderError, Result};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Loads and merges settings from multiple sources.
///
/// Sources are merged lowest priority first, so higher priority sources
/// override individual keys.
pub(crate) struct SettingsLoader {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl SettingsLoader {
    pub(crate) fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub(crate) fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Load and merge settings from all sources into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No source was added
    /// - Any source fails to load
    /// - Deserialization fails
    pub(crate) fn load<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        if self.sources.is_empty() {
            return Err(ProviderError::Settings(
                "No settings sources specified".to_string(),
            ));
        }

        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());

        let mut builder = config::Config::builder();

        for source in sorted_sources {
            let values = source.load().map_err(|e| {
                ProviderError::Settings(format!("Failed to load source '{}': {}", source.name(), e))
            })?;
            debug!(source = %source.name(), keys = values.len(), "merging provider settings");

            for (key, value) in values {
                builder = builder.set_override(&key, value).map_err(|e| {
                    ProviderError::Settings(format!(
                        "Failed to merge source '{}': {}",
                        source.name(),
                        e
                    ))
                })?;
            }
        }

        let merged = builder
            .build()
            .map_err(|e| ProviderError::Settings(format!("Failed to build settings: {}", e)))?;

        merged.try_deserialize::<T>().map_err(|e| {
            ProviderError::Settings(format!("Failed to deserialize settings: {}", e))
        })
    }

    /// Source names in priority order.
    #[cfg(test)]
    pub(crate) fn source_names(&self) -> Vec<String> {
        let mut sorted_sources: Vec<_> = self.sources.iter().collect();
        sorted_sources.sort_by_key(|s| s.priority());
        sorted_sources.iter().map(|s| s.name()).collect()
    }
}
