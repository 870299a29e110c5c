//! Settings source trait.

use crate::error::Result;
use std::collections::HashMap;

/// A place provider settings can come from.
///
/// Implement this trait to feed settings from somewhere other than files,
/// environment variables or the provider block.
pub trait ConfigSource: Send + Sync {
    /// Load settings as a flat key-value map.
    ///
    /// The returned map will be merged with other sources according to precedence rules.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or parsed.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;

    /// Get the priority of this source (higher = takes precedence).
    ///
    /// Default priorities:
    /// - Provider block: 400
    /// - Environment variables: 300
    /// - Settings file: 100
    fn priority(&self) -> i32 {
        100
    }
}
