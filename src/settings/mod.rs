//! Provider-level settings: API token, base URL and client behaviour.
//!
//! Settings are merged from, lowest precedence first:
//! 1. An optional settings file (`CDB_CONFIG_FILE`)
//! 2. `CDB_*` environment variables
//! 3. The provider block in the Terraform configuration

mod builder;
mod env;
mod file;
mod host;
mod loader;
mod source;

#[cfg(feature = "validation")]
mod validation;

pub use builder::SettingsBuilder;
pub use env::EnvSource;
pub use file::FileSource;
pub use host::HostSource;
pub(crate) use loader::SettingsLoader;
pub use source::ConfigSource;

#[cfg(feature = "validation")]
pub use validation::Validate;

use crate::client::{ConfigClient, StatusPolicy};
use crate::error::Result;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fmt;
use std::time::Duration;

/// Prefix of the environment variables the provider reads.
pub const ENV_PREFIX: &str = "CDB";

/// Environment variable naming an optional settings file.
pub const CONFIG_FILE_ENV: &str = "CDB_CONFIG_FILE";

/// Settings needed to talk to config-db.
#[derive(Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API token sent as a bearer credential.
    pub token: String,
    /// Base URL of the config-db service.
    pub base_url: String,
    /// Fail reads on non-2xx responses instead of passing them through.
    pub strict_status: bool,
    /// Per-request timeout. No timeout when unset.
    pub timeout_seconds: Option<u64>,
}

impl ProviderSettings {
    /// Create a new builder for loading settings.
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::new()
    }

    /// Load settings the way the provider does at configure time: the file
    /// named by `CDB_CONFIG_FILE` if set, then `CDB_*` variables, then the
    /// provider block.
    pub fn load(host_config: JsonValue) -> Result<Self> {
        let mut builder = Self::builder();
        if let Some(path) = std::env::var_os(CONFIG_FILE_ENV) {
            builder = builder.with_file(path);
        }
        builder
            .with_env_overrides(ENV_PREFIX)
            .with_host_config(host_config)
            .build()
    }

    /// The status policy these settings select.
    pub fn status_policy(&self) -> StatusPolicy {
        if self.strict_status {
            StatusPolicy::Strict
        } else {
            StatusPolicy::Passthrough
        }
    }

    /// Build a client from these settings.
    pub fn client(&self) -> Result<ConfigClient> {
        let mut builder = ConfigClient::builder()
            .with_token(self.token.clone())
            .with_base_url(self.base_url.clone())
            .with_status_policy(self.status_policy());
        if let Some(seconds) = self.timeout_seconds {
            builder = builder.with_timeout(Duration::from_secs(seconds));
        }
        builder.build()
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("strict_status", &self.strict_status)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_policy() {
        let mut settings = ProviderSettings::default();
        assert_eq!(settings.status_policy(), StatusPolicy::Passthrough);
        settings.strict_status = true;
        assert_eq!(settings.status_policy(), StatusPolicy::Strict);
    }

    #[test]
    fn test_client_from_settings() {
        let settings = ProviderSettings {
            token: "t".to_string(),
            base_url: "https://cdb.example.com/".to_string(),
            strict_status: true,
            timeout_seconds: Some(3),
        };

        let client = settings.client().unwrap();
        assert_eq!(client.base_url(), "https://cdb.example.com");
        assert_eq!(client.status_policy(), StatusPolicy::Strict);
    }

    #[test]
    fn test_debug_redacts_token() {
        let settings = ProviderSettings {
            token: "super-secret".to_string(),
            ..Default::default()
        };
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }
}
