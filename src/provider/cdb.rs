//! The `cdb` provider.

use super::{
    Attribute, ConfigValueDataSource, ConfigureResponse, DataSource, Provider, ProviderMetadata,
    Schema,
};
use crate::settings::ProviderSettings;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{debug, info};

/// Provider type name; data source names start with it.
pub const PROVIDER_TYPE_NAME: &str = "cdb";

/// Provider serving config-db values.
///
/// Configuring it loads [`ProviderSettings`] from the provider block,
/// `CDB_*` environment variables and `CDB_CONFIG_FILE`, and hands a client
/// built from them to the data sources.
pub struct CdbProvider {
    version: String,
    config_value: Arc<ConfigValueDataSource>,
}

impl CdbProvider {
    /// A provider reporting this crate's version.
    pub fn new() -> Self {
        Self::with_version(env!("CARGO_PKG_VERSION"))
    }

    /// A provider reporting `version`.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            config_value: Arc::new(ConfigValueDataSource::new()),
        }
    }
}

impl Default for CdbProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for CdbProvider {
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: self.version.clone(),
        }
    }

    fn schema(&self) -> Schema {
        Schema::new("Reads configuration values from a config-db service")
            .with_attribute(
                "token",
                Attribute::optional_string()
                    .sensitive()
                    .with_description("API token for config-db. May also be set with `CDB_TOKEN`."),
            )
            .with_attribute(
                "base_url",
                Attribute::optional_string().with_description(
                    "Base URL of the config-db service. May also be set with `CDB_BASE_URL`.",
                ),
            )
            .with_attribute(
                "strict_status",
                Attribute::optional_bool().with_description(
                    "Fail reads when config-db answers with a non-2xx status. Defaults to false.",
                ),
            )
            .with_attribute(
                "timeout_seconds",
                Attribute::optional_int64()
                    .with_description("Per-request timeout in seconds. No timeout when unset."),
            )
    }

    async fn configure(&self, config: JsonValue) -> ConfigureResponse {
        let mut response = ConfigureResponse::default();

        let client = ProviderSettings::load(config).and_then(|settings| {
            debug!(?settings, "loaded provider settings");
            settings.client()
        });

        match client {
            Ok(client) => {
                info!(base_url = %client.base_url(), "configured config-db client");
                response.provider_data = Some(Arc::new(client));
            }
            Err(e) => response.diagnostics.add_error(
                "Invalid Provider Configuration",
                format!("Unable to create config-db client: {}", e),
            ),
        }

        response
    }

    fn data_sources(&self) -> Vec<Arc<dyn DataSource>> {
        vec![self.config_value.clone() as Arc<dyn DataSource>]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata() {
        let metadata = CdbProvider::with_version("1.2.3").metadata();
        assert_eq!(metadata.type_name, "cdb");
        assert_eq!(metadata.version, "1.2.3");
    }

    #[test]
    fn test_schema_marks_token_sensitive() {
        let schema = CdbProvider::new().schema();
        assert!(schema.attribute("token").unwrap().sensitive);
        assert!(!schema.attribute("base_url").unwrap().sensitive);
    }

    #[test]
    fn test_data_sources() {
        let provider = CdbProvider::new();
        let names: Vec<_> = provider
            .data_sources()
            .iter()
            .map(|ds| ds.type_name(PROVIDER_TYPE_NAME))
            .collect();
        assert_eq!(names, vec!["cdb_config_value"]);
    }

    #[tokio::test]
    async fn test_configure_builds_client() {
        let response = CdbProvider::new()
            .configure(json!({
                "token": "host-token",
                "base_url": "https://cdb.example.com",
                "strict_status": null,
                "timeout_seconds": null,
            }))
            .await;

        assert!(!response.diagnostics.has_error());
        let client = response.provider_data.unwrap();
        assert_eq!(client.base_url(), "https://cdb.example.com");
    }

    #[cfg(feature = "validation")]
    #[tokio::test]
    async fn test_configure_rejects_bad_url() {
        let response = CdbProvider::new()
            .configure(json!({
                "token": "host-token",
                "base_url": "not a url",
            }))
            .await;

        assert!(response.provider_data.is_none());
        assert_eq!(
            response.diagnostics.errors().next().unwrap().summary,
            "Invalid Provider Configuration"
        );
    }
}
