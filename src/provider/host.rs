//! Drives a [`Provider`] through the lifecycle the plugin host follows.

use super::{DataSource, Diagnostics, Provider, ProviderData, ReadRequest, ReadResponse, Schema};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// In-process stand-in for the plugin host.
///
/// Resolves data sources by their full type name, hands every data source the
/// provider's data after [`ProviderHost::configure`], and routes reads.
///
/// # Examples
///
/// ```rust,no_run
/// use terraform_provider_cdb::provider::{CdbProvider, ProviderHost};
/// use serde_json::json;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let mut host = ProviderHost::new(CdbProvider::new());
/// let diagnostics = host
///     .configure(json!({ "token": "secret", "base_url": "https://cdb.example.com" }))
///     .await;
/// assert!(!diagnostics.has_error());
///
/// let response = host
///     .read_data_source(
///         &CancellationToken::new(),
///         "cdb_config_value",
///         json!({ "environment": "prod", "key": "feature_x" }),
///     )
///     .await;
/// println!("{:?}", response.state);
/// # }
/// ```
pub struct ProviderHost<P> {
    provider: P,
    data_sources: BTreeMap<String, Arc<dyn DataSource>>,
    provider_data: Option<ProviderData>,
}

impl<P: Provider> ProviderHost<P> {
    /// Register the provider's data sources. Each is configured with `None`
    /// up front, as the host does before the provider block is known.
    pub fn new(provider: P) -> Self {
        let type_name = provider.metadata().type_name;
        let mut discarded = Diagnostics::new();
        let data_sources = provider
            .data_sources()
            .into_iter()
            .map(|ds| {
                ds.configure(None, &mut discarded);
                (ds.type_name(&type_name), ds)
            })
            .collect();

        Self {
            provider,
            data_sources,
            provider_data: None,
        }
    }

    /// The hosted provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Full type names of the registered data sources, sorted.
    pub fn data_source_types(&self) -> Vec<String> {
        self.data_sources.keys().cloned().collect()
    }

    /// Schema of a registered data source.
    pub fn data_source_schema(&self, type_name: &str) -> Option<Schema> {
        self.data_sources.get(type_name).map(|ds| ds.schema())
    }

    /// Whether the last [`ProviderHost::configure`] produced provider data.
    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }

    /// Configure the provider with its block, then every data source with the
    /// resulting provider data.
    ///
    /// A configuration that fails, or yields no provider data, leaves the
    /// previous binding in place: data sources keep their client and
    /// [`ProviderHost::is_configured`] keeps its answer.
    pub async fn configure(&mut self, config: JsonValue) -> Diagnostics {
        let response = self.provider.configure(config).await;
        let mut diagnostics = response.diagnostics;

        if diagnostics.has_error() {
            warn!(
                bound = self.provider_data.is_some(),
                "provider configuration failed, keeping the previous binding"
            );
            return diagnostics;
        }

        if let Some(provider_data) = response.provider_data {
            for ds in self.data_sources.values() {
                ds.configure(Some(provider_data.clone()), &mut diagnostics);
            }
            self.provider_data = Some(provider_data);
        }

        diagnostics
    }

    /// Read one data source block.
    pub async fn read_data_source(
        &self,
        cancel: &CancellationToken,
        type_name: &str,
        config: JsonValue,
    ) -> ReadResponse {
        let Some(ds) = self.data_sources.get(type_name) else {
            let mut response = ReadResponse::default();
            response.diagnostics.add_error(
                "Unknown Data Source",
                format!(
                    "Data source type '{}' is not served by this provider; known types: {}",
                    type_name,
                    self.data_source_types().join(", ")
                ),
            );
            return response;
        };

        debug!(%type_name, "reading data source");
        ds.read(cancel, ReadRequest { config }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::CdbProvider;
    use serde_json::json;

    #[test]
    fn test_registers_data_sources_by_type_name() {
        let host = ProviderHost::new(CdbProvider::new());
        assert_eq!(host.data_source_types(), vec!["cdb_config_value"]);
        assert!(host.data_source_schema("cdb_config_value").is_some());
        assert!(host.data_source_schema("cdb_other").is_none());
        assert!(!host.is_configured());
    }

    #[tokio::test]
    async fn test_unknown_data_source() {
        let host = ProviderHost::new(CdbProvider::new());
        let response = host
            .read_data_source(&CancellationToken::new(), "cdb_missing", json!({}))
            .await;

        assert!(response.state.is_none());
        let error = response.diagnostics.errors().next().unwrap();
        assert_eq!(error.summary, "Unknown Data Source");
        assert!(error.detail.contains("cdb_config_value"));
    }

    #[tokio::test]
    async fn test_failed_first_configure_stays_unconfigured() {
        let mut host = ProviderHost::new(CdbProvider::new());
        let diagnostics = host
            .configure(json!({ "token": "t", "base_url": "http://localhost", "timeout_seconds": "soon" }))
            .await;

        assert!(diagnostics.has_error());
        assert!(!host.is_configured());
    }

    #[tokio::test]
    async fn test_read_before_configure() {
        let host = ProviderHost::new(CdbProvider::new());
        let response = host
            .read_data_source(
                &CancellationToken::new(),
                "cdb_config_value",
                json!({ "environment": "prod", "key": "k" }),
            )
            .await;

        assert!(response.state.is_none());
        assert!(response.diagnostics.has_error());
    }
}
