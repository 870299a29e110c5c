//! The boundary between config-db and the Terraform plugin host.
//!
//! The host owns the plugin protocol, schema validation and state storage.
//! This module models the capabilities it expects from a provider and its
//! data sources (metadata, schema, configure, read) as plain traits, and
//! [`ProviderHost`] drives them in the order the host does.

mod cdb;
mod config_value;
mod diagnostics;
mod host;
mod schema;

pub use cdb::{CdbProvider, PROVIDER_TYPE_NAME};
pub use config_value::{ConfigValueDataSource, ConfigValueModel, apply_config_value, config_value_id};
pub use diagnostics::{Diagnostic, Diagnostics, Severity};
pub use host::ProviderHost;
pub use schema::{Attribute, AttributeType, Schema};

use crate::client::ConfigClient;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// What a configured provider hands to its data sources.
pub type ProviderData = Arc<ConfigClient>;

/// Name and version the provider reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderMetadata {
    /// Prefix of every data source type name, e.g. `cdb`.
    pub type_name: String,
    /// Provider version.
    pub version: String,
}

/// Result of configuring a provider.
#[derive(Debug, Default)]
pub struct ConfigureResponse {
    /// Data for data sources; `None` when configuration failed.
    pub provider_data: Option<ProviderData>,
    /// Diagnostics.
    pub diagnostics: Diagnostics,
}

/// One data source read, as received from the host.
#[derive(Debug, Clone)]
pub struct ReadRequest {
    /// The data source block from the Terraform configuration.
    pub config: JsonValue,
}

/// Result of a data source read.
#[derive(Debug, Default)]
pub struct ReadResponse {
    /// New state; `None` when the read failed.
    pub state: Option<JsonValue>,
    /// Diagnostics.
    pub diagnostics: Diagnostics,
}

/// A read-only data source served to the host.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Full type name, derived from the provider's type name.
    fn type_name(&self, provider_type_name: &str) -> String;

    /// Attributes of the data source block.
    fn schema(&self) -> Schema;

    /// Receive the provider's data.
    ///
    /// The host may call this before the provider itself is configured, with
    /// `None`; implementations must accept that and stay unconfigured.
    fn configure(&self, provider_data: Option<ProviderData>, diagnostics: &mut Diagnostics);

    /// Resolve the block into state.
    async fn read(&self, cancel: &CancellationToken, request: ReadRequest) -> ReadResponse;
}

/// A provider: a named collection of data sources sharing one configuration.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Type name and version.
    fn metadata(&self) -> ProviderMetadata;

    /// Attributes of the provider block.
    fn schema(&self) -> Schema;

    /// Apply the provider block.
    async fn configure(&self, config: JsonValue) -> ConfigureResponse;

    /// The data sources this provider serves.
    fn data_sources(&self) -> Vec<Arc<dyn DataSource>>;
}
