//! # terraform-provider-cdb
//!
//! Terraform provider library exposing configuration values stored in a
//! config-db service as a read-only data source.
//!
//! ## Overview
//!
//! - [`client::ConfigClient`] performs one authenticated GET per value and
//!   decodes the JSON record into a typed [`client::ConfigValue`]
//! - [`provider::ConfigValueDataSource`] maps that record onto the
//!   `cdb_config_value` attributes, setting exactly the output the record's
//!   `value_type` names
//! - [`provider::CdbProvider`] loads the API token and base URL and binds a
//!   client into its data sources
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use terraform_provider_cdb::prelude::*;
//! use serde_json::json;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let mut host = ProviderHost::new(CdbProvider::new());
//! host.configure(json!({
//!     "token": "secret-token",
//!     "base_url": "https://cdb.example.com",
//! }))
//! .await;
//!
//! let response = host
//!     .read_data_source(
//!         &CancellationToken::new(),
//!         "cdb_config_value",
//!         json!({ "environment": "prod", "key": "feature_x" }),
//!     )
//!     .await;
//! println!("{:?}", response.state);
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `validation` (default): validate provider settings before building a client
//! - `yaml` (default), `toml`, `json`: formats accepted for `CDB_CONFIG_FILE`

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod logging;
pub mod provider;
pub mod settings;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::client::{ConfigClient, ConfigValue, StatusPolicy, TypedValue, ValueType};
    pub use crate::error::{ProviderError, Result, ValidationError};
    pub use crate::provider::{
        CdbProvider, ConfigValueDataSource, ConfigValueModel, DataSource, Diagnostics, Provider,
        ProviderHost,
    };
    pub use crate::settings::ProviderSettings;

    #[cfg(feature = "validation")]
    pub use crate::settings::Validate;
}
