//! The `config_value` data source.

use super::{
    Attribute, DataSource, Diagnostics, ProviderData, ReadRequest, ReadResponse, Schema,
};
use crate::client::{ConfigValue, TypedValue};
use crate::error::{ProviderError, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

/// State of one `config_value` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigValueModel {
    /// Environment name, as configured.
    pub environment: Option<String>,
    /// Key name; the service's spelling after a read.
    pub key: Option<String>,
    /// Set when the value is a string.
    pub str_value: Option<String>,
    /// Set when the value is an integer.
    pub int_value: Option<i64>,
    /// Set when the value is a float.
    pub float_value: Option<f64>,
    /// Set when the value is a boolean.
    pub bool_value: Option<bool>,
    /// Synthetic identifier, see [`config_value_id`].
    pub id: Option<String>,
}

impl ConfigValueModel {
    /// A block configured with `environment` and `key`.
    pub fn new(environment: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            environment: Some(environment.into()),
            key: Some(key.into()),
            ..Default::default()
        }
    }

    fn environment_name(&self) -> &str {
        self.environment.as_deref().unwrap_or_default()
    }

    fn key_name(&self) -> &str {
        self.key.as_deref().unwrap_or_default()
    }
}

/// `config_value_<environment>_<key>`, built from the configured names.
pub fn config_value_id(environment: &str, key: &str) -> String {
    format!("config_value_{}_{}", environment, key)
}

/// Map a fetched value onto the configured block.
///
/// `id` is built from the configured environment and key, `key` takes the
/// service's spelling, and exactly the output named by the discriminator is
/// set. Outputs carried in from the configuration are cleared first, so an
/// unknown discriminator leaves all four unset.
pub fn apply_config_value(config: &ConfigValueModel, value: &ConfigValue) -> ConfigValueModel {
    let mut state = ConfigValueModel {
        environment: config.environment.clone(),
        key: Some(value.key.clone()),
        id: Some(config_value_id(config.environment_name(), config.key_name())),
        ..Default::default()
    };

    match value.typed_value() {
        Some(TypedValue::Str(s)) => state.str_value = Some(s),
        Some(TypedValue::Int(i)) => state.int_value = Some(i),
        Some(TypedValue::Float(f)) => state.float_value = Some(f),
        Some(TypedValue::Bool(b)) => state.bool_value = Some(b),
        None => {}
    }

    state
}

/// Data source reading one configuration value for one environment.
///
/// Starts unconfigured; the host binds a client through
/// [`DataSource::configure`] and reads may then run concurrently.
#[derive(Default)]
pub struct ConfigValueDataSource {
    client: ArcSwapOption<crate::client::ConfigClient>,
}

impl ConfigValueDataSource {
    /// An unconfigured data source.
    pub fn new() -> Self {
        Self::default()
    }

    /// A data source already bound to `client`.
    pub fn with_client(client: ProviderData) -> Self {
        Self {
            client: ArcSwapOption::new(Some(client)),
        }
    }

    /// Whether a client has been bound.
    pub fn is_configured(&self) -> bool {
        self.client.load().is_some()
    }

    /// Fetch `key` in `environment` and map it to state.
    ///
    /// Non-fatal findings, such as a non-2xx status under the passthrough
    /// policy or an unknown discriminator, are added to `diagnostics` as
    /// warnings.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Configuration`] if no client is bound
    /// - any error of [`crate::client::ConfigClient::get_config_value_response`]
    pub async fn read_value(
        &self,
        cancel: &CancellationToken,
        environment: &str,
        key: &str,
        diagnostics: &mut Diagnostics,
    ) -> Result<ConfigValueModel> {
        self.read_model(cancel, &ConfigValueModel::new(environment, key), diagnostics)
            .await
    }

    async fn read_model(
        &self,
        cancel: &CancellationToken,
        config: &ConfigValueModel,
        diagnostics: &mut Diagnostics,
    ) -> Result<ConfigValueModel> {
        let client = self.client.load_full().ok_or_else(|| {
            ProviderError::Configuration(
                "the data source was read before the provider was configured".to_string(),
            )
        })?;

        let environment = config.environment_name();
        let key = config.key_name();
        let response = client
            .get_config_value_response(cancel, environment, key)
            .await?;

        if !response.status.is_success() {
            diagnostics.add_warning(
                "Unexpected HTTP Status",
                format!(
                    "config-db answered {} for key '{}' in environment '{}'; \
                     the value attributes may be empty",
                    response.status, key, environment
                ),
            );
        }

        let value = response.body.unwrap_or_default();
        if !value.value_type.is_known() {
            warn!(
                value_type = %value.value_type,
                %environment,
                %key,
                "config value has an unknown value type"
            );
            diagnostics.add_warning(
                "Unknown Value Type",
                format!(
                    "Value type '{}' of key '{}' is not one of string, integer, float, boolean; \
                     no value attribute was set",
                    value.value_type, key
                ),
            );
        }

        Ok(apply_config_value(config, &value))
    }
}

#[async_trait]
impl DataSource for ConfigValueDataSource {
    fn type_name(&self, provider_type_name: &str) -> String {
        format!("{}_config_value", provider_type_name)
    }

    fn schema(&self) -> Schema {
        Schema::new("Configuration data source, used for retrieving a key for a given environment")
            .with_attribute(
                "key",
                Attribute::optional_string()
                    .with_description("Configuration key to retrieve for environment"),
            )
            .with_attribute(
                "environment",
                Attribute::optional_string()
                    .with_description("Name of the environment to get the configuration for"),
            )
            .with_attribute(
                "str_value",
                Attribute::optional_string()
                    .with_description("String value stored at key if key is a string type"),
            )
            .with_attribute(
                "int_value",
                Attribute::optional_int64()
                    .with_description("Integer value stored at key if key is an integer type"),
            )
            .with_attribute(
                "float_value",
                Attribute::optional_float64()
                    .with_description("Float value stored at key if key is a float type"),
            )
            .with_attribute(
                "bool_value",
                Attribute::optional_bool()
                    .with_description("Boolean value stored at key if key is a boolean type"),
            )
            .with_attribute(
                "id",
                Attribute::computed_string()
                    .with_description("Unique identifier for this Configuration Value"),
            )
    }

    fn configure(&self, provider_data: Option<ProviderData>, _diagnostics: &mut Diagnostics) {
        if let Some(client) = provider_data {
            self.client.store(Some(client));
        }
    }

    async fn read(&self, cancel: &CancellationToken, request: ReadRequest) -> ReadResponse {
        let mut response = ReadResponse::default();

        let config: ConfigValueModel = match serde_json::from_value(request.config) {
            Ok(config) => config,
            Err(e) => {
                response.diagnostics.add_error(
                    "Invalid Configuration",
                    format!("Unable to decode data source configuration: {}", e),
                );
                return response;
            }
        };

        let state = match self.read_model(cancel, &config, &mut response.diagnostics).await {
            Ok(state) => state,
            Err(e) => {
                response.diagnostics.add_provider_error(
                    &e,
                    format!("Unable to read configuration value, got error: {}", e),
                );
                return response;
            }
        };

        match serde_json::to_value(&state) {
            Ok(state) => response.state = Some(state),
            Err(e) => response.diagnostics.add_error(
                "Invalid State",
                format!("Unable to encode data source state: {}", e),
            ),
        }

        trace!("read a data source");
        response
    }
}
