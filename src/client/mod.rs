//! Config-db API client.

mod config_value;
mod http;

pub use config_value::{ConfigValue, TypedValue, ValueType};
pub use http::{
    ApiResponse, ConfigClient, ConfigClientBuilder, RawResponse, RequestSpec, StatusPolicy,
    config_value_path,
};
