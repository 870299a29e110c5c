//! Settings supplied by the host in the provider block.

use super::ConfigSource;
use crate::error::{ProviderError, Result};
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Provider block values handed over by the host at configure time.
///
/// Attributes the user left unset arrive as `null` and are skipped, so lower
/// priority sources still apply to them.
pub struct HostSource {
    values: JsonValue,
    priority: i32,
}

impl HostSource {
    /// Wrap the provider block as received from the host.
    pub fn new(values: JsonValue) -> Self {
        Self {
            values,
            priority: 400,
        }
    }

    /// Set the priority for this source.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigSource for HostSource {
    fn load(&self) -> Result<HashMap<String, config::Value>> {
        match &self.values {
            JsonValue::Null => Ok(HashMap::new()),
            JsonValue::Object(map) => {
                let mut result = HashMap::new();
                for (key, value) in map {
                    if value.is_null() {
                        continue;
                    }
                    result.insert(key.clone(), json_value_to_config_value(value)?);
                }
                Ok(result)
            }
            _ => Err(ProviderError::Settings(
                "Expected provider block to be a JSON object".to_string(),
            )),
        }
    }

    fn name(&self) -> String {
        "provider-block".to_string()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// Convert a serde_json::Value to a config::Value.
fn json_value_to_config_value(value: &JsonValue) -> Result<config::Value> {
    match value {
        JsonValue::Null => Ok(config::Value::new(None, config::ValueKind::Nil)),
        JsonValue::Bool(b) => Ok(config::Value::new(None, config::ValueKind::Boolean(*b))),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(config::Value::new(None, config::ValueKind::I64(i)))
            } else if let Some(f) = n.as_f64() {
                Ok(config::Value::new(None, config::ValueKind::Float(f)))
            } else {
                Err(ProviderError::Settings(format!(
                    "Unsupported number type: {}",
                    n
                )))
            }
        }
        JsonValue::String(s) => Ok(config::Value::new(
            None,
            config::ValueKind::String(s.clone()),
        )),
        JsonValue::Array(arr) => {
            let values: Result<Vec<config::Value>> =
                arr.iter().map(json_value_to_config_value).collect();
            Ok(config::Value::new(None, config::ValueKind::Array(values?)))
        }
        JsonValue::Object(map) => {
            let mut result = HashMap::new();
            for (key, val) in map {
                result.insert(key.clone(), json_value_to_config_value(val)?);
            }
            Ok(config::Value::new(None, config::ValueKind::Table(result)))
        }
    }
}
