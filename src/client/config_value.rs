//! Configuration value records returned by config-db.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Discriminator naming which payload field of a [`ConfigValue`] is authoritative.
///
/// Unrecognised wire values are kept verbatim in `Other` so they can be
/// reported back to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ValueType {
    /// `"string"`
    String,
    /// `"integer"`
    Integer,
    /// `"float"`
    Float,
    /// `"boolean"`
    Boolean,
    /// Anything else, including the empty string.
    Other(String),
}

impl ValueType {
    /// The wire representation of this discriminator.
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Other(raw) => raw,
        }
    }

    /// Returns `true` for the four discriminators config-db defines.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl Default for ValueType {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ValueType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "string" => Self::String,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "boolean" => Self::Boolean,
            _ => Self::Other(raw),
        }
    }
}

impl From<ValueType> for String {
    fn from(value_type: ValueType) -> Self {
        match value_type {
            ValueType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The payload of a [`ConfigValue`], selected by its discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// A string value.
    Str(String),
    /// A 64-bit integer value.
    Int(i64),
    /// A 64-bit float value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
}

/// A present `null` decodes like an absent field: to the zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A configuration value for one key in one environment.
///
/// Exactly one of the four payload fields is meaningful, the one named by
/// `value_type`; the others hold zero values. Read the payload through
/// [`ConfigValue::typed_value`] rather than the raw fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigValue {
    /// Identifier of the value record.
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    /// Identifier of the environment the value belongs to.
    #[serde(deserialize_with = "null_as_default")]
    pub environment_id: i64,
    /// Identifier of the configuration key.
    #[serde(deserialize_with = "null_as_default")]
    pub configuration_key_id: i64,
    /// Name of the configuration key, as normalised by the service.
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    /// Discriminator for the payload fields below.
    #[serde(deserialize_with = "null_as_default")]
    pub value_type: ValueType,
    /// Payload when `value_type` is `string`.
    #[serde(deserialize_with = "null_as_default")]
    pub str_value: String,
    /// Payload when `value_type` is `integer`.
    #[serde(deserialize_with = "null_as_default")]
    pub int_value: i64,
    /// Payload when `value_type` is `float`.
    #[serde(deserialize_with = "null_as_default")]
    pub float_value: f64,
    /// Payload when `value_type` is `boolean`.
    #[serde(deserialize_with = "null_as_default")]
    pub bool_value: bool,
}

impl ConfigValue {
    /// The authoritative payload, or `None` when the discriminator is unknown.
    pub fn typed_value(&self) -> Option<TypedValue> {
        match &self.value_type {
            ValueType::String => Some(TypedValue::Str(self.str_value.clone())),
            ValueType::Integer => Some(TypedValue::Int(self.int_value)),
            ValueType::Float => Some(TypedValue::Float(self.float_value)),
            ValueType::Boolean => Some(TypedValue::Bool(self.bool_value)),
            ValueType::Other(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_partial_record() {
        let cv: ConfigValue = serde_json::from_str(
            r#"{"id":1,"environment_id":2,"configuration_key_id":3,"key":"feature_x","value_type":"boolean","bool_value":true}"#,
        )
        .unwrap();

        assert_eq!(cv.id, 1);
        assert_eq!(cv.environment_id, 2);
        assert_eq!(cv.configuration_key_id, 3);
        assert_eq!(cv.key, "feature_x");
        assert_eq!(cv.value_type, ValueType::Boolean);
        assert_eq!(cv.str_value, "");
        assert_eq!(cv.int_value, 0);
        assert_eq!(cv.typed_value(), Some(TypedValue::Bool(true)));
    }

    #[test]
    fn test_typed_value_ignores_other_payloads() {
        let cv = ConfigValue {
            value_type: ValueType::Integer,
            str_value: "stale".to_string(),
            int_value: 42,
            bool_value: true,
            ..Default::default()
        };
        assert_eq!(cv.typed_value(), Some(TypedValue::Int(42)));
    }

    #[test]
    fn test_unknown_value_type_is_kept() {
        let cv: ConfigValue =
            serde_json::from_str(r#"{"key":"k","value_type":"json","str_value":"{}"}"#).unwrap();
        assert_eq!(cv.value_type, ValueType::Other("json".to_string()));
        assert!(!cv.value_type.is_known());
        assert_eq!(cv.typed_value(), None);
    }

    #[test]
    fn test_default_has_empty_discriminator() {
        let cv = ConfigValue::default();
        assert_eq!(cv.value_type.as_str(), "");
        assert_eq!(cv.typed_value(), None);
    }

    #[test]
    fn test_value_type_serializes_as_wire_string() {
        let json = serde_json::to_string(&ValueType::Float).unwrap();
        assert_eq!(json, r#""float""#);
    }

    #[test]
    fn test_null_payloads_decode_to_zero_values() {
        let cv: ConfigValue = serde_json::from_str(
            r#"{"id":1,"environment_id":2,"configuration_key_id":3,"key":"feature_x","value_type":"boolean","str_value":null,"int_value":null,"float_value":null,"bool_value":true}"#,
        )
        .unwrap();

        assert_eq!(cv.str_value, "");
        assert_eq!(cv.int_value, 0);
        assert_eq!(cv.float_value, 0.0);
        assert_eq!(cv.typed_value(), Some(TypedValue::Bool(true)));
    }

    #[test]
    fn test_null_value_type_and_ids_decode_to_defaults() {
        let cv: ConfigValue = serde_json::from_str(
            r#"{"id":null,"environment_id":null,"configuration_key_id":null,"key":null,"value_type":null,"bool_value":null}"#,
        )
        .unwrap();

        assert_eq!(cv, ConfigValue::default());
        assert_eq!(cv.typed_value(), None);
    }

    #[test]
    fn test_shape_mismatch_is_an_error() {
        let result: Result<ConfigValue, _> = serde_json::from_str(r#"{"int_value":"ten"}"#);
        assert!(result.is_err());
    }
}
