//! Property tests for mapping config values onto data source state.

use proptest::prelude::*;
use terraform_provider_cdb::client::{ConfigValue, ValueType};
use terraform_provider_cdb::provider::{ConfigValueModel, apply_config_value};

fn value_type() -> impl Strategy<Value = ValueType> {
    prop_oneof![
        Just(ValueType::String),
        Just(ValueType::Integer),
        Just(ValueType::Float),
        Just(ValueType::Boolean),
        "[a-z]{0,8}".prop_map(ValueType::from),
    ]
}

proptest! {
    #[test]
    fn id_is_built_from_configured_names(
        environment in "[A-Za-z0-9_-]{0,16}",
        key in "[A-Za-z0-9_.-]{0,24}",
        served_key in "[a-z_]{0,24}",
    ) {
        let value = ConfigValue { key: served_key.clone(), ..Default::default() };
        let state = apply_config_value(&ConfigValueModel::new(environment.clone(), key.clone()), &value);

        prop_assert_eq!(state.id, Some(format!("config_value_{}_{}", environment, key)));
        prop_assert_eq!(state.key, Some(served_key));
    }

    #[test]
    fn at_most_one_output_is_set(
        value_type in value_type(),
        str_value in ".{0,8}",
        int_value in any::<i64>(),
        float_value in -1.0e9f64..1.0e9,
        bool_value in any::<bool>(),
    ) {
        let value = ConfigValue {
            key: "k".to_string(),
            value_type: value_type.clone(),
            str_value,
            int_value,
            float_value,
            bool_value,
            ..Default::default()
        };
        let state = apply_config_value(&ConfigValueModel::new("env", "k"), &value);

        let set = [
            state.str_value.is_some(),
            state.int_value.is_some(),
            state.float_value.is_some(),
            state.bool_value.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        prop_assert_eq!(set, usize::from(value_type.is_known()));
        match value_type {
            ValueType::String => prop_assert_eq!(state.str_value, Some(value.str_value)),
            ValueType::Integer => prop_assert_eq!(state.int_value, Some(value.int_value)),
            ValueType::Float => prop_assert_eq!(state.float_value, Some(value.float_value)),
            ValueType::Boolean => prop_assert_eq!(state.bool_value, Some(value.bool_value)),
            ValueType::Other(_) => {}
        }
    }
}
