use proptest::prelude::*;
use serde_json::Value;

/// Strategy for generating scalar scope arguments
pub fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z_]{1,12}".prop_map(Value::from),
        Just(Value::Null),
    ]
}

/// Strategy for generating scope arguments, including nested mappings and sequences
pub fn argument_strategy() -> impl Strategy<Value = Value> {
    scalar_strategy().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for argument lists of two or more values
pub fn many_arguments_strategy() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec(argument_strategy(), 2..6)
}
