use proptest::prelude::*;
use serde_json::Value;
use underwrite_cache::Namespace;

/// Strategy for picking one of the fixed namespaces
pub fn namespace_strategy() -> impl Strategy<Value = Namespace> {
    prop::sample::select(Namespace::ALL.to_vec())
}

/// Strategy for entity keys as they appear after the namespace
pub fn entity_key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_-]{1,24}"
}

/// Strategy for arbitrary JSON documents without floats
pub fn json_value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 :*_-]{0,32}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z_]{1,8}", inner, 0..6)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

/// Strategy for keyword arguments of a memoized call
pub fn kwargs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z_]{1,8}", "[a-z0-9]{0,8}", 0..6)
        .prop_map(|map| map.into_iter().collect())
}
