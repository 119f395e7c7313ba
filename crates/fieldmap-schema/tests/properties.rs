//! Property tests for construction.

use fieldmap_schema::{
    ErrorKind, FieldSpec, FieldValue, ListFieldSpec, ScalarCoercer, SchemaDefinition,
};
use proptest::prelude::*;
use serde_json::{json, Map, Value};

/// Arbitrary JSON values without floats.
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9_ ]{0,30}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn identity_coercer_returns_input(value in json_value()) {
        let schema = SchemaDefinition::builder("Identity")
            .field("v", FieldSpec::of(ScalarCoercer::any()))
            .build()
            .unwrap();
        let instance = schema.construct(&json!({ "v": value.clone() })).unwrap();
        prop_assert_eq!(instance.get("v"), Some(&FieldValue::Value(value)));
    }

    #[test]
    fn unknown_keys_are_ignored(
        name in "[a-zA-Z ]{0,20}",
        extra in prop::collection::btree_map("x_[a-z]{1,8}", json_value(), 0..8),
    ) {
        let schema = SchemaDefinition::builder("Tolerant")
            .field("name", FieldSpec::new().required())
            .build()
            .unwrap();
        let mut input: Map<String, Value> = extra.into_iter().collect();
        input.insert("name".into(), Value::String(name.clone()));

        let instance = schema.construct(&Value::Object(input)).unwrap();
        prop_assert_eq!(instance.get("name").and_then(FieldValue::as_str), Some(name.as_str()));
        prop_assert_eq!(instance.len(), 1);
    }

    #[test]
    fn missing_required_reports_dotted_path(parent in "[a-z]{1,8}", attr in "[a-z]{1,8}") {
        let inner = SchemaDefinition::builder("Inner")
            .field(attr.as_str(), FieldSpec::new().required())
            .build()
            .unwrap();
        let outer = SchemaDefinition::builder("Outer")
            .field(parent.as_str(), FieldSpec::of(&inner))
            .build()
            .unwrap();

        let mut input = Map::new();
        input.insert(parent.clone(), json!({}));
        let err = outer.construct(&Value::Object(input)).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::MissingProperty);
        prop_assert_eq!(err.to_string(), format!("Missing property: {parent}.{attr}"));
    }

    #[test]
    fn list_error_reports_element_index(
        values in prop::collection::vec(any::<i32>(), 0..10),
        bad_at in any::<prop::sample::Index>(),
    ) {
        let schema = SchemaDefinition::builder("Numbers")
            .field("values", ListFieldSpec::of(ScalarCoercer::integer()))
            .build()
            .unwrap();

        let mut items: Vec<Value> = values.iter().map(|n| json!(n)).collect();
        let index = bad_at.index(items.len() + 1);
        items.insert(index, json!("not a number"));

        let err = schema.construct(&json!({ "values": items })).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Type);
        let path = err.path().map(ToString::to_string);
        prop_assert_eq!(path, Some(format!("values.{index}")));
    }

    #[test]
    fn integer_strings_coerce_like_integers(n in any::<i64>()) {
        let schema = SchemaDefinition::builder("Int")
            .field("n", FieldSpec::of(ScalarCoercer::integer()))
            .build()
            .unwrap();
        let from_string = schema.construct(&json!({ "n": n.to_string() })).unwrap();
        let from_number = schema.construct(&json!({ "n": n })).unwrap();
        prop_assert_eq!(from_string, from_number);
    }
}
