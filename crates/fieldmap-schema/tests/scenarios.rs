//! End-to-end scenarios over YAML input documents.
//!
//! Inputs are parsed with `serde_yaml` the way a caller loading a
//! configuration file would. Set `RUST_LOG=fieldmap_schema=trace` to see the
//! per-field resolution events.

use std::sync::Arc;

use fieldmap_schema::{
    ErrorKind, FieldSpec, FieldValue, ListFieldSpec, ScalarCoercer, SchemaDefinition, SchemaError,
    SchemaInstance, SchemaRegistry,
};
use serde_json::{json, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap()
}

fn person() -> Arc<SchemaDefinition> {
    SchemaDefinition::builder("Person")
        .field("name", FieldSpec::new())
        .field(
            "age",
            FieldSpec::of(ScalarCoercer::integer()).predicate(|v| v.as_i64().is_some_and(|n| n > 0)),
        )
        .build()
        .unwrap()
}

fn calendar() -> Arc<SchemaDefinition> {
    let event = SchemaDefinition::builder("Event")
        .field("name", FieldSpec::new().required())
        .field("date", FieldSpec::of(ScalarCoercer::date()).required())
        .build()
        .unwrap();
    SchemaDefinition::builder("Calendar")
        .field("events", ListFieldSpec::of(&event))
        .build()
        .unwrap()
}

#[test]
fn test_person_with_negative_age_is_invalid() {
    init_tracing();
    let err = person()
        .construct(&yaml("name: John\nage: -1\n"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("age"));
    assert_eq!(err.to_string(), "Field 'age' is invalid");
}

#[test]
fn test_person_with_valid_age() {
    init_tracing();
    let p = person().construct(&yaml("name: John\nage: '42'\n")).unwrap();
    assert_eq!(p.get("name").and_then(FieldValue::as_str), Some("John"));
    assert_eq!(p.get("age").and_then(FieldValue::as_i64), Some(42));
}

#[test]
fn test_calendar_event_without_name() {
    init_tracing();
    let err = calendar()
        .construct(&yaml("events:\n  - date: '2014-01-01'\n"))
        .unwrap_err();
    assert!(matches!(err, SchemaError::MissingProperty { .. }));
    assert_eq!(err.to_string(), "Missing property: events.0.name");
}

#[test]
fn test_calendar_with_events() {
    init_tracing();
    let cal = calendar()
        .construct(&yaml(
            "
events:
  - name: launch
    date: 2014-01-01
  - name: review
    date: 2014-02-01T09:30:00Z
",
        ))
        .unwrap();
    assert_eq!(
        cal.to_value(),
        json!({"events": [
            {"name": "launch", "date": "2014-01-01"},
            {"name": "review", "date": "2014-02-01"}
        ]})
    );
}

#[test]
fn test_calendar_bad_date_in_second_event() {
    init_tracing();
    let err = calendar()
        .construct(&yaml(
            "
events:
  - {name: launch, date: '2014-01-01'}
  - {name: review, date: someday}
",
        ))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Type);
    assert_eq!(err.path().map(ToString::to_string).as_deref(), Some("events.1.date"));
}

#[test]
fn test_irregular_key_remap() {
    init_tracing();
    let weird = SchemaDefinition::builder("WeirdData")
        .field("irregular", FieldSpec::new().key("123-this is a bad field"))
        .build()
        .unwrap();
    let data = weird
        .construct(&yaml("'123-this is a bad field': mydata\n"))
        .unwrap();
    assert_eq!(data.get("irregular").and_then(FieldValue::as_str), Some("mydata"));
}

#[test]
fn test_registry_from_manifest_end_to_end() {
    init_tracing();
    let mut registry = SchemaRegistry::new();
    registry
        .load_yaml(
            "
schemas:
  - name: Address
    help: where they live
    fields:
      - name: number
        type: integer
        required: true
      - name: street
        required: true
      - name: suffix
        default: St.
        choices: [St., Ave.]
  - name: Person
    allow_extra: false
    fields:
      - name: name
        required: true
      - name: address
        type: Address
      - name: nicknames
        list: true
",
        )
        .unwrap();

    let doc = yaml(
        "
name: Ada
address:
  number: '12'
  street: Main
nicknames: [countess]
",
    );
    let ada: SchemaInstance = registry.construct("Person", &doc).unwrap();
    let address = ada.get("address").and_then(FieldValue::as_object).unwrap();
    assert_eq!(address.get("number").and_then(FieldValue::as_i64), Some(12));
    assert_eq!(address.get("suffix").and_then(FieldValue::as_str), Some("St."));

    let person = registry.get("Person").unwrap();
    assert_eq!(
        person.describe(),
        "\
address (type=Address) - where they live
  number (type=integer, required)
  street (type=string, required)
  suffix (type=string, default=St., choices=['Ave.', 'St.'])
name (type=string, required)
nicknames (type=list(string))"
    );

    let err = registry
        .construct("Person", &yaml("name: Ada\nage: 36\n"))
        .unwrap_err();
    assert_eq!(err.to_string(), "Encountered unexpected key: age");
}

#[test]
fn test_shared_definition_across_threads() {
    init_tracing();
    let schema = person();
    let handles: Vec<_> = (1..=4)
        .map(|age| {
            let schema = Arc::clone(&schema);
            std::thread::spawn(move || {
                schema
                    .construct(&json!({"name": "n", "age": age}))
                    .map(|p| p.get("age").and_then(FieldValue::as_i64))
            })
        })
        .collect();
    for (handle, age) in handles.into_iter().zip(1..=4) {
        assert_eq!(handle.join().unwrap().unwrap(), Some(age));
    }
}
