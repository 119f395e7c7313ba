//! # Validation/Coercion Engine
//!
//! Walks a schema's field descriptors against an input mapping and produces
//! a [`SchemaInstance`], or the first [`SchemaError`] encountered.
//!
//! ## Resolution Per Field
//!
//! 1. Look up the field's external key. Absent: `required` fails with
//!    `MissingProperty`; otherwise the default is assigned verbatim (no
//!    coercion, no validation). Without a default, lists become empty and
//!    single fields become [`FieldValue::Missing`].
//! 2. Present `null`: kept as `null` on nullable fields (lists become
//!    empty), a type error on non-nullable ones. Coercion and validation
//!    are skipped.
//! 3. Otherwise run the coercer pipeline (element-wise for lists). Nested
//!    schemas recurse into this engine with the path extended.
//! 4. Run the validators on the coerced value; lists are validated once as
//!    a whole.
//!
//! ## Invariants
//!
//! - Fail-fast: the first error aborts construction; partially built
//!   instances are never returned.
//! - Validators never see raw input.
//! - Errors from user code outside the taxonomy are returned unchanged.

use fieldmap_core::coerce::kind_of;
use fieldmap_core::{CoerceError, FieldPath, SchemaError};
use serde_json::{Map, Value};

use crate::coercer::Coercer;
use crate::definition::{ExtraKeys, SchemaDefinition};
use crate::field::FieldDescriptor;
use crate::instance::{FieldValue, SchemaInstance};
use crate::validator::Validity;

/// Construct an instance of `schema` from `input`.
///
/// # Errors
///
/// - `Type` if `input` is not a mapping, or a value cannot be coerced.
/// - `NotAList` if a list field holds something other than a sequence.
/// - `MissingProperty` if a required key is absent.
/// - `UnexpectedProperty` if the schema rejects extra keys and one is present.
/// - `Validation` if a validator rejects a value.
/// - `Foreign` for errors raised by user coercers or validators outside the
///   taxonomy.
pub fn construct(schema: &SchemaDefinition, input: &Value) -> Result<SchemaInstance, SchemaError> {
    let root = FieldPath::root();
    let result = match input {
        Value::Object(map) => construct_at(schema, map, &root),
        other => Err(SchemaError::Type {
            path: root,
            expected: schema.name().to_string(),
            reason: Some(format!("expected a mapping, found {}", kind_of(other))),
        }),
    };

    match &result {
        Ok(instance) => tracing::debug!(
            schema = schema.name(),
            fields = instance.len(),
            "constructed schema instance"
        ),
        Err(e) => tracing::debug!(
            schema = schema.name(),
            kind = ?e.kind(),
            error = %e,
            "schema construction failed"
        ),
    }
    result
}

fn construct_at(
    schema: &SchemaDefinition,
    map: &Map<String, Value>,
    path: &FieldPath,
) -> Result<SchemaInstance, SchemaError> {
    if schema.extra_keys() == ExtraKeys::Reject {
        if let Some(extra) = map.keys().find(|key| !schema.reads_key(key)) {
            return Err(SchemaError::UnexpectedProperty { path: path.child(extra.as_str()) });
        }
    }

    let mut values = Vec::with_capacity(schema.len());
    for (name, field) in schema.fields() {
        let field_path = path.child(name);
        let value = resolve_field(field, name, map, &field_path)?;
        values.push((name.to_string(), value));
    }
    Ok(SchemaInstance::new(schema.name(), values))
}

fn resolve_field(
    field: &FieldDescriptor,
    name: &str,
    map: &Map<String, Value>,
    path: &FieldPath,
) -> Result<FieldValue, SchemaError> {
    let options = field.options();
    let key = field.external_key(name);
    tracing::trace!(path = %path, key, "resolving field");

    let raw = match map.get(key) {
        Some(raw) => raw,
        None if options.required() => {
            return Err(SchemaError::MissingProperty { path: path.clone() });
        }
        None => {
            return Ok(match options.default_value() {
                Some(default) => FieldValue::Value(default.clone()),
                None if field.is_list() => FieldValue::List(Vec::new()),
                None => FieldValue::Missing,
            });
        }
    };

    if raw.is_null() {
        return resolve_null(field, path, false);
    }

    let value = match field {
        FieldDescriptor::Single(_) => coerce_value(field, raw, path)?,
        FieldDescriptor::List(_) => {
            let items = raw
                .as_array()
                .ok_or_else(|| SchemaError::NotAList { path: path.clone() })?;
            let mut elements = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let element_path = path.index(i);
                let element = if item.is_null() {
                    resolve_null(field, &element_path, true)?
                } else {
                    coerce_value(field, item, &element_path)?
                };
                elements.push(element);
            }
            FieldValue::List(elements)
        }
    };

    validate(field, &value, path)?;
    Ok(value)
}

/// Null on a nullable field is kept; a null list becomes an empty list,
/// while a null list element stays null.
fn resolve_null(
    field: &FieldDescriptor,
    path: &FieldPath,
    element: bool,
) -> Result<FieldValue, SchemaError> {
    if !field.options().nullable() {
        return Err(SchemaError::Type {
            path: path.clone(),
            expected: field.type_name(),
            reason: Some("value may not be null".to_string()),
        });
    }
    if field.is_list() && !element {
        Ok(FieldValue::List(Vec::new()))
    } else {
        Ok(FieldValue::Value(Value::Null))
    }
}

fn coerce_value(
    field: &FieldDescriptor,
    raw: &Value,
    path: &FieldPath,
) -> Result<FieldValue, SchemaError> {
    let mut current = FieldValue::Value(raw.clone());
    for coercer in field.coercers() {
        current = apply(coercer, current, path)?;
    }
    Ok(current)
}

fn apply(coercer: &Coercer, current: FieldValue, path: &FieldPath) -> Result<FieldValue, SchemaError> {
    match coercer {
        Coercer::Scalar(scalar) => {
            let input = current.to_value().unwrap_or(Value::Null);
            scalar.apply(&input).map(FieldValue::Value).map_err(|e| match e {
                CoerceError::Invalid(reason) => SchemaError::Type {
                    path: path.clone(),
                    expected: scalar.name().to_string(),
                    reason: Some(reason),
                },
                CoerceError::Foreign(err) => SchemaError::Foreign(err),
            })
        }
        Coercer::Nested(schema) => {
            let input = match current {
                FieldValue::Object(instance) if instance.schema_name() == schema.name() => {
                    return Ok(FieldValue::Object(instance));
                }
                other => other.to_value(),
            };
            match input {
                Some(Value::Object(map)) => construct_at(schema, &map, path).map(FieldValue::Object),
                other => Err(SchemaError::Type {
                    path: path.clone(),
                    expected: schema.name().to_string(),
                    reason: Some(format!(
                        "expected a mapping, found {}",
                        other.as_ref().map_or("nothing", kind_of)
                    )),
                }),
            }
        }
    }
}

fn validate(field: &FieldDescriptor, value: &FieldValue, path: &FieldPath) -> Result<(), SchemaError> {
    for validator in field.options().all_validators() {
        match validator.run(value).map_err(SchemaError::Foreign)? {
            Validity::Valid => {}
            Validity::Invalid(message) => {
                return Err(SchemaError::Validation { path: path.clone(), message });
            }
        }
    }
    Ok(())
}
