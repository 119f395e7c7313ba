//! # Schema Instances
//!
//! A [`SchemaInstance`] is the result of a successful construction: one
//! [`FieldValue`] per declared field, in declaration order. Instances are
//! plain owned data; nested schemas are nested instances and lists are
//! vectors of field values.
//!
//! Instances convert back to plain JSON (`to_value`) and deserialize into
//! caller-defined `serde` types (`deserialize`) for strongly-typed access.

use serde::de::DeserializeOwned;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// The value held by one attribute of a [`SchemaInstance`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// The key was absent from the input and the single-valued field has
    /// no default. Distinct from an explicit JSON `null`.
    Missing,
    /// A scalar (or pass-through) value after coercion, or a default.
    Value(Value),
    /// A nested schema instance.
    Object(SchemaInstance),
    /// The elements of a list field.
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns true for the missing sentinel.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns true for an explicit JSON `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_value().and_then(Value::as_f64)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    pub fn as_object(&self) -> Option<&SchemaInstance> {
        match self {
            Self::Object(inst) => Some(inst),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain JSON form. `None` for [`FieldValue::Missing`]; missing list
    /// elements cannot occur.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::Missing => None,
            Self::Value(v) => Some(v.clone()),
            Self::Object(inst) => Some(inst.to_value()),
            Self::List(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| item.to_value().unwrap_or(Value::Null))
                    .collect(),
            )),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing => serializer.serialize_none(),
            Self::Value(v) => v.serialize(serializer),
            Self::Object(inst) => inst.serialize(serializer),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

/// A validated, coerced instance of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaInstance {
    schema: String,
    values: Vec<(String, FieldValue)>,
}

impl SchemaInstance {
    pub(crate) fn new(schema: impl Into<String>, values: Vec<(String, FieldValue)>) -> Self {
        Self {
            schema: schema.into(),
            values,
        }
    }

    /// Name of the schema this instance was constructed from.
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Value of the declared attribute `attr`.
    pub fn get(&self, attr: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(name, _)| name == attr)
            .map(|(_, value)| value)
    }

    /// Returns true if `attr` is declared and not missing.
    pub fn contains(&self, attr: &str) -> bool {
        self.get(attr).is_some_and(|v| !v.is_missing())
    }

    /// Attributes in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of declared attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Plain JSON object keyed by attribute name. Missing attributes are
    /// omitted; nested instances and lists are converted recursively.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .filter_map(|(name, value)| value.to_value().map(|v| (name.clone(), v)))
            .collect();
        Value::Object(map)
    }

    /// Deserialize into a caller-defined type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.to_value())
    }
}

impl Serialize for SchemaInstance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self.values.iter().filter(|(_, v)| !v.is_missing()).collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (name, value) in present {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
