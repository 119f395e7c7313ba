//! # Coercers
//!
//! A field's coercer is either a scalar conversion function or a nested
//! schema. The two cases are a tagged variant ([`Coercer`]) so the engine
//! dispatches with an exhaustive `match` instead of probing what it was
//! given.

use std::fmt;
use std::sync::Arc;

use fieldmap_core::coerce;
use fieldmap_core::CoerceError;
use serde_json::Value;

use crate::definition::SchemaDefinition;

/// Signature of a scalar conversion function.
pub type CoerceFn = dyn Fn(&Value) -> Result<Value, CoerceError> + Send + Sync;

/// A named scalar conversion function.
///
/// The name appears in type errors (`Property age is not of type integer`)
/// and in schema descriptions.
#[derive(Clone)]
pub struct ScalarCoercer {
    name: String,
    func: Arc<CoerceFn>,
}

impl ScalarCoercer {
    /// Wrap a user-supplied conversion function.
    ///
    /// Return [`CoerceError::Invalid`] to report a type error at the field's
    /// path; return [`CoerceError::Foreign`] for failures that should reach
    /// the caller untouched.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, CoerceError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Name shown in errors and descriptions.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the conversion.
    pub fn apply(&self, value: &Value) -> Result<Value, CoerceError> {
        (self.func)(value)
    }

    /// Text coercer; the default for fields that declare none.
    pub fn string() -> Self {
        Self::new("string", coerce::to_string)
    }

    pub fn integer() -> Self {
        Self::new("integer", coerce::to_integer)
    }

    pub fn float() -> Self {
        Self::new("float", coerce::to_float)
    }

    pub fn boolean() -> Self {
        Self::new("boolean", coerce::to_boolean)
    }

    /// Pass-through; the field exposes exactly the input value.
    pub fn any() -> Self {
        Self::new("any", coerce::identity)
    }

    pub fn mapping() -> Self {
        Self::new("mapping", coerce::to_mapping)
    }

    pub fn sequence() -> Self {
        Self::new("sequence", coerce::to_sequence)
    }

    /// Calendar dates normalized to `YYYY-MM-DD`.
    pub fn date() -> Self {
        Self::new("date", coerce::to_date)
    }

    /// All built-in coercers, in the order they are registered by default.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::string(),
            Self::integer(),
            Self::float(),
            Self::boolean(),
            Self::any(),
            Self::mapping(),
            Self::sequence(),
            Self::date(),
        ]
    }
}

impl fmt::Debug for ScalarCoercer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ScalarCoercer").field(&self.name).finish()
    }
}

/// How a raw value is turned into a field value.
#[derive(Debug, Clone)]
pub enum Coercer {
    /// Convert with a scalar function.
    Scalar(ScalarCoercer),
    /// Construct a nested instance of another schema.
    Nested(Arc<SchemaDefinition>),
}

impl Coercer {
    /// Type name used in errors and descriptions.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(s) => s.name(),
            Self::Nested(schema) => schema.name(),
        }
    }

    /// The nested schema, if this coercer is one.
    pub fn as_schema(&self) -> Option<&Arc<SchemaDefinition>> {
        match self {
            Self::Nested(schema) => Some(schema),
            Self::Scalar(_) => None,
        }
    }
}

impl From<ScalarCoercer> for Coercer {
    fn from(s: ScalarCoercer) -> Self {
        Self::Scalar(s)
    }
}

impl From<Arc<SchemaDefinition>> for Coercer {
    fn from(schema: Arc<SchemaDefinition>) -> Self {
        Self::Nested(schema)
    }
}

impl From<&Arc<SchemaDefinition>> for Coercer {
    fn from(schema: &Arc<SchemaDefinition>) -> Self {
        Self::Nested(Arc::clone(schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_coercer_applies() {
        let plus_one = ScalarCoercer::new("plus_one", |v| {
            let n = v.as_i64().ok_or_else(|| CoerceError::invalid("not an int"))?;
            Ok(json!(n + 1))
        });
        assert_eq!(plus_one.apply(&json!(1)).unwrap(), json!(2));
        assert!(plus_one.apply(&json!("x")).is_err());
        assert_eq!(format!("{plus_one:?}"), "ScalarCoercer(\"plus_one\")");
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<String> = ScalarCoercer::builtins()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let before = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_type_name_of_nested() {
        let schema = SchemaDefinition::builder("Address").build().unwrap();
        let c = Coercer::from(&schema);
        assert_eq!(c.type_name(), "Address");
        assert!(c.as_schema().is_some());
        assert!(Coercer::from(ScalarCoercer::any()).as_schema().is_none());
    }
}
