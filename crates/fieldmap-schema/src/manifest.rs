//! # Schema Manifests
//!
//! Schemas can be declared in data instead of code. A manifest is a YAML or
//! JSON document listing schemas in dependency order; field types name a
//! registered scalar coercer or a schema declared earlier (in the same
//! manifest or already in the registry).
//!
//! ```yaml
//! schemas:
//!   - name: Event
//!     fields:
//!       - name: name
//!         required: true
//!       - name: date
//!         type: date
//!         required: true
//!   - name: Calendar
//!     allow_extra: false
//!     fields:
//!       - name: events
//!         type: Event
//!         list: true
//! ```
//!
//! Validators other than `choices` cannot be expressed in a manifest; add
//! them in code.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use fieldmap_core::DefinitionError;

/// Error while loading a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The YAML document could not be parsed.
    #[error("invalid YAML manifest: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document could not be parsed.
    #[error("invalid JSON manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// A field names a type that is neither a coercer nor a known schema.
    #[error("field '{field}' of schema '{schema}' has unknown type '{type_name}'")]
    UnknownType {
        /// Schema being declared.
        schema: String,
        /// Offending attribute.
        field: String,
        /// The unresolved type name.
        type_name: String,
    },

    /// A schema inherits from a schema that is not declared.
    #[error("schema '{schema}' inherits from unknown schema '{parent}'")]
    UnknownParent {
        /// Schema being declared.
        schema: String,
        /// The unresolved parent name.
        parent: String,
    },

    /// A schema with this name is already registered.
    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// The declaration itself is invalid.
    #[error("invalid schema declaration: {0}")]
    Definition(#[from] DefinitionError),
}

/// Top-level manifest document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaManifest {
    /// Schemas in dependency order.
    pub schemas: Vec<SchemaEntry>,
}

impl SchemaManifest {
    /// Parse a YAML manifest.
    pub fn from_yaml(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a JSON manifest.
    pub fn from_json(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// One schema declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Tolerate undeclared input keys.
    #[serde(default = "default_true")]
    pub allow_extra: bool,
    /// Parents whose fields are inherited; the first listed wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inherits: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

/// One field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldEntry {
    pub name: String,
    /// Coercer or schema name, or a pipeline of them. Defaults to `string`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub types: Option<TypeRef>,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub required: bool,
    /// Default value. `default: null` declares a null default; leaving the
    /// key out declares none.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(default)]
    pub hidden: bool,
}

/// A single type name or a pipeline of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    One(String),
    Pipeline(Vec<String>),
}

impl TypeRef {
    /// The type names in application order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Pipeline(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Any value present under the key, `null` included.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_yaml_defaults() {
        let manifest = SchemaManifest::from_yaml(
            "
schemas:
  - name: Person
    fields:
      - name: name
        required: true
      - name: age
        type: integer
        default: 0
",
        )
        .unwrap();
        let person = &manifest.schemas[0];
        assert!(person.allow_extra);
        assert!(person.inherits.is_empty());
        let name = &person.fields[0];
        assert!(name.types.is_none());
        assert!(name.required);
        assert!(name.nullable);
        assert!(!name.list);
        let age = &person.fields[1];
        assert_eq!(age.types, Some(TypeRef::One("integer".into())));
        assert_eq!(age.default, Some(json!(0)));
    }

    #[test]
    fn test_null_default_is_kept() {
        let manifest = SchemaManifest::from_yaml(
            "
schemas:
  - name: S
    fields:
      - name: nothing
        default: null
      - name: unset
",
        )
        .unwrap();
        let fields = &manifest.schemas[0].fields;
        assert_eq!(fields[0].default, Some(Value::Null));
        assert_eq!(fields[1].default, None);
    }

    #[test]
    fn test_parse_pipeline_type() {
        let manifest = SchemaManifest::from_json(
            r#"{"schemas": [{"name": "S", "fields": [{"name": "v", "type": ["integer", "string"]}]}]}"#,
        )
        .unwrap();
        let types = manifest.schemas[0].fields[0].types.as_ref().unwrap();
        assert_eq!(types.names(), ["integer", "string"]);
    }

    #[test]
    fn test_unknown_manifest_keys_rejected() {
        let err = SchemaManifest::from_yaml("schemas:\n  - name: S\n    colour: blue\n").unwrap_err();
        assert!(matches!(err, ManifestError::Yaml(_)));
    }
}
