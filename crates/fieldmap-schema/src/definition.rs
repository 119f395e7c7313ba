//! # Schema Definitions
//!
//! A [`SchemaDefinition`] is a named, ordered list of field descriptors. It
//! is declared once through [`SchemaBuilder`] and is immutable afterwards;
//! definitions are shared as `Arc<SchemaDefinition>` so nested fields and
//! concurrent constructions can reference the same schema.
//!
//! ## Inheritance
//!
//! A builder may inherit the fields of one or more parents. When parents
//! disagree on an attribute the first parent listed wins, and the schema's
//! own declarations override anything inherited.

use std::sync::Arc;

use fieldmap_core::{DefinitionError, SchemaError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine;
use crate::field::FieldDescriptor;
use crate::instance::SchemaInstance;

/// What to do with input keys no field reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraKeys {
    /// Ignore them.
    #[default]
    Ignore,
    /// Fail with `UnexpectedProperty`.
    Reject,
}

/// A declared schema.
#[derive(Debug, Clone)]
pub struct SchemaDefinition {
    name: String,
    fields: Vec<(String, FieldDescriptor)>,
    extra_keys: ExtraKeys,
    help: Option<String>,
}

impl SchemaDefinition {
    /// Start declaring a schema called `name`.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            inherited: Vec::new(),
            own: Vec::new(),
            extra_keys: ExtraKeys::default(),
            help: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    /// The descriptor of attribute `attr`.
    pub fn field(&self, attr: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|(name, _)| name == attr)
            .map(|(_, field)| field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn extra_keys(&self) -> ExtraKeys {
        self.extra_keys
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Returns true if some field reads `key` from the input.
    pub fn reads_key(&self, key: &str) -> bool {
        self.fields
            .iter()
            .any(|(name, field)| field.external_key(name) == key)
    }

    /// Construct a validated instance from `input`.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] encountered; see [`engine::construct`].
    pub fn construct(&self, input: &Value) -> Result<SchemaInstance, SchemaError> {
        engine::construct(self, input)
    }
}

/// Builder for [`SchemaDefinition`].
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    inherited: Vec<(String, FieldDescriptor)>,
    own: Vec<(String, FieldDescriptor)>,
    extra_keys: ExtraKeys,
    help: Option<String>,
}

impl SchemaBuilder {
    /// Declare attribute `name`.
    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDescriptor>) -> Self {
        self.own.push((name.into(), field.into()));
        self
    }

    /// Inherit the fields of `parent`. Attributes already inherited from an
    /// earlier parent are kept.
    pub fn inherit(mut self, parent: &SchemaDefinition) -> Self {
        for (name, field) in &parent.fields {
            if !self.inherited.iter().any(|(n, _)| n == name) {
                self.inherited.push((name.clone(), field.clone()));
            }
        }
        self
    }

    /// Policy for undeclared input keys.
    pub fn extra_keys(mut self, policy: ExtraKeys) -> Self {
        self.extra_keys = policy;
        self
    }

    /// Help text shown when this schema is nested in a description.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Finish the declaration.
    ///
    /// # Errors
    ///
    /// - `DuplicateField` if an attribute is declared twice on this schema.
    /// - `EmptyPipeline` if a field has no coercer.
    /// - `EmptyName` if the schema or an attribute name is empty.
    pub fn build(self) -> Result<Arc<SchemaDefinition>, DefinitionError> {
        if self.name.is_empty() {
            return Err(DefinitionError::EmptyName { schema: self.name });
        }

        for (i, (name, field)) in self.own.iter().enumerate() {
            if name.is_empty() {
                return Err(DefinitionError::EmptyName { schema: self.name.clone() });
            }
            if self.own[..i].iter().any(|(n, _)| n == name) {
                return Err(DefinitionError::DuplicateField {
                    schema: self.name.clone(),
                    field: name.clone(),
                });
            }
            if field.coercers().is_empty() {
                return Err(DefinitionError::EmptyPipeline {
                    schema: self.name.clone(),
                    field: name.clone(),
                });
            }
        }

        let mut fields: Vec<(String, FieldDescriptor)> = self
            .inherited
            .into_iter()
            .filter(|(name, _)| !self.own.iter().any(|(n, _)| n == name))
            .collect();
        fields.extend(self.own);

        Ok(Arc::new(SchemaDefinition {
            name: self.name,
            fields,
            extra_keys: self.extra_keys,
            help: self.help,
        }))
    }
}
