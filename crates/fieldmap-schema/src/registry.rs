//! # Schema Registry
//!
//! A [`SchemaRegistry`] indexes schema definitions and scalar coercers by
//! name. It is the resolution context for manifests: a manifest field type
//! is looked up first among the registered coercers, then among the
//! registered schemas.
//!
//! The built-in coercers (`string`, `integer`, `float`, `boolean`, `any`,
//! `mapping`, `sequence`, `date`) are registered on creation.
//!
//! ## Thread Safety
//!
//! Registration takes `&mut self`; once populated the registry can be
//! shared read-only and `construct` called from any number of threads.

use std::collections::BTreeMap;
use std::sync::Arc;

use fieldmap_core::SchemaError;
use serde_json::Value;
use thiserror::Error;

use crate::coercer::{Coercer, ScalarCoercer};
use crate::definition::{ExtraKeys, SchemaDefinition};
use crate::field::{FieldDescriptor, FieldSpec, ListFieldSpec};
use crate::instance::SchemaInstance;
use crate::manifest::{FieldEntry, ManifestError, SchemaEntry, SchemaManifest};

/// Error from a registry lookup or construction.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No schema is registered under this name.
    #[error("unknown schema '{0}'")]
    UnknownSchema(String),

    /// A schema with this name is already registered.
    #[error("schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// Construction failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Named schemas and coercers.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<SchemaDefinition>>,
    coercers: BTreeMap<String, ScalarCoercer>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaRegistry {
    /// A registry holding only the built-in coercers.
    pub fn new() -> Self {
        let coercers = ScalarCoercer::builtins()
            .into_iter()
            .map(|c| (c.name().to_string(), c))
            .collect();
        Self {
            schemas: BTreeMap::new(),
            coercers,
        }
    }

    /// Register a scalar coercer under its own name, replacing and returning
    /// any coercer previously registered under that name.
    pub fn register_coercer(&mut self, coercer: ScalarCoercer) -> Option<ScalarCoercer> {
        self.coercers.insert(coercer.name().to_string(), coercer)
    }

    /// Look up a coercer.
    pub fn coercer(&self, name: &str) -> Option<&ScalarCoercer> {
        self.coercers.get(name)
    }

    /// Register a schema under its name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateSchema` if the name is taken.
    pub fn register(&mut self, schema: Arc<SchemaDefinition>) -> Result<(), RegistryError> {
        if self.schemas.contains_key(schema.name()) {
            return Err(RegistryError::DuplicateSchema(schema.name().to_string()));
        }
        self.schemas.insert(schema.name().to_string(), schema);
        Ok(())
    }

    /// Look up a schema.
    pub fn get(&self, name: &str) -> Option<&Arc<SchemaDefinition>> {
        self.schemas.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Names of all registered schemas, sorted.
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Construct an instance of the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// `UnknownSchema` if no such schema exists, otherwise any
    /// [`SchemaError`] raised by construction.
    pub fn construct(&self, name: &str, input: &Value) -> Result<SchemaInstance, RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::UnknownSchema(name.to_string()))?;
        Ok(schema.construct(input)?)
    }

    /// Load a YAML manifest. Returns the names of the schemas it declared,
    /// in declaration order.
    pub fn load_yaml(&mut self, text: &str) -> Result<Vec<String>, ManifestError> {
        self.load_manifest(SchemaManifest::from_yaml(text)?)
    }

    /// Load a JSON manifest. Returns the names of the schemas it declared.
    pub fn load_json(&mut self, text: &str) -> Result<Vec<String>, ManifestError> {
        self.load_manifest(SchemaManifest::from_json(text)?)
    }

    /// Register every schema in `manifest`.
    ///
    /// Schemas are resolved and registered one at a time, so a schema may
    /// reference any schema declared before it. On error, schemas declared
    /// earlier in the manifest stay registered.
    ///
    /// # Errors
    ///
    /// - `DuplicateSchema` if a name is already registered.
    /// - `UnknownParent` / `UnknownType` for unresolved names.
    /// - `Definition` if the resulting declaration is invalid.
    pub fn load_manifest(&mut self, manifest: SchemaManifest) -> Result<Vec<String>, ManifestError> {
        let mut loaded = Vec::with_capacity(manifest.schemas.len());
        for entry in manifest.schemas {
            if self.contains(&entry.name) {
                return Err(ManifestError::DuplicateSchema(entry.name));
            }
            let schema = self.build_entry(&entry)?;
            tracing::debug!(schema = schema.name(), fields = schema.len(), "registered schema from manifest");
            loaded.push(schema.name().to_string());
            self.schemas.insert(schema.name().to_string(), schema);
        }
        tracing::info!(count = loaded.len(), total = self.len(), "loaded schema manifest");
        Ok(loaded)
    }

    fn build_entry(&self, entry: &SchemaEntry) -> Result<Arc<SchemaDefinition>, ManifestError> {
        let mut builder = SchemaDefinition::builder(entry.name.as_str()).extra_keys(if entry.allow_extra {
            ExtraKeys::Ignore
        } else {
            ExtraKeys::Reject
        });
        if let Some(help) = &entry.help {
            builder = builder.help(help.as_str());
        }
        for parent in &entry.inherits {
            let parent_schema = self.get(parent).ok_or_else(|| ManifestError::UnknownParent {
                schema: entry.name.clone(),
                parent: parent.clone(),
            })?;
            builder = builder.inherit(parent_schema);
        }
        for field in &entry.fields {
            builder = builder.field(field.name.as_str(), self.build_field(&entry.name, field)?);
        }
        Ok(builder.build()?)
    }

    fn build_field(&self, schema: &str, field: &FieldEntry) -> Result<FieldDescriptor, ManifestError> {
        let coercers = match &field.types {
            Some(types) => types
                .names()
                .into_iter()
                .map(|name| self.resolve_type(schema, &field.name, name))
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![Coercer::Scalar(ScalarCoercer::string())],
        };

        macro_rules! apply_options {
            ($spec:expr) => {{
                let mut spec = $spec.nullable(field.nullable);
                if field.required {
                    spec = spec.required();
                }
                if let Some(default) = &field.default {
                    spec = spec.default(default.clone());
                }
                if let Some(key) = &field.key {
                    spec = spec.key(key.as_str());
                }
                if let Some(choices) = &field.choices {
                    spec = spec.choices(choices.iter().cloned());
                }
                if let Some(help) = &field.help {
                    spec = spec.help(help.as_str());
                }
                if field.hidden {
                    spec = spec.hidden();
                }
                spec
            }};
        }

        Ok(if field.list {
            apply_options!(ListFieldSpec::pipeline(coercers)).into()
        } else {
            apply_options!(FieldSpec::pipeline(coercers)).into()
        })
    }

    fn resolve_type(&self, schema: &str, field: &str, name: &str) -> Result<Coercer, ManifestError> {
        if let Some(coercer) = self.coercer(name) {
            return Ok(Coercer::Scalar(coercer.clone()));
        }
        if let Some(nested) = self.get(name) {
            return Ok(Coercer::Nested(Arc::clone(nested)));
        }
        Err(ManifestError::UnknownType {
            schema: schema.to_string(),
            field: field.to_string(),
            type_name: name.to_string(),
        })
    }
}
