//! # fieldmap-schema — Declarative Schemas & Construction
//!
//! Declare a schema once as an ordered list of typed fields, then turn raw
//! key/value documents (parsed JSON or YAML) into validated, typed
//! instances.
//!
//! ## Declaring (`definition`, `field`)
//!
//! [`SchemaDefinition::builder`] collects [`FieldSpec`] and
//! [`ListFieldSpec`] descriptors in declaration order. A field names its
//! coercer (a [`ScalarCoercer`] or another schema, which nests), whether it
//! is required, its default, the input key it reads, and its validators.
//!
//! ## Constructing (`engine`, `instance`)
//!
//! [`SchemaDefinition::construct`] runs the [`engine`]: one pass over the
//! fields, fail-fast, every error carrying the dotted path of the offending
//! value. The result is a [`SchemaInstance`] that records which optional
//! fields were absent ([`FieldValue::Missing`]) as distinct from `null`.
//!
//! ## Registry & Manifests (`registry`, `manifest`)
//!
//! [`SchemaRegistry`] indexes schemas and coercers by name and loads
//! schemas declared in YAML or JSON manifests.
//!
//! ## Crate Policy
//!
//! - Depends only on `fieldmap-core` internally.
//! - Definitions are immutable once built and shared as
//!   `Arc<SchemaDefinition>`; construction never mutates its input.
//! - Libraries emit `tracing` events but never install a subscriber.

pub mod coercer;
pub mod definition;
pub mod describe;
pub mod engine;
pub mod field;
pub mod instance;
pub mod manifest;
pub mod registry;
pub mod validator;

pub use coercer::{Coercer, ScalarCoercer};
pub use definition::{ExtraKeys, SchemaBuilder, SchemaDefinition};
pub use engine::construct;
pub use field::{FieldDescriptor, FieldOptions, FieldSpec, ListFieldSpec};
pub use instance::{FieldValue, SchemaInstance};
pub use manifest::{ManifestError, SchemaManifest};
pub use registry::{RegistryError, SchemaRegistry};
pub use validator::{Validator, Validity};

// Core types, so callers need a single dependency.
pub use fieldmap_core::{
    BoxError, CoerceError, DefinitionError, ErrorKind, FieldPath, PathSegment, SchemaError,
};
