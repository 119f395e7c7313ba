//! # fieldmap-core — Foundational Types for fieldmap
//!
//! Leaf crate of the fieldmap workspace. It defines the pieces every other
//! crate builds on:
//!
//! 1. **`FieldPath`.** The dotted/indexed location of a value inside the
//!    input document (`events.0.name`). Every error carries one.
//!
//! 2. **One error taxonomy.** `SchemaError` is the single error type raised
//!    while constructing an instance. Missing properties, coercion failures,
//!    and validator rejections are distinct variants; errors raised by user
//!    code that are not part of the taxonomy travel through untouched as
//!    `SchemaError::Foreign`.
//!
//! 3. **Built-in scalar coercers.** `coerce` converts raw JSON values into
//!    strings, integers, floats, booleans, dates, mappings and sequences,
//!    failing with a `CoerceError` that keeps the underlying reason.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `fieldmap-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod coerce;
pub mod error;
pub mod path;

// Re-export primary types for ergonomic imports.
pub use error::{BoxError, CoerceError, DefinitionError, ErrorKind, SchemaError};
pub use path::{FieldPath, PathSegment};
