//! # Error Types — Structured Error Taxonomy
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - Construction is fail-fast: the first problem aborts the whole call and
//!   is returned as one `SchemaError`.
//! - Every taxonomy variant carries the [`FieldPath`] of the offending value,
//!   and its message alone is enough to locate it in the input document.
//! - Errors that are not part of the taxonomy (raised by user coercers or
//!   validators) are carried as `SchemaError::Foreign`. Their message is not
//!   rewritten and the original error stays reachable through `source()`.
//! - Schema declaration problems are a separate type, `DefinitionError`,
//!   raised once when a schema is built rather than on every construction.

use thiserror::Error;

use crate::path::FieldPath;

/// Boxed error raised by user-supplied coercers and validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error raised while constructing a schema instance.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A required field's external key is absent from the input.
    #[error("Missing property: {path}")]
    MissingProperty {
        /// Path of the missing field.
        path: FieldPath,
    },

    /// The input carries a key the schema does not declare, and the schema
    /// rejects extra keys.
    #[error("Encountered unexpected key: {path}")]
    UnexpectedProperty {
        /// Path of the unexpected key.
        path: FieldPath,
    },

    /// The value could not be coerced to the expected type or shape.
    #[error("Property {path} is not of type {expected}{}", suffix(.reason))]
    Type {
        /// Path of the value.
        path: FieldPath,
        /// Name of the coercer or schema that rejected the value.
        expected: String,
        /// Underlying failure reason, when the coercer gave one.
        reason: Option<String>,
    },

    /// A list field received something other than a sequence.
    #[error("Field {path} is not a list")]
    NotAList {
        /// Path of the list field.
        path: FieldPath,
    },

    /// A validator rejected the coerced value.
    #[error("Field '{path}' is invalid{}", suffix(.message))]
    Validation {
        /// Path of the rejected field.
        path: FieldPath,
        /// Custom message supplied by the validator.
        message: Option<String>,
    },

    /// An error raised by user code that is not part of this taxonomy.
    #[error("{0}")]
    Foreign(#[source] BoxError),
}

fn suffix(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

/// Coarse classification of a [`SchemaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required key is absent.
    MissingProperty,
    /// An undeclared key is present under a strict schema.
    UnexpectedProperty,
    /// Coercion or container shape failure (includes non-list values).
    Type,
    /// Validator rejection.
    Validation,
    /// Error raised by user code outside the taxonomy.
    Foreign,
}

impl SchemaError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingProperty { .. } => ErrorKind::MissingProperty,
            Self::UnexpectedProperty { .. } => ErrorKind::UnexpectedProperty,
            Self::Type { .. } | Self::NotAList { .. } => ErrorKind::Type,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Foreign(_) => ErrorKind::Foreign,
        }
    }

    /// Path of the offending value. `None` for foreign errors.
    pub fn path(&self) -> Option<&FieldPath> {
        match self {
            Self::MissingProperty { path }
            | Self::UnexpectedProperty { path }
            | Self::Type { path, .. }
            | Self::NotAList { path }
            | Self::Validation { path, .. } => Some(path),
            Self::Foreign(_) => None,
        }
    }

    /// Returns true for errors about the presence of keys (missing or
    /// unexpected) rather than about their values.
    pub fn is_property_error(&self) -> bool {
        matches!(
            self,
            Self::MissingProperty { .. } | Self::UnexpectedProperty { .. }
        )
    }

    /// Wrap an arbitrary user error without altering it.
    pub fn foreign(err: impl Into<BoxError>) -> Self {
        Self::Foreign(err.into())
    }
}

/// Error raised by a scalar coercer.
#[derive(Error, Debug)]
pub enum CoerceError {
    /// The value cannot be converted. Reported as `SchemaError::Type` at the
    /// field's path with this reason preserved.
    #[error("{0}")]
    Invalid(String),

    /// An unrelated failure inside the coercer. Propagated unchanged as
    /// `SchemaError::Foreign`.
    #[error("{0}")]
    Foreign(#[source] BoxError),
}

impl CoerceError {
    /// Create an invalid-value error.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }

    /// Wrap an unrelated error raised inside a coercer.
    pub fn foreign(err: impl Into<BoxError>) -> Self {
        Self::Foreign(err.into())
    }
}

impl From<std::num::ParseIntError> for CoerceError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for CoerceError {
    fn from(err: std::num::ParseFloatError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<chrono::ParseError> for CoerceError {
    fn from(err: chrono::ParseError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Error in a schema declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The same attribute was declared twice directly on one schema.
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Schema being declared.
        schema: String,
        /// Repeated attribute name.
        field: String,
    },

    /// A field was declared with an empty coercer pipeline.
    #[error("field '{field}' of schema '{schema}' has no coercer")]
    EmptyPipeline {
        /// Schema being declared.
        schema: String,
        /// Offending attribute name.
        field: String,
    },

    /// The schema or one of its attributes has an empty name.
    #[error("schema '{schema}' contains an empty name")]
    EmptyName {
        /// Schema being declared (may itself be empty).
        schema: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> FieldPath {
        s.split('.').collect()
    }

    #[test]
    fn test_missing_property_display() {
        let err = SchemaError::MissingProperty { path: path("events.0.name") };
        assert_eq!(err.to_string(), "Missing property: events.0.name");
        assert_eq!(err.kind(), ErrorKind::MissingProperty);
        assert!(err.is_property_error());
    }

    #[test]
    fn test_type_display_with_and_without_reason() {
        let err = SchemaError::Type {
            path: path("age"),
            expected: "integer".into(),
            reason: None,
        };
        assert_eq!(err.to_string(), "Property age is not of type integer");

        let err = SchemaError::Type {
            path: path("age"),
            expected: "integer".into(),
            reason: Some("invalid digit found in string".into()),
        };
        assert_eq!(
            err.to_string(),
            "Property age is not of type integer: invalid digit found in string"
        );
    }

    #[test]
    fn test_validation_display() {
        let err = SchemaError::Validation { path: path("age"), message: None };
        assert_eq!(err.to_string(), "Field 'age' is invalid");

        let err = SchemaError::Validation {
            path: path("age"),
            message: Some("Wrong".into()),
        };
        assert_eq!(err.to_string(), "Field 'age' is invalid: Wrong");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_not_a_list_is_type_kind() {
        let err = SchemaError::NotAList { path: path("items") };
        assert_eq!(err.to_string(), "Field items is not a list");
        assert_eq!(err.kind(), ErrorKind::Type);
        assert_eq!(err.path(), Some(&path("items")));
    }

    #[test]
    fn test_foreign_message_is_unchanged() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let err = SchemaError::foreign(io);
        assert_eq!(err.to_string(), "disk on fire");
        assert_eq!(err.kind(), ErrorKind::Foreign);
        assert!(err.path().is_none());
        match err {
            SchemaError::Foreign(inner) => assert!(inner.downcast_ref::<std::io::Error>().is_some()),
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_coerce_error_from_parse() {
        let err: CoerceError = "x".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, CoerceError::Invalid(_)));
    }
}
