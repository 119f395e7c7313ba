//! # Validators
//!
//! Validators check an already-coerced [`FieldValue`]. The outcome is a
//! tagged result: [`Validity::Valid`], or [`Validity::Invalid`] with an
//! optional custom message. A validator may also fail with an unrelated
//! error, which the engine propagates unchanged.

use std::fmt;
use std::sync::Arc;

use fieldmap_core::BoxError;
use serde_json::Value;

use crate::instance::FieldValue;

/// Outcome of a validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    Valid,
    /// Rejected; the message, if any, is appended to
    /// `Field '<path>' is invalid`.
    Invalid(Option<String>),
}

impl Validity {
    /// Rejection with a custom message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(Some(message.into()))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

impl From<bool> for Validity {
    fn from(ok: bool) -> Self {
        if ok {
            Self::Valid
        } else {
            Self::Invalid(None)
        }
    }
}

type ValidateFn = dyn Fn(&FieldValue) -> Result<Validity, BoxError> + Send + Sync;

/// A check run against a field's coerced value.
#[derive(Clone)]
pub struct Validator {
    func: Arc<ValidateFn>,
}

impl Validator {
    /// A boolean predicate; `false` rejects with the generic message.
    pub fn predicate<F>(func: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self::fallible(move |v| Ok(Validity::from(func(v))))
    }

    /// A check that may supply its own rejection message.
    pub fn check<F>(func: F) -> Self
    where
        F: Fn(&FieldValue) -> Validity + Send + Sync + 'static,
    {
        Self::fallible(move |v| Ok(func(v)))
    }

    /// A check that may also fail with an error outside the taxonomy.
    pub fn fallible<F>(func: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<Validity, BoxError> + Send + Sync + 'static,
    {
        Self { func: Arc::new(func) }
    }

    /// Membership check against `choices`. List values have every element
    /// checked.
    pub(crate) fn choices(choices: Vec<Value>) -> Self {
        Self::check(move |value| check_choices(&choices, value))
    }

    /// Run the check.
    pub fn run(&self, value: &FieldValue) -> Result<Validity, BoxError> {
        (self.func)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

fn check_choices(choices: &[Value], value: &FieldValue) -> Validity {
    match value {
        FieldValue::Value(v) if !choices.contains(v) => {
            Validity::invalid(format!("Value '{}' is not a valid choice", render(v)))
        }
        FieldValue::List(items) => items
            .iter()
            .map(|item| check_choices(choices, item))
            .find(|validity| !validity.is_valid())
            .unwrap_or(Validity::Valid),
        _ => Validity::Valid,
    }
}

/// Render a value the way messages quote it: strings without JSON quotes.
pub(crate) fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
