//! # Field Descriptors
//!
//! [`FieldSpec`] declares a single value; [`ListFieldSpec`] declares a
//! homogeneous sequence. Both carry the same options:
//!
//! - `required`: absence of the external key is a `MissingProperty` error.
//! - `default`: value used verbatim when the key is absent.
//! - `key`: external key to read, when it differs from the attribute name.
//! - `validator`: checks on the coerced value, run in declaration order.
//! - `choices`: allowed values, checked after the user validators.
//! - `nullable`: whether an explicit `null` is accepted (default `true`).
//! - `help`, `hidden`: description metadata.
//!
//! A descriptor holds a pipeline of one or more coercers applied in order.

use serde_json::Value;

use crate::coercer::{Coercer, ScalarCoercer};
use crate::instance::FieldValue;
use crate::validator::Validator;

/// Options shared by single and list fields.
#[derive(Debug, Clone)]
pub struct FieldOptions {
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) key: Option<String>,
    pub(crate) validators: Vec<Validator>,
    pub(crate) choices: Option<Vec<Value>>,
    pub(crate) nullable: bool,
    pub(crate) help: Option<String>,
    pub(crate) hidden: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            required: false,
            default: None,
            key: None,
            validators: Vec::new(),
            choices: None,
            nullable: true,
            help: None,
            hidden: false,
        }
    }
}

impl FieldOptions {
    pub fn required(&self) -> bool {
        self.required
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// External key override, if one was declared.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    /// User validators followed by the choice check.
    pub(crate) fn all_validators(&self) -> impl Iterator<Item = Validator> + '_ {
        self.validators
            .iter()
            .cloned()
            .chain(self.choices.clone().map(Validator::choices))
    }
}

macro_rules! field_options {
    ($ty:ty) => {
        impl $ty {
            /// Fail construction when the key is absent.
            pub fn required(mut self) -> Self {
                self.options.required = true;
                self
            }

            /// Value assigned verbatim when the key is absent.
            pub fn default(mut self, value: impl Into<Value>) -> Self {
                self.options.default = Some(value.into());
                self
            }

            /// Read the value from `key` instead of the attribute name.
            pub fn key(mut self, key: impl Into<String>) -> Self {
                self.options.key = Some(key.into());
                self
            }

            /// Append a validator.
            pub fn validator(mut self, validator: Validator) -> Self {
                self.options.validators.push(validator);
                self
            }

            /// Append a boolean predicate as a validator.
            pub fn predicate<F>(self, func: F) -> Self
            where
                F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
            {
                self.validator(Validator::predicate(func))
            }

            /// Restrict the value to a set of choices.
            pub fn choices<I, V>(mut self, choices: I) -> Self
            where
                I: IntoIterator<Item = V>,
                V: Into<Value>,
            {
                let choices: Vec<Value> = choices.into_iter().map(Into::into).collect();
                self.options.choices = (!choices.is_empty()).then_some(choices);
                self
            }

            /// Accept (`true`, the default) or reject an explicit `null`.
            pub fn nullable(mut self, nullable: bool) -> Self {
                self.options.nullable = nullable;
                self
            }

            /// Help text shown in descriptions.
            pub fn help(mut self, help: impl Into<String>) -> Self {
                self.options.help = Some(help.into());
                self
            }

            /// Leave this field out of descriptions.
            pub fn hidden(mut self) -> Self {
                self.options.hidden = true;
                self
            }

            pub fn options(&self) -> &FieldOptions {
                &self.options
            }
        }
    };
}

/// Descriptor for a single value.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub(crate) coercers: Vec<Coercer>,
    pub(crate) options: FieldOptions,
}

impl FieldSpec {
    /// A text field.
    pub fn new() -> Self {
        Self::of(ScalarCoercer::string())
    }

    /// A field converted by `coercer`, either a scalar function or a nested
    /// schema.
    pub fn of(coercer: impl Into<Coercer>) -> Self {
        Self::pipeline([coercer.into()])
    }

    /// A field converted by each coercer in turn.
    pub fn pipeline(coercers: impl IntoIterator<Item = Coercer>) -> Self {
        Self {
            coercers: coercers.into_iter().collect(),
            options: FieldOptions::default(),
        }
    }
}

field_options!(FieldSpec);

/// Descriptor for a homogeneous list. Coercion applies per element; the
/// validators see the whole list.
#[derive(Debug, Clone)]
pub struct ListFieldSpec {
    pub(crate) element: Vec<Coercer>,
    pub(crate) options: FieldOptions,
}

impl ListFieldSpec {
    /// A list of text values.
    pub fn new() -> Self {
        Self::of(ScalarCoercer::string())
    }

    /// A list whose elements are converted by `coercer`.
    pub fn of(coercer: impl Into<Coercer>) -> Self {
        Self::pipeline([coercer.into()])
    }

    /// A list whose elements are converted by each coercer in turn.
    pub fn pipeline(coercers: impl IntoIterator<Item = Coercer>) -> Self {
        Self {
            element: coercers.into_iter().collect(),
            options: FieldOptions::default(),
        }
    }
}

field_options!(ListFieldSpec);

/// A declared field of either shape.
#[derive(Debug, Clone)]
pub enum FieldDescriptor {
    Single(FieldSpec),
    List(ListFieldSpec),
}

impl FieldDescriptor {
    pub fn options(&self) -> &FieldOptions {
        match self {
            Self::Single(f) => &f.options,
            Self::List(f) => &f.options,
        }
    }

    /// The coercer pipeline (per element for lists).
    pub fn coercers(&self) -> &[Coercer] {
        match self {
            Self::Single(f) => &f.coercers,
            Self::List(f) => &f.element,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// External key for attribute `attr`.
    pub fn external_key<'a>(&'a self, attr: &'a str) -> &'a str {
        self.options().key().unwrap_or(attr)
    }

    /// Human-readable type: `integer`, `Address`, `list(date)`,
    /// `mapping -> Event` for pipelines.
    pub fn type_name(&self) -> String {
        let inner = self
            .coercers()
            .iter()
            .map(Coercer::type_name)
            .collect::<Vec<_>>()
            .join(" -> ");
        if self.is_list() {
            format!("list({inner})")
        } else {
            inner
        }
    }
}

impl From<FieldSpec> for FieldDescriptor {
    fn from(f: FieldSpec) -> Self {
        Self::Single(f)
    }
}

impl From<ListFieldSpec> for FieldDescriptor {
    fn from(f: ListFieldSpec) -> Self {
        Self::List(f)
    }
}
