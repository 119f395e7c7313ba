//! # Schema Descriptions
//!
//! Plain-text listing of a schema's fields, one per line, sorted by
//! attribute name:
//!
//! ```text
//! address (type=Address) - where they live
//!   number (type=integer, required)
//!   street (type=string, required)
//! age (type=integer, required)
//! ```
//!
//! Nested schemas (single or list) are expanded below their field, indented
//! by two spaces. Hidden fields are left out.

use std::cmp::Ordering;

use serde_json::Value;

use crate::definition::SchemaDefinition;
use crate::field::FieldDescriptor;
use crate::validator::render;

/// Choices beyond this count are elided with `, ...`.
const MAX_CHOICES_SHOWN: usize = 10;

impl SchemaDefinition {
    /// Describe the fields of this schema.
    pub fn describe(&self) -> String {
        let mut fields: Vec<(&str, &FieldDescriptor)> = self
            .fields()
            .filter(|(_, field)| !field.options().hidden())
            .collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));

        fields
            .into_iter()
            .map(|(name, field)| format!("{name} {}", describe_field(field)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn describe_field(field: &FieldDescriptor) -> String {
    let options = field.options();
    let mut props = vec![format!("type={}", field.type_name())];
    if options.required() {
        props.push("required".to_string());
    }
    if let Some(default) = options.default_value() {
        props.push(format!("default={}", render(default)));
    }
    if !options.nullable() {
        props.push("non-nullable".to_string());
    }
    if let Some(choices) = options.choices() {
        props.push(format!("choices=[{}]", describe_choices(choices)));
    }

    let nested = field.coercers().last().and_then(|c| c.as_schema());
    let help = options.help().or_else(|| nested.and_then(|s| s.help()));

    let mut desc = format!("({})", props.join(", "));
    if let Some(help) = help {
        desc.push_str(" - ");
        desc.push_str(help);
    }
    if let Some(schema) = nested {
        let body = schema.describe();
        if !body.is_empty() {
            desc.push('\n');
            desc.push_str(&indent(&body, 2));
        }
    }
    desc
}

fn describe_choices(choices: &[Value]) -> String {
    let mut sorted: Vec<&Value> = choices.iter().collect();
    sorted.sort_by(|a, b| compare_values(a, b));
    let mut text = sorted
        .iter()
        .take(MAX_CHOICES_SHOWN)
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(", ");
    if sorted.len() > MAX_CHOICES_SHOWN {
        text.push_str(", ...");
    }
    text
}

/// Strings are single-quoted so `'1'` and `1` stay distinguishable.
fn quote(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

/// Numbers numerically, strings lexically, mixed kinds by kind.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)).then_with(|| a.to_string().cmp(&b.to_string())),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn indent(text: &str, size: usize) -> String {
    let pad = " ".repeat(size);
    text.trim()
        .lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
