//! Effective validation rules: what is actually enforced on a field right
//! now, after accounting for visibility.
//!
//! A hidden field has no effective rules, whatever its declaration says.
//! For visible fields the declared `required` flag and validation bounds
//! are translated per field type through a static profile table — one
//! lookup per field instead of an inline per-type branch at every check.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;

use formflow_core::{FieldDefinition, FieldType, FieldValue, FormDefinition};

use crate::report::Violation;

/// Fallback shape check applied to email fields with no declared pattern.
pub const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

/// A concrete predicate enforced on a field's value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValueRule {
    /// A non-empty value must be present.
    Required,
    /// The value must be `true` (consent checkboxes).
    MustAccept,
    /// Minimum text length in characters.
    MinLength(usize),
    /// Maximum text length in characters.
    MaxLength(usize),
    /// The text must match this regular expression.
    Pattern(String),
    /// Lower numeric bound.
    Min(f64),
    /// Upper numeric bound.
    Max(f64),
    /// Earliest accepted date/time (lexical ISO-8601 comparison).
    NotBefore(String),
    /// Latest accepted date/time (lexical ISO-8601 comparison).
    NotAfter(String),
    /// The value must be one of the declared options.
    OneOf(Vec<String>),
    /// Every selection must be one of the declared options.
    SubsetOf(Vec<String>),
    /// At least this many selections, once any are made.
    MinSelected(usize),
    /// At most this many selections.
    MaxSelected(usize),
}

/// Per-type behavior: how to compile declared constraints into rules and
/// how to normalize a value for the submission payload.
pub struct TypeProfile {
    pub compile: fn(&FieldDefinition) -> Vec<ValueRule>,
    pub serialize: fn(&FieldValue) -> FieldValue,
}

static TEXT: TypeProfile = TypeProfile {
    compile: compile_text,
    serialize: serialize_text,
};
static EMAIL: TypeProfile = TypeProfile {
    compile: compile_email,
    serialize: serialize_text,
};
static NUMERIC: TypeProfile = TypeProfile {
    compile: compile_numeric,
    serialize: serialize_numeric,
};
static TEMPORAL: TypeProfile = TypeProfile {
    compile: compile_temporal,
    serialize: serialize_text,
};
static CHOICE: TypeProfile = TypeProfile {
    compile: compile_choice,
    serialize: serialize_text,
};
static CONSENT: TypeProfile = TypeProfile {
    compile: compile_consent,
    serialize: serialize_identity,
};
static MULTI: TypeProfile = TypeProfile {
    compile: compile_multi,
    serialize: serialize_identity,
};

/// Profile for a field type. Phone shares the text profile: permissive
/// unless the definition supplies a pattern.
pub fn profile(field_type: FieldType) -> &'static TypeProfile {
    match field_type {
        FieldType::Text | FieldType::Textarea | FieldType::Phone => &TEXT,
        FieldType::Email => &EMAIL,
        FieldType::Number | FieldType::Rating => &NUMERIC,
        FieldType::Date | FieldType::Time => &TEMPORAL,
        FieldType::Select | FieldType::Radio => &CHOICE,
        FieldType::Checkbox => &CONSENT,
        FieldType::MultiCheckbox => &MULTI,
    }
}

fn compile_text(field: &FieldDefinition) -> Vec<ValueRule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(ValueRule::Required);
    }
    if let Some(v) = &field.validation {
        if let Some(n) = v.min_length {
            rules.push(ValueRule::MinLength(n));
        }
        if let Some(n) = v.max_length {
            rules.push(ValueRule::MaxLength(n));
        }
        if let Some(p) = &v.pattern {
            rules.push(ValueRule::Pattern(p.clone()));
        }
    }
    rules
}

fn compile_email(field: &FieldDefinition) -> Vec<ValueRule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(ValueRule::Required);
    }
    if let Some(v) = &field.validation {
        if let Some(n) = v.min_length {
            rules.push(ValueRule::MinLength(n));
        }
        if let Some(n) = v.max_length {
            rules.push(ValueRule::MaxLength(n));
        }
    }
    let declared = field
        .validation
        .as_ref()
        .and_then(|v| v.pattern.clone());
    rules.push(ValueRule::Pattern(
        declared.unwrap_or_else(|| EMAIL_PATTERN.to_string()),
    ));
    rules
}

fn compile_numeric(field: &FieldDefinition) -> Vec<ValueRule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(ValueRule::Required);
    }
    if let Some(v) = &field.validation {
        if let Some(min) = v.min {
            rules.push(ValueRule::Min(min));
        }
        if let Some(max) = v.max {
            rules.push(ValueRule::Max(max));
        }
    }
    rules
}

fn compile_temporal(field: &FieldDefinition) -> Vec<ValueRule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(ValueRule::Required);
    }
    if let Some(v) = &field.validation {
        if let Some(d) = &v.min_date {
            rules.push(ValueRule::NotBefore(d.clone()));
        }
        if let Some(d) = &v.max_date {
            rules.push(ValueRule::NotAfter(d.clone()));
        }
        if let Some(p) = &v.pattern {
            rules.push(ValueRule::Pattern(p.clone()));
        }
    }
    rules
}

fn compile_choice(field: &FieldDefinition) -> Vec<ValueRule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(ValueRule::Required);
    }
    rules.push(ValueRule::OneOf(field.options.clone()));
    rules
}

fn compile_consent(field: &FieldDefinition) -> Vec<ValueRule> {
    if field.required {
        vec![ValueRule::MustAccept]
    } else {
        Vec::new()
    }
}

fn compile_multi(field: &FieldDefinition) -> Vec<ValueRule> {
    let mut rules = Vec::new();
    if field.required {
        rules.push(ValueRule::Required);
    }
    rules.push(ValueRule::SubsetOf(field.options.clone()));
    if let Some(v) = &field.validation {
        if let Some(n) = v.min_selected {
            rules.push(ValueRule::MinSelected(n));
        }
        if let Some(n) = v.max_selected {
            rules.push(ValueRule::MaxSelected(n));
        }
    }
    rules
}

fn serialize_text(value: &FieldValue) -> FieldValue {
    match value {
        FieldValue::Text(s) => FieldValue::Text(s.trim().to_string()),
        other => other.clone(),
    }
}

fn serialize_numeric(value: &FieldValue) -> FieldValue {
    match value {
        // Tolerate numeric input that arrived as text from the widget.
        FieldValue::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => value.clone(),
        },
        other => other.clone(),
    }
}

fn serialize_identity(value: &FieldValue) -> FieldValue {
    value.clone()
}

/// The rules currently enforced on a field.
///
/// Empty for hidden fields — declared `required` included — and for ids
/// the definition does not know.
pub fn effective_rules(
    field_id: &str,
    visible: &HashSet<String>,
    def: &FormDefinition,
) -> Vec<ValueRule> {
    if !visible.contains(field_id) {
        return Vec::new();
    }
    match def.field(field_id) {
        Some(field) => (profile(field.field_type).compile)(field),
        None => Vec::new(),
    }
}

/// The value shape a field type expects.
fn expected_shape(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::Checkbox => "boolean",
        FieldType::Number | FieldType::Rating => "number",
        FieldType::MultiCheckbox => "array",
        _ => "text",
    }
}

fn shape_matches(field_type: FieldType, value: &FieldValue) -> bool {
    match field_type {
        FieldType::Checkbox => matches!(value, FieldValue::Bool(_)),
        FieldType::Number | FieldType::Rating => matches!(value, FieldValue::Number(_)),
        FieldType::MultiCheckbox => matches!(value, FieldValue::Many(_)),
        _ => matches!(value, FieldValue::Text(_)),
    }
}

/// Check one field's value against its effective rules.
///
/// Returns every violated rule, not just the first. Rules other than
/// `Required` and `MustAccept` only apply once a non-empty value is
/// present — an optional field left blank violates nothing.
pub fn check_field(
    field: &FieldDefinition,
    rules: &[ValueRule],
    value: Option<&FieldValue>,
) -> Vec<Violation> {
    let present = value.filter(|v| !v.is_empty());

    if let Some(v) = present {
        if !shape_matches(field.field_type, v) {
            return vec![Violation::new(
                field.id.clone(),
                format!(
                    "expected a {} value for a {} field",
                    expected_shape(field.field_type),
                    field.field_type
                ),
            )];
        }
    }

    let mut violations = Vec::new();
    for rule in rules {
        if let Some(message) = violation_message(rule, value, present) {
            violations.push(Violation::new(field.id.clone(), message));
        }
    }
    violations
}

fn violation_message(
    rule: &ValueRule,
    raw: Option<&FieldValue>,
    present: Option<&FieldValue>,
) -> Option<String> {
    match rule {
        ValueRule::Required => match present {
            Some(_) => None,
            None => Some("is required".to_string()),
        },
        ValueRule::MustAccept => match raw.and_then(FieldValue::as_bool) {
            Some(true) => None,
            _ => Some("must be accepted".to_string()),
        },
        ValueRule::MinLength(n) => present.and_then(FieldValue::as_text).and_then(|s| {
            (s.chars().count() < *n).then(|| format!("must be at least {n} characters"))
        }),
        ValueRule::MaxLength(n) => present.and_then(FieldValue::as_text).and_then(|s| {
            (s.chars().count() > *n).then(|| format!("must be at most {n} characters"))
        }),
        ValueRule::Pattern(pattern) => {
            let text = present.and_then(FieldValue::as_text)?;
            // Definitions are pattern-checked at load; a miss here means the
            // rule was built outside a validated definition, so fail open.
            let re = Regex::new(pattern).ok()?;
            (!re.is_match(text)).then(|| "is not in the expected format".to_string())
        }
        ValueRule::Min(bound) => present
            .and_then(FieldValue::as_number)
            .and_then(|n| (n < *bound).then(|| format!("must be at least {bound}"))),
        ValueRule::Max(bound) => present
            .and_then(FieldValue::as_number)
            .and_then(|n| (n > *bound).then(|| format!("must be at most {bound}"))),
        ValueRule::NotBefore(earliest) => present
            .and_then(FieldValue::as_text)
            .and_then(|s| (s < earliest.as_str()).then(|| format!("must not be before {earliest}"))),
        ValueRule::NotAfter(latest) => present
            .and_then(FieldValue::as_text)
            .and_then(|s| (s > latest.as_str()).then(|| format!("must not be after {latest}"))),
        ValueRule::OneOf(options) => present.and_then(FieldValue::as_text).and_then(|s| {
            (!options.iter().any(|o| o == s))
                .then(|| "must be one of the offered options".to_string())
        }),
        ValueRule::SubsetOf(options) => present.and_then(FieldValue::as_many).and_then(|items| {
            items
                .iter()
                .find(|&item| !options.contains(item))
                .map(|item| format!("selection {item} is not one of the offered options"))
        }),
        ValueRule::MinSelected(n) => present.and_then(FieldValue::as_many).and_then(|items| {
            (items.len() < *n).then(|| format!("needs at least {n} selections"))
        }),
        ValueRule::MaxSelected(n) => present.and_then(FieldValue::as_many).and_then(|items| {
            (items.len() > *n).then(|| format!("allows at most {n} selections"))
        }),
    }
}
