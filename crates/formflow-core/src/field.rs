//! Field definitions: types, declared constraints, and conditional rules.
//!
//! A field definition is pure data authored by an external form-builder
//! tool. The engine never mutates it; all runtime state lives in the
//! value store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// The widget/value type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldType {
    Text,
    Textarea,
    Email,
    Phone,
    Number,
    Date,
    Time,
    Select,
    Radio,
    Checkbox,
    MultiCheckbox,
    Rating,
}

impl FieldType {
    /// Whether the field draws its value from a declared option list.
    pub fn is_option_backed(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::MultiCheckbox
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Matches the camelCase wire name so log output reads like the
        // authored definition.
        let name = match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::MultiCheckbox => "multiCheckbox",
            FieldType::Rating => "rating",
        };
        write!(f, "{name}")
    }
}

/// Comparison operator of a conditional visibility rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionOperator {
    /// Whether the operator needs a comparison value to be meaningful.
    pub fn needs_comparison(&self) -> bool {
        !matches!(self, ConditionOperator::IsEmpty | ConditionOperator::IsNotEmpty)
    }
}

impl fmt::Display for ConditionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConditionOperator::Equals => "equals",
            ConditionOperator::NotEquals => "notEquals",
            ConditionOperator::Contains => "contains",
            ConditionOperator::NotContains => "notContains",
            ConditionOperator::IsEmpty => "isEmpty",
            ConditionOperator::IsNotEmpty => "isNotEmpty",
        };
        write!(f, "{name}")
    }
}

/// Visibility dependency of one field on another field's current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    /// Id of the controlling field.
    pub depends_on_field_id: String,
    pub operator: ConditionOperator,
    /// Value compared against the controller; absent for presence checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_value: Option<FieldValue>,
}

impl ConditionalRule {
    /// Rule with a comparison value (`equals`, `contains`, ...).
    pub fn new(
        depends_on: impl Into<String>,
        operator: ConditionOperator,
        comparison: impl Into<FieldValue>,
    ) -> Self {
        Self {
            depends_on_field_id: depends_on.into(),
            operator,
            comparison_value: Some(comparison.into()),
        }
    }

    /// Presence-check rule (`isEmpty` / `isNotEmpty`).
    pub fn presence(depends_on: impl Into<String>, operator: ConditionOperator) -> Self {
        Self {
            depends_on_field_id: depends_on.into(),
            operator,
            comparison_value: None,
        }
    }
}

/// Declared validation bounds; interpretation depends on the field type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValidationSpec {
    /// Lower numeric bound (number/rating).
    pub min: Option<f64>,
    /// Upper numeric bound (number/rating).
    pub max: Option<f64>,
    /// Minimum text length in characters.
    pub min_length: Option<usize>,
    /// Maximum text length in characters.
    pub max_length: Option<usize>,
    /// Regular expression the text value must match.
    pub pattern: Option<String>,
    /// Earliest accepted date/time, ISO-8601, compared lexically.
    pub min_date: Option<String>,
    /// Latest accepted date/time, ISO-8601, compared lexically.
    pub max_date: Option<String>,
    /// Minimum number of selections (multiCheckbox).
    pub min_selected: Option<usize>,
    /// Maximum number of selections (multiCheckbox).
    pub max_selected: Option<usize>,
}

/// Static description of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Stable id, unique within a form definition.
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Display label; opaque to the engine.
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
    /// Declared default; a hidden field is never required.
    #[serde(default)]
    pub required: bool,
    /// Ordered selectable values for option-backed types.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationSpec>,
    /// Absent means always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_rule: Option<ConditionalRule>,
    /// Section this field renders in; absent means unassigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    /// Presentation order within its scope.
    #[serde(default)]
    pub order: i32,
}

impl FieldDefinition {
    /// Create a field with the given id and type.
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: String::new(),
            placeholder: None,
            help_text: None,
            required: false,
            options: Vec::new(),
            validation: None,
            conditional_rule: None,
            section_id: None,
            order: 0,
        }
    }

    /// Builder: set the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Builder: mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Builder: set the option list.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set validation bounds.
    pub fn with_validation(mut self, validation: ValidationSpec) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Builder: attach a conditional visibility rule.
    pub fn shown_when(mut self, rule: ConditionalRule) -> Self {
        self.conditional_rule = Some(rule);
        self
    }

    /// Builder: assign the field to a section.
    pub fn in_section(mut self, section_id: impl Into<String>) -> Self {
        self.section_id = Some(section_id.into());
        self
    }

    /// Builder: set the presentation order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Id of the controlling field, if this field has a rule.
    pub fn depends_on(&self) -> Option<&str> {
        self.conditional_rule
            .as_ref()
            .map(|r| r.depends_on_field_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_builder() {
        let field = FieldDefinition::new("guest_count", FieldType::Number)
            .with_label("Number of guests")
            .required()
            .in_section("details")
            .with_order(2);

        assert_eq!(field.id, "guest_count");
        assert_eq!(field.field_type, FieldType::Number);
        assert!(field.required);
        assert_eq!(field.section_id.as_deref(), Some("details"));
        assert_eq!(field.order, 2);
        assert!(field.conditional_rule.is_none());
    }

    #[test]
    fn depends_on_reads_the_rule() {
        let field = FieldDefinition::new("guest_count", FieldType::Number).shown_when(
            ConditionalRule::new("attending", ConditionOperator::Equals, true),
        );
        assert_eq!(field.depends_on(), Some("attending"));
    }

    #[test]
    fn operator_comparison_requirements() {
        assert!(ConditionOperator::Equals.needs_comparison());
        assert!(ConditionOperator::Contains.needs_comparison());
        assert!(!ConditionOperator::IsEmpty.needs_comparison());
        assert!(!ConditionOperator::IsNotEmpty.needs_comparison());
    }

    #[test]
    fn option_backed_types() {
        assert!(FieldType::Select.is_option_backed());
        assert!(FieldType::Radio.is_option_backed());
        assert!(FieldType::MultiCheckbox.is_option_backed());
        assert!(!FieldType::Text.is_option_backed());
        assert!(!FieldType::Checkbox.is_option_backed());
    }

    #[test]
    fn camel_case_wire_format() {
        let field = FieldDefinition::new("diet", FieldType::MultiCheckbox)
            .with_options(["vegetarian", "vegan"])
            .shown_when(ConditionalRule::new(
                "attending",
                ConditionOperator::Equals,
                true,
            ));

        let json = serde_json::to_string(&field).unwrap();
        assert!(json.contains("\"type\":\"multiCheckbox\""));
        assert!(json.contains("\"dependsOnFieldId\":\"attending\""));
        assert!(json.contains("\"comparisonValue\":true"));

        let back: FieldDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, field);
    }

    #[test]
    fn missing_optionals_deserialize_to_defaults() {
        let json = r#"{"id":"name","type":"text"}"#;
        let field: FieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(field.id, "name");
        assert!(!field.required);
        assert!(field.options.is_empty());
        assert!(field.section_id.is_none());
        assert_eq!(field.order, 0);
    }
}
