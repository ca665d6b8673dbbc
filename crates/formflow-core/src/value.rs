//! Runtime field values.
//!
//! The shape of a value follows the field type: a boolean for checkboxes,
//! a number for numeric and rating fields, a string for the scalar text
//! types, and an array of strings for multi-select fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The current value of a single field in an in-progress submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Checkbox state.
    Bool(bool),
    /// Number and rating fields.
    Number(f64),
    /// Text, textarea, email, phone, date, time, select, and radio fields.
    Text(String),
    /// Selections of a multi-checkbox field.
    Many(Vec<String>),
}

impl FieldValue {
    /// Whether this value counts as empty.
    ///
    /// Empty string and empty array are empty; booleans and numbers are
    /// always present once set.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Bool(_) | FieldValue::Number(_) => false,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Many(items) => items.is_empty(),
        }
    }

    /// Boolean payload, if this is a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric payload, if this is a numeric value.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String payload, if this is a scalar text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Selection list, if this is a multi-select value.
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            FieldValue::Many(items) => Some(items),
            _ => None,
        }
    }

    /// Type-aware equality used by conditional rules.
    ///
    /// Scalars compare by value within the same shape. An array value on
    /// the left matches when it contains the scalar on the right, so an
    /// `equals` rule against a multi-select controller reads as membership.
    pub fn matches(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::Text(a), FieldValue::Text(b)) => a == b,
            (FieldValue::Many(a), FieldValue::Many(b)) => a == b,
            (FieldValue::Many(items), FieldValue::Text(needle)) => {
                items.iter().any(|item| item == needle)
            }
            _ => false,
        }
    }

    /// Membership test for array values.
    ///
    /// Returns false for scalar values regardless of content.
    pub fn contains(&self, needle: &FieldValue) -> bool {
        let items = match self {
            FieldValue::Many(items) => items,
            _ => return false,
        };
        match needle {
            FieldValue::Text(s) => items.iter().any(|item| item == s),
            FieldValue::Number(n) => items.iter().any(|item| item == &n.to_string()),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Many(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Many(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness() {
        assert!(FieldValue::Text(String::new()).is_empty());
        assert!(FieldValue::Many(vec![]).is_empty());
        assert!(!FieldValue::Text("x".into()).is_empty());
        assert!(!FieldValue::Bool(false).is_empty());
        assert!(!FieldValue::Number(0.0).is_empty());
    }

    #[test]
    fn scalar_matches() {
        assert!(FieldValue::Bool(true).matches(&FieldValue::Bool(true)));
        assert!(!FieldValue::Bool(true).matches(&FieldValue::Bool(false)));
        assert!(FieldValue::Number(4.0).matches(&FieldValue::Number(4.0)));
        assert!(FieldValue::Text("yes".into()).matches(&FieldValue::Text("yes".into())));
        // No cross-shape coercion
        assert!(!FieldValue::Text("true".into()).matches(&FieldValue::Bool(true)));
    }

    #[test]
    fn array_matches_by_membership() {
        let many = FieldValue::Many(vec!["a".into(), "b".into()]);
        assert!(many.matches(&FieldValue::Text("a".into())));
        assert!(!many.matches(&FieldValue::Text("c".into())));
    }

    #[test]
    fn contains_is_array_only() {
        let many = FieldValue::Many(vec!["vegetarian".into()]);
        assert!(many.contains(&FieldValue::Text("vegetarian".into())));
        assert!(!many.contains(&FieldValue::Text("vegan".into())));
        assert!(!FieldValue::Text("vegetarian".into()).contains(&FieldValue::Text("veg".into())));
    }

    #[test]
    fn untagged_json_round_trip() {
        let v: FieldValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FieldValue::Bool(true));

        let v: FieldValue = serde_json::from_str("4.5").unwrap();
        assert_eq!(v, FieldValue::Number(4.5));

        let v: FieldValue = serde_json::from_str("\"hello\"").unwrap();
        assert_eq!(v, FieldValue::Text("hello".into()));

        let v: FieldValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(v, FieldValue::Many(vec!["a".into(), "b".into()]));
    }

    #[test]
    fn display() {
        assert_eq!(FieldValue::Bool(true).to_string(), "true");
        assert_eq!(FieldValue::Text("hi".into()).to_string(), "hi");
        assert_eq!(
            FieldValue::Many(vec!["a".into(), "b".into()]).to_string(),
            "[a, b]"
        );
    }
}
