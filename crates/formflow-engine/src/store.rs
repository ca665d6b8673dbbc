//! The form value store: field id → current value for one submission
//! session.
//!
//! This is the single source of truth the evaluator and rule compiler read
//! from. It holds no derived state and performs no evaluation of its own;
//! the session wrapper re-runs visibility after every mutation.

use std::collections::BTreeMap;

use formflow_core::FieldValue;

/// Mutable map of field id to current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueStore {
    values: BTreeMap<String, FieldValue>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded from a draft.
    pub fn seeded(values: BTreeMap<String, FieldValue>) -> Self {
        Self { values }
    }

    /// Current value of a field, if any.
    pub fn get(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// Set a field's value, returning the previous one.
    pub fn set(&mut self, field_id: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.values.insert(field_id.into(), value)
    }

    /// Remove a field's value, returning it.
    pub fn remove(&mut self, field_id: &str) -> Option<FieldValue> {
        self.values.remove(field_id)
    }

    /// Whether the field currently holds a non-empty value.
    pub fn has_value(&self, field_id: &str) -> bool {
        self.values.get(field_id).is_some_and(|v| !v.is_empty())
    }

    /// Ids of all fields currently holding a value.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// A copy of the current values.
    pub fn snapshot(&self) -> BTreeMap<String, FieldValue> {
        self.values.clone()
    }

    /// Number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no values at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = ValueStore::new();
        assert!(store.is_empty());

        assert_eq!(store.set("attending", FieldValue::Bool(true)), None);
        assert_eq!(store.get("attending"), Some(&FieldValue::Bool(true)));

        let prev = store.set("attending", FieldValue::Bool(false));
        assert_eq!(prev, Some(FieldValue::Bool(true)));

        assert_eq!(store.remove("attending"), Some(FieldValue::Bool(false)));
        assert_eq!(store.get("attending"), None);
    }

    #[test]
    fn has_value_requires_non_empty() {
        let mut store = ValueStore::new();
        store.set("notes", FieldValue::Text(String::new()));
        assert!(!store.has_value("notes"));

        store.set("notes", FieldValue::Text("gluten free".into()));
        assert!(store.has_value("notes"));

        assert!(!store.has_value("never_set"));
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut store = ValueStore::new();
        store.set("a", FieldValue::Number(1.0));

        let snap = store.snapshot();
        store.set("a", FieldValue::Number(2.0));

        assert_eq!(snap.get("a"), Some(&FieldValue::Number(1.0)));
        assert_eq!(store.get("a"), Some(&FieldValue::Number(2.0)));
    }

    #[test]
    fn seeded_store_starts_with_draft() {
        let mut draft = BTreeMap::new();
        draft.insert("name".to_string(), FieldValue::Text("Ruth".into()));
        let store = ValueStore::seeded(draft);
        assert_eq!(store.len(), 1);
        assert!(store.has_value("name"));
    }
}
