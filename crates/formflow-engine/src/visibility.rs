//! Visibility evaluation over the conditional-rule graph.
//!
//! A pure function of (values, definition): no side effects, identical
//! output for identical input. Fields are walked in dependency order so a
//! hidden controller forces every transitive dependent hidden, no matter
//! what those dependents' own rules would compute.

use std::collections::HashSet;

use formflow_core::{evaluation_order, ConditionOperator, ConditionalRule, FieldValue, FormDefinition};

use crate::store::ValueStore;

/// Evaluate one rule against the controller's current value.
///
/// An unset (or empty) controller never satisfies `equals`, `contains`, or
/// `isNotEmpty` — the dependent stays hidden until the controller is filled
/// in. It satisfies `isEmpty` by definition, and the negated operators by
/// complement.
pub fn rule_satisfied(rule: &ConditionalRule, controller: Option<&FieldValue>) -> bool {
    let present = controller.filter(|v| !v.is_empty());

    match rule.operator {
        ConditionOperator::Equals => match (&rule.comparison_value, present) {
            (Some(expected), Some(actual)) => actual.matches(expected),
            _ => false,
        },
        ConditionOperator::NotEquals => match (&rule.comparison_value, present) {
            (Some(expected), Some(actual)) => !actual.matches(expected),
            (Some(_), None) => true,
            (None, _) => false,
        },
        ConditionOperator::Contains => match (&rule.comparison_value, present) {
            (Some(needle), Some(actual)) => actual.contains(needle),
            _ => false,
        },
        ConditionOperator::NotContains => match (&rule.comparison_value, present) {
            (Some(needle), Some(actual)) => !actual.contains(needle),
            (Some(_), None) => true,
            (None, _) => false,
        },
        ConditionOperator::IsEmpty => present.is_none(),
        ConditionOperator::IsNotEmpty => present.is_some(),
    }
}

/// Compute the set of currently visible field ids.
///
/// A field with no rule is visible. A field with a rule is visible only
/// when its controller is itself visible **and** the rule evaluates true
/// against the controller's value. Evaluation order guarantees the
/// controller's state is settled before any dependent is examined.
pub fn compute_visibility(values: &ValueStore, def: &FormDefinition) -> HashSet<String> {
    let mut visible: HashSet<String> = HashSet::with_capacity(def.field_count());

    for field in evaluation_order(def) {
        let shown = match &field.conditional_rule {
            None => true,
            Some(rule) => {
                let controller = &rule.depends_on_field_id;
                // A dangling target is a load-time error; definitions that
                // reach this point resolve every controller.
                def.field(controller).is_some()
                    && visible.contains(controller.as_str())
                    && rule_satisfied(rule, values.get(controller))
            }
        };
        if shown {
            visible.insert(field.id.clone());
        }
    }

    visible
}

/// Whether a single field is currently visible.
pub fn is_visible(field_id: &str, values: &ValueStore, def: &FormDefinition) -> bool {
    compute_visibility(values, def).contains(field_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_core::{FieldDefinition, FieldType};

    fn eq_rule(target: &str, value: impl Into<FieldValue>) -> ConditionalRule {
        ConditionalRule::new(target, ConditionOperator::Equals, value)
    }

    fn chain_def() -> FormDefinition {
        // attending -> guest_count -> dietary_notes
        FormDefinition::new()
            .with_field(FieldDefinition::new("attending", FieldType::Checkbox))
            .with_field(
                FieldDefinition::new("guest_count", FieldType::Number)
                    .required()
                    .shown_when(eq_rule("attending", true)),
            )
            .with_field(
                FieldDefinition::new("dietary_notes", FieldType::Text).shown_when(
                    ConditionalRule::presence("guest_count", ConditionOperator::IsNotEmpty),
                ),
            )
    }

    #[test]
    fn unconditional_fields_are_visible() {
        let def = FormDefinition::new().with_field(FieldDefinition::new("name", FieldType::Text));
        let visible = compute_visibility(&ValueStore::new(), &def);
        assert!(visible.contains("name"));
    }

    #[test]
    fn unset_controller_keeps_dependent_hidden() {
        let def = chain_def();
        let visible = compute_visibility(&ValueStore::new(), &def);
        assert!(visible.contains("attending"));
        assert!(!visible.contains("guest_count"));
        assert!(!visible.contains("dietary_notes"));
    }

    #[test]
    fn satisfied_rule_reveals_dependent() {
        let def = chain_def();
        let mut values = ValueStore::new();
        values.set("attending", FieldValue::Bool(true));

        let visible = compute_visibility(&values, &def);
        assert!(visible.contains("guest_count"));
        assert!(!visible.contains("dietary_notes"));

        values.set("guest_count", FieldValue::Number(4.0));
        let visible = compute_visibility(&values, &def);
        assert!(visible.contains("dietary_notes"));
    }

    #[test]
    fn hidden_controller_hides_transitively() {
        let def = chain_def();
        let mut values = ValueStore::new();
        // guest_count has a value, so dietary_notes' own rule would pass —
        // but attending=false hides guest_count, which must drag
        // dietary_notes down with it.
        values.set("attending", FieldValue::Bool(false));
        values.set("guest_count", FieldValue::Number(4.0));

        let visible = compute_visibility(&values, &def);
        assert!(!visible.contains("guest_count"));
        assert!(!visible.contains("dietary_notes"));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let def = chain_def();
        let mut values = ValueStore::new();
        values.set("attending", FieldValue::Bool(true));
        values.set("guest_count", FieldValue::Number(2.0));

        let first = compute_visibility(&values, &def);
        let second = compute_visibility(&values, &def);
        assert_eq!(first, second);
    }

    #[test]
    fn not_equals_passes_on_unset() {
        let rule = ConditionalRule::new("x", ConditionOperator::NotEquals, "no");
        assert!(rule_satisfied(&rule, None));
        assert!(rule_satisfied(&rule, Some(&FieldValue::Text("yes".into()))));
        assert!(!rule_satisfied(&rule, Some(&FieldValue::Text("no".into()))));
    }

    #[test]
    fn empty_string_counts_as_unset() {
        let rule = ConditionalRule::new("x", ConditionOperator::Equals, "");
        assert!(!rule_satisfied(&rule, Some(&FieldValue::Text(String::new()))));

        let rule = ConditionalRule::presence("x", ConditionOperator::IsEmpty);
        assert!(rule_satisfied(&rule, Some(&FieldValue::Text(String::new()))));
        assert!(rule_satisfied(&rule, None));
    }

    #[test]
    fn contains_on_multi_select_controller() {
        let rule = ConditionalRule::new("diet", ConditionOperator::Contains, "vegan");
        let selections = FieldValue::Many(vec!["vegan".into(), "halal".into()]);
        assert!(rule_satisfied(&rule, Some(&selections)));

        let rule = ConditionalRule::new("diet", ConditionOperator::Contains, "kosher");
        assert!(!rule_satisfied(&rule, Some(&selections)));
        assert!(!rule_satisfied(&rule, None));
    }

    #[test]
    fn equals_on_multi_select_reads_as_membership() {
        let rule = ConditionalRule::new("diet", ConditionOperator::Equals, "vegan");
        let selections = FieldValue::Many(vec!["vegan".into()]);
        assert!(rule_satisfied(&rule, Some(&selections)));
    }

    #[test]
    fn is_visible_single_field_form() {
        let def = chain_def();
        let mut values = ValueStore::new();
        assert!(!is_visible("guest_count", &values, &def));
        values.set("attending", FieldValue::Bool(true));
        assert!(is_visible("guest_count", &values, &def));
    }
}
