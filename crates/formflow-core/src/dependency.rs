//! Dependency analysis over conditional rules.
//!
//! Conditional rules form a directed graph from controlling fields to
//! dependent fields. Each field has at most one outgoing dependency, so
//! the graph is a forest of chains and trees; validation rejects cycles
//! before the engine ever evaluates a definition.

use std::collections::HashSet;

use crate::definition::FormDefinition;
use crate::error::DefinitionError;
use crate::field::FieldDefinition;

/// Check for a circular dependency reachable from `start`.
///
/// Depth-first traversal with a recursion stack; any field revisited while
/// still on the stack closes a cycle. Self-edges are skipped here — they
/// are reported separately as [`DefinitionError::SelfDependency`].
pub fn check_circular(def: &FormDefinition, start: &str) -> Result<(), DefinitionError> {
    let mut visited = HashSet::new();
    let mut stack = HashSet::new();

    fn dfs<'a>(
        def: &'a FormDefinition,
        node: &'a str,
        visited: &mut HashSet<&'a str>,
        stack: &mut HashSet<&'a str>,
    ) -> Result<(), DefinitionError> {
        if stack.contains(node) {
            return Err(DefinitionError::CyclicDependency(node.to_string()));
        }
        if visited.contains(node) {
            return Ok(());
        }

        visited.insert(node);
        stack.insert(node);

        if let Some(field) = def.field(node) {
            match field.depends_on() {
                Some(target) if target != node => dfs(def, target, visited, stack)?,
                _ => {}
            }
        }

        stack.remove(node);
        Ok(())
    }

    let start = match def.field(start) {
        Some(field) => field.id.as_str(),
        None => return Ok(()),
    };
    dfs(def, start, &mut visited, &mut stack)
}

/// Fields in dependency order: every controller before its dependents.
///
/// The order is stable for a given definition — fields are swept in
/// declaration order and emitted as soon as their controller has been
/// emitted. A rule whose target does not exist in the definition is treated
/// as unconditional here; validation reports it separately. Field counts
/// are tens, not thousands, so the quadratic sweep is not a concern.
///
/// Expects a validated (acyclic) definition; any fields left over by a
/// cycle are appended in declaration order so the function stays total.
pub fn evaluation_order(def: &FormDefinition) -> Vec<&FieldDefinition> {
    let ids: HashSet<&str> = def.fields().map(|f| f.id.as_str()).collect();
    let mut placed: HashSet<&str> = HashSet::new();
    let mut result: Vec<&FieldDefinition> = Vec::with_capacity(def.field_count());

    loop {
        let mut progressed = false;
        for field in def.fields() {
            if placed.contains(field.id.as_str()) {
                continue;
            }
            let ready = match field.depends_on() {
                Some(target) if target != field.id => {
                    !ids.contains(target) || placed.contains(target)
                }
                _ => true,
            };
            if ready {
                placed.insert(field.id.as_str());
                result.push(field);
                progressed = true;
            }
        }
        if result.len() == def.field_count() {
            break;
        }
        if !progressed {
            for field in def.fields() {
                if !placed.contains(field.id.as_str()) {
                    result.push(field);
                }
            }
            break;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ConditionOperator, ConditionalRule, FieldDefinition, FieldType};

    fn rule(target: &str) -> ConditionalRule {
        ConditionalRule::new(target, ConditionOperator::Equals, true)
    }

    #[test]
    fn no_cycle_in_a_chain() {
        let def = FormDefinition::new()
            .with_field(FieldDefinition::new("a", FieldType::Checkbox))
            .with_field(FieldDefinition::new("b", FieldType::Checkbox).shown_when(rule("a")))
            .with_field(FieldDefinition::new("c", FieldType::Checkbox).shown_when(rule("b")));

        assert!(check_circular(&def, "a").is_ok());
        assert!(check_circular(&def, "c").is_ok());
    }

    #[test]
    fn two_field_cycle_detected() {
        let def = FormDefinition::new()
            .with_field(FieldDefinition::new("a", FieldType::Checkbox).shown_when(rule("b")))
            .with_field(FieldDefinition::new("b", FieldType::Checkbox).shown_when(rule("a")));

        assert!(check_circular(&def, "a").is_err());
        assert!(check_circular(&def, "b").is_err());
    }

    #[test]
    fn self_edge_is_not_reported_here() {
        let def = FormDefinition::new()
            .with_field(FieldDefinition::new("a", FieldType::Checkbox).shown_when(rule("a")));

        // SelfDependency is validation's job; the traversal skips the edge.
        assert!(check_circular(&def, "a").is_ok());
    }

    #[test]
    fn order_puts_controllers_first() {
        // Declared dependents-first to force reordering.
        let def = FormDefinition::new()
            .with_field(FieldDefinition::new("c", FieldType::Text).shown_when(rule("b")))
            .with_field(FieldDefinition::new("b", FieldType::Checkbox).shown_when(rule("a")))
            .with_field(FieldDefinition::new("a", FieldType::Checkbox));

        let order: Vec<&str> = evaluation_order(&def)
            .into_iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn order_is_stable_across_calls() {
        let def = FormDefinition::new()
            .with_field(FieldDefinition::new("x", FieldType::Text))
            .with_field(FieldDefinition::new("y", FieldType::Text))
            .with_field(FieldDefinition::new("z", FieldType::Text).shown_when(rule("x")));

        let first: Vec<&str> = evaluation_order(&def)
            .into_iter()
            .map(|f| f.id.as_str())
            .collect();
        let second: Vec<&str> = evaluation_order(&def)
            .into_iter()
            .map(|f| f.id.as_str())
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn order_stays_total_on_a_cycle() {
        let def = FormDefinition::new()
            .with_field(FieldDefinition::new("a", FieldType::Checkbox).shown_when(rule("b")))
            .with_field(FieldDefinition::new("b", FieldType::Checkbox).shown_when(rule("a")))
            .with_field(FieldDefinition::new("free", FieldType::Text));

        let order = evaluation_order(&def);
        assert_eq!(order.len(), 3);
    }
}
