//! The form definition aggregate: sections plus fields, loaded read-only.
//!
//! Definitions are authored by an external form-builder tool and arrive as
//! data (typically JSON). Everything the engine needs — lookups, ordering,
//! dependents, and load-time validation — lives here; the definition holds
//! no runtime state.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dependency;
use crate::error::DefinitionError;
use crate::field::FieldDefinition;
use crate::section::FormSection;

/// A complete form definition: ordered sections and ordered fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDefinition {
    #[serde(default)]
    pub sections: Vec<FormSection>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormDefinition {
    /// Create an empty definition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a definition from JSON authored by the form-builder tool.
    ///
    /// Parsing does not validate; call [`FormDefinition::validate`] (or let
    /// the engine's session constructor do it) before use.
    pub fn from_json(json: &str) -> Result<Self, DefinitionError> {
        serde_json::from_str(json).map_err(|e| DefinitionError::Deserialization(e.to_string()))
    }

    /// Builder: append a section.
    pub fn with_section(mut self, section: FormSection) -> Self {
        self.sections.push(section);
        self
    }

    /// Builder: append a field.
    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Look up a field by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Look up a section by id.
    pub fn section(&self, id: &str) -> Option<&FormSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Iterate over fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    /// Iterate over sections in declaration order.
    pub fn sections(&self) -> impl Iterator<Item = &FormSection> {
        self.sections.iter()
    }

    /// Number of fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Sections sorted by presentation order (stable for equal keys).
    pub fn ordered_sections(&self) -> Vec<&FormSection> {
        let mut sections: Vec<&FormSection> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.order);
        sections
    }

    /// Fields assigned to a section, sorted by presentation order.
    pub fn fields_in_section(&self, section_id: &str) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self
            .fields
            .iter()
            .filter(|f| f.section_id.as_deref() == Some(section_id))
            .collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Fields with no section assignment, sorted by presentation order.
    pub fn unassigned_fields(&self) -> Vec<&FieldDefinition> {
        let mut fields: Vec<&FieldDefinition> = self
            .fields
            .iter()
            .filter(|f| f.section_id.is_none())
            .collect();
        fields.sort_by_key(|f| f.order);
        fields
    }

    /// Fields whose conditional rule targets the given field.
    pub fn dependents(&self, field_id: &str) -> Vec<&FieldDefinition> {
        self.fields
            .iter()
            .filter(|f| f.depends_on() == Some(field_id))
            .collect()
    }

    /// Validate the definition's structural invariants.
    ///
    /// Collects every problem rather than stopping at the first: duplicate
    /// ids, dangling section or dependency references, self- and cyclic
    /// dependencies, comparison-less operators that need one, and patterns
    /// that fail to compile. A definition with any error is unusable.
    pub fn validate(&self) -> Result<(), Vec<DefinitionError>> {
        let mut errors = Vec::new();

        let mut section_ids = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id.as_str()) {
                errors.push(DefinitionError::DuplicateSectionId(section.id.clone()));
            }
        }

        let mut field_ids = HashSet::new();
        for field in &self.fields {
            if !field_ids.insert(field.id.as_str()) {
                errors.push(DefinitionError::DuplicateFieldId(field.id.clone()));
            }
        }

        for field in &self.fields {
            if let Some(section_id) = &field.section_id {
                if self.section(section_id).is_none() {
                    errors.push(DefinitionError::UnknownSection {
                        field: field.id.clone(),
                        section: section_id.clone(),
                    });
                }
            }

            if let Some(rule) = &field.conditional_rule {
                if rule.depends_on_field_id == field.id {
                    errors.push(DefinitionError::SelfDependency(field.id.clone()));
                } else if self.field(&rule.depends_on_field_id).is_none() {
                    errors.push(DefinitionError::UnknownDependencyTarget {
                        field: field.id.clone(),
                        target: rule.depends_on_field_id.clone(),
                    });
                }

                if rule.operator.needs_comparison() && rule.comparison_value.is_none() {
                    errors.push(DefinitionError::MissingComparisonValue {
                        field: field.id.clone(),
                        operator: rule.operator.to_string(),
                    });
                }
            }

            if let Some(validation) = &field.validation {
                if let Some(pattern) = &validation.pattern {
                    if let Err(e) = Regex::new(pattern) {
                        errors.push(DefinitionError::InvalidPattern {
                            field: field.id.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        let mut reported = HashSet::new();
        for field in &self.fields {
            if let Err(DefinitionError::CyclicDependency(node)) =
                dependency::check_circular(self, &field.id)
            {
                if reported.insert(node.clone()) {
                    errors.push(DefinitionError::CyclicDependency(node));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
