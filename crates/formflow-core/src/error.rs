//! Error types for form definition loading and validation.

/// Errors found while validating a form definition.
///
/// These are configuration errors: a definition that produces any of them
/// must never be rendered or evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("field {field} references unknown dependency target {target}")]
    UnknownDependencyTarget { field: String, target: String },

    #[error("field {0} depends on itself")]
    SelfDependency(String),

    #[error("cyclic dependency involving field {0}")]
    CyclicDependency(String),

    #[error("field {field} uses operator {operator} without a comparison value")]
    MissingComparisonValue { field: String, operator: String },

    #[error("field {field} references unknown section {section}")]
    UnknownSection { field: String, section: String },

    #[error("duplicate field id {0}")]
    DuplicateFieldId(String),

    #[error("duplicate section id {0}")]
    DuplicateSectionId(String),

    #[error("field {field} declares an invalid pattern: {reason}")]
    InvalidPattern { field: String, reason: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

impl DefinitionError {
    /// Id of the field the error is attached to, where one applies.
    pub fn field_id(&self) -> Option<&str> {
        match self {
            DefinitionError::UnknownDependencyTarget { field, .. }
            | DefinitionError::MissingComparisonValue { field, .. }
            | DefinitionError::UnknownSection { field, .. }
            | DefinitionError::InvalidPattern { field, .. } => Some(field.as_str()),
            DefinitionError::SelfDependency(field)
            | DefinitionError::CyclicDependency(field)
            | DefinitionError::DuplicateFieldId(field) => Some(field.as_str()),
            DefinitionError::DuplicateSectionId(_) | DefinitionError::Deserialization(_) => None,
        }
    }
}
