//! Form model and definition validation for the formflow engine.
//!
//! A form definition — fields, sections, and per-field conditional rules —
//! is externally authored data. This crate describes that data, the runtime
//! value shapes that go with it, and the load-time validation that keeps a
//! broken definition (dangling references, dependency cycles, invalid
//! patterns) from ever reaching the evaluator.

pub mod definition;
pub mod dependency;
pub mod error;
pub mod field;
pub mod section;
pub mod value;

pub use definition::FormDefinition;
pub use dependency::{check_circular, evaluation_order};
pub use error::DefinitionError;
pub use field::{
    ConditionOperator, ConditionalRule, FieldDefinition, FieldType, ValidationSpec,
};
pub use section::FormSection;
pub use value::FieldValue;
