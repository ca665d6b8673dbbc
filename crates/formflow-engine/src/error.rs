//! Error types for the form session.

use formflow_core::DefinitionError;

use crate::report::ValidationReport;

/// Errors from session construction, navigation, and submission.
///
/// `Rejected` carries the complete validation report for the step that
/// failed; everything else is a misuse of the session API or a failure
/// reported by the submission collaborator.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("form definition failed validation with {} error(s)", .0.len())]
    InvalidDefinition(Vec<DefinitionError>),

    #[error("unknown field {0}")]
    UnknownField(String),

    #[error("section index {0} is out of range")]
    SectionOutOfRange(usize),

    #[error("cannot jump ahead to section {target} from section {current}")]
    SkipAhead { target: usize, current: usize },

    #[error("already at the first section")]
    AtFirstSection,

    #[error("form is not multi-step; section navigation does not apply")]
    NotMultiStep,

    #[error("submission is only allowed from the final section (at {current}, final is {last})")]
    NotAtFinalSection { current: usize, last: usize },

    #[error("validation failed: {0}")]
    Rejected(ValidationReport),

    #[error("submission collaborator rejected the payload: {0}")]
    SubmissionFailed(String),

    #[error("session already submitted")]
    AlreadySubmitted,
}

impl SessionError {
    /// The validation report, when this is a `Rejected` error.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            SessionError::Rejected(report) => Some(report),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Violation;

    #[test]
    fn rejected_exposes_its_report() {
        let mut report = ValidationReport::new();
        report.push(Violation::new("email", "is required"));
        let err = SessionError::Rejected(report);

        assert_eq!(err.report().unwrap().len(), 1);
        assert!(err.to_string().contains("email: is required"));
    }

    #[test]
    fn navigation_errors_display() {
        let err = SessionError::SkipAhead {
            target: 3,
            current: 1,
        };
        assert!(err.to_string().contains("jump ahead"));
        assert!(SessionError::AtFirstSection.to_string().contains("first"));
    }
}
