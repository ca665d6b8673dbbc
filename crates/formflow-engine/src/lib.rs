//! Conditional-visibility evaluation and section progression for
//! data-driven forms.
//!
//! Given a [`FormDefinition`](formflow_core::FormDefinition) and the
//! current values of one submission session, this crate determines which
//! fields are visible, which validation constraints currently apply, and
//! whether the visitor may move between sections or submit. The
//! [`FormSession`] façade ties the pieces together: every value mutation
//! synchronously recomputes visibility before control returns, and the
//! final payload — visible fields only — is handed to a caller-supplied
//! [`SubmissionSink`].

pub mod error;
pub mod report;
pub mod rules;
pub mod session;
pub mod store;
pub mod submit;
pub mod visibility;

pub use error::SessionError;
pub use report::{ValidationReport, Violation};
pub use rules::{check_field, effective_rules, profile, TypeProfile, ValueRule, EMAIL_PATTERN};
pub use session::FormSession;
pub use store::ValueStore;
pub use submit::{SubmissionPayload, SubmissionSink};
pub use visibility::{compute_visibility, is_visible, rule_satisfied};
