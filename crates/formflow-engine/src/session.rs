//! One in-progress submission: values, visibility, and step progression.
//!
//! A session owns a validated definition, the value store, and the
//! progression state machine. Every value mutation synchronously
//! recomputes visibility and clears values of fields that just became
//! hidden, so no caller ever observes a partially updated state.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::{debug, trace};
use uuid::Uuid;

use formflow_core::{FieldDefinition, FieldValue, FormDefinition};

use crate::error::SessionError;
use crate::report::ValidationReport;
use crate::rules::{self, ValueRule};
use crate::store::ValueStore;
use crate::submit::{self, SubmissionSink};
use crate::visibility;

/// A live form-filling session for one visitor.
#[derive(Debug)]
pub struct FormSession {
    id: Uuid,
    definition: FormDefinition,
    values: ValueStore,
    visible: HashSet<String>,
    section_index: usize,
    completed: BTreeSet<usize>,
    submitted: bool,
}

impl FormSession {
    /// Open a session over a definition, validating it first.
    ///
    /// A definition that fails validation never produces a session — this
    /// is the gate that keeps broken configurations from being rendered.
    pub fn new(definition: FormDefinition) -> Result<Self, SessionError> {
        Self::with_draft(definition, BTreeMap::new())
    }

    /// Open a session pre-seeded from a draft value map.
    ///
    /// Unknown field ids in the draft are dropped, and seeded values go
    /// through a visibility pass so a stale draft cannot resurrect values
    /// of fields that are hidden under the current definition.
    pub fn with_draft(
        definition: FormDefinition,
        draft: BTreeMap<String, FieldValue>,
    ) -> Result<Self, SessionError> {
        definition
            .validate()
            .map_err(SessionError::InvalidDefinition)?;

        let mut values = ValueStore::new();
        for (field_id, value) in draft {
            if definition.field(&field_id).is_some() {
                values.set(field_id, value);
            } else {
                trace!("dropping draft value for unknown field {}", field_id);
            }
        }

        let mut session = Self {
            id: Uuid::new_v4(),
            definition,
            values,
            visible: HashSet::new(),
            section_index: 0,
            completed: BTreeSet::new(),
            submitted: false,
        };
        let cleared = session.refresh_visibility();
        debug!(
            "session {} opened: {} field(s), {} section(s), {} stale draft value(s) cleared",
            session.id,
            session.definition.field_count(),
            session.definition.section_count(),
            cleared.len()
        );
        Ok(session)
    }

    /// Session id, for log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The validated definition this session runs over.
    pub fn definition(&self) -> &FormDefinition {
        &self.definition
    }

    /// Current value of a field.
    pub fn value(&self, field_id: &str) -> Option<&FieldValue> {
        self.values.get(field_id)
    }

    /// A copy of all current values.
    pub fn values(&self) -> BTreeMap<String, FieldValue> {
        self.values.snapshot()
    }

    /// Set a field's value.
    ///
    /// Visibility is recomputed before this returns; values of fields that
    /// became hidden are cleared and their ids returned.
    pub fn set_value(
        &mut self,
        field_id: &str,
        value: FieldValue,
    ) -> Result<Vec<String>, SessionError> {
        self.ensure_open()?;
        if self.definition.field(field_id).is_none() {
            return Err(SessionError::UnknownField(field_id.to_string()));
        }
        self.values.set(field_id, value);
        let cleared = self.refresh_visibility();
        debug!(
            "field {} updated, {} hidden value(s) cleared",
            field_id,
            cleared.len()
        );
        Ok(cleared)
    }

    /// Remove a field's value, with the same visibility follow-up as
    /// [`FormSession::set_value`].
    pub fn clear_value(&mut self, field_id: &str) -> Result<Vec<String>, SessionError> {
        self.ensure_open()?;
        if self.definition.field(field_id).is_none() {
            return Err(SessionError::UnknownField(field_id.to_string()));
        }
        self.values.remove(field_id);
        Ok(self.refresh_visibility())
    }

    /// Whether a field is currently visible.
    pub fn is_visible(&self, field_id: &str) -> bool {
        self.visible.contains(field_id)
    }

    /// Ids of all currently visible fields.
    pub fn visible_fields(&self) -> &HashSet<String> {
        &self.visible
    }

    /// The rules currently enforced on a field; empty while it is hidden.
    pub fn effective_rules(&self, field_id: &str) -> Vec<ValueRule> {
        rules::effective_rules(field_id, &self.visible, &self.definition)
    }

    /// Check one field against its effective rules.
    pub fn check_field(&self, field_id: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        if let Some(field) = self.definition.field(field_id) {
            self.check_into(&mut report, field);
        }
        report
    }

    /// Validate one step: the section's visible fields, plus the
    /// unassigned fields when it is the last step.
    pub fn validate_step(&self, index: usize) -> ValidationReport {
        let mut report = ValidationReport::new();
        let sections = self.definition.ordered_sections();
        let Some(section) = sections.get(index) else {
            return report;
        };

        for field in self.definition.fields_in_section(&section.id) {
            self.check_into(&mut report, field);
        }
        if index + 1 == sections.len() {
            for field in self.definition.unassigned_fields() {
                self.check_into(&mut report, field);
            }
        }
        report
    }

    /// Validate every visible field across the whole form.
    pub fn validate_all(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        for field in self.definition.fields() {
            self.check_into(&mut report, field);
        }
        report
    }

    /// Index of the active section.
    pub fn section_index(&self) -> usize {
        self.section_index
    }

    /// Indices of sections the visitor has passed validation for.
    pub fn completed_sections(&self) -> &BTreeSet<usize> {
        &self.completed
    }

    /// Whether this form renders as a single step.
    pub fn is_flat(&self) -> bool {
        self.definition.section_count() <= 1
    }

    /// Whether the session has been successfully submitted.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Advance to the next section.
    ///
    /// Gated on the active step passing validation; on success the step is
    /// marked complete and the index moves forward, capped at the last
    /// section.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.ensure_multi_step()?;

        let report = self.validate_step(self.section_index);
        if !report.passed() {
            debug!(
                "advance from section {} blocked: {}",
                self.section_index, report
            );
            return Err(SessionError::Rejected(report));
        }

        self.completed.insert(self.section_index);
        let last = self.definition.section_count() - 1;
        let from = self.section_index;
        self.section_index = (self.section_index + 1).min(last);
        debug!("section {} complete, now at {}", from, self.section_index);
        Ok(())
    }

    /// Step back one section. Never un-completes anything.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.ensure_multi_step()?;
        if self.section_index == 0 {
            return Err(SessionError::AtFirstSection);
        }
        self.section_index -= 1;
        Ok(())
    }

    /// Jump directly to a section already visited or completed.
    ///
    /// Never allows skipping ahead into unvisited territory.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.ensure_multi_step()?;
        if index >= self.definition.section_count() {
            return Err(SessionError::SectionOutOfRange(index));
        }
        if index > self.section_index && !self.completed.contains(&index) {
            return Err(SessionError::SkipAhead {
                target: index,
                current: self.section_index,
            });
        }
        self.section_index = index;
        Ok(())
    }

    /// Validate the terminal step and hand the payload to the collaborator.
    ///
    /// Multi-step forms must be on the last section, which is re-validated
    /// independently; flat forms get one terminal pass over every visible
    /// field. A sink failure leaves all session state intact so the caller
    /// can retry without re-running completed sections.
    pub fn submit(&mut self, sink: &mut dyn SubmissionSink) -> Result<(), SessionError> {
        self.ensure_open()?;

        let sections = self.definition.section_count();
        let report = if sections > 1 {
            let last = sections - 1;
            if self.section_index != last {
                return Err(SessionError::NotAtFinalSection {
                    current: self.section_index,
                    last,
                });
            }
            self.validate_step(last)
        } else {
            self.validate_all()
        };
        if !report.passed() {
            debug!("submit blocked: {}", report);
            return Err(SessionError::Rejected(report));
        }

        let payload = submit::build_payload(self.id, &self.definition, &self.values, &self.visible);
        sink.submit(&payload)
            .map_err(SessionError::SubmissionFailed)?;

        self.submitted = true;
        if sections > 0 {
            self.completed.insert(sections - 1);
        }
        debug!(
            "session {} submitted with {} value(s)",
            self.id,
            payload.values.len()
        );
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.submitted {
            return Err(SessionError::AlreadySubmitted);
        }
        Ok(())
    }

    fn ensure_multi_step(&self) -> Result<(), SessionError> {
        if self.is_flat() {
            return Err(SessionError::NotMultiStep);
        }
        Ok(())
    }

    fn check_into(&self, report: &mut ValidationReport, field: &FieldDefinition) {
        let field_rules = rules::effective_rules(&field.id, &self.visible, &self.definition);
        report.extend(rules::check_field(
            field,
            &field_rules,
            self.values.get(&field.id),
        ));
    }

    /// Recompute visibility and clear values of now-hidden fields.
    ///
    /// Clearing cannot change the result: a hidden field's dependents are
    /// already forced hidden transitively, so one pass settles the state.
    fn refresh_visibility(&mut self) -> Vec<String> {
        self.visible = visibility::compute_visibility(&self.values, &self.definition);
        let stale: Vec<String> = self
            .values
            .field_ids()
            .filter(|id| !self.visible.contains(*id))
            .map(String::from)
            .collect();
        for field_id in &stale {
            self.values.remove(field_id);
        }
        stale
    }
}
