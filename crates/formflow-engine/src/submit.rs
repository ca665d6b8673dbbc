//! The submission boundary.
//!
//! The engine never talks to a backend itself. A validated payload —
//! visible fields only, values normalized per type — is handed to a
//! [`SubmissionSink`] supplied by the caller, which may fail without
//! disturbing any session state.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use formflow_core::{FieldValue, FormDefinition};

use crate::rules::profile;
use crate::store::ValueStore;

/// The value map handed to the submission collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    /// Session the payload was built from.
    pub session_id: Uuid,
    /// Field id → normalized value; hidden and empty fields are absent.
    pub values: BTreeMap<String, FieldValue>,
}

/// External collaborator that persists a finished registration.
pub trait SubmissionSink {
    /// Accept the payload, or reject it with a reason.
    fn submit(&mut self, payload: &SubmissionPayload) -> Result<(), String>;
}

/// Assemble the payload for the current values and visibility set.
pub(crate) fn build_payload(
    session_id: Uuid,
    def: &FormDefinition,
    values: &ValueStore,
    visible: &HashSet<String>,
) -> SubmissionPayload {
    let mut out = BTreeMap::new();
    for field in def.fields() {
        if !visible.contains(&field.id) {
            continue;
        }
        if let Some(value) = values.get(&field.id) {
            if value.is_empty() {
                continue;
            }
            let normalized = (profile(field.field_type).serialize)(value);
            out.insert(field.id.clone(), normalized);
        }
    }
    SubmissionPayload {
        session_id,
        values: out,
    }
}
