//! Validation outcome reporting.
//!
//! Violations are ordinary values, never exceptions, and a report always
//! carries the complete set for the checked scope so the caller can
//! highlight every offending field at once.

use std::fmt;

use serde::Serialize;

/// One failed constraint on one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Field the constraint applies to.
    pub field_id: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Violation {
    pub fn new(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_id, self.message)
    }
}

/// All violations collected by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    violations: Vec<Violation>,
}

impl ValidationReport {
    /// An empty (passing) report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the pass found no violations.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Whether the report is empty.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The collected violations, in field-check order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Ids of the offending fields, first occurrence order, deduplicated.
    pub fn field_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for v in &self.violations {
            if !ids.contains(&v.field_id.as_str()) {
                ids.push(&v.field_id);
            }
        }
        ids
    }

    /// Append one violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append every violation from an iterator.
    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violations.is_empty() {
            return write!(f, "all constraints satisfied");
        }
        write!(f, "{} violation(s)", self.violations.len())?;
        for v in &self.violations {
            write!(f, "; {v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_passes() {
        let report = ValidationReport::new();
        assert!(report.passed());
        assert_eq!(report.to_string(), "all constraints satisfied");
    }

    #[test]
    fn violations_accumulate() {
        let mut report = ValidationReport::new();
        report.push(Violation::new("email", "is required"));
        report.extend(vec![
            Violation::new("guest_count", "must be at least 1"),
            Violation::new("guest_count", "must be at most 10"),
        ]);

        assert!(!report.passed());
        assert_eq!(report.len(), 3);
        assert_eq!(report.field_ids(), vec!["email", "guest_count"]);
    }

    #[test]
    fn display_lists_every_violation() {
        let mut report = ValidationReport::new();
        report.push(Violation::new("a", "is required"));
        report.push(Violation::new("b", "is required"));

        let text = report.to_string();
        assert!(text.contains("2 violation(s)"));
        assert!(text.contains("a: is required"));
        assert!(text.contains("b: is required"));
    }
}
