//! Form sections: ordered groups of fields, optionally rendered as the
//! steps of a multi-step form.

use serde::{Deserialize, Serialize};

fn default_expanded() -> bool {
    true
}

/// An ordered group of fields presented together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSection {
    /// Stable id, unique within a form definition.
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Presentation order; sections render (and step) in this order.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default = "default_expanded")]
    pub default_expanded: bool,
}

impl FormSection {
    /// Create a section with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: None,
            order: 0,
            collapsible: false,
            default_expanded: true,
        }
    }

    /// Builder: set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: set the presentation order.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Builder: make the section collapsible.
    pub fn collapsible(mut self) -> Self {
        self.collapsible = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_builder() {
        let section = FormSection::new("details")
            .with_title("Your details")
            .with_description("Who is registering")
            .with_order(1)
            .collapsible();

        assert_eq!(section.id, "details");
        assert_eq!(section.title, "Your details");
        assert!(section.collapsible);
        assert!(section.default_expanded);
    }

    #[test]
    fn default_expanded_survives_sparse_json() {
        let section: FormSection = serde_json::from_str(r#"{"id":"s1"}"#).unwrap();
        assert!(section.default_expanded);
        assert!(!section.collapsible);
        assert_eq!(section.order, 0);
    }
}
