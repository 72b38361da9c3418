//! Collects the violations reported during one sanitizer run.

use htmlguard_walker::HtmlChangeListener;
use tracing::debug;

use crate::error::ValidationError;

/// Accumulates discard events and rejected style content in discovery order.
///
/// One collector belongs to one validation call.
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<ValidationError>,
}

impl ErrorCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl HtmlChangeListener for ErrorCollector {
    type ContentError = ValidationError;

    fn discarded_tag(&mut self, element_name: &str) {
        debug!(element = element_name, "policy discarded element");
        self.errors.push(ValidationError::discarded_tag(element_name));
    }

    fn discarded_attributes(&mut self, element_name: &str, attribute_names: &[&str]) {
        debug!(element = element_name, attributes = ?attribute_names, "policy discarded attributes");
        self.errors
            .push(ValidationError::discarded_attributes(element_name, attribute_names));
    }

    fn rejected_content(&mut self, element_name: &str, errors: Vec<ValidationError>) {
        debug!(element = element_name, count = errors.len(), "element content rejected");
        self.errors.extend(errors);
    }
}
