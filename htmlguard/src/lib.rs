//! # htmlguard
//!
//! Validation and sanitization of third-party HTML before it is rendered.
//!
//! Documents are run through an allow-list policy that drops disallowed
//! elements and attributes, forces safe link attributes, and validates the text
//! of `style` elements against a restricted CSS grammar. Every violation is
//! collected, so one call reports the complete set of problems.
//!
//! The policy generation is picked from the document's creation time, which
//! keeps content accepted under an older generation valid when re-checked.
//!
//! ## Quick Start
//!
//! ```rust
//! use htmlguard::{HtmlValidator, ValidationConfig};
//!
//! let validator = HtmlValidator::with_config(ValidationConfig::with_sanitized_output());
//!
//! let outcome = validator.validate_now(b"<html><body></html>");
//! assert!(outcome.ok_for_web());
//! assert_eq!(outcome.sanitized_output(), Some("<html><body></body></html>"));
//!
//! let outcome = validator.validate_now(b"<p>Hi<script>alert(1)</script></p>");
//! assert!(!outcome.ok_for_web());
//! println!("{outcome}");
//! ```

mod collector;
mod config;
mod css;
mod css_properties;
mod error;
mod outcome;
pub mod output;
mod policy;
mod sanitizer;
mod versioning;

pub use collector::ErrorCollector;
pub use config::ValidationConfig;
pub use css::{
    Declaration, StyleRule, escape as escape_css, style_rules, validate as validate_css,
    validate_and_sanitize as validate_and_sanitize_css,
};
pub use css_properties::{PROPERTY_POLICY, PropertyPolicy, STYLING_PROPERTIES, ValueCheck};
pub use error::{SanitizeError, ValidationError, ValidationErrorKind};
pub use outcome::{SANITIZED_OUTPUT_WITHHELD, ValidationOutcome};
pub use policy::{ApiPolicy, policy_for};
pub use sanitizer::sanitize;
pub use versioning::{CSS_VALIDATION_CUTOVER, PolicySelector, PolicyVariant, PolicyVersion};

use chrono::{DateTime, Utc};
use tracing::debug;

/// Validates documents against the policy generation in effect when they were created.
#[derive(Debug, Clone, Default)]
pub struct HtmlValidator {
    config: ValidationConfig,
    selector: PolicySelector,
}

impl HtmlValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            config,
            selector: PolicySelector::default(),
        }
    }

    /// Use a custom set of policy versions instead of the built-in cutover.
    #[must_use]
    pub fn with_selector(mut self, selector: PolicySelector) -> Self {
        self.selector = selector;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate `content`, a UTF-8 document created at `document_created`.
    ///
    /// Invalid UTF-8 sequences are replaced with U+FFFD before sanitizing, and
    /// the sanitized text is compared with the decoded input.
    #[must_use]
    pub fn validate(&self, content: &[u8], document_created: DateTime<Utc>) -> ValidationOutcome {
        let variant = self.selector.select(document_created);
        let html = String::from_utf8_lossy(content);
        debug!(?variant, bytes = content.len(), "validating document");

        match sanitize(&html, variant) {
            Ok(sanitized) if sanitized == html => ValidationOutcome::EVERYTHING_OK,
            Ok(sanitized) => ValidationOutcome::changed(sanitized, &self.config),
            Err(err) => ValidationOutcome::rejected(err.into_errors()),
        }
    }

    /// Validate `content` under the policy in effect right now.
    #[must_use]
    pub fn validate_now(&self, content: &[u8]) -> ValidationOutcome {
        self.validate(content, Utc::now())
    }
}
