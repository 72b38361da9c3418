//! The result of validating one document.

use std::fmt;

use serde::Serialize;

use crate::config::ValidationConfig;
use crate::error::ValidationError;

/// Returned in place of the sanitized document unless the caller asked for it.
pub const SANITIZED_OUTPUT_WITHHELD: &str =
    "Sanitized output withheld; enable include_sanitized_output to receive it.";

/// Outcome of one validation call.
///
/// `ok_for_web` is true exactly when `errors` is empty. The sanitized document
/// is only present when sanitizing changed the input, and only verbatim when
/// the caller requested it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationOutcome {
    ok_for_web: bool,
    has_difference_after_sanitizing: bool,
    errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sanitized_output: Option<String>,
}

impl ValidationOutcome {
    /// Safe to render and left untouched by sanitizing.
    pub const EVERYTHING_OK: Self = Self {
        ok_for_web: true,
        has_difference_after_sanitizing: false,
        errors: Vec::new(),
        sanitized_output: None,
    };

    /// Safe to render once sanitized; `sanitized` differs from the input.
    #[must_use]
    pub fn changed(sanitized: String, config: &ValidationConfig) -> Self {
        let sanitized_output = if config.include_sanitized_output {
            sanitized
        } else {
            SANITIZED_OUTPUT_WITHHELD.to_owned()
        };
        Self {
            ok_for_web: true,
            has_difference_after_sanitizing: true,
            errors: Vec::new(),
            sanitized_output: Some(sanitized_output),
        }
    }

    /// Not safe to render. The sanitized document is never attached.
    #[must_use]
    pub fn rejected(errors: Vec<ValidationError>) -> Self {
        Self {
            ok_for_web: errors.is_empty(),
            has_difference_after_sanitizing: false,
            errors,
            sanitized_output: None,
        }
    }

    #[must_use]
    pub fn ok_for_web(&self) -> bool {
        self.ok_for_web
    }

    #[must_use]
    pub fn has_difference_after_sanitizing(&self) -> bool {
        self.has_difference_after_sanitizing
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn errors_count(&self) -> usize {
        self.errors.len()
    }

    /// The sanitized document, or [`SANITIZED_OUTPUT_WITHHELD`], when sanitizing changed the input.
    #[must_use]
    pub fn sanitized_output(&self) -> Option<&str> {
        self.sanitized_output.as_deref()
    }
}

impl fmt::Display for ValidationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ ValidationOutcome")?;
        if self.ok_for_web {
            write!(f, " OK for web")?;
        }
        writeln!(f)?;
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(
            f,
            "{}{}]",
            messages.join(", "),
            self.sanitized_output.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_ok() {
        let outcome = ValidationOutcome::EVERYTHING_OK;
        assert!(outcome.ok_for_web());
        assert!(!outcome.has_difference_after_sanitizing());
        assert!(outcome.sanitized_output().is_none());
        assert_eq!(outcome.to_string(), "[ ValidationOutcome OK for web\n]");
    }

    #[test]
    fn test_changed_withholds_output_by_default() {
        let outcome = ValidationOutcome::changed("<p>x</p>".to_owned(), &ValidationConfig::default());
        assert!(outcome.ok_for_web());
        assert!(outcome.has_difference_after_sanitizing());
        assert_eq!(outcome.sanitized_output(), Some(SANITIZED_OUTPUT_WITHHELD));
    }

    #[test]
    fn test_changed_includes_output_on_request() {
        let outcome =
            ValidationOutcome::changed("<p>x</p>".to_owned(), &ValidationConfig::with_sanitized_output());
        assert_eq!(outcome.sanitized_output(), Some("<p>x</p>"));
        assert_eq!(outcome.to_string(), "[ ValidationOutcome OK for web\n<p>x</p>]");
    }

    #[test]
    fn test_rejected() {
        let outcome = ValidationOutcome::rejected(vec![
            ValidationError::css_structure_invalid(),
            ValidationError::css_selector_empty(),
        ]);
        assert!(!outcome.ok_for_web());
        assert!(!outcome.has_difference_after_sanitizing());
        assert!(outcome.sanitized_output().is_none());
        assert_eq!(outcome.errors_count(), 2);
        assert_eq!(
            outcome.to_string(),
            "[ ValidationOutcome\nCSS in style-element is invalid., CSS selector not found. Indicates illegal css.]"
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(ValidationOutcome::EVERYTHING_OK).unwrap();
        assert_eq!(json["ok_for_web"], true);
        assert_eq!(json["has_difference_after_sanitizing"], false);
        assert!(json.get("sanitized_output").is_none());
    }
}
