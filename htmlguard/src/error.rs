//! Error types for HTML and style-element validation.

use serde::Serialize;

/// The rule a piece of content violated.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ValidationErrorKind {
    /// An element is not on the allow-list and was removed.
    DiscardedTag,
    /// One or more attributes of an allowed element were removed.
    DiscardedAttributes,
    /// The style-element text as a whole is not a flat list of rule sets.
    CssStructureInvalid,
    /// A rule set was found whose selector is empty.
    CssSelectorEmpty,
    /// A declaration block contains a blacklisted token.
    CssBlacklistedToken,
    /// A declaration names a property that is not allowed.
    CssPropertyNotAllowed,
    /// A declaration value is rejected by its property's predicate.
    CssValueNotAllowed,
    /// A declaration block could not be split into declarations.
    CssDeclarationMalformed,
}

/// A single policy violation found in a document.
///
/// `message` is the human-readable description; the optional fields carry
/// whatever context the violation has.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
#[non_exhaustive]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
    /// Offending element name, for discard events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    /// Offending attribute names, for attribute discard events.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attribute_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: String) -> Self {
        Self {
            kind,
            message,
            tag_name: None,
            attribute_names: Vec::new(),
            selector: None,
            property: None,
            value: None,
        }
    }

    #[must_use]
    pub fn discarded_tag(tag_name: &str) -> Self {
        Self {
            tag_name: Some(tag_name.to_owned()),
            ..Self::new(
                ValidationErrorKind::DiscardedTag,
                format!("Found HTML policy violation. Tag name: {tag_name}"),
            )
        }
    }

    #[must_use]
    pub fn discarded_attributes(tag_name: &str, attribute_names: &[&str]) -> Self {
        Self {
            tag_name: Some(tag_name.to_owned()),
            attribute_names: attribute_names.iter().map(ToString::to_string).collect(),
            ..Self::new(
                ValidationErrorKind::DiscardedAttributes,
                format!(
                    "Found HTML policy violation: Tag name: {tag_name}, attribute(s): {}",
                    attribute_names.join(", ")
                ),
            )
        }
    }

    #[must_use]
    pub fn css_structure_invalid() -> Self {
        Self::new(
            ValidationErrorKind::CssStructureInvalid,
            "CSS in style-element is invalid.".to_owned(),
        )
    }

    #[must_use]
    pub fn css_selector_empty() -> Self {
        Self::new(
            ValidationErrorKind::CssSelectorEmpty,
            "CSS selector not found. Indicates illegal css.".to_owned(),
        )
    }

    #[must_use]
    pub fn css_blacklisted_token(selector: &str) -> Self {
        Self {
            selector: Some(selector.to_owned()),
            ..Self::new(
                ValidationErrorKind::CssBlacklistedToken,
                format!("Content of selector '{selector}' contains one or more illegal words."),
            )
        }
    }

    #[must_use]
    pub fn css_property_not_allowed(property: &str) -> Self {
        Self {
            property: Some(property.to_owned()),
            ..Self::new(
                ValidationErrorKind::CssPropertyNotAllowed,
                format!("Property '{property}' is not allowed."),
            )
        }
    }

    #[must_use]
    pub fn css_value_not_allowed(property: &str, value: &str) -> Self {
        Self {
            property: Some(property.to_owned()),
            value: Some(value.to_owned()),
            ..Self::new(
                ValidationErrorKind::CssValueNotAllowed,
                format!("Value '{value}' is not allowed for property '{property}'."),
            )
        }
    }

    /// Declaration text that is not terminated by `;`.
    #[must_use]
    pub fn css_declaration_unterminated() -> Self {
        Self::new(
            ValidationErrorKind::CssDeclarationMalformed,
            "Declaration must end with ';'.".to_owned(),
        )
    }

    /// `;`-terminated declaration text in which no declaration could be found.
    #[must_use]
    pub fn css_declaration_malformed(content: &str) -> Self {
        Self {
            value: Some(content.to_owned()),
            ..Self::new(
                ValidationErrorKind::CssDeclarationMalformed,
                format!("Malformed declaration: {content} ."),
            )
        }
    }
}

/// Failure of [`crate::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SanitizeError {
    /// The document violates the policy. Carries every violation, in document order.
    #[error("content violates the HTML policy ({} error(s))", .0.len())]
    PolicyViolation(Vec<ValidationError>),
}

impl SanitizeError {
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            Self::PolicyViolation(errors) => errors,
        }
    }

    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        match self {
            Self::PolicyViolation(errors) => errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discarded_tag_message() {
        let err = ValidationError::discarded_tag("script");
        assert_eq!(err.to_string(), "Found HTML policy violation. Tag name: script");
        assert_eq!(err.kind, ValidationErrorKind::DiscardedTag);
        assert_eq!(err.tag_name.as_deref(), Some("script"));
    }

    #[test]
    fn test_discarded_attributes_message() {
        let err = ValidationError::discarded_attributes("base", &["href", "onclick"]);
        assert_eq!(
            err.to_string(),
            "Found HTML policy violation: Tag name: base, attribute(s): href, onclick"
        );
        assert_eq!(err.attribute_names, vec!["href".to_owned(), "onclick".to_owned()]);
    }

    #[test]
    fn test_css_messages_carry_context() {
        let err = ValidationError::css_value_not_allowed("display", "none");
        assert_eq!(err.message, "Value 'none' is not allowed for property 'display'.");
        assert_eq!(err.property.as_deref(), Some("display"));
        assert_eq!(err.value.as_deref(), Some("none"));

        let err = ValidationError::css_declaration_unterminated();
        assert!(err.message.ends_with("must end with ';'."), "got: {}", err.message);
        assert_eq!(err.kind, ValidationErrorKind::CssDeclarationMalformed);
    }

    #[test]
    fn test_serialization_skips_empty_context() {
        let json = serde_json::to_value(ValidationError::css_structure_invalid()).unwrap();
        assert_eq!(json["kind"], "CssStructureInvalid");
        assert!(json.get("tag_name").is_none());
        assert!(json.get("attribute_names").is_none());
    }

    #[test]
    fn test_sanitize_error_exposes_errors() {
        let err = SanitizeError::PolicyViolation(vec![ValidationError::discarded_tag("iframe")]);
        assert_eq!(err.to_string(), "content violates the HTML policy (1 error(s))");
        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.into_errors()[0].kind, ValidationErrorKind::DiscardedTag);
    }
}
