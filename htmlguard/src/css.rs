//! Validation and escaping of `style` element content.
//!
//! Only a flat, hand-authored subset of CSS is accepted: a sequence of
//! `selector { property: value; ... }` rule sets with no comments, no nesting
//! and no at-rules. Validation runs first and collects every violation; the
//! text is escaped only when no violation was found.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::css_properties::PROPERTY_POLICY;
use crate::error::ValidationError;

/// The whole text must be a sequence of rule sets.
static COMPLETE_CSS: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(concat!(
        r"^(?:",
        r"([.#\-A-Za-z0-9_\t\n\x0B\x0C\r :\[\],]+)", // selector
        r"[\t\n\x0B\x0C\r ]*\{",
        r"([^}]+)", // declarations
        r"\}[\t\n\x0B\x0C\r ]*",
        r")+$",
    )) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid complete CSS regex: {err}"),
    }
});

/// One rule set, found anywhere in the text.
static STYLE_RULE: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(concat!(
        r"([.#\-A-Za-z0-9_\t\n\x0B\x0C\r :\[\],]+)", // selector
        r"[\t\n\x0B\x0C\r ]*\{",
        r"([^}]+)", // declarations
        r"\}[\t\n\x0B\x0C\r ]*",
    )) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid style rule regex: {err}"),
    }
});

/// One `property: value;` declaration, found anywhere in a block.
static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(concat!(
        r"[\t\n\x0B\x0C\r ]*",
        r"([A-Za-z0-9_\- ]*)", // property
        r":",
        r#"([A-Za-z0-9_. ,%#\-:"'()!\\]*)"#, // value
        r";",
    )) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid declaration regex: {err}"),
    }
});

/// Substrings that disqualify a declaration block, compared against its lower-cased text.
const BLACKLISTED_TOKENS: &[&str] = &["javascript", "expression", "url(", "http://", "https://", "/*", "*/"];

/// Replacements applied in order, so `&` is never escaped twice.
const HTML_ESCAPES: &[(char, &str)] = &[('&', "&amp;"), ('<', "&lt;"), ('>', "&gt;"), ('/', "&#x2F;")];

/// A `selector { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule<'a> {
    /// Trimmed selector text.
    pub selector: &'a str,
    /// Trimmed text between the braces.
    pub content: &'a str,
}

/// A `property: value;` pair, both trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub property: &'a str,
    pub value: &'a str,
}

impl<'a> StyleRule<'a> {
    /// Declarations in block order. Text between declarations that does not
    /// fit the declaration grammar is skipped.
    #[must_use]
    pub fn declarations(&self) -> Vec<Declaration<'a>> {
        DECLARATION
            .captures_iter(self.content)
            .filter_map(|caps| {
                Some(Declaration {
                    property: trim(caps.get(1)?.as_str()),
                    value: trim(caps.get(2)?.as_str()),
                })
            })
            .collect()
    }
}

/// Every rule set in `css`, in document order.
///
/// This scan is more permissive than the whole-text grammar: rule sets are
/// found even when surrounded by text that makes the stylesheet invalid.
#[must_use]
pub fn style_rules(css: &str) -> Vec<StyleRule<'_>> {
    STYLE_RULE
        .captures_iter(css)
        .filter_map(|caps| {
            Some(StyleRule {
                selector: trim(caps.get(1)?.as_str()),
                content: trim(caps.get(2)?.as_str()),
            })
        })
        .collect()
}

/// Validate the text of one `style` element and return it HTML-escaped.
///
/// # Errors
///
/// Returns every violation found, in discovery order, if the text is not an
/// acceptable stylesheet. No partially escaped text is ever returned.
pub fn validate_and_sanitize(css: &str) -> Result<String, Vec<ValidationError>> {
    let errors = validate(css);
    if errors.is_empty() {
        Ok(escape(css))
    } else {
        Err(errors)
    }
}

/// Collect every violation in `css`.
///
/// A structural error for the text as a whole comes first, followed by the
/// errors of each rule set in selector order.
#[must_use]
pub fn validate(css: &str) -> Vec<ValidationError> {
    let css = trim(css);
    let mut errors = Vec::new();

    if !css.is_empty() && !COMPLETE_CSS.is_match(css) {
        errors.push(ValidationError::css_structure_invalid());
    }

    for rule in style_rules(css) {
        validate_rule(&rule, css, &mut errors);
    }

    errors
}

fn validate_rule(rule: &StyleRule<'_>, css: &str, errors: &mut Vec<ValidationError>) {
    debug!(selector = rule.selector, "validating style rule");

    if rule.selector.is_empty() {
        warn!(css, "rule set matched without a selector");
        errors.push(ValidationError::css_selector_empty());
    } else if contains_blacklisted_token(rule.content) {
        errors.push(ValidationError::css_blacklisted_token(rule.selector));
    } else {
        validate_declarations(rule, errors);
    }
}

fn validate_declarations(rule: &StyleRule<'_>, errors: &mut Vec<ValidationError>) {
    let declarations = rule.declarations();

    for declaration in &declarations {
        debug!(property = declaration.property, value = declaration.value, "validating declaration");
        match PROPERTY_POLICY.get(declaration.property) {
            Some(accepts) => {
                if !accepts(&declaration.value.to_lowercase()) {
                    warn!(property = declaration.property, value = declaration.value, "declaration value not allowed");
                    errors.push(ValidationError::css_value_not_allowed(
                        declaration.property,
                        declaration.value,
                    ));
                }
            }
            None => {
                debug!(property = declaration.property, "property not allowed in style element");
                errors.push(ValidationError::css_property_not_allowed(declaration.property));
            }
        }
    }

    if declarations.is_empty() && !rule.content.is_empty() {
        if rule.content.ends_with(';') {
            warn!(content = rule.content, "no declaration found in terminated block");
            errors.push(ValidationError::css_declaration_malformed(rule.content));
        } else {
            errors.push(ValidationError::css_declaration_unterminated());
        }
    }
}

fn contains_blacklisted_token(content: &str) -> bool {
    let content = content.to_lowercase();
    BLACKLISTED_TOKENS.iter().any(|token| content.contains(token))
}

/// Replace `&`, `<`, `>` and `/` with HTML entities. Quotes are left as is.
#[must_use]
pub fn escape(css: &str) -> String {
    let mut escaped = String::with_capacity(css.len());
    for c in css.chars() {
        match HTML_ESCAPES.iter().find(|(special, _)| *special == c) {
            Some((_, entity)) => escaped.push_str(entity),
            None => escaped.push(c),
        }
    }
    escaped
}

/// Strip leading and trailing whitespace and control characters.
fn trim(text: &str) -> &str {
    text.trim_matches(|c: char| c <= ' ')
}
