//! Filtering of `style=` attribute values against a property allow-list.

use std::collections::HashSet;

use tracing::debug;

/// Substrings that disqualify a declaration value, compared case-insensitively.
const UNSAFE_VALUE_TOKENS: &[&str] = &[
    "expression",
    "javascript:",
    "vbscript:",
    "behavior",
    "-moz-binding",
    "@import",
    "/*",
    "\\",
    "<",
    ">",
];

/// Keep the declarations of `style` whose property is in `properties` and
/// whose value is safe. Returns `None` when nothing survives.
///
/// Kept declarations are re-serialized as `property:value` joined by `;`.
pub fn filter_declarations<F>(style: &str, properties: &HashSet<String>, allows_url: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    let kept: Vec<String> = split_declarations(style)
        .into_iter()
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if value.is_empty() || !properties.contains(&property) || !is_safe_value(value, &allows_url) {
                debug!(property = %property, "dropping inline style declaration");
                return None;
            }
            Some(format!("{property}:{value}"))
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(";"))
    }
}

/// Split on `;` outside of quotes and parentheses.
fn split_declarations(style: &str) -> Vec<&str> {
    let mut declarations = Vec::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in style.char_indices() {
        match (quote, c) {
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                declarations.push(&style[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    declarations.push(&style[start..]);
    declarations.retain(|d| !d.trim().is_empty());
    declarations
}

fn is_safe_value<F>(value: &str, allows_url: &F) -> bool
where
    F: Fn(&str) -> bool,
{
    let lower = value.to_ascii_lowercase();
    if UNSAFE_VALUE_TOKENS.iter().any(|token| lower.contains(token)) {
        return false;
    }
    url_arguments(&lower).all(|url| allows_url(url))
}

fn url_arguments(value: &str) -> impl Iterator<Item = &str> {
    value.match_indices("url(").map(move |(index, _)| {
        let rest = &value[index + 4..];
        let end = rest.find(')').unwrap_or(rest.len());
        rest[..end].trim().trim_matches(|c| c == '"' || c == '\'')
    })
}
