//! Shared value grammars for HTML attribute and CSS value validation.
//!
//! This crate is the single source of truth for the value forms accepted by
//! the htmlguard HTML policy (attribute predicates) and by the style-element
//! CSS validator (property value predicates).
//!
//! Every pattern is compiled once and anchored, so `is_match` always tests the
//! *whole* value. Where a grammar says "word", "space" or "digit" the class is
//! ASCII-only; `\p{L}` and `\p{N}` stay Unicode-aware.

use std::sync::LazyLock;

use regex::Regex;

/// Compile `pattern` anchored at both ends.
///
/// The pattern sources below are compile-time constants; a failure here is a
/// programming error, reported with the pattern name.
fn whole(name: &str, pattern: &str) -> Regex {
    match Regex::new(&format!("^(?:{pattern})$")) {
        Ok(regex) => regex,
        Err(err) => panic!("Invalid {name} pattern: {err}"),
    }
}

/// The 16 colors defined by the HTML spec (also used by CSS).
pub static COLOR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "COLOR_NAME",
        r"aqua|black|blue|fuchsia|gray|grey|green|lime|maroon|navy|olive|purple|red|silver|teal|white|yellow",
    )
});

/// 3 or 6 digit hex color.
pub static COLOR_CODE: LazyLock<Regex> =
    LazyLock::new(|| whole("COLOR_CODE", r"#[0-9a-fA-F]{3}(?:[0-9a-fA-F]{3})?"));

pub static NUMBER_OR_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| whole("NUMBER_OR_PERCENT", r"[0-9]+%?"));

/// Integer length with an optional `%`, `px`, `em` or `rem` unit.
pub static DIMENSION: LazyLock<Regex> =
    LazyLock::new(|| whole("DIMENSION", r"[0-9]+(?:%|px|em|rem)?"));

pub static PARAGRAPH: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "PARAGRAPH",
        r"(?:[\p{L}\p{N},'.\t\n\x0B\x0C\r \-_()]|&[0-9]{2};)*",
    )
});

pub static HTML_ID: LazyLock<Regex> = LazyLock::new(|| whole("HTML_ID", r"[a-zA-Z0-9:\-_.]+"));

/// May be empty.
pub static HTML_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "HTML_TITLE",
        r"[\p{L}\p{N}\t\n\x0B\x0C\r \-_',:\[\]!./\\()&]*",
    )
});

pub static HTML_CLASS: LazyLock<Regex> =
    LazyLock::new(|| whole("HTML_CLASS", r"[a-zA-Z0-9\t\n\x0B\x0C\r ,\-_]+"));

/// Relative URL or in-page fragment.
pub static ONSITE_URL: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "ONSITE_URL",
        r"[\p{L}\p{N}\\.#@$%+&;\-_~,?=/!]+|#[A-Za-z0-9_]+",
    )
});

/// Absolute `http(s)`, `ftp(s)` or `mailto` URL, optionally padded with whitespace.
pub static OFFSITE_URL: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "OFFSITE_URL",
        r"[\t\n\x0B\x0C\r ]*(?:(?:ht|f)tps?://|mailto:)[\p{L}\p{N}][\p{L}\p{N}\p{Zs}.#@$%+&;:\-_~,?=/!()]*[\t\n\x0B\x0C\r ]*",
    )
});

/// Signed decimal number, e.g. `1`, `-0.5`, `.25`, `3.`.
pub static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| whole("NUMBER", r"[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)"));

pub static NAME: LazyLock<Regex> = LazyLock::new(|| whole("NAME", r"[a-zA-Z0-9\-_$]+"));

pub static ALIGN: LazyLock<Regex> =
    LazyLock::new(|| whole("ALIGN", r"(?i:center|left|right|justify|char)"));

/// Third component of the `flex` shorthand.
pub static FLEX_BASIS: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "FLEX_BASIS",
        r"0|auto|content|[0-9]*\.?[0-9]+(?:%|px|em|rem)?",
    )
});

pub static VALIGN: LazyLock<Regex> =
    LazyLock::new(|| whole("VALIGN", r"(?i:baseline|bottom|middle|top)"));

pub static TARGET_BLANK: LazyLock<Regex> = LazyLock::new(|| whole("TARGET_BLANK", r"_blank"));

pub static CSS_TYPE: LazyLock<Regex> = LazyLock::new(|| whole("CSS_TYPE", r"text/css"));

/// Inline base64 image. The payload may span several lines.
pub static IMAGE_DATA_URL: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "IMAGE_DATA_URL",
        r"(?s)data:image/(?:gif|jpg|jpeg|png);base64.+",
    )
});

pub static ONE_CHAR: LazyLock<Regex> = LazyLock::new(|| whole("ONE_CHAR", r"(?s).?"));

/// `content` of a `http-equiv="content-type"` meta element. Only UTF-8 and ISO-8859-1.
pub static TYPE_AND_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "TYPE_AND_CHARSET",
        r"text/html;[ ]*charset=(?:[uU][tT][fF]-?8|[iI][sS][oO]-8859-1)",
    )
});

/// `content` of a `name="viewport"` meta element.
pub static META_VIEWPORT_VALUES: LazyLock<Regex> = LazyLock::new(|| {
    whole(
        "META_VIEWPORT_VALUES",
        concat!(
            r"(?:[, ;\t]*",
            r"(?:width|height|initial-scale|minimum-scale|maximum-scale|user-scalable|target-densityDpi)",
            r"[ ]{0,3}=[ ]{0,3}",
            r"(?:device-width|device-height|device-dpi|yes|no|[0-9.\-]{1,4})",
            r"){1,6}",
        ),
    )
});

pub static LANGUAGE: LazyLock<Regex> = LazyLock::new(|| whole("LANGUAGE", r"[a-zA-Z]{2,20}"));

/// `face` attribute of `font`.
pub static FONT_FACE: LazyLock<Regex> =
    LazyLock::new(|| whole("FONT_FACE", r"[A-Za-z0-9_;, \-]+"));

/// `scope` attribute of table cells.
pub static TABLE_SCOPE: LazyLock<Regex> =
    LazyLock::new(|| whole("TABLE_SCOPE", r"(?i:(?:row|col)(?:group)?)"));

pub static NORESIZE: LazyLock<Regex> = LazyLock::new(|| whole("NORESIZE", r"(?i:noresize)"));

/// True if `value` matches at least one of `patterns`.
#[must_use]
pub fn matches_any(patterns: &[&Regex], value: &str) -> bool {
    patterns.iter().any(|pattern| pattern.is_match(value))
}

#[must_use]
pub fn is_color_name_or_code(value: &str) -> bool {
    matches_any(&[&*COLOR_NAME, &*COLOR_CODE], value)
}

#[must_use]
pub fn is_onsite_or_offsite_url(value: &str) -> bool {
    matches_any(&[&*ONSITE_URL, &*OFFSITE_URL], value)
}

/// Validates the `flex` shorthand: `<grow> [<shrink> [<basis>]]`.
///
/// Grow and shrink must be [`NUMBER`]s, basis must be a [`FLEX_BASIS`].
#[must_use]
pub fn is_flex_shorthand(value: &str) -> bool {
    let parts: Vec<&str> = value.split_ascii_whitespace().collect();
    match parts.as_slice() {
        [grow] => NUMBER.is_match(grow),
        [grow, shrink] => NUMBER.is_match(grow) && NUMBER.is_match(shrink),
        [grow, shrink, basis] => {
            NUMBER.is_match(grow) && NUMBER.is_match(shrink) && FLEX_BASIS.is_match(basis)
        }
        _ => false,
    }
}
