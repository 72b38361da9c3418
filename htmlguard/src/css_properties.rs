//! CSS property tables.
//!
//! [`STYLING_PROPERTIES`] is the set of property names allowed in `style=`
//! attributes. [`PROPERTY_POLICY`] maps the properties allowed in `style`
//! elements to a predicate over the lower-cased declaration value.

use std::collections::HashMap;
use std::sync::LazyLock;

use htmlguard_patterns::{DIMENSION, is_flex_shorthand};

/// Widely supported, non-scripting CSS properties.
const BASE_PROPERTIES: &[&str] = &[
    "-moz-border-radius",
    "-moz-border-radius-bottomleft",
    "-moz-border-radius-bottomright",
    "-moz-border-radius-topleft",
    "-moz-border-radius-topright",
    "-moz-box-shadow",
    "-moz-outline",
    "-moz-outline-color",
    "-moz-outline-style",
    "-moz-outline-width",
    "-o-text-overflow",
    "-webkit-border-bottom-left-radius",
    "-webkit-border-bottom-right-radius",
    "-webkit-border-radius",
    "-webkit-border-radius-bottom-left",
    "-webkit-border-radius-bottom-right",
    "-webkit-border-radius-top-left",
    "-webkit-border-radius-top-right",
    "-webkit-border-top-left-radius",
    "-webkit-border-top-right-radius",
    "-webkit-box-shadow",
    "azimuth",
    "background",
    "background-attachment",
    "background-color",
    "background-image",
    "background-position",
    "background-repeat",
    "border",
    "border-bottom",
    "border-bottom-color",
    "border-bottom-left-radius",
    "border-bottom-right-radius",
    "border-bottom-style",
    "border-bottom-width",
    "border-collapse",
    "border-color",
    "border-left",
    "border-left-color",
    "border-left-style",
    "border-left-width",
    "border-radius",
    "border-right",
    "border-right-color",
    "border-right-style",
    "border-right-width",
    "border-spacing",
    "border-style",
    "border-top",
    "border-top-color",
    "border-top-left-radius",
    "border-top-right-radius",
    "border-top-style",
    "border-top-width",
    "border-width",
    "box-shadow",
    "caption-side",
    "color",
    "cue",
    "cue-after",
    "cue-before",
    "direction",
    "elevation",
    "empty-cells",
    "font",
    "font-family",
    "font-size",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "height",
    "letter-spacing",
    "line-height",
    "list-style",
    "list-style-image",
    "list-style-position",
    "list-style-type",
    "margin",
    "margin-bottom",
    "margin-left",
    "margin-right",
    "margin-top",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "outline",
    "outline-color",
    "outline-style",
    "outline-width",
    "padding",
    "padding-bottom",
    "padding-left",
    "padding-right",
    "padding-top",
    "pause",
    "pause-after",
    "pause-before",
    "pitch",
    "pitch-range",
    "quotes",
    "richness",
    "speak",
    "speak-header",
    "speak-numeral",
    "speak-punctuation",
    "speech-rate",
    "stress",
    "table-layout",
    "text-align",
    "text-decoration",
    "text-indent",
    "text-overflow",
    "text-shadow",
    "text-transform",
    "text-wrap",
    "unicode-bidi",
    "vertical-align",
    "voice-family",
    "volume",
    "white-space",
    "width",
    "word-spacing",
    "word-wrap",
];

/// Positioning and paging properties added on top of [`BASE_PROPERTIES`].
const EXTRA_PROPERTIES: &[&str] = &[
    "top",
    "bottom",
    "left",
    "right",
    "background",
    "page-break-before",
    "page-break-after",
    "page-break-inside",
];

/// Properties allowed in `style=` attributes.
pub static STYLING_PROPERTIES: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    let mut properties: Vec<&'static str> = BASE_PROPERTIES
        .iter()
        .chain(EXTRA_PROPERTIES)
        .copied()
        .collect();
    properties.sort_unstable();
    properties.dedup();
    properties
});

/// Predicate over a lower-cased declaration value.
pub type ValueCheck = fn(&str) -> bool;

/// Allowed `style`-element properties and the values each accepts.
#[derive(Debug)]
pub struct PropertyPolicy {
    checks: HashMap<&'static str, ValueCheck>,
}

impl PropertyPolicy {
    fn build() -> Self {
        let mut checks: HashMap<&'static str, ValueCheck> = HashMap::new();
        for property in STYLING_PROPERTIES.iter().chain(&["clear", "float", "content"]) {
            checks.insert(*property, any_value);
        }

        checks.insert("display", |value| {
            matches!(value, "block" | "inline-block" | "inline" | "flex")
        });
        checks.insert("flex-direction", |value| {
            matches!(value, "row" | "column" | "row-reverse" | "column-reverse")
        });
        checks.insert("flex-wrap", |value| {
            matches!(value, "nowrap" | "wrap" | "wrap-reverse")
        });
        checks.insert("justify-content", |value| {
            matches!(
                value,
                "flex-start" | "flex-end" | "center" | "space-between" | "space-around" | "space-evenly"
            )
        });
        checks.insert("align-items", is_item_alignment);
        checks.insert("align-self", |value| value == "auto" || is_item_alignment(value));
        checks.insert("gap", |value| DIMENSION.is_match(value));
        checks.insert("flex", is_flex_shorthand);

        Self { checks }
    }

    /// The value predicate for `property`, or `None` if the property is not allowed.
    ///
    /// The lookup is exact: callers trim but do not lower-case the name.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<ValueCheck> {
        self.checks.get(property).copied()
    }

    #[must_use]
    pub fn allows_property(&self, property: &str) -> bool {
        self.checks.contains_key(property)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

pub static PROPERTY_POLICY: LazyLock<PropertyPolicy> = LazyLock::new(PropertyPolicy::build);

fn any_value(_value: &str) -> bool {
    true
}

fn is_item_alignment(value: &str) -> bool {
    matches!(
        value,
        "flex-start" | "flex-end" | "center" | "baseline" | "stretch"
    )
}
