//! The HTML policy applied to third-party documents.
//!
//! Two generations exist. [`PolicyVariant::ValidateOnly`] allow-lists elements
//! and attributes; [`PolicyVariant::ValidateAndSanitizeCss`] adds validation and
//! escaping of `style` element text.

use std::sync::LazyLock;

use htmlguard_patterns::{
    ALIGN, CSS_TYPE, FONT_FACE, HTML_CLASS, HTML_ID, HTML_TITLE, IMAGE_DATA_URL, LANGUAGE,
    META_VIEWPORT_VALUES, NAME, NORESIZE, NUMBER, NUMBER_OR_PERCENT, ONE_CHAR, ONSITE_URL,
    PARAGRAPH, TABLE_SCOPE, TARGET_BLANK, TYPE_AND_CHARSET, VALIGN, is_color_name_or_code,
    is_onsite_or_offsite_url, matches_any,
};
use htmlguard_walker::{HtmlPolicy, HtmlPolicyBuilder};
use regex::Regex;

use crate::css;
use crate::css_properties::STYLING_PROPERTIES;
use crate::error::ValidationError;
use crate::versioning::PolicyVariant;

pub type ApiPolicy = HtmlPolicy<ValidationError>;

/// Elements allowed without further thought.
const KITH_ELEMENTS: &[&str] = &["abbr", "acronym", "address", "dfn", "kbd", "q", "var", "tt", "caption"];

const STRUCTURAL_ELEMENTS: &[&str] = &[
    "html", "body", "head", "title", "meta", "base", "style", "a", "label", "noscript", "h1", "h2",
    "h3", "h4", "h5", "h6", "p", "i", "b", "u", "strong", "em", "small", "big", "pre", "code",
    "cite", "samp", "sub", "sup", "strike", "center", "blockquote", "hr", "br", "col", "font",
    "map", "span", "div", "img", "ul", "ol", "li", "dd", "dt", "dl", "tbody", "thead", "tfoot",
    "table", "td", "th", "tr", "colgroup", "fieldset", "legend", "figure", "figcaption", "header",
    "nav", "section", "aside", "article", "footer", "hgroup", "main",
];

const TABLE_SECTIONS: &[&str] = &["td", "th", "tr", "colgroup", "col", "thead", "tbody", "tfoot"];

fn pattern(regex: &'static LazyLock<Regex>) -> impl Fn(&str) -> bool + Send + Sync + 'static {
    move |value| regex.is_match(value)
}

fn validate_only() -> ApiPolicy {
    HtmlPolicyBuilder::new()
        .allow_styling(STYLING_PROPERTIES.iter().copied())
        .allow_standard_url_protocols()
        .allow_url_protocols(&["data"])
        // global
        .allow_attributes(&["id"])
        .matching(pattern(&HTML_ID))
        .globally()
        .allow_attributes(&["class"])
        .matching(pattern(&HTML_CLASS))
        .globally()
        .allow_attributes(&["lang"])
        .matching(pattern(&LANGUAGE))
        .globally()
        .allow_attributes(&["title"])
        .matching(pattern(&HTML_TITLE))
        .globally()
        .allow_attributes(&["align"])
        .matching(pattern(&ALIGN))
        .on_elements(&["p"])
        .allow_attributes(&["for"])
        .matching(pattern(&HTML_ID))
        .on_elements(&["label"])
        // font
        .allow_attributes(&["color"])
        .matching(is_color_name_or_code)
        .on_elements(&["font"])
        .allow_attributes(&["face"])
        .matching(pattern(&FONT_FACE))
        .on_elements(&["font"])
        .allow_attributes(&["size"])
        .matching(pattern(&NUMBER))
        .on_elements(&["font"])
        // links
        .require_attribute("a", "target", "_blank")
        .allow_attributes(&["href"])
        .matching(is_onsite_or_offsite_url)
        .on_elements(&["a"])
        .allow_attributes(&["nohref"])
        .on_elements(&["a"])
        .allow_attributes(&["name"])
        .matching(pattern(&NAME))
        .on_elements(&["a"])
        .require_rels_on_links(&["nofollow", "noreferrer", "noopener"])
        // images
        .allow_attributes(&["src"])
        .matching(pattern(&IMAGE_DATA_URL))
        .on_elements(&["img"])
        .allow_attributes(&["alt"])
        .on_elements(&["img"])
        // tables
        .allow_attributes(&["border", "cellpadding", "cellspacing"])
        .matching(pattern(&NUMBER))
        .on_elements(&["table"])
        .allow_attributes(&["bgcolor"])
        .matching(is_color_name_or_code)
        .on_elements(&["table"])
        .allow_attributes(&["background"])
        .matching(pattern(&ONSITE_URL))
        .on_elements(&["table"])
        .allow_attributes(&["align"])
        .matching(pattern(&ALIGN))
        .on_elements(&["table"])
        .allow_attributes(&["noresize"])
        .matching(pattern(&NORESIZE))
        .on_elements(&["table"])
        .allow_attributes(&["background"])
        .matching(pattern(&ONSITE_URL))
        .on_elements(&["td", "th", "tr"])
        .allow_attributes(&["bgcolor"])
        .matching(is_color_name_or_code)
        .on_elements(&["td", "th"])
        .allow_attributes(&["abbr"])
        .matching(pattern(&PARAGRAPH))
        .on_elements(&["td", "th"])
        .allow_attributes(&["axis", "headers"])
        .matching(pattern(&NAME))
        .on_elements(&["td", "th"])
        .allow_attributes(&["scope"])
        .matching(pattern(&TABLE_SCOPE))
        .on_elements(&["td", "th"])
        .allow_attributes(&["nowrap"])
        .on_elements(&["td", "th"])
        .allow_attributes(&["height", "width"])
        .matching(pattern(&NUMBER_OR_PERCENT))
        .on_elements(&["table", "td", "th", "tr", "img", "hr"])
        .allow_attributes(&["align"])
        .matching(pattern(&ALIGN))
        .on_elements(&["thead", "tbody", "tfoot", "img", "td", "th", "tr", "colgroup", "col", "hr"])
        .allow_attributes(&["valign"])
        .matching(pattern(&VALIGN))
        .on_elements(TABLE_SECTIONS)
        .allow_attributes(&["charoff"])
        .matching(pattern(&NUMBER_OR_PERCENT))
        .on_elements(TABLE_SECTIONS)
        .allow_attributes(&["char"])
        .matching(pattern(&ONE_CHAR))
        .on_elements(TABLE_SECTIONS)
        .allow_attributes(&["colspan", "rowspan"])
        .matching(pattern(&NUMBER))
        .on_elements(&["td", "th"])
        .allow_attributes(&["span", "width"])
        .matching(pattern(&NUMBER_OR_PERCENT))
        .on_elements(&["colgroup", "col"])
        // document head
        .allow_attributes(&["type"])
        .matching(pattern(&CSS_TYPE))
        .on_elements(&["style"])
        .allow_attributes(&["target"])
        .matching(pattern(&TARGET_BLANK))
        .on_elements(&["base"])
        .allow_attributes(&["http-equiv"])
        .matching(|value| value.eq_ignore_ascii_case("content-type"))
        .on_elements(&["meta"])
        .allow_attributes(&["charset"])
        .on_elements(&["meta"])
        .allow_attributes(&["name"])
        .matching(|value| value.eq_ignore_ascii_case("viewport"))
        .on_elements(&["meta"])
        .allow_attributes(&["content"])
        .matching(|value| matches_any(&[&*META_VIEWPORT_VALUES, &*TYPE_AND_CHARSET], value))
        .on_elements(&["meta"])
        .allow_elements(KITH_ELEMENTS)
        .allow_elements(STRUCTURAL_ELEMENTS)
        // Legacy documents carry unchecked style text.
        .allow_text_in(&["style"])
        .build()
}

fn validate_and_sanitize_css(previous: &ApiPolicy) -> ApiPolicy {
    previous
        .to_builder()
        .allow_text_in(&["style"])
        .with_content_hook("style", css::validate_and_sanitize)
        .build()
}

static VALIDATE_ONLY: LazyLock<ApiPolicy> = LazyLock::new(validate_only);

static VALIDATE_AND_SANITIZE_CSS: LazyLock<ApiPolicy> =
    LazyLock::new(|| validate_and_sanitize_css(&VALIDATE_ONLY));

/// The policy of `variant`, built on first use and shared afterwards.
#[must_use]
pub fn policy_for(variant: PolicyVariant) -> &'static ApiPolicy {
    match variant {
        PolicyVariant::ValidateOnly => &VALIDATE_ONLY,
        PolicyVariant::ValidateAndSanitizeCss => &VALIDATE_AND_SANITIZE_CSS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generations_differ_only_in_style_hook() {
        let v1 = policy_for(PolicyVariant::ValidateOnly);
        let v2 = policy_for(PolicyVariant::ValidateAndSanitizeCss);

        for element in ["html", "style", "a", "caption", "main", "font"] {
            assert!(v1.allows_element(element), "v1 missing {element}");
            assert!(v2.allows_element(element), "v2 missing {element}");
        }
        assert!(!v2.allows_element("script"));
        assert!(!v2.allows_element("iframe"));

        assert!(!v1.has_content_hook("style"));
        assert!(v2.has_content_hook("style"));
        assert!(v1.allows_text_in("style"));
        assert!(v2.allows_text_in("style"));
    }

    #[test]
    fn test_url_protocols() {
        let policy = policy_for(PolicyVariant::ValidateAndSanitizeCss);
        assert!(policy.allows_url("https://example.org"));
        assert!(policy.allows_url("mailto:hei@example.org"));
        assert!(policy.allows_url("data:image/png;base64,AAAA"));
        assert!(!policy.allows_url("javascript:alert(1)"));
        assert!(!policy.allows_url("ftp://example.org/file"));
    }

    #[test]
    fn test_meta_attributes() {
        let policy = policy_for(PolicyVariant::ValidateAndSanitizeCss);
        let filtered = policy.filter_attributes(
            "meta",
            [("http-equiv", "Content-Type"), ("content", "text/html;charset=utf-8")],
        );
        assert!(filtered.discarded.is_empty(), "got: {:?}", filtered.discarded);

        let filtered = policy.filter_attributes(
            "meta",
            [("name", "viewport"), ("content", "something-random = no")],
        );
        assert_eq!(filtered.discarded, vec!["content".to_owned()]);
    }
}
