//! Integration tests for `style` element validation and escaping.

use htmlguard::{ValidationError, ValidationErrorKind, validate_and_sanitize_css};

fn assert_unchanged(css: &str) {
    match validate_and_sanitize_css(css) {
        Ok(sanitized) => assert_eq!(sanitized, css),
        Err(errors) => panic!("expected valid css, got: {:?}", messages(&errors)),
    }
}

fn rejected(css: &str) -> Vec<ValidationError> {
    match validate_and_sanitize_css(css) {
        Ok(sanitized) => panic!("expected invalid css, got: {sanitized}"),
        Err(errors) => errors,
    }
}

fn messages(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(|e| e.message.as_str()).collect()
}

#[test]
fn test_valid_rule_sets_are_returned_unchanged() {
    assert_unchanged(
        ".myClass table td {\nheight: 40px;\nborder: solid 2px black;\ntext-align: center;\n}\n\
         .infoText div.subHeader {\nmargin: 30px 0px;\n}",
    );
}

#[test]
fn test_value_with_commas() {
    assert_unchanged(".myClass table td {\nfont-family: Arial, Helvetica, sans-serif;\n}");
}

#[test]
fn test_value_with_parentheses() {
    assert_unchanged(
        ".content--green {\n       background-color: rgba(69,164,170,0.12);\n       page-break-before: always;\n}",
    );
}

#[test]
fn test_selector_spanning_lines() {
    assert_unchanged(
        "#myId li::before,\n .className {height: 40px;border: solid 2px black;text-align: center;}\
         .infoText div.subHeader {margin: 30px 0px;}",
    );
}

#[test]
fn test_selectors_on_one_line() {
    assert_unchanged(
        "#myId li::before, .className {height: 40px;border: solid 2px black;text-align: center;}\
         .infoText div.subHeader {margin: 30px 0px;}",
    );
}

#[test]
fn test_simple_attribute_selector() {
    assert_unchanged("#myId[href] { height: 40px; }");
}

#[test]
fn test_space_around_colon() {
    assert_unchanged(".myClass table td {\nfont-size   :   40px           ;\n}");
}

#[test]
fn test_empty_text_and_empty_block() {
    assert_unchanged("");
    assert_unchanged(".myClass table td {\n}");
}

#[test]
fn test_restricted_value_on_allow_list() {
    assert_unchanged(".myClass table td {\ndisplay: inline;}");
}

#[test]
fn test_at_rule_is_rejected() {
    let errors = rejected("@media print {\n  pre, blockquote {margin: 30px 0px;}\n}");
    assert_eq!(messages(&errors), vec!["CSS in style-element is invalid."]);
}

#[test]
fn test_commented_out_rule_set_is_rejected() {
    let errors = rejected(
        ".myClass table td {\nheight: 40px;\nborder: solid 2px black;\ntext-align: center;\n}\n\
         /* .infoText div.subHeader {\nmargin: 30px 0px;\n} */",
    );
    assert_eq!(errors.len(), 1, "got: {:?}", messages(&errors));
    assert_eq!(errors[0].kind, ValidationErrorKind::CssStructureInvalid);
}

#[test]
fn test_commented_out_declaration_is_rejected() {
    let errors = rejected(
        ".myClass table td {\nheight: 40px;\n}\n.infoText div.subHeader {\n/* margin: 30px 0px; */ \n}",
    );
    assert_eq!(errors.len(), 1, "got: {:?}", messages(&errors));
    assert_eq!(errors[0].kind, ValidationErrorKind::CssBlacklistedToken);
    assert_eq!(errors[0].selector.as_deref(), Some(".infoText div.subHeader"));
}

#[test]
fn test_property_not_on_allow_list() {
    let errors = rejected(
        ".myClass table td {\nnot-a-prop: 40px;\n}\n.infoText div.subHeader {\nmargin: 30px 0px;\n}",
    );
    assert_eq!(messages(&errors), vec!["Property 'not-a-prop' is not allowed."]);

    let errors = rejected(".myClass table td {\nnotAWhitelistedProp: 40px;\nfont-size: 40px;\n}");
    assert_eq!(errors.len(), 1, "got: {:?}", messages(&errors));
}

#[test]
fn test_every_violation_is_reported() {
    let errors = rejected(
        ".myClass table td {\nnot-a-prop: 40px;\n}\n\
         .infoText div.subHeader {\nmargin: javascript::alert('hello');\n} invalid css",
    );
    let kinds: Vec<ValidationErrorKind> = errors.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ValidationErrorKind::CssStructureInvalid,
            ValidationErrorKind::CssPropertyNotAllowed,
            ValidationErrorKind::CssBlacklistedToken,
        ]
    );
}

#[test]
fn test_garbage_with_illegal_characters() {
    let errors = rejected(
        "This is not \\\\{ `css` at al%l  &lt;script&gt;alert('hello') }&lt;/script&gt; , just garbage javascript:alert('xss')",
    );
    assert_eq!(messages(&errors), vec!["CSS in style-element is invalid."]);
}

#[test]
fn test_garbage_around_a_block() {
    let errors = rejected("This is not { css at all; } just garbage javascript:alert('xss')");
    assert_eq!(errors.len(), 2, "got: {:?}", messages(&errors));
    assert_eq!(errors[0].message, "CSS in style-element is invalid.");
}

#[test]
fn test_complex_attribute_selector_is_rejected() {
    let errors = rejected("#myId[href*=\"example\"] { height: 40px; }");
    assert_eq!(messages(&errors), vec!["CSS in style-element is invalid."]);
}

#[test]
fn test_blacklisted_value() {
    let errors = rejected(".myClass table td {\nfont-size: \"expression(alert('XSS'))\";\n}");
    assert_eq!(errors.len(), 1, "got: {:?}", messages(&errors));
    assert_eq!(errors[0].kind, ValidationErrorKind::CssBlacklistedToken);
}

#[test]
fn test_blacklisted_tokens() {
    for token in ["javascript", "EXPRESSION", "url(", "http://", "https://", "/*", "*/"] {
        let errors = rejected(&format!("p {{ color: red; font-family: {token}; }}"));
        assert!(
            errors.iter().any(|e| e.kind == ValidationErrorKind::CssBlacklistedToken),
            "token {token} not caught, got: {:?}",
            messages(&errors)
        );
    }
}

#[test]
fn test_missing_semicolon() {
    let errors = rejected(".myClass table td {font-size:40px}");
    assert_eq!(errors.len(), 1, "got: {:?}", messages(&errors));
    assert!(errors[0].message.contains("must end with ';'."), "got: {}", errors[0].message);
}

#[test]
fn test_value_not_on_allow_list() {
    let errors = rejected(".myClass table td {display:none;}");
    assert_eq!(
        messages(&errors),
        vec!["Value 'none' is not allowed for property 'display'."]
    );
}

#[test]
fn test_special_characters_are_escaped() {
    let css = ".electionInfoText ul li::before {\n content: \"\\2022/\";\n content: '\\2022<';\n font-size: 10px;}";
    let sanitized = validate_and_sanitize_css(css).unwrap();
    assert!(sanitized.contains("&#x2F;"), "got: {sanitized}");
    assert!(sanitized.contains("&lt;"), "got: {sanitized}");
    assert!(!sanitized.contains('<'), "got: {sanitized}");
}

#[test]
fn test_reset_stylesheet_is_valid_and_stable() {
    let sanitized = validate_and_sanitize_css(RESET_STYLESHEET).unwrap();
    assert_eq!(sanitized, RESET_STYLESHEET);
    assert_eq!(validate_and_sanitize_css(&sanitized).unwrap(), sanitized);
}

const RESET_STYLESHEET: &str = "html, body, div, span, applet, object, iframe,
 h1, h2, h3, h4, h5, h6, p, blockquote, pre,
 a, abbr, acronym, address, big, cite, code,
 del, dfn, em, img, ins, kbd, q, s, samp,
 small, strike, strong, sub, sup, tt, var,
 b, u, i, center,
 dl, dt, dd, ol, ul, li,
 fieldset, form, label, legend,
 table, caption, tbody, tfoot, thead, tr, th, td,
 article, aside, canvas, details, embed,
 figure, figcaption, footer, header, hgroup,
 menu, nav, output, ruby, section, summary,
 time, mark, audio, video {
 \tmargin: 0;
 \tpadding: 0;
 \tborder: 0;
 \tfont-size: 100%;
 \tfont: inherit;
 \tvertical-align: baseline;
 }
  HTML5 display-role reset for older browsers
 article, aside, details, figcaption, figure,
 footer, header, hgroup, menu, nav, section {
 \tdisplay: block;
 }
 body {
 \tline-height: 1;
 }
 ol, ul {
 \tlist-style: none;
 }
 table {
 \tborder-collapse: collapse;
 \tborder-spacing: 0;
 }

body {
\tfont-size: 16px;
\tmargin: 2.5cm;
\tline-height: 120%;
}
b {
\tfont-weight: bold;
}

h2 {
\tfont-size: 1.4em;
}

pre {
\tfont-family: Times New Roman;
\twhite-space: pre-wrap;
\twhite-space: -moz-pre-wrap !important;
\tword-wrap: break-word;
}

table {
\tfont-family: Times New Roman;
\tborder-collapse: collapse;
}

td {
\tpadding: 2px 10px 2px 0;
}

div#header {
\twidth: 100%;
}

div#logo {
\twidth: 30%;
\tfloat: left;
}

div#headertext {
\ttext-align: right;
\tfont-size: 14px;
\tpadding-top: 20px;
}

div#body {
\tclear: both;
\tpadding-top: 40px;
}";
