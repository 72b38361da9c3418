//! Streaming policy enforcement over the html5ever tokenizer.
//!
//! The walker never builds a tree: start tags, end tags and text are checked
//! against the policy and serialized as they arrive, with a stack of open
//! elements used to balance the output.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use tracing::{debug, trace};

use crate::listener::HtmlChangeListener;
use crate::policy::{ContentHook, HtmlPolicy};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// How the tokenizer reads the text following a start tag.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TextMode {
    Normal,
    Escapable,
    RawText,
    Script,
    Plain,
}

impl TextMode {
    fn of(element: &str) -> Self {
        match element {
            "title" | "textarea" => Self::Escapable,
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => Self::RawText,
            "script" => Self::Script,
            "plaintext" => Self::Plain,
            _ => Self::Normal,
        }
    }

    fn sink_result(self) -> TokenSinkResult<()> {
        match self {
            Self::Normal => TokenSinkResult::Continue,
            Self::Escapable => TokenSinkResult::RawData(RawKind::Rcdata),
            Self::RawText => TokenSinkResult::RawData(RawKind::Rawtext),
            Self::Script => TokenSinkResult::RawData(RawKind::ScriptData),
            Self::Plain => TokenSinkResult::Plaintext,
        }
    }
}

enum Capture<E> {
    Drop,
    Verbatim,
    Hook(ContentHook<E>),
}

/// Text of a raw-text element, held until its end tag.
struct RawText<E> {
    element: String,
    capture: Capture<E>,
    text: String,
}

struct Walk<'l, L: HtmlChangeListener> {
    listener: &'l mut L,
    out: String,
    open: Vec<String>,
    raw: Option<RawText<L::ContentError>>,
}

impl<'l, L: HtmlChangeListener> Walk<'l, L> {
    fn new(listener: &'l mut L, capacity: usize) -> Self {
        Self {
            listener,
            out: String::with_capacity(capacity),
            open: Vec::new(),
            raw: None,
        }
    }

    fn start_tag(&mut self, policy: &HtmlPolicy<L::ContentError>, tag: &Tag) -> TokenSinkResult<()> {
        let element: &str = &tag.name;
        let mode = TextMode::of(element);

        if !policy.allows_element(element) {
            debug!(element, "discarding element");
            self.listener.discarded_tag(element);
            if mode != TextMode::Normal {
                self.raw = Some(RawText {
                    element: element.to_owned(),
                    capture: Capture::Drop,
                    text: String::new(),
                });
            }
            return mode.sink_result();
        }

        let filtered = policy.filter_attributes(
            element,
            tag.attrs
                .iter()
                .map(|attribute| (&*attribute.name.local, &*attribute.value)),
        );
        if !filtered.discarded.is_empty() {
            debug!(element, attributes = ?filtered.discarded, "discarding attributes");
            let names: Vec<&str> = filtered.discarded.iter().map(String::as_str).collect();
            self.listener.discarded_attributes(element, &names);
        }

        self.out.push('<');
        self.out.push_str(element);
        for (name, value) in &filtered.kept {
            self.out.push(' ');
            self.out.push_str(name);
            self.out.push_str("=\"");
            push_escaped_attribute(&mut self.out, value);
            self.out.push('"');
        }

        if VOID_ELEMENTS.contains(&element) {
            self.out.push_str(" />");
            return TokenSinkResult::Continue;
        }
        self.out.push('>');
        self.open.push(element.to_owned());

        if matches!(mode, TextMode::RawText | TextMode::Script | TextMode::Plain) {
            let capture = match policy.content_hook(element) {
                _ if !policy.allows_text_in(element) => Capture::Drop,
                Some(hook) => Capture::Hook(hook),
                None => Capture::Verbatim,
            };
            self.raw = Some(RawText {
                element: element.to_owned(),
                capture,
                text: String::new(),
            });
        }
        mode.sink_result()
    }

    fn end_tag(&mut self, element: &str) {
        if self.raw.as_ref().is_some_and(|raw| raw.element == element) {
            self.flush_raw();
        }
        match self.open.iter().rposition(|open| open == element) {
            Some(position) => {
                for open in self.open.drain(position..).rev() {
                    self.out.push_str("</");
                    self.out.push_str(&open);
                    self.out.push('>');
                }
            }
            None => trace!(element, "dropping unmatched end tag"),
        }
    }

    fn text(&mut self, text: &str) {
        match &mut self.raw {
            Some(RawText {
                capture: Capture::Drop,
                ..
            }) => {}
            Some(raw) => raw.text.push_str(text),
            None => push_escaped_text(&mut self.out, text),
        }
    }

    fn flush_raw(&mut self) {
        let Some(raw) = self.raw.take() else {
            return;
        };
        match raw.capture {
            Capture::Drop => {}
            Capture::Verbatim => self.out.push_str(&raw.text),
            Capture::Hook(_) if raw.text.is_empty() => {}
            Capture::Hook(hook) => match hook(&raw.text) {
                Ok(rewritten) => self.out.push_str(&rewritten),
                Err(errors) => {
                    debug!(element = %raw.element, "content hook rejected element text");
                    self.listener.rejected_content(&raw.element, errors);
                }
            },
        }
    }

    fn finish(&mut self) -> String {
        self.flush_raw();
        for open in self.open.drain(..).rev() {
            self.out.push_str("</");
            self.out.push_str(&open);
            self.out.push('>');
        }
        std::mem::take(&mut self.out)
    }
}

struct PolicySink<'p, 'l, L: HtmlChangeListener> {
    policy: &'p HtmlPolicy<L::ContentError>,
    walk: RefCell<Walk<'l, L>>,
}

impl<L: HtmlChangeListener> TokenSink for PolicySink<'_, '_, L> {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let mut walk = self.walk.borrow_mut();
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return walk.start_tag(self.policy, &tag),
                TagKind::EndTag => walk.end_tag(&tag.name),
            },
            Token::CharacterTokens(text) => walk.text(&text),
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

impl<E> HtmlPolicy<E> {
    /// Rewrite `html` so that it only contains what this policy allows,
    /// reporting every change to `listener`.
    ///
    /// The output is a fragment: no `<html>`, `<head>` or `<body>` is
    /// synthesized, and a leading doctype is dropped. Unclosed elements are
    /// closed at the end of input.
    pub fn sanitize<L>(&self, html: &str, listener: &mut L) -> String
    where
        L: HtmlChangeListener<ContentError = E>,
    {
        let sink = PolicySink {
            policy: self,
            walk: RefCell::new(Walk::new(listener, html.len())),
        };
        let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
        let input = BufferQueue::default();
        input.push_back(StrTendril::from_slice(html));
        let _ = tokenizer.feed(&input);
        tokenizer.end();
        tokenizer.sink.walk.borrow_mut().finish()
    }
}

fn push_escaped_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn push_escaped_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&#34;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}
