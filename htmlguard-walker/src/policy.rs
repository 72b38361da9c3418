//! Declarative HTML policy and its fluent builder.
//!
//! A policy is configuration data: which elements survive, which attributes
//! each element may carry (optionally constrained by a value predicate), which
//! attributes are forced onto elements, which URL schemes are acceptable, which
//! CSS properties may appear in `style=` attributes, and which elements keep
//! their text (optionally rewritten by a content hook).
//!
//! Policies are immutable once built and safe to share between threads.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::inline_style;

/// Accepts or rejects an attribute value.
pub type ValuePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Rewrites the complete text of an element, or rejects it with a list of errors.
pub type ContentHook<E> = fn(&str) -> Result<String, Vec<E>>;

/// Attributes whose value is a URL and therefore subject to the scheme check.
const URL_ATTRIBUTES: &[&str] = &["href", "src", "background", "cite", "action", "longdesc"];

#[derive(Clone, Default)]
struct AttributePolicy {
    predicate: Option<ValuePredicate>,
}

impl AttributePolicy {
    fn accepts(&self, value: &str) -> bool {
        self.predicate
            .as_ref()
            .is_none_or(|predicate| predicate(value))
    }
}

/// Outcome of filtering one element's attributes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilteredAttributes {
    /// Surviving attributes in output order, forced attributes last.
    pub kept: Vec<(String, String)>,
    /// Names of rejected attributes, in input order.
    pub discarded: Vec<String>,
}

/// An immutable element/attribute allow-list.
///
/// `E` is the error type produced by the content hooks installed on the policy.
pub struct HtmlPolicy<E> {
    allowed_elements: HashSet<String>,
    global_attributes: HashMap<String, AttributePolicy>,
    element_attributes: HashMap<String, HashMap<String, AttributePolicy>>,
    required_attributes: HashMap<String, Vec<(String, String)>>,
    link_rels: Vec<String>,
    url_protocols: HashSet<String>,
    styling: Option<HashSet<String>>,
    text_elements: HashSet<String>,
    content_hooks: HashMap<String, ContentHook<E>>,
}

impl<E> Clone for HtmlPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            allowed_elements: self.allowed_elements.clone(),
            global_attributes: self.global_attributes.clone(),
            element_attributes: self.element_attributes.clone(),
            required_attributes: self.required_attributes.clone(),
            link_rels: self.link_rels.clone(),
            url_protocols: self.url_protocols.clone(),
            styling: self.styling.clone(),
            text_elements: self.text_elements.clone(),
            content_hooks: self.content_hooks.clone(),
        }
    }
}

impl<E> fmt::Debug for HtmlPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hooked: Vec<&String> = self.content_hooks.keys().collect();
        hooked.sort();
        f.debug_struct("HtmlPolicy")
            .field("allowed_elements", &self.allowed_elements.len())
            .field("global_attributes", &self.global_attributes.len())
            .field("element_attributes", &self.element_attributes.len())
            .field("required_attributes", &self.required_attributes)
            .field("link_rels", &self.link_rels)
            .field("url_protocols", &self.url_protocols)
            .field("styling", &self.styling.as_ref().map(HashSet::len))
            .field("text_elements", &self.text_elements)
            .field("content_hooks", &hooked)
            .finish()
    }
}

impl<E> HtmlPolicy<E> {
    /// Start a new generation of this policy: a builder seeded with every rule
    /// of `self`, to which further rules can be added.
    #[must_use]
    pub fn to_builder(&self) -> HtmlPolicyBuilder<E> {
        HtmlPolicyBuilder {
            policy: self.clone(),
        }
    }

    /// Whether `element` survives sanitization.
    #[must_use]
    pub fn allows_element(&self, element: &str) -> bool {
        self.allowed_elements.contains(element)
    }

    /// Whether the text inside `element` is kept.
    #[must_use]
    pub fn allows_text_in(&self, element: &str) -> bool {
        self.text_elements.contains(element)
    }

    /// Whether a content hook rewrites the text of `element`.
    #[must_use]
    pub fn has_content_hook(&self, element: &str) -> bool {
        self.content_hooks.contains_key(element)
    }

    #[must_use]
    pub fn content_hook(&self, element: &str) -> Option<ContentHook<E>> {
        self.content_hooks.get(element).copied()
    }

    /// Whether `url` is relative or uses one of the allowed schemes.
    #[must_use]
    pub fn allows_url(&self, url: &str) -> bool {
        match Url::parse(url.trim()) {
            Ok(parsed) => self.url_protocols.contains(parsed.scheme()),
            Err(url::ParseError::RelativeUrlWithoutBase) => true,
            Err(_) => false,
        }
    }

    fn attribute_policy(&self, element: &str, attribute: &str) -> Option<&AttributePolicy> {
        self.element_attributes
            .get(element)
            .and_then(|attributes| attributes.get(attribute))
            .or_else(|| self.global_attributes.get(attribute))
    }

    fn forces_rel(&self, element: &str) -> bool {
        element == "a" && !self.link_rels.is_empty()
    }

    /// Apply the attribute rules of `element` to its raw `(name, value)` pairs.
    ///
    /// Forced attributes replace whatever the input carried and are never
    /// reported as discarded.
    #[must_use]
    pub fn filter_attributes<'a, I>(&self, element: &str, attributes: I) -> FilteredAttributes
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let required = self.required_attributes.get(element);
        let forces_rel = self.forces_rel(element);
        let mut filtered = FilteredAttributes::default();

        for (name, value) in attributes {
            let is_forced = required.is_some_and(|forced| forced.iter().any(|(n, _)| n == name))
                || (forces_rel && name == "rel");
            if is_forced {
                continue;
            }

            if name == "style"
                && let Some(properties) = &self.styling
            {
                match inline_style::filter_declarations(value, properties, |url| self.allows_url(url)) {
                    Some(style) => filtered.kept.push((name.to_owned(), style)),
                    None => filtered.discarded.push(name.to_owned()),
                }
                continue;
            }

            let accepted = self
                .attribute_policy(element, name)
                .is_some_and(|policy| policy.accepts(value))
                && (!URL_ATTRIBUTES.contains(&name) || self.allows_url(value));
            if accepted {
                filtered.kept.push((name.to_owned(), value.to_owned()));
            } else {
                filtered.discarded.push(name.to_owned());
            }
        }

        if let Some(required) = required {
            filtered.kept.extend(required.iter().cloned());
        }
        if forces_rel && filtered.kept.iter().any(|(name, _)| name == "href") {
            filtered
                .kept
                .push(("rel".to_owned(), self.link_rels.join(" ")));
        }

        filtered
    }
}

/// Fluent builder for [`HtmlPolicy`].
///
/// ```
/// use htmlguard_walker::HtmlPolicyBuilder;
///
/// let policy = HtmlPolicyBuilder::<String>::new()
///     .allow_elements(&["p", "a"])
///     .allow_attributes(&["href"])
///     .matching(|value| !value.is_empty())
///     .on_elements(&["a"])
///     .allow_standard_url_protocols()
///     .build();
///
/// assert!(policy.allows_element("p"));
/// assert!(!policy.allows_element("script"));
/// ```
pub struct HtmlPolicyBuilder<E> {
    policy: HtmlPolicy<E>,
}

impl<E> Default for HtmlPolicyBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> HtmlPolicyBuilder<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            policy: HtmlPolicy {
                allowed_elements: HashSet::new(),
                global_attributes: HashMap::new(),
                element_attributes: HashMap::new(),
                required_attributes: HashMap::new(),
                link_rels: Vec::new(),
                url_protocols: HashSet::new(),
                styling: None,
                text_elements: HashSet::new(),
                content_hooks: HashMap::new(),
            },
        }
    }

    #[must_use]
    pub fn allow_elements(mut self, elements: &[&str]) -> Self {
        self.policy
            .allowed_elements
            .extend(elements.iter().map(|e| e.to_ascii_lowercase()));
        self
    }

    /// Begin an attribute rule. Finish it with [`AttributeBuilder::globally`]
    /// or [`AttributeBuilder::on_elements`].
    #[must_use]
    pub fn allow_attributes(self, attributes: &[&str]) -> AttributeBuilder<E> {
        AttributeBuilder {
            builder: self,
            attributes: attributes.iter().map(|a| a.to_ascii_lowercase()).collect(),
            predicate: None,
        }
    }

    #[must_use]
    pub fn allow_url_protocols(mut self, protocols: &[&str]) -> Self {
        self.policy
            .url_protocols
            .extend(protocols.iter().map(|p| p.to_ascii_lowercase()));
        self
    }

    /// `http`, `https` and `mailto`.
    #[must_use]
    pub fn allow_standard_url_protocols(self) -> Self {
        self.allow_url_protocols(&["http", "https", "mailto"])
    }

    /// Allow `style=` attributes on every element, restricted to `properties`.
    #[must_use]
    pub fn allow_styling<I, S>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy
            .styling
            .get_or_insert_with(HashSet::new)
            .extend(properties.into_iter().map(Into::into));
        self
    }

    /// Force `attribute="value"` onto every `element`, replacing any value in the input.
    #[must_use]
    pub fn require_attribute(mut self, element: &str, attribute: &str, value: &str) -> Self {
        let forced = self
            .policy
            .required_attributes
            .entry(element.to_ascii_lowercase())
            .or_default();
        forced.retain(|(name, _)| name != attribute);
        forced.push((attribute.to_ascii_lowercase(), value.to_owned()));
        self
    }

    /// Force `rel` on anchors that carry an `href`.
    #[must_use]
    pub fn require_rels_on_links(mut self, rels: &[&str]) -> Self {
        for rel in rels {
            if !self.policy.link_rels.iter().any(|existing| existing == rel) {
                self.policy.link_rels.push((*rel).to_owned());
            }
        }
        self
    }

    /// Keep the text inside raw-text `elements` such as `style`.
    #[must_use]
    pub fn allow_text_in(mut self, elements: &[&str]) -> Self {
        self.policy
            .text_elements
            .extend(elements.iter().map(|e| e.to_ascii_lowercase()));
        self
    }

    /// Run `hook` over the complete text of every `element`.
    ///
    /// The hook only sees text the policy keeps (see [`Self::allow_text_in`]).
    #[must_use]
    pub fn with_content_hook(mut self, element: &str, hook: ContentHook<E>) -> Self {
        self.policy
            .content_hooks
            .insert(element.to_ascii_lowercase(), hook);
        self
    }

    #[must_use]
    pub fn build(self) -> HtmlPolicy<E> {
        self.policy
    }
}

/// An attribute rule under construction.
pub struct AttributeBuilder<E> {
    builder: HtmlPolicyBuilder<E>,
    attributes: Vec<String>,
    predicate: Option<ValuePredicate>,
}

impl<E> AttributeBuilder<E> {
    /// Only accept values for which `predicate` returns `true`.
    #[must_use]
    pub fn matching<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Allow the attributes on every allowed element.
    #[must_use]
    pub fn globally(self) -> HtmlPolicyBuilder<E> {
        let Self {
            mut builder,
            attributes,
            predicate,
        } = self;
        for attribute in attributes {
            builder.policy.global_attributes.insert(
                attribute,
                AttributePolicy {
                    predicate: predicate.clone(),
                },
            );
        }
        builder
    }

    /// Allow the attributes on the listed elements only.
    #[must_use]
    pub fn on_elements(self, elements: &[&str]) -> HtmlPolicyBuilder<E> {
        let Self {
            mut builder,
            attributes,
            predicate,
        } = self;
        for element in elements {
            let per_element = builder
                .policy
                .element_attributes
                .entry(element.to_ascii_lowercase())
                .or_default();
            for attribute in &attributes {
                per_element.insert(
                    attribute.clone(),
                    AttributePolicy {
                        predicate: predicate.clone(),
                    },
                );
            }
        }
        builder
    }
}
