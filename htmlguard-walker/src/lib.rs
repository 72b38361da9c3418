//! Policy-driven streaming HTML sanitizer.
//!
//! An [`HtmlPolicy`] is assembled with [`HtmlPolicyBuilder`] and then applied
//! to untrusted markup with [`HtmlPolicy::sanitize`]. Every element or
//! attribute the policy removes is reported to an [`HtmlChangeListener`], and
//! the text of selected raw-text elements (typically `style`) can be handed to
//! a content hook that rewrites or rejects it.
//!
//! ```
//! use htmlguard_walker::{HtmlChangeListener, HtmlPolicyBuilder};
//!
//! #[derive(Default)]
//! struct Discards(Vec<String>);
//!
//! impl HtmlChangeListener for Discards {
//!     type ContentError = String;
//!
//!     fn discarded_tag(&mut self, element_name: &str) {
//!         self.0.push(element_name.to_owned());
//!     }
//!
//!     fn discarded_attributes(&mut self, element_name: &str, attribute_names: &[&str]) {
//!         self.0.push(format!("{element_name}[{}]", attribute_names.join(",")));
//!     }
//!
//!     fn rejected_content(&mut self, _element_name: &str, errors: Vec<String>) {
//!         self.0.extend(errors);
//!     }
//! }
//!
//! let policy = HtmlPolicyBuilder::<String>::new().allow_elements(&["p"]).build();
//! let mut discards = Discards::default();
//! let clean = policy.sanitize("<p onclick=\"x()\">Hi<script>alert(1)</script></p>", &mut discards);
//!
//! assert_eq!(clean, "<p>Hi</p>");
//! assert_eq!(discards.0, vec!["p[onclick]", "script"]);
//! ```

mod inline_style;
mod listener;
mod policy;
mod walker;

pub use listener::HtmlChangeListener;
pub use policy::{
    AttributeBuilder, ContentHook, FilteredAttributes, HtmlPolicy, HtmlPolicyBuilder,
    ValuePredicate,
};
