/// Receives a notification for every change the walker makes to a document.
///
/// Events arrive in document order. Doctypes, comments and null characters
/// are dropped without notification.
pub trait HtmlChangeListener {
    /// Error type produced by the policy's content hooks.
    type ContentError;

    /// An element was removed. Its text is dropped with it when the element
    /// is a raw-text container such as `script` or `style`.
    fn discarded_tag(&mut self, element_name: &str);

    /// One or more attributes were removed from a surviving element.
    /// Called at most once per element.
    fn discarded_attributes(&mut self, element_name: &str, attribute_names: &[&str]);

    /// A content hook rejected the text of `element_name`; the text was dropped.
    fn rejected_content(&mut self, element_name: &str, errors: Vec<Self::ContentError>);
}
