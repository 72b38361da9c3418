//! Configuration for validation calls.

/// Options for [`crate::HtmlValidator`].
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Include the sanitized document in outcomes where sanitizing changed it
    /// (default: off).
    ///
    /// Off by default so that document content does not end up in logs or
    /// telemetry by way of the outcome; a placeholder is returned instead.
    pub include_sanitized_output: bool,
}

impl ValidationConfig {
    #[must_use]
    pub fn with_sanitized_output() -> Self {
        Self {
            include_sanitized_output: true,
        }
    }
}
