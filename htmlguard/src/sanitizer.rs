//! Runs the policy walker over a document and turns its reports into errors.

use tracing::debug;

use crate::collector::ErrorCollector;
use crate::error::SanitizeError;
use crate::policy::policy_for;
use crate::versioning::PolicyVariant;

const DOCTYPE: &str = "<!doctype html>";

/// Sanitize `html` under the policy of `variant`.
///
/// A leading `<!doctype html>` (in any case, after optional whitespace) is
/// kept as the prefix of the output, since the walker drops doctypes.
///
/// # Errors
///
/// Returns [`SanitizeError::PolicyViolation`] with every discarded element,
/// discarded attribute and style-element violation, in document order.
pub fn sanitize(html: &str, variant: PolicyVariant) -> Result<String, SanitizeError> {
    let mut collector = ErrorCollector::new();
    let body = policy_for(variant).sanitize(html, &mut collector);

    if collector.has_errors() {
        debug!(?variant, errors = collector.error_count(), "document violates policy");
        return Err(SanitizeError::PolicyViolation(collector.into_errors()));
    }

    if starts_with_doctype(html) {
        Ok(format!("{DOCTYPE}{body}"))
    } else {
        Ok(body)
    }
}

fn starts_with_doctype(html: &str) -> bool {
    html.trim_start()
        .get(..DOCTYPE.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(DOCTYPE))
}
