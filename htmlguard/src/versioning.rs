//! Selection of the policy generation that applies to a document.
//!
//! Documents are validated under the policy that was in effect when they were
//! created, so content accepted under an older generation keeps validating
//! the same way when it is checked again later.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A generation of sanitization rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PolicyVariant {
    /// Element and attribute allow-listing only. `style` element text passes
    /// through unexamined.
    ValidateOnly,
    /// Allow-listing plus validation and escaping of `style` element text.
    ValidateAndSanitizeCss,
}

/// A variant and the instant from which it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PolicyVersion {
    pub effective_from: DateTime<Utc>,
    pub variant: PolicyVariant,
}

/// Instant from which `style` element text is validated: 2021-12-01T00:00:00Z.
pub static CSS_VALIDATION_CUTOVER: LazyLock<DateTime<Utc>> = LazyLock::new(|| {
    match DateTime::from_timestamp(1_638_316_800, 0) {
        Some(instant) => instant,
        None => panic!("Invalid CSS validation cutover timestamp"),
    }
});

/// Picks the latest policy version whose `effective_from` is not after the
/// document's creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicySelector {
    baseline: PolicyVariant,
    versions: Vec<PolicyVersion>,
}

impl PolicySelector {
    /// `baseline` applies to documents created before every version in `versions`.
    #[must_use]
    pub fn new(baseline: PolicyVariant, versions: impl IntoIterator<Item = PolicyVersion>) -> Self {
        let mut versions: Vec<PolicyVersion> = versions.into_iter().collect();
        versions.sort_by_key(|version| version.effective_from);
        Self { baseline, versions }
    }

    #[must_use]
    pub fn select(&self, document_created: DateTime<Utc>) -> PolicyVariant {
        self.versions
            .iter()
            .rev()
            .find(|version| version.effective_from <= document_created)
            .map_or(self.baseline, |version| version.variant)
    }

    #[must_use]
    pub fn versions(&self) -> &[PolicyVersion] {
        &self.versions
    }
}

impl Default for PolicySelector {
    fn default() -> Self {
        Self::new(
            PolicyVariant::ValidateOnly,
            [PolicyVersion {
                effective_from: *CSS_VALIDATION_CUTOVER,
                variant: PolicyVariant::ValidateAndSanitizeCss,
            }],
        )
    }
}
