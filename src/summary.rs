//! Article data model: extracted sections and the summaries built from them.

use serde::{Deserialize, Serialize};

/// A heading and the paragraph text that follows it.
///
/// Both fields are sanitized plain text; the heading is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

impl Section {
    pub fn new(heading: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            body: body.into(),
        }
    }
}

/// Summary of a single section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub heading: String,
    pub summary: String,
}

impl SectionSummary {
    pub fn new(heading: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            summary: summary.into(),
        }
    }
}

/// The summarised article returned to callers and kept in the result cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResult {
    /// Title of the source document
    pub title: String,
    /// The URL exactly as it was requested
    pub url: String,
    /// Section summaries in document order
    pub summaries: Vec<SectionSummary>,
}

impl ArticleResult {
    /// Check if the result has any section summaries
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}
