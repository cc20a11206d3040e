//! Per-section summarization with failure isolation.
//!
//! Each section is chunked to fit the model's input budget, each chunk is
//! summarised, and the chunk outputs are joined back together. A section whose
//! summarization fails is logged and left out; its siblings carry on.

use tracing::{debug, warn};

use crate::agent::{Summarizer, SummarizerError, SummaryLength};
use crate::chunker::{chunk_text, word_count, DEFAULT_MAX_TOKENS};
use crate::config::PipelineConfig;
use crate::summary::{Section, SectionSummary};

/// Thresholds controlling which text reaches the summarizer.
///
/// `min_section_words` and `min_chunk_chars` are deliberately separate: the
/// first decides whether a section is worth summarising at all, the second
/// whether an individual chunk is long enough to summarise rather than pass
/// through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPolicy {
    pub max_chunk_tokens: usize,
    pub min_section_words: usize,
    pub min_chunk_chars: usize,
    pub length: SummaryLength,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self {
            max_chunk_tokens: DEFAULT_MAX_TOKENS,
            min_section_words: 50,
            min_chunk_chars: 100,
            length: SummaryLength::default(),
        }
    }
}

impl From<&PipelineConfig> for SummaryPolicy {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            max_chunk_tokens: config.max_chunk_tokens,
            min_section_words: config.min_section_words,
            min_chunk_chars: config.min_chunk_chars,
            length: SummaryLength {
                min_tokens: config.min_summary_tokens,
                max_tokens: config.max_summary_tokens,
            },
        }
    }
}

/// Summarise `sections` in order, dropping the ones that are too short or fail.
///
/// An empty return value means nothing could be summarised; callers must
/// report that rather than treat it as success.
pub async fn summarize_sections(
    summarizer: &dyn Summarizer,
    sections: &[Section],
    policy: &SummaryPolicy,
) -> Vec<SectionSummary> {
    let mut summaries = Vec::with_capacity(sections.len());

    for section in sections {
        let words = word_count(&section.body);
        if words < policy.min_section_words {
            debug!(heading = %section.heading, words, "skipping short section");
            continue;
        }

        match summarize_section(summarizer, &section.body, policy).await {
            Ok(summary) => summaries.push(SectionSummary::new(section.heading.clone(), summary)),
            Err(e) => warn!(heading = %section.heading, error = %e, "dropping section"),
        }
    }

    summaries
}

/// Summarise one section body chunk by chunk.
pub async fn summarize_section(
    summarizer: &dyn Summarizer,
    body: &str,
    policy: &SummaryPolicy,
) -> Result<String, SummarizerError> {
    let chunks = chunk_text(body, policy.max_chunk_tokens);
    debug!(chunks = chunks.len(), "summarising section");

    let mut parts = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let trimmed = chunk.trim();
        if trimmed.chars().count() < policy.min_chunk_chars {
            parts.push(trimmed.to_string());
            continue;
        }
        parts.push(summarizer.summarize(trimmed, policy.length).await?);
    }

    Ok(parts.join(" "))
}
