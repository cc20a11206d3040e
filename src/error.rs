//! Request-level failures of the summarisation pipeline.
//!
//! Per-section summarization failures never show up here: they are logged and
//! the section is dropped. Everything in this enum ends one request and
//! nothing else.

use thiserror::Error;

use crate::agent::SummarizerError;
use crate::config::ConfigError;
use crate::scraper::FetchError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid URL format")]
    InvalidUrl,
    #[error("Failed to fetch article content: {0}")]
    Fetch(#[from] FetchError),
    #[error("Error parsing article: {0}")]
    Parse(String),
    #[error("No content found to summarize in the article")]
    NoContent,
    #[error("Could not generate summaries from the article content")]
    NoSummaries,
}

impl Error {
    /// HTTP status code a web front end should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Parse(_) => 500,
            Error::InvalidUrl | Error::Fetch(_) | Error::NoContent | Error::NoSummaries => 400,
        }
    }
}

/// Failures while wiring the pipeline together at startup.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Fetcher(#[from] FetchError),
    #[error("failed to initialise summarizer: {0}")]
    Summarizer(#[from] SummarizerError),
}
