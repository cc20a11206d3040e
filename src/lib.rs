//! # Precis
//!
//! Section-by-section summarisation of web articles.
//!
//! ## Features
//!
//! - **Section-aware extraction**: Splits an article into (heading, body) sections, with a
//!   whole-page fallback when no heading structure exists
//! - **Chunked summarisation**: Long sections are split to fit the model's input budget and
//!   summarised chunk by chunk; a failing section is dropped, not fatal
//! - **Result cache**: Finished articles are memoised per URL, one computation per URL at a time
//! - **Provider agnostic**: Hugging Face inference API or Gemini via rstructor
//! - **Markdown export**: Title plus one `##` block per section

pub mod agent;
pub mod api;
pub mod cache;
pub mod chunker;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod orchestrator;
pub mod pipeline;
pub mod sanitize;
pub mod scraper;
pub mod summary;
pub mod validate;

pub use agent::{Summarizer, SummarizerError, SummaryLength};
pub use cache::ResultCache;
pub use config::Config;
pub use error::Error;
pub use pipeline::Pipeline;
pub use scraper::{FetchError, Fetcher};
pub use summary::{ArticleResult, Section, SectionSummary};
