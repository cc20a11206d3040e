//! End-to-end article summarisation.
//!
//! validate → cache lookup → fetch → extract → summarise sections → cache.

use std::sync::Arc;

use tracing::{error, info};

use crate::agent::{build_summarizer, Summarizer};
use crate::cache::ResultCache;
use crate::config::Config;
use crate::error::{Error, SetupError};
use crate::extract::extract_sections;
use crate::orchestrator::{summarize_sections, SummaryPolicy};
use crate::sanitize::{Sanitizer, TextSanitizer};
use crate::scraper::{Fetcher, HttpFetcher};
use crate::summary::ArticleResult;
use crate::validate::is_valid_url;

/// Owns the capabilities and the result cache for the life of the process.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    summarizer: Arc<dyn Summarizer>,
    sanitizer: Arc<dyn Sanitizer>,
    cache: ResultCache,
    policy: SummaryPolicy,
}

impl Pipeline {
    pub fn new(fetcher: Arc<dyn Fetcher>, summarizer: Arc<dyn Summarizer>, cache: ResultCache) -> Self {
        Self {
            fetcher,
            summarizer,
            sanitizer: Arc::new(TextSanitizer),
            cache,
            policy: SummaryPolicy::default(),
        }
    }

    /// Build the HTTP fetcher, the configured summarizer and the cache.
    pub fn from_config(config: &Config) -> Result<Self, SetupError> {
        config.validate()?;
        let fetcher = Arc::new(HttpFetcher::new(&config.fetch)?);
        let summarizer = build_summarizer(config)?;
        let cache = ResultCache::from_capacity(config.cache.capacity);

        Ok(Self::new(fetcher, summarizer, cache).with_policy(SummaryPolicy::from(&config.pipeline)))
    }

    pub fn with_policy(mut self, policy: SummaryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_sanitizer(mut self, sanitizer: Arc<dyn Sanitizer>) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn summarizer(&self) -> &dyn Summarizer {
        self.summarizer.as_ref()
    }

    /// Summarise the article at `url`, serving repeat requests from the cache.
    pub async fn summarize(&self, url: &str) -> Result<ArticleResult, Error> {
        if !is_valid_url(url) {
            return Err(Error::InvalidUrl);
        }

        self.cache
            .get_or_try_insert(url, || self.compute(url))
            .await
    }

    async fn compute(&self, url: &str) -> Result<ArticleResult, Error> {
        let html = self.fetcher.fetch(url).await.map_err(|e| {
            error!(url, error = %e, "error fetching article");
            Error::Fetch(e)
        })?;

        // html parsing is CPU-bound and the parsed tree is not Send
        let sanitizer = Arc::clone(&self.sanitizer);
        let article = tokio::task::spawn_blocking(move || extract_sections(&html, sanitizer.as_ref()))
            .await
            .map_err(|e| {
                error!(url, error = %e, "error parsing article");
                Error::Parse(e.to_string())
            })?;

        if article.sections.is_empty() {
            return Err(Error::NoContent);
        }

        let summaries =
            summarize_sections(self.summarizer.as_ref(), &article.sections, &self.policy).await;
        let result = ArticleResult {
            title: article.title,
            url: url.to_string(),
            summaries,
        };
        if result.is_empty() {
            return Err(Error::NoSummaries);
        }

        info!(
            url,
            sections = article.sections.len(),
            summaries = result.summaries.len(),
            "summarised article"
        );
        Ok(result)
    }
}
