//! Pipeline behaviour with in-process fetch and summarize stubs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use precis::api::{handle_summarize, SummarizeRequest};
use precis::sanitize::Sanitizer;
use precis::{
    Error, FetchError, Fetcher, Pipeline, ResultCache, SectionSummary, Summarizer, SummarizerError,
    SummaryLength,
};

/// Serves canned pages and counts requests.
#[derive(Default)]
struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl StubFetcher {
    fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }
}

#[async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or(FetchError::Status(reqwest::StatusCode::NOT_FOUND))
    }
}

/// Returns the first three words of its input; fails on "poison".
#[derive(Default)]
struct StubSummarizer {
    calls: AtomicUsize,
}

#[async_trait]
impl Summarizer for StubSummarizer {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn summarize(&self, text: &str, _length: SummaryLength) -> Result<String, SummarizerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if text.contains("poison") {
            return Err(SummarizerError::RequestFailed("model crashed".to_string()));
        }
        Ok(text.split_whitespace().take(3).collect::<Vec<_>>().join(" "))
    }
}

struct NotReadySummarizer;

#[async_trait]
impl Summarizer for NotReadySummarizer {
    fn name(&self) -> &str {
        "cold"
    }

    fn model(&self) -> &str {
        "cold-model"
    }

    async fn summarize(&self, _text: &str, _length: SummaryLength) -> Result<String, SummarizerError> {
        Err(SummarizerError::NotReady)
    }
}

struct PanickingSanitizer;

impl Sanitizer for PanickingSanitizer {
    fn sanitize(&self, _raw: &str) -> String {
        panic!("sanitizer exploded");
    }
}

const URL: &str = "https://example.com/article";

fn words(n: usize, word: &str) -> String {
    vec![word; n].join(" ")
}

fn three_section_page() -> String {
    format!(
        "<html><head><title>Three</title></head><body>\
         <h1>First</h1><p>{}</p>\
         <h2>Second</h2><p>poison {}</p>\
         <h2>Third</h2><p>{}</p>\
         </body></html>",
        words(60, "alpha"),
        words(60, "beta"),
        words(60, "gamma")
    )
}

fn pipeline(fetcher: Arc<StubFetcher>, summarizer: Arc<dyn Summarizer>) -> Pipeline {
    Pipeline::new(fetcher, summarizer, ResultCache::unbounded())
}

#[tokio::test]
async fn summarises_long_sections_and_skips_short_ones() {
    let html = format!(
        "<html><title>T</title><h1>A</h1><p>{}</p><h1>B</h1><p>short</p></html>",
        words(60, "word")
    );
    let fetcher = Arc::new(StubFetcher::default().with_page(URL, &html));
    let summarizer = Arc::new(StubSummarizer::default());
    let pipeline = pipeline(fetcher, summarizer.clone());

    let result = pipeline.summarize(URL).await.unwrap();

    assert_eq!(result.title, "T");
    assert_eq!(result.url, URL);
    assert_eq!(result.summaries, vec![SectionSummary::new("A", "word word word")]);
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_section_is_left_out() {
    let fetcher = Arc::new(StubFetcher::default().with_page(URL, &three_section_page()));
    let pipeline = pipeline(fetcher, Arc::new(StubSummarizer::default()));

    let result = pipeline.summarize(URL).await.unwrap();
    let headings: Vec<&str> = result.summaries.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(headings, vec!["First", "Third"]);
}

#[tokio::test]
async fn second_request_is_served_from_cache() {
    let fetcher = Arc::new(StubFetcher::default().with_page(URL, &three_section_page()));
    let summarizer = Arc::new(StubSummarizer::default());
    let pipeline = pipeline(fetcher.clone(), summarizer.clone());

    let first = pipeline.summarize(URL).await.unwrap();
    let summarize_calls = summarizer.calls.load(Ordering::SeqCst);
    let second = pipeline.summarize(URL).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    assert_eq!(summarizer.calls.load(Ordering::SeqCst), summarize_calls);
    assert_eq!(pipeline.cache().stats().hits(), 1);
}

#[tokio::test]
async fn cosmetically_different_urls_are_cached_separately() {
    let other = format!("{URL}/");
    let fetcher = Arc::new(
        StubFetcher::default()
            .with_page(URL, &three_section_page())
            .with_page(&other, &three_section_page()),
    );
    let pipeline = pipeline(fetcher.clone(), Arc::new(StubSummarizer::default()));

    pipeline.summarize(URL).await.unwrap();
    pipeline.summarize(&other).await.unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert_eq!(pipeline.cache().len().await, 2);
}

#[tokio::test]
async fn concurrent_requests_share_one_computation() {
    let fetcher = Arc::new(StubFetcher {
        delay: Some(Duration::from_millis(50)),
        ..StubFetcher::default().with_page(URL, &three_section_page())
    });
    let pipeline = Arc::new(pipeline(fetcher.clone(), Arc::new(StubSummarizer::default())));

    let tasks: Vec<_> = (0..5)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            tokio::spawn(async move { pipeline.summarize(URL).await })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap().unwrap());
    }

    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_url_is_rejected_before_fetching() {
    let fetcher = Arc::new(StubFetcher::default());
    let pipeline = pipeline(fetcher.clone(), Arc::new(StubSummarizer::default()));

    assert!(matches!(pipeline.summarize("not a url").await, Err(Error::InvalidUrl)));
    assert!(matches!(pipeline.summarize("").await, Err(Error::InvalidUrl)));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_is_reported_and_not_cached() {
    let fetcher = Arc::new(StubFetcher::default());
    let pipeline = pipeline(fetcher.clone(), Arc::new(StubSummarizer::default()));

    let err = pipeline.summarize(URL).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Status(_))));
    assert_eq!(err.status_code(), 400);

    pipeline.summarize(URL).await.unwrap_err();
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    assert!(pipeline.cache().is_empty().await);
}

#[tokio::test]
async fn page_without_paragraphs_has_no_content() {
    let fetcher = Arc::new(
        StubFetcher::default().with_page(URL, "<html><body><h1>Just a heading</h1></body></html>"),
    );
    let pipeline = pipeline(fetcher, Arc::new(StubSummarizer::default()));

    assert!(matches!(pipeline.summarize(URL).await, Err(Error::NoContent)));
}

#[tokio::test]
async fn only_short_sections_means_no_summaries() {
    let fetcher = Arc::new(
        StubFetcher::default().with_page(URL, "<h1>A</h1><p>too short</p><h2>B</h2><p>also short</p>"),
    );
    let pipeline = pipeline(fetcher, Arc::new(StubSummarizer::default()));

    assert!(matches!(pipeline.summarize(URL).await, Err(Error::NoSummaries)));
}

#[tokio::test]
async fn unready_summarizer_means_no_summaries() {
    let fetcher = Arc::new(StubFetcher::default().with_page(URL, &three_section_page()));
    let pipeline = pipeline(fetcher, Arc::new(NotReadySummarizer));

    assert!(matches!(pipeline.summarize(URL).await, Err(Error::NoSummaries)));
}

#[tokio::test]
async fn headingless_page_falls_back_to_main_content() {
    let html = format!(
        "<html><body><div><p>{}</p></div><p>{}</p></body></html>",
        words(30, "one"),
        words(30, "two")
    );
    let fetcher = Arc::new(StubFetcher::default().with_page(URL, &html));
    let pipeline = pipeline(fetcher, Arc::new(StubSummarizer::default()));

    let result = pipeline.summarize(URL).await.unwrap();
    assert_eq!(result.title, "Article Summary");
    assert_eq!(result.summaries, vec![SectionSummary::new("Main Content", "one one one")]);
}

#[tokio::test]
async fn extraction_panic_becomes_parse_failure() {
    let fetcher = Arc::new(StubFetcher::default().with_page(URL, &three_section_page()));
    let pipeline = pipeline(fetcher, Arc::new(StubSummarizer::default()))
        .with_sanitizer(Arc::new(PanickingSanitizer));

    let err = pipeline.summarize(URL).await.unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
    assert_eq!(err.status_code(), 500);
}

#[tokio::test]
async fn summarize_handler_maps_errors_to_bodies() {
    let fetcher = Arc::new(StubFetcher::default());
    let pipeline = pipeline(fetcher, Arc::new(StubSummarizer::default()));

    let response = handle_summarize(&pipeline, &SummarizeRequest { url: None })
        .await
        .unwrap_err();
    assert_eq!(response.status, 400);
    assert_eq!(response.body.error, "Invalid URL format");
}
