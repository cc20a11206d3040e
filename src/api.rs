//! Request and response payloads exchanged with a front end.
//!
//! The HTTP server itself lives elsewhere; these types pin down the JSON
//! shapes it sends and receives, and the handlers map them onto the pipeline.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::export::{content_disposition, download_filename, render_markdown};
use crate::extract::DEFAULT_TITLE;
use crate::pipeline::Pipeline;
use crate::summary::{ArticleResult, SectionSummary};

/// `{"url": "..."}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

/// `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

/// An error body paired with the status code it should be served with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub status: u16,
    pub body: ErrorBody,
}

impl From<Error> for ErrorResponse {
    fn from(err: Error) -> Self {
        Self {
            status: err.status_code(),
            body: ErrorBody::from(&err),
        }
    }
}

/// Body of an export request. A saved [`ArticleResult`] deserializes into it
/// directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub summaries: Vec<SectionSummary>,
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

impl From<ArticleResult> for ExportRequest {
    fn from(result: ArticleResult) -> Self {
        Self {
            title: result.title,
            summaries: result.summaries,
        }
    }
}

/// Contents of a saved summary file: the JSON of one result, or an array of
/// them as printed by `summarise --json` for several URLs.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ExportFile {
    Many(Vec<ExportRequest>),
    One(ExportRequest),
}

impl ExportFile {
    pub fn into_requests(self) -> Vec<ExportRequest> {
        match self {
            Self::Many(requests) => requests,
            Self::One(request) => vec![request],
        }
    }
}

/// A rendered Markdown document ready to be served as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDownload {
    pub content_type: &'static str,
    pub content_disposition: String,
    pub filename: String,
    pub body: String,
}

/// Informational status of the summarisation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub provider: String,
    pub model: String,
    pub accelerated: bool,
}

/// Summarise the requested URL. A missing URL counts as an invalid one.
pub async fn handle_summarize(
    pipeline: &Pipeline,
    request: &SummarizeRequest,
) -> Result<ArticleResult, ErrorResponse> {
    let url = request.url.as_deref().unwrap_or_default();
    pipeline.summarize(url).await.map_err(ErrorResponse::from)
}

pub fn handle_export(request: &ExportRequest) -> MarkdownDownload {
    MarkdownDownload {
        content_type: "text/markdown",
        content_disposition: content_disposition(&request.title),
        filename: download_filename(&request.title),
        body: render_markdown(&request.title, &request.summaries),
    }
}

pub fn handle_health(pipeline: &Pipeline) -> HealthReport {
    let summarizer = pipeline.summarizer();
    HealthReport {
        status: "ok".to_string(),
        provider: summarizer.name().to_string(),
        model: summarizer.model().to_string(),
        accelerated: summarizer.accelerated(),
    }
}
