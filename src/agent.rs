//! Summarization backends.
//!
//! A [`Summarizer`] is built once at startup by [`build_summarizer`] and shared
//! by reference for the life of the process. Two providers exist: the Hugging
//! Face inference API (abstractive models such as BART) and Gemini via
//! rstructor.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use rstructor::{GeminiClient, GeminiModel, LLMClient};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::config::{Config, ConfigError};

/// Message reported while the model behind a backend is not available yet.
pub const NOT_READY_MESSAGE: &str = "Summarization model not loaded. Please try again later.";

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("{}", NOT_READY_MESSAGE)]
    NotReady,
    #[error("summarization request failed: {0}")]
    RequestFailed(String),
    #[error("summarizer returned no text")]
    EmptyResponse,
    #[error("configuration error: {0}")]
    ConfigError(#[from] ConfigError),
}

impl From<reqwest::Error> for SummarizerError {
    fn from(err: reqwest::Error) -> Self {
        SummarizerError::RequestFailed(err.to_string())
    }
}

/// Bounds on the length of a generated summary, in model tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLength {
    pub min_tokens: usize,
    pub max_tokens: usize,
}

impl Default for SummaryLength {
    fn default() -> Self {
        Self {
            min_tokens: 50,
            max_tokens: 200,
        }
    }
}

/// A text-to-summary capability.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Short provider name for logs and health reports.
    fn name(&self) -> &str;

    /// Model identifier.
    fn model(&self) -> &str;

    /// Whether inference runs on accelerator hardware.
    fn accelerated(&self) -> bool {
        false
    }

    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, SummarizerError>;
}

/// Construct the configured backend.
pub fn build_summarizer(config: &Config) -> Result<Arc<dyn Summarizer>, SummarizerError> {
    let api_key = config.api_key()?;
    let summarizer: Arc<dyn Summarizer> = match config.agent.provider.as_str() {
        "gemini" => {
            let key = api_key.ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string()))?;
            Arc::new(GeminiSummarizer::new(key, &config.agent.model))
        }
        _ => Arc::new(HuggingFaceSummarizer::new(
            &config.agent.endpoint,
            &config.agent.model,
            api_key.map(str::to_string),
        )?),
    };

    info!(
        provider = summarizer.name(),
        model = summarizer.model(),
        "summarizer ready"
    );
    Ok(summarizer)
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_length: usize,
    min_length: usize,
    do_sample: bool,
}

#[derive(Deserialize)]
struct InferenceOutput {
    summary_text: String,
}

/// Summarization through the Hugging Face inference API.
///
/// The API answers 503 while a cold model is loading; that is reported as
/// [`SummarizerError::NotReady`].
pub struct HuggingFaceSummarizer {
    client: Client,
    url: String,
    model: String,
    token: Option<String>,
}

impl HuggingFaceSummarizer {
    pub fn new(endpoint: &str, model: &str, token: Option<String>) -> Result<Self, SummarizerError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            url: format!("{}/models/{}", endpoint.trim_end_matches('/'), model),
            model: model.to_string(),
            token,
        })
    }
}

impl std::fmt::Debug for HuggingFaceSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceSummarizer")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    fn name(&self) -> &str {
        "huggingface"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn accelerated(&self) -> bool {
        true
    }

    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, SummarizerError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: length.max_tokens,
                min_length: length.min_tokens,
                do_sample: false,
            },
        };

        let mut builder = self.client.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        match response.status() {
            StatusCode::SERVICE_UNAVAILABLE => return Err(SummarizerError::NotReady),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(SummarizerError::RequestFailed(format!("{status}: {body}")));
            }
            _ => {}
        }

        let outputs: Vec<InferenceOutput> = response.json().await?;
        outputs
            .into_iter()
            .next()
            .map(|output| output.summary_text.trim().to_string())
            .filter(|summary| !summary.is_empty())
            .ok_or(SummarizerError::EmptyResponse)
    }
}

/// Summarization through Gemini.
pub struct GeminiSummarizer {
    api_key: String,
    model: String,
}

impl GeminiSummarizer {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

impl std::fmt::Debug for GeminiSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiSummarizer")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn accelerated(&self) -> bool {
        true
    }

    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String, SummarizerError> {
        let client = GeminiClient::new(&self.api_key)
            .map_err(|e| SummarizerError::RequestFailed(e.to_string()))?
            .model(parse_gemini_model(&self.model));

        let prompt = summary_prompt(text, length);
        let result = client
            .generate_with_metadata(&prompt)
            .await
            .map_err(|e| SummarizerError::RequestFailed(e.to_string()))?;

        let summary = result.text.trim();
        if summary.is_empty() {
            return Err(SummarizerError::EmptyResponse);
        }
        Ok(summary.to_string())
    }
}

/// Prompt asking an instruction-tuned model for a plain abstractive summary.
fn summary_prompt(text: &str, length: SummaryLength) -> String {
    format!(
        r#"Summarise the following passage in plain prose, between {} and {} tokens.
Do not add headings, bullet points, markdown or commentary. Only output the summary.

---

{}"#,
        length.min_tokens, length.max_tokens, text
    )
}

/// Parse a model string into a GeminiModel
fn parse_gemini_model(model: &str) -> GeminiModel {
    match model {
        "gemini-2.0-flash" => GeminiModel::Gemini20Flash,
        "gemini-2.5-flash" => GeminiModel::Gemini25Flash,
        "gemini-2.5-pro" => GeminiModel::Gemini25Pro,
        _ => GeminiModel::Gemini20Flash, // Default
    }
}
