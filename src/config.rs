//! Configuration loading and management for precis.
//!
//! Loads settings from `precis.toml` with environment variable overrides for sensitive data.
//! Every field has a default, so running without a config file is fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("missing required API key for provider: {0}")]
    MissingApiKey(String),
    #[error("unknown summarizer provider: {0}")]
    UnknownProvider(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Summarization backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Backend provider: "huggingface" or "gemini"
    pub provider: String,
    /// Model identifier (e.g., "facebook/bart-large-cnn")
    pub model: String,
    /// Base URL of the Hugging Face inference endpoint
    pub endpoint: String,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub gemini_key: Option<String>,
    #[serde(default)]
    pub huggingface_token: Option<String>,
}

/// Thresholds and budgets used while summarising sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Word budget per chunk sent to the summarizer
    pub max_chunk_tokens: usize,
    /// Sections with fewer words than this are skipped
    pub min_section_words: usize,
    /// Chunks shorter than this many characters pass through unsummarised
    pub min_chunk_chars: usize,
    pub min_summary_tokens: usize,
    pub max_summary_tokens: usize,
}

/// Article fetching configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached articles, 0 for no limit
    pub capacity: usize,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Load configuration from the default location (precis.toml in cwd or home),
    /// falling back to defaults when no file exists
    pub fn load() -> Result<Self, ConfigError> {
        match Self::find_config_file() {
            Some(path) => Self::load_from(&path),
            None => {
                let mut config = Config::default();
                config.apply_env(|name| std::env::var(name).ok());
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without consulting the environment
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Override keys and the model from environment variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.api.gemini_key = Some(key);
        }
        if let Some(token) = lookup("HF_API_TOKEN") {
            self.api.huggingface_token = Some(token);
        }
        if let Some(model) = lookup("SUMMARIZER_MODEL") {
            self.agent.model = model;
        }
    }

    /// Reject settings the pipeline cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pipeline = &self.pipeline;
        if pipeline.max_chunk_tokens == 0 {
            return Err(ConfigError::Invalid(
                "pipeline.max_chunk_tokens must be at least 1".to_string(),
            ));
        }
        if pipeline.min_summary_tokens > pipeline.max_summary_tokens {
            return Err(ConfigError::Invalid(format!(
                "pipeline.min_summary_tokens ({}) exceeds pipeline.max_summary_tokens ({})",
                pipeline.min_summary_tokens, pipeline.max_summary_tokens
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from("precis.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("precis")
            .join("precis.toml");
        home_config.exists().then_some(home_config)
    }

    /// Get the API key for the configured provider, if it needs one
    pub fn api_key(&self) -> Result<Option<&str>, ConfigError> {
        match self.agent.provider.as_str() {
            "gemini" => self
                .api
                .gemini_key
                .as_deref()
                .map(Some)
                .ok_or_else(|| ConfigError::MissingApiKey("gemini".to_string())),
            // the public inference API works without a token, just rate limited
            "huggingface" => Ok(self.api.huggingface_token.as_deref()),
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            provider: "huggingface".to_string(),
            model: "facebook/bart-large-cnn".to_string(),
            endpoint: "https://router.huggingface.co/hf-inference".to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_tokens: crate::chunker::DEFAULT_MAX_TOKENS,
            min_section_words: 50,
            min_chunk_chars: 100,
            min_summary_tokens: 50,
            max_summary_tokens: 200,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("precis/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256 }
    }
}
