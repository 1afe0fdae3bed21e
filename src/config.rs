//! Application configuration.
//!
//! An [`AppConfig`] is built once in `main` and borrowed by every client.
//! Values come from, in increasing precedence: built-in defaults, an optional
//! YAML file, then CLI flags and environment variables.
//!
//! ```yaml
//! news_api_key: "..."
//! openai_api_key: "..."
//! api_base: "https://api.openai.com/v1"
//! model: "gpt-4"
//! page_size: 20
//! article_delay_ms: 1000
//! fold_unrecognized_labels: false
//! ```

use crate::cli::Cli;
use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_NEWS_ENDPOINT: &str = "https://newsapi.org/v2/top-headlines";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_ARTICLE_DELAY_MS: u64 = 1000;

fn default_news_endpoint() -> String {
    DEFAULT_NEWS_ENDPOINT.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_tts_endpoint() -> String {
    DEFAULT_TTS_ENDPOINT.to_string()
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_article_delay_ms() -> u64 {
    DEFAULT_ARTICLE_DELAY_MS
}

/// Process-wide settings and credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub news_api_key: Option<String>,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default = "default_news_endpoint")]
    pub news_endpoint: String,
    /// Base URL of an OpenAI-compatible API; `/chat/completions` is appended.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Pause between articles while processing.
    #[serde(default = "default_article_delay_ms")]
    pub article_delay_ms: u64,
    /// Put labels outside the canonical six into `Other` instead of their own group.
    #[serde(default)]
    pub fold_unrecognized_labels: bool,
    #[serde(default = "default_tts_endpoint")]
    pub tts_endpoint: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            news_api_key: None,
            openai_api_key: None,
            news_endpoint: default_news_endpoint(),
            api_base: default_api_base(),
            model: default_model(),
            page_size: default_page_size(),
            article_delay_ms: default_article_delay_ms(),
            fold_unrecognized_labels: false,
            tts_endpoint: default_tts_endpoint(),
        }
    }
}

impl AppConfig {
    /// Parse a YAML document; missing fields take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read a YAML config file.
    #[instrument(level = "info")]
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        let config = Self::from_yaml_str(&yaml)?;
        info!(path, "Loaded configuration file");
        Ok(config)
    }

    /// Build the configuration for this run from the parsed CLI.
    pub fn load(args: &Cli) -> Result<Self, ConfigError> {
        let mut config = match args.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI flags (and the environment variables clap folds into them).
    pub fn apply_overrides(&mut self, args: &Cli) {
        if let Some(key) = &args.news_api_key {
            self.news_api_key = Some(key.clone());
        }
        if let Some(key) = &args.openai_api_key {
            self.openai_api_key = Some(key.clone());
        }
        if let Some(model) = &args.model {
            self.model = model.clone();
        }
        if let Some(delay) = args.delay_ms {
            self.article_delay_ms = delay;
        }
        if args.fold_unrecognized {
            self.fold_unrecognized_labels = true;
        }
    }

    /// Check that every configured endpoint is a URL.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for endpoint in [&self.news_endpoint, &self.api_base, &self.tts_endpoint] {
            Url::parse(endpoint).map_err(|source| ConfigError::Endpoint {
                url: endpoint.clone(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn require_news_api_key(&self) -> Result<&str, ConfigError> {
        non_blank(&self.news_api_key).ok_or(ConfigError::MissingCredential("NEWS_API_KEY"))
    }

    pub fn require_openai_api_key(&self) -> Result<&str, ConfigError> {
        non_blank(&self.openai_api_key).ok_or(ConfigError::MissingCredential("OPENAI_API_KEY"))
    }

    pub fn article_delay(&self) -> Duration {
        Duration::from_millis(self.article_delay_ms)
    }

    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
