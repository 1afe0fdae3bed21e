//! Error types for each external collaborator.
//!
//! Every remote service gets its own error enum so callers can decide how to
//! degrade. None of these are retried: a fetch error becomes an empty article
//! list, a model error becomes a fallback value, and a speech error skips the
//! audio file.

use thiserror::Error;

/// Problems building the [`AppConfig`](crate::config::AppConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("{0} must be set (flag, environment variable, or config file)")]
    MissingCredential(&'static str),

    #[error("invalid endpoint URL {url}: {source}")]
    Endpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Failures talking to the news search endpoint.
#[derive(Debug, Error)]
pub enum NewsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body had no `articles` field; carries the API's `message`.
    #[error("{0}")]
    Api(String),
}

impl NewsError {
    /// The text shown to the user when a fetch degrades to "no results".
    pub fn user_message(&self) -> String {
        match self {
            NewsError::Api(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Failures of a single chat-completion call.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("model API returned no completion")]
    EmptyCompletion,
}

/// Failures rendering a summary to audio.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("nothing to synthesize")]
    EmptyText,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("speech endpoint returned {0}")]
    Status(u16),

    #[error("invalid speech endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_user_message_is_raw_message() {
        let e = NewsError::Api("Your API key is invalid.".to_string());
        assert_eq!(e.user_message(), "Your API key is invalid.");
    }

    #[test]
    fn test_missing_credential_names_the_key() {
        let e = ConfigError::MissingCredential("NEWS_API_KEY");
        assert!(e.to_string().starts_with("NEWS_API_KEY must be set"));
    }

    #[test]
    fn test_status_error_display() {
        let e = ModelError::Status {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(e.to_string(), "model API returned 429: rate limited");
    }
}
