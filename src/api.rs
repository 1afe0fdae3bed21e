//! LLM API interaction.
//!
//! This module provides the interface for communicating with an
//! OpenAI-compatible chat-completion API.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining async LLM interaction
//! - [`ChatClient`]: Sends a [`Prompt`] to `{api_base}/chat/completions`
//!
//! The classification and summarization clients only see [`AskAsync`], so
//! any backend (or a scripted one in tests) can stand in for the HTTP client.
//!
//! Calls are made once. There is no retry or backoff here: callers turn any
//! [`ModelError`] into a fallback value.

use crate::config::AppConfig;
use crate::error::ModelError;
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// A single-message request to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    /// The user message.
    pub text: String,
    /// Sampling temperature; `0.0` asks for deterministic output.
    pub temperature: f32,
}

impl Prompt {
    pub fn new(text: impl Into<String>, temperature: f32) -> Self {
        Self {
            text: text.into(),
            temperature,
        }
    }
}

/// Trait for async LLM interaction.
///
/// Implementors send a prompt to a model and return the text of its first
/// completion.
pub trait AskAsync {
    /// Send a prompt to the LLM and receive the first completion's text.
    ///
    /// # Returns
    ///
    /// The completion text, or an error if the request failed or the model
    /// returned nothing.
    async fn ask(&self, prompt: &Prompt) -> Result<String, ModelError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    n: u8,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Take the first choice's text, trimmed. Blank or missing text is an error.
fn first_completion(response: ChatCompletionResponse) -> Result<String, ModelError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ModelError::EmptyCompletion)
}

/// HTTP client for an OpenAI-compatible chat-completion endpoint.
///
/// # Request shape
///
/// ```text
/// POST {api_base}/chat/completions
/// Authorization: Bearer {api_key}
/// {"model": "...", "messages": [{"role": "user", "content": "..."}], "temperature": 0.0, "n": 1}
/// ```
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    url: String,
    api_key: String,
    model: String,
}

impl ChatClient {
    pub fn new(http: Client, config: &AppConfig, api_key: &str) -> Self {
        Self {
            http,
            url: config.chat_completions_url(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        }
    }
}

impl AskAsync for ChatClient {
    #[instrument(level = "debug", skip_all, fields(model = %self.model, temperature = prompt.temperature))]
    async fn ask(&self, prompt: &Prompt) -> Result<String, ModelError> {
        let t0 = Instant::now();
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: &prompt.text,
            }],
            temperature: prompt.temperature,
            n: 1,
        };

        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                elapsed_ms = t0.elapsed().as_millis(),
                %status,
                "API call failed"
            );
            return Err(ModelError::Status {
                status: status.as_u16(),
                body: truncate_for_log(&text, 300),
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        let completion = first_completion(parsed)?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis(),
            completion = %truncate_for_log(&completion, 120),
            "API call succeeded"
        );
        Ok(completion)
    }
}

/// In-memory models for tests.
#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// A model whose answers come from a closure; records every prompt.
    pub struct ScriptedModel<F> {
        respond: F,
        prompts: Mutex<Vec<Prompt>>,
    }

    impl<F> ScriptedModel<F>
    where
        F: Fn(&Prompt) -> Result<String, ModelError>,
    {
        pub fn new(respond: F) -> Self {
            Self {
                respond,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }

        pub fn prompts(&self) -> Vec<Prompt> {
            self.prompts.lock().unwrap().clone()
        }
    }

    impl<F> AskAsync for ScriptedModel<F>
    where
        F: Fn(&Prompt) -> Result<String, ModelError>,
    {
        async fn ask(&self, prompt: &Prompt) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.clone());
            (self.respond)(prompt)
        }
    }

    /// An HTTP client for local test servers; ignores proxy settings.
    pub fn local_http() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    /// Accept one HTTP connection on a local port and answer it with `status`
    /// and `body`. Returns the base URL and a handle yielding the raw request.
    pub async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// A model that fails every call.
    pub fn unavailable() -> ScriptedModel<impl Fn(&Prompt) -> Result<String, ModelError>> {
        ScriptedModel::new(|_: &Prompt| {
            Err(ModelError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let body = ChatRequest {
            model: "gpt-4",
            messages: [ChatMessage {
                role: "user",
                content: "hello",
            }],
            temperature: 0.3,
            n: 1,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
        assert_eq!(json["n"], 1);
        assert!((json["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_first_completion_trims() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  Sports \n"}}, {"message": {"content": "Other"}}]}"#,
        )
        .unwrap();
        assert_eq!(first_completion(response).unwrap(), "Sports");
    }

    #[test]
    fn test_first_completion_empty() {
        let none: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(first_completion(none), Err(ModelError::EmptyCompletion)));

        let blank: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "   "}}]}"#).unwrap();
        assert!(matches!(first_completion(blank), Err(ModelError::EmptyCompletion)));

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(first_completion(null), Err(ModelError::EmptyCompletion)));
    }

    #[test]
    fn test_client_uses_configured_endpoint() {
        let mut config = AppConfig::default();
        config.api_base = "http://localhost:5001/v1".to_string();
        config.model = "local".to_string();
        let client = ChatClient::new(Client::new(), &config, "sk-test");
        assert_eq!(client.url, "http://localhost:5001/v1/chat/completions");
        assert_eq!(client.model, "local");
    }

    #[tokio::test]
    async fn test_scripted_model_records_prompts() {
        let model = testing::ScriptedModel::new(|p: &Prompt| Ok(p.text.to_uppercase()));
        let answer = model.ask(&Prompt::new("ping", 0.0)).await.unwrap();
        assert_eq!(answer, "PING");
        assert_eq!(model.calls(), 1);
        assert_eq!(model.prompts()[0].temperature, 0.0);
    }

    #[tokio::test]
    async fn test_ask_reports_non_success_status() {
        let (base, request) = testing::serve_once("500 Internal Server Error", "upstream exploded").await;
        let mut config = AppConfig::default();
        config.api_base = format!("{base}/v1");
        let client = ChatClient::new(testing::local_http(), &config, "sk-test");

        let result = client.ask(&Prompt::new("hello", 0.0)).await;
        match result {
            Err(ModelError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "upstream exploded");
            }
            other => panic!("expected status error, got {other:?}"),
        }

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /v1/chat/completions "));
        assert!(request.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(request.contains(r#""temperature":0.0"#));
    }

    #[tokio::test]
    async fn test_ask_returns_first_choice() {
        let (base, _request) = testing::serve_once(
            "200 OK",
            r#"{"choices": [{"message": {"role": "assistant", "content": " Sports\n"}}]}"#,
        )
        .await;
        let mut config = AppConfig::default();
        config.api_base = base;
        let client = ChatClient::new(testing::local_http(), &config, "sk-test");

        let answer = client.ask(&Prompt::new("hello", 0.0)).await.unwrap();
        assert_eq!(answer, "Sports");
    }
}
