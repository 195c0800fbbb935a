//! Chat-completions client for the analysis call.
//!
//! One synchronous (from the pipeline's point of view) request per run:
//! a system persona message plus a user message, answered with generated
//! text. The [`ChatClient`] trait is the seam that lets tests substitute
//! a deterministic stub.

use crate::models::Secret;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One message of the two-part analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Errors from the completion client.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("cannot reach the completion API at {0}")]
    Connect(String),

    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse completion response: {0}")]
    Parse(#[source] reqwest::Error),

    #[error("completion response contained no choices")]
    EmptyResponse,
}

/// A client that turns a model id and messages into generated text.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, model: &str, messages: &[ChatMessage])
        -> Result<String, LlmError>;
}

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
    temperature: Option<f32>,
}

impl OpenAiClient {
    /// Build a client with bearer authentication and a request timeout.
    pub fn new(
        api_key: &Secret,
        base_url: impl Into<String>,
        timeout_seconds: u64,
        temperature: Option<f32>,
    ) -> anyhow::Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key.expose()))
            .map_err(|_| anyhow::anyhow!("API key contains characters not valid in a header"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            timeout_seconds,
            temperature,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout_seconds)
                } else if e.is_connect() {
                    LlmError::Connect(self.base_url.clone())
                } else {
                    LlmError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse =
            response.json().await.map_err(LlmError::Parse)?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![
                ChatMessage::system("Be helpful"),
                ChatMessage::user("Hello"),
            ],
            temperature: None,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("gpt-4o-mini"));
        assert!(json.contains("\"role\":\"system\""));
        assert!(json.contains("Be helpful"));
        assert!(!json.contains("temperature"));
    }

    #[test]
    fn test_response_parsing_takes_first_choice() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "first"}},
                {"message": {"role": "assistant", "content": "second"}}
            ]
        }"#;

        let parsed: ChatCompletionResponse = serde_json::from_str(raw).unwrap();
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap();

        assert_eq!(content, "first");
    }

    #[test]
    fn test_api_error_display_includes_status_and_body() {
        let err = LlmError::Api {
            status: 401,
            body: "invalid api key".to_string(),
        };

        let rendered = err.to_string();
        assert!(rendered.contains("401"));
        assert!(rendered.contains("invalid api key"));
    }

    #[test]
    fn test_client_rejects_unprintable_api_key() {
        let key = Secret::new("bad\nkey");
        assert!(OpenAiClient::new(&key, "https://api.openai.com", 60, None).is_err());
    }
}
