//! OpenAI-compatible chat-completions adapter
//!
//! One request per run against `{base_url}/chat/completions`. Failures are
//! surfaced as-is; the pipeline treats them as fatal and never retries.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use xscout_domain::{SummarizeError, Summarizer};

use super::LlmConfig;

/// Default endpoint: NanoGPT's OpenAI-compatible API
pub const DEFAULT_BASE_URL: &str = "https://nano-gpt.com/api/v1";

/// Chat-completions summarizer for OpenAI-compatible providers
pub struct ChatSummarizer {
    client: Client,
    api_key: SecretString,
    base_url: String,
    config: LlmConfig,
}

impl ChatSummarizer {
    pub fn new(api_key: SecretString, config: LlmConfig) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), config)
    }

    pub fn with_base_url(api_key: SecretString, base_url: String, config: LlmConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            base_url,
            config,
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    async fn summarize(
        &self,
        system_prompt: &str,
        user_payload: &str,
    ) -> Result<String, SummarizeError> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_payload.to_string(),
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/chat/completions", self.base_url);
        tracing::info!(model = %self.config.model, "Generating brief");

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SummarizeError::Timeout
                } else {
                    SummarizeError::Api(e.to_string())
                }
            })?;

        if response.status() == 429 {
            return Err(SummarizeError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| SummarizeError::Malformed(e.to_string()))?;

        let text = api_response
            .choices
            .into_iter()
            .filter_map(|c| c.message.content)
            .collect::<Vec<_>>()
            .join("");

        if text.trim().is_empty() {
            return Err(SummarizeError::Empty);
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summarizer(server: &MockServer) -> ChatSummarizer {
        ChatSummarizer::with_base_url(
            SecretString::new("test-key".into()),
            server.uri(),
            LlmConfig::default(),
        )
    }

    #[tokio::test]
    async fn returns_completion_text() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "## HEADLINES\n- item"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let text = summarizer(&server)
            .summarize("system", "Brief me.")
            .await
            .unwrap();

        assert!(text.starts_with("## HEADLINES"));
    }

    #[tokio::test]
    async fn empty_completion_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": ""}}]
            })))
            .mount(&server)
            .await;

        let err = summarizer(&server)
            .summarize("system", "Brief me.")
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizeError::Empty));
    }

    #[tokio::test]
    async fn api_error_includes_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = summarizer(&server)
            .summarize("system", "Brief me.")
            .await
            .unwrap_err();

        match err {
            SummarizeError::Api(msg) => assert!(msg.contains("500")),
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn rate_limit_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let err = summarizer(&server)
            .summarize("system", "Brief me.")
            .await
            .unwrap_err();

        assert!(matches!(err, SummarizeError::RateLimited));
    }

    #[tokio::test]
    async fn sends_system_and_user_messages() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        summarizer(&server)
            .summarize("be brief", "Brief me.\n\n{}")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be brief");
        assert_eq!(body["messages"][1]["role"], "user");
    }
}
