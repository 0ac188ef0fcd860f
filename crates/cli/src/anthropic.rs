//! Anthropic Messages API transport for the translation pipeline.

use deck_core::{Error, Result, TranslationClient};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Environment variable overriding the API endpoint.
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

/// Environment variable overriding the model id.
pub const MODEL_ENV: &str = "DECK_TRANSLATE_MODEL";

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 8192;

/// Messages API request body.
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Messages API response body; only the parts we read.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

impl MessagesResponse {
    /// Concatenate the text blocks.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect()
    }
}

/// Blocking client that sends each prompt as a single user message.
#[derive(Debug)]
pub struct AnthropicClient {
    http: reqwest::blocking::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl AnthropicClient {
    /// Create a client for `base_url` (e.g. `https://api.anthropic.com`).
    pub fn new(api_key: impl Into<String>, base_url: &str, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            model: model.into(),
        }
    }

    /// Build a client from `ANTHROPIC_API_KEY`, `ANTHROPIC_BASE_URL` and
    /// `DECK_TRANSLATE_MODEL`.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::ConfigError(format!("{} is not set", API_KEY_ENV)))?;
        let base_url = non_empty_var(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model = non_empty_var(MODEL_ENV).unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self::new(api_key, &base_url, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

impl TranslationClient for AnthropicClient {
    fn send(&self, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(prompt))
            .send()
            .map_err(|e| Error::TransportError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            log::error!("Anthropic API error ({}): {}", status, body);
            return Err(Error::TransportError(format!(
                "Anthropic API error ({}): {}",
                status, body
            )));
        }

        let body: MessagesResponse = response
            .json()
            .map_err(|e| Error::TransportError(format!("Failed to parse response: {}", e)))?;

        Ok(body.text())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalized() {
        let client = AnthropicClient::new("key", "http://localhost:8080/", "m");
        assert_eq!(client.endpoint, "http://localhost:8080/v1/messages");
    }

    #[test]
    fn test_request_body_shape() {
        let client = AnthropicClient::new("key", DEFAULT_BASE_URL, "claude-test");
        let body = serde_json::to_value(client.request_body("Translate me")).unwrap();

        assert_eq!(body["model"], "claude-test");
        assert_eq!(body["max_tokens"], 8192);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Translate me");
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let json = r#"{
            "id": "msg_1",
            "type": "message",
            "content": [
                {"type": "text", "text": "<a:t id=\"0\">你好</a:t>\n"},
                {"type": "tool_use", "id": "t", "name": "x", "input": {}},
                {"type": "text", "text": "<a:t id=\"1\">AWS Lambda</a:t>"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 5}
        }"#;
        let response: MessagesResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.text(),
            "<a:t id=\"0\">你好</a:t>\n<a:t id=\"1\">AWS Lambda</a:t>"
        );
    }
}
