use std::{env, time::Duration};

use reqwest::{StatusCode, blocking::Client};
use serde_json::{Value, json};

use super::{ContextGenerator, ContextRequest, ContextResult, LlmError, build_prompt, parse_response};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";

const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 500;
const TIMEOUT: Duration = Duration::from_secs(60);

/// Messages API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl AnthropicClient {
    /// Build a client from `ANTHROPIC_API_KEY` and optional `ANTHROPIC_BASE_URL`.
    pub fn from_env() -> Result<Self, LlmError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(LlmError::MissingApiKey(API_KEY_ENV))?;
        let base_url = env::var(BASE_URL_ENV).ok().filter(|u| !u.trim().is_empty());

        Self::new(api_key, base_url.as_deref())
    }

    pub fn new(api_key: String, base_url: Option<&str>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(LlmError::Client)?;
        Ok(Self::with_client(client, api_key, base_url))
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(client: Client, api_key: String, base_url: Option<&str>) -> Self {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        Self {
            client,
            api_key,
            endpoint: format!("{}/v1/messages", base),
        }
    }
}

impl ContextGenerator for AnthropicClient {
    fn generate_context(&self, request: &ContextRequest<'_>) -> Result<ContextResult, LlmError> {
        let body = json!({
            "model": request.model.unwrap_or(DEFAULT_MODEL),
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": build_prompt(request) }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()?;

        let status = response.status();
        let text = response.text()?;

        Ok(match status {
            StatusCode::OK => {
                let body: Value = serde_json::from_str(&text)
                    .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
                let content = body
                    .pointer("/content/0/text")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                parse_response(content)
            }
            StatusCode::TOO_MANY_REQUESTS => ContextResult::failure(
                "Rate limited",
                "Rate limit exceeded - try reducing concurrency",
            ),
            StatusCode::UNAUTHORIZED => {
                ContextResult::failure("Authentication failed", "Invalid API key")
            }
            other => {
                let message = serde_json::from_str::<Value>(&text)
                    .ok()
                    .and_then(|v| {
                        v.pointer("/error/message")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .unwrap_or_else(|| format!("HTTP {}", other.as_u16()));
                ContextResult::failure("API error", message)
            }
        })
    }
}
