//! LLM collaborators that turn usage matches into translator context.
//!
//! Providers form a closed set. [`LlmClient::for_provider`] resolves the
//! configured [`Provider`] once, before any entry is processed, so a missing
//! API key fails the run up front.

pub mod anthropic;
pub mod prompt;

use clap::ValueEnum;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use anthropic::AnthropicClient;
pub use prompt::{build_prompt, parse_response};

use crate::core::types::Match;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Anthropic,
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("{0} environment variable is required")]
    MissingApiKey(&'static str),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Input for one context generation call.
#[derive(Debug, Clone, Copy)]
pub struct ContextRequest<'a> {
    pub key: &'a str,
    pub text: &'a str,
    pub matches: &'a [Match],
    /// Provider default when `None`.
    pub model: Option<&'a str>,
}

/// Structured answer for one key.
///
/// API-level failures (rate limits, rejected credentials) come back as a
/// result with `error` set; only transport faults are returned as `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContextResult {
    pub description: String,
    pub ui_element: Option<String>,
    pub tone: Option<String>,
    pub max_length: Option<u32>,
    pub error: Option<String>,
}

impl ContextResult {
    pub fn failure(description: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[enum_dispatch]
pub trait ContextGenerator {
    fn generate_context(&self, request: &ContextRequest<'_>) -> Result<ContextResult, LlmError>;
}

#[enum_dispatch(ContextGenerator)]
#[derive(Debug)]
pub enum LlmClient {
    Anthropic(AnthropicClient),
}

impl LlmClient {
    pub fn for_provider(provider: Provider) -> Result<Self, LlmError> {
        match provider {
            Provider::Anthropic => Ok(AnthropicClient::from_env()?.into()),
        }
    }
}
