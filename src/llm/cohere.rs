use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::tools::{ToolCall, ToolCallResult, ToolDescriptor};

pub const DEFAULT_BASE_URL: &str = "https://api.cohere.ai/v1";
pub const DEFAULT_MODEL: &str = "command-r";

/// Request structure for the Cohere chat endpoint
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub message: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preamble: Option<String>,
    pub tools: Vec<ToolDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolCallResult>>,
    pub force_single_step: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Response structure from the Cohere chat endpoint
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChatResponse {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
}

impl ChatResponse {
    pub fn tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or_default()
    }

    pub fn finish_status(&self) -> FinishStatus {
        self.finish_reason
            .as_deref()
            .map(FinishStatus::from_provider)
            .unwrap_or(FinishStatus::Unknown)
    }
}

/// Why the model stopped generating, reduced to a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishStatus {
    Complete,
    LengthLimited,
    Filtered,
    Error,
    Unknown,
}

impl FinishStatus {
    pub fn from_provider(reason: &str) -> Self {
        match reason {
            "COMPLETE" => Self::Complete,
            "MAX_TOKENS" | "ERROR_LIMIT" => Self::LengthLimited,
            "ERROR_TOXIC" => Self::Filtered,
            "ERROR" => Self::Error,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::LengthLimited => "length-limited",
            Self::Filtered => "filtered",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for FinishStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("chat provider unreachable: {0}")]
    Unavailable(#[source] reqwest::Error),

    #[error("chat request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode chat response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Seam between the orchestrator and the remote chat API
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Cohere API client
#[derive(Clone)]
pub struct CohereClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl CohereClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for CohereClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        debug!(
            model = %request.model,
            tools = request.tools.len(),
            tool_results = ?request.tool_results.as_ref().map(Vec::len),
            "sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/chat", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(ProviderError::Unavailable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat request rejected");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(ProviderError::Decode)?;
        debug!(
            finish_reason = ?chat_response.finish_reason,
            tool_calls = chat_response.tool_calls().len(),
            "received chat response"
        );
        Ok(chat_response)
    }
}
