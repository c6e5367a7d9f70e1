//! Client for the external AI chat service
//!
//! The chat widget's messages are forwarded as-is to `{AI_SERVICE_URL}/chat`
//! together with the caller's id and session token. There is no retry: a
//! failure is reported straight back to the user.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};

/// AI service configuration
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the AI service; the proxy is disabled when unset
    pub service_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl AiConfig {
    /// Create a new AiConfig from environment variables
    ///
    /// # Environment Variables
    /// - `AI_SERVICE_URL`: Base URL of the AI service (optional)
    /// - `AI_SERVICE_TIMEOUT`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Self {
        let service_url = std::env::var("AI_SERVICE_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let timeout_seconds = std::env::var("AI_SERVICE_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            service_url,
            timeout_seconds,
        }
    }

    /// Full URL of the chat endpoint
    pub fn chat_url(&self) -> Option<String> {
        self.service_url
            .as_deref()
            .map(|base| format!("{}/chat", base.trim_end_matches('/')))
    }
}

/// Payload sent to the AI service
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub user_id: Option<String>,
    pub auth_token: String,
}

/// Answer of the AI service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Errors raised while talking to the AI service
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service is not configured")]
    NotConfigured,

    #[error("Failed to communicate with AI service: {0}")]
    Transport(#[from] reqwest::Error),
}

/// AI chat service client
#[derive(Clone)]
pub struct AiService {
    client: reqwest::Client,
    config: AiConfig,
}

impl AiService {
    /// Create a new AI service client
    pub fn new(config: AiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { client, config })
    }

    /// Forward a chat message and return the provider's answer
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, AiError> {
        let url = self.config.chat_url().ok_or(AiError::NotConfigured)?;

        info!("Forwarding chat message to AI service");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                error!("Error communicating with AI service: {}", e);
                AiError::Transport(e)
            })?;

        let answer = response.json::<ChatResponse>().await.map_err(|e| {
            error!("Invalid answer from AI service: {}", e);
            AiError::Transport(e)
        })?;

        Ok(answer)
    }
}
