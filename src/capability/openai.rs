//! OpenAI-compatible chat-completions capability
//!
//! Implements `MeetingCapability` over HTTP against any OpenAI-compatible
//! endpoint (Gemini's compatibility layer, OpenAI, Ollama, vLLM, etc.).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::CapabilitySettings;
use crate::error::{Error, Result};

use super::prompts::{self, Prompt};
use super::traits::{
    AddresseeRequest, MeetingCapability, Operation, ResponseRequest, SummaryRequest,
};

// ─────────────────────────────────────────────────────────────────
// OpenAI API types (request/response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    total_tokens: u32,
}

// ─────────────────────────────────────────────────────────────────
// OpenAI Capability
// ─────────────────────────────────────────────────────────────────

/// Delay before the first retry; doubled on every further attempt.
const BASE_BACKOFF_MS: u64 = 500;

/// Upper bound on a single retry delay.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Delay before retry number `attempt` (1-based).
fn retry_backoff(attempt: u32) -> Duration {
    let millis = 2u64
        .checked_pow(attempt.saturating_sub(1))
        .and_then(|factor| factor.checked_mul(BASE_BACKOFF_MS))
        .unwrap_or(u64::MAX);
    Duration::from_millis(millis).min(MAX_BACKOFF)
}

/// Chat-completions client for the three meeting operations
pub struct OpenAiCapability {
    settings: CapabilitySettings,
    client: Client,
}

impl OpenAiCapability {
    /// Create a new client from capability settings
    pub fn new(settings: CapabilitySettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::capability_unavailable(format!("HTTP client: {}", e)))?;

        info!(
            base_url = %settings.base_url,
            model = %settings.model,
            "OpenAI-compatible capability created"
        );

        Ok(Self { settings, client })
    }

    /// Build the authorization header value (if API key is set)
    fn auth_header(&self) -> Option<String> {
        if self.settings.api_key.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.settings.api_key))
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    /// Make a chat completion request with retry logic
    async fn chat_completion(&self, operation: Operation, prompt: Prompt) -> Result<String> {
        let request_body = ChatCompletionRequest {
            model: self.settings.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            max_tokens: Some(self.settings.max_tokens),
            temperature: Some(self.settings.temperature),
        };

        let url = self.endpoint();
        let mut last_error: Option<Error> = None;

        for attempt in 0..=self.settings.max_retries {
            if attempt > 0 {
                let backoff = retry_backoff(attempt);
                debug!(%operation, attempt, ?backoff, "Retrying after error");
                tokio::time::sleep(backoff).await;
            }

            let mut req = self.client.post(&url).json(&request_body);
            if let Some(ref auth) = self.auth_header() {
                req = req.header("Authorization", auth);
            }

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        match response.json::<ChatCompletionResponse>().await {
                            Ok(parsed) => {
                                let tokens = parsed.usage.map(|u| u.total_tokens);
                                let text = parsed
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|choice| choice.message.content)
                                    .ok_or_else(|| {
                                        Error::capability_failed(
                                            operation.as_str(),
                                            "no content in API response",
                                        )
                                    })?;

                                debug!(
                                    %operation,
                                    chars = text.len(),
                                    ?tokens,
                                    "Completion received"
                                );
                                return Ok(text);
                            }
                            Err(e) => {
                                last_error = Some(Error::capability_failed(
                                    operation.as_str(),
                                    format!("failed to parse API response: {}", e),
                                ));
                            }
                        }
                    } else if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        warn!(
                            %operation,
                            status = %status,
                            attempt,
                            "Retryable API error: {}",
                            body
                        );
                        last_error = Some(Error::capability_failed(
                            operation.as_str(),
                            format!("API error {}: {}", status, body),
                        ));
                    } else {
                        let body = response.text().await.unwrap_or_default();
                        return Err(Error::capability_failed(
                            operation.as_str(),
                            format!("API error {}: {}", status, body),
                        ));
                    }
                }
                Err(e) => {
                    if e.is_timeout() || e.is_connect() {
                        warn!(%operation, attempt, error = %e, "Retryable connection error");
                        last_error = Some(Error::capability_failed(
                            operation.as_str(),
                            format!("connection error: {}", e),
                        ));
                    } else {
                        return Err(Error::capability_failed(
                            operation.as_str(),
                            format!("request error: {}", e),
                        ));
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            Error::capability_failed(operation.as_str(), "all retry attempts exhausted")
        }))
    }
}

#[async_trait]
impl MeetingCapability for OpenAiCapability {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate_response(&self, request: ResponseRequest) -> Result<String> {
        self.chat_completion(
            Operation::GenerateResponse,
            prompts::response_prompt(&request),
        )
        .await
    }

    async fn classify_addressee(&self, request: AddresseeRequest) -> Result<String> {
        self.chat_completion(
            Operation::ClassifyAddressee,
            prompts::addressee_prompt(&request),
        )
        .await
    }

    async fn summarize(&self, request: SummaryRequest) -> Result<String> {
        self.chat_completion(Operation::Summarize, prompts::summary_prompt(&request))
            .await
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
