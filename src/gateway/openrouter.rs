//! OpenRouter chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use super::error::GatewayError;
use super::types::*;
use super::ChatGateway;
use crate::config::Config;

/// Longest slice of an unparsable error body echoed into the error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Retry policy for transient provider failures.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// One attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::from_millis(500),
        }
    }

    /// `base * 2^attempt`, exponent capped at 5; saturates instead of overflowing.
    fn delay(&self, attempt: u32) -> Duration {
        self.base_delay
            .checked_mul(2u32.pow(attempt.min(5)))
            .unwrap_or(Duration::MAX)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// HTTP client for the OpenRouter API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    referer: String,
    app_title: String,
    retry: RetryPolicy,
}

impl OpenRouterClient {
    /// Create from process configuration.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
            retry: RetryPolicy {
                max_retries: config.max_retries,
                base_delay: config.retry_base_delay,
            },
        })
    }

    /// Create with an explicit key and base URL and default headers.
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let mut config = Config::with_provider(None, base_url);
        config.api_key = api_key;
        Self::from_config(&config)
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    async fn send_once(&self, api_key: &str, req: &ChatRequest) -> Result<String, GatewayError> {
        let body = CompletionBody::from(req);

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(api_key)
            .header("HTTP-Referer", &self.referer)
            .header("X-Title", &self.app_title)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<CompletionResponse>(&text)
                .ok()
                .and_then(|parsed| parsed.error)
                .and_then(|error| error.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| error_body_excerpt(&text, status));
            return Err(GatewayError::upstream(Some(status.as_u16()), message));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::malformed(format!("Invalid JSON from provider: {e}")))?;

        // OpenRouter reports some failures (e.g. mid-route provider errors) inside a 200.
        if let Some(error) = parsed.error {
            let status = error.code.as_ref().and_then(|c| c.as_u64()).map(|c| c as u16);
            return Err(GatewayError::upstream(
                status,
                error.message.unwrap_or_else(|| "provider returned an error".to_string()),
            ));
        }

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default())
    }
}

fn error_body_excerpt(body: &str, status: reqwest::StatusCode) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {}", status.as_u16());
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[async_trait]
impl ChatGateway for OpenRouterClient {
    async fn invoke(&self, req: &ChatRequest) -> Result<String, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::configuration("OpenRouter API key not configured"))?;

        let mut attempt = 0;
        loop {
            match self.send_once(api_key, req).await {
                Ok(content) => {
                    tracing::debug!(
                        model = %req.model,
                        chars = content.len(),
                        "provider response received"
                    );
                    return Ok(content);
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(
                        model = %req.model,
                        code = err.code(),
                        attempt = attempt + 1,
                        "provider call failed, retrying in {:?}: {}",
                        delay,
                        err
                    );
                    attempt += 1;
                    sleep(delay).await;
                }
                Err(err) => {
                    tracing::error!(model = %req.model, code = err.code(), "provider call failed: {}", err);
                    return Err(err);
                }
            }
        }
    }
}

// =============================================================================
// API TYPES
// =============================================================================

#[derive(Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "<[Plugin]>::is_empty")]
    plugins: &'a [Plugin],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

impl<'a> From<&'a ChatRequest> for CompletionBody<'a> {
    fn from(req: &'a ChatRequest) -> Self {
        Self {
            model: &req.model,
            messages: &req.messages,
            temperature: req.options.temperature,
            max_tokens: req.options.max_tokens,
            plugins: &req.options.plugins,
            response_format: req
                .options
                .response_schema
                .as_ref()
                .map(|json_schema| ResponseFormat {
                    format_type: "json_schema",
                    json_schema,
                }),
        }
    }
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'static str,
    json_schema: &'a JsonSchemaSpec,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
    code: Option<serde_json::Value>,
}
