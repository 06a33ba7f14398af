//! HTTP client for a running sage backend.
//!
//! Configuration is via environment variables:
//! - `SAGE_BACKEND_URL` - Base URL (default: `http://localhost:3001`)

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::models::*;

/// Default URL for local development.
const DEFAULT_URL: &str = "http://localhost:3001";

/// HTTP client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

/// HTTP client for the `/api/ai` routes.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    /// Create client from environment variables.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SAGE_BACKEND_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self::new(base_url)
    }

    /// Create with explicit configuration.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a body to `/api/ai/{route}` and return the `data` string.
    async fn post<B: Serialize>(&self, route: &str, body: &B) -> Result<String, ClientError> {
        let url = format!("{}/api/ai/{}", self.base_url, route);
        let response = self.client.post(&url).json(body).send().await?;
        self.handle_response(response).await
    }

    /// Handle response, converting `{error}` bodies to ClientError.
    async fn handle_response(&self, response: reqwest::Response) -> Result<String, ClientError> {
        let status = response.status();
        if status.is_success() {
            let body: DataResponse = response.json().await?;
            return Ok(body.data);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&text)
            .map(|e| e.error)
            .unwrap_or(text);
        match status {
            StatusCode::BAD_REQUEST => Err(ClientError::BadRequest(message)),
            _ => Err(ClientError::Server {
                status: status.as_u16(),
                message,
            }),
        }
    }

    // ============================================================
    // Stage Operations
    // ============================================================

    pub async fn extract_features(&self, input: &ExtractFeaturesInput) -> Result<String, ClientError> {
        self.post("extract-features", input).await
    }

    pub async fn analyze_priorities(&self, input: &AnalyzePrioritiesInput) -> Result<String, ClientError> {
        self.post("analyze-priorities", input).await
    }

    pub async fn analyze_risks(&self, input: &AnalyzeRisksInput) -> Result<String, ClientError> {
        self.post("analyze-risks", input).await
    }

    pub async fn generate_pocs(&self, input: &GeneratePocsInput) -> Result<String, ClientError> {
        self.post("generate-pocs", input).await
    }

    pub async fn generate_mvp(&self, input: &GenerateMvpInput) -> Result<String, ClientError> {
        self.post("generate-mvp", input).await
    }

    pub async fn chat(&self, input: &ChatInput) -> Result<String, ClientError> {
        self.post("chat", input).await
    }
}
