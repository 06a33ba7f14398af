//! LLM provider gateway.
//!
//! [`ChatGateway`] is the seam between the pipeline and the provider: the
//! pipeline builds a [`ChatRequest`], the gateway returns the text of the
//! first completion choice. [`OpenRouterClient`] is the production
//! implementation; tests substitute recording fakes.

mod error;
mod openrouter;
mod types;

pub use error::GatewayError;
pub use openrouter::{OpenRouterClient, RetryPolicy};
pub use types::*;

use async_trait::async_trait;

/// Sends one chat-completions request and returns the completion text.
///
/// An absent completion yields `Ok(String::new())`; callers decide whether
/// empty text is usable.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    async fn invoke(&self, req: &ChatRequest) -> Result<String, GatewayError>;
}
