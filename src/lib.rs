//! AI-assisted software project scoping.
//!
//! A stateless HTTP backend ([`api`]) runs five prompt stages against an LLM
//! provider ([`gateway`], [`prompts`], [`pipeline`]); a seven-step wizard
//! ([`wizard`]) threads each stage's output into the next and falls back to
//! placeholder data ([`fallback`]) whenever a stage fails.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod gateway;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod wizard;
