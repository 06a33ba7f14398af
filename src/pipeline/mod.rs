//! Stage executors.
//!
//! Each executor validates its inputs (no provider call on failure), builds
//! the stage prompt, invokes the gateway, and returns the provider's raw text.
//! Executors hold no per-request state; one [`Pipeline`] serves every request.

pub mod local;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::PipelineError;
use crate::gateway::{ChatGateway, GatewayError, OpenRouterClient};
use crate::models::{
    feature_id, is_usable_rate, AnalyzePrioritiesInput, AnalyzeRisksInput, ChatInput,
    ExtractFeaturesInput, GenerateMvpInput, GeneratePocsInput, DEFAULT_MODEL,
};
use crate::prompts::{self, StagePrompt};

/// Runs stage calls against a [`ChatGateway`].
#[derive(Clone)]
pub struct Pipeline {
    gateway: Arc<dyn ChatGateway>,
    local_dir: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self {
            gateway,
            local_dir: None,
        }
    }

    /// Production pipeline: OpenRouter client plus the configured local directory.
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let client = OpenRouterClient::from_config(config)?;
        Ok(Self::new(Arc::new(client)).with_local_dir(config.local_dir.clone()))
    }

    pub fn with_local_dir(mut self, local_dir: Option<PathBuf>) -> Self {
        self.local_dir = local_dir;
        self
    }

    async fn run(&self, prompt: StagePrompt, model: Option<String>) -> Result<String, PipelineError> {
        let stage = prompt.stage;
        let model = pick_model(model, stage.default_model());
        tracing::debug!(stage = stage.as_str(), model = %model, "Invoking provider");
        let raw = self.gateway.invoke(&prompt.into_request(model)).await?;
        Ok(raw)
    }

    // ============================================================
    // Stage 1: Feature Extraction
    // ============================================================

    /// Extract features from a transcript and optional PDFs.
    ///
    /// An inline transcript wins over `local_transcript`. Features in the
    /// response that lack an id get `feat-NNN`.
    pub async fn extract_features(&self, input: ExtractFeaturesInput) -> Result<String, PipelineError> {
        let root = self.local_dir.as_deref();
        let transcript = match (present(input.transcript), present(input.local_transcript)) {
            (Some(text), _) => text,
            (None, Some(path)) => local::read_transcript(root, &path).await?,
            (None, None) => {
                return Err(PipelineError::validation(
                    "Transcript or local_transcript is required",
                ))
            }
        };

        let mut documents = input.pdf_files.unwrap_or_default();
        for path in input.local_files.unwrap_or_default() {
            documents.push(local::read_document(root, &path).await?);
        }

        let prompt = prompts::feature_extraction(&transcript, &documents);
        let raw = self.run(prompt, input.model).await?;
        Ok(assign_feature_ids(&raw))
    }

    // ============================================================
    // Stage 2: Priority Analysis
    // ============================================================

    pub async fn analyze_priorities(&self, input: AnalyzePrioritiesInput) -> Result<String, PipelineError> {
        let (Some(features), Some(transcript)) = (present(input.features_json), present(input.transcript))
        else {
            return Err(PipelineError::validation("Features and transcript are required"));
        };

        let prompt = prompts::priority_analysis(&features, &transcript);
        self.run(prompt, input.model).await
    }

    // ============================================================
    // Stage 3: Risk Analysis
    // ============================================================

    pub async fn analyze_risks(&self, input: AnalyzeRisksInput) -> Result<String, PipelineError> {
        let (Some(features), Some(priorities), Some(transcript)) = (
            present(input.features_json),
            present(input.priorities_json),
            present(input.transcript),
        ) else {
            return Err(PipelineError::validation(
                "Features, priorities, and transcript are required",
            ));
        };

        let prompt = prompts::risk_analysis(&features, &priorities, &transcript);
        self.run(prompt, input.model).await
    }

    // ============================================================
    // Stage 4: POC Generation
    // ============================================================

    pub async fn generate_pocs(&self, input: GeneratePocsInput) -> Result<String, PipelineError> {
        let (Some(features), Some(priorities), Some(risks)) = (
            present(input.features_json),
            present(input.priorities_json),
            present(input.risks_json),
        ) else {
            return Err(PipelineError::validation(
                "Features, priorities, risks, and hourly rate are required",
            ));
        };
        let rate = require_rate(
            input.hourly_rate,
            "Features, priorities, risks, and hourly rate are required",
        )?;

        let prompt = prompts::poc_generation(&features, &priorities, &risks, rate);
        self.run(prompt, input.model).await
    }

    // ============================================================
    // Stage 5: MVP Generation
    // ============================================================

    pub async fn generate_mvp(&self, input: GenerateMvpInput) -> Result<String, PipelineError> {
        const MISSING: &str =
            "All parameters are required: selectedPOC, features, priorities, risks, and hourly rate";

        let (Some(poc), Some(features), Some(priorities), Some(risks)) = (
            present(input.selected_poc_json),
            present(input.features_json),
            present(input.priorities_json),
            present(input.risks_json),
        ) else {
            return Err(PipelineError::validation(MISSING));
        };
        let rate = require_rate(input.hourly_rate, MISSING)?;

        let prompt = prompts::mvp_generation(&poc, &features, &priorities, &risks, rate);
        self.run(prompt, input.model).await
    }

    // ============================================================
    // Chat
    // ============================================================

    /// Free-form chat pass-through: no schema, no post-processing.
    pub async fn chat(&self, input: ChatInput) -> Result<String, PipelineError> {
        let messages = input
            .messages
            .ok_or_else(|| PipelineError::validation("Messages are required"))?;

        let model = pick_model(input.model, DEFAULT_MODEL);
        let raw = self.gateway.invoke(&prompts::chat(model, messages)).await?;
        Ok(raw)
    }
}

/// `Some` only for a non-blank string.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn pick_model(requested: Option<String>, default: &str) -> String {
    present(requested).unwrap_or_else(|| default.to_string())
}

/// Null and zero count as missing; negative or non-finite rates are invalid.
fn require_rate(rate: Option<f64>, missing: &str) -> Result<f64, PipelineError> {
    match rate {
        None => Err(PipelineError::validation(missing)),
        Some(r) if r == 0.0 => Err(PipelineError::validation(missing)),
        Some(r) if is_usable_rate(Some(r)) => Ok(r),
        Some(r) => Err(PipelineError::validation(format!(
            "Hourly rate must be a positive number, got {r}"
        ))),
    }
}

/// Give every element of a `features` array that lacks an id `feat-NNN`.
///
/// Text that is not a JSON object with a `features` array is returned as is.
pub fn assign_feature_ids(raw: &str) -> String {
    let mut parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Could not parse feature response for id assignment: {}", e);
            return raw.to_string();
        }
    };

    let Some(features) = parsed.get_mut("features").and_then(Value::as_array_mut) else {
        return raw.to_string();
    };

    for (i, feature) in features.iter_mut().enumerate() {
        let Some(object) = feature.as_object_mut() else {
            continue;
        };
        let has_id = match object.get("id") {
            Some(Value::String(id)) => !id.trim().is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        if !has_id {
            object.insert("id".to_string(), Value::String(feature_id(i)));
        }
    }
    tracing::debug!(count = features.len(), "Assigned feature ids");

    serde_json::to_string(&parsed).unwrap_or_else(|_| raw.to_string())
}

/// Number of elements in a JSON payload, for logging.
///
/// Arrays count their elements, envelope objects the first array they hold.
pub fn count_items(json: Option<&str>) -> usize {
    let Some(value) = json.and_then(|j| serde_json::from_str::<Value>(j).ok()) else {
        return 0;
    };
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map
            .values()
            .find_map(|v| v.as_array().map(Vec::len))
            .unwrap_or(1),
        _ => 0,
    }
}
