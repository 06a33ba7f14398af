use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, response::IntoResponse, Json};
use chrono::Utc;

use super::{ApiError, AppState};
use crate::error::PipelineError;
use crate::models::*;
use crate::pipeline::count_items;

// ============================================================
// Error Handling
// ============================================================

/// Log the outcome of a stage call with its duration and build the response.
///
/// Validation failures are the caller's problem and log at `warn`.
fn respond(
    label: &str,
    started: Instant,
    result: Result<String, PipelineError>,
) -> Result<Json<DataResponse>, ApiError> {
    let duration_ms = started.elapsed().as_millis() as u64;
    match result {
        Ok(data) => {
            tracing::info!(duration_ms, "{} completed successfully", label);
            Ok(Json(DataResponse { data }))
        }
        Err(e) if e.is_validation() => {
            tracing::warn!(duration_ms, "{} rejected: {}", label, e);
            Err(e.into())
        }
        Err(e) => {
            tracing::error!(duration_ms, "{} error: {}", label, e);
            Err(e.into())
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Sage Backend API is running!" }))
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

// ============================================================
// Stages
// ============================================================

pub async fn extract_features(
    State(state): State<AppState>,
    payload: Result<Json<ExtractFeaturesInput>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let started = Instant::now();
    let Json(input) = payload?;
    tracing::info!(
        transcript_chars = input.transcript.as_deref().map(str::len).unwrap_or(0),
        pdf_files = input.pdf_files.as_ref().map(Vec::len).unwrap_or(0),
        local_files = input.local_files.as_ref().map(Vec::len).unwrap_or(0),
        local_transcript = input.local_transcript.as_deref().unwrap_or(""),
        "Starting feature extraction request"
    );

    let result = state.pipeline.extract_features(input).await;
    if let Ok(data) = &result {
        tracing::debug!(features = count_items(Some(data)), "Features extracted");
    }
    respond(Stage::FeatureExtraction.label(), started, result)
}

pub async fn analyze_priorities(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzePrioritiesInput>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let started = Instant::now();
    let Json(input) = payload?;
    tracing::info!(
        features = count_items(input.features_json.as_deref()),
        "Starting priority analysis request"
    );

    let result = state.pipeline.analyze_priorities(input).await;
    respond(Stage::PriorityAnalysis.label(), started, result)
}

pub async fn analyze_risks(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRisksInput>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let started = Instant::now();
    let Json(input) = payload?;
    tracing::info!(
        features = count_items(input.features_json.as_deref()),
        priorities = count_items(input.priorities_json.as_deref()),
        "Starting risk analysis request"
    );

    let result = state.pipeline.analyze_risks(input).await;
    respond(Stage::RiskAnalysis.label(), started, result)
}

pub async fn generate_pocs(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePocsInput>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let started = Instant::now();
    let Json(input) = payload?;
    tracing::info!(
        features = count_items(input.features_json.as_deref()),
        hourly_rate = input.hourly_rate.unwrap_or(0.0),
        "Starting POC generation request"
    );

    let result = state.pipeline.generate_pocs(input).await;
    respond(Stage::PocGeneration.label(), started, result)
}

pub async fn generate_mvp(
    State(state): State<AppState>,
    payload: Result<Json<GenerateMvpInput>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let started = Instant::now();
    let Json(input) = payload?;
    let poc_title = input
        .selected_poc_json
        .as_deref()
        .and_then(|json| serde_json::from_str::<serde_json::Value>(json).ok())
        .and_then(|poc| poc.get("title").and_then(|t| t.as_str()).map(str::to_string))
        .unwrap_or_else(|| "Unknown".to_string());
    tracing::info!(
        poc = %poc_title,
        hourly_rate = input.hourly_rate.unwrap_or(0.0),
        "Starting MVP generation request"
    );

    let result = state.pipeline.generate_mvp(input).await;
    respond(Stage::MvpGeneration.label(), started, result)
}

// ============================================================
// Chat
// ============================================================

pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatInput>, JsonRejection>,
) -> Result<Json<DataResponse>, ApiError> {
    let started = Instant::now();
    let Json(input) = payload?;
    tracing::info!(
        messages = input.messages.as_ref().map(Vec::len).unwrap_or(0),
        model = input.model.as_deref().unwrap_or("default"),
        "Starting chat request"
    );

    let result = state.pipeline.chat(input).await;
    respond("Chat", started, result)
}
