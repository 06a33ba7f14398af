//! Request and response bodies of the `/api/ai` routes.
//!
//! Every field is optional at the serde level so that a missing field reaches
//! the pipeline's validation (HTTP 400 with a readable message) instead of
//! failing inside the JSON extractor.

use serde::{Deserialize, Serialize};

use crate::gateway::ChatMessage;

// ============================================================
// Request Types
// ============================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractFeaturesInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    /// Base64 PDF payloads, bare or as `data:` URLs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_files: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// PDF paths relative to the server's local directory.
    #[serde(rename = "local_files", skip_serializing_if = "Option::is_none")]
    pub local_files: Option<Vec<String>>,
    /// Transcript path relative to the server's local directory.
    #[serde(rename = "local_transcript", skip_serializing_if = "Option::is_none")]
    pub local_transcript: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzePrioritiesInput {
    pub features_json: Option<String>,
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnalyzeRisksInput {
    pub features_json: Option<String>,
    pub priorities_json: Option<String>,
    pub transcript: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratePocsInput {
    pub features_json: Option<String>,
    pub priorities_json: Option<String>,
    pub risks_json: Option<String>,
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerateMvpInput {
    #[serde(rename = "selectedPOCJson")]
    pub selected_poc_json: Option<String>,
    pub features_json: Option<String>,
    pub priorities_json: Option<String>,
    pub risks_json: Option<String>,
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatInput {
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

// ============================================================
// Response Types
// ============================================================

/// Successful stage response: the provider's raw text, usually JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DataResponse {
    pub data: String,
}

/// Error envelope returned with HTTP 400 and 500.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mvp_input_uses_upper_case_poc_field_name() {
        let input: GenerateMvpInput = serde_json::from_str(
            r#"{"selectedPOCJson":"{}","featuresJson":"[]","hourlyRate":120}"#,
        )
        .unwrap();
        assert_eq!(input.selected_poc_json.as_deref(), Some("{}"));
        assert_eq!(input.hourly_rate, Some(120.0));
        assert!(input.risks_json.is_none());
    }

    #[test]
    fn extract_input_keeps_snake_case_local_fields() {
        let input: ExtractFeaturesInput = serde_json::from_str(
            r#"{"pdfFiles":["JVBERi0="],"local_transcript":"call.txt","local_files":["brief.pdf"]}"#,
        )
        .unwrap();
        assert_eq!(input.pdf_files.unwrap().len(), 1);
        assert_eq!(input.local_transcript.as_deref(), Some("call.txt"));
        assert_eq!(input.local_files.unwrap(), vec!["brief.pdf".to_string()]);
        assert!(input.transcript.is_none());
    }

    #[test]
    fn null_hourly_rate_reads_as_missing() {
        let input: GeneratePocsInput = serde_json::from_str(r#"{"hourlyRate":null}"#).unwrap();
        assert!(input.hourly_rate.is_none());
    }
}
