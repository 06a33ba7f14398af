//! Prompt assembly for the five pipeline stages.
//!
//! Each builder returns a [`StagePrompt`]: a fixed system persona, a user
//! message that embeds the prior stages' JSON verbatim, and the stage's
//! response schema. Nothing here touches the network.

pub mod schema;

use crate::gateway::{
    ChatMessage, ChatRequest, ContentPart, FileAttachment, InvokeOptions, JsonSchemaSpec, Plugin,
};
use crate::models::Stage;

/// Output limit for every stage after the first.
pub const STAGE_MAX_TOKENS: u32 = 4000;

/// Output limit for free-form chat.
pub const CHAT_MAX_TOKENS: u32 = 2000;

const FEATURE_SYSTEM: &str = "You are a software project analyst. Extract all features to be built \
from the provided materials (transcript and PDF documents). Only extract features explicitly \
mentioned - do not hallucinate or infer features. Focus on identifying distinct, buildable \
features with clear titles and detailed descriptions, and rate each feature's implementation \
complexity as high, medium, or low.";

const PRIORITY_SYSTEM: &str = "You are a software project analyst specializing in feature \
prioritization. Analyze the extracted features and project context to determine business \
priorities. Consider factors like: revenue impact, user value, technical dependencies, \
development complexity, and risk mitigation. Provide clear reasoning for each priority level.";

const RISK_SYSTEM: &str = "You are a software project risk analyst with expertise in identifying \
technical, timeline, and resource risks. Analyze the features, priorities, and project context \
to identify potential risks that could impact project success. Focus on dependencies, \
complexity, uncertainties, and external factors. Provide specific mitigation strategies for \
each identified risk.";

const POC_SYSTEM: &str = "You are a software project strategist specializing in POC (Proof of \
Concept) development. Generate exactly 3 distinct POC versions based on different strategic \
focuses: 1) Revenue-focused (prioritize features that can generate income quickly), \
2) Fundraising-focused (prioritize features that demonstrate market potential and \
scalability), 3) Risk-mitigation focused (prioritize features that address the highest risks \
first). Each POC should be a minimal but complete concept that can be built and validated. \
Calculate realistic costs using the provided hourly rate.";

const MVP_SYSTEM: &str = "You are a senior software project manager specializing in MVP \
development planning. Generate a comprehensive MVP development plan based on the selected POC \
approach. The plan should expand the POC into a full production-ready MVP with detailed \
deliverables, realistic timelines, and accurate cost estimates. Consider technical \
architecture, user experience, security, scalability, and deployment requirements. Calculate \
precise costs using the provided hourly rate.";

/// A fully assembled stage prompt, ready to be sent with any model.
#[derive(Debug, Clone)]
pub struct StagePrompt {
    pub stage: Stage,
    pub messages: Vec<ChatMessage>,
    pub schema: JsonSchemaSpec,
    pub max_tokens: Option<u32>,
    pub plugins: Vec<Plugin>,
}

impl StagePrompt {
    fn new(stage: Stage, system: &str, user: ChatMessage) -> Self {
        Self {
            stage,
            messages: vec![ChatMessage::system(system), user],
            schema: schema::for_stage(stage),
            max_tokens: match stage {
                Stage::FeatureExtraction => None,
                _ => Some(STAGE_MAX_TOKENS),
            },
            plugins: Vec::new(),
        }
    }

    /// The user message (always the last one).
    pub fn user_text(&self) -> String {
        self.messages.last().map(ChatMessage::text).unwrap_or_default()
    }

    pub fn into_request(self, model: impl Into<String>) -> ChatRequest {
        ChatRequest::new(model, self.messages).with_options(InvokeOptions {
            max_tokens: self.max_tokens,
            response_schema: Some(self.schema),
            plugins: self.plugins,
            ..Default::default()
        })
    }
}

/// Name given to the `n`th uploaded document (zero-based).
pub fn attachment_name(index: usize) -> String {
    format!("project-transcript-{}.pdf", index + 1)
}

/// Format an hourly rate the way the prompts show it: `$150`, `$87.5`.
pub fn format_rate(rate: f64) -> String {
    if rate.fract() == 0.0 {
        format!("${}", rate as i64)
    } else {
        format!("${rate}")
    }
}

/// Stage 1: transcript plus one file part per document.
///
/// The file-parser plugin is only requested when a document is attached.
pub fn feature_extraction(transcript: &str, documents: &[String]) -> StagePrompt {
    let mut parts = vec![ContentPart::text(format!("Project Transcript: {transcript}"))];
    parts.extend(
        documents
            .iter()
            .enumerate()
            .map(|(i, data)| ContentPart::file(FileAttachment::pdf(attachment_name(i), data))),
    );

    let mut prompt = StagePrompt::new(
        Stage::FeatureExtraction,
        FEATURE_SYSTEM,
        ChatMessage::user_parts(parts),
    );
    if !documents.is_empty() {
        prompt.plugins.push(Plugin::file_parser());
    }
    prompt
}

/// Stage 2.
pub fn priority_analysis(features_json: &str, transcript: &str) -> StagePrompt {
    let user = format!(
        "Please analyze these extracted features and provide priority recommendations based on \
the project context:

EXTRACTED FEATURES:
{features_json}

PROJECT CONTEXT:
{transcript}

Consider business impact, technical dependencies, and development sequence when assigning \
priorities."
    );
    StagePrompt::new(Stage::PriorityAnalysis, PRIORITY_SYSTEM, ChatMessage::user(user))
}

/// Stage 3.
pub fn risk_analysis(features_json: &str, priorities_json: &str, transcript: &str) -> StagePrompt {
    let user = format!(
        "Please analyze the following project information and identify potential risks:

EXTRACTED FEATURES:
{features_json}

FEATURE PRIORITIES:
{priorities_json}

PROJECT CONTEXT:
{transcript}

Analyze risks across these categories:
- Technical: API dependencies, complex integrations, new technologies, scalability concerns
- Timeline: Uncertain estimates, external dependencies, resource availability
- Resource: Skill gaps, third-party services, infrastructure requirements

For each risk, provide specific impact assessment and actionable mitigation strategies."
    );
    StagePrompt::new(Stage::RiskAnalysis, RISK_SYSTEM, ChatMessage::user(user))
}

/// Stage 4: exactly three POCs, one per focus.
pub fn poc_generation(
    features_json: &str,
    priorities_json: &str,
    risks_json: &str,
    hourly_rate: f64,
) -> StagePrompt {
    let rate = format_rate(hourly_rate);
    let user = format!(
        "Please generate 3 strategic POC versions based on this project analysis:

EXTRACTED FEATURES:
{features_json}

FEATURE PRIORITIES:
{priorities_json}

IDENTIFIED RISKS:
{risks_json}

HOURLY RATE: {rate}

Generate 3 distinct POC approaches:
1. REVENUE-FOCUSED: Features that can generate income/value quickly
2. FUNDRAISING-FOCUSED: Features that demonstrate market potential and scalability to investors
3. RISK-MITIGATION FOCUSED: Features that address the highest-priority risks first

Each POC should include:
- Strategic focus and rationale
- 3-5 core features to build
- Realistic time estimate (in weeks)
- Cost calculation based on the hourly rate
- Clear value proposition for the chosen focus"
    );
    StagePrompt::new(Stage::PocGeneration, POC_SYSTEM, ChatMessage::user(user))
}

/// Stage 5: MVP plan expanding the selected POC.
pub fn mvp_generation(
    selected_poc_json: &str,
    features_json: &str,
    priorities_json: &str,
    risks_json: &str,
    hourly_rate: f64,
) -> StagePrompt {
    let rate = format_rate(hourly_rate);
    let user = format!(
        "Please generate a comprehensive MVP development plan based on this analysis:

SELECTED POC APPROACH:
{selected_poc_json}

ALL EXTRACTED FEATURES:
{features_json}

FEATURE PRIORITIES:
{priorities_json}

IDENTIFIED RISKS:
{risks_json}

HOURLY RATE: {rate}

Generate a detailed MVP plan that includes:
- Core deliverables expanding the selected POC
- Technical architecture and infrastructure requirements
- User experience and design deliverables
- Security and compliance considerations
- Testing and quality assurance
- Deployment and DevOps setup
- Documentation and maintenance
- Realistic time estimates for each deliverable
- Accurate cost calculations based on the hourly rate
- Risk mitigation strategies integrated into the plan

The MVP should be production-ready and scalable, building upon the selected POC foundation."
    );
    StagePrompt::new(Stage::MvpGeneration, MVP_SYSTEM, ChatMessage::user(user))
}

/// Free-form chat: caller's messages, no schema.
pub fn chat(model: impl Into<String>, messages: Vec<ChatMessage>) -> ChatRequest {
    ChatRequest::new(model, messages).max_tokens(CHAT_MAX_TOKENS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_prompt_without_documents_skips_the_plugin() {
        let prompt = feature_extraction("Build a login page", &[]);
        assert!(prompt.plugins.is_empty());
        assert_eq!(prompt.user_text(), "Project Transcript: Build a login page");
        assert!(prompt.messages[1].attachments().is_empty());
        assert_eq!(prompt.max_tokens, None);
    }

    #[test]
    fn feature_prompt_attaches_numbered_documents() {
        let docs = vec!["JVBERi0xLjQ=".to_string(), "data:application/pdf;base64,AAAA".to_string()];
        let prompt = feature_extraction("See attached", &docs);

        let files = prompt.messages[1].attachments();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "project-transcript-1.pdf");
        assert_eq!(files[0].file_data, "data:application/pdf;base64,JVBERi0xLjQ=");
        assert_eq!(files[1].filename, "project-transcript-2.pdf");
        assert_eq!(prompt.plugins, vec![Plugin::file_parser()]);
    }

    #[test]
    fn later_stages_embed_prior_json_verbatim() {
        let features = r#"{"features":[{"id":"feat-001","title":"Login page"}]}"#;
        let priorities = r#"[{"feature":"Login page","priority":"high"}]"#;
        let prompt = risk_analysis(features, priorities, "transcript text");

        let text = prompt.user_text();
        assert!(text.contains(features));
        assert!(text.contains(priorities));
        assert!(text.contains("PROJECT CONTEXT:\ntranscript text"));
        assert_eq!(prompt.max_tokens, Some(STAGE_MAX_TOKENS));
        assert_eq!(prompt.schema.name, "risk_analysis");
    }

    #[test]
    fn cost_stages_show_the_hourly_rate() {
        let poc = poc_generation("[]", "[]", "[]", 150.0);
        assert!(poc.user_text().contains("HOURLY RATE: $150"));

        let mvp = mvp_generation("{}", "[]", "[]", "[]", 87.5);
        assert!(mvp.user_text().contains("HOURLY RATE: $87.5"));
        assert!(mvp.user_text().contains("SELECTED POC APPROACH:\n{}"));
    }

    #[test]
    fn request_carries_schema_and_limits() {
        let request = priority_analysis("[]", "ctx").into_request("openai/gpt-5-mini");
        assert_eq!(request.model, "openai/gpt-5-mini");
        assert_eq!(request.options.max_tokens, Some(4000));
        assert_eq!(request.options.temperature, 0.7);
        assert_eq!(
            request.options.response_schema.as_ref().map(|s| s.name.as_str()),
            Some("priority_analysis")
        );
    }

    #[test]
    fn chat_has_no_schema() {
        let request = chat("google/gemini-2.5-flash", vec![ChatMessage::user("hi")]);
        assert!(request.options.response_schema.is_none());
        assert_eq!(request.options.max_tokens, Some(CHAT_MAX_TOKENS));
    }
}
