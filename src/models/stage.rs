use serde::{Deserialize, Serialize};

/// One step of the five-stage AI pipeline, in execution order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    FeatureExtraction,
    PriorityAnalysis,
    RiskAnalysis,
    PocGeneration,
    MvpGeneration,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::FeatureExtraction,
        Stage::PriorityAnalysis,
        Stage::RiskAnalysis,
        Stage::PocGeneration,
        Stage::MvpGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeatureExtraction => "feature-extraction",
            Self::PriorityAnalysis => "priority-analysis",
            Self::RiskAnalysis => "risk-analysis",
            Self::PocGeneration => "poc-generation",
            Self::MvpGeneration => "mvp-generation",
        }
    }

    /// Property name of the array inside the stage's JSON envelope.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::FeatureExtraction => "features",
            Self::PriorityAnalysis => "priorities",
            Self::RiskAnalysis => "risks",
            Self::PocGeneration => "pocVersions",
            Self::MvpGeneration => "mvpDeliverables",
        }
    }

    /// Name sent with the structured-output schema.
    pub fn schema_name(&self) -> &'static str {
        match self {
            Self::FeatureExtraction => "feature_extraction",
            Self::PriorityAnalysis => "priority_analysis",
            Self::RiskAnalysis => "risk_analysis",
            Self::PocGeneration => "poc_generation",
            Self::MvpGeneration => "mvp_generation",
        }
    }

    /// Model used when the caller does not pick one.
    pub fn default_model(&self) -> &'static str {
        match self {
            Self::PriorityAnalysis => "openai/gpt-5-mini",
            _ => DEFAULT_MODEL,
        }
    }

    /// Human label used in logs and error banners.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FeatureExtraction => "Feature extraction",
            Self::PriorityAnalysis => "Priority analysis",
            Self::RiskAnalysis => "Risk analysis",
            Self::PocGeneration => "POC generation",
            Self::MvpGeneration => "MVP generation",
        }
    }
}

/// Model for free-form chat and most stages.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
