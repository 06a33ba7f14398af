use serde::{Deserialize, Serialize};

use super::Level;

/// A project risk with its impact and mitigation strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Level,
    pub category: RiskCategory,
    pub impact: String,
    pub mitigation: String,
}

/// The area a risk threatens.
///
/// - `Technical`: API dependencies, integrations, new technology, scalability
/// - `Timeline`: Uncertain estimates and external dependencies
/// - `Resource`: Skill gaps, third-party services, infrastructure
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Technical,
    Timeline,
    Resource,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [
        RiskCategory::Technical,
        RiskCategory::Timeline,
        RiskCategory::Resource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Timeline => "timeline",
            Self::Resource => "resource",
        }
    }
}
