use serde::{Deserialize, Serialize};

/// One proof-of-concept strategy. Stage 4 yields three, one per [`PocFocus`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PocVersion {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub focus: PocFocus,
    /// Feature titles included in this POC.
    pub features: Vec<String>,
    /// Free text such as "4-6 weeks".
    pub time_estimate: String,
    /// USD, derived from the hourly rate.
    pub cost: f64,
}

/// Strategic focus of a POC.
///
/// - `Revenue`: Features that can generate income quickly
/// - `Fundraising`: Features that show market potential to investors
/// - `RiskMitigation`: Features that retire the highest risks first
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PocFocus {
    Revenue,
    Fundraising,
    RiskMitigation,
}

impl PocFocus {
    pub const ALL: [PocFocus; 3] = [
        PocFocus::Revenue,
        PocFocus::Fundraising,
        PocFocus::RiskMitigation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Fundraising => "fundraising",
            Self::RiskMitigation => "risk-mitigation",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "revenue" => Some(Self::Revenue),
            "fundraising" => Some(Self::Fundraising),
            "risk-mitigation" => Some(Self::RiskMitigation),
            _ => None,
        }
    }
}
