use serde::{Deserialize, Serialize};

use super::Level;

/// Business priority assigned to one feature.
///
/// `feature` holds the feature's title as written by the provider. Nothing
/// guarantees it matches a [`super::Feature`] exactly, or uniquely.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Priority {
    #[serde(default)]
    pub id: String,
    pub feature: String,
    pub priority: Level,
    pub reasoning: String,
}
