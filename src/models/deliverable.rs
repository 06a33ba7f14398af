use serde::{Deserialize, Serialize};

/// A line item of the MVP plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deliverable {
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    pub time_estimate: String,
    /// USD, derived from the hourly rate.
    pub cost: f64,
}

/// Sum of deliverable costs in USD.
pub fn total_cost(deliverables: &[Deliverable]) -> f64 {
    deliverables.iter().map(|d| d.cost).sum()
}
