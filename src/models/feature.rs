use serde::{Deserialize, Serialize};

use super::Level;

/// A distinct, buildable feature extracted from the project materials.
///
/// Features are the root of the pipeline: every later stage receives them as
/// JSON and refers back to them by `title`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    /// Provider-assigned, or `feat-NNN` when the provider left it out.
    #[serde(default)]
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<FeatureSource>,
}

/// Where in the transcript a feature was mentioned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSource {
    pub text: String,
    pub start_index: usize,
    pub end_index: usize,
}

/// Sequential feature id for a zero-based array position: `0 -> feat-001`.
pub fn feature_id(index: usize) -> String {
    format!("feat-{:03}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_ids_are_one_based_and_zero_padded() {
        assert_eq!(feature_id(0), "feat-001");
        assert_eq!(feature_id(41), "feat-042");
        assert_eq!(feature_id(999), "feat-1000");
    }

    #[test]
    fn missing_id_deserializes_as_empty() {
        let feature: Feature =
            serde_json::from_str(r#"{"title":"Login","description":"Email login"}"#).unwrap();
        assert!(feature.id.is_empty());
        assert!(feature.complexity.is_none());
    }
}
