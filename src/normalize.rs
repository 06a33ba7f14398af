//! Turns raw stage text into typed collections.
//!
//! Accepted shapes, in order:
//!
//! 1. an object holding the stage's collection key as an array: that array
//! 2. a bare array: itself
//! 3. any other JSON value: a one-element array
//!
//! Every element must deserialize into the entity type and pass its checks,
//! otherwise the whole payload is rejected with a [`ParseError`]. Callers
//! substitute the stage's fallback dataset on error.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::fallback;
use crate::models::{
    feature_id, Deliverable, Feature, PocVersion, Priority, Risk, Stage, StageOutput,
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{stage} response is not valid JSON: {source}")]
    Json {
        stage: &'static str,
        source: serde_json::Error,
    },

    #[error("{stage} item {index} has the wrong shape: {source}")]
    Shape {
        stage: &'static str,
        index: usize,
        source: serde_json::Error,
    },

    #[error("{stage} item {index} is invalid: {reason}")]
    Invalid {
        stage: &'static str,
        index: usize,
        reason: String,
    },

    #[error("{stage} response contains no items")]
    Empty { stage: &'static str },
}

/// An entity produced by one pipeline stage.
pub trait Normalize: DeserializeOwned + Sized {
    const STAGE: Stage;

    /// Placeholder data for this stage.
    fn fallback() -> Vec<Self>;

    fn into_output(items: Vec<Self>) -> StageOutput;

    /// Per-item semantic checks beyond the type shape.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }

    fn id_mut(&mut self) -> &mut String;

    /// Id given to the item at `index` when the provider left it out.
    fn synthetic_id(index: usize) -> String {
        (index + 1).to_string()
    }

    /// Make every id non-empty and unique within the collection.
    ///
    /// The first holder of a provider id keeps it; blank and repeated ids are
    /// replaced by synthetic ones that collide with nothing already taken.
    fn finish(items: &mut [Self]) {
        let mut taken = HashSet::new();
        let mut pending = Vec::new();
        for (i, item) in items.iter_mut().enumerate() {
            let id = item.id_mut();
            if id.trim().is_empty() || !taken.insert(id.clone()) {
                pending.push(i);
            }
        }

        let len = items.len();
        for i in pending {
            let mut slot = i;
            let mut candidate = Self::synthetic_id(slot);
            while taken.contains(&candidate) {
                slot += len;
                candidate = Self::synthetic_id(slot);
            }
            taken.insert(candidate.clone());
            *items[i].id_mut() = candidate;
        }
    }
}

impl Normalize for Feature {
    const STAGE: Stage = Stage::FeatureExtraction;

    fn fallback() -> Vec<Self> {
        fallback::features()
    }

    fn into_output(items: Vec<Self>) -> StageOutput {
        StageOutput::Features(items)
    }

    fn check(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".to_string());
        }
        Ok(())
    }

    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }

    fn synthetic_id(index: usize) -> String {
        feature_id(index)
    }
}

impl Normalize for Priority {
    const STAGE: Stage = Stage::PriorityAnalysis;

    fn fallback() -> Vec<Self> {
        fallback::priorities()
    }

    fn into_output(items: Vec<Self>) -> StageOutput {
        StageOutput::Priorities(items)
    }

    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }
}

impl Normalize for Risk {
    const STAGE: Stage = Stage::RiskAnalysis;

    fn fallback() -> Vec<Self> {
        fallback::risks()
    }

    fn into_output(items: Vec<Self>) -> StageOutput {
        StageOutput::Risks(items)
    }

    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }
}

impl Normalize for PocVersion {
    const STAGE: Stage = Stage::PocGeneration;

    fn fallback() -> Vec<Self> {
        fallback::poc_versions()
    }

    fn into_output(items: Vec<Self>) -> StageOutput {
        StageOutput::PocVersions(items)
    }

    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }

    fn check(&self) -> Result<(), String> {
        check_cost(self.cost)
    }
}

impl Normalize for Deliverable {
    const STAGE: Stage = Stage::MvpGeneration;

    fn fallback() -> Vec<Self> {
        fallback::mvp_deliverables()
    }

    fn into_output(items: Vec<Self>) -> StageOutput {
        StageOutput::MvpDeliverables(items)
    }

    fn id_mut(&mut self) -> &mut String {
        &mut self.id
    }

    fn check(&self) -> Result<(), String> {
        check_cost(self.cost)
    }
}

fn check_cost(cost: f64) -> Result<(), String> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(format!("cost must be a non-negative number, got {cost}"))
    }
}

/// Parse raw stage text into a collection of `T`.
pub fn coerce_array<T: Normalize>(raw: &str) -> Result<Vec<T>, ParseError> {
    let stage = T::STAGE.as_str();
    let value: Value =
        serde_json::from_str(raw.trim()).map_err(|source| ParseError::Json { stage, source })?;

    let key = T::STAGE.collection_key();
    let elements = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert(key.to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        other => vec![other],
    };

    if elements.is_empty() {
        return Err(ParseError::Empty { stage });
    }

    let mut items = elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let item: T = serde_json::from_value(element)
                .map_err(|source| ParseError::Shape { stage, index, source })?;
            item.check()
                .map_err(|reason| ParseError::Invalid { stage, index, reason })?;
            Ok(item)
        })
        .collect::<Result<Vec<T>, ParseError>>()?;

    T::finish(&mut items);
    Ok(items)
}

/// Parse raw text for `stage`.
pub fn normalize_stage(stage: Stage, raw: &str) -> Result<StageOutput, ParseError> {
    match stage {
        Stage::FeatureExtraction => coerce_array::<Feature>(raw).map(Feature::into_output),
        Stage::PriorityAnalysis => coerce_array::<Priority>(raw).map(Priority::into_output),
        Stage::RiskAnalysis => coerce_array::<Risk>(raw).map(Risk::into_output),
        Stage::PocGeneration => coerce_array::<PocVersion>(raw).map(PocVersion::into_output),
        Stage::MvpGeneration => coerce_array::<Deliverable>(raw).map(Deliverable::into_output),
    }
}

/// Placeholder output for `stage`.
pub fn fallback_output(stage: Stage) -> StageOutput {
    match stage {
        Stage::FeatureExtraction => Feature::into_output(Feature::fallback()),
        Stage::PriorityAnalysis => Priority::into_output(Priority::fallback()),
        Stage::RiskAnalysis => Risk::into_output(Risk::fallback()),
        Stage::PocGeneration => PocVersion::into_output(PocVersion::fallback()),
        Stage::MvpGeneration => Deliverable::into_output(Deliverable::fallback()),
    }
}

/// Normalized output, or the fallback when the text cannot be used.
///
/// The second element is true when the fallback was substituted.
pub fn normalize_or_fallback(stage: Stage, raw: &str) -> (StageOutput, bool) {
    match normalize_stage(stage, raw) {
        Ok(output) => (output, false),
        Err(e) => {
            tracing::warn!(stage = stage.as_str(), "Using placeholder data: {}", e);
            (fallback_output(stage), true)
        }
    }
}
