//! Structured-output schemas for each stage.
//!
//! Every schema is an envelope object holding one array under the stage's
//! collection key. Item fields are all required and closed with
//! `additionalProperties: false`, as strict mode demands.

use serde_json::{json, Map, Value};

use crate::gateway::JsonSchemaSpec;
use crate::models::{Level, PocFocus, RiskCategory, Stage};

/// The response schema for `stage`.
pub fn for_stage(stage: Stage) -> JsonSchemaSpec {
    let item = match stage {
        Stage::FeatureExtraction => feature_item(),
        Stage::PriorityAnalysis => priority_item(),
        Stage::RiskAnalysis => risk_item(),
        Stage::PocGeneration => poc_item(),
        Stage::MvpGeneration => deliverable_item(),
    };
    JsonSchemaSpec::strict(stage.schema_name(), envelope(stage.collection_key(), item))
}

fn envelope(key: &str, item: Value) -> Value {
    let mut properties = Map::new();
    properties.insert(key.to_string(), json!({ "type": "array", "items": item }));
    json!({
        "type": "object",
        "properties": properties,
        "required": [key],
        "additionalProperties": false,
    })
}

/// Closed object whose fields are all required.
fn object(fields: Vec<(&str, Value)>) -> Value {
    let required: Vec<&str> = fields.iter().map(|(name, _)| *name).collect();
    let mut properties = Map::new();
    for (name, schema) in fields {
        properties.insert(name.to_string(), schema);
    }
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false,
    })
}

fn string(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

fn number(description: &str) -> Value {
    json!({ "type": "number", "description": description })
}

fn one_of(values: &[&str], description: &str) -> Value {
    json!({ "type": "string", "enum": values, "description": description })
}

fn levels() -> Vec<&'static str> {
    Level::ALL.iter().map(Level::as_str).collect()
}

fn feature_item() -> Value {
    object(vec![
        ("title", string("Name of the feature")),
        ("description", string("Detailed description of the feature")),
        (
            "complexity",
            one_of(&levels(), "Estimated implementation complexity"),
        ),
    ])
}

fn priority_item() -> Value {
    object(vec![
        ("id", string("Unique identifier matching feature ID")),
        ("feature", string("Name of the feature being prioritized")),
        (
            "priority",
            one_of(
                &levels(),
                "Priority level based on business impact and dependencies",
            ),
        ),
        ("reasoning", string("Clear explanation for the assigned priority")),
    ])
}

fn risk_item() -> Value {
    let categories: Vec<&str> = RiskCategory::ALL.iter().map(RiskCategory::as_str).collect();
    object(vec![
        ("id", string("Unique identifier for the risk")),
        ("title", string("Concise name of the risk")),
        (
            "description",
            string("Detailed description of the risk and its potential impact"),
        ),
        (
            "severity",
            one_of(&levels(), "Risk severity based on impact and likelihood"),
        ),
        (
            "category",
            one_of(&categories, "Category of risk for better organization"),
        ),
        (
            "impact",
            string("Specific impact this risk could have on the project"),
        ),
        (
            "mitigation",
            string("Actionable strategies to mitigate or manage this risk"),
        ),
    ])
}

fn poc_item() -> Value {
    let focuses: Vec<&str> = PocFocus::ALL.iter().map(PocFocus::as_str).collect();
    object(vec![
        ("id", string("Unique identifier for the POC version")),
        ("title", string("Clear, descriptive title for this POC approach")),
        ("focus", one_of(&focuses, "Strategic focus of this POC version")),
        (
            "features",
            json!({
                "type": "array",
                "items": { "type": "string" },
                "description": "List of 3-5 core features to include in this POC",
            }),
        ),
        ("timeEstimate", string("Estimated timeline (e.g., \"4-6 weeks\")")),
        ("cost", number("Total estimated cost in USD based on hourly rate")),
    ])
}

fn deliverable_item() -> Value {
    object(vec![
        ("id", string("Unique identifier for the deliverable")),
        ("title", string("Clear, descriptive title for this deliverable")),
        (
            "description",
            string("Detailed description of what this deliverable includes"),
        ),
        ("timeEstimate", string("Estimated timeline (e.g., \"2-3 weeks\")")),
        ("cost", number("Total estimated cost in USD based on hourly rate")),
    ])
}
