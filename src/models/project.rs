use serde::{Deserialize, Serialize};

use super::{Deliverable, Feature, PocVersion, Priority, Risk, Stage};

/// What the user provides before the pipeline starts.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInputs {
    /// USD per hour, used for POC and MVP cost estimates.
    pub hourly_rate: Option<f64>,
    pub transcript: String,
    /// Raw PDF bytes; base64-encoded only when sent to the backend.
    #[serde(skip)]
    pub pdf_files: Vec<Vec<u8>>,
}

impl ProjectInputs {
    /// Whether the hourly rate is usable for cost estimates (present, finite, above zero).
    pub fn has_hourly_rate(&self) -> bool {
        is_usable_rate(self.hourly_rate)
    }

    /// Whether Stage 1 has what it needs.
    pub fn is_complete(&self) -> bool {
        self.has_hourly_rate() && !self.transcript.trim().is_empty()
    }
}

/// Partial update of [`ProjectInputs`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct InputsPatch {
    pub hourly_rate: Option<f64>,
    pub transcript: Option<String>,
    pub pdf_files: Option<Vec<Vec<u8>>>,
}

impl InputsPatch {
    pub fn apply(self, inputs: &mut ProjectInputs) {
        if let Some(rate) = self.hourly_rate {
            inputs.hourly_rate = Some(rate);
        }
        if let Some(transcript) = self.transcript {
            inputs.transcript = transcript;
        }
        if let Some(files) = self.pdf_files {
            inputs.pdf_files = files;
        }
    }
}

/// A rate is usable when it is present, finite, and strictly positive.
/// Zero counts as missing, the same as `null`.
pub fn is_usable_rate(rate: Option<f64>) -> bool {
    matches!(rate, Some(r) if r.is_finite() && r > 0.0)
}

/// Every stage output gathered so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResults {
    pub features: Vec<Feature>,
    pub priorities: Vec<Priority>,
    pub risks: Vec<Risk>,
    pub poc_versions: Vec<PocVersion>,
    pub mvp_deliverables: Vec<Deliverable>,
}

impl ProjectResults {
    /// Whether the given stage has produced output.
    pub fn has(&self, stage: Stage) -> bool {
        match stage {
            Stage::FeatureExtraction => !self.features.is_empty(),
            Stage::PriorityAnalysis => !self.priorities.is_empty(),
            Stage::RiskAnalysis => !self.risks.is_empty(),
            Stage::PocGeneration => !self.poc_versions.is_empty(),
            Stage::MvpGeneration => !self.mvp_deliverables.is_empty(),
        }
    }

    /// Store one stage's output, leaving every other slot untouched.
    pub fn store(&mut self, output: StageOutput) {
        match output {
            StageOutput::Features(items) => self.features = items,
            StageOutput::Priorities(items) => self.priorities = items,
            StageOutput::Risks(items) => self.risks = items,
            StageOutput::PocVersions(items) => self.poc_versions = items,
            StageOutput::MvpDeliverables(items) => self.mvp_deliverables = items,
        }
    }

    pub fn find_poc(&self, id: &str) -> Option<&PocVersion> {
        self.poc_versions.iter().find(|poc| poc.id == id)
    }
}

/// Normalized output of a single stage.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutput {
    Features(Vec<Feature>),
    Priorities(Vec<Priority>),
    Risks(Vec<Risk>),
    PocVersions(Vec<PocVersion>),
    MvpDeliverables(Vec<Deliverable>),
}

impl StageOutput {
    pub fn stage(&self) -> Stage {
        match self {
            Self::Features(_) => Stage::FeatureExtraction,
            Self::Priorities(_) => Stage::PriorityAnalysis,
            Self::Risks(_) => Stage::RiskAnalysis,
            Self::PocVersions(_) => Stage::PocGeneration,
            Self::MvpDeliverables(_) => Stage::MvpGeneration,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Features(items) => items.len(),
            Self::Priorities(items) => items.len(),
            Self::Risks(items) => items.len(),
            Self::PocVersions(items) => items.len(),
            Self::MvpDeliverables(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
