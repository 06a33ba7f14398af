use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{InputsPatch, ProjectInputs, ProjectResults, Stage, StageOutput};

/// Wizard screens, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Welcome,
    Input,
    FeatureExtraction,
    PriorityAnalysis,
    RiskAnalysis,
    Poc,
    Mvp,
}

impl Step {
    pub const ORDER: [Step; 7] = [
        Step::Welcome,
        Step::Input,
        Step::FeatureExtraction,
        Step::PriorityAnalysis,
        Step::RiskAnalysis,
        Step::Poc,
        Step::Mvp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Input => "input",
            Self::FeatureExtraction => "feature-extraction",
            Self::PriorityAnalysis => "priority-analysis",
            Self::RiskAnalysis => "risk-analysis",
            Self::Poc => "poc",
            Self::Mvp => "mvp",
        }
    }

    fn index(&self) -> usize {
        Self::ORDER.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn next(&self) -> Option<Step> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    pub fn prev(&self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ORDER[i])
    }

    /// Stage that runs when moving forward from this step.
    pub fn outgoing_stage(&self) -> Option<Stage> {
        match self {
            Self::Input => Some(Stage::FeatureExtraction),
            Self::FeatureExtraction => Some(Stage::PriorityAnalysis),
            Self::PriorityAnalysis => Some(Stage::RiskAnalysis),
            Self::RiskAnalysis => Some(Stage::PocGeneration),
            Self::Poc => Some(Stage::MvpGeneration),
            Self::Welcome | Self::Mvp => None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Cannot move past the {0} step yet")]
    NotReady(Step),

    #[error("No POC with id {0}")]
    UnknownPoc(String),

    #[error("Inputs are locked once features are extracted; restart to change them")]
    InputsLocked,

    #[error("The POC selection is locked once the MVP plan exists; restart to change it")]
    SelectionLocked,
}

/// Everything the wizard knows about one scoping session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub session_id: Uuid,
    pub current_step: Step,
    pub inputs: ProjectInputs,
    pub results: ProjectResults,
    pub is_loading: bool,
    /// Last human-readable failure; cleared when a new call starts.
    pub error: Option<String>,
    pub selected_poc: Option<String>,
    /// Stages whose results are placeholder data.
    pub fallback_stages: Vec<Stage>,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            current_step: Step::Welcome,
            inputs: ProjectInputs::default(),
            results: ProjectResults::default(),
            is_loading: false,
            error: None,
            selected_poc: None,
            fallback_stages: Vec::new(),
        }
    }

    /// Whether the forward action is allowed from the current step.
    pub fn can_proceed(&self) -> bool {
        if self.is_loading {
            return false;
        }
        match self.current_step {
            Step::Welcome => true,
            Step::Input => self.inputs.is_complete(),
            Step::FeatureExtraction => self.results.has(Stage::FeatureExtraction),
            Step::PriorityAnalysis => self.results.has(Stage::PriorityAnalysis),
            Step::RiskAnalysis => self.results.has(Stage::RiskAnalysis),
            Step::Poc => self.selected_poc.is_some(),
            Step::Mvp => false,
        }
    }

    /// Move one step forward without running anything.
    pub fn step_forward(&mut self) {
        if let Some(next) = self.current_step.next() {
            self.current_step = next;
        }
    }

    /// Move one step back. Returns false at the first step.
    pub fn previous(&mut self) -> bool {
        match self.current_step.prev() {
            Some(prev) => {
                self.current_step = prev;
                true
            }
            None => false,
        }
    }

    /// Back to `welcome` with a fresh session.
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    pub fn begin_call(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Store a stage's output, record how it was obtained, and move forward.
    pub fn complete(&mut self, output: StageOutput, error: Option<String>, used_fallback: bool) {
        let stage = output.stage();
        self.results.store(output);
        self.fallback_stages.retain(|s| *s != stage);
        if used_fallback {
            self.fallback_stages.push(stage);
        }
        self.error = error;
        self.is_loading = false;
        self.step_forward();
    }

    pub fn used_fallback(&self, stage: Stage) -> bool {
        self.fallback_stages.contains(&stage)
    }

    pub fn update_inputs(&mut self, patch: InputsPatch) -> Result<(), WizardError> {
        if self.results.has(Stage::FeatureExtraction) {
            return Err(WizardError::InputsLocked);
        }
        patch.apply(&mut self.inputs);
        Ok(())
    }

    pub fn select_poc(&mut self, id: &str) -> Result<(), WizardError> {
        if self.results.has(Stage::MvpGeneration) {
            return Err(WizardError::SelectionLocked);
        }
        if self.results.find_poc(id).is_none() {
            return Err(WizardError::UnknownPoc(id.to_string()));
        }
        self.selected_poc = Some(id.to_string());
        Ok(())
    }

    /// Error banner text, if the last call failed.
    pub fn banner(&self) -> Option<String> {
        self.error
            .as_ref()
            .map(|e| format!("{e}. Showing placeholder data so you can continue."))
    }
}
