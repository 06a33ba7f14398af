//! The seven-step scoping wizard.
//!
//! [`WizardState`] holds the session data and the pure transitions;
//! [`Wizard`] owns a state plus a [`StageBackend`] and runs the stage call
//! that each forward move from `input` through `poc` requires.
//!
//! A failed call never blocks the wizard: the error message is recorded,
//! the stage's placeholder data is stored, and the wizard moves on.

mod backend;
mod state;

pub use backend::StageBackend;
pub use state::{Step, WizardError, WizardState};

use anyhow::{anyhow, Context};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::Instrument;

use crate::models::*;
use crate::normalize::{fallback_output, normalize_or_fallback};

pub struct Wizard<B> {
    backend: B,
    state: WizardState,
}

impl<B: StageBackend> Wizard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: WizardState::new(),
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn into_state(self) -> WizardState {
        self.state
    }

    pub fn update_inputs(&mut self, patch: InputsPatch) -> Result<(), WizardError> {
        self.state.update_inputs(patch)
    }

    pub fn select_poc(&mut self, id: &str) -> Result<(), WizardError> {
        self.state.select_poc(id)
    }

    pub fn previous(&mut self) -> bool {
        self.state.previous()
    }

    pub fn restart(&mut self) {
        self.state.restart();
    }

    /// The forward action.
    ///
    /// Runs the next stage unless its results already exist. Returns the step
    /// the wizard ends on.
    pub async fn advance(&mut self) -> Result<Step, WizardError> {
        if !self.state.can_proceed() {
            return Err(WizardError::NotReady(self.state.current_step));
        }

        match self.state.current_step.outgoing_stage() {
            Some(stage) if !self.state.results.has(stage) => self.run_stage(stage).await,
            _ => self.state.step_forward(),
        }
        Ok(self.state.current_step)
    }

    /// Drive the wizard from its current step to `mvp`.
    ///
    /// At the POC step, the POC with the requested focus is selected when one
    /// exists, otherwise the first POC.
    pub async fn run_through(&mut self, focus: Option<PocFocus>) -> Result<&WizardState, WizardError> {
        while self.state.current_step != Step::Mvp {
            if self.state.current_step == Step::Poc && self.state.selected_poc.is_none() {
                let pocs = &self.state.results.poc_versions;
                let choice = focus
                    .and_then(|f| pocs.iter().find(|p| p.focus == f))
                    .or_else(|| pocs.first())
                    .map(|p| p.id.clone())
                    .ok_or(WizardError::NotReady(Step::Poc))?;
                tracing::info!(poc = %choice, "Selecting POC");
                self.state.select_poc(&choice)?;
            }
            self.advance().await?;
        }
        Ok(&self.state)
    }

    async fn run_stage(&mut self, stage: Stage) {
        let span = tracing::info_span!(
            "stage",
            session = %self.state.session_id,
            stage = stage.as_str()
        );
        let started = std::time::Instant::now();

        self.state.begin_call();
        let outcome = self.call(stage).instrument(span).await;

        match outcome {
            Ok(raw) => {
                let (output, used_fallback) = normalize_or_fallback(stage, &raw);
                tracing::info!(
                    session = %self.state.session_id,
                    items = output.len(),
                    fallback = used_fallback,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "{} completed",
                    stage.label()
                );
                self.state.complete(output, None, used_fallback);
            }
            Err(e) => {
                let message = format!("{e:#}");
                tracing::warn!(
                    session = %self.state.session_id,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "{} failed, using placeholder data: {}",
                    stage.label(),
                    message
                );
                self.state.complete(fallback_output(stage), Some(message), true);
            }
        }
    }

    /// Build the stage request from the session and send it.
    async fn call(&self, stage: Stage) -> anyhow::Result<String> {
        let inputs = &self.state.inputs;
        let results = &self.state.results;

        match stage {
            Stage::FeatureExtraction => {
                let pdf_files: Vec<String> =
                    inputs.pdf_files.iter().map(|bytes| STANDARD.encode(bytes)).collect();
                self.backend
                    .extract_features(ExtractFeaturesInput {
                        transcript: Some(inputs.transcript.clone()),
                        pdf_files: Some(pdf_files),
                        ..Default::default()
                    })
                    .await
            }
            Stage::PriorityAnalysis => {
                self.backend
                    .analyze_priorities(AnalyzePrioritiesInput {
                        features_json: Some(to_json(&results.features)?),
                        transcript: Some(inputs.transcript.clone()),
                        model: None,
                    })
                    .await
            }
            Stage::RiskAnalysis => {
                self.backend
                    .analyze_risks(AnalyzeRisksInput {
                        features_json: Some(to_json(&results.features)?),
                        priorities_json: Some(to_json(&results.priorities)?),
                        transcript: Some(inputs.transcript.clone()),
                        model: None,
                    })
                    .await
            }
            Stage::PocGeneration => {
                if !inputs.has_hourly_rate() {
                    return Err(anyhow!("Hourly rate is required for POC cost calculation"));
                }
                self.backend
                    .generate_pocs(GeneratePocsInput {
                        features_json: Some(to_json(&results.features)?),
                        priorities_json: Some(to_json(&results.priorities)?),
                        risks_json: Some(to_json(&results.risks)?),
                        hourly_rate: inputs.hourly_rate,
                        model: None,
                    })
                    .await
            }
            Stage::MvpGeneration => {
                let poc = self
                    .state
                    .selected_poc
                    .as_deref()
                    .and_then(|id| results.find_poc(id))
                    .ok_or_else(|| anyhow!("Selected POC not found"))?;
                if !inputs.has_hourly_rate() {
                    return Err(anyhow!("Hourly rate is required for MVP cost calculation"));
                }
                self.backend
                    .generate_mvp(GenerateMvpInput {
                        selected_poc_json: Some(to_json(poc)?),
                        features_json: Some(to_json(&results.features)?),
                        priorities_json: Some(to_json(&results.priorities)?),
                        risks_json: Some(to_json(&results.risks)?),
                        hourly_rate: inputs.hourly_rate,
                        model: None,
                    })
                    .await
            }
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize stage input")
}
