use async_trait::async_trait;

use crate::client::BackendClient;
use crate::models::{
    AnalyzePrioritiesInput, AnalyzeRisksInput, ExtractFeaturesInput, GenerateMvpInput,
    GeneratePocsInput,
};
use crate::pipeline::Pipeline;

/// Where the wizard sends stage calls: the in-process pipeline or a remote backend.
///
/// Every method returns the raw stage text; the wizard normalizes it.
#[async_trait]
pub trait StageBackend: Send + Sync {
    async fn extract_features(&self, input: ExtractFeaturesInput) -> anyhow::Result<String>;
    async fn analyze_priorities(&self, input: AnalyzePrioritiesInput) -> anyhow::Result<String>;
    async fn analyze_risks(&self, input: AnalyzeRisksInput) -> anyhow::Result<String>;
    async fn generate_pocs(&self, input: GeneratePocsInput) -> anyhow::Result<String>;
    async fn generate_mvp(&self, input: GenerateMvpInput) -> anyhow::Result<String>;
}

#[async_trait]
impl StageBackend for Pipeline {
    async fn extract_features(&self, input: ExtractFeaturesInput) -> anyhow::Result<String> {
        Ok(Pipeline::extract_features(self, input).await?)
    }

    async fn analyze_priorities(&self, input: AnalyzePrioritiesInput) -> anyhow::Result<String> {
        Ok(Pipeline::analyze_priorities(self, input).await?)
    }

    async fn analyze_risks(&self, input: AnalyzeRisksInput) -> anyhow::Result<String> {
        Ok(Pipeline::analyze_risks(self, input).await?)
    }

    async fn generate_pocs(&self, input: GeneratePocsInput) -> anyhow::Result<String> {
        Ok(Pipeline::generate_pocs(self, input).await?)
    }

    async fn generate_mvp(&self, input: GenerateMvpInput) -> anyhow::Result<String> {
        Ok(Pipeline::generate_mvp(self, input).await?)
    }
}

#[async_trait]
impl StageBackend for BackendClient {
    async fn extract_features(&self, input: ExtractFeaturesInput) -> anyhow::Result<String> {
        Ok(BackendClient::extract_features(self, &input).await?)
    }

    async fn analyze_priorities(&self, input: AnalyzePrioritiesInput) -> anyhow::Result<String> {
        Ok(BackendClient::analyze_priorities(self, &input).await?)
    }

    async fn analyze_risks(&self, input: AnalyzeRisksInput) -> anyhow::Result<String> {
        Ok(BackendClient::analyze_risks(self, &input).await?)
    }

    async fn generate_pocs(&self, input: GeneratePocsInput) -> anyhow::Result<String> {
        Ok(BackendClient::generate_pocs(self, &input).await?)
    }

    async fn generate_mvp(&self, input: GenerateMvpInput) -> anyhow::Result<String> {
        Ok(BackendClient::generate_mvp(self, &input).await?)
    }
}
