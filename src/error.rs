//! Errors raised by the stage executors.

use thiserror::Error;

use crate::gateway::GatewayError;

/// Why a stage call failed.
///
/// `Validation` is the caller's fault (HTTP 400); everything else is a
/// server-side failure (HTTP 500).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required input is missing or unusable; no provider call was made.
    #[error("{0}")]
    Validation(String),

    /// The process is not set up to reach the provider.
    #[error("{0}")]
    Configuration(String),

    /// The provider call failed or returned something unreadable.
    #[error("{message}")]
    Upstream { status: Option<u16>, message: String },
}

impl PipelineError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<GatewayError> for PipelineError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Configuration(message) => Self::Configuration(message),
            other => Self::Upstream {
                status: other.status(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_stays_a_configuration_error() {
        let err: PipelineError =
            GatewayError::configuration("OpenRouter API key not configured").into();
        assert!(matches!(err, PipelineError::Configuration(_)));
        assert_eq!(err.to_string(), "OpenRouter API key not configured");
    }

    #[test]
    fn upstream_detail_survives_conversion() {
        let err: PipelineError = GatewayError::upstream(Some(401), "User not found.").into();
        match &err {
            PipelineError::Upstream { status, message } => {
                assert_eq!(*status, Some(401));
                assert!(message.contains("User not found."));
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
        assert!(!err.is_validation());
    }
}
