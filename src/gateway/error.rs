//! Error types for the provider gateway.

use thiserror::Error;

/// Errors that can occur when calling the provider.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No credential (or an unusable one); raised before any network I/O.
    #[error("{0}")]
    Configuration(String),

    /// The provider answered with a failure, or with a body we cannot read.
    #[error("upstream provider error{}: {message}", status_suffix(.status))]
    Upstream {
        status: Option<u16>,
        message: String,
        retryable: bool,
    },

    /// Transport failure before a response arrived.
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl GatewayError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        let retryable = matches!(status, Some(s) if s == 429 || s >= 500);
        Self::Upstream {
            status,
            message: message.into(),
            retryable,
        }
    }

    /// A malformed response is permanent; retrying returns the same body.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Upstream {
            status: None,
            message: message.into(),
            retryable: false,
        }
    }

    /// Whether a bounded retry may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Configuration(_) => false,
            Self::Upstream { retryable, .. } => *retryable,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
        }
    }

    /// HTTP status reported by the provider, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Configuration(_) => None,
            Self::Upstream { status, .. } => *status,
            Self::Http(e) => e.status().map(|s| s.as_u16()),
        }
    }

    /// Short code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Http(_) => "http_error",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}
