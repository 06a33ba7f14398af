use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::PipelineError;
use crate::models::ErrorResponse;

/// Error returned by every route as `{ "error": message }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Validation(message) => Self::bad_request(message),
            other => Self::internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err: ApiError = PipelineError::validation("Messages are required").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Messages are required");
    }

    #[test]
    fn configuration_and_upstream_map_to_500() {
        let config: ApiError =
            PipelineError::Configuration("OpenRouter API key not configured".to_string()).into();
        assert_eq!(config.status, StatusCode::INTERNAL_SERVER_ERROR);

        let upstream: ApiError = PipelineError::Upstream {
            status: Some(401),
            message: "upstream provider error (HTTP 401): User not found.".to_string(),
        }
        .into();
        assert_eq!(upstream.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(upstream.message.contains("User not found."));
    }

    #[test]
    fn response_uses_the_error_envelope() {
        let response = ApiError::bad_request("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
