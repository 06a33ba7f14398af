mod error;
mod handlers;

pub use error::ApiError;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::BODY_LIMIT_BYTES;
use crate::pipeline::Pipeline;

/// Shared, read-only state of every route.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Build the HTTP router. `cors_origins` of `None` allows any origin.
pub fn create_router(pipeline: Pipeline, cors_origins: Option<&[String]>) -> Router {
    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let ai = Router::new()
        .route("/extract-features", post(handlers::extract_features))
        .route("/analyze-priorities", post(handlers::analyze_priorities))
        .route("/analyze-risks", post(handlers::analyze_risks))
        .route("/generate-pocs", post(handlers::generate_pocs))
        .route("/generate-mvp", post(handlers::generate_mvp))
        .route("/chat", post(handlers::chat));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/api/ai", ai)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)),
        )
        .with_state(state)
}

fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
