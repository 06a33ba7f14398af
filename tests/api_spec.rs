use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use sage_scope::api::create_router;
use sage_scope::gateway::{ChatGateway, ChatRequest, GatewayError, OpenRouterClient};
use sage_scope::models::*;
use sage_scope::pipeline::Pipeline;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Gateway that records every request and answers with a fixed reply.
#[derive(Clone)]
struct RecordingGateway {
    reply: String,
    calls: Arc<Mutex<Vec<ChatRequest>>>,
}

impl RecordingGateway {
    fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn invoke(&self, req: &ChatRequest) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(req.clone());
        Ok(self.reply.clone())
    }
}

fn setup(gateway: &RecordingGateway) -> TestServer {
    let pipeline = Pipeline::new(Arc::new(gateway.clone()));
    TestServer::new(create_router(pipeline, None)).expect("Failed to create test server")
}

fn error_of(response: &axum_test::TestResponse) -> String {
    response.json::<ErrorResponse>().error
}

const FEATURES: &str = r#"[{"id":"feat-001","title":"Login page","description":"Email login"}]"#;
const PRIORITIES: &str =
    r#"[{"id":"1","feature":"Login page","priority":"high","reasoning":"Gate to everything"}]"#;
const RISKS: &str = r#"[{"id":"1","title":"Auth provider","description":"Third-party auth","severity":"medium","category":"technical","impact":"Delays","mitigation":"Spike early"}]"#;
const POC: &str = r#"{"id":"1","title":"Quick revenue","focus":"revenue","features":["Login page"],"timeEstimate":"4 weeks","cost":24000}"#;

mod health {
    use super::*;

    #[tokio::test]
    async fn root_reports_running() {
        let server = setup(&RecordingGateway::replying(""));

        let response = server.get("/").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["message"], "Sage Backend API is running!");
    }

    #[tokio::test]
    async fn health_reports_status_and_timestamp() {
        let server = setup(&RecordingGateway::replying(""));

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "healthy");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}

mod extract_features {
    use super::*;

    #[tokio::test]
    async fn assigns_sequential_ids_to_features_without_one() {
        let gateway = RecordingGateway::replying(
            r#"{"features":[{"title":"Login page","description":"Email login"},{"title":"Payments page","description":"Card checkout"}]}"#,
        );
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/extract-features")
            .json(&json!({ "transcript": "Build a login page and a payments page" }))
            .await;

        response.assert_status_ok();
        let data: Value = serde_json::from_str(&response.json::<DataResponse>().data).unwrap();
        assert_eq!(data["features"][0]["id"], "feat-001");
        assert_eq!(data["features"][1]["id"], "feat-002");
        assert_eq!(data["features"][1]["title"], "Payments page");
    }

    #[tokio::test]
    async fn sends_transcript_and_attachments_to_the_provider() {
        let gateway = RecordingGateway::replying(r#"{"features":[]}"#);
        let server = setup(&gateway);

        server
            .post("/api/ai/extract-features")
            .json(&json!({
                "transcript": "We need a dashboard",
                "pdfFiles": ["JVBERi0xLjQ=", "data:application/pdf;base64,JVBERi0xLjU="],
            }))
            .await
            .assert_status_ok();

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert_eq!(request.model, Stage::FeatureExtraction.default_model());
        assert!(request.transcript().contains("Project Transcript: We need a dashboard"));
        assert_eq!(request.messages[1].attachments().len(), 2);
        assert_eq!(request.options.plugins.len(), 1);
        assert_eq!(
            request.options.response_schema.as_ref().unwrap().name,
            "feature_extraction"
        );
    }

    #[tokio::test]
    async fn honours_a_requested_model() {
        let gateway = RecordingGateway::replying(r#"{"features":[]}"#);
        let server = setup(&gateway);

        server
            .post("/api/ai/extract-features")
            .json(&json!({ "transcript": "x", "model": "anthropic/claude-sonnet-4" }))
            .await
            .assert_status_ok();

        assert_eq!(gateway.calls()[0].model, "anthropic/claude-sonnet-4");
    }

    #[tokio::test]
    async fn rejects_missing_transcript_without_calling_the_provider() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/extract-features")
            .json(&json!({ "pdfFiles": ["JVBERi0xLjQ="] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response), "Transcript or local_transcript is required");
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn reads_a_local_transcript_inside_the_configured_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("call.txt"), "Build an admin console").unwrap();

        let gateway = RecordingGateway::replying(r#"{"features":[]}"#);
        let pipeline = Pipeline::new(Arc::new(gateway.clone()))
            .with_local_dir(Some(dir.path().to_path_buf()));
        let server = TestServer::new(create_router(pipeline, None)).unwrap();

        server
            .post("/api/ai/extract-features")
            .json(&json!({ "local_transcript": "call.txt" }))
            .await
            .assert_status_ok();

        assert!(gateway.calls()[0]
            .transcript()
            .contains("Project Transcript: Build an admin console"));
    }

    #[tokio::test]
    async fn refuses_local_paths_outside_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = RecordingGateway::replying("{}");
        let pipeline = Pipeline::new(Arc::new(gateway.clone()))
            .with_local_dir(Some(dir.path().to_path_buf()));
        let server = TestServer::new(create_router(pipeline, None)).unwrap();

        let response = server
            .post("/api/ai/extract-features")
            .json(&json!({ "local_transcript": "../secrets.txt" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn refuses_local_paths_when_no_directory_is_configured() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/extract-features")
            .json(&json!({ "local_transcript": "call.txt" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(error_of(&response).contains("SAGE_LOCAL_DIR"));
    }

    #[tokio::test]
    async fn malformed_body_is_a_bad_request() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/extract-features")
            .content_type("application/json")
            .bytes("{\"transcript\": ".into())
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(!error_of(&response).is_empty());
        assert!(gateway.calls().is_empty());
    }
}

mod analysis_stages {
    use super::*;

    #[tokio::test]
    async fn priorities_require_features_and_transcript() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/analyze-priorities")
            .json(&json!({ "featuresJson": FEATURES }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response), "Features and transcript are required");
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn priorities_pass_features_and_transcript_through() {
        let gateway = RecordingGateway::replying(r#"{"priorities":[]}"#);
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/analyze-priorities")
            .json(&json!({ "featuresJson": FEATURES, "transcript": "Login first" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.json::<DataResponse>().data, r#"{"priorities":[]}"#);

        let request = &gateway.calls()[0];
        assert_eq!(request.model, "openai/gpt-5-mini");
        assert!(request.transcript().contains(FEATURES));
        assert!(request.transcript().contains("Login first"));
    }

    #[tokio::test]
    async fn risks_require_priorities() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/analyze-risks")
            .json(&json!({ "featuresJson": FEATURES, "transcript": "t" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(&response),
            "Features, priorities, and transcript are required"
        );
    }
}

mod generate_pocs {
    use super::*;

    fn body(rate: Value) -> Value {
        json!({
            "featuresJson": FEATURES,
            "prioritiesJson": PRIORITIES,
            "risksJson": RISKS,
            "hourlyRate": rate,
        })
    }

    #[tokio::test]
    async fn zero_rate_counts_as_missing() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server.post("/api/ai/generate-pocs").json(&body(json!(0))).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(&response),
            "Features, priorities, risks, and hourly rate are required"
        );
        assert!(gateway.calls().is_empty());
    }

    #[tokio::test]
    async fn null_rate_counts_as_missing() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server.post("/api/ai/generate-pocs").json(&body(Value::Null)).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(&response),
            "Features, priorities, risks, and hourly rate are required"
        );
    }

    #[tokio::test]
    async fn negative_rate_is_rejected_with_its_own_message() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server.post("/api/ai/generate-pocs").json(&body(json!(-20))).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(error_of(&response).starts_with("Hourly rate must be a positive number"));
    }

    #[tokio::test]
    async fn embeds_the_rate_in_the_prompt() {
        let gateway = RecordingGateway::replying(r#"{"pocVersions":[]}"#);
        let server = setup(&gateway);

        server
            .post("/api/ai/generate-pocs")
            .json(&body(json!(150)))
            .await
            .assert_status_ok();

        let request = &gateway.calls()[0];
        assert!(request.transcript().contains("HOURLY RATE: $150"));
        assert_eq!(request.options.max_tokens, Some(4000));
    }
}

mod generate_mvp {
    use super::*;

    #[tokio::test]
    async fn requires_the_selected_poc() {
        let gateway = RecordingGateway::replying("{}");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/generate-mvp")
            .json(&json!({
                "featuresJson": FEATURES,
                "prioritiesJson": PRIORITIES,
                "risksJson": RISKS,
                "hourlyRate": 120,
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            error_of(&response),
            "All parameters are required: selectedPOC, features, priorities, risks, and hourly rate"
        );
    }

    #[tokio::test]
    async fn includes_the_selected_poc_in_the_prompt() {
        let gateway = RecordingGateway::replying(r#"{"mvpDeliverables":[]}"#);
        let server = setup(&gateway);

        server
            .post("/api/ai/generate-mvp")
            .json(&json!({
                "selectedPOCJson": POC,
                "featuresJson": FEATURES,
                "prioritiesJson": PRIORITIES,
                "risksJson": RISKS,
                "hourlyRate": 87.5,
            }))
            .await
            .assert_status_ok();

        let text = gateway.calls()[0].transcript();
        assert!(text.contains("SELECTED POC APPROACH:"));
        assert!(text.contains("Quick revenue"));
        assert!(text.contains("HOURLY RATE: $87.5"));
    }
}

mod chat {
    use super::*;

    #[tokio::test]
    async fn requires_messages() {
        let gateway = RecordingGateway::replying("hi");
        let server = setup(&gateway);

        let response = server.post("/api/ai/chat").json(&json!({})).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response), "Messages are required");
    }

    #[tokio::test]
    async fn passes_messages_through_without_a_schema() {
        let gateway = RecordingGateway::replying("Sounds like three features.");
        let server = setup(&gateway);

        let response = server
            .post("/api/ai/chat")
            .json(&json!({
                "messages": [
                    { "role": "system", "content": "You scope projects." },
                    { "role": "user", "content": "How big is a login page?" }
                ]
            }))
            .await;

        response.assert_status_ok();
        assert_eq!(
            response.json::<DataResponse>().data,
            "Sounds like three features."
        );

        let request = &gateway.calls()[0];
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.messages.len(), 2);
        assert!(request.options.response_schema.is_none());
        assert_eq!(request.options.max_tokens, Some(2000));
    }
}

mod upstream_failures {
    use super::*;

    fn server_for(gateway: OpenRouterClient) -> TestServer {
        let pipeline = Pipeline::new(Arc::new(gateway));
        TestServer::new(create_router(pipeline, None)).unwrap()
    }

    #[tokio::test]
    async fn provider_rejection_is_a_server_error_with_detail() {
        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "message": "No auth credentials found", "code": 401 }
            })))
            .mount(&provider)
            .await;

        let client = OpenRouterClient::new(Some("sk-or-bad".to_string()), provider.uri()).unwrap();
        let server = server_for(client);

        let response = server
            .post("/api/ai/extract-features")
            .json(&json!({ "transcript": "Build a login page" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert!(error_of(&response).contains("No auth credentials found"));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_server_error() {
        let client = OpenRouterClient::new(None, "http://127.0.0.1:9").unwrap();
        let server = server_for(client);

        let response = server
            .post("/api/ai/chat")
            .json(&json!({ "messages": [{ "role": "user", "content": "hi" }] }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_of(&response), "OpenRouter API key not configured");
    }
}
