//! Client tests against a local stand-in for the generation endpoint

use axum::{extract::Path, http::StatusCode, routing::post, Json, Router};
use devbox_generate::{CodeGenerator, GeminiClient, GenerateError, GenerationConfig};
use serde_json::{json, Value};

async fn spawn_endpoint() -> String {
    async fn generate(Path(rest): Path<String>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if rest.starts_with("broken") {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({ "error": { "message": "quota exceeded" } })),
            );
        }

        // Echo the prompt back inside fences, the way a model ignoring the rules would
        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
        let has_context = body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap_or_default()
            .contains("<p>old</p>");
        let text = format!("```html\n<h1>{}</h1><!-- context:{} -->\n```", prompt, has_context);

        (
            StatusCode::OK,
            Json(json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] })),
        )
    }

    let app = Router::new().route("/v1beta/models/*rest", post(generate));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn client(endpoint: String, model: &str) -> GeminiClient {
    let config = GenerationConfig {
        endpoint,
        model: model.to_string(),
        ..GenerationConfig::default()
    };
    GeminiClient::with_api_key(config, Some("test-key".to_string()))
}

#[tokio::test]
async fn test_generate_strips_fences_and_sends_context() {
    let endpoint = spawn_endpoint().await;
    let client = client(endpoint, "test-model");

    let code = client.generate("Title", "<p>old</p>").await.unwrap();

    assert_eq!(code, "<h1>Title</h1><!-- context:true -->");
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let endpoint = spawn_endpoint().await;
    let client = client(endpoint, "broken-model");

    let err = client.generate("Title", "").await.unwrap_err();

    match err {
        GenerateError::Status { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("quota exceeded"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_transport_error() {
    // Port 9 (discard) is closed on test machines
    let client = client("http://127.0.0.1:9".to_string(), "m");
    let err = client.generate("x", "").await.unwrap_err();
    assert!(matches!(err, GenerateError::Transport(_)));
}
