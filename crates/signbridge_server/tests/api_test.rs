//! Endpoint tests driving the router in-process.

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use httpmock::prelude::*;
use serde_json::{Value, json};
use signbridge_error::{GenerationError, GenerationErrorKind};
use signbridge_models::{
    GeminiClient, GeminiConfigBuilder, GenerateContentResponse, GenerationBackend,
    GenerationPayload, LinearClassifier,
};
use signbridge_rate_limit::{RetryController, RetryPolicy};
use signbridge_server::{AppState, SentenceGateway, create_router};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::ServiceExt;

/// Backend that always returns the same reply.
struct FixedBackend {
    reply: Result<GenerateContentResponse, GenerationError>,
    calls: AtomicUsize,
}

impl FixedBackend {
    fn new(reply: Result<GenerateContentResponse, GenerationError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationBackend for FixedBackend {
    async fn generate_content(
        &self,
        _payload: &GenerationPayload,
    ) -> Result<GenerateContentResponse, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }

    fn model_name(&self) -> &str {
        "fixed"
    }
}

fn upstream_error(status_code: u16, body: &str) -> Result<GenerateContentResponse, GenerationError> {
    Err(GenerationError::new(GenerationErrorKind::Upstream {
        status_code,
        body: body.to_string(),
    }))
}

fn classifier() -> Arc<LinearClassifier> {
    Arc::new(
        LinearClassifier::from_json(
            r#"{"classes": ["xin chào", "cảm ơn"], "weights": [[1.0, 0.0], [0.0, 1.0]], "intercepts": [0.0, 0.0]}"#,
        )
        .unwrap(),
    )
}

fn app(backend: Arc<dyn GenerationBackend>) -> Router {
    let policy = RetryPolicy::with_unit(3, 1.5, Duration::from_millis(1)).unwrap();
    let gateway = SentenceGateway::new(backend, RetryController::new(policy));
    create_router(AppState::new(Arc::new(gateway), classifier()), &[])
}

async fn post_json(app: Router, uri: &str, body: Value) -> anyhow::Result<(StatusCode, Value)> {
    post_raw(app, uri, body.to_string()).await
}

async fn post_raw(app: Router, uri: &str, body: String) -> anyhow::Result<(StatusCode, Value)> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))?;
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_send_final_success() -> anyhow::Result<()> {
    let backend = FixedBackend::new(Ok(serde_json::from_value(json!({
        "candidates": [{"content": {"parts": [{"text": "Tôi đi học."}]}}]
    }))?));

    let (status, body) = post_json(
        app(backend.clone()),
        "/gpt/send-final",
        json!({"keywords": "tôi, học"}),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Tôi đi học."}));
    assert_eq!(backend.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_send_final_empty_keywords() -> anyhow::Result<()> {
    let backend = FixedBackend::new(upstream_error(500, "unused"));

    for body in [
        json!({"keywords": ""}),
        json!({"keywords": "   "}),
        json!({"keywords": null}),
        json!({}),
    ] {
        let (status, reply) = post_json(app(backend.clone()), "/gpt/send-final", body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(reply, json!({"detail": "no data submitted"}));
    }
    assert_eq!(backend.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_send_final_rate_limit_exhausted() -> anyhow::Result<()> {
    let backend = FixedBackend::new(upstream_error(429, "quota"));

    let (status, body) =
        post_json(app(backend.clone()), "/gpt/send-final", json!({"keywords": "xe"})).await?;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["detail"],
        "upstream rate limit exceeded, please retry in a few minutes"
    );
    assert_eq!(backend.calls(), 3);
    Ok(())
}

#[tokio::test]
async fn test_send_final_upstream_error_passes_through() -> anyhow::Result<()> {
    let backend = FixedBackend::new(upstream_error(403, "API key not valid"));

    let (status, body) =
        post_json(app(backend.clone()), "/gpt/send-final", json!({"keywords": "xe"})).await?;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"detail": "API key not valid"}));
    assert_eq!(backend.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn test_send_final_missing_text_is_500() -> anyhow::Result<()> {
    let backend = FixedBackend::new(Ok(serde_json::from_value(json!({"candidates": []}))?));

    let (status, body) =
        post_json(app(backend), "/gpt/send-final", json!({"keywords": "xe"})).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "failed to process upstream response"}));
    Ok(())
}

#[tokio::test]
async fn test_send_final_malformed_body_is_json_400() -> anyhow::Result<()> {
    let backend = FixedBackend::new(upstream_error(500, "unused"));

    let (status, body) = post_json(
        app(backend.clone()),
        "/gpt/send-final",
        json!({"keywords": ["tôi", "học"]}),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));

    let (status, body) =
        post_raw(app(backend.clone()), "/gpt/send-final", "not json".to_string()).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));

    assert_eq!(backend.calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_send_final_unreachable_upstream_is_500() -> anyhow::Result<()> {
    let config = GeminiConfigBuilder::default()
        .api_key("test-key")
        .base_url("http://127.0.0.1:1/v1beta")
        .timeout(Duration::from_secs(2))
        .build()?;
    let backend = Arc::new(GeminiClient::new(config)?);

    let (status, body) =
        post_json(app(backend), "/gpt/send-final", json!({"keywords": "xe"})).await?;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"detail": "failed to reach upstream service"}));
    Ok(())
}

#[tokio::test]
async fn test_send_final_through_gemini_client() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-1.5-pro:generateContent")
                .query_param("key", "test-key")
                .body_includes("Keyword: tôi, học, trường, xe");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "candidates": [{"content": {"parts": [{"text": "Tôi đi học đến trường bằng xe đạp."}]}}]
                }));
        })
        .await;

    let config = GeminiConfigBuilder::default()
        .api_key("test-key")
        .base_url(server.url("/v1beta"))
        .build()?;
    let backend = Arc::new(GeminiClient::new(config)?);

    let (status, body) = post_json(
        app(backend),
        "/gpt/send-final",
        json!({"keywords": "tôi, học, trường, xe"}),
    )
    .await?;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Tôi đi học đến trường bằng xe đạp."}));
    Ok(())
}

#[tokio::test]
async fn test_predict_success_and_failure_are_both_200() -> anyhow::Result<()> {
    let backend = FixedBackend::new(upstream_error(500, "unused"));

    let (status, body) =
        post_json(app(backend.clone()), "/predict", json!({"input": [0.2, 0.9]})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "cảm ơn"}));

    let (status, body) = post_json(app(backend), "/predict", json!({"input": [0.2]})).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"error": "X has 1 features, but the model is expecting 2 features as input"})
    );
    Ok(())
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let response = app(FixedBackend::new(upstream_error(500, "unused")))
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    assert_eq!(serde_json::from_slice::<Value>(&bytes)?, json!({"status": "ok"}));
    Ok(())
}

#[tokio::test]
async fn test_cors_allows_any_origin_by_default() -> anyhow::Result<()> {
    let response = app(FixedBackend::new(upstream_error(500, "unused")))
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/gpt/send-final")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.as_bytes()),
        Some(&b"http://localhost:3000"[..])
    );
    Ok(())
}
