//! HTTP routes of the gateway.

use crate::{LandmarkInput, PredictOutcome, SentenceGateway};
use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use signbridge_error::{GenerationError, GenerationErrorKind};
use signbridge_models::Classifier;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

const RATE_LIMITED_DETAIL: &str = "upstream rate limit exceeded, please retry in a few minutes";
const RESPONSE_SHAPE_DETAIL: &str = "failed to process upstream response";
const TRANSPORT_DETAIL: &str = "failed to reach upstream service";
const INTERNAL_DETAIL: &str = "internal server error";

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    gateway: Arc<SentenceGateway>,
    classifier: Arc<dyn Classifier>,
}

impl AppState {
    /// Creates new API state.
    pub fn new(gateway: Arc<SentenceGateway>, classifier: Arc<dyn Classifier>) -> Self {
        Self {
            gateway,
            classifier,
        }
    }
}

/// Body of `POST /gpt/send-final`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordsRequest {
    /// Comma-separated keywords; missing or `null` means empty
    #[serde(default)]
    pub keywords: Option<String>,
}

impl KeywordsRequest {
    /// Raw keyword text, empty when absent.
    pub fn keywords(&self) -> &str {
        self.keywords.as_deref().unwrap_or_default()
    }
}

/// Success body of `POST /gpt/send-final`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Generated sentence
    pub message: String,
}

/// A request failure rendered as `{"detail": ...}`.
#[derive(Debug)]
pub enum ApiError {
    /// The pipeline rejected the keywords or the upstream call failed
    Generation(GenerationError),
    /// The request body is not a JSON object with string keywords
    InvalidBody(String),
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        Self::Generation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection.body_text())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generation(e) => write!(f, "{}", e),
            Self::InvalidBody(reason) => write!(f, "Invalid request body: {}", reason),
        }
    }
}

impl ApiError {
    /// Status and detail message sent to the client.
    pub fn status_and_detail(&self) -> (StatusCode, String) {
        let err = match self {
            Self::Generation(err) => err,
            Self::InvalidBody(reason) => return (StatusCode::BAD_REQUEST, reason.clone()),
        };
        let kind = err.kind();
        let detail = match kind {
            GenerationErrorKind::EmptyKeywords => kind.to_string(),
            GenerationErrorKind::RateLimitExhausted { .. } => RATE_LIMITED_DETAIL.to_string(),
            GenerationErrorKind::ResponseShape(_) => RESPONSE_SHAPE_DETAIL.to_string(),
            GenerationErrorKind::Upstream { body, .. } => body.clone(),
            GenerationErrorKind::Transport(_) => TRANSPORT_DETAIL.to_string(),
            GenerationErrorKind::MissingApiKey
            | GenerationErrorKind::InvalidRetryPolicy(_)
            | GenerationErrorKind::InvalidEndpoint(_) => INTERNAL_DETAIL.to_string(),
        };
        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = self.status_and_detail();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Build the router with CORS and request tracing.
///
/// An empty `cors_origins` allows any origin.
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/predict", post(predict))
        .route("/gpt/send-final", post(send_final))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::very_permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn predict(
    State(state): State<AppState>,
    Json(input): Json<LandmarkInput>,
) -> Json<PredictOutcome> {
    Json(PredictOutcome::run(state.classifier.as_ref(), &input.input))
}

async fn send_final(
    State(state): State<AppState>,
    body: Result<Json<KeywordsRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = body?;
    let message = state.gateway.handle(request.keywords()).await?;
    Ok(Json(MessageResponse { message }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(kind: GenerationErrorKind) -> (u16, String) {
        let (status, detail) = ApiError::from(GenerationError::new(kind)).status_and_detail();
        (status.as_u16(), detail)
    }

    #[test]
    fn error_details() {
        assert_eq!(
            detail(GenerationErrorKind::EmptyKeywords),
            (400, "no data submitted".to_string())
        );
        assert_eq!(
            detail(GenerationErrorKind::RateLimitExhausted { attempts: 3 }),
            (429, RATE_LIMITED_DETAIL.to_string())
        );
        assert_eq!(
            detail(GenerationErrorKind::Upstream {
                status_code: 404,
                body: "model not found".to_string()
            }),
            (404, "model not found".to_string())
        );
        assert_eq!(
            detail(GenerationErrorKind::Transport("connection reset".to_string())),
            (500, TRANSPORT_DETAIL.to_string())
        );
    }

    #[test]
    fn null_keywords_read_as_empty() {
        let request: KeywordsRequest = serde_json::from_str(r#"{"keywords": null}"#).unwrap();
        assert_eq!(request.keywords(), "");
    }

    #[test]
    fn invalid_body_is_bad_request() {
        let (status, detail) =
            ApiError::InvalidBody("expected a string".to_string()).status_and_detail();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(detail, "expected a string");
    }

    #[test]
    fn out_of_range_upstream_status_becomes_internal_error() {
        let (status, _) = detail(GenerationErrorKind::Upstream {
            status_code: 1000,
            body: String::new(),
        });
        assert_eq!(status, 500);
    }
}
