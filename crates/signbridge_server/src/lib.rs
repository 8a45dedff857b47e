//! HTTP gateway that turns sign-language keywords into full sentences.
//!
//! Routes:
//!
//! - `POST /gpt/send-final` - keywords in, generated sentence out, with
//!   rate-limit aware retry against the Gemini API
//! - `POST /predict` - run the landmark classifier on one feature vector
//! - `GET /health` - liveness probe
//!
//! # Example
//!
//! ```no_run
//! use signbridge_rate_limit::RetryController;
//! use signbridge_server::{AppState, GatewayConfig, SentenceGateway, create_router, gemini_backend};
//! use signbridge_models::LinearClassifier;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GatewayConfig::load()?;
//! let backend = gemini_backend(config.upstream())?;
//! let gateway = SentenceGateway::new(Arc::new(backend), RetryController::new(*config.retry()));
//! let classifier = LinearClassifier::from_file(config.server().model_path())?;
//!
//! let app = create_router(
//!     AppState::new(Arc::new(gateway), Arc::new(classifier)),
//!     config.server().cors_origins(),
//! );
//! let listener = tokio::net::TcpListener::bind(config.server().bind_address()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod gateway;
mod observability;
mod predict;

pub use api::{ApiError, AppState, KeywordsRequest, MessageResponse, create_router};
pub use config::{GatewayConfig, ServerSettings, UpstreamSettings};
pub use gateway::{INSTRUCTION, KeywordList, SentenceGateway, render_prompt};
pub use observability::{ObservabilityConfig, init_observability, shutdown_observability};
pub use predict::{LandmarkInput, PredictOutcome};

use signbridge_error::GenerationError;
use signbridge_models::{GeminiClient, GeminiConfig};

/// Build the Gemini client from upstream settings and the API key in the
/// environment.
///
/// # Errors
///
/// Returns `MissingApiKey` when neither `API_KEY` nor `GEMINI_API_KEY` is
/// set, or `InvalidEndpoint` when the settings do not form a valid URL.
pub fn gemini_backend(upstream: &UpstreamSettings) -> Result<GeminiClient, GenerationError> {
    let config = GeminiConfig::builder_from_env()?
        .model(upstream.model().as_str())
        .base_url(upstream.base_url().as_str())
        .timeout(upstream.timeout())
        .build()?;
    GeminiClient::new(config)
}
