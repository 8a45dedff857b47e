use crate::{GeminiConfig, GenerateContentResponse, GenerationPayload, UpstreamMetrics};
use reqwest::{StatusCode, Url};
use signbridge_error::{GenerationError, GenerationErrorKind};
use std::time::Instant;
use tracing::instrument;

/// Client for the Gemini `generateContent` endpoint.
///
/// Each [`call`](GeminiClient::call) is a single POST. The client is cheap to
/// clone and safe to share across concurrent requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    endpoint: Url,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client from validated settings.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the endpoint URL cannot be built, or
    /// `Transport` if the HTTP client cannot be initialized.
    #[instrument(skip(config), fields(model = %config.model(), base_url = %config.base_url()))]
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        tracing::debug!("Creating Gemini client");
        let endpoint = config.endpoint()?;
        let client = reqwest::Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Transport(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;

        Ok(Self {
            config,
            endpoint,
            client,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Perform one `generateContent` round trip.
    ///
    /// Only status 200 counts as success. Any other status is returned as
    /// `Upstream` with the raw body so callers can pass it through.
    #[instrument(skip(self, payload), fields(model = %self.config.model()))]
    pub async fn call(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerateContentResponse, GenerationError> {
        let metrics = UpstreamMetrics::get();
        let model = self.config.model().as_str();
        let start = Instant::now();

        let result = self.round_trip(payload).await;

        metrics.record_request(model, start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(usage) = response.usage_metadata {
                    metrics.record_tokens(model, usage.total_token_count);
                }
            }
            Err(e) => metrics.record_error(model, e.kind()),
        }
        result
    }

    async fn round_trip(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerateContentResponse, GenerationError> {
        // The endpoint carries the API key; reqwest errors must be stripped of it.
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!(error = %e, "Upstream request failed");
                GenerationError::new(GenerationErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!(error = %e, "Failed to read upstream body");
            GenerationError::new(GenerationErrorKind::Transport(e.to_string()))
        })?;

        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Upstream returned error status");
            return Err(GenerationError::new(GenerationErrorKind::Upstream {
                status_code: status.as_u16(),
                body,
            }));
        }

        let parsed = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to parse upstream response");
            GenerationError::new(GenerationErrorKind::ResponseShape(format!(
                "invalid JSON body: {}",
                e
            )))
        })?;

        tracing::debug!("Upstream call succeeded");
        Ok(parsed)
    }
}
