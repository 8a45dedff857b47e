//! Seam between the gateway and the sentence generation API.

use crate::{GenerateContentResponse, GeminiClient, GenerationPayload};
use async_trait::async_trait;
use signbridge_error::GenerationError;

/// Something that performs one `generateContent` round trip.
///
/// Implementations make exactly one attempt per call. Retrying is the
/// caller's job, so a 429 must come back as
/// `GenerationErrorKind::Upstream { status_code: 429, .. }`.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Send `payload` and return the parsed success body.
    ///
    /// # Errors
    ///
    /// - `Upstream` for any status other than 200, carrying the raw body
    /// - `Transport` when no status was received
    /// - `ResponseShape` when a 200 body is not valid JSON
    async fn generate_content(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerateContentResponse, GenerationError>;

    /// Model name used for logging and metric labels.
    fn model_name(&self) -> &str;
}

#[async_trait]
impl GenerationBackend for GeminiClient {
    async fn generate_content(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerateContentResponse, GenerationError> {
        self.call(payload).await
    }

    fn model_name(&self) -> &str {
        self.config().model()
    }
}
