//! Upstream model integrations for Signbridge.
//!
//! This crate provides the two model capabilities the gateway serves:
//!
//! - **Gemini** - a REST client for `generateContent`, used to turn keywords
//!   into a sentence ([`GeminiClient`], behind the [`GenerationBackend`] seam)
//! - **Classifier** - a pretrained landmark classifier loaded once at startup
//!   ([`LinearClassifier`], behind the [`Classifier`] trait)
//!
//! # Example
//!
//! ```no_run
//! use signbridge_models::{GeminiClient, GeminiConfig, GenerationBackend, GenerationPayload};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeminiClient::new(GeminiConfig::from_env()?)?;
//! let payload = GenerationPayload::user_text("Keyword: tôi, học");
//! let response = client.generate_content(&payload).await?;
//! println!("{:?}", response.first_text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod classifier;
mod gemini;
mod metrics;

pub use backend::GenerationBackend;
pub use classifier::{Classifier, LinearClassifier, Prediction};
pub use gemini::{
    Candidate, CandidateContent, Content, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT,
    GeminiClient, GeminiConfig, GeminiConfigBuilder, GenerateContentResponse, GenerationPayload,
    Part, ResponsePart, UsageMetadata,
};
pub use metrics::UpstreamMetrics;
