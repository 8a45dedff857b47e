//! Connection settings for the Gemini REST API.

use derive_getters::Getters;
use reqwest::Url;
use signbridge_error::{GenerationError, GenerationErrorKind};
use std::time::Duration;

/// Default model used for sentence generation.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default bound on one upstream round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Immutable Gemini connection settings, built once at startup.
///
/// The API key is a secret: it is excluded from `Debug` output and has no
/// public getter. It only leaves this struct inside [`GeminiConfig::endpoint`].
///
/// # Example
///
/// ```
/// use signbridge_models::GeminiConfigBuilder;
///
/// let config = GeminiConfigBuilder::default()
///     .api_key("secret")
///     .model("gemini-1.5-flash")
///     .build()
///     .unwrap();
/// assert!(!format!("{:?}", config).contains("secret"));
/// ```
#[derive(Clone, Getters, derive_builder::Builder)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct GeminiConfig {
    /// API key embedded in the endpoint query string
    #[getter(skip)]
    api_key: String,
    /// Model name (without the `models/` prefix)
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    model: String,
    /// API root URL
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Bound on one upstream round trip
    #[builder(default = "DEFAULT_TIMEOUT")]
    timeout: Duration,
}

impl GeminiConfigBuilder {
    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if no key was supplied, or `InvalidEndpoint`
    /// if the base URL and model do not form a valid URL.
    pub fn build(&self) -> Result<GeminiConfig, GenerationError> {
        let config = self
            .build_internal()
            .map_err(|_| GenerationError::new(GenerationErrorKind::MissingApiKey))?;
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::MissingApiKey));
        }
        config.endpoint()?;
        Ok(config)
    }
}

impl GeminiConfig {
    /// Read the API key from the environment, using defaults for everything else.
    ///
    /// Reads `API_KEY`, falling back to `GEMINI_API_KEY`. Call
    /// `dotenvy::dotenv()` beforehand to pick up a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if neither variable is set to a non-empty value.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::builder_from_env()?.build()
    }

    /// A builder pre-populated with the API key from the environment.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` if neither variable is set to a non-empty value.
    pub fn builder_from_env() -> Result<GeminiConfigBuilder, GenerationError> {
        let api_key = API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey))?;

        let mut builder = GeminiConfigBuilder::default();
        builder.api_key(api_key);
        Ok(builder)
    }

    /// Full `generateContent` URL including the `key` query parameter.
    ///
    /// Never log the returned value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEndpoint` if the base URL cannot be parsed.
    pub fn endpoint(&self) -> Result<Url, GenerationError> {
        let raw = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let mut url = Url::parse(&raw).map_err(|e| {
            GenerationError::new(GenerationErrorKind::InvalidEndpoint(format!(
                "{}: {}",
                self.base_url, e
            )))
        })?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
