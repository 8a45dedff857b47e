//! Sentence generation errors and retry classification.

/// Error conditions for the keyword-to-sentence pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// No usable keywords were submitted
    #[display("no data submitted")]
    EmptyKeywords,
    /// API key not found in environment
    #[display("API_KEY environment variable not set")]
    MissingApiKey,
    /// The HTTP round trip to the upstream API failed without a status
    #[display("Upstream request failed: {}", _0)]
    Transport(String),
    /// Upstream replied with a non-200 status
    #[display("Upstream HTTP {} error: {}", status_code, body)]
    Upstream {
        /// HTTP status code returned by the upstream API
        status_code: u16,
        /// Raw response body
        body: String,
    },
    /// Every attempt in the retry budget was rate limited
    #[display("Upstream rate limit still exceeded after {} attempts", attempts)]
    RateLimitExhausted {
        /// Number of attempts performed
        attempts: u32,
    },
    /// Upstream replied 200 but the generated text could not be extracted
    #[display("Unexpected upstream response shape: {}", _0)]
    ResponseShape(String),
    /// Retry policy parameters are out of range
    #[display("Invalid retry policy: {}", _0)]
    InvalidRetryPolicy(String),
    /// Upstream endpoint URL could not be built
    #[display("Invalid upstream endpoint: {}", _0)]
    InvalidEndpoint(String),
}

impl GenerationErrorKind {
    /// Check if this error should be retried.
    ///
    /// Only an upstream 429 is transient. Every other status is treated as
    /// permanent, as are transport and parsing failures.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationErrorKind::Upstream { status_code: 429, .. })
    }

    /// HTTP status the gateway surfaces for this error.
    ///
    /// Upstream failures pass the upstream status through unchanged.
    pub fn status_code(&self) -> u16 {
        match self {
            GenerationErrorKind::EmptyKeywords => 400,
            GenerationErrorKind::RateLimitExhausted { .. } => 429,
            GenerationErrorKind::Upstream { status_code, .. } => *status_code,
            GenerationErrorKind::Transport(_)
            | GenerationErrorKind::ResponseShape(_)
            | GenerationErrorKind::MissingApiKey
            | GenerationErrorKind::InvalidRetryPolicy(_)
            | GenerationErrorKind::InvalidEndpoint(_) => 500,
        }
    }
}

/// Generation error with source location tracking.
///
/// # Examples
///
/// ```
/// use signbridge_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::MissingApiKey);
/// assert!(format!("{}", err).contains("API_KEY"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The kind of error that occurred
    pub kind: GenerationErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}

impl From<GenerationErrorKind> for GenerationError {
    #[track_caller]
    fn from(kind: GenerationErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use signbridge_error::{GenerationError, GenerationErrorKind, RetryableError};
///
/// let limited = GenerationError::new(GenerationErrorKind::Upstream {
///     status_code: 429,
///     body: "Resource has been exhausted".to_string(),
/// });
/// assert!(limited.is_retryable());
///
/// let unavailable = GenerationError::new(GenerationErrorKind::Upstream {
///     status_code: 503,
///     body: "Service unavailable".to_string(),
/// });
/// assert!(!unavailable.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger another attempt.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for GenerationError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
