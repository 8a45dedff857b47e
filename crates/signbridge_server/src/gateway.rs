//! Keyword parsing, prompt rendering and the sentence generation pipeline.

use signbridge_error::{GenerationError, GenerationErrorKind};
use signbridge_models::{GenerationBackend, GenerationPayload};
use signbridge_rate_limit::{RetryController, Sleeper, TokioSleeper};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Fixed instruction placed before the keywords in every prompt.
pub const INSTRUCTION: &str = "Bạn là một con bot hỗ trợ đưa ra câu văn dựa trên các keyword mà người dùng truyền vào.\n\
1. Hãy dựa vào những keyword này để đưa ra câu hoàn chỉnh.\n\
2. Không được phép lan man và chỉ được đưa ra câu trả lời thôi.\n\
3. Ví dụ người dùng đưa ra là: tôi, học, trường, xe thì câu trả lời chỉ được phép đưa ra là: Tôi đi học đến trường bằng xe đạp. Chỉ có vậy thôi.\n";

const KEYWORD_SEPARATOR: &str = ", ";

/// Ordered keywords recognized from signs.
///
/// Entries are kept verbatim: splitting happens only on `", "` and no entry
/// is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    /// Split raw input on `", "`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyKeywords` when the input is empty, whitespace only, or
    /// every entry is blank.
    ///
    /// # Example
    ///
    /// ```
    /// use signbridge_server::KeywordList;
    ///
    /// let keywords = KeywordList::parse("tôi, học, trường, xe").unwrap();
    /// assert_eq!(keywords.entries(), ["tôi", "học", "trường", "xe"]);
    /// assert!(KeywordList::parse("   ").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, GenerationError> {
        let entries: Vec<String> = raw.split(KEYWORD_SEPARATOR).map(str::to_string).collect();
        if entries.iter().all(|entry| entry.trim().is_empty()) {
            return Err(GenerationError::new(GenerationErrorKind::EmptyKeywords));
        }
        Ok(Self(entries))
    }

    /// Keywords in input order.
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    /// Keywords re-joined with `", "`.
    pub fn render(&self) -> String {
        self.0.join(KEYWORD_SEPARATOR)
    }
}

/// Full prompt for a keyword list: instruction, then `"Keyword: "`, then the keywords.
pub fn render_prompt(keywords: &KeywordList) -> String {
    format!("{}Keyword: {}", INSTRUCTION, keywords.render())
}

/// Turns raw keyword input into one generated sentence.
///
/// Stateless between requests; share it behind an `Arc`.
pub struct SentenceGateway<S = TokioSleeper> {
    backend: Arc<dyn GenerationBackend>,
    controller: RetryController<S>,
}

impl<S: Sleeper> SentenceGateway<S> {
    /// Create a gateway over `backend`, retrying rate limits with `controller`.
    pub fn new(backend: Arc<dyn GenerationBackend>, controller: RetryController<S>) -> Self {
        Self {
            backend,
            controller,
        }
    }

    /// Get the retry controller.
    pub fn controller(&self) -> &RetryController<S> {
        &self.controller
    }

    /// Parse, prompt, call upstream with retry, and extract the reply text.
    ///
    /// Invalid input is rejected before any upstream call is made.
    ///
    /// # Errors
    ///
    /// - `EmptyKeywords` for blank input
    /// - `RateLimitExhausted` when every attempt was rate limited
    /// - `Upstream` / `Transport` for failures of the upstream call
    /// - `ResponseShape` when the reply has no text at
    ///   `candidates[0].content.parts[0].text`
    #[instrument(skip(self, raw), fields(model = %self.backend.model_name()))]
    pub async fn handle(&self, raw: &str) -> Result<String, GenerationError> {
        info!(keywords = %raw, "Received keywords");
        let keywords = KeywordList::parse(raw)?;

        let payload = GenerationPayload::user_text(render_prompt(&keywords));
        let backend = self.backend.as_ref();
        let payload_ref = &payload;
        let response = self
            .controller
            .send_with_retry(move || backend.generate_content(payload_ref))
            .await?;

        let text = response.first_text().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::ResponseShape(
                "missing candidates[0].content.parts[0].text".to_string(),
            ))
        })?;
        debug!(chars = text.chars().count(), "Generated sentence");
        Ok(text.to_string())
    }
}

impl<S> std::fmt::Debug for SentenceGateway<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentenceGateway")
            .field("model", &self.backend.model_name())
            .finish_non_exhaustive()
    }
}
