//! JSON bodies for the Gemini `generateContent` REST endpoint.
//!
//! Request body sent upstream:
//!
//! ```json
//! {"contents": [{"role": "user", "parts": [{"text": "<prompt>"}]}]}
//! ```
//!
//! Success body received (fields we do not use are ignored):
//!
//! ```json
//! {"candidates": [{"content": {"parts": [{"text": "..."}], "role": "model"},
//!                  "finishReason": "STOP"}],
//!  "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 5, "totalTokenCount": 17}}
//! ```

use serde::{Deserialize, Serialize};

//
// ─── REQUEST ────────────────────────────────────────────────────────────────
//

/// Body of one `generateContent` request.
///
/// Built once per inbound call and never mutated; fields are private and only
/// readable through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPayload {
    contents: Vec<Content>,
}

impl GenerationPayload {
    /// A payload with a single user turn holding one text part.
    ///
    /// # Example
    ///
    /// ```
    /// use signbridge_models::GenerationPayload;
    ///
    /// let payload = GenerationPayload::user_text("Keyword: tôi, học");
    /// assert_eq!(payload.contents()[0].role(), "user");
    /// assert_eq!(payload.text(), Some("Keyword: tôi, học"));
    /// ```
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: text.into() }],
            }],
        }
    }

    /// Conversation turns in this payload.
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    /// Text of the first part of the first turn.
    pub fn text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    role: String,
    parts: Vec<Part>,
}

impl Content {
    /// Author of the turn ("user").
    pub fn role(&self) -> &str {
        &self.role
    }

    /// Parts of the turn.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// A text part of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    text: String,
}

impl Part {
    /// Part text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── RESPONSE ───────────────────────────────────────────────────────────────
//

/// Successful `generateContent` response envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Generated response options
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Token accounting, when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text at `candidates[0].content.parts[0].text`, if present.
    ///
    /// # Example
    ///
    /// ```
    /// use signbridge_models::GenerateContentResponse;
    ///
    /// let body = r#"{"candidates":[{"content":{"parts":[{"text":"Tôi đi học."}]}}]}"#;
    /// let response: GenerateContentResponse = serde_json::from_str(body).unwrap();
    /// assert_eq!(response.first_text(), Some("Tôi đi học."));
    /// ```
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// One generated response option.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content (absent when the candidate was blocked)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<CandidateContent>,

    /// Why generation stopped (e.g. "STOP", "SAFETY")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Content of a candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    /// Generated parts
    #[serde(default)]
    pub parts: Vec<ResponsePart>,

    /// Author of the content ("model")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// A generated part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePart {
    /// Generated text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Token usage reported by the API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt
    #[serde(default)]
    pub prompt_token_count: u32,
    /// Tokens across all candidates
    #[serde(default)]
    pub candidates_token_count: u32,
    /// Total tokens billed
    #[serde(default)]
    pub total_token_count: u32,
}
