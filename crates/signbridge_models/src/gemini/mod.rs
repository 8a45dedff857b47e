//! Gemini `generateContent` REST integration.

mod client;
mod config;
mod wire;

pub use client::GeminiClient;
pub use config::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, GeminiConfig, GeminiConfigBuilder};
pub use wire::{
    Candidate, CandidateContent, Content, GenerateContentResponse, GenerationPayload, Part,
    ResponsePart, UsageMetadata,
};
