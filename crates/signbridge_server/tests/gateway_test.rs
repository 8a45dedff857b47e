//! Tests for the keyword-to-sentence pipeline with a scripted backend.

use async_trait::async_trait;
use serde_json::json;
use signbridge_error::{GenerationError, GenerationErrorKind};
use signbridge_models::{GenerateContentResponse, GenerationBackend, GenerationPayload};
use signbridge_rate_limit::{RetryController, RetryPolicy, Sleeper};
use signbridge_server::{INSTRUCTION, KeywordList, SentenceGateway, render_prompt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
struct RecordingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.waits.lock().unwrap().push(duration);
    }
}

/// Backend that replays scripted replies and records every payload it receives.
#[derive(Default)]
struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<GenerateContentResponse, GenerationError>>>,
    payloads: Mutex<Vec<GenerationPayload>>,
}

impl ScriptedBackend {
    fn new(replies: Vec<Result<GenerateContentResponse, GenerationError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            payloads: Mutex::default(),
        })
    }

    fn payloads(&self) -> Vec<GenerationPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for ScriptedBackend {
    async fn generate_content(
        &self,
        payload: &GenerationPayload,
    ) -> Result<GenerateContentResponse, GenerationError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(GenerationError::new(GenerationErrorKind::Upstream {
                status_code: 599,
                body: "script exhausted".to_string(),
            }))
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn reply(text: &str) -> Result<GenerateContentResponse, GenerationError> {
    Ok(serde_json::from_value(json!({
        "candidates": [{"content": {"parts": [{"text": text}]}}]
    }))
    .unwrap())
}

fn rate_limited() -> Result<GenerateContentResponse, GenerationError> {
    Err(GenerationError::new(GenerationErrorKind::Upstream {
        status_code: 429,
        body: "quota".to_string(),
    }))
}

fn gateway(
    backend: Arc<ScriptedBackend>,
    max_retries: u32,
) -> (SentenceGateway<RecordingSleeper>, RecordingSleeper) {
    let sleeper = RecordingSleeper::default();
    let policy = RetryPolicy::new(max_retries, 1.5).unwrap();
    let gateway = SentenceGateway::new(
        backend,
        RetryController::with_sleeper(policy, sleeper.clone()),
    );
    (gateway, sleeper)
}

#[tokio::test]
async fn test_vietnamese_keywords_produce_expected_prompt() -> anyhow::Result<()> {
    let backend = ScriptedBackend::new(vec![reply("Tôi đi học đến trường bằng xe đạp.")]);
    let (gateway, _) = gateway(Arc::clone(&backend), 3);

    let message = gateway.handle("tôi, học, trường, xe").await?;

    assert_eq!(message, "Tôi đi học đến trường bằng xe đạp.");
    let payloads = backend.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].contents()[0].role(), "user");
    assert_eq!(
        payloads[0].text(),
        Some(format!("{}Keyword: tôi, học, trường, xe", INSTRUCTION).as_str())
    );
    Ok(())
}

#[test]
fn test_prompt_is_deterministic() -> anyhow::Result<()> {
    let keywords = KeywordList::parse("tôi, học, trường, xe")?;
    assert_eq!(keywords.entries(), ["tôi", "học", "trường", "xe"]);
    assert_eq!(keywords.render(), "tôi, học, trường, xe");
    assert_eq!(render_prompt(&keywords), render_prompt(&keywords.clone()));
    assert!(INSTRUCTION.ends_with("Chỉ có vậy thôi.\n"));
    Ok(())
}

#[tokio::test]
async fn test_blank_input_never_reaches_backend() {
    let backend = ScriptedBackend::new(vec![reply("unused")]);
    let (gateway, _) = gateway(Arc::clone(&backend), 3);

    for raw in ["", "   ", "\n\t"] {
        let err = gateway.handle(raw).await.unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::EmptyKeywords);
    }
    assert!(backend.payloads().is_empty());
}

#[tokio::test]
async fn test_rate_limited_twice_then_success() -> anyhow::Result<()> {
    let backend = ScriptedBackend::new(vec![rate_limited(), rate_limited(), reply("Tôi đi học.")]);
    let (gateway, sleeper) = gateway(Arc::clone(&backend), 3);

    let message = gateway.handle("tôi, học").await?;

    assert_eq!(message, "Tôi đi học.");
    assert_eq!(backend.payloads().len(), 3);
    assert_eq!(
        *sleeper.waits.lock().unwrap(),
        vec![Duration::from_millis(1000), Duration::from_millis(1500)]
    );
    Ok(())
}

#[tokio::test]
async fn test_every_attempt_rate_limited() {
    let backend = ScriptedBackend::new(vec![rate_limited(), rate_limited(), rate_limited()]);
    let (gateway, _) = gateway(Arc::clone(&backend), 3);

    let err = gateway.handle("xe").await.unwrap_err();

    assert_eq!(
        err.kind,
        GenerationErrorKind::RateLimitExhausted { attempts: 3 }
    );
    assert_eq!(backend.payloads().len(), 3);
}

#[tokio::test]
async fn test_missing_text_is_response_shape_error() {
    let backend = ScriptedBackend::new(vec![Ok(GenerateContentResponse::default())]);
    let (gateway, sleeper) = gateway(Arc::clone(&backend), 3);

    let err = gateway.handle("xe").await.unwrap_err();

    assert!(matches!(err.kind, GenerationErrorKind::ResponseShape(_)));
    assert_eq!(backend.payloads().len(), 1);
    assert!(sleeper.waits.lock().unwrap().is_empty());
}
