//! Deterministic test doubles for every external collaborator.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::cv::extraction::CvExtractor;
use crate::cv::storage::CvStorage;
use crate::errors::AppError;
use crate::interview::collaborators::{SpeechSynthesizer, StructuredGenerator, TextGenerator};
use crate::models::candidate::CvAnalysis;
use crate::models::interview::Turn;

pub struct FakeTextGenerator {
    reply: Option<String>,
    calls: AtomicUsize,
    last_system: Mutex<Option<String>>,
    last_transcript_len: AtomicUsize,
}

impl FakeTextGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
            last_system: Mutex::new(None),
            last_transcript_len: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_system(&self) -> Option<String> {
        self.last_system.lock().unwrap().clone()
    }

    pub fn last_transcript_len(&self) -> usize {
        self.last_transcript_len.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeTextGenerator {
    async fn generate(&self, system: &str, transcript: &[Turn]) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_system.lock().unwrap() = Some(system.to_string());
        self.last_transcript_len
            .store(transcript.len(), Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| AppError::Generation("rate limited".to_string()))
    }
}

pub struct FakeStructuredGenerator {
    reply: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl FakeStructuredGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    /// A well-formed report: technical 8, soft skills 6.
    pub fn valid() -> Self {
        Self::replying(
            r#"{
                "technical": [{"category": "Python", "score": 8, "notes": "Strong"}],
                "softSkills": [{"category": "Communication", "score": 6, "notes": "Fine"}],
                "overall": "Recommended for the next round."
            }"#,
        )
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            ..Self::replying("")
        }
    }

    /// Delays every reply, so concurrent callers overlap inside the call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl StructuredGenerator for FakeStructuredGenerator {
    async fn generate_structured(&self, _system: &str, prompt: &str) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.reply
            .clone()
            .ok_or_else(|| AppError::Generation("upstream timeout".to_string()))
    }
}

pub struct FakeSpeech {
    fail: bool,
    calls: AtomicUsize,
}

impl FakeSpeech {
    pub fn working() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeSpeech {
    async fn synthesize(&self, text: &str) -> Result<Bytes, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(AppError::SpeechSynthesis("voice unavailable".to_string()));
        }
        Ok(Bytes::from(format!("audio:{text}")))
    }
}

pub struct FakeCvExtractor {
    analysis: Option<CvAnalysis>,
}

impl FakeCvExtractor {
    pub fn returning(analysis: CvAnalysis) -> Self {
        Self {
            analysis: Some(analysis),
        }
    }

    pub fn failing() -> Self {
        Self { analysis: None }
    }
}

#[async_trait]
impl CvExtractor for FakeCvExtractor {
    async fn extract(&self, _document: &[u8]) -> Result<CvAnalysis, AppError> {
        self.analysis
            .clone()
            .ok_or_else(|| AppError::Extraction("document has no text".to_string()))
    }
}

#[derive(Default)]
pub struct MemoryCvStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryCvStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl CvStorage for MemoryCvStorage {
    async fn put_cv(
        &self,
        key: &str,
        document: Bytes,
        _content_type: &str,
    ) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), document.to_vec());
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        Ok(format!(
            "memory://{key}?expires_in={}",
            expires_in.as_secs()
        ))
    }
}
