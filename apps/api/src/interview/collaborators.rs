//! Model capabilities consumed by the interview engine.
//!
//! The engine depends only on these traits. `LlmClient` is the production
//! implementation of all three; tests use the deterministic fakes in `testing`.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;
use crate::llm_client::{ChatMessage, LlmClient};
use crate::models::interview::Turn;

/// Produces the interviewer's next reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, system: &str, transcript: &[Turn]) -> Result<String, AppError>;
}

/// Produces a JSON document as raw text. Parsing and validation belong to the caller.
#[async_trait]
pub trait StructuredGenerator: Send + Sync {
    async fn generate_structured(&self, system: &str, prompt: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Bytes, AppError>;
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, system: &str, transcript: &[Turn]) -> Result<String, AppError> {
        let messages: Vec<ChatMessage<'_>> = transcript
            .iter()
            .map(|t| ChatMessage::new(t.role.as_str(), &t.content))
            .collect();

        let response = self
            .chat(system, &messages, false)
            .await
            .map_err(|e| AppError::Generation(format!("Interview reply failed: {e}")))?;

        response
            .text()
            .map(|t| t.trim().to_string())
            .ok_or_else(|| AppError::Generation("Model returned an empty reply".to_string()))
    }
}

#[async_trait]
impl StructuredGenerator for LlmClient {
    async fn generate_structured(&self, system: &str, prompt: &str) -> Result<String, AppError> {
        self.call_json_text(prompt, system)
            .await
            .map_err(|e| AppError::Generation(format!("Structured generation failed: {e}")))
    }
}

#[async_trait]
impl SpeechSynthesizer for LlmClient {
    async fn synthesize(&self, text: &str) -> Result<Bytes, AppError> {
        self.speech(text)
            .await
            .map_err(|e| AppError::SpeechSynthesis(e.to_string()))
    }
}
