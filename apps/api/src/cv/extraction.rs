//! CV extraction — document bytes to a structured `CvAnalysis`.

use async_trait::async_trait;
use tracing::info;

use crate::cv::prompts::{CV_EXTRACT_PROMPT, CV_EXTRACT_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::candidate::CvAnalysis;

const PDF_MAGIC: &[u8] = b"%PDF";

#[async_trait]
pub trait CvExtractor: Send + Sync {
    async fn extract(&self, document: &[u8]) -> Result<CvAnalysis, AppError>;
}

/// Production extractor: local text extraction followed by one JSON-mode LLM call.
pub struct LlmCvExtractor {
    llm: LlmClient,
    max_chars: usize,
}

impl LlmCvExtractor {
    pub fn new(llm: LlmClient, max_chars: usize) -> Self {
        Self { llm, max_chars }
    }
}

#[async_trait]
impl CvExtractor for LlmCvExtractor {
    async fn extract(&self, document: &[u8]) -> Result<CvAnalysis, AppError> {
        // PDF parsing is CPU-bound and may panic on malformed input
        let owned = document.to_vec();
        let text = tokio::task::spawn_blocking(move || document_text(&owned))
            .await
            .map_err(|e| AppError::Extraction(format!("Text extraction task failed: {e}")))??;

        let text = truncate_chars(&text, self.max_chars);
        info!("Extracting CV profile from {} chars of text", text.chars().count());

        let prompt = CV_EXTRACT_PROMPT.replace("{cv_text}", text);
        let system = format!("{CV_EXTRACT_SYSTEM} {JSON_ONLY_SYSTEM}");
        self.llm
            .call_json::<CvAnalysis>(&prompt, &system)
            .await
            .map_err(|e| AppError::Extraction(format!("CV analysis failed: {e}")))
    }
}

/// Returns the plain text of a CV: parsed for PDFs, lossy UTF-8 otherwise.
pub fn document_text(document: &[u8]) -> Result<String, AppError> {
    let text = if document.starts_with(PDF_MAGIC) {
        pdf_extract::extract_text_from_mem(document)
            .map_err(|e| AppError::Extraction(format!("Unreadable PDF: {e}")))?
    } else {
        String::from_utf8_lossy(document).into_owned()
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(AppError::Extraction(
            "The document contains no extractable text".to_string(),
        ));
    }
    Ok(text.to_string())
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
