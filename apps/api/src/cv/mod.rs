// CV handling: text extraction + LLM profile extraction, and document storage.

pub mod extraction;
pub mod prompts;
pub mod storage;
