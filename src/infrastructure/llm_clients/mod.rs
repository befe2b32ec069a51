pub mod gemini;

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde_json::Value;

pub use gemini::GeminiClient;

/// One document plus the instruction and schema the answer must follow.
#[derive(Debug, Clone, Copy)]
pub struct DocumentPrompt<'a> {
    pub instruction: &'a str,
    pub mime_type: &'a str,
    pub base64_data: &'a str,
    pub response_schema: &'a Value,
}

#[async_trait]
pub trait LLMClient {
    /// Returns the raw text of the model's answer.
    async fn generate(&self, config: &LLMConfig, prompt: &DocumentPrompt<'_>) -> Result<String>;
}
