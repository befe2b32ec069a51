use crate::domain::error::Result;
use crate::domain::export_record::{map_to_export_record, ExportRecord};
use crate::domain::extraction::{RawExtraction, EXTRACTION_INSTRUCTION};
use crate::domain::llm_config::LLMConfig;
use crate::domain::upload::LoadedFile;
use crate::infrastructure::llm_clients::{DocumentPrompt, LLMClient};
use crate::infrastructure::response::clean_json_response;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

/// Shown to the user for every extraction failure.
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "정보 추출에 실패했습니다. 파일이 선명한지 확인한 후 다시 시도해 주세요.";

static RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(RawExtraction::response_schema);

pub struct ExtractUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ExtractUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// One model call for one document. Any failure discards the whole answer.
    pub async fn extract(
        &self,
        config: &LLMConfig,
        base64_payload: &str,
        mime_type: &str,
    ) -> Result<RawExtraction> {
        let prompt = DocumentPrompt {
            instruction: EXTRACTION_INSTRUCTION,
            mime_type,
            base64_data: base64_payload,
            response_schema: &RESPONSE_SCHEMA,
        };

        let raw_result = self.llm_client.generate(config, &prompt).await?;

        RawExtraction::from_model_text(&clean_json_response(&raw_result))
    }

    pub async fn execute(&self, config: &LLMConfig, file: &LoadedFile) -> Result<ExportRecord> {
        let raw = self
            .extract(config, &file.base64_payload, &file.mime_type)
            .await?;

        Ok(map_to_export_record(&raw))
    }
}
