use super::{DocumentPrompt, LLMClient};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeminiPart<'a> {
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(rename = "maxOutputTokens", skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
    #[serde(rename = "responseSchema")]
    response_schema: &'a Value,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    fn endpoint(config: &LLMConfig) -> Result<Url> {
        let base_url = config.base_url.trim_end_matches('/');
        let model_id = config.model.trim().trim_start_matches("models/");
        Url::parse(&format!("{}/{}:generateContent", base_url, model_id))
            .map_err(|e| AppError::LLMError(format!("Invalid model endpoint: {}", e)))
    }

    fn api_key(config: &LLMConfig) -> Result<&str> {
        config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::LLMError("Missing API key for Google provider".to_string()))
    }

    fn build_request<'a>(config: &LLMConfig, prompt: &DocumentPrompt<'a>) -> GeminiRequest<'a> {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::InlineData {
                        inline_data: InlineData {
                            mime_type: prompt.mime_type,
                            data: prompt.base64_data,
                        },
                    },
                    GeminiPart::Text {
                        text: prompt.instruction,
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: config.temperature.map(f64::from),
                max_output_tokens: config.max_tokens,
                response_mime_type: "application/json",
                response_schema: prompt.response_schema,
            },
        }
    }

    fn response_text(response: GeminiResponse) -> Result<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(AppError::LLMError(format!("Prompt blocked: {}", reason))),
            None => Err(AppError::LLMError("Invalid response format".to_string())),
        }
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(&self, config: &LLMConfig, prompt: &DocumentPrompt<'_>) -> Result<String> {
        let api_key = Self::api_key(config)?;
        let url = Self::endpoint(config)?;
        let body = Self::build_request(config, prompt);

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        Self::response_text(json)
    }
}
