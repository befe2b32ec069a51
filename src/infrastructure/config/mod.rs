use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL};

pub const CONFIG_FILE_ENV: &str = "WARRANT_EXTRACT_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "warrant-extract.toml";
pub const ENV_PREFIX: &str = "WARRANT_EXTRACT_";
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini rejects inline payloads above 20 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(url)]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[serde(skip_serializing)]
    #[validate(
        required(message = "GEMINI_API_KEY is not set"),
        length(min = 1, message = "GEMINI_API_KEY is empty")
    )]
    pub api_key: Option<String>,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    #[validate(range(min = 1024))]
    pub max_upload_bytes: usize,
    #[validate(range(min = 1, max = 600))]
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            temperature: None,
            max_output_tokens: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            request_timeout_secs: 120,
        }
    }
}

impl AppConfig {
    /// Loads `.env`, then layers defaults, the TOML file and the environment.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_figment(Self::figment())
    }

    /// Defaults < `warrant-extract.toml` < `WARRANT_EXTRACT_*` < `GEMINI_API_KEY`.
    pub fn figment() -> Figment {
        let path =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
            .merge(Env::raw().only(&[API_KEY_ENV]).map(|_| "api_key".into()))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(config)
    }

    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: self.api_key.clone(),
            max_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
