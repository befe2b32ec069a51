pub mod error;
pub mod export_record;
pub mod extraction;
pub mod llm_config;
pub mod upload;
pub mod view_state;
