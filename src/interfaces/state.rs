use crate::application::use_cases::extract::ExtractUseCase;
use crate::application::use_cases::file_loader::FileLoader;
use crate::domain::llm_config::LLMConfig;
use crate::domain::view_state::ViewState;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::CsvExporter;
use crate::infrastructure::llm_clients::LLMClient;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct AppState {
    pub config: AppConfig,
    pub llm_config: LLMConfig,
    pub file_loader: FileLoader,
    pub extract_use_case: ExtractUseCase,
    pub csv_exporter: CsvExporter,
    view: Mutex<ViewState>,
}

impl AppState {
    pub fn new(config: AppConfig, llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self {
            llm_config: config.llm_config(),
            config,
            file_loader: FileLoader::new(),
            extract_use_case: ExtractUseCase::new(llm_client),
            csv_exporter: CsvExporter::new(),
            view: Mutex::new(ViewState::new()),
        }
    }

    /// The page state. Never hold the guard across an `.await`.
    pub fn view(&self) -> MutexGuard<'_, ViewState> {
        self.view
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
