use std::sync::{Arc, Mutex};

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::llm_clients::GeminiClient;
use crate::interfaces::http::{add_log, start_server, LogEntry};
use crate::interfaces::state::AppState;

pub async fn run() -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = AppConfig::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string())
    })?;

    info!(
        host = %config.host,
        port = config.port,
        model = %config.model,
        max_upload_bytes = config.max_upload_bytes,
        "Configuration loaded"
    );

    let logs: Arc<Mutex<Vec<LogEntry>>> = Arc::new(Mutex::new(Vec::new()));
    let llm_client = Arc::new(GeminiClient::new(config.request_timeout()));
    let address = format!("http://{}:{}", config.host, config.port);
    let app_state = Arc::new(AppState::new(config, llm_client));

    let server = start_server(app_state, logs.clone()).map_err(|err| {
        error!(error = %err, address = %address, "Failed to bind HTTP server");
        err
    })?;

    add_log(&logs, "INFO", "Server", &format!("Listening on {}", address));
    server.await
}
