pub mod view;

use crate::application::use_cases::extract::EXTRACTION_FAILED_MESSAGE;
use crate::application::use_cases::file_loader::FILE_READ_FAILED_MESSAGE;
use crate::domain::export_record::ExportRecord;
use crate::domain::upload::{LoadedFile, UploadedFile};
use crate::domain::view_state::ExtractionRejection;
use crate::infrastructure::csv::CsvExport;
use crate::interfaces::state::AppState;
use actix_cors::Cors;
use actix_web::http::header::{
    self, Charset, ContentDisposition, DispositionParam, DispositionType, ExtendedValue,
};
use actix_web::{
    dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpResponseBuilder, HttpServer,
    Responder,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub app_state: Arc<AppState>,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[get("/")]
async fn index(data: web::Data<HttpState>) -> impl Responder {
    let html = view::render_page(&data.app_state.view());
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

#[post("/upload")]
async fn upload(
    data: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    payload: web::Payload,
) -> impl Responder {
    if data.app_state.view().is_loading() {
        return HttpResponse::Conflict().body("Extraction already in progress");
    }

    let limit = data.app_state.config.max_upload_bytes;
    let body = match payload.to_bytes_limited(limit).await {
        Ok(Ok(body)) => body,
        Ok(Err(e)) => {
            return reject_upload(
                &data,
                HttpResponse::BadRequest(),
                format!("Failed to read upload: {}", e),
            );
        }
        Err(_) => {
            return reject_upload(
                &data,
                HttpResponse::PayloadTooLarge(),
                format!("Upload exceeds {} bytes", limit),
            );
        }
    };

    let file = uploaded_file(&req, &query, body);
    add_log(
        &data.logs,
        "INFO",
        "Upload",
        &format!(
            "Received {} ({}, {} bytes)",
            file.file_name,
            file.mime_type,
            file.content.len()
        ),
    );

    match data.app_state.file_loader.load(file).await {
        Ok(loaded) => {
            let summary = HttpResponse::Ok().json(&loaded);
            match data.app_state.view().select_file(loaded) {
                Ok(()) => summary,
                Err(_) => HttpResponse::Conflict().body("Extraction already in progress"),
            }
        }
        Err(e) => reject_upload(
            &data,
            HttpResponse::BadRequest(),
            format!("Failed to load file: {}", e),
        ),
    }
}

/// Log the failure and clear the selection so nothing stale gets extracted.
fn reject_upload(
    data: &web::Data<HttpState>,
    mut response: HttpResponseBuilder,
    detail: String,
) -> HttpResponse {
    add_log(&data.logs, "ERROR", "Upload", &detail);
    match data
        .app_state
        .view()
        .fail_selection(FILE_READ_FAILED_MESSAGE.to_string())
    {
        Ok(()) => response.body(detail),
        Err(_) => HttpResponse::Conflict().body("Extraction already in progress"),
    }
}

#[post("/extract")]
async fn extract(data: web::Data<HttpState>) -> impl Responder {
    let file = match data.app_state.view().begin_extraction() {
        Ok(file) => file,
        Err(ExtractionRejection::NoFile) => {
            return HttpResponse::BadRequest().body("No file selected");
        }
        Err(ExtractionRejection::AlreadyRunning) => {
            return HttpResponse::Conflict().body("Extraction already in progress");
        }
    };

    let outcome = run_extraction(&data, &file).await;
    data.app_state.view().finish_extraction(outcome);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

#[get("/export.csv")]
async fn export_current(data: web::Data<HttpState>) -> impl Responder {
    let record = data.app_state.view().record().cloned();
    match record {
        Some(record) => export_response(&data, &record),
        None => HttpResponse::NotFound().body("Nothing to export"),
    }
}

#[post("/extract")]
async fn api_extract(
    data: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let file = uploaded_file(&req, &query, body);
    let loaded = match data.app_state.file_loader.load(file).await {
        Ok(loaded) => loaded,
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "HttpApi",
                &format!("Failed to load file: {}", e),
            );
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };

    match run_extraction(&data, &loaded).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(message) => HttpResponse::BadGateway().json(ErrorBody { error: &message }),
    }
}

#[post("/export")]
async fn api_export(data: web::Data<HttpState>, record: web::Json<ExportRecord>) -> impl Responder {
    export_response(&data, &record)
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = data
        .logs
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    HttpResponse::Ok().json(&*logs)
}

fn uploaded_file(req: &HttpRequest, query: &UploadQuery, body: web::Bytes) -> UploadedFile {
    let mime_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let file_name = query
        .name
        .clone()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "upload".to_string());

    UploadedFile::new(file_name, mime_type, body.to_vec())
}

/// Every failure collapses into the single user-facing message; details
/// only go to the log.
async fn run_extraction(
    data: &web::Data<HttpState>,
    file: &LoadedFile,
) -> std::result::Result<ExportRecord, String> {
    add_log(
        &data.logs,
        "INFO",
        "Extract",
        &format!(
            "Extracting {} ({}, model={})",
            file.file_name, file.mime_type, data.app_state.llm_config.model
        ),
    );

    match data
        .app_state
        .extract_use_case
        .execute(&data.app_state.llm_config, file)
        .await
    {
        Ok(record) => {
            add_log(
                &data.logs,
                "INFO",
                "Extract",
                &format!(
                    "Extraction succeeded for {} (warrant number: {:?})",
                    file.file_name, record.warrant_number
                ),
            );
            Ok(record)
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Extract",
                &format!("Extraction failed for {}: {}", file.file_name, e),
            );
            Err(EXTRACTION_FAILED_MESSAGE.to_string())
        }
    }
}

fn export_response(data: &web::Data<HttpState>, record: &ExportRecord) -> HttpResponse {
    match data.app_state.csv_exporter.export(record) {
        Ok(export) => {
            add_log(
                &data.logs,
                "INFO",
                "Export",
                &format!(
                    "Exported {} ({} bytes)",
                    export.file_name,
                    export.bytes.len()
                ),
            );
            csv_download(export)
        }
        Err(e) => {
            add_log(
                &data.logs,
                "ERROR",
                "Export",
                &format!("CSV export failed: {}", e),
            );
            HttpResponse::InternalServerError().body(e.to_string())
        }
    }
}

fn csv_download(export: CsvExport) -> HttpResponse {
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::FilenameExt(ExtendedValue {
            charset: Charset::Ext("UTF-8".to_string()),
            language_tag: None,
            value: export.file_name.into_bytes(),
        })],
    };

    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(disposition)
        .body(export.bytes)
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    match level {
        "ERROR" => tracing::error!(source, "{}", message),
        "WARN" => tracing::warn!(source, "{}", message),
        _ => tracing::info!(source, "{}", message),
    }

    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = logs.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    logs.push(entry.clone());
    if logs.len() > 100 {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(upload)
        .service(extract)
        .service(export_current)
        .service(
            web::scope("/api")
                .service(api_extract)
                .service(api_export)
                .service(get_logs),
        );
}

pub fn start_server(
    app_state: Arc<AppState>,
    logs: Arc<Mutex<Vec<LogEntry>>>,
) -> std::io::Result<Server> {
    let host = app_state.config.host.clone();
    let port = app_state.config.port;
    let upload_limit = app_state.config.max_upload_bytes;
    let state = web::Data::new(HttpState { app_state, logs });

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(upload_limit))
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}
