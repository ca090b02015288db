use crate::services::config::AppSettings;
use crate::services::pipeline::DocumentAssembler;
use crate::services::report::{self, ReportData};
use crate::types::errors::{AssemblyError, AssemblyResult};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::fs;
use std::sync::Arc;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub struct AppState {
    pub settings: AppSettings,
    pub assembler: DocumentAssembler,
}

impl AppState {
    pub fn new(settings: AppSettings) -> Self {
        let assembler = DocumentAssembler::new(settings.template_dir.clone());
        Self {
            settings,
            assembler,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(download_document))
        .with_state(Arc::new(state))
}

/// Assembles a fresh document and streams it back as an attachment.
pub async fn download_document(State(state): State<Arc<AppState>>) -> Response {
    let job_state = Arc::clone(&state);
    let outcome = tokio::task::spawn_blocking(move || build_document(&job_state))
        .await
        .map_err(|e| AssemblyError::Internal(format!("Assembly task failed: {}", e)))
        .and_then(|result| result);

    match outcome {
        Ok(bytes) => {
            let disposition = content_disposition(&state.settings.download_name);
            let headers = [
                (header::CONTENT_TYPE, HeaderValue::from_static(DOCX_CONTENT_TYPE)),
                (
                    header::CONTENT_DISPOSITION,
                    HeaderValue::from_str(&disposition)
                        .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
                ),
            ];
            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(e) => {
            log::error!("Document download failed: {}", e);
            e.into_response()
        }
    }
}

/// Runs one pipeline and returns the packed bytes. The run workspace is
/// removed before this returns.
pub fn build_document(state: &AppState) -> AssemblyResult<Vec<u8>> {
    let document = match &state.settings.manifest_path {
        Some(manifest_path) => {
            let text = fs::read_to_string(manifest_path)
                .map_err(|e| AssemblyError::io(manifest_path, e))?;
            state.assembler.assemble_json(&text)?
        }
        None => {
            let manifest =
                report::build_manifest(&ReportData::demo(), &state.settings.image_path);
            state.assembler.assemble(&manifest)?
        }
    };
    log::info!(
        "Serving run {} ({} members)",
        document.run_id(),
        document.members().len()
    );
    document.read_bytes()
}

/// `attachment` disposition with an ASCII fallback name plus the RFC 5987
/// `filename*` form for clients that support it.
pub fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(file_name)
    )
}

#[cfg(test)]
#[path = "tests/document_cmds_tests.rs"]
mod document_cmds_tests;
