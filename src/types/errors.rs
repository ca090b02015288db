use crate::services::tabular::TabularError;
use crate::services::template::TemplateError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Template error in {member}: {source}")]
    Template {
        member: String,
        #[source]
        source: TemplateError,
    },
    #[error("Spreadsheet error in {member}: {source}")]
    Tabular {
        member: String,
        #[source]
        source: TabularError,
    },
    #[error("Unsupported manifest entry kind: {0}")]
    UnsupportedKind(String),
    #[error("Invalid manifest: {0}")]
    Manifest(String),
    #[error("Archive error: {0}")]
    Archive(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AssemblyError {
    /// Wraps an `std::io::Error` with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AssemblyError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<zip::result::ZipError> for AssemblyError {
    fn from(error: zip::result::ZipError) -> Self {
        AssemblyError::Archive(error.to_string())
    }
}

impl From<walkdir::Error> for AssemblyError {
    fn from(error: walkdir::Error) -> Self {
        let path = error.path().map(PathBuf::from).unwrap_or_default();
        match error.into_io_error() {
            Some(source) => AssemblyError::Io { path, source },
            None => AssemblyError::Archive(format!(
                "Filesystem loop while walking {}",
                path.display()
            )),
        }
    }
}

impl Serialize for AssemblyError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl IntoResponse for AssemblyError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}

pub type AssemblyResult<T> = Result<T, AssemblyError>;
