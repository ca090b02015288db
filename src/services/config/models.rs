use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Address the HTTP trigger listens on.
    pub bind_address: String,
    /// Directory mirroring the package layout (`word/document.xml`, ...).
    pub template_dir: PathBuf,
    /// Image that replaces `word/media/image1.png` in the built-in report.
    pub image_path: PathBuf,
    /// File name offered in `Content-Disposition`.
    pub download_name: String,
    /// Optional JSON manifest used instead of the built-in report.
    pub manifest_path: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            template_dir: PathBuf::from("templates/report"),
            image_path: PathBuf::from("assets/sample.png"),
            download_name: "document.docx".into(),
            manifest_path: None,
        }
    }
}
