pub mod models;

pub use models::*;

use crate::types::errors::{AssemblyError, AssemblyResult};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "DOCPACK_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "docpack.json";

const DOCX_EXTENSION: &str = "docx";

pub struct ConfigService {
    config_path: PathBuf,
    settings: AppSettings,
}

impl ConfigService {
    /// Loads settings from the process environment.
    ///
    /// Reads `.env` if present, then the JSON file named by `DOCPACK_CONFIG`
    /// (default `docpack.json`), then applies `DOCPACK_*` overrides.
    pub fn from_env() -> AssemblyResult<Self> {
        let _ = dotenvy::dotenv(); // Try to load .env, ignore if missing

        let config_path = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load(&config_path, |key| std::env::var(key).ok())
    }

    /// Loads `config_path` (defaults when missing) and applies overrides
    /// looked up through `env`.
    pub fn load(
        config_path: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> AssemblyResult<Self> {
        let mut settings = if config_path.exists() {
            let content = fs::read_to_string(config_path)
                .map_err(|e| AssemblyError::io(config_path, e))?;
            serde_json::from_str(&content).map_err(|e| {
                AssemblyError::Config(format!("{}: {e}", config_path.display()))
            })?
        } else {
            log::info!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            AppSettings::default()
        };

        apply_overrides(&mut settings, env);
        settings.download_name = normalize_download_name(&settings.download_name);

        Ok(Self {
            config_path: config_path.to_path_buf(),
            settings,
        })
    }

    pub fn get_settings(&self) -> AppSettings {
        self.settings.clone()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

// ── Helpers ──────────────────────────────────────────

fn apply_overrides(settings: &mut AppSettings, env: impl Fn(&str) -> Option<String>) {
    let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("DOCPACK_BIND_ADDRESS") {
        settings.bind_address = v;
    }
    if let Some(v) = non_empty("DOCPACK_TEMPLATE_DIR") {
        settings.template_dir = PathBuf::from(v);
    }
    if let Some(v) = non_empty("DOCPACK_IMAGE_PATH") {
        settings.image_path = PathBuf::from(v);
    }
    if let Some(v) = non_empty("DOCPACK_DOWNLOAD_NAME") {
        settings.download_name = v;
    }
    if let Some(v) = non_empty("DOCPACK_MANIFEST_PATH") {
        settings.manifest_path = Some(PathBuf::from(v));
    }
}

/// Sanitized file name that always carries the `.docx` extension.
pub fn normalize_download_name(name: &str) -> String {
    let cleaned = sanitize_filename::sanitize(name.trim());
    let stem = if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    };

    let has_docx = Path::new(&stem)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCX_EXTENSION));
    if has_docx {
        stem
    } else {
        format!("{stem}.{DOCX_EXTENSION}")
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
