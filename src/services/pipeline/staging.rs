use crate::services::fs_utils::file_utils;
use crate::types::errors::{AssemblyError, AssemblyResult};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STAGING_DIR: &str = "staging";
const SCRATCH_DIR: &str = "scratch";
const ARCHIVE_FILE: &str = "document.zip";

/// Per-run working area, removed from disk when dropped.
///
/// Layout:
/// - `staging/`: copy of the template tree, rewritten member by member
/// - `scratch/`: intermediate files generated before they are copied in
/// - `document.zip`: default location of the packed result
#[derive(Debug)]
pub struct Workspace {
    run_id: String,
    root: TempDir,
}

impl Workspace {
    /// Creates a uniquely named workspace and seeds `staging/` from `template_dir`.
    pub fn create(template_dir: &Path) -> AssemblyResult<Self> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let root = tempfile::Builder::new()
            .prefix(&format!("docpack-{run_id}-"))
            .tempdir()
            .map_err(|e| AssemblyError::io(std::env::temp_dir(), e))?;

        let workspace = Self { run_id, root };
        let copied = file_utils::seed_tree(template_dir, &workspace.staging_dir())?;
        std::fs::create_dir_all(workspace.scratch_dir())
            .map_err(|e| AssemblyError::io(workspace.scratch_dir(), e))?;

        log::debug!(
            "[{}] Seeded {} ({copied} bytes) from {}",
            workspace.run_id,
            workspace.staging_dir().display(),
            template_dir.display()
        );
        Ok(workspace)
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.path().join(STAGING_DIR)
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root.path().join(SCRATCH_DIR)
    }

    pub fn default_archive_path(&self) -> PathBuf {
        self.root.path().join(ARCHIVE_FILE)
    }
}
