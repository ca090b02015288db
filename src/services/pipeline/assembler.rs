use super::manifest::{Manifest, ManifestEntry};
use super::staging::Workspace;
use crate::services::archive::{self, PackSummary};
use crate::services::fs_utils::file_utils;
use crate::services::tabular;
use crate::services::template;
use crate::types::errors::{AssemblyError, AssemblyResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Turns a template tree plus a [`Manifest`] into a packed document.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    template_dir: PathBuf,
}

/// A packed document living inside its run workspace.
///
/// The workspace (and the archive) is deleted when this value is dropped.
#[derive(Debug)]
pub struct AssembledDocument {
    workspace: Workspace,
    summary: PackSummary,
}

impl AssembledDocument {
    pub fn run_id(&self) -> &str {
        self.workspace.run_id()
    }

    pub fn archive_path(&self) -> &Path {
        &self.summary.archive_path
    }

    pub fn members(&self) -> &[String] {
        &self.summary.members
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.workspace.staging_dir()
    }

    pub fn read_bytes(&self) -> AssemblyResult<Vec<u8>> {
        fs::read(self.archive_path()).map_err(|e| AssemblyError::io(self.archive_path(), e))
    }
}

impl DocumentAssembler {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
        }
    }

    pub fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    /// Runs the pipeline in a fresh workspace and packs the result inside it.
    pub fn assemble(&self, manifest: &Manifest) -> AssemblyResult<AssembledDocument> {
        let workspace = self.stage(manifest)?;
        let summary =
            archive::pack_directory(&workspace.staging_dir(), &workspace.default_archive_path())?;
        Ok(AssembledDocument { workspace, summary })
    }

    /// Runs the pipeline and writes the archive to `output`.
    ///
    /// Any archive already at `output` is removed first, so a failed run never
    /// leaves a previous result behind.
    pub fn assemble_to(&self, manifest: &Manifest, output: &Path) -> AssemblyResult<PackSummary> {
        remove_stale_output(output)?;
        let workspace = self.stage(manifest)?;
        discard_on_error(
            output,
            archive::pack_directory(&workspace.staging_dir(), output),
        )
    }

    /// Parses `manifest_json` and runs [`Self::assemble`].
    pub fn assemble_json(&self, manifest_json: &str) -> AssemblyResult<AssembledDocument> {
        let manifest = Manifest::from_json(manifest_json)?;
        self.assemble(&manifest)
    }

    /// Parses `manifest_json` and runs [`Self::assemble_to`]. The stale
    /// archive is removed before parsing.
    pub fn assemble_json_to(
        &self,
        manifest_json: &str,
        output: &Path,
    ) -> AssemblyResult<PackSummary> {
        remove_stale_output(output)?;
        let manifest = Manifest::from_json(manifest_json)?;
        self.assemble_to(&manifest, output)
    }

    /// Seeds a workspace and applies every entry in order. Stops at the first
    /// failure; entries already applied stay applied.
    fn stage(&self, manifest: &Manifest) -> AssemblyResult<Workspace> {
        let started = Instant::now();
        let workspace = Workspace::create(&self.template_dir)?;
        log::info!(
            "[{}] Assembling {} manifest entries from {}",
            workspace.run_id(),
            manifest.len(),
            self.template_dir.display()
        );

        for (idx, entry) in manifest.entries.iter().enumerate() {
            log::debug!(
                "[{}] Entry {}/{}: {} {}",
                workspace.run_id(),
                idx + 1,
                manifest.len(),
                entry.kind(),
                entry.path()
            );
            if let Err(e) = apply_entry(&self.template_dir, &workspace, entry) {
                log::warn!(
                    "[{}] Aborting at entry {} ({}): {e}",
                    workspace.run_id(),
                    idx + 1,
                    entry.path()
                );
                return Err(e);
            }
        }

        log::info!(
            "[{}] Applied {} entries in {:?}",
            workspace.run_id(),
            manifest.len(),
            started.elapsed()
        );
        Ok(workspace)
    }
}

/// Materializes one entry into the workspace's staging tree.
pub fn apply_entry(
    template_dir: &Path,
    workspace: &Workspace,
    entry: &ManifestEntry,
) -> AssemblyResult<()> {
    let member = entry.member_path()?;
    let dest = workspace.staging_dir().join(&member);

    match entry {
        ManifestEntry::Template { path, data } => {
            let source = template_dir.join(&member);
            template::render_template_file(path, &source, &dest, data)?;
        }
        ManifestEntry::Tabular { path, grid } => {
            let generated = workspace.scratch_dir().join(&member);
            tabular::export_grid(path, grid, &generated)?;
            file_utils::copy_file(&generated, &dest)?;
        }
        ManifestEntry::Binary { source, .. } => {
            file_utils::replace_binary(&dest, source)?;
        }
    }
    Ok(())
}

/// Removes a partially written archive when packing failed.
pub(super) fn discard_on_error<T>(output: &Path, result: AssemblyResult<T>) -> AssemblyResult<T> {
    if result.is_err() {
        if let Err(e) = remove_stale_output(output) {
            log::warn!("Could not remove partial archive {}: {e}", output.display());
        }
    }
    result
}

fn remove_stale_output(output: &Path) -> AssemblyResult<()> {
    match fs::remove_file(output) {
        Ok(()) => {
            log::debug!("Removed stale archive {}", output.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AssemblyError::io(output, e)),
    }
}
