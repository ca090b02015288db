use super::types::PackSummary;
use crate::services::fs_utils::path_utils;
use crate::types::errors::{AssemblyError, AssemblyResult};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Pack every regular file under `source_dir` into a zip at `output_path`.
///
/// Steps:
/// 1. Refuse an output path that resolves inside `source_dir` (it would be
///    packed into itself), whatever `.`/`..`/relative spelling either side uses
/// 2. Walk the tree in lexicographic file-name order, files only
/// 3. Store each file under its `/`-separated path relative to `source_dir`
///
/// Directories get no member of their own; symlinks are not followed.
pub fn pack_directory(source_dir: &Path, output_path: &Path) -> AssemblyResult<PackSummary> {
    if !source_dir.is_dir() {
        return Err(AssemblyError::io(
            source_dir,
            io::Error::new(io::ErrorKind::NotFound, "Source directory does not exist"),
        ));
    }
    let source_real = source_dir
        .canonicalize()
        .map_err(|e| AssemblyError::io(source_dir, e))?;
    let output_real = resolve_output(output_path)?;
    if output_real.starts_with(&source_real) {
        return Err(AssemblyError::Archive(format!(
            "Output {} lies inside the packed directory {}",
            output_path.display(),
            source_dir.display()
        )));
    }

    let file = fs::File::create(output_path).map_err(|e| AssemblyError::io(output_path, e))?;
    let mut writer = ZipWriter::new(io::BufWriter::new(file));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut members = Vec::new();
    let mut uncompressed_size = 0u64;

    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            if entry.file_type().is_symlink() {
                log::warn!("Skipping symlink {}", entry.path().display());
            }
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| AssemblyError::Internal(format!("Walked outside source dir: {e}")))?;
        let name = path_utils::archive_name(relative);

        let mut input =
            fs::File::open(entry.path()).map_err(|e| AssemblyError::io(entry.path(), e))?;
        writer.start_file(name.as_str(), options)?;
        let written =
            io::copy(&mut input, &mut writer).map_err(|e| AssemblyError::io(entry.path(), e))?;

        log::debug!("Packed {name} ({written} bytes)");
        uncompressed_size += written;
        members.push(name);
    }

    let buffered = writer.finish()?;
    buffered
        .into_inner()
        .map_err(|e| AssemblyError::io(output_path, e.into_error()))?
        .sync_all()
        .map_err(|e| AssemblyError::io(output_path, e))?;

    log::info!(
        "Packed {} members ({} bytes) from {} into {}",
        members.len(),
        uncompressed_size,
        source_dir.display(),
        output_path.display()
    );

    Ok(PackSummary {
        archive_path: output_path.to_path_buf(),
        members,
        uncompressed_size,
    })
}

/// Creates the parent of `output_path` and returns the output's absolute,
/// symlink-free location.
fn resolve_output(output_path: &Path) -> AssemblyResult<PathBuf> {
    let file_name = output_path.file_name().ok_or_else(|| {
        AssemblyError::Archive(format!(
            "Output {} does not name a file",
            output_path.display()
        ))
    })?;
    let parent = match output_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| AssemblyError::io(parent, e))?;
    let parent = parent
        .canonicalize()
        .map_err(|e| AssemblyError::io(parent, e))?;
    Ok(parent.join(file_name))
}
