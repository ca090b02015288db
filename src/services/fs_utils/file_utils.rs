use crate::types::errors::{AssemblyError, AssemblyResult};
use std::fs;
use std::io;
use std::path::Path;

fn ensure_parent(path: &Path) -> AssemblyResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssemblyError::io(parent, e))?;
    }
    Ok(())
}

/// Streams `reader` into `dest`, creating or truncating it.
fn stream_into(reader: &mut fs::File, source: &Path, dest: &Path) -> AssemblyResult<u64> {
    ensure_parent(dest)?;
    let mut out = fs::File::create(dest).map_err(|e| AssemblyError::io(dest, e))?;
    let copied = io::copy(reader, &mut out).map_err(|e| {
        // A failure mid-copy leaves a truncated destination behind.
        log::warn!(
            "Copy {} -> {} failed after partial write: {e}",
            source.display(),
            dest.display()
        );
        AssemblyError::io(dest, e)
    })?;
    out.sync_all().map_err(|e| AssemblyError::io(dest, e))?;
    Ok(copied)
}

/// Byte-exact copy of `source` into `dest`.
///
/// The destination and its parent directories are created as needed and any
/// previous contents are truncated. Returns the number of bytes copied.
pub fn copy_file(source: &Path, dest: &Path) -> AssemblyResult<u64> {
    let mut reader = fs::File::open(source).map_err(|e| AssemblyError::io(source, e))?;
    stream_into(&mut reader, source, dest)
}

/// Replaces the placeholder at `dest` with the binary resource at `source`.
///
/// An unreadable source is reported like any other I/O failure.
pub fn replace_binary(dest: &Path, source: &Path) -> AssemblyResult<u64> {
    let mut reader = fs::File::open(source).map_err(|e| {
        log::error!("Cannot open binary resource {}: {e}", source.display());
        AssemblyError::io(source, e)
    })?;
    if !dest.exists() {
        log::debug!("No placeholder at {}, creating it", dest.display());
    }
    stream_into(&mut reader, source, dest)
}

/// Writes `bytes` to `dest`, creating parents and truncating previous contents.
pub fn write_truncating(dest: &Path, bytes: &[u8]) -> AssemblyResult<()> {
    ensure_parent(dest)?;
    fs::write(dest, bytes).map_err(|e| AssemblyError::io(dest, e))
}

/// Copies the contents of `template_dir` into `staging_dir` (which is created).
///
/// Uses `fs_extra` so nested directories are copied in one call.
pub fn seed_tree(template_dir: &Path, staging_dir: &Path) -> AssemblyResult<u64> {
    if !template_dir.is_dir() {
        return Err(AssemblyError::io(
            template_dir,
            io::Error::new(io::ErrorKind::NotFound, "Template directory does not exist"),
        ));
    }
    fs::create_dir_all(staging_dir).map_err(|e| AssemblyError::io(staging_dir, e))?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.content_only = true;
    options.overwrite = true;

    fs_extra::dir::copy(template_dir, staging_dir, &options)
        .map_err(|err| AssemblyError::io(template_dir, io::Error::other(err.to_string())))
}
