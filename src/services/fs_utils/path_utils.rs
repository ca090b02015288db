use crate::types::errors::{AssemblyError, AssemblyResult};
use std::path::{Component, Path, PathBuf};

/// Validates a package member path and returns it as a relative path.
///
/// A leading `/` is accepted (package part names are written that way) and
/// stripped. Empty paths, `..` segments and drive prefixes are rejected so a
/// member can never resolve outside the tree it is joined onto.
pub fn member_path(raw: &str) -> AssemblyResult<PathBuf> {
    let trimmed = raw.trim_start_matches(['/', '\\']);
    if trimmed.is_empty() {
        return Err(AssemblyError::Manifest(format!(
            "Member path is empty: {raw:?}"
        )));
    }

    let mut clean = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(AssemblyError::Manifest(format!(
                    "Member path escapes the package root: {raw:?}"
                )));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(AssemblyError::Manifest(format!(
            "Member path is empty: {raw:?}"
        )));
    }
    Ok(clean)
}

/// Archive member name for a path relative to the packed directory,
/// always `/`-separated.
pub fn archive_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
