use crate::services::fs_utils::path_utils;
use crate::services::tabular::TabularGrid;
use crate::types::errors::{AssemblyError, AssemblyResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

/// How a member is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Template,
    Tabular,
    Binary,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::Template, EntryKind::Tabular, EntryKind::Binary];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Template => "template",
            EntryKind::Tabular => "tabular",
            EntryKind::Binary => "binary",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One member rewrite. Each variant carries only the payload its kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManifestEntry {
    /// Render `<template_dir>/<path>` with `data` into the staging tree.
    Template { path: String, data: Value },
    /// Export `grid` as a workbook and copy it into the staging tree.
    Tabular { path: String, grid: TabularGrid },
    /// Replace the staged member with the file at `source`.
    Binary { path: String, source: PathBuf },
}

impl ManifestEntry {
    pub fn path(&self) -> &str {
        match self {
            ManifestEntry::Template { path, .. }
            | ManifestEntry::Tabular { path, .. }
            | ManifestEntry::Binary { path, .. } => path,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            ManifestEntry::Template { .. } => EntryKind::Template,
            ManifestEntry::Tabular { .. } => EntryKind::Tabular,
            ManifestEntry::Binary { .. } => EntryKind::Binary,
        }
    }

    /// Validated path relative to the package root.
    pub fn member_path(&self) -> AssemblyResult<PathBuf> {
        path_utils::member_path(self.path())
    }
}

/// Ordered list of member rewrites for one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn template(mut self, path: impl Into<String>, data: Value) -> Self {
        self.entries.push(ManifestEntry::Template {
            path: path.into(),
            data,
        });
        self
    }

    pub fn tabular(mut self, path: impl Into<String>, grid: TabularGrid) -> Self {
        self.entries.push(ManifestEntry::Tabular {
            path: path.into(),
            grid,
        });
        self
    }

    pub fn binary(mut self, path: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        self.entries.push(ManifestEntry::Binary {
            path: path.into(),
            source: source.into(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses `{"entries": [...]}`.
    ///
    /// A `kind` outside [`EntryKind::ALL`] yields
    /// [`AssemblyError::UnsupportedKind`]; other shape problems yield
    /// [`AssemblyError::Manifest`].
    pub fn from_json(text: &str) -> AssemblyResult<Self> {
        let raw: Value = serde_json::from_str(text)
            .map_err(|e| AssemblyError::Manifest(format!("Malformed JSON: {e}")))?;

        let entries = raw
            .get("entries")
            .and_then(Value::as_array)
            .ok_or_else(|| AssemblyError::Manifest("Expected an \"entries\" array".into()))?;

        let mut parsed = Vec::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            let tag = entry
                .get("kind")
                .and_then(Value::as_str)
                .ok_or_else(|| AssemblyError::Manifest(format!("Entry {idx} has no kind")))?;
            if EntryKind::from_tag(tag).is_none() {
                return Err(AssemblyError::UnsupportedKind(tag.to_string()));
            }

            let entry: ManifestEntry = serde_json::from_value(entry.clone())
                .map_err(|e| AssemblyError::Manifest(format!("Entry {idx} ({tag}): {e}")))?;
            entry.member_path()?;
            parsed.push(entry);
        }

        Ok(Self { entries: parsed })
    }
}
