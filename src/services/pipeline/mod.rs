//! Document-assembly pipeline.
//!
//! A [`Manifest`] lists the package members to rewrite. [`DocumentAssembler`]
//! copies the template tree into a per-run [`Workspace`], dispatches each
//! entry (template render, spreadsheet export, binary replacement) in order,
//! and packs the staged tree into a zip once every entry succeeded.

mod assembler;
mod manifest;
mod staging;

pub use assembler::{apply_entry, AssembledDocument, DocumentAssembler};
pub use manifest::{EntryKind, Manifest, ManifestEntry};
pub use staging::Workspace;

#[cfg(test)]
#[path = "tests/manifest_tests.rs"]
mod manifest_tests;

#[cfg(test)]
#[path = "tests/assembler_tests.rs"]
mod assembler_tests;
