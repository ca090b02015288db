use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Result of packing a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackSummary {
    pub archive_path: PathBuf,
    /// Member names in the order they were written.
    pub members: Vec<String>,
    pub uncompressed_size: u64,
}
