//! Packs a staged package tree into its final zip container.

mod pack;
mod types;

pub use pack::pack_directory;
pub use types::PackSummary;

#[cfg(test)]
#[path = "tests/pack_tests.rs"]
mod tests;
