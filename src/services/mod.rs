pub mod archive;
pub mod config;
pub mod fs_utils;
pub mod pipeline;
pub mod report;
pub mod tabular;
pub mod template;
