pub mod document_cmds;

pub use document_cmds::{router, AppState};
