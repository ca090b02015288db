//! Spreadsheet export for embedded chart data.
//!
//! A [`TabularGrid`] is written as a single-sheet `.xlsx` workbook. Row `n`
//! of the grid becomes sheet row `n + 1` starting at column `A`, and each cell
//! keeps its type (inline string, number or boolean).

mod cell;
mod workbook;

pub use cell::{cell_name, column_name, CellValue, TabularGrid, MAX_COLUMNS, MAX_ROWS};
pub use workbook::{write_workbook, SHEET_NAME};

use crate::types::errors::{AssemblyError, AssemblyResult};
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("column index {0} is outside 1..={MAX_COLUMNS}")]
    ColumnOutOfRange(u32),
    #[error("row index {0} is outside 1..={MAX_ROWS}")]
    RowOutOfRange(u32),
    #[error("cell {0} holds a non-finite number")]
    NonFiniteNumber(String),
    #[error("{0} holds a character XML cannot represent")]
    InvalidCharacter(String),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("package failed: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Exports `grid` to a workbook at `dest_path`, creating or overwriting it.
pub fn export_grid(member: &str, grid: &TabularGrid, dest_path: &Path) -> AssemblyResult<()> {
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(|e| AssemblyError::io(parent, e))?;
    }
    let file = fs::File::create(dest_path).map_err(|e| AssemblyError::io(dest_path, e))?;

    write_workbook(grid, BufWriter::new(file))
        .and_then(|writer| writer.into_inner().map_err(|e| e.into_error().into()))
        .map_err(|source| AssemblyError::Tabular {
            member: member.to_string(),
            source,
        })?;

    log::debug!(
        "Exported {} rows x {} columns for {member} into {}",
        grid.rows.len(),
        grid.width(),
        dest_path.display()
    );
    Ok(())
}

#[cfg(test)]
#[path = "tests/tabular_tests.rs"]
mod tabular_tests;
