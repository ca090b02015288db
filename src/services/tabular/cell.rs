use serde::{Deserialize, Serialize};

/// Largest 1-based column index a worksheet accepts (`XFD`).
pub const MAX_COLUMNS: u32 = 16_384;
/// Largest 1-based row index a worksheet accepts.
pub const MAX_ROWS: u32 = 1_048_576;

/// A single spreadsheet cell value.
///
/// Deserializes from plain JSON scalars: `null`, booleans, integers, floats
/// and strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Number(f64),
    Text(String),
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Integer(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Ordered rows of cells plus an optional workbook title.
///
/// Rows may differ in length; the sheet dimension spans the widest row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularGrid {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TabularGrid {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            rows: Vec::new(),
        }
    }

    pub fn push_row<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn with_row<I, C>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CellValue>,
    {
        self.push_row(cells);
        self
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

/// Converts 1-based `(column, row)` coordinates into an `A1`-style reference.
pub fn cell_name(column: u32, row: u32) -> Result<String, super::TabularError> {
    Ok(format!("{}{}", column_name(column)?, check_row(row)?))
}

/// Converts a 1-based column index into its letter form (`1` → `A`, `27` → `AA`).
pub fn column_name(column: u32) -> Result<String, super::TabularError> {
    if column == 0 || column > MAX_COLUMNS {
        return Err(super::TabularError::ColumnOutOfRange(column));
    }
    let mut letters = Vec::new();
    let mut n = column;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    Ok(String::from_utf8_lossy(&letters).into_owned())
}

fn check_row(row: u32) -> Result<u32, super::TabularError> {
    if row == 0 || row > MAX_ROWS {
        return Err(super::TabularError::RowOutOfRange(row));
    }
    Ok(row)
}
