use thiserror::Error;

/// Errors that can occur during sheet operations
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Index out of bounds: row {row}, col {col} (sheet has {rows} rows, {cols} cols)")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Row index out of bounds: {index} (sheet has {count} rows)")]
    RowIndexOutOfBounds { index: usize, count: usize },

    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Workbook has no worksheets: {0}")]
    NoWorksheets(String),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SheetError>;
