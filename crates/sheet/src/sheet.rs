use crate::cell::CellValue;
use crate::error::{Result, SheetError};

/// A sheet representing a 2D grid of cells (row-major storage)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    data: Vec<Vec<CellValue>>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            data: Vec::new(),
        }
    }

    /// Create a sheet from a 2D vector of values
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let converted: Vec<Vec<CellValue>> = data
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            data: converted,
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Get the number of rows
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Get the number of columns (width of the widest row)
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.data.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the sheet is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // ===== Cell Access =====

    /// Get a cell value by row and column index (0-based)
    pub fn get(&self, row: usize, col: usize) -> Result<&CellValue> {
        self.cell(row, col).ok_or(SheetError::IndexOutOfBounds {
            row,
            col,
            rows: self.row_count(),
            cols: self.col_count(),
        })
    }

    /// Get a cell value if it exists; short rows simply have no cell
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    // ===== Row Operations =====

    /// Get an entire row by index (0-based)
    pub fn row(&self, index: usize) -> Result<&Vec<CellValue>> {
        self.data.get(index).ok_or(SheetError::RowIndexOutOfBounds {
            index,
            count: self.row_count(),
        })
    }

    /// Append a row to the end of the sheet.
    ///
    /// The row must be as wide as the first row when the sheet is not empty.
    pub fn row_append<T: Into<CellValue>>(&mut self, data: Vec<T>) -> Result<()> {
        let row: Vec<CellValue> = data.into_iter().map(Into::into).collect();

        if let Some(first) = self.data.first() {
            if row.len() != first.len() {
                return Err(SheetError::LengthMismatch {
                    expected: first.len(),
                    actual: row.len(),
                });
            }
        }

        self.data.push(row);
        Ok(())
    }

    /// Drop every row from `len` onwards, keeping the first `len` rows
    pub fn truncate_rows(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &Vec<CellValue>> {
        self.data.iter()
    }

    /// Get a reference to the underlying data
    #[must_use]
    pub fn data(&self) -> &Vec<Vec<CellValue>> {
        &self.data
    }

    /// Get a mutable reference to the underlying data
    pub fn data_mut(&mut self) -> &mut Vec<Vec<CellValue>> {
        &mut self.data
    }
}
