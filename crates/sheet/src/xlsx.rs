use crate::cell::CellValue;
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use rust_xlsxwriter::{Workbook, Worksheet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => CellValue::DateTime(naive),
            // Excel stores dates as days since 1899-12-30
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

fn workbook_error(e: XlsxError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

fn writer_error(e: rust_xlsxwriter::XlsxError) -> SheetError {
    SheetError::Workbook(e.to_string())
}

/// Copy a calamine range into row-major cells anchored at A1.
///
/// calamine starts a range at its first used cell, so a sheet whose data
/// begins at B3 would otherwise shift every column index by one.
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let pad_cols = start_col as usize;

    let mut data: Vec<Vec<CellValue>> = Vec::with_capacity(start_row as usize + range.height());
    let padded_width = pad_cols + range.width();
    for _ in 0..start_row {
        data.push(vec![CellValue::Null; padded_width]);
    }

    for row in range.rows() {
        let mut row_data: Vec<CellValue> = Vec::with_capacity(padded_width);
        row_data.resize(pad_cols, CellValue::Null);
        row_data.extend(row.iter().map(data_to_cell_value));
        data.push(row_data);
    }

    data
}

impl Sheet {
    /// Load a sheet from an Excel file (first sheet)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read, or has no worksheets.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let first = Self::xlsx_sheet_names(path.as_ref())?
            .into_iter()
            .next()
            .ok_or_else(|| SheetError::NoWorksheets(path.as_ref().display().to_string()))?;

        Self::from_xlsx_sheet(path, &first)
    }

    /// Worksheet names of an Excel file, in workbook order
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be opened as a workbook.
    pub fn xlsx_sheet_names<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
        let workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_error)?;
        Ok(workbook.sheet_names())
    }

    /// Load a specific sheet from an Excel file by name
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened, sheet not found, or read fails.
    pub fn from_xlsx_sheet<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let mut workbook: Xlsx<BufReader<File>> =
            open_workbook(path.as_ref()).map_err(workbook_error)?;

        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(workbook_error)?;

        let mut sheet = Sheet::with_name(sheet_name);
        *sheet.data_mut() = range_to_rows(&range);

        tracing::debug!(
            "Loaded sheet '{}' from {} ({} rows)",
            sheet_name,
            path.as_ref().display(),
            sheet.row_count()
        );

        Ok(sheet)
    }

    /// Save the sheet to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        self.write_to_worksheet(worksheet)?;

        workbook.save(path.as_ref()).map_err(writer_error)?;

        Ok(())
    }

    /// Write sheet data to a worksheet
    fn write_to_worksheet(&self, worksheet: &mut Worksheet) -> Result<()> {
        worksheet.set_name(self.name()).map_err(writer_error)?;

        for (row_idx, row) in self.data().iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                let row_num = u32::try_from(row_idx)
                    .map_err(|_| SheetError::Workbook("Row index overflow".to_string()))?;
                let col_num = u16::try_from(col_idx)
                    .map_err(|_| SheetError::Workbook("Column index overflow".to_string()))?;

                match cell {
                    CellValue::Null => {} // Leave empty
                    CellValue::Bool(b) => {
                        worksheet
                            .write_boolean(row_num, col_num, *b)
                            .map_err(writer_error)?;
                    }
                    CellValue::Int(i) => {
                        // Excel stores all numbers as f64
                        worksheet
                            .write_number(row_num, col_num, *i as f64)
                            .map_err(writer_error)?;
                    }
                    CellValue::Float(f) => {
                        worksheet
                            .write_number(row_num, col_num, *f)
                            .map_err(writer_error)?;
                    }
                    CellValue::String(s) => {
                        worksheet
                            .write_string(row_num, col_num, s)
                            .map_err(writer_error)?;
                    }
                    CellValue::DateTime(_) => {
                        worksheet
                            .write_string(row_num, col_num, cell.as_str())
                            .map_err(writer_error)?;
                    }
                }
            }
        }

        Ok(())
    }
}
