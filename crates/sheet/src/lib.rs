//! Sheet module for dossier
//!
//! A small grid-of-cells model plus xlsx loading (calamine) and saving
//! (rust_xlsxwriter). Loaded sheets are anchored at cell A1: leading empty
//! rows and columns of the used range are padded back in, so row 0 is
//! spreadsheet row 1 and column 0 is column A.
//!
//! # Examples
//!
//! ```
//! use dossier_sheet::{Sheet, CellValue};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["姓名", "身份证号"],
//!     vec!["张三", "110101200001010011"],
//! ]);
//!
//! assert_eq!(sheet.row_count(), 2);
//! assert_eq!(sheet.cell(1, 0), Some(&CellValue::String("张三".to_string())));
//! ```
//!
//! ## Loading from xlsx
//!
//! ```no_run
//! use dossier_sheet::Sheet;
//!
//! let sheet = Sheet::from_xlsx("records.xlsx").unwrap();
//! ```

mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
