//! # dossier-core
//!
//! Field merge and document generation for graduate archive transfers.
//!
//! This crate provides:
//! - Cell value normalization and per-field cleanups
//! - Header maps and alias-based column resolution
//! - The row merge from a source spreadsheet into a template spreadsheet
//! - Per-row transfer document generation from a `.docx` template
//!
//! # Examples
//!
//! ```
//! use dossier_core::{merge_into, AliasTable, MergeOptions};
//! use dossier_sheet::{CellValue, Sheet};
//!
//! let source = Sheet::from_data(vec![
//!     vec!["学生姓名", "身份证号码"],
//!     vec!["张三", "110101200001010011"],
//! ]);
//! let mut template = Sheet::from_data(vec![vec!["身份证号", "姓名"]]);
//!
//! let report = merge_into(&source, &mut template, &AliasTable::default(), &MergeOptions::default())
//!     .unwrap();
//! assert_eq!(report.written, 1);
//! assert_eq!(template.cell(1, 1), Some(&CellValue::from("张三")));
//! ```

/// Run configuration.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Per-row document generation.
pub mod generate;
/// Row merge engine.
pub mod merge;
/// Value normalization.
pub mod normalize;
/// Header maps and column resolution.
pub mod schema;

pub use config::{resolve_path, GenerateConfig, MergeConfig};
pub use error::{CoreError, Result};
pub use generate::{
    fill_document, generate_documents, output_file_name, sanitize_file_name, BatchDate,
    GenerateReport, PlaceholderSet, RowFailure, StudentRecord,
};
pub use merge::{
    merge_files, merge_into, merge_rows, MergeOptions, MergeOutcome, MergeReport, NormalizedRow,
};
pub use normalize::{normalize, normalize_text, CleanupRules, FieldCleanup};
pub use schema::{resolve, AliasTable, FieldResolutionMap, HeaderMap, ResolutionPolicy};
