//! Error types for dossier-core.

use dossier_docx::DocxError;
use dossier_sheet::SheetError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for dossier-core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while merging spreadsheets or generating documents.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The source spreadsheet does not exist.
    #[error("Source spreadsheet not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A template (spreadsheet or document) does not exist.
    #[error("Template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    /// The destination template has no header names in its first row.
    #[error("Template header row is empty; configure the header in row 1")]
    EmptyTemplateHeader,

    /// The merge output would overwrite its template.
    #[error("Output path is the template itself: {}", .0.display())]
    OutputIsTemplate(PathBuf),

    /// Spreadsheet read/write error.
    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Document read/write or substitution error.
    #[error("Document error: {0}")]
    Docx(#[from] DocxError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
