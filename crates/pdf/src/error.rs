use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to initialize PDFium: {0}")]
    PdfiumUnavailable(String),

    #[error("Input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),

    #[error("No PDF files in {}", .0.display())]
    NoPdfs(PathBuf),

    #[error("Failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error("PDF write error: {0}")]
    Write(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PdfError>;
