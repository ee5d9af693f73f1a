use thiserror::Error;

/// Errors raised while reading, editing or writing a `.docx` package
#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Missing package part: {0}")]
    MissingPart(String),

    #[error("Malformed document XML: {0}")]
    Malformed(String),

    #[error("Document was not loaded from a package; nothing to save into")]
    NoPackage,

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Invalid UTF-8 in document: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Invalid UTF-8 in document: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Invalid placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DocxError>;
