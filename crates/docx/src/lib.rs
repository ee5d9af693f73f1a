//! Word-processing document model for dossier
//!
//! Reads a `.docx` package, exposes the main document as paragraphs, runs and
//! tables, and rewrites placeholder tokens while keeping run formatting.
//!
//! # Examples
//!
//! ```
//! use dossier_docx::{Document, ReplacementMap, Substituter};
//!
//! let xml = concat!(
//!     r#"<w:document><w:body>"#,
//!     r#"<w:p><w:r><w:t>姓名：{</w:t></w:r><w:r><w:t>1}</w:t></w:r></w:p>"#,
//!     r#"</w:body></w:document>"#,
//! );
//! let mut doc = Document::from_xml(xml).unwrap();
//!
//! let mut values = ReplacementMap::new();
//! values.insert("{1}".to_string(), "张三".to_string());
//! Substituter::new(&values).unwrap().apply(&mut doc);
//!
//! assert_eq!(doc.paragraphs().next().unwrap().text(), "姓名：张三");
//! ```

mod document;
mod error;
mod package;
mod paragraph;
mod substitute;
mod table;
mod xml;

pub use document::{Block, Document, DOCUMENT_PART};
pub use error::{DocxError, Result};
pub use package::Package;
pub use paragraph::{Paragraph, Run, RunFormat};
pub use substitute::{carried_format, trim_below_label, ReplacementMap, Substituter};
pub use table::{CellRef, Table, TableCell, TableRow, VMerge};
pub use xml::{XmlDocument, XmlElement, XmlNode};
