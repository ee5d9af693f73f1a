use crate::error::{DocxError, Result};
use crate::package::Package;
use crate::paragraph::{Paragraph, W_P};
use crate::table::{Table, W_TBL};
use crate::xml::{XmlDocument, XmlNode};
use std::path::Path;

/// Package part holding the main document body
pub const DOCUMENT_PART: &str = "word/document.xml";
const W_BODY: &str = "w:body";

/// Block-level content of a body or a table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
    Other(XmlNode),
}

impl Block {
    pub(crate) fn from_node(node: XmlNode) -> Self {
        match node {
            XmlNode::Element(el) if el.name == W_P => Block::Paragraph(Paragraph::from_element(el)),
            XmlNode::Element(el) if el.name == W_TBL => Block::Table(Table::from_element(el)),
            other => Block::Other(other),
        }
    }

    pub(crate) fn into_node(self) -> XmlNode {
        match self {
            Block::Paragraph(p) => XmlNode::Element(p.into_element()),
            Block::Table(t) => XmlNode::Element(t.into_element()),
            Block::Other(node) => node,
        }
    }
}

/// A WordprocessingML document: the main part split into typed blocks,
/// plus the package it came from (when loaded from a file).
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    package: Option<Package>,
    // main part with the body's children moved out into `blocks`
    shell: XmlDocument,
    body_index: usize,
    blocks: Vec<Block>,
}

impl Document {
    /// Load a `.docx` file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path.as_ref())?;
        let xml = package
            .part(DOCUMENT_PART)
            .ok_or_else(|| DocxError::MissingPart(DOCUMENT_PART.to_string()))?;
        let xml = std::str::from_utf8(xml)?;
        let mut document = Self::from_xml(xml)?;
        document.package = Some(package);
        tracing::debug!(
            "Opened {} ({} body blocks)",
            path.as_ref().display(),
            document.blocks.len()
        );
        Ok(document)
    }

    /// Build a document from the XML of its main part, without a package
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut shell = XmlDocument::parse(xml)?;
        let body_index = shell
            .root
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(el) if el.name == W_BODY))
            .ok_or_else(|| DocxError::Malformed("document has no <w:body>".to_string()))?;

        let XmlNode::Element(body) = &mut shell.root.children[body_index] else {
            return Err(DocxError::Malformed("document has no <w:body>".to_string()));
        };
        let blocks = std::mem::take(&mut body.children)
            .into_iter()
            .map(Block::from_node)
            .collect();

        Ok(Self {
            package: None,
            shell,
            body_index,
            blocks,
        })
    }

    /// Serialize the main part
    pub fn to_xml(&self) -> Result<String> {
        let mut shell = self.shell.clone();
        if let Some(XmlNode::Element(body)) = shell.root.children.get_mut(self.body_index) {
            body.children = self.blocks.iter().cloned().map(Block::into_node).collect();
        }
        shell.to_xml()
    }

    /// Write the document into a copy of its package at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let package = self.package.as_ref().ok_or(DocxError::NoPackage)?;
        let xml = self.to_xml()?;
        package.save_with(path.as_ref(), (DOCUMENT_PART, xml.as_bytes()))?;
        tracing::debug!("Saved {}", path.as_ref().display());
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    /// Body-level paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Body-level tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Visit every paragraph in document order, including those in table
    /// cells at any nesting depth.
    pub fn for_each_paragraph_mut(&mut self, f: &mut dyn FnMut(&mut Paragraph)) {
        visit_paragraphs(&mut self.blocks, f);
    }

    /// Visit every table in document order, outer tables before the tables
    /// nested in their cells.
    pub fn for_each_table_mut(&mut self, f: &mut dyn FnMut(&mut Table)) {
        visit_tables(&mut self.blocks, f);
    }
}

fn visit_paragraphs(blocks: &mut [Block], f: &mut dyn FnMut(&mut Paragraph)) {
    for block in blocks {
        match block {
            Block::Paragraph(p) => f(p),
            Block::Table(table) => {
                for row in table.rows_mut() {
                    for cell in row.cells_mut() {
                        visit_paragraphs(cell.blocks_mut(), f);
                    }
                }
            }
            Block::Other(_) => {}
        }
    }
}

fn visit_tables(blocks: &mut [Block], f: &mut dyn FnMut(&mut Table)) {
    for block in blocks {
        if let Block::Table(table) = block {
            f(table);
            for row in table.rows_mut() {
                for cell in row.cells_mut() {
                    visit_tables(cell.blocks_mut(), f);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
        r#"<w:p><w:r><w:t>标题</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>外</w:t></w:r></w:p>"#,
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>内</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        r#"</w:tc></w:tr></w:tbl>"#,
        r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/></w:sectPr>"#,
        r#"</w:body></w:document>"#
    );

    #[test]
    fn test_from_xml_splits_blocks() {
        let doc = Document::from_xml(XML).unwrap();
        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(doc.paragraphs().count(), 1);
        assert_eq!(doc.tables().count(), 1);
        assert!(matches!(doc.blocks()[2], Block::Other(_)));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let doc = Document::from_xml(XML).unwrap();
        let again = Document::from_xml(&doc.to_xml().unwrap()).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn test_visits_nested_paragraphs_and_tables() {
        let mut doc = Document::from_xml(XML).unwrap();

        let mut texts = Vec::new();
        doc.for_each_paragraph_mut(&mut |p| texts.push(p.text()));
        assert_eq!(texts, vec!["标题", "外", "内"]);

        let mut tables = 0;
        doc.for_each_table_mut(&mut |_| tables += 1);
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_missing_body_is_malformed() {
        let result = Document::from_xml("<w:document/>");
        assert!(matches!(result, Err(DocxError::Malformed(_))));
    }

    #[test]
    fn test_save_without_package_fails() {
        let doc = Document::from_xml(XML).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let result = doc.save(dir.path().join("out.docx"));
        assert!(matches!(result, Err(DocxError::NoPackage)));
    }
}
