use crate::document::Block;
use crate::paragraph::Paragraph;
use crate::xml::{XmlElement, XmlNode};

pub(crate) const W_TBL: &str = "w:tbl";
const W_TR: &str = "w:tr";
const W_TC: &str = "w:tc";
const W_TCPR: &str = "w:tcPr";
const W_GRID_SPAN: &str = "w:gridSpan";
const W_VMERGE: &str = "w:vMerge";

/// Position of a physical cell: row index, then cell index within the row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef {
    pub row: usize,
    pub cell: usize,
}

/// Vertical merge state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMerge {
    None,
    Restart,
    Continue,
}

/// A table cell (`w:tc`) holding paragraphs and nested tables
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableCell {
    attributes: Vec<(String, String)>,
    properties: Option<XmlElement>,
    blocks: Vec<Block>,
}

impl TableCell {
    fn from_element(element: XmlElement) -> Self {
        let mut properties = None;
        let mut blocks = Vec::new();
        for node in element.children {
            match node {
                XmlNode::Element(child) if child.name == W_TCPR && properties.is_none() => {
                    properties = Some(child);
                }
                other => blocks.push(Block::from_node(other)),
            }
        }
        Self {
            attributes: element.attributes,
            properties,
            blocks,
        }
    }

    fn into_element(self) -> XmlElement {
        let mut children = Vec::with_capacity(self.blocks.len() + 1);
        if let Some(properties) = self.properties {
            children.push(XmlNode::Element(properties));
        }
        children.extend(self.blocks.into_iter().map(Block::into_node));
        XmlElement {
            name: W_TC.to_string(),
            attributes: self.attributes,
            children,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    /// Paragraphs directly inside the cell
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    pub fn paragraphs_mut(&mut self) -> impl Iterator<Item = &mut Paragraph> {
        self.blocks.iter_mut().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Paragraph texts joined with newlines
    #[must_use]
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Number of grid columns the cell spans
    #[must_use]
    pub fn grid_span(&self) -> usize {
        self.properties
            .as_ref()
            .and_then(|p| p.child(W_GRID_SPAN))
            .and_then(|span| span.attribute("w:val"))
            .and_then(|val| val.parse().ok())
            .filter(|span: &usize| *span > 0)
            .unwrap_or(1)
    }

    #[must_use]
    pub fn v_merge(&self) -> VMerge {
        let Some(merge) = self.properties.as_ref().and_then(|p| p.child(W_VMERGE)) else {
            return VMerge::None;
        };
        match merge.attribute("w:val") {
            Some("restart") => VMerge::Restart,
            _ => VMerge::Continue,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum RowItem {
    Cell(TableCell),
    Other(XmlNode),
}

/// A table row (`w:tr`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableRow {
    attributes: Vec<(String, String)>,
    items: Vec<RowItem>,
}

impl TableRow {
    fn from_element(element: XmlElement) -> Self {
        let items = element
            .children
            .into_iter()
            .map(|node| match node {
                XmlNode::Element(child) if child.name == W_TC => {
                    RowItem::Cell(TableCell::from_element(child))
                }
                other => RowItem::Other(other),
            })
            .collect();
        Self {
            attributes: element.attributes,
            items,
        }
    }

    fn into_element(self) -> XmlElement {
        XmlElement {
            name: W_TR.to_string(),
            attributes: self.attributes,
            children: self
                .items
                .into_iter()
                .map(|item| match item {
                    RowItem::Cell(cell) => XmlNode::Element(cell.into_element()),
                    RowItem::Other(node) => node,
                })
                .collect(),
        }
    }

    pub fn cells(&self) -> impl Iterator<Item = &TableCell> {
        self.items.iter().filter_map(|item| match item {
            RowItem::Cell(cell) => Some(cell),
            RowItem::Other(_) => None,
        })
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut TableCell> {
        self.items.iter_mut().filter_map(|item| match item {
            RowItem::Cell(cell) => Some(cell),
            RowItem::Other(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TableItem {
    Row(TableRow),
    Other(XmlNode),
}

/// A table (`w:tbl`)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    attributes: Vec<(String, String)>,
    items: Vec<TableItem>,
}

impl Table {
    pub(crate) fn from_element(element: XmlElement) -> Self {
        let items = element
            .children
            .into_iter()
            .map(|node| match node {
                XmlNode::Element(child) if child.name == W_TR => {
                    TableItem::Row(TableRow::from_element(child))
                }
                other => TableItem::Other(other),
            })
            .collect();
        Self {
            attributes: element.attributes,
            items,
        }
    }

    pub(crate) fn into_element(self) -> XmlElement {
        XmlElement {
            name: W_TBL.to_string(),
            attributes: self.attributes,
            children: self
                .items
                .into_iter()
                .map(|item| match item {
                    TableItem::Row(row) => XmlNode::Element(row.into_element()),
                    TableItem::Other(node) => node,
                })
                .collect(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &TableRow> {
        self.items.iter().filter_map(|item| match item {
            TableItem::Row(row) => Some(row),
            TableItem::Other(_) => None,
        })
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut TableRow> {
        self.items.iter_mut().filter_map(|item| match item {
            TableItem::Row(row) => Some(row),
            TableItem::Other(_) => None,
        })
    }

    pub fn cell(&self, at: CellRef) -> Option<&TableCell> {
        self.rows().nth(at.row).and_then(|row| row.cells().nth(at.cell))
    }

    pub fn cell_mut(&mut self, at: CellRef) -> Option<&mut TableCell> {
        self.rows_mut()
            .nth(at.row)
            .and_then(|row| row.cells_mut().nth(at.cell))
    }

    /// Layout grid: one entry per grid column of each row.
    ///
    /// A cell spanning several columns appears once per column; a cell
    /// continuing a vertical merge is reported as the cell it continues.
    #[must_use]
    pub fn grid(&self) -> Vec<Vec<CellRef>> {
        let mut grid: Vec<Vec<CellRef>> = Vec::new();
        for (row_idx, row) in self.rows().enumerate() {
            let mut columns = Vec::new();
            for (cell_idx, cell) in row.cells().enumerate() {
                let mut at = CellRef {
                    row: row_idx,
                    cell: cell_idx,
                };
                if cell.v_merge() == VMerge::Continue {
                    let col = columns.len();
                    if let Some(above) = grid.last().and_then(|prev| prev.get(col)) {
                        at = *above;
                    }
                }
                for _ in 0..cell.grid_span() {
                    columns.push(at);
                }
            }
            grid.push(columns);
        }
        grid
    }
}
