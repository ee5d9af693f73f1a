//! Placeholder substitution over a document's paragraphs.
//!
//! Matching runs on a paragraph's concatenated run text, so a token split
//! across several runs is still found. A paragraph that changes is rewritten
//! as one run carrying the first original run's font; a paragraph that does
//! not change is left exactly as it was.

use crate::document::Document;
use crate::error::Result;
use crate::paragraph::{Paragraph, Run, RunFormat};
use crate::table::{CellRef, Table};
use indexmap::IndexMap;
use regex::{NoExpand, Regex};

/// Placeholder token → replacement text, applied in insertion order
pub type ReplacementMap = IndexMap<String, String>;

/// Whitespace consumed on either side of a token: space, tab, ideographic space
const TOKEN_PADDING: &str = "[ \t\u{3000}]*";

/// Formatting for a rewritten paragraph's single run.
///
/// Font name and size come from the first original run; the font name is
/// also set as the East-Asian font so CJK text renders in the same face.
/// Without an original run the new run has default formatting.
#[must_use]
pub fn carried_format(first: Option<&Run>) -> RunFormat {
    let Some(first) = first else {
        return RunFormat::default();
    };
    let source = first.format();
    RunFormat {
        east_asia_font: source.font_name.clone(),
        font_name: source.font_name,
        size: source.size,
    }
}

/// Compiled replacement rules for one row's values
#[derive(Debug, Clone)]
pub struct Substituter {
    rules: Vec<(Regex, String)>,
}

impl Substituter {
    pub fn new(replacements: &ReplacementMap) -> Result<Self> {
        let rules = replacements
            .iter()
            .map(|(token, value)| -> Result<(Regex, String)> {
                let pattern = format!("{TOKEN_PADDING}{}{TOKEN_PADDING}", regex::escape(token));
                Ok((Regex::new(&pattern)?, value.trim().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Apply every rule in order to one evolving string
    #[must_use]
    pub fn replace_text(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (pattern, value) in &self.rules {
            if pattern.is_match(&out) {
                out = pattern.replace_all(&out, NoExpand(value)).into_owned();
            }
        }
        out
    }

    /// Substitute tokens in one paragraph; returns whether it changed
    pub fn substitute(&self, paragraph: &mut Paragraph) -> bool {
        let original = paragraph.text();
        let replaced = self.replace_text(&original);
        if replaced == original {
            return false;
        }

        let format = carried_format(paragraph.runs().next());
        paragraph.clear_run_text();
        paragraph.push_run(Run::with_format(&replaced, &format));
        true
    }

    /// Substitute tokens in every paragraph of the document, table cells
    /// included; returns the number of rewritten paragraphs.
    pub fn apply(&self, document: &mut Document) -> usize {
        let mut rewritten = 0;
        document.for_each_paragraph_mut(&mut |paragraph| {
            if self.substitute(paragraph) {
                rewritten += 1;
            }
        });
        tracing::debug!("Rewrote {} paragraphs", rewritten);
        rewritten
    }
}

/// For every table cell whose trimmed text equals `label`, strip leading
/// whitespace from the paragraphs of the cell directly below it.
///
/// Returns the number of paragraphs rewritten.
pub fn trim_below_label(document: &mut Document, label: &str) -> usize {
    let mut trimmed = 0;
    document.for_each_table_mut(&mut |table| trimmed += trim_table(table, label));
    trimmed
}

fn trim_table(table: &mut Table, label: &str) -> usize {
    let grid = table.grid();
    let mut targets: Vec<CellRef> = Vec::new();

    for (row_idx, columns) in grid.iter().enumerate() {
        for (col_idx, at) in columns.iter().enumerate() {
            let is_label = table
                .cell(*at)
                .is_some_and(|cell| cell.text().trim() == label);
            if !is_label {
                continue;
            }
            let Some(below) = grid.get(row_idx + 1).and_then(|next| next.get(col_idx)) else {
                continue;
            };
            if below != at && !targets.contains(below) {
                targets.push(*below);
            }
        }
    }

    let mut count = 0;
    for at in targets {
        if let Some(cell) = table.cell_mut(at) {
            for paragraph in cell.paragraphs_mut() {
                if strip_leading_whitespace(paragraph) {
                    count += 1;
                }
            }
        }
    }
    count
}

fn strip_leading_whitespace(paragraph: &mut Paragraph) -> bool {
    if paragraph.runs().next().is_none() {
        return false;
    }

    let full = paragraph.text();
    let stripped = full.trim_start();
    if stripped.len() == full.len() {
        return false;
    }

    let format = carried_format(paragraph.runs().next());
    let stripped = stripped.to_string();
    paragraph.clear();
    paragraph.push_run(Run::with_format(&stripped, &format));
    true
}
