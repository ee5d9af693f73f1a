//! Header maps and alias-based column resolution.

use crate::normalize::normalize;
use dossier_sheet::{CellValue, Sheet};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Normalized header name → 1-based column, in left-to-right order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: IndexMap<String, usize>,
}

impl HeaderMap {
    /// Build from a header row; blank cells are skipped and the first of
    /// several same-named columns wins.
    #[must_use]
    pub fn from_row(row: &[CellValue]) -> Self {
        let mut columns = IndexMap::new();
        for (idx, cell) in row.iter().enumerate() {
            let name = normalize(cell);
            if name.is_empty() {
                continue;
            }
            if columns.contains_key(&name) {
                tracing::debug!("Duplicate header {:?} in column {} ignored", name, idx + 1);
                continue;
            }
            columns.insert(name, idx + 1);
        }
        Self { columns }
    }

    /// Build from the sheet's first row
    #[must_use]
    pub fn from_sheet(sheet: &Sheet) -> Self {
        sheet
            .rows()
            .next()
            .map(|row| Self::from_row(row))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), *col))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Canonical field → alternative header names, highest priority first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable(IndexMap<String, Vec<String>>);

const BUILTIN_ALIASES: &[(&str, &[&str])] = &[
    ("姓名", &["姓名", "学生姓名", "人员姓名", "名字"]),
    ("生源地名称", &["生源地名称", "生源地", "生源所在地", "户籍所在地", "户籍"]),
    (
        "档案转寄类型名称",
        &["档案转寄类型名称", "档案转寄类型", "档案转递类型", "转寄类型", "转递类型"],
    ),
    ("身份证号", &["身份证号", "身份证号码", "公民身份号码", "证件号码"]),
    ("手机号码", &["手机号码", "手机号", "联系电话", "联系手机", "手机"]),
    (
        "用人单位名称",
        &["用人单位名称", "用人单位", "单位名称", "就业单位名称", "接收单位名称"],
    ),
    (
        "档案转寄单位",
        &["档案转寄单位", "档案转递单位", "档案接收单位", "接收单位", "档案邮寄单位"],
    ),
    (
        "档案转递单位地址",
        &[
            "档案转递单位地址",
            "档案接收单位地址",
            "接收单位地址",
            "档案转寄单位地址",
            "转寄单位地址",
            "邮寄地址",
            "地址",
            "家庭地址",
        ],
    ),
    ("档案转寄联系人", &["档案转寄联系人", "接收单位联系人", "联系人"]),
    (
        "档案转寄联系电话",
        &["档案转寄联系电话", "接收单位联系电话", "联系人电话", "联系电话", "电话", "手机"],
    ),
    ("班级", &["班级", "所属班级", "班级名称"]),
    ("转递编号", &["转递编号", "档案转递编号", "编号"]),
];

impl Default for AliasTable {
    fn default() -> Self {
        Self(
            BUILTIN_ALIASES
                .iter()
                .map(|(field, aliases)| {
                    (
                        (*field).to_string(),
                        aliases.iter().map(|a| (*a).to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl AliasTable {
    /// A table with no aliases: only exact header names resolve
    #[must_use]
    pub fn empty() -> Self {
        Self(IndexMap::new())
    }

    pub fn insert(&mut self, field: &str, aliases: Vec<String>) {
        self.0.insert(field.to_string(), aliases);
    }

    /// Aliases for a field, in priority order; empty for unknown fields
    #[must_use]
    pub fn aliases(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Find the source column for a destination field.
///
/// Tried in order: the field's own name; each alias as an exact header
/// name; each alias as a substring of a header (headers in left-to-right
/// order). `None` when nothing matches.
#[must_use]
pub fn resolve(field: &str, source: &HeaderMap, aliases: &AliasTable) -> Option<usize> {
    if let Some(col) = source.get(field) {
        return Some(col);
    }

    let candidates = aliases.aliases(field);
    if let Some(col) = candidates.iter().find_map(|alias| source.get(alias)) {
        return Some(col);
    }

    candidates.iter().find_map(|alias| {
        source
            .iter()
            .find(|(name, _)| name.contains(alias.as_str()))
            .map(|(_, col)| col)
    })
}

/// Fields that are never copied from the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    pub always_blank: IndexSet<String>,
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            always_blank: IndexSet::from(["转递编号".to_string()]),
        }
    }
}

impl ResolutionPolicy {
    #[must_use]
    pub fn is_blank(&self, field: &str) -> bool {
        self.always_blank.contains(field)
    }
}

/// One resolved source column (or none) per destination header column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldResolutionMap {
    entries: IndexMap<String, Option<usize>>,
}

impl FieldResolutionMap {
    #[must_use]
    pub fn build(
        destination: &HeaderMap,
        source: &HeaderMap,
        aliases: &AliasTable,
        policy: &ResolutionPolicy,
    ) -> Self {
        let entries = destination
            .names()
            .map(|field| {
                let col = if policy.is_blank(field) {
                    None
                } else {
                    resolve(field, source, aliases)
                };
                match col {
                    Some(col) => tracing::debug!("{} <- source column {}", field, col),
                    None => tracing::debug!("{} left blank", field),
                }
                (field.to_string(), col)
            })
            .collect();
        Self { entries }
    }

    /// Resolved source column for a destination field; `None` when the
    /// field is unknown, unresolved or always blank
    #[must_use]
    pub fn get(&self, field: &str) -> Option<usize> {
        self.entries.get(field).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<usize>)> {
        self.entries.iter().map(|(field, col)| (field.as_str(), *col))
    }

    /// Destination fields with no source column
    pub fn unresolved(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, col)| col.is_none())
            .map(|(field, _)| field)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
