//! Run configuration for the merge and generation stages.
//!
//! Every section deserializes with defaults, so a config file only needs
//! the keys it changes. Paths may be relative; [`MergeConfig::resolve_paths`]
//! and [`GenerateConfig::resolve_paths`] anchor them to a base directory.

use crate::generate::PlaceholderSet;
use crate::merge::MergeOptions;
use crate::normalize::CleanupRules;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Join `path` onto `base` unless it is already absolute
#[must_use]
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

/// Spreadsheet merge settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Spreadsheet the records are read from
    pub source: PathBuf,
    /// Spreadsheet whose first row defines the output columns
    pub template: PathBuf,
    /// Where the filled copy of the template is written
    pub output: PathBuf,
    #[serde(flatten)]
    pub options: MergeOptions,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("毕业派遣管理_2025-09-01_19-40-17_595.xlsx"),
            template: PathBuf::from("new.xlsx"),
            output: PathBuf::from("new_filled.xlsx"),
            options: MergeOptions::default(),
        }
    }
}

impl MergeConfig {
    pub fn resolve_paths(&mut self, base: &Path) {
        self.source = resolve_path(base, &self.source);
        self.template = resolve_path(base, &self.template);
        self.output = resolve_path(base, &self.output);
    }
}

/// Document generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Merged spreadsheet, one document per data row
    pub sheet: PathBuf,
    /// `.docx` template holding the placeholder tokens
    pub template: PathBuf,
    pub output_dir: PathBuf,
    /// Output files are named `{file_prefix}_{name}.docx`
    pub file_prefix: String,
    pub placeholders: PlaceholderSet,
    pub cleanups: CleanupRules,
    /// Table label whose cell below has its leading whitespace removed
    pub trim_label: Option<String>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            sheet: PathBuf::from("new.xlsx"),
            template: PathBuf::from("高等学校毕业生档案转递单2023.docx"),
            output_dir: PathBuf::from("output_docs"),
            file_prefix: "档案转递单".to_string(),
            placeholders: PlaceholderSet::default(),
            cleanups: CleanupRules::documents(),
            trim_label: Some("生源地".to_string()),
        }
    }
}

impl GenerateConfig {
    pub fn resolve_paths(&mut self, base: &Path) {
        self.sheet = resolve_path(base, &self.sheet);
        self.template = resolve_path(base, &self.template);
        self.output_dir = resolve_path(base, &self.output_dir);
    }
}
