//! Config file for the `dossier` binary.

use anyhow::{Context, Result};
use dossier_core::{AliasTable, GenerateConfig, MergeConfig};
use dossier_pdf::StampConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Every stage's settings; sections missing from the file keep defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory relative paths are resolved against
    pub base_dir: Option<PathBuf>,
    /// Replaces the built-in alias table when present
    pub aliases: AliasTable,
    pub merge: MergeConfig,
    pub generate: GenerateConfig,
    pub stamp: StampConfig,
}

impl Config {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn resolve_paths(&mut self, base: &Path) {
        self.merge.resolve_paths(base);
        self.generate.resolve_paths(base);
        self.stamp.resolve_paths(base);
    }
}

/// `--base-dir`, then the config's `base_dir`, then the desktop, then the
/// current directory
pub fn base_dir(cli: Option<&Path>, config: Option<&Path>) -> PathBuf {
    cli.or(config)
        .map(Path::to_path_buf)
        .or_else(dirs::desktop_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
