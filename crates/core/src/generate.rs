//! One filled transfer document per spreadsheet row.

use crate::config::GenerateConfig;
use crate::error::{CoreError, Result};
use crate::normalize::{normalize, CleanupRules};
use crate::schema::HeaderMap;
use chrono::{Datelike, Local, NaiveDate};
use dossier_docx::{trim_below_label, Document, ReplacementMap, Substituter};
use dossier_sheet::{CellValue, Sheet};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The fields a transfer document needs from one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentRecord {
    pub name: String,
    pub origin: String,
    pub archive_type: String,
    pub id_number: String,
    pub phone: String,
    pub employer: String,
    pub receiver: String,
    pub transfer_number: String,
}

impl StudentRecord {
    /// Read a row by exact header name; missing columns read as empty
    #[must_use]
    pub fn from_row(header: &HeaderMap, row: &[CellValue], cleanups: &CleanupRules) -> Self {
        let field = |name: &str| {
            let value = header
                .get(name)
                .and_then(|col| row.get(col - 1))
                .map(normalize)
                .unwrap_or_default();
            cleanups.apply(name, value)
        };

        Self {
            name: field("姓名"),
            origin: field("生源地名称"),
            archive_type: field("档案转寄类型名称"),
            id_number: field("身份证号"),
            phone: field("手机号码"),
            employer: field("用人单位名称"),
            receiver: field("档案转寄单位"),
            transfer_number: field("转递编号"),
        }
    }

    /// No name and no identity number
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.id_number.is_empty()
    }
}

/// Month and day printed on every document of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchDate {
    pub month: u32,
    pub day: u32,
}

impl BatchDate {
    #[must_use]
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Placeholder tokens used in the document template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderSet {
    pub name: String,
    pub origin: String,
    pub archive_type: String,
    pub id_number: String,
    pub phone: String,
    pub employer: String,
    pub receiver: String,
    pub month: String,
    pub day: String,
    pub transfer_number: String,
}

impl Default for PlaceholderSet {
    fn default() -> Self {
        Self {
            name: "{1}".to_string(),
            origin: "{2}".to_string(),
            archive_type: "{3}".to_string(),
            id_number: "{321102200204040021}".to_string(),
            phone: "{5}".to_string(),
            employer: "{6}".to_string(),
            receiver: "{7}".to_string(),
            month: "{m}".to_string(),
            day: "{d}".to_string(),
            transfer_number: "{2510876CYLAXKAZFVR}".to_string(),
        }
    }
}

impl PlaceholderSet {
    /// Token → value for one record, in the order tokens are applied
    #[must_use]
    pub fn replacements(&self, record: &StudentRecord, date: BatchDate) -> ReplacementMap {
        let mut map = ReplacementMap::new();
        map.insert(self.name.clone(), record.name.clone());
        map.insert(self.origin.clone(), record.origin.clone());
        map.insert(self.archive_type.clone(), record.archive_type.clone());
        map.insert(self.id_number.clone(), record.id_number.clone());
        map.insert(self.phone.clone(), record.phone.clone());
        map.insert(self.employer.clone(), record.employer.clone());
        map.insert(self.receiver.clone(), record.receiver.clone());
        map.insert(self.month.clone(), date.month.to_string());
        map.insert(self.day.clone(), date.day.to_string());
        map.insert(self.transfer_number.clone(), record.transfer_number.clone());
        map
    }
}

/// Replace characters that cannot appear in a file name
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// `{prefix}_{name}.docx`, with `unknown_{position}` standing in for an
/// empty name. `position` is the 1-based data row.
#[must_use]
pub fn output_file_name(prefix: &str, name: &str, position: usize) -> String {
    let label = if name.is_empty() {
        format!("unknown_{position}")
    } else {
        sanitize_file_name(name)
    };
    format!("{prefix}_{label}.docx")
}

/// A row that could not be turned into a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based data row
    pub position: usize,
    pub label: String,
    pub message: String,
}

/// Outcome of a generation batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub generated: Vec<PathBuf>,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

/// Fill a copy of `template` with `replacements` and save it to `path`
pub fn fill_document(
    template: &Document,
    replacements: &ReplacementMap,
    trim_label: Option<&str>,
    path: &Path,
) -> Result<()> {
    let mut document = template.clone();
    Substituter::new(replacements)?.apply(&mut document);
    if let Some(label) = trim_label {
        trim_below_label(&mut document, label);
    }
    document.save(path)?;
    Ok(())
}

/// Generate a document for every non-blank data row of the configured
/// spreadsheet.
///
/// A missing spreadsheet or template, or a template that does not parse,
/// fails the whole batch. Failures on individual rows are collected in the
/// report and the batch continues.
pub fn generate_documents(config: &GenerateConfig, date: BatchDate) -> Result<GenerateReport> {
    if !config.sheet.exists() {
        return Err(CoreError::SourceNotFound(config.sheet.clone()));
    }
    if !config.template.exists() {
        return Err(CoreError::TemplateNotFound(config.template.clone()));
    }

    let sheet = Sheet::from_xlsx(&config.sheet)?;
    let template = Document::open(&config.template)?;
    std::fs::create_dir_all(&config.output_dir)?;

    let header = HeaderMap::from_sheet(&sheet);
    let mut report = GenerateReport::default();

    for (position, row) in sheet.rows().enumerate().skip(1) {
        let record = StudentRecord::from_row(&header, row, &config.cleanups);
        if record.is_blank() {
            tracing::debug!("Skipping data row {}: no name or identity number", position);
            report.skipped += 1;
            continue;
        }

        let file_name = output_file_name(&config.file_prefix, &record.name, position);
        let path = config.output_dir.join(&file_name);
        let replacements = config.placeholders.replacements(&record, date);

        match fill_document(&template, &replacements, config.trim_label.as_deref(), &path) {
            Ok(()) => {
                tracing::debug!("Generated {}", path.display());
                report.generated.push(path);
            }
            Err(e) => {
                tracing::warn!("Row {} ({}) failed: {}", position, file_name, e);
                report.failures.push(RowFailure {
                    position,
                    label: file_name,
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Generated {} documents ({} skipped, {} failed)",
        report.generated.len(),
        report.skipped,
        report.failures.len()
    );
    Ok(report)
}
