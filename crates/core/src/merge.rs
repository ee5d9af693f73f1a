//! Copy source rows into a destination template, column by column.
//!
//! The destination's header row fixes the output columns and their order.
//! Each destination column is resolved once against the source header (see
//! [`crate::schema::resolve`]); every non-blank source row then becomes one
//! output row, written contiguously from the row after the header.

use crate::config::MergeConfig;
use crate::error::{CoreError, Result};
use crate::normalize::{normalize, CleanupRules};
use crate::schema::{resolve, AliasTable, FieldResolutionMap, HeaderMap, ResolutionPolicy};
use dossier_sheet::{CellValue, Sheet};
use serde::{Deserialize, Serialize};

/// One output row: a normalized value per destination header column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRow {
    // (1-based destination column, value), in destination header order
    values: Vec<(usize, String)>,
}

impl NormalizedRow {
    /// Value written to a 1-based destination column
    #[must_use]
    pub fn get(&self, column: usize) -> Option<&str> {
        self.values
            .iter()
            .find(|(col, _)| *col == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = (usize, &str)> {
        self.values.iter().map(|(col, value)| (*col, value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lay the row out as `width` cells; empty values stay blank
    #[must_use]
    pub fn to_cells(&self, width: usize) -> Vec<CellValue> {
        let mut cells = vec![CellValue::Null; width];
        for (col, value) in &self.values {
            if value.is_empty() {
                continue;
            }
            if let Some(cell) = cells.get_mut(col - 1) {
                *cell = CellValue::String(value.clone());
            }
        }
        cells
    }
}

/// Rows produced by [`merge_rows`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub rows: Vec<NormalizedRow>,
    /// Source rows dropped because every key field was empty
    pub skipped: usize,
}

/// Knobs for one merge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeOptions {
    pub policy: ResolutionPolicy,
    /// A source row is kept when at least one of these fields is non-empty;
    /// an empty list keeps every row
    pub key_fields: Vec<String>,
    pub cleanups: CleanupRules,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            policy: ResolutionPolicy::default(),
            key_fields: vec!["姓名".to_string(), "身份证号".to_string()],
            cleanups: CleanupRules::none(),
        }
    }
}

/// Summary of a merge run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub written: usize,
    pub skipped: usize,
    /// Destination fields that had no source column and were left blank
    pub unresolved: Vec<String>,
}

fn cell_text(row: &[CellValue], column: Option<usize>) -> String {
    column
        .and_then(|col| row.get(col - 1))
        .map(normalize)
        .unwrap_or_default()
}

/// Map every data row of `source` (rows after the header) onto the
/// destination header.
///
/// `key_columns` are the source columns of the key fields; a row whose key
/// values are all empty is skipped without using an output slot. With no key
/// columns at all every row is kept.
#[must_use]
pub fn merge_rows(
    source: &Sheet,
    destination: &HeaderMap,
    resolution: &FieldResolutionMap,
    key_columns: &[Option<usize>],
    cleanups: &CleanupRules,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (idx, row) in source.rows().enumerate().skip(1) {
        let has_key = key_columns.is_empty()
            || key_columns
                .iter()
                .any(|col| !cell_text(row, *col).is_empty());
        if !has_key {
            tracing::debug!("Skipping source row {}: key fields empty", idx + 1);
            outcome.skipped += 1;
            continue;
        }

        let values = destination
            .iter()
            .map(|(field, dest_col)| {
                let value = cleanups.apply(field, cell_text(row, resolution.get(field)));
                (dest_col, value)
            })
            .collect();
        outcome.rows.push(NormalizedRow { values });
    }

    outcome
}

/// Replace the data rows of `destination` with the merged rows of `source`.
///
/// The destination's header row is kept; everything below it is cleared.
pub fn merge_into(
    source: &Sheet,
    destination: &mut Sheet,
    aliases: &AliasTable,
    options: &MergeOptions,
) -> Result<MergeReport> {
    let dest_header = HeaderMap::from_sheet(destination);
    if dest_header.is_empty() {
        return Err(CoreError::EmptyTemplateHeader);
    }
    let source_header = HeaderMap::from_sheet(source);

    let resolution =
        FieldResolutionMap::build(&dest_header, &source_header, aliases, &options.policy);
    let key_columns: Vec<Option<usize>> = options
        .key_fields
        .iter()
        .map(|field| resolve(field, &source_header, aliases))
        .collect();

    let outcome = merge_rows(
        source,
        &dest_header,
        &resolution,
        &key_columns,
        &options.cleanups,
    );

    let width = destination.row(0)?.len();
    destination.truncate_rows(1);
    for row in &outcome.rows {
        destination.row_append(row.to_cells(width))?;
    }

    tracing::info!(
        "Merged {} rows ({} skipped)",
        outcome.rows.len(),
        outcome.skipped
    );

    Ok(MergeReport {
        written: outcome.rows.len(),
        skipped: outcome.skipped,
        unresolved: resolution.unresolved().map(str::to_string).collect(),
    })
}

/// Merge the configured source spreadsheet into a copy of the template.
///
/// Both files must exist; the result is saved to the output path, never
/// over the template.
pub fn merge_files(config: &MergeConfig, aliases: &AliasTable) -> Result<MergeReport> {
    if !config.source.exists() {
        return Err(CoreError::SourceNotFound(config.source.clone()));
    }
    if !config.template.exists() {
        return Err(CoreError::TemplateNotFound(config.template.clone()));
    }
    if config.output == config.template {
        return Err(CoreError::OutputIsTemplate(config.output.clone()));
    }

    let source = Sheet::from_xlsx(&config.source)?;
    let mut destination = Sheet::from_xlsx(&config.template)?;
    let template_sheets = Sheet::xlsx_sheet_names(&config.template)?;
    if template_sheets.len() > 1 {
        tracing::warn!(
            "Template {} has {} sheets; only '{}' is merged and the others are not written to {}",
            config.template.display(),
            template_sheets.len(),
            destination.name(),
            config.output.display()
        );
    }

    let report = merge_into(&source, &mut destination, aliases, &config.options)?;
    destination.save_as_xlsx(&config.output)?;

    tracing::info!("Wrote {}", config.output.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> Sheet {
        Sheet::from_data(vec![
            vec!["学生姓名", "身份证号码", "联系电话", "转递编号"],
            vec!["张三", "110101200001010011", "13800138000", "A001"],
            vec!["", "", "13900139000", "A002"],
            vec!["李四", "", "", "A003"],
            vec!["", "110101200001010033", "", ""],
        ])
    }

    #[test]
    fn test_merge_rows_skips_rows_without_keys() {
        let source = source();
        let dest = HeaderMap::from_row(&[CellValue::from("姓名"), CellValue::from("身份证号")]);
        let src_header = HeaderMap::from_sheet(&source);
        let aliases = AliasTable::default();
        let resolution =
            FieldResolutionMap::build(&dest, &src_header, &aliases, &ResolutionPolicy::default());
        let keys = [
            resolve("姓名", &src_header, &aliases),
            resolve("身份证号", &src_header, &aliases),
        ];

        let outcome = merge_rows(&source, &dest, &resolution, &keys, &CleanupRules::none());

        assert_eq!(outcome.rows.len(), 3);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.rows[1].get(1), Some("李四"));
        assert_eq!(outcome.rows[1].get(2), Some(""));
        assert_eq!(outcome.rows[2].get(2), Some("110101200001010033"));
    }

    #[test]
    fn test_merge_rows_with_unresolved_key_columns_keeps_nothing() {
        let source = source();
        let dest = HeaderMap::from_row(&[CellValue::from("班级")]);
        let resolution = FieldResolutionMap::build(
            &dest,
            &HeaderMap::from_sheet(&source),
            &AliasTable::default(),
            &ResolutionPolicy::default(),
        );
        let outcome = merge_rows(&source, &dest, &resolution, &[None, None], &CleanupRules::none());
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.skipped, 4);
    }

    #[test]
    fn test_merge_into_without_key_fields_keeps_every_row() {
        let mut destination = Sheet::from_data(vec![vec!["姓名", "联系电话"]]);
        let options = MergeOptions {
            key_fields: Vec::new(),
            ..MergeOptions::default()
        };

        let report =
            merge_into(&source(), &mut destination, &AliasTable::default(), &options).unwrap();

        assert_eq!(report.written, 4);
        assert_eq!(report.skipped, 0);
        assert_eq!(destination.row_count(), 5);
        assert_eq!(destination.get(2, 1).unwrap(), &CellValue::from("13900139000"));
        assert_eq!(destination.get(2, 0).unwrap(), &CellValue::Null);
    }

    #[test]
    fn test_merge_into_follows_destination_order() {
        let mut destination = Sheet::from_data(vec![
            vec!["备注", "手机号码", "", "姓名", "转递编号"],
            vec!["old", "old", "old", "old", "old"],
        ]);

        let report = merge_into(
            &source(),
            &mut destination,
            &AliasTable::default(),
            &MergeOptions::default(),
        )
        .unwrap();

        assert_eq!(report.written, 3);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.unresolved, vec!["备注", "转递编号"]);

        assert_eq!(destination.row_count(), 4);
        let first = destination.row(1).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first[0], CellValue::Null);
        assert_eq!(first[1], CellValue::from("13800138000"));
        assert_eq!(first[2], CellValue::Null);
        assert_eq!(first[3], CellValue::from("张三"));
        // always blank even though the source has the column
        assert_eq!(first[4], CellValue::Null);
    }

    #[test]
    fn test_merge_into_rejects_empty_header() {
        let mut destination = Sheet::from_data(vec![vec!["", " "]]);
        let result = merge_into(
            &source(),
            &mut destination,
            &AliasTable::default(),
            &MergeOptions::default(),
        );
        assert!(matches!(result, Err(CoreError::EmptyTemplateHeader)));
    }

    #[test]
    fn test_merge_applies_configured_cleanups() {
        let source = Sheet::from_data(vec![
            vec!["姓名", "生源地"],
            vec!["张三", "杭州市上城区"],
        ]);
        let mut destination = Sheet::from_data(vec![vec!["姓名", "生源地名称"]]);
        let mut options = MergeOptions::default();
        options.cleanups = CleanupRules::documents();

        merge_into(&source, &mut destination, &AliasTable::default(), &options).unwrap();
        assert_eq!(destination.get(1, 1).unwrap(), &CellValue::from("杭州市"));
    }
}
