//! Cell value normalization and per-field cleanups.

use dossier_sheet::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Canonical string form of a cell.
///
/// Null becomes the empty string; anything else is stringified, trimmed, and
/// has embedded carriage returns and line feeds removed.
#[must_use]
pub fn normalize(value: &CellValue) -> String {
    if value.is_null() {
        return String::new();
    }
    normalize_text(&value.to_string())
}

/// [`normalize`] for text that is already a string
#[must_use]
pub fn normalize_text(text: &str) -> String {
    text.trim().chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

/// A cleanup applied to one field's normalized value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCleanup {
    /// Keep the parenthetical name: the text after the last `（` up to the
    /// first `）` following it. Values without both brackets pass through.
    Organization,
    /// Truncate through the last `市`. Values without it pass through.
    Place,
}

impl FieldCleanup {
    #[must_use]
    pub fn apply(self, value: &str) -> String {
        match self {
            FieldCleanup::Organization => {
                if !(value.contains('（') && value.contains('）')) {
                    return value.to_string();
                }
                let tail = value.rsplit('（').next().unwrap_or(value);
                tail.split('）').next().unwrap_or(tail).to_string()
            }
            FieldCleanup::Place => match value.rfind('市') {
                Some(idx) => value[..idx + '市'.len_utf8()].to_string(),
                None => value.to_string(),
            },
        }
    }
}

/// Canonical field → cleanup, applied after normalization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanupRules(IndexMap<String, FieldCleanup>);

impl CleanupRules {
    /// No cleanups
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Cleanups used for generated documents: employer and place of origin
    #[must_use]
    pub fn documents() -> Self {
        let mut rules = IndexMap::new();
        rules.insert("用人单位名称".to_string(), FieldCleanup::Organization);
        rules.insert("生源地名称".to_string(), FieldCleanup::Place);
        Self(rules)
    }

    pub fn insert(&mut self, field: &str, cleanup: FieldCleanup) {
        self.0.insert(field.to_string(), cleanup);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<FieldCleanup> {
        self.0.get(field).copied()
    }

    /// Apply the field's cleanup, if it has one
    #[must_use]
    pub fn apply(&self, field: &str, value: String) -> String {
        match self.get(field) {
            Some(cleanup) => cleanup.apply(&value),
            None => value,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_normalize_null_is_empty() {
        assert_eq!(normalize(&CellValue::Null), "");
    }

    #[test]
    fn test_normalize_trims_and_drops_line_breaks() {
        let value = CellValue::from("  浙江省\r\n杭州市 \n");
        assert_eq!(normalize(&value), "浙江省杭州市");
    }

    #[test]
    fn test_normalize_numbers_and_dates() {
        assert_eq!(normalize(&CellValue::Float(13_800_138_000.0)), "13800138000");
        assert_eq!(normalize(&CellValue::Float(1.5)), "1.5");
        assert_eq!(normalize(&CellValue::Int(42)), "42");
        assert_eq!(normalize(&CellValue::Bool(true)), "true");

        let dt = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(19, 40, 17)
            .unwrap();
        assert_eq!(normalize(&CellValue::DateTime(dt)), "2025-09-01 19:40:17");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["  a\r\nb  ", "\u{3000}张三\n", "\n \r x \n y", "", "   "] {
            let once = normalize_text(raw);
            assert_eq!(normalize_text(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_organization_cleanup() {
        let org = FieldCleanup::Organization;
        assert_eq!(org.apply("ABC Corp（简称ABC）"), "简称ABC");
        assert_eq!(org.apply("甲（乙）丙（丁）"), "丁");
        assert_eq!(org.apply("杭州某某有限公司"), "杭州某某有限公司");
        // half-width brackets are not cleaned
        assert_eq!(org.apply("ABC (Corp)"), "ABC (Corp)");
        // only the last opening bracket counts
        assert_eq!(org.apply("）前（后"), "后");
    }

    #[test]
    fn test_place_cleanup() {
        let place = FieldCleanup::Place;
        assert_eq!(place.apply("杭州市上城区"), "杭州市");
        assert_eq!(place.apply("浙江省宁波市慈溪市某镇"), "浙江省宁波市慈溪市");
        assert_eq!(place.apply("浙江省"), "浙江省");
        assert_eq!(place.apply(""), "");
    }

    #[test]
    fn test_cleanup_rules_apply_by_field() {
        let rules = CleanupRules::documents();
        assert_eq!(rules.apply("生源地名称", "杭州市上城区".to_string()), "杭州市");
        assert_eq!(rules.apply("姓名", "杭州市民".to_string()), "杭州市民");
        assert!(CleanupRules::none().is_empty());
    }
}
