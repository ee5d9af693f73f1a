use chrono::NaiveDateTime;
use std::fmt;

/// Represents a cell value in a sheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Check if the value is null
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Get the value as a string.
    ///
    /// Integral floats print without a fractional part, so numbers typed into
    /// a spreadsheet as identifiers (phone numbers, postcodes) keep their
    /// digits-only form.
    #[must_use]
    pub fn as_str(&self) -> String {
        self.to_string()
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_integral_float_prints_without_fraction() {
        assert_eq!(CellValue::Float(13_800_138_000.0).as_str(), "13800138000");
        assert_eq!(CellValue::Float(2.5).as_str(), "2.5");
        assert_eq!(CellValue::Int(42).as_str(), "42");
    }

    #[test]
    fn test_null_is_empty_string() {
        assert!(CellValue::Null.is_null());
        assert_eq!(CellValue::Null.as_str(), "");
        assert_eq!(CellValue::from(None::<&str>), CellValue::Null);
    }

    #[test]
    fn test_datetime_display() {
        let dt = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_opt(19, 40, 17)
            .unwrap();
        assert_eq!(CellValue::from(dt).as_str(), "2025-09-01 19:40:17");
    }
}
