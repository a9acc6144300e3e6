use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One cell's worth of data.
///
/// The engine only understands this closed set of shapes; anything richer
/// must be projected into one of them by the column accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
#[serde(rename_all = "snake_case")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Date(DateTime<Utc>),
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// String coercion used by search and the string filter operators.
    ///
    /// Null coerces to the empty string, so a null cell never matches a
    /// non-empty query.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Date(d) => d.to_rfc3339(),
            CellValue::Null => String::new(),
        }
    }

    /// Numeric coercion used by the comparison operators.
    ///
    /// Text parses as f64, booleans map to 0/1 and dates to their epoch
    /// millisecond instant so range filters work across all three. Returns
    /// `None` when no meaningful number exists; the caller treats that row
    /// as failing the predicate rather than raising.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            CellValue::Number(_) => None,
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Date(d) => Some(d.timestamp_millis() as f64),
            CellValue::Null => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_text())
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(d: DateTime<Utc>) -> Self {
        CellValue::Date(d)
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
    use chrono::TimeZone;

    #[test]
    fn null_coerces_to_empty_string() {
        assert_eq!(CellValue::Null.display_text(), "");
    }

    #[test]
    fn integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(75000.0).display_text(), "75000");
        assert_eq!(CellValue::Number(0.5).display_text(), "0.5");
    }

    #[test]
    fn numeric_coercion_covers_text_bool_and_date() {
        assert_eq!(CellValue::from("  42 ").to_number(), Some(42.0));
        assert_eq!(CellValue::from("n/a").to_number(), None);
        assert_eq!(CellValue::Bool(true).to_number(), Some(1.0));
        assert_eq!(CellValue::Null.to_number(), None);

        let d = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            CellValue::Date(d).to_number(),
            Some(d.timestamp_millis() as f64)
        );
    }

    #[test]
    fn nan_has_no_numeric_value() {
        assert_eq!(CellValue::Number(f64::NAN).to_number(), None);
    }
}
