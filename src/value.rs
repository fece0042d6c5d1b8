//! Conversions between template [`Value`]s and the typed inputs and outputs
//! of the helpers.

use crate::archive::{ArchiveYear, Dated};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use gtmpl_value::{Number, Value};
use std::collections::HashMap;
use std::fmt;

/// A template value that carries a parsed `date` field. Archiving these keeps
/// the original value so templates get back exactly what they passed in.
#[derive(Clone, Debug)]
pub struct DatedValue<'a> {
    pub date: DateTime<FixedOffset>,
    pub value: &'a Value,
}

impl Dated for DatedValue<'_> {
    fn date(&self) -> DateTime<FixedOffset> {
        self.date
    }
}

impl<'a> DatedValue<'a> {
    /// Reads the `date` field of an object or map value.
    pub fn from_value(value: &'a Value) -> Option<DatedValue<'a>> {
        let fields = match value {
            Value::Object(fields) | Value::Map(fields) => fields,
            _ => return None,
        };
        match fields.get("date") {
            Some(Value::String(date)) => Some(DatedValue {
                date: parse_date(date)?,
                value,
            }),
            _ => None,
        }
    }
}

impl From<&ArchiveYear<&DatedValue<'_>>> for Value {
    /// Converts an archive bucket into `{ year, postList }`.
    fn from(bucket: &ArchiveYear<&DatedValue<'_>>) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("year".to_owned(), Value::from(bucket.year as i64));
        m.insert(
            "postList".to_owned(),
            Value::Array(bucket.post_list.iter().map(|p| p.value.clone()).collect()),
        );
        Value::Object(m)
    }
}

/// Parses a post date. Accepts RFC 3339 timestamps as well as
/// `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD`, which are taken to be UTC.
pub fn parse_date(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date);
    }
    let naive = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    Some(FixedOffset::east_opt(0)?.from_utc_datetime(&naive))
}

/// Mirrors template truthiness: nil, `false`, zero, NaN, and empty strings,
/// arrays, and maps are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::NoValue | Value::Nil => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(m) | Value::Map(m) => !m.is_empty(),
        Value::Number(n) => as_f64(n).map_or(true, |f| f != 0.0 && !f.is_nan()),
        _ => true,
    }
}

// `Number::as_f64` only answers for floats, so integers are widened here.
fn as_f64(n: &Number) -> Option<f64> {
    n.as_i64()
        .map(|i| i as f64)
        .or_else(|| n.as_u64().map(|u| u as f64))
        .or_else(|| n.as_f64())
}

/// Reads a post count. Fractions are truncated; negative, non-finite and
/// non-numeric values read as zero. Numeric strings are parsed.
pub fn as_count(value: &Value) -> u64 {
    let count = match value {
        Value::Number(n) => match n.as_u64() {
            Some(u) => return u,
            None => as_f64(n),
        },
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    count
        .filter(|f| f.is_finite() && *f > 0.0)
        .map_or(0, |f| f as u64)
}

/// Renders a scalar value as text the way templates print it. Integral
/// floats drop their fraction; nil, maps and arrays read as `""`.
pub fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (None, Some(u), _) => u.to_string(),
            (None, None, Some(f)) if f.is_finite() && f.fract() == 0.0 => {
                format!("{:.0}", f)
            }
            (None, None, Some(f)) => f.to_string(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

/// Reads a single value or an array of values as a list of texts.
pub fn as_texts(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().map(as_text).collect(),
        other => vec![as_text(other)],
    }
}

/// Describes a helper argument that had the wrong shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    /// The zero-based position of the argument.
    pub index: usize,

    /// What the helper wanted there.
    pub expected: &'static str,
}

impl fmt::Display for ArgumentError {
    /// Displays an [`ArgumentError`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "argument {}: expected {}", self.index, self.expected)
    }
}

impl std::error::Error for ArgumentError {}

/// Positional access to a helper's arguments. Missing trailing arguments read
/// as nil.
pub struct Args<'a>(&'a [Value]);

impl<'a> Args<'a> {
    pub fn new(args: &'a [Value]) -> Self {
        Args(args)
    }

    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.0.get(index).filter(|v| !matches!(v, Value::Nil | Value::NoValue))
    }

    /// A string argument; anything else reads as `""`.
    pub fn str_or_empty(&self, index: usize) -> &'a str {
        match self.get(index) {
            Some(Value::String(s)) => s.as_str(),
            _ => "",
        }
    }

    /// A value or array of values as text. A missing argument is an empty
    /// list.
    pub fn texts(&self, index: usize) -> Vec<String> {
        self.get(index).map(as_texts).unwrap_or_default()
    }

    /// A post count; see [`as_count`]. A missing argument reads as zero.
    pub fn count(&self, index: usize) -> u64 {
        self.get(index).map_or(0, as_count)
    }

    /// A required array of dated posts.
    pub fn posts(&self, index: usize) -> Result<Vec<DatedValue<'a>>, ArgumentError> {
        let err = ArgumentError {
            index,
            expected: "an array of posts with a `date`",
        };
        match self.get(index) {
            Some(Value::Array(items)) => items
                .iter()
                .map(DatedValue::from_value)
                .collect::<Option<Vec<_>>>()
                .ok_or(err),
            None => Ok(Vec::new()),
            _ => Err(err),
        }
    }
}
