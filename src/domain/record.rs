//! Raw price records as they arrive from a data source.
//!
//! Field names and values are kept exactly as supplied. Coercion to `f64`
//! only happens when a component asks for a price.

use std::collections::BTreeMap;
use std::fmt;

use super::error::TinytraderError;

pub const DATE_FIELD: &str = "date";
pub const CLOSE_FIELD: &str = "close";

/// A single cell: either the text a source produced or a number.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
}

impl FieldValue {
    /// Numeric value, parsing text with surrounding whitespace ignored.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            // Integral numbers keep a trailing ".0" so a numeric date such as
            // 20220102.0 reads the same as when it was written.
            FieldValue::Number(n) if n.is_nan() => f.write_str("nan"),
            FieldValue::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 => {
                write!(f, "{n:.1}")
            }
            FieldValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// One bar of OHLCV data keyed by field name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl PriceRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
        self.fields.insert(field.to_string(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The timestamp rendered as a string, the form used for range checks and ordering.
    pub fn date(&self) -> Option<String> {
        self.get(DATE_FIELD).map(|v| v.to_string())
    }

    /// Coerce `field` to a price. Only finite values above zero are prices.
    /// `index` is only used for error reporting.
    pub fn price(&self, field: &str, index: usize) -> Result<f64, TinytraderError> {
        let value = self.get(field).ok_or_else(|| TinytraderError::InvalidPrice {
            index,
            field: field.to_string(),
            value: None,
        })?;
        value
            .as_f64()
            .filter(|p| is_valid_price(*p))
            .ok_or_else(|| TinytraderError::InvalidPrice {
                index,
                field: field.to_string(),
                value: Some(value.to_string()),
            })
    }
}

/// Finite and strictly positive. A zero price would buy infinite units or
/// sell into zero cash.
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

impl<K: AsRef<str>, V: Into<FieldValue>> FromIterator<(K, V)> for PriceRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = PriceRecord::new();
        for (k, v) in iter {
            record.insert(k.as_ref(), v);
        }
        record
    }
}
