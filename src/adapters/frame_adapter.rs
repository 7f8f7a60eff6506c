//! Column-oriented price table.
//!
//! A [`PriceFrame`] stores one vector per field, the way tabular data usually
//! arrives from a dataframe or a columnar file. Converting it to rows is the
//! only thing the engine needs from it.

use crate::domain::error::TinytraderError;
use crate::domain::record::{FieldValue, PriceRecord};
use crate::ports::record_source::RecordSource;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceFrame {
    columns: Vec<(String, Vec<FieldValue>)>,
}

impl PriceFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column. Lengths are checked on conversion, not here.
    pub fn with_column<V: Into<FieldValue>>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        let values: Vec<FieldValue> = values.into_iter().map(Into::into).collect();
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((name.to_string(), values)),
        }
        self
    }

    /// Build a frame from a header and row-major cells, as read from a CSV file.
    pub fn from_rows(header: &[String], rows: Vec<Vec<FieldValue>>) -> Result<Self, TinytraderError> {
        let mut columns: Vec<(String, Vec<FieldValue>)> = header
            .iter()
            .map(|name| (name.clone(), Vec::with_capacity(rows.len())))
            .collect();
        for (line, row) in rows.into_iter().enumerate() {
            if row.len() != header.len() {
                return Err(TinytraderError::UnsupportedInputType {
                    reason: format!(
                        "row {line} has {} cells, header has {}",
                        row.len(),
                        header.len()
                    ),
                });
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.1.push(value);
            }
        }
        Ok(PriceFrame { columns })
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&[FieldValue]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Number of rows, or `None` when the columns disagree.
    pub fn height(&self) -> Option<usize> {
        let mut lengths = self.columns.iter().map(|(_, v)| v.len());
        let first = lengths.next().unwrap_or(0);
        lengths.all(|len| len == first).then_some(first)
    }
}

impl RecordSource for PriceFrame {
    fn to_records(&self) -> Result<Vec<PriceRecord>, TinytraderError> {
        let height = self.height().ok_or_else(|| TinytraderError::UnsupportedInputType {
            reason: "frame columns have different lengths".to_string(),
        })?;
        Ok((0..height)
            .map(|row| {
                self.columns
                    .iter()
                    .map(|(name, values)| (name.as_str(), values[row].clone()))
                    .collect::<PriceRecord>()
            })
            .collect())
    }
}
