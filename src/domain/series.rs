//! Date-range filtering and chronological ordering.
//!
//! Timestamps are compared as strings, so callers must use a zero-padded,
//! fixed-width format (`2022-01-01`, `2022-01-01 09:30:00`).

use super::error::TinytraderError;
use super::record::{CLOSE_FIELD, PriceRecord};

/// An in-range, ascending series of bars. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    records: Vec<PriceRecord>,
    dates: Vec<String>,
}

impl Series {
    /// Keep records with `start <= date <= end` and sort them by date.
    ///
    /// The sort is stable: records sharing a timestamp keep their input order.
    pub fn from_records(
        records: Vec<PriceRecord>,
        start: &str,
        end: &str,
    ) -> Result<Self, TinytraderError> {
        let mut kept: Vec<(String, PriceRecord)> = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            let date = record
                .date()
                .ok_or(TinytraderError::MissingDate { index })?;
            if start <= date.as_str() && date.as_str() <= end {
                kept.push((date, record));
            }
        }

        if kept.is_empty() {
            return Err(TinytraderError::EmptySeries {
                start: start.to_string(),
                end: end.to_string(),
            });
        }

        kept.sort_by(|a, b| a.0.cmp(&b.0));
        let (dates, records): (Vec<String>, Vec<PriceRecord>) = kept.into_iter().unzip();
        Ok(Series { records, dates })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PriceRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Timestamp string of bar `index`.
    ///
    /// Panics if `index` is out of bounds.
    pub fn date_at(&self, index: usize) -> &str {
        &self.dates[index]
    }

    /// `field` of bar `index` as a price. An out-of-range index reports as a missing field.
    pub fn price_at(&self, index: usize, field: &str) -> Result<f64, TinytraderError> {
        match self.records.get(index) {
            Some(record) => record.price(field, index),
            None => Err(TinytraderError::InvalidPrice {
                index,
                field: field.to_string(),
                value: None,
            }),
        }
    }

    pub fn close_at(&self, index: usize) -> Result<f64, TinytraderError> {
        self.price_at(index, CLOSE_FIELD)
    }

    pub fn last_index(&self) -> usize {
        self.records.len() - 1
    }
}
