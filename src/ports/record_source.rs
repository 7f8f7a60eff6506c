//! Record source port trait.
//!
//! Anything that can hand the engine an ordered list of raw rows implements
//! [`RecordSource`]. The engine never sees how the rows were stored.

use crate::domain::error::TinytraderError;
use crate::domain::record::PriceRecord;

pub trait RecordSource {
    /// Produce the rows in source order, field names and values unchanged.
    fn to_records(&self) -> Result<Vec<PriceRecord>, TinytraderError>;
}

impl RecordSource for [PriceRecord] {
    fn to_records(&self) -> Result<Vec<PriceRecord>, TinytraderError> {
        Ok(self.to_vec())
    }
}

impl RecordSource for Vec<PriceRecord> {
    fn to_records(&self) -> Result<Vec<PriceRecord>, TinytraderError> {
        self.as_slice().to_records()
    }
}

impl<const N: usize> RecordSource for [PriceRecord; N] {
    fn to_records(&self) -> Result<Vec<PriceRecord>, TinytraderError> {
        self.as_slice().to_records()
    }
}
