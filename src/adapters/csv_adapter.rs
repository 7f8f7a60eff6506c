//! CSV file data adapter.
//!
//! Reads a headed CSV file into a [`PriceFrame`]. Cells stay as text; the
//! engine coerces prices only when it needs them.

use crate::adapters::frame_adapter::PriceFrame;
use crate::domain::error::TinytraderError;
use crate::domain::record::{FieldValue, PriceRecord};
use crate::ports::record_source::RecordSource;
use log::debug;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file as a frame, header names trimmed.
    pub fn load_frame(&self) -> Result<PriceFrame, TinytraderError> {
        let is_csv = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            return Err(TinytraderError::UnsupportedInputType {
                reason: format!("{} is not a .csv file", self.path.display()),
            });
        }

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;
        let header: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

        let mut rows: Vec<Vec<FieldValue>> = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(FieldValue::from).collect());
        }
        debug!("Read {} rows from {}", rows.len(), self.path.display());

        PriceFrame::from_rows(&header, rows)
    }
}

impl RecordSource for CsvAdapter {
    fn to_records(&self) -> Result<Vec<PriceRecord>, TinytraderError> {
        self.load_frame()?.to_records()
    }
}
