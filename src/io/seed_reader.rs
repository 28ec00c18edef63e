//! Synchronous CSV reader for wallet seed files
//!
//! Provides a streaming iterator over `id,balance` rows. Seed files are read
//! once at start-up, before any transfer runs, so a blocking reader is enough.
//!
//! # Error Handling
//!
//! - Fatal errors (file not found, I/O errors) are returned from `new()`
//! - Individual row errors are yielded as Err variants in the iterator
//! - Line numbers are included in error messages for debugging

use crate::io::csv_format::{convert_seed_record, WalletSeedRecord};
use crate::types::{MinorUnits, WalletId};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Synchronous wallet seed reader
#[derive(Debug)]
pub struct SeedReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl SeedReader {
    /// Open a seed file
    ///
    /// # Returns
    ///
    /// * `Ok(SeedReader)` if file opened successfully
    /// * `Err(String)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SeedReader {
    type Item = Result<(WalletId, MinorUnits), String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<WalletSeedRecord>();

        let row = deserializer.next()?;
        self.line_num += 1;
        // +1 for the header row
        let line = self.line_num + 1;

        Some(match row {
            Ok(record) => convert_seed_record(record).map_err(|e| format!("Line {}: {}", line, e)),
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
