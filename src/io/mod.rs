//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, output serialization)
//! - `seed_reader` - Synchronous wallet seed reader with iterator interface
//! - `async_reader` - Asynchronous transfer request reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod seed_reader;

pub use async_reader::TransferReader;
pub use csv_format::{
    convert_seed_record, convert_transfer_record, write_balances_csv, write_transactions_csv,
    TransferRecord, TransferRequest, WalletSeedRecord,
};
pub use seed_reader::SeedReader;
