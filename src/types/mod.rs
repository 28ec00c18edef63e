//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `wallet`: Wallet state and identifiers
//! - `transaction`: Transfer records and identifiers
//! - `error`: Error types for the wallet ledger

pub mod error;
pub mod transaction;
pub mod wallet;

pub use error::{ErrorKind, LedgerError};
pub use transaction::{Transaction, TransactionId};
pub use wallet::{MinorUnits, Wallet, WalletId};
