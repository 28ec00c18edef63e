//! Wallet Ledger Library
//! # Overview
//!
//! A concurrent ledger of wallet balances. Transfers between two wallets are
//! atomic, serialized per wallet pair, and deadlock-free; the most recent
//! transactions can be read through a bounded pool of workers.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Wallet, Transaction, LedgerError)
//! - [`config`] - Ledger configuration
//! - [`core`] - Business logic components:
//!   - [`core::lock_registry`] - One lock per wallet, pairs taken in canonical order
//!   - [`core::ledger`] - Transfers, balances and wallet provisioning
//!   - [`core::reader`] - Bounded-parallel recent-transaction reads
//!   - [`core::memory_store`] - In-memory wallet store and transaction log
//! - [`facade`] - External representations (decimal amounts, string ids, status codes)
//! - [`io`] - CSV input and output
//! - [`scenario`] - Runnable replay and simulation pipelines
//! - [`cli`] - CLI argument parsing
//! - [`logging`] - Tracing subscriber setup
//!
//! # Transfer Rules
//!
//! - The amount must be positive and no larger than the configured ceiling
//! - A wallet cannot send money to itself
//! - The sender must hold at least the amount; balances never go negative
//! - Debit, credit and the transaction record commit together or not at all

// Module declarations
pub mod cli;
pub mod config;
pub mod core;
pub mod facade;
pub mod io;
pub mod logging;
pub mod scenario;
pub mod types;

pub use config::LedgerConfig;
pub use core::{MemoryStore, TransactionReader, WalletLedger};
pub use facade::WalletFacade;
pub use types::{
    ErrorKind, LedgerError, MinorUnits, Transaction, TransactionId, Wallet, WalletId,
};
