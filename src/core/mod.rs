//! Core business logic module
//!
//! This module contains the wallet ledger components:
//! - `traits` - Storage contracts (wallet store, atomic unit, transaction log)
//! - `lock_registry` - Per-wallet mutual exclusion with canonical lock ordering
//! - `ledger` - Transfer orchestration, balances and provisioning
//! - `reader` - Bounded-parallel retrieval of recent transactions
//! - `memory_store` - In-process implementation of the storage contracts
//! - `cancel` - Deadline and cancellation helpers

pub mod cancel;
pub mod ledger;
pub mod lock_registry;
pub mod memory_store;
pub mod reader;
pub mod traits;

pub use cancel::{cancellable, deadline};
pub use ledger::WalletLedger;
pub use lock_registry::{LockRegistry, PairGuard, WalletGuard};
pub use memory_store::{MemoryStore, MemoryUnit};
pub use reader::TransactionReader;
pub use traits::{AtomicUnit, TransactionLog, WalletStore};
