//! Storage contracts for the wallet ledger
//!
//! The ledger does not own durability. It talks to a backing store through
//! these traits; the store's atomic unit is the durability and isolation
//! boundary, the in-process lock registry only keeps two local transfers
//! from racing on the same wallet before either reaches storage.

use async_trait::async_trait;

use crate::types::{LedgerError, Transaction, TransactionId, Wallet, WalletId};

/// A scoped sequence of storage operations that commits or rolls back as a whole
///
/// Writes made through a unit are invisible to other readers until
/// [`commit`](AtomicUnit::commit) succeeds. Dropping a unit without committing
/// discards everything it staged.
#[async_trait]
pub trait AtomicUnit: Send {
    /// Load a wallet, observing writes already staged in this unit
    async fn load(&mut self, id: WalletId) -> Result<Wallet, LedgerError>;

    /// Stage a new balance for an existing wallet
    async fn save(&mut self, wallet: &Wallet) -> Result<(), LedgerError>;

    /// Stage a transaction-log append
    async fn append(&mut self, transaction: &Transaction) -> Result<(), LedgerError>;

    /// Make every staged write visible at once
    async fn commit(self) -> Result<(), LedgerError>;

    /// Discard every staged write
    async fn rollback(self) -> Result<(), LedgerError>;
}

/// Durable storage of wallet balances
#[async_trait]
pub trait WalletStore: Send + Sync {
    /// The atomic unit type handed out by [`begin`](WalletStore::begin)
    type Unit: AtomicUnit + 'static;

    /// Open a new atomic unit
    async fn begin(&self) -> Result<Self::Unit, LedgerError>;

    /// Read the latest committed state of a wallet
    async fn get(&self, id: WalletId) -> Result<Wallet, LedgerError>;

    /// Provision a wallet; fails with `WalletExists` if the id is taken
    async fn insert(&self, wallet: Wallet) -> Result<(), LedgerError>;

    /// All provisioned wallets, in no particular order
    async fn list(&self) -> Result<Vec<Wallet>, LedgerError>;
}

/// Append-only durable storage of committed transfers
#[async_trait]
pub trait TransactionLog: Send + Sync {
    /// Append a record outside of any transfer (imports, history rebuilds)
    async fn append(&self, transaction: Transaction) -> Result<TransactionId, LedgerError>;

    /// Up to `limit` records, newest first
    ///
    /// Records sharing a timestamp come back in reverse commit order.
    async fn list_recent(&self, limit: usize) -> Result<Vec<Transaction>, LedgerError>;
}
