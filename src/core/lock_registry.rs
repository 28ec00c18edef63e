//! Per-wallet mutual exclusion for the transfer path
//!
//! The `LockRegistry` lazily materializes one async mutex per wallet
//! identifier and hands out owned guards. Entries are never evicted: the
//! wallet population is bounded and long-lived, so the map only grows with
//! the number of distinct wallets ever transferred from or to.
//!
//! # Lock ordering
//!
//! A transfer always touches two wallets. [`LockRegistry::acquire_pair`]
//! takes both locks in ascending identifier order, never in argument order.
//! With every transfer following the same total order, A→B and B→A running
//! concurrently cannot each hold one lock while waiting on the other. This is
//! a correctness requirement of the ledger: acquiring "from, then to" deadlocks.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;

use crate::types::{LedgerError, WalletId};

/// Exclusive hold on one wallet; released on drop
pub type WalletGuard = OwnedMutexGuard<()>;

/// Exclusive hold on the two wallets of a transfer; both released on drop
#[derive(Debug)]
pub struct PairGuard {
    _first: WalletGuard,
    _second: WalletGuard,
}

/// Process-local registry of per-wallet mutexes
#[derive(Debug, Default)]
pub struct LockRegistry {
    /// Lazily created mutex per wallet
    ///
    /// DashMap's entry API holds the shard lock across check-and-insert, so
    /// two first-time acquirers of the same id always end up sharing one mutex.
    locks: DashMap<WalletId, Arc<Mutex<()>>>,
}

impl LockRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// The mutex guarding `wallet`, created on first use
    pub fn handle(&self, wallet: WalletId) -> Arc<Mutex<()>> {
        if let Some(existing) = self.locks.get(&wallet) {
            return Arc::clone(existing.value());
        }

        let entry = self
            .locks
            .entry(wallet)
            .or_insert_with(|| Arc::new(Mutex::new(())));
        Arc::clone(entry.value())
    }

    /// Wait for exclusive access to `wallet`
    ///
    /// Returns `Cancelled` if the token fires while waiting.
    pub async fn acquire(
        &self,
        wallet: WalletId,
        cancel: &CancellationToken,
    ) -> Result<WalletGuard, LedgerError> {
        let lock = self.handle(wallet);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LedgerError::Cancelled),
            guard = lock.lock_owned() => Ok(guard),
        }
    }

    /// Wait for exclusive access to both wallets, in canonical order
    ///
    /// `a` and `b` must differ; acquiring the same tokio mutex twice would
    /// never complete. If cancellation interrupts the second wait, the first
    /// guard is dropped before returning.
    pub async fn acquire_pair(
        &self,
        a: WalletId,
        b: WalletId,
        cancel: &CancellationToken,
    ) -> Result<PairGuard, LedgerError> {
        if a == b {
            return Err(LedgerError::invalid_argument(
                "cannot lock the same wallet twice",
            ));
        }

        let (low, high) = if a < b { (a, b) } else { (b, a) };
        let first = self.acquire(low, cancel).await?;
        let second = self.acquire(high, cancel).await?;

        Ok(PairGuard {
            _first: first,
            _second: second,
        })
    }

    /// Number of wallets that have a materialized mutex
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Whether no mutex has been materialized yet
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
