//! In-process backing store
//!
//! `MemoryStore` implements the wallet store and transaction log contracts
//! over a single `RwLock`-protected state. An atomic unit stages its writes
//! privately and applies them all under one write lock at commit, so balances
//! and the log entry of a transfer become visible together or not at all.
//!
//! Cloning a `MemoryStore` yields another handle on the same state.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use super::traits::{AtomicUnit, TransactionLog, WalletStore};
use crate::types::{LedgerError, MinorUnits, Transaction, TransactionId, Wallet, WalletId};

#[derive(Debug, Default)]
struct MemoryState {
    wallets: HashMap<WalletId, MinorUnits>,
    /// Committed transfers in commit order
    transactions: Vec<Transaction>,
}

/// Shared in-memory wallet store and transaction log
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed transactions
    pub fn transaction_count(&self) -> usize {
        self.state.read().transactions.len()
    }
}

/// Atomic unit over a [`MemoryStore`]
#[derive(Debug)]
pub struct MemoryUnit {
    state: Arc<RwLock<MemoryState>>,
    staged_wallets: HashMap<WalletId, MinorUnits>,
    staged_transactions: Vec<Transaction>,
}

#[async_trait]
impl AtomicUnit for MemoryUnit {
    async fn load(&mut self, id: WalletId) -> Result<Wallet, LedgerError> {
        if let Some(balance) = self.staged_wallets.get(&id) {
            return Ok(Wallet::with_balance(id, *balance));
        }

        let state = self.state.read();
        state
            .wallets
            .get(&id)
            .map(|balance| Wallet::with_balance(id, *balance))
            .ok_or_else(|| LedgerError::wallet_not_found(id))
    }

    async fn save(&mut self, wallet: &Wallet) -> Result<(), LedgerError> {
        if !self.staged_wallets.contains_key(&wallet.id)
            && !self.state.read().wallets.contains_key(&wallet.id)
        {
            return Err(LedgerError::wallet_not_found(wallet.id));
        }

        self.staged_wallets.insert(wallet.id, wallet.balance);
        Ok(())
    }

    async fn append(&mut self, transaction: &Transaction) -> Result<(), LedgerError> {
        self.staged_transactions.push(transaction.clone());
        Ok(())
    }

    async fn commit(self) -> Result<(), LedgerError> {
        let mut state = self.state.write();

        // Validate everything before the first write so a failed commit changes nothing.
        if let Some(missing) = self
            .staged_wallets
            .keys()
            .find(|id| !state.wallets.contains_key(*id))
        {
            return Err(LedgerError::commit_failed(&format!(
                "wallet {} disappeared before commit",
                missing
            )));
        }

        for (id, balance) in self.staged_wallets {
            state.wallets.insert(id, balance);
        }
        state.transactions.extend(self.staged_transactions);
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        Ok(())
    }
}

#[async_trait]
impl WalletStore for MemoryStore {
    type Unit = MemoryUnit;

    async fn begin(&self) -> Result<MemoryUnit, LedgerError> {
        Ok(MemoryUnit {
            state: Arc::clone(&self.state),
            staged_wallets: HashMap::new(),
            staged_transactions: Vec::new(),
        })
    }

    async fn get(&self, id: WalletId) -> Result<Wallet, LedgerError> {
        self.state
            .read()
            .wallets
            .get(&id)
            .map(|balance| Wallet::with_balance(id, *balance))
            .ok_or_else(|| LedgerError::wallet_not_found(id))
    }

    async fn insert(&self, wallet: Wallet) -> Result<(), LedgerError> {
        let mut state = self.state.write();
        if state.wallets.contains_key(&wallet.id) {
            return Err(LedgerError::wallet_exists(wallet.id));
        }
        state.wallets.insert(wallet.id, wallet.balance);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Wallet>, LedgerError> {
        Ok(self
            .state
            .read()
            .wallets
            .iter()
            .map(|(id, balance)| Wallet::with_balance(*id, *balance))
            .collect())
    }
}

#[async_trait]
impl TransactionLog for MemoryStore {
    async fn append(&self, transaction: Transaction) -> Result<TransactionId, LedgerError> {
        let id = transaction.id;
        self.state.write().transactions.push(transaction);
        Ok(id)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<Transaction>, LedgerError> {
        let state = self.state.read();
        let mut recent: Vec<Transaction> = state.transactions.iter().rev().cloned().collect();
        // Stable sort: equal timestamps keep reverse commit order.
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(limit);
        Ok(recent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    async fn store_with(balances: &[MinorUnits]) -> (MemoryStore, Vec<WalletId>) {
        let store = MemoryStore::new();
        let mut ids = Vec::new();
        for balance in balances {
            let id = Uuid::new_v4();
            store
                .insert(Wallet::with_balance(id, *balance))
                .await
                .unwrap();
            ids.push(id);
        }
        (store, ids)
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_id() {
        let (store, ids) = store_with(&[100]).await;

        let result = store.insert(Wallet::new(ids[0])).await;
        assert_eq!(result, Err(LedgerError::wallet_exists(ids[0])));
        assert_eq!(store.get(ids[0]).await.unwrap().balance, 100);
    }

    #[tokio::test]
    async fn test_get_unknown_wallet() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();
        assert_eq!(store.get(id).await, Err(LedgerError::wallet_not_found(id)));
    }

    #[tokio::test]
    async fn test_unit_writes_invisible_until_commit() {
        let (store, ids) = store_with(&[1000, 500]).await;

        let mut unit = store.begin().await.unwrap();
        unit.save(&Wallet::with_balance(ids[0], 700)).await.unwrap();
        unit.append(&Transaction::new(ids[0], ids[1], 300))
            .await
            .unwrap();

        // Staged write is visible inside the unit only.
        assert_eq!(unit.load(ids[0]).await.unwrap().balance, 700);
        assert_eq!(store.get(ids[0]).await.unwrap().balance, 1000);
        assert_eq!(store.transaction_count(), 0);

        unit.commit().await.unwrap();
        assert_eq!(store.get(ids[0]).await.unwrap().balance, 700);
        assert_eq!(store.transaction_count(), 1);
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_writes() {
        let (store, ids) = store_with(&[1000]).await;

        let mut unit = store.begin().await.unwrap();
        unit.save(&Wallet::with_balance(ids[0], 1)).await.unwrap();
        unit.rollback().await.unwrap();

        assert_eq!(store.get(ids[0]).await.unwrap().balance, 1000);
    }

    #[tokio::test]
    async fn test_dropped_unit_discards_staged_writes() {
        let (store, ids) = store_with(&[1000]).await;

        {
            let mut unit = store.begin().await.unwrap();
            unit.save(&Wallet::with_balance(ids[0], 1)).await.unwrap();
        }

        assert_eq!(store.get(ids[0]).await.unwrap().balance, 1000);
    }

    #[tokio::test]
    async fn test_save_unknown_wallet_fails() {
        let store = MemoryStore::new();
        let id = Uuid::new_v4();

        let mut unit = store.begin().await.unwrap();
        let result = unit.save(&Wallet::new(id)).await;
        assert_eq!(result, Err(LedgerError::wallet_not_found(id)));
    }

    #[tokio::test]
    async fn test_list_recent_newest_first_with_commit_order_ties() {
        let store = MemoryStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let oldest = Transaction::at(a, b, 1, base);
        let tie_first = Transaction::at(a, b, 2, base + Duration::seconds(1));
        let tie_second = Transaction::at(a, b, 3, base + Duration::seconds(1));

        TransactionLog::append(&store, tie_first.clone()).await.unwrap();
        TransactionLog::append(&store, oldest.clone()).await.unwrap();
        TransactionLog::append(&store, tie_second.clone()).await.unwrap();

        let recent = store.list_recent(10).await.unwrap();
        assert_eq!(recent, vec![tie_second, tie_first, oldest]);

        let limited = store.list_recent(1).await.unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].amount, 3);
    }
}
