//! Transfer orchestration
//!
//! `WalletLedger` moves value between wallets as one atomic unit spanning the
//! wallet balances and the transaction log.
//!
//! # Transfer protocol
//!
//! ```text
//! validate (no I/O) → lock both wallets (canonical order) → begin unit
//!     → load from, check funds → load to → save both → append record
//!     → commit → release locks
//! ```
//!
//! Any failure before commit rolls the unit back; the lock guards are dropped
//! on every exit path, including panics. A transfer either writes exactly one
//! balance pair and one record, or nothing.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::cancel::cancellable;
use super::lock_registry::LockRegistry;
use super::traits::{AtomicUnit, WalletStore};
use crate::config::LedgerConfig;
use crate::types::{LedgerError, MinorUnits, Transaction, Wallet, WalletId};

/// Wallet ledger over a backing store
///
/// Cheap to share: wrap it in an `Arc` and call it from as many tasks as
/// needed. Transfers on disjoint wallet pairs run fully in parallel.
#[derive(Debug)]
pub struct WalletLedger<S> {
    store: Arc<S>,
    locks: LockRegistry,
    config: LedgerConfig,
}

impl<S: WalletStore> WalletLedger<S> {
    /// Create a ledger over `store`
    pub fn new(store: Arc<S>, config: LedgerConfig) -> Self {
        Self {
            store,
            locks: LockRegistry::new(),
            config,
        }
    }

    /// The backing store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// The active configuration
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Transfer `amount` minor units from one wallet to another
    ///
    /// # Returns
    ///
    /// * `Ok(Transaction)` - The committed transfer record
    /// * `Err(LedgerError::InvalidArgument)` - Self-transfer, zero amount or amount above `max_transfer`
    /// * `Err(LedgerError::WalletNotFound)` - Either wallet does not exist
    /// * `Err(LedgerError::InsufficientFunds)` - The debited wallet cannot cover the amount
    /// * `Err(LedgerError::CommitFailed)` - The unit could not be committed; nothing was written
    /// * `Err(LedgerError::Cancelled)` - The token fired during a lock wait or before commit
    pub async fn send_money(
        &self,
        from: WalletId,
        to: WalletId,
        amount: MinorUnits,
        cancel: &CancellationToken,
    ) -> Result<Transaction, LedgerError> {
        self.validate_transfer(from, to, amount)?;

        let _guard = self.locks.acquire_pair(from, to, cancel).await?;
        let mut unit = cancellable(cancel, self.store.begin()).await?;

        let staged = self.stage_transfer(&mut unit, from, to, amount, cancel).await;
        let transaction = match staged {
            Ok(transaction) if !cancel.is_cancelled() => transaction,
            outcome => {
                let error = outcome.err().unwrap_or(LedgerError::Cancelled);
                if let Err(rollback) = unit.rollback().await {
                    tracing::warn!(%from, %to, error = %rollback, "rollback failed");
                }
                tracing::debug!(%from, %to, amount, %error, "transfer rejected");
                return Err(error);
            }
        };

        // Past this point the commit runs to completion regardless of cancellation.
        unit.commit()
            .await
            .map_err(LedgerError::into_commit_failure)?;

        tracing::info!(
            tx = %transaction.id,
            %from,
            %to,
            amount,
            "transfer committed"
        );
        Ok(transaction)
    }

    /// Current balance of a wallet
    ///
    /// Reads the latest committed state without taking the wallet lock.
    pub async fn get_balance(&self, wallet: WalletId) -> Result<MinorUnits, LedgerError> {
        Ok(self.store.get(wallet).await?.balance)
    }

    /// Provision a new wallet with a zero balance
    pub async fn create_wallet(&self) -> Result<WalletId, LedgerError> {
        let id = Uuid::new_v4();
        self.store.insert(Wallet::new(id)).await?;
        tracing::debug!(wallet = %id, "wallet created");
        Ok(id)
    }

    /// Provision a wallet holding a seeded balance
    pub async fn seed_wallet(
        &self,
        wallet: WalletId,
        balance: MinorUnits,
    ) -> Result<(), LedgerError> {
        self.store
            .insert(Wallet::with_balance(wallet, balance))
            .await?;
        tracing::debug!(%wallet, balance, "wallet seeded");
        Ok(())
    }

    /// First-launch seeding of `count` wallets holding `balance` each
    ///
    /// Idempotent: when any wallet already exists the store counts as
    /// initialized and the existing identifiers are returned unchanged.
    pub async fn initialize_wallets(
        &self,
        count: usize,
        balance: MinorUnits,
    ) -> Result<Vec<WalletId>, LedgerError> {
        let existing = self.store.list().await?;
        if !existing.is_empty() {
            tracing::info!(wallets = existing.len(), "wallets already initialized");
            return Ok(existing.into_iter().map(|wallet| wallet.id).collect());
        }

        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = Uuid::new_v4();
            self.seed_wallet(id, balance).await?;
            ids.push(id);
        }

        tracing::info!(wallets = count, balance, "wallets initialized");
        Ok(ids)
    }

    /// All provisioned wallets
    pub async fn list_wallets(&self) -> Result<Vec<Wallet>, LedgerError> {
        self.store.list().await
    }

    /// Sum of every wallet balance
    ///
    /// Transfers never change this value.
    pub async fn total_balance(&self) -> Result<u128, LedgerError> {
        Ok(self
            .store
            .list()
            .await?
            .iter()
            .map(|wallet| u128::from(wallet.balance))
            .sum())
    }

    fn validate_transfer(
        &self,
        from: WalletId,
        to: WalletId,
        amount: MinorUnits,
    ) -> Result<(), LedgerError> {
        if from == to {
            return Err(LedgerError::invalid_argument(
                "cannot send money to the same wallet",
            ));
        }
        if amount == 0 || amount > self.config.max_transfer {
            return Err(LedgerError::InvalidArgument {
                reason: format!(
                    "amount must be between 1 and {} minor units, got {}",
                    self.config.max_transfer, amount
                ),
            });
        }
        Ok(())
    }

    async fn stage_transfer(
        &self,
        unit: &mut S::Unit,
        from: WalletId,
        to: WalletId,
        amount: MinorUnits,
        cancel: &CancellationToken,
    ) -> Result<Transaction, LedgerError> {
        let mut sender = cancellable(cancel, unit.load(from)).await?;
        if sender.balance < amount {
            return Err(LedgerError::insufficient_funds(
                from,
                sender.balance,
                amount,
            ));
        }

        let mut receiver = cancellable(cancel, unit.load(to)).await?;

        sender.balance -= amount;
        receiver.balance = receiver
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow(to))?;

        cancellable(cancel, unit.save(&sender)).await?;
        cancellable(cancel, unit.save(&receiver)).await?;

        let transaction = Transaction::new(from, to, amount);
        cancellable(cancel, unit.append(&transaction)).await?;

        Ok(transaction)
    }
}
