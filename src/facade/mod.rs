//! Application facade
//!
//! Translates external representations (string identifiers, decimal amounts)
//! into the ledger's internal ones (UUIDs, integer minor units) and back, and
//! maps ledger errors to transport-level status codes. Transports (HTTP,
//! CLI) sit on top of this and never touch minor units directly.

pub mod money;

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::{TransactionLog, TransactionReader, WalletLedger, WalletStore};
use crate::types::{ErrorKind, LedgerError, Transaction, Wallet, WalletId};

pub use money::{balance_to_minor_units, from_minor_units, to_minor_units};

/// Rendering format for transaction timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Externally rendered transaction
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionView {
    pub id: String,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub created_at: String,
}

impl From<&Transaction> for TransactionView {
    fn from(tx: &Transaction) -> Self {
        TransactionView {
            id: tx.id.to_string(),
            from: tx.from.to_string(),
            to: tx.to.to_string(),
            amount: from_minor_units(tx.amount),
            created_at: tx.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Externally rendered wallet
#[derive(Debug, Clone, PartialEq)]
pub struct WalletView {
    pub id: String,
    pub balance: Decimal,
}

impl From<&Wallet> for WalletView {
    fn from(wallet: &Wallet) -> Self {
        WalletView {
            id: wallet.id.to_string(),
            balance: from_minor_units(wallet.balance),
        }
    }
}

/// Parse an external wallet identifier
pub fn parse_wallet_id(raw: &str) -> Result<WalletId, LedgerError> {
    Uuid::parse_str(raw.trim()).map_err(|e| LedgerError::InvalidArgument {
        reason: format!("invalid wallet ID '{}': {}", raw, e),
    })
}

/// Map a ledger error to an HTTP-style status code
pub fn status_code(error: &LedgerError) -> u16 {
    match error.kind() {
        ErrorKind::InvalidArgument => 400,
        ErrorKind::NotFound => 404,
        ErrorKind::Conflict => 409,
        ErrorKind::InsufficientFunds => 422,
        ErrorKind::Cancelled => 499,
        ErrorKind::Internal => 500,
    }
}

/// Facade over a ledger and a reader sharing one store
#[derive(Debug)]
pub struct WalletFacade<S> {
    ledger: Arc<WalletLedger<S>>,
    reader: TransactionReader<S>,
}

impl<S: WalletStore + TransactionLog> WalletFacade<S> {
    /// Create a facade; the reader shares the ledger's store and configuration
    pub fn new(ledger: Arc<WalletLedger<S>>) -> Self {
        let reader = TransactionReader::new(Arc::clone(ledger.store()), ledger.config());
        Self { ledger, reader }
    }

    /// The underlying ledger
    pub fn ledger(&self) -> &Arc<WalletLedger<S>> {
        &self.ledger
    }

    /// Transfer a decimal amount between two wallets given as strings
    pub async fn send_money(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        cancel: &CancellationToken,
    ) -> Result<TransactionView, LedgerError> {
        let minor = to_minor_units(amount)?;
        let from = parse_wallet_id(from)?;
        let to = parse_wallet_id(to)?;

        let tx = self.ledger.send_money(from, to, minor, cancel).await?;
        Ok(TransactionView::from(&tx))
    }

    /// Balance of a wallet as a decimal amount
    pub async fn get_balance(&self, wallet: &str) -> Result<Decimal, LedgerError> {
        let wallet = parse_wallet_id(wallet)?;
        let balance = self.ledger.get_balance(wallet).await?;
        Ok(from_minor_units(balance))
    }

    /// The `count` most recent transactions, newest first
    pub async fn get_last_transactions(
        &self,
        count: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<TransactionView>, LedgerError> {
        let recent = self.reader.get_recent(count, cancel).await?;
        Ok(recent.iter().map(TransactionView::from).collect())
    }

    /// Every wallet, sorted by identifier
    pub async fn list_wallets(&self) -> Result<Vec<WalletView>, LedgerError> {
        let mut wallets = self.ledger.list_wallets().await?;
        wallets.sort_by_key(|wallet| wallet.id);
        Ok(wallets.iter().map(WalletView::from).collect())
    }

    /// Provision a new empty wallet and return its identifier
    pub async fn create_wallet(&self) -> Result<String, LedgerError> {
        Ok(self.ledger.create_wallet().await?.to_string())
    }
}
