//! Transaction-related types for the wallet ledger
//!
//! A transaction is the immutable record of one committed transfer between
//! two wallets. Records are append-only and ordered by creation time.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::wallet::{MinorUnits, WalletId};

/// Transaction identifier
pub type TransactionId = Uuid;

/// Committed transfer record
///
/// Every record is written in the same atomic unit as the debit and credit
/// it describes, so a record never exists without its balance mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: TransactionId,

    /// Debited wallet
    pub from: WalletId,

    /// Credited wallet
    pub to: WalletId,

    /// Transferred amount in minor units (always positive)
    pub amount: MinorUnits,

    /// Time the transfer was recorded
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new record with a fresh identifier stamped with the current time
    pub fn new(from: WalletId, to: WalletId, amount: MinorUnits) -> Self {
        Self::at(from, to, amount, Utc::now())
    }

    /// Create a new record with a fresh identifier and an explicit timestamp
    pub fn at(from: WalletId, to: WalletId, amount: MinorUnits, created_at: DateTime<Utc>) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            from,
            to,
            amount,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_transactions_get_distinct_ids() {
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();

        let first = Transaction::new(from, to, 300);
        let second = Transaction::new(from, to, 300);

        assert_ne!(first.id, second.id);
        assert_eq!(first.from, from);
        assert_eq!(first.to, to);
        assert_eq!(first.amount, 300);
    }
}
