//! Error types for the wallet ledger
//!
//! This module defines all error types that can occur while provisioning
//! wallets, transferring funds or reading the transaction log.
//!
//! # Error Categories
//!
//! - **Invalid arguments**: self-transfers, zero or over-ceiling amounts, malformed identifiers.
//!   Rejected before any I/O and never worth retrying.
//! - **Not found / conflicts**: unknown wallets, duplicate provisioning.
//! - **Business outcomes**: insufficient funds. Not a fault; retrying won't change the balance.
//! - **Storage faults**: commit failures and other store errors. Transient; the atomic unit
//!   guarantees nothing partial was written, and retry policy belongs to the caller.
//! - **Cancellation**: the caller's token fired before the operation completed.

use thiserror::Error;

use super::wallet::{MinorUnits, WalletId};

/// Main error type for the wallet ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The request was rejected before touching storage
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Why the request was rejected
        reason: String,
    },

    /// The wallet does not exist
    #[error("Wallet {wallet} not found")]
    WalletNotFound {
        /// The unknown wallet
        wallet: WalletId,
    },

    /// A wallet with this identifier was already provisioned
    #[error("Wallet {wallet} already exists")]
    WalletExists {
        /// The duplicate wallet
        wallet: WalletId,
    },

    /// The debited wallet cannot cover the transfer
    ///
    /// Nothing is written; both wallets and the log stay unchanged.
    #[error("Insufficient funds in wallet {wallet}: available {available}, requested {requested}")]
    InsufficientFunds {
        /// The debited wallet
        wallet: WalletId,
        /// Balance at the time of the check
        available: MinorUnits,
        /// Requested transfer amount
        requested: MinorUnits,
    },

    /// Crediting the wallet would overflow its balance
    #[error("Arithmetic overflow crediting wallet {wallet}")]
    ArithmeticOverflow {
        /// The credited wallet
        wallet: WalletId,
    },

    /// The atomic unit could not be committed
    ///
    /// The caller cannot assume the transfer happened.
    #[error("Commit failed: {message}")]
    CommitFailed {
        /// Description of the failure
        message: String,
    },

    /// Any other storage error
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the failure
        message: String,
    },

    /// The caller's cancellation token fired
    #[error("Operation cancelled")]
    Cancelled,

    /// A reader worker task panicked or was aborted
    #[error("Worker failed: {message}")]
    WorkerFailed {
        /// Description of the failure
        message: String,
    },
}

/// Coarse classification of a [`LedgerError`]
///
/// Transport layers map this to their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    Conflict,
    InsufficientFunds,
    Cancelled,
    Internal,
}

impl From<tokio::task::JoinError> for LedgerError {
    fn from(error: tokio::task::JoinError) -> Self {
        LedgerError::WorkerFailed {
            message: error.to_string(),
        }
    }
}

impl From<uuid::Error> for LedgerError {
    fn from(error: uuid::Error) -> Self {
        LedgerError::InvalidArgument {
            reason: format!("malformed identifier: {}", error),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidArgument error
    pub fn invalid_argument(reason: &str) -> Self {
        LedgerError::InvalidArgument {
            reason: reason.to_string(),
        }
    }

    /// Create a WalletNotFound error
    pub fn wallet_not_found(wallet: WalletId) -> Self {
        LedgerError::WalletNotFound { wallet }
    }

    /// Create a WalletExists error
    pub fn wallet_exists(wallet: WalletId) -> Self {
        LedgerError::WalletExists { wallet }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(
        wallet: WalletId,
        available: MinorUnits,
        requested: MinorUnits,
    ) -> Self {
        LedgerError::InsufficientFunds {
            wallet,
            available,
            requested,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(wallet: WalletId) -> Self {
        LedgerError::ArithmeticOverflow { wallet }
    }

    /// Create a CommitFailed error
    pub fn commit_failed(message: &str) -> Self {
        LedgerError::CommitFailed {
            message: message.to_string(),
        }
    }

    /// Create a Storage error
    pub fn storage(message: &str) -> Self {
        LedgerError::Storage {
            message: message.to_string(),
        }
    }

    /// Re-classify an error raised while committing as a commit failure
    pub fn into_commit_failure(self) -> Self {
        match self {
            LedgerError::CommitFailed { .. } => self,
            other => LedgerError::CommitFailed {
                message: other.to_string(),
            },
        }
    }

    /// Classify the error for transport-level mapping
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LedgerError::WalletNotFound { .. } => ErrorKind::NotFound,
            LedgerError::WalletExists { .. } => ErrorKind::Conflict,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::Cancelled => ErrorKind::Cancelled,
            LedgerError::ArithmeticOverflow { .. }
            | LedgerError::CommitFailed { .. }
            | LedgerError::Storage { .. }
            | LedgerError::WorkerFailed { .. } => ErrorKind::Internal,
        }
    }

    /// Whether the failure is a storage fault the caller may retry
    ///
    /// The ledger itself never retries.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            LedgerError::CommitFailed { .. } | LedgerError::Storage { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    const WALLET: Uuid = Uuid::from_u128(0x42);

    #[rstest]
    #[case::invalid_argument(
        LedgerError::InvalidArgument { reason: "cannot send money to the same wallet".to_string() },
        "Invalid argument: cannot send money to the same wallet"
    )]
    #[case::wallet_not_found(
        LedgerError::WalletNotFound { wallet: WALLET },
        "Wallet 00000000-0000-0000-0000-000000000042 not found"
    )]
    #[case::insufficient_funds(
        LedgerError::InsufficientFunds { wallet: WALLET, available: 700, requested: 10_000 },
        "Insufficient funds in wallet 00000000-0000-0000-0000-000000000042: available 700, requested 10000"
    )]
    #[case::commit_failed(
        LedgerError::CommitFailed { message: "connection reset".to_string() },
        "Commit failed: connection reset"
    )]
    #[case::cancelled(LedgerError::Cancelled, "Operation cancelled")]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid(LedgerError::invalid_argument("x"), ErrorKind::InvalidArgument)]
    #[case::not_found(LedgerError::wallet_not_found(WALLET), ErrorKind::NotFound)]
    #[case::exists(LedgerError::wallet_exists(WALLET), ErrorKind::Conflict)]
    #[case::funds(LedgerError::insufficient_funds(WALLET, 1, 2), ErrorKind::InsufficientFunds)]
    #[case::cancelled(LedgerError::Cancelled, ErrorKind::Cancelled)]
    #[case::commit(LedgerError::commit_failed("x"), ErrorKind::Internal)]
    #[case::overflow(LedgerError::arithmetic_overflow(WALLET), ErrorKind::Internal)]
    fn test_kind(#[case] error: LedgerError, #[case] expected: ErrorKind) {
        assert_eq!(error.kind(), expected);
    }

    #[rstest]
    #[case::commit(LedgerError::commit_failed("x"), true)]
    #[case::storage(LedgerError::storage("x"), true)]
    #[case::funds(LedgerError::insufficient_funds(WALLET, 1, 2), false)]
    #[case::invalid(LedgerError::invalid_argument("x"), false)]
    #[case::cancelled(LedgerError::Cancelled, false)]
    fn test_is_transient(#[case] error: LedgerError, #[case] expected: bool) {
        assert_eq!(error.is_transient(), expected);
    }

    #[test]
    fn test_into_commit_failure_wraps_storage_errors() {
        let error = LedgerError::storage("disk full").into_commit_failure();
        assert_eq!(
            error,
            LedgerError::CommitFailed {
                message: "Storage error: disk full".to_string()
            }
        );

        let already = LedgerError::commit_failed("x").into_commit_failure();
        assert_eq!(already, LedgerError::commit_failed("x"));
    }

    #[test]
    fn test_uuid_error_conversion() {
        let error: LedgerError = Uuid::parse_str("not-a-uuid").unwrap_err().into();
        assert!(matches!(error, LedgerError::InvalidArgument { .. }));
    }
}
