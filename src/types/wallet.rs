//! Wallet-related types for the wallet ledger
//!
//! This module defines the Wallet structure and the identifier and amount
//! types shared by the ledger, the stores and the facade.

use uuid::Uuid;

/// Wallet identifier
///
/// Opaque 128-bit token, generated as a UUID v4 on provisioning.
pub type WalletId = Uuid;

/// Integer amount in minor currency units (cents)
pub type MinorUnits = u64;

/// Wallet state
///
/// A wallet is a balance keyed by its identifier. The balance is unsigned,
/// so a negative balance is unrepresentable; the ledger additionally refuses
/// any debit larger than the current balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wallet {
    /// The wallet identifier
    pub id: WalletId,

    /// Current balance in minor units
    pub balance: MinorUnits,
}

impl Wallet {
    /// Create a wallet with a zero balance
    pub fn new(id: WalletId) -> Self {
        Wallet { id, balance: 0 }
    }

    /// Create a wallet holding a seeded balance
    ///
    /// Seeding is a provisioning convenience (first launch, imports); it is
    /// the only way value enters the system besides transfers between wallets.
    pub fn with_balance(id: WalletId, balance: MinorUnits) -> Self {
        Wallet { id, balance }
    }
}
