//! CSV format handling for wallet seeds, transfer requests and ledger output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Record structures for deserialization
//! - Conversion from CSV records to domain inputs
//! - Balance and transaction output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

use crate::facade::{balance_to_minor_units, parse_wallet_id, TransactionView, WalletView};
use crate::types::{MinorUnits, WalletId};

/// Wallet seed row: `id,balance`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WalletSeedRecord {
    pub id: String,
    pub balance: String,
}

/// Transfer request row: `from,to,amount`
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransferRecord {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// A parsed transfer request
///
/// Identifiers stay in their external string form; the facade validates them
/// when the transfer is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

/// Convert a WalletSeedRecord to a wallet id and a balance in minor units
///
/// A zero balance is allowed for seeds; negative or malformed values are not.
pub fn convert_seed_record(record: WalletSeedRecord) -> Result<(WalletId, MinorUnits), String> {
    let id = parse_wallet_id(&record.id).map_err(|e| e.to_string())?;

    let balance = Decimal::from_str(record.balance.trim())
        .map_err(|_| format!("Invalid balance '{}' for wallet {}", record.balance, id))?;

    let minor = balance_to_minor_units(balance)
        .map_err(|e| format!("Invalid balance '{}' for wallet {}: {}", record.balance, id, e))?;

    Ok((id, minor))
}

/// Convert a TransferRecord to a TransferRequest
///
/// Only the amount is parsed here; sign and range checks belong to the ledger.
pub fn convert_transfer_record(record: TransferRecord) -> Result<TransferRequest, String> {
    let amount = Decimal::from_str(record.amount.trim()).map_err(|_| {
        format!(
            "Invalid amount '{}' for transfer {} -> {}",
            record.amount, record.from, record.to
        )
    })?;

    Ok(TransferRequest {
        from: record.from,
        to: record.to,
        amount,
    })
}

/// Write wallet balances to CSV format
///
/// Columns: wallet, balance. Wallets are sorted by id for deterministic output.
pub fn write_balances_csv(wallets: &[WalletView], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["wallet", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted = wallets.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    for wallet in sorted {
        writer
            .write_record(&[wallet.id, format!("{:.2}", wallet.balance)])
            .map_err(|e| format!("Failed to write wallet record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}

/// Write transactions to CSV format, preserving the given order
///
/// Columns: id, from, to, amount, created_at.
pub fn write_transactions_csv(
    transactions: &[TransactionView],
    output: &mut dyn Write,
) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "from", "to", "amount", "created_at"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for tx in transactions {
        writer
            .write_record(&[
                tx.id.clone(),
                tx.from.clone(),
                tx.to.clone(),
                format!("{:.2}", tx.amount),
                tx.created_at.clone(),
            ])
            .map_err(|e| format!("Failed to write transaction record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
