//! Ledger configuration
//!
//! Tunables for the transfer path and the transaction reader. Values are
//! normally built from CLI arguments (see [`crate::cli`]); zero values fall
//! back to the defaults with a warning.

use crate::types::MinorUnits;

/// Configuration for the wallet ledger and transaction reader
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Largest amount, in minor units, a single transfer may move
    pub max_transfer: MinorUnits,
    /// Maximum number of reader workers scanning a snapshot in parallel
    pub worker_pool_size: usize,
    /// Number of most recent transactions fetched as the reader's snapshot
    pub recent_window: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_transfer: 10_000_000,
            worker_pool_size: 5,
            recent_window: 100,
        }
    }
}

impl LedgerConfig {
    /// Create a new LedgerConfig with custom values
    pub fn new(max_transfer: MinorUnits, worker_pool_size: usize, recent_window: usize) -> Self {
        let default = Self::default();

        let max_transfer = if max_transfer == 0 {
            tracing::warn!(
                "invalid max_transfer ({}), using default ({})",
                max_transfer,
                default.max_transfer
            );
            default.max_transfer
        } else {
            max_transfer
        };

        let worker_pool_size = if worker_pool_size == 0 {
            tracing::warn!(
                "invalid worker_pool_size ({}), using default ({})",
                worker_pool_size,
                default.worker_pool_size
            );
            default.worker_pool_size
        } else {
            worker_pool_size
        };

        let recent_window = if recent_window == 0 {
            tracing::warn!(
                "invalid recent_window ({}), using default ({})",
                recent_window,
                default.recent_window
            );
            default.recent_window
        } else {
            recent_window
        };

        Self {
            max_transfer,
            worker_pool_size,
            recent_window,
        }
    }
}
