//! Bounded-parallel retrieval of the most recent transactions
//!
//! `TransactionReader` fetches a bounded snapshot of the log (newest first)
//! and fans the scan out over a small pool of tokio tasks.
//!
//! # Partitioning
//!
//! ```text
//! snapshot: [t0 t1 t2 t3 t4 t5 t6 ...]   (newest first, length L)
//! limit = min(n, L); workers = min(n, pool)
//! worker k scans positions k, k + workers, k + 2*workers, ... < limit
//! ```
//!
//! Each worker tags what it collects with the snapshot position and appends
//! to a shared accumulator, stopping once the accumulator is full. Workers
//! finish in any order, so the accumulator is sorted by position before it is
//! returned; the result always follows the snapshot's newest-first order.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::cancel::cancellable;
use super::traits::TransactionLog;
use crate::config::LedgerConfig;
use crate::types::{LedgerError, Transaction};

type Accumulator = Arc<Mutex<Vec<(usize, Transaction)>>>;

/// Reader for the most recent transactions
#[derive(Debug)]
pub struct TransactionReader<L> {
    log: Arc<L>,
    worker_pool_size: usize,
    recent_window: usize,
}

impl<L: TransactionLog> TransactionReader<L> {
    /// Create a reader over `log` using the pool size and window from `config`
    pub fn new(log: Arc<L>, config: &LedgerConfig) -> Self {
        Self {
            log,
            worker_pool_size: config.worker_pool_size.max(1),
            recent_window: config.recent_window.max(1),
        }
    }

    /// Up to `n` most recent transactions, newest first
    ///
    /// Returns exactly `min(n, L)` records where `L` is the size of the
    /// fetched snapshot (at most `recent_window`).
    ///
    /// # Returns
    ///
    /// * `Err(LedgerError::InvalidArgument)` - `n` is zero
    /// * `Err(LedgerError::Cancelled)` - The token fired during the fetch or the scan
    /// * `Err(LedgerError::WorkerFailed)` - A scan task panicked
    pub async fn get_recent(
        &self,
        n: usize,
        cancel: &CancellationToken,
    ) -> Result<Vec<Transaction>, LedgerError> {
        if n == 0 {
            return Err(LedgerError::invalid_argument(
                "count must be greater than zero",
            ));
        }

        let snapshot = cancellable(cancel, self.log.list_recent(self.recent_window)).await?;
        let workers = n.min(self.worker_pool_size);
        let recent = scan_partitioned(snapshot, n, workers, cancel).await?;

        tracing::debug!(requested = n, returned = recent.len(), workers, "recent transactions read");
        Ok(recent)
    }
}

/// Scan the first `min(n, snapshot.len())` positions of `snapshot` with `workers` strided tasks
pub(crate) async fn scan_partitioned(
    snapshot: Vec<Transaction>,
    n: usize,
    workers: usize,
    cancel: &CancellationToken,
) -> Result<Vec<Transaction>, LedgerError> {
    let limit = n.min(snapshot.len());
    if limit == 0 {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, limit);

    let snapshot: Arc<[Transaction]> = snapshot.into();
    let accumulator: Accumulator = Arc::new(Mutex::new(Vec::with_capacity(limit)));

    let mut tasks = Vec::with_capacity(workers);
    for start in 0..workers {
        let snapshot = Arc::clone(&snapshot);
        let accumulator = Arc::clone(&accumulator);
        let cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            scan_stride(&snapshot[..limit], start, workers, &accumulator, &cancel)
        }));
    }

    // Join every task before reporting, so no worker outlives the call.
    let mut failure = None;
    for task in tasks {
        let outcome = task.await.map_err(LedgerError::from).and_then(|scan| scan);
        if let Err(error) = outcome {
            failure.get_or_insert(error);
        }
    }
    if let Some(error) = failure {
        return Err(error);
    }

    let mut collected = std::mem::take(&mut *accumulator.lock());
    collected.sort_unstable_by_key(|(position, _)| *position);
    Ok(collected.into_iter().map(|(_, tx)| tx).collect())
}

fn scan_stride(
    segment: &[Transaction],
    start: usize,
    stride: usize,
    accumulator: &Mutex<Vec<(usize, Transaction)>>,
    cancel: &CancellationToken,
) -> Result<(), LedgerError> {
    for position in (start..segment.len()).step_by(stride) {
        if cancel.is_cancelled() {
            return Err(LedgerError::Cancelled);
        }

        let mut collected = accumulator.lock();
        if collected.len() >= segment.len() {
            break;
        }
        collected.push((position, segment[position].clone()));
    }
    Ok(())
}
