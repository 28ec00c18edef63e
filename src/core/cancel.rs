//! Cancellation helpers
//!
//! Callers hand a [`CancellationToken`] to every ledger and reader call.
//! Blocking boundaries (lock waits, store I/O) race against it so a call whose
//! deadline expired returns `Cancelled` instead of finishing stale work.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::types::LedgerError;

/// Token that cancels itself once `timeout` elapses
///
/// Must be called from within a tokio runtime.
pub fn deadline(timeout: Duration) -> CancellationToken {
    let token = CancellationToken::new();
    let timer = token.clone();
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(timeout) => timer.cancel(),
            _ = timer.cancelled() => {}
        }
    });
    token
}

/// Drive `operation` to completion unless `cancel` fires first
///
/// The token is polled first, so an already-cancelled token never starts the operation.
pub async fn cancellable<T, F>(cancel: &CancellationToken, operation: F) -> Result<T, LedgerError>
where
    F: Future<Output = Result<T, LedgerError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(LedgerError::Cancelled),
        result = operation => result,
    }
}
