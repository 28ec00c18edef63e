//! Asynchronous CSV reader for transfer requests
//!
//! Provides batch reading over `from,to,amount` rows so the replay pipeline
//! can execute one batch while the next is still on disk.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → TransferReader → Batches of TransferRequests
//!                  ↓
//!           csv_format module
//!           (TransferRecord, convert_transfer_record)
//! ```

use crate::io::csv_format::{convert_transfer_record, TransferRecord, TransferRequest};
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;

/// Asynchronous transfer request reader
///
/// Maintains streaming behavior with constant memory usage per batch.
pub struct TransferReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> TransferReader<R> {
    /// Create a new TransferReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` transfer requests
    ///
    /// Malformed rows are logged and skipped. Returns an empty vector at end of input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<TransferRequest> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<TransferRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(record)) => match convert_transfer_record(record) {
                    Ok(request) => batch.push(request),
                    Err(e) => tracing::warn!("skipping transfer row: {}", e),
                },
                Some(Err(e)) => tracing::warn!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }
}
