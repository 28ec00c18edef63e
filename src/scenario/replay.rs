//! Replay of transfer requests from CSV
//!
//! # Pipeline
//!
//! ```text
//! wallets.csv ──SeedReader──▶ seed_wallet
//! transfers.csv ──TransferReader──▶ batch ──buffer_unordered(max_concurrent)──▶ send_money
//!                                                                      │
//!                                              list_wallets ◀──────────┘
//!                                                   │
//!                                            balances CSV
//! ```
//!
//! Batches run one after another; transfers inside a batch run concurrently,
//! so with `max_concurrent > 1` the order in which two requests touching the
//! same wallet commit is not fixed. Use `max_concurrent = 1` for a strictly
//! sequential replay.

use crate::config::LedgerConfig;
use crate::core::{MemoryStore, WalletLedger};
use crate::facade::{status_code, WalletFacade};
use crate::io::{write_balances_csv, SeedReader, TransferReader, TransferRequest};
use crate::scenario::{build_runtime, Scenario};
use futures::stream::{self, StreamExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Batch settings for a replay
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplayConfig {
    /// Transfer requests read per batch
    pub batch_size: usize,
    /// Transfers in flight at once within a batch
    pub max_concurrent: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl ReplayConfig {
    /// Create a ReplayConfig; zero values fall back to the defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            tracing::warn!(
                "Invalid max_concurrent ({}), using default ({})",
                max_concurrent,
                default.max_concurrent
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

/// Outcome counts of a replay
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub committed: usize,
    pub rejected: usize,
}

/// Seeds wallets from one CSV file and replays transfers from another
#[derive(Debug, Clone)]
pub struct ReplayScenario {
    transfers_path: PathBuf,
    wallets_path: PathBuf,
    config: ReplayConfig,
    ledger_config: LedgerConfig,
    threads: usize,
}

impl ReplayScenario {
    pub fn new(
        transfers_path: PathBuf,
        wallets_path: PathBuf,
        config: ReplayConfig,
        ledger_config: LedgerConfig,
        threads: usize,
    ) -> Self {
        Self {
            transfers_path,
            wallets_path,
            config,
            ledger_config,
            threads,
        }
    }

    async fn seed(&self, ledger: &WalletLedger<MemoryStore>) -> Result<usize, String> {
        let reader = SeedReader::new(&self.wallets_path)?;
        let mut seeded = 0;

        for row in reader {
            match row {
                Ok((wallet, balance)) => match ledger.seed_wallet(wallet, balance).await {
                    Ok(()) => seeded += 1,
                    Err(e) => tracing::warn!("skipping wallet seed: {}", e),
                },
                Err(e) => tracing::warn!("skipping wallet seed: {}", e),
            }
        }

        tracing::info!(wallets = seeded, "wallets seeded");
        Ok(seeded)
    }

    async fn replay_transfers(
        &self,
        facade: &WalletFacade<MemoryStore>,
        path: &Path,
    ) -> Result<ReplaySummary, String> {
        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = TransferReader::new(compat_file);

        let token = CancellationToken::new();
        let cancel = &token;
        let mut summary = ReplaySummary::default();

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }

            let outcomes: Vec<_> = stream::iter(batch)
                .map(move |request| async move {
                    let result = facade
                        .send_money(&request.from, &request.to, request.amount, cancel)
                        .await;
                    (request, result)
                })
                .buffer_unordered(self.config.max_concurrent)
                .collect()
                .await;

            for (request, result) in outcomes {
                match result {
                    Ok(_) => summary.committed += 1,
                    Err(e) => {
                        summary.rejected += 1;
                        log_rejection(&request, status_code(&e), &e.to_string());
                    }
                }
            }
        }

        Ok(summary)
    }
}

fn log_rejection(request: &TransferRequest, status: u16, reason: &str) {
    tracing::warn!(
        from = %request.from,
        to = %request.to,
        amount = %request.amount,
        status,
        "transfer rejected: {}",
        reason
    );
}

impl Scenario for ReplayScenario {
    fn run(&self, output: &mut dyn Write) -> Result<(), String> {
        let runtime = build_runtime(self.threads)?;

        runtime.block_on(async {
            let ledger = Arc::new(WalletLedger::new(
                Arc::new(MemoryStore::new()),
                self.ledger_config.clone(),
            ));
            self.seed(&ledger).await?;

            let facade = WalletFacade::new(ledger);
            let summary = self.replay_transfers(&facade, &self.transfers_path).await?;
            tracing::info!(
                committed = summary.committed,
                rejected = summary.rejected,
                "replay finished"
            );

            let wallets = facade.list_wallets().await.map_err(|e| e.to_string())?;
            write_balances_csv(&wallets, output)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ALICE: &str = "00000000-0000-0000-0000-00000000000a";
    const BOB: &str = "00000000-0000-0000-0000-00000000000b";

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn sequential(transfers: &NamedTempFile, wallets: &NamedTempFile) -> ReplayScenario {
        ReplayScenario::new(
            transfers.path().to_path_buf(),
            wallets.path().to_path_buf(),
            ReplayConfig::new(2, 1),
            LedgerConfig::default(),
            2,
        )
    }

    #[test]
    fn test_replay_config_falls_back_on_zero() {
        let config = ReplayConfig::new(0, 0);
        assert_eq!(config, ReplayConfig::default());
    }

    #[test]
    fn test_replay_applies_transfers_in_order() {
        let wallets = create_temp_csv(&format!("id,balance\n{ALICE},1000\n{BOB},500\n"));
        let transfers = create_temp_csv(&format!(
            "from,to,amount\n{ALICE},{BOB},300\n{BOB},{ALICE},100\n{ALICE},{BOB},50.25\n"
        ));
        let mut output = Vec::new();

        sequential(&transfers, &wallets).run(&mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(
            output,
            format!("wallet,balance\n{ALICE},749.75\n{BOB},750.25\n")
        );
    }

    #[test]
    fn test_replay_skips_rejected_transfers() {
        let wallets = create_temp_csv(&format!("id,balance\n{ALICE},10\n{BOB},0\n"));
        let transfers = create_temp_csv(&format!(
            "from,to,amount\n\
             {ALICE},{BOB},50\n\
             {ALICE},{ALICE},1\n\
             {ALICE},not-a-wallet,1\n\
             {ALICE},{BOB},abc\n\
             {ALICE},{BOB},4\n"
        ));
        let mut output = Vec::new();

        sequential(&transfers, &wallets).run(&mut output).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains(&format!("{ALICE},6.00")));
        assert!(output.contains(&format!("{BOB},4.00")));
    }

    #[test]
    fn test_replay_handles_missing_transfers_file() {
        let wallets = create_temp_csv(&format!("id,balance\n{ALICE},10\n"));
        let scenario = ReplayScenario::new(
            PathBuf::from("nonexistent.csv"),
            wallets.path().to_path_buf(),
            ReplayConfig::default(),
            LedgerConfig::default(),
            1,
        );
        let mut output = Vec::new();

        let result = scenario.run(&mut output);
        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
