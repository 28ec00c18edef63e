//! Concurrent random transfers over freshly initialized wallets
//!
//! Every transfer runs on its own tokio task, so transfers touching the same
//! wallets contend for the same locks, in both directions. After the run the
//! total balance must equal the seeded total.

use crate::config::LedgerConfig;
use crate::core::{MemoryStore, WalletLedger};
use crate::facade::WalletFacade;
use crate::io::{write_balances_csv, write_transactions_csv};
use crate::scenario::{build_runtime, Scenario};
use crate::types::{LedgerError, MinorUnits, WalletId};
use rand::Rng;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Simulation parameters
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulateConfig {
    /// Wallets to initialize
    pub wallets: usize,
    /// Starting balance per wallet, in minor units
    pub seed_balance: MinorUnits,
    /// Transfers to attempt
    pub transfers: usize,
    /// Recent transactions written after the balances
    pub recent: usize,
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            wallets: 10,
            seed_balance: 100_000,
            transfers: 1000,
            recent: 10,
        }
    }
}

/// A planned transfer: sender, receiver, amount
type PlannedTransfer = (WalletId, WalletId, MinorUnits);

/// Runs random concurrent transfers and checks that money is conserved
#[derive(Debug, Clone)]
pub struct SimulateScenario {
    config: SimulateConfig,
    ledger_config: LedgerConfig,
    threads: usize,
}

impl SimulateScenario {
    pub fn new(config: SimulateConfig, ledger_config: LedgerConfig, threads: usize) -> Self {
        Self {
            config,
            ledger_config,
            threads,
        }
    }

    /// Largest amount a planned transfer may move
    fn amount_ceiling(&self) -> MinorUnits {
        (self.config.seed_balance / 2).clamp(1, self.ledger_config.max_transfer)
    }
}

/// Random transfers between distinct wallets
fn plan_transfers(wallets: &[WalletId], count: usize, ceiling: MinorUnits) -> Vec<PlannedTransfer> {
    if wallets.len() < 2 {
        return Vec::new();
    }

    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let from = rng.gen_range(0..wallets.len());
            let to = (from + rng.gen_range(1..wallets.len())) % wallets.len();
            let amount = rng.gen_range(1..=ceiling);
            (wallets[from], wallets[to], amount)
        })
        .collect()
}

async fn run_transfers(
    ledger: &Arc<WalletLedger<MemoryStore>>,
    plan: Vec<PlannedTransfer>,
    cancel: &CancellationToken,
) -> Result<(usize, usize), String> {
    let tasks: Vec<_> = plan
        .into_iter()
        .map(|(from, to, amount)| {
            let ledger = Arc::clone(ledger);
            let cancel = cancel.clone();
            tokio::spawn(async move { ledger.send_money(from, to, amount, &cancel).await })
        })
        .collect();

    let mut committed = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.map_err(LedgerError::from) {
            Ok(Ok(_)) => committed += 1,
            Ok(Err(e)) => {
                rejected += 1;
                tracing::debug!("transfer rejected: {}", e);
            }
            Err(e) => return Err(e.to_string()),
        }
    }

    Ok((committed, rejected))
}

impl Scenario for SimulateScenario {
    fn run(&self, output: &mut dyn Write) -> Result<(), String> {
        if self.config.transfers > 0 && self.config.wallets < 2 {
            return Err(format!(
                "Simulating transfers needs at least two wallets, got {}",
                self.config.wallets
            ));
        }

        let runtime = build_runtime(self.threads)?;

        runtime.block_on(async {
            let ledger = Arc::new(WalletLedger::new(
                Arc::new(MemoryStore::new()),
                self.ledger_config.clone(),
            ));
            let wallets = ledger
                .initialize_wallets(self.config.wallets, self.config.seed_balance)
                .await
                .map_err(|e| e.to_string())?;
            let seeded_total = ledger.total_balance().await.map_err(|e| e.to_string())?;

            let plan = plan_transfers(&wallets, self.config.transfers, self.amount_ceiling());
            let cancel = CancellationToken::new();
            let (committed, rejected) = run_transfers(&ledger, plan, &cancel).await?;

            let final_total = ledger.total_balance().await.map_err(|e| e.to_string())?;
            if final_total != seeded_total {
                return Err(format!(
                    "Total balance changed from {} to {} minor units",
                    seeded_total, final_total
                ));
            }
            tracing::info!(committed, rejected, total = %final_total, "simulation finished");

            let facade = WalletFacade::new(ledger);
            let balances = facade.list_wallets().await.map_err(|e| e.to_string())?;
            write_balances_csv(&balances, output)?;

            if self.config.recent > 0 {
                let recent = facade
                    .get_last_transactions(self.config.recent, &cancel)
                    .await
                    .map_err(|e| e.to_string())?;
                writeln!(output).map_err(|e| format!("Failed to write output: {}", e))?;
                write_transactions_csv(&recent, output)?;
            }

            Ok(())
        })
    }
}
