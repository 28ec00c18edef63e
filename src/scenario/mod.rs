//! Runnable scenarios driving the ledger end to end
//!
//! A scenario owns its tokio runtime, builds an in-memory ledger, feeds it
//! transfers and writes the outcome as CSV. The CLI picks one at runtime.

use crate::cli::{CliArgs, ScenarioCommand};
use crate::facade::balance_to_minor_units;
use std::io::Write;

pub mod replay;
pub mod simulate;

pub use replay::{ReplayConfig, ReplayScenario};
pub use simulate::{SimulateConfig, SimulateScenario};

/// A complete ledger run that writes its results to `output`
pub trait Scenario: Send + Sync {
    /// Run the scenario to completion
    ///
    /// Rejected transfers are logged and do not fail the run. An error is
    /// returned only for fatal conditions: unreadable input, a runtime that
    /// cannot start, a broken invariant, or output that cannot be written.
    fn run(&self, output: &mut dyn Write) -> Result<(), String>;
}

/// Build the scenario selected on the command line
pub fn create_scenario(args: &CliArgs) -> Result<Box<dyn Scenario>, String> {
    let ledger_config = args.to_ledger_config()?;
    let threads = args.runtime_threads();

    let scenario: Box<dyn Scenario> = match &args.command {
        ScenarioCommand::Replay {
            transfers,
            wallets,
            batch_size,
            max_concurrent,
        } => {
            let config = ReplayConfig::new(
                *batch_size,
                max_concurrent.unwrap_or_else(num_cpus::get),
            );
            Box::new(ReplayScenario::new(
                transfers.clone(),
                wallets.clone(),
                config,
                ledger_config,
                threads,
            ))
        }
        ScenarioCommand::Simulate {
            wallets,
            seed_balance,
            transfers,
            recent,
        } => {
            let seed_balance = balance_to_minor_units(*seed_balance)
                .map_err(|e| format!("Invalid --seed-balance: {}", e))?;
            let config = SimulateConfig {
                wallets: *wallets,
                seed_balance,
                transfers: *transfers,
                recent: *recent,
            };
            Box::new(SimulateScenario::new(config, ledger_config, threads))
        }
    };

    Ok(scenario)
}

/// Multi-threaded runtime with `threads` workers
pub(crate) fn build_runtime(threads: usize) -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(threads.max(1))
        .enable_time()
        .build()
        .map_err(|e| format!("Failed to create tokio runtime: {}", e))
}
