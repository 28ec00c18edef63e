//! Benchmark suite for the wallet ledger
//!
//! Measures end-to-end simulations and recent-transaction reads using the
//! divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//! ```
//!
//! Simulations run with a varying number of wallets: few wallets mean heavy
//! lock contention, many wallets mean mostly disjoint transfer pairs.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;
use wallet_ledger::core::{MemoryStore, TransactionLog, TransactionReader};
use wallet_ledger::scenario::{Scenario, SimulateConfig, SimulateScenario};
use wallet_ledger::{LedgerConfig, Transaction};

fn main() {
    divan::main();
}

/// 2,000 concurrent random transfers across `wallets` wallets
#[divan::bench(args = [2, 10, 100])]
fn simulate_transfers(wallets: usize) {
    let config = SimulateConfig {
        wallets,
        seed_balance: 100_000,
        transfers: 2_000,
        recent: 0,
    };
    let scenario = SimulateScenario::new(config, LedgerConfig::default(), num_cpus::get());
    let mut output = Vec::new();

    scenario.run(&mut output).expect("Simulation failed");
}

/// Read the 10 most recent of 250 transactions with `workers` scan workers
#[divan::bench(args = [1, 5, 50])]
fn get_recent(bencher: divan::Bencher, workers: usize) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .build()
        .expect("Failed to create tokio runtime");

    let store = Arc::new(MemoryStore::new());
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    runtime.block_on(async {
        for i in 0..250 {
            let tx = Transaction::at(a, b, i + 1, base + Duration::seconds(i as i64));
            store.append(tx).await.expect("Append failed");
        }
    });

    let reader = TransactionReader::new(store, &LedgerConfig::new(10_000_000, workers, 100));
    let token = CancellationToken::new();

    bencher.bench_local(|| {
        runtime
            .block_on(reader.get_recent(10, &token))
            .expect("Read failed")
    });
}
