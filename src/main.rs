//! Wallet Ledger CLI
//!
//! Runs ledger scenarios and writes the results as CSV to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- replay transfers.csv --wallets wallets.csv > balances.csv
//! cargo run -- replay transfers.csv --wallets wallets.csv --max-concurrent 1 --batch-size 500
//! cargo run -- simulate --wallets 10 --seed-balance 1000 --transfers 5000 --recent 10
//! cargo run -- --workers 8 --log-format json simulate
//! ```
//!
//! # Scenarios
//!
//! - **replay**: Seed wallets from `id,balance` rows, replay `from,to,amount` transfer requests
//! - **simulate**: Seed random wallets and fire concurrent random transfers between them
//!
//! Logs go to stderr; `RUST_LOG` overrides `--log-level`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, broken invariant, etc.)

use wallet_ledger::cli;
use wallet_ledger::logging;
use wallet_ledger::scenario;
use std::process;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init_logging(&args.log_level, args.log_format.into()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let scenario = match scenario::create_scenario(&args) {
        Ok(scenario) => scenario,
        Err(e) => {
            tracing::error!("{}", e);
            process::exit(1);
        }
    };

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = scenario.run(&mut output) {
        tracing::error!("{}", e);
        process::exit(1);
    }
}
