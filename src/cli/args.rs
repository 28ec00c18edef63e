use crate::config::LedgerConfig;
use crate::facade::to_minor_units;
use crate::logging::LogFormat;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Wallet ledger: atomic transfers between wallets
#[derive(Parser, Debug)]
#[command(name = "wallet-ledger")]
#[command(about = "Atomic transfers between wallets with bounded-parallel history reads", long_about = None)]
pub struct CliArgs {
    /// Scenario to run
    #[command(subcommand)]
    pub command: ScenarioCommand,

    /// Largest amount a single transfer may move, in currency units
    #[arg(
        long = "max-transfer",
        value_name = "AMOUNT",
        global = true,
        help = "Transfer ceiling in currency units (default: 100000.00)"
    )]
    pub max_transfer: Option<Decimal>,

    /// Reader worker pool size
    #[arg(
        long = "workers",
        value_name = "COUNT",
        global = true,
        help = "Workers scanning the recent-transaction snapshot (default: 5)"
    )]
    pub workers: Option<usize>,

    /// Snapshot size for recent-transaction reads
    #[arg(
        long = "recent-window",
        value_name = "SIZE",
        global = true,
        help = "Transactions fetched per recent-history read (default: 100)"
    )]
    pub recent_window: Option<usize>,

    /// Tokio worker threads
    #[arg(
        long = "threads",
        value_name = "COUNT",
        global = true,
        help = "Runtime worker threads (default: CPU cores)"
    )]
    pub threads: Option<usize>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long = "log-level", value_name = "FILTER", global = true, default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", global = true, default_value = "pretty")]
    pub log_format: LogFormatArg,
}

/// Available scenarios
#[derive(Subcommand, Clone, Debug)]
pub enum ScenarioCommand {
    /// Seed wallets from a CSV file and replay transfer requests from another
    Replay {
        /// Transfer requests CSV (`from,to,amount`)
        #[arg(value_name = "TRANSFERS")]
        transfers: PathBuf,

        /// Wallet seeds CSV (`id,balance`)
        #[arg(long = "wallets", value_name = "FILE")]
        wallets: PathBuf,

        /// Transfer requests per batch
        #[arg(long = "batch-size", value_name = "SIZE", default_value_t = 1000)]
        batch_size: usize,

        /// Transfers in flight at once within a batch
        #[arg(long = "max-concurrent", value_name = "COUNT")]
        max_concurrent: Option<usize>,
    },

    /// Seed random wallets and run concurrent random transfers between them
    Simulate {
        /// Number of wallets to initialize
        #[arg(long = "wallets", value_name = "COUNT", default_value_t = 10)]
        wallets: usize,

        /// Starting balance per wallet, in currency units
        #[arg(long = "seed-balance", value_name = "AMOUNT", default_value = "1000.00")]
        seed_balance: Decimal,

        /// Number of transfers to attempt
        #[arg(long = "transfers", value_name = "COUNT", default_value_t = 1000)]
        transfers: usize,

        /// Recent transactions to print after the run
        #[arg(long = "recent", value_name = "COUNT", default_value_t = 10)]
        recent: usize,
    },
}

/// Log output format argument
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

impl CliArgs {
    /// Create a LedgerConfig from CLI arguments
    ///
    /// Unset options take their defaults; zero values fall back to defaults
    /// with a warning (see [`LedgerConfig::new`]).
    pub fn to_ledger_config(&self) -> Result<LedgerConfig, String> {
        let default = LedgerConfig::default();

        let max_transfer = match self.max_transfer {
            Some(amount) => {
                to_minor_units(amount).map_err(|e| format!("Invalid --max-transfer: {}", e))?
            }
            None => default.max_transfer,
        };

        Ok(LedgerConfig::new(
            max_transfer,
            self.workers.unwrap_or(default.worker_pool_size),
            self.recent_window.unwrap_or(default.recent_window),
        ))
    }

    /// Runtime worker threads, defaulting to the number of CPU cores
    pub fn runtime_threads(&self) -> usize {
        match self.threads {
            Some(threads) if threads > 0 => threads,
            _ => num_cpus::get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::defaults(&["program", "simulate"], LedgerConfig::default())]
    #[case::max_transfer(
        &["program", "simulate", "--max-transfer", "50.5"],
        LedgerConfig { max_transfer: 5050, ..LedgerConfig::default() }
    )]
    #[case::global_before_subcommand(
        &["program", "--workers", "8", "simulate"],
        LedgerConfig { worker_pool_size: 8, ..LedgerConfig::default() }
    )]
    #[case::zero_workers_fall_back(
        &["program", "simulate", "--workers", "0", "--recent-window", "20"],
        LedgerConfig { recent_window: 20, ..LedgerConfig::default() }
    )]
    fn test_ledger_config_conversion(#[case] args: &[&str], #[case] expected: LedgerConfig) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.to_ledger_config().unwrap(), expected);
    }

    #[test]
    fn test_negative_max_transfer_is_rejected() {
        let parsed =
            CliArgs::try_parse_from(["program", "simulate", "--max-transfer=-1"]).unwrap();
        assert!(parsed.to_ledger_config().is_err());
    }

    #[test]
    fn test_replay_arguments() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "replay",
            "transfers.csv",
            "--wallets",
            "wallets.csv",
            "--max-concurrent",
            "4",
        ])
        .unwrap();

        match parsed.command {
            ScenarioCommand::Replay {
                transfers,
                wallets,
                batch_size,
                max_concurrent,
            } => {
                assert_eq!(transfers, PathBuf::from("transfers.csv"));
                assert_eq!(wallets, PathBuf::from("wallets.csv"));
                assert_eq!(batch_size, 1000);
                assert_eq!(max_concurrent, Some(4));
            }
            other => panic!("Expected replay, got {:?}", other),
        }
    }

    #[test]
    fn test_simulate_defaults() {
        let parsed = CliArgs::try_parse_from(["program", "simulate"]).unwrap();

        match parsed.command {
            ScenarioCommand::Simulate {
                wallets,
                seed_balance,
                transfers,
                recent,
            } => {
                assert_eq!(wallets, 10);
                assert_eq!(seed_balance, Decimal::new(100000, 2));
                assert_eq!(transfers, 1000);
                assert_eq!(recent, 10);
            }
            other => panic!("Expected simulate, got {:?}", other),
        }
    }

    #[rstest]
    #[case::threads(&["program", "simulate", "--threads", "3"], 3)]
    #[case::zero_threads(&["program", "simulate", "--threads", "0"], num_cpus::get())]
    #[case::default_threads(&["program", "simulate"], num_cpus::get())]
    fn test_runtime_threads(#[case] args: &[&str], #[case] expected: usize) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.runtime_threads(), expected);
    }

    #[rstest]
    #[case::missing_command(&["program"])]
    #[case::replay_without_wallets(&["program", "replay", "transfers.csv"])]
    #[case::invalid_log_format(&["program", "simulate", "--log-format", "xml"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
