//! Structured logging
//!
//! Initializes the `tracing` subscriber with a pretty or JSON formatter and
//! `RUST_LOG`-based filtering. Logs go to stderr; stdout carries the CSV
//! output of the scenarios.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON lines
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitive; anything but "json" is `Pretty`
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global tracing subscriber
///
/// `default_level` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"wallet_ledger=debug"`. Installing twice is reported as an error rather
/// than a panic so tests and embedders can call this freely.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), String> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init(),
    };
    installed.map_err(|e| format!("Failed to initialize logging: {}", e))?;

    tracing::debug!(?format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::json("json", LogFormat::Json)]
    #[case::upper_json("JSON", LogFormat::Json)]
    #[case::pretty("pretty", LogFormat::Pretty)]
    #[case::unknown("xml", LogFormat::Pretty)]
    fn test_from_str_lossy(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(LogFormat::from_str_lossy(raw), expected);
    }

    #[test]
    fn test_second_init_is_an_error() {
        // The first call may fail too if another test got there earlier.
        let _ = init_logging("warn", LogFormat::Pretty);

        let second = init_logging("warn", LogFormat::Json);
        assert!(second.unwrap_err().contains("Failed to initialize logging"));
    }
}
