//! promdash binary entry point.
//!
//! Runs one dashboard query from the command line and prints the result
//! as JSON. All logs go to stderr; stdout carries only the JSON result.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use promdash::config::Config;
use promdash::error::AppError;
use promdash::proxy::{ProxyClient, Transport};
use promdash::query::DashboardQueries;
use promdash::range::{parse_bound, RangeOverride, RangePreset};
use promdash::traits::RealTimeProvider;

#[derive(Parser, Debug)]
#[command(name = "promdash")]
#[command(about = "Query a Prometheus-backed dashboard through its proxy")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch named chart series for a query over a time range
    Range {
        /// Query expression
        query: String,

        /// Range preset (last1h, last6h, last24h, last7d)
        #[arg(short, long)]
        range: Option<RangePreset>,

        /// Custom range start (epoch seconds, RFC 3339 or YYYY-MM-DD[ HH:MM:SS]);
        /// implies the custom preset
        #[arg(long, conflicts_with = "range")]
        start: Option<String>,

        /// Custom range end, defaults to now; implies the custom preset
        #[arg(long, conflicts_with = "range")]
        end: Option<String>,

        /// Explicit step in seconds
        #[arg(long, requires = "start")]
        step: Option<u64>,
    },

    /// Fetch the current value of a panel query
    Instant {
        /// Query expression
        query: String,

        /// Render the value in this unit
        #[arg(short, long, value_enum)]
        unit: Option<Unit>,
    },

    /// List values of a label
    Labels {
        /// Label name
        label: String,

        /// Restrict to series of this metric
        #[arg(short, long, default_value = "")]
        metric: String,
    },

    /// Rank autocomplete suggestions for partial input
    Suggest {
        /// Partial input
        input: String,

        /// Discover metric names from the backend first
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Unit {
    /// 1024-based byte sizes
    Bytes,
    /// 1000-based bit rates
    Bitrate,
}

impl Unit {
    fn render(self, value: f64) -> String {
        match self {
            Self::Bytes => promdash::format::format_bytes(value),
            Self::Bitrate => promdash::format::format_bit_rate(value),
        }
    }
}

#[derive(Serialize)]
struct InstantOutput {
    value: Option<f64>,
    formatted: Option<String>,
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => tracing::error!("Failed to serialize output: {e}"),
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), AppError> {
    let transport = Transport::from_config(&config)?;
    let dashboard = DashboardQueries::new(ProxyClient::new(transport), RealTimeProvider)
        .with_range(config.default_range);

    match cli.command {
        Command::Range {
            query,
            range,
            start,
            end,
            step,
        } => {
            let start = start.as_deref().map(parse_bound).transpose()?;
            let end = end.as_deref().map(parse_bound).transpose()?;

            let series = match (start, step) {
                (Some(start), Some(step)) => {
                    let mut range = RangeOverride::starting_at(start.timestamp()).with_step(step);
                    if let Some(end) = end {
                        range = range.with_end(end.timestamp());
                    }
                    dashboard.range_query_with(&query, range).await
                }
                _ => {
                    let preset = if start.is_some() || end.is_some() {
                        dashboard.set_custom_bounds(start, end);
                        RangePreset::Custom
                    } else {
                        range.unwrap_or(config.default_range)
                    };
                    dashboard.set_range(preset).await;
                    dashboard.set_query(query).await;
                    dashboard.snapshot().series
                }
            };

            if let Some(message) = dashboard.snapshot().last_error {
                tracing::warn!("Range query failed: {message}");
            }
            print_json(&series);
        }
        Command::Instant { query, unit } => {
            let value = dashboard.panel_value(&query).await;
            print_json(&InstantOutput {
                value,
                formatted: value.zip(unit).map(|(v, u)| u.render(v)),
            });
        }
        Command::Labels { label, metric } => {
            print_json(&dashboard.label_values(&metric, &label).await);
        }
        Command::Suggest { input, refresh } => {
            if refresh {
                let outcome = dashboard.refresh_catalog().await;
                tracing::info!(?outcome, size = dashboard.catalog().len(), "Catalog refreshed");
            }
            print_json(&dashboard.suggestions(&input));
        }
    }

    let stats = dashboard.client().stats().summary();
    tracing::debug!(
        total_requests = stats.total_requests,
        success_rate = stats.success_rate,
        "Request statistics"
    );
    Ok(())
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr only (stdout is for the JSON result)
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string())
                .parse()
                .unwrap_or_else(|_| tracing_subscriber::filter::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Configuration loaded: endpoint={}, transport={}, timeout={}ms",
        config.endpoint,
        config.transport,
        config.request_timeout_ms
    );

    if let Err(e) = run(cli, config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("promdash").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_range_with_custom_bounds() {
        let cli = parse(&["range", "up", "--start", "1700000000", "--step", "30"]).unwrap();
        match cli.command {
            Command::Range {
                start, step, range, ..
            } => {
                assert_eq!(start.as_deref(), Some("1700000000"));
                assert_eq!(step, Some(30));
                assert!(range.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_step_requires_start() {
        let err = parse(&["range", "up", "--step", "30"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_bounds_conflict_with_preset() {
        let err = parse(&["range", "up", "--range", "last6h", "--start", "1700000000"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let err = parse(&["range", "up", "--end", "1700000000", "-r", "last1h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_preset_alone() {
        let cli = parse(&["range", "up", "--range", "last24h"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Range {
                range: Some(RangePreset::Last24h),
                ..
            }
        ));
    }
}
