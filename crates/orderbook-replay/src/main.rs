//! Order book replay binary.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use orderbook_replay::config::{Config, Overrides};
use orderbook_replay::runner;

#[derive(Parser)]
#[clap(name = "orderbook-replay")]
#[clap(about = "Replay order-entry commands against a limit order book, one book per flush")]
struct Cli {
    /// Input CSV file (overrides config and ORDERBOOK_INPUT_PATH)
    input: Option<PathBuf>,

    /// TOML config file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Admit and match crossing orders instead of rejecting them
    #[clap(short, long)]
    trading: bool,

    /// Skip a failing book instead of stopping the run
    #[clap(long)]
    continue_on_error: bool,

    /// Do not print a blank line after each book
    #[clap(long)]
    no_separator: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            input_path: self.input.clone(),
            trading: self.trading,
            continue_on_error: self.continue_on_error,
            no_separator: self.no_separator,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let base = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let config = base.with_env()?.with_overrides(&cli.overrides());

    tracing::info!(
        input = %config.input_path.display(),
        trading_enabled = config.trading_enabled,
        "starting replay"
    );

    let summary = runner::run(&config).await?;
    if summary.books_failed > 0 {
        bail!(
            "{} of {} order books failed",
            summary.books_failed,
            summary.books
        );
    }
    Ok(())
}
