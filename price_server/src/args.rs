//! Command-line arguments for the price server.
//!
//! This module defines the CLI interface using `clap`. See `config` for the
//! validated form the rest of the server consumes.
use std::path::PathBuf;

use clap::Parser;
use price_common::net::COMMAND_PORT;

use crate::sources::SourceKind;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Best-price aggregation server", long_about = None)]
pub struct Args {
    /// Address to accept client requests on.
    #[clap(long, default_value_t = format!("0.0.0.0:{}", COMMAND_PORT))]
    pub bind: String,

    /// Ticks observed more than this many seconds ago are rejected.
    #[clap(long, default_value_t = 60)]
    pub stale_secs: u64,

    /// Maximum relative deviation from the current best price (0.25 = 25%).
    #[clap(long, default_value_t = 0.25)]
    pub outlier_pct: f64,

    /// Sources to poll, in polling order.
    #[clap(long, value_enum, value_delimiter = ',', default_values_t = SourceKind::DEFAULTS)]
    pub sources: Vec<SourceKind>,

    /// Archive best prices to this JSON-lines file instead of memory.
    #[clap(long)]
    pub history_file: Option<PathBuf>,

    /// Do not archive best prices at all.
    #[clap(long, conflicts_with = "history_file")]
    pub no_history: bool,

    /// Alpha Vantage API key, required by the `alpha_vantage` source.
    #[clap(long, env = "ALPHAVANTAGE_API_KEY")]
    pub alphavantage_key: Option<String>,

    /// Alpha Vantage query endpoint.
    #[clap(long, default_value = crate::sources::alpha_vantage::DEFAULT_BASE_URL)]
    pub alphavantage_url: String,
}
