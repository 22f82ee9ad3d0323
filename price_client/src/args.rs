//! Command-line arguments for the price client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use price_common::Request;
use price_common::net::{COMMAND_PORT, addr};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server address (`ip:port`) where the price service is running.
    #[clap(long, default_value_t = addr("127.0.0.1", COMMAND_PORT))]
    pub server: String,

    /// What to ask the server.
    #[command(subcommand)]
    pub command: Command,
}

/// One request per invocation.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current best price for a symbol
    Best {
        /// Symbol, e.g. BTCUSD (case-insensitive)
        symbol: String,
    },
    /// Current best prices for all symbols
    All,
    /// Symbols that currently have a best price
    Symbols,
    /// Poll every source for a symbol, then show its best price
    Poll {
        /// Symbol, e.g. BTCUSD (case-insensitive)
        symbol: String,
    },
    /// Archived best prices
    History {
        /// Only this symbol
        #[clap(long)]
        symbol: Option<String>,
        /// Inclusive start, RFC 3339 (e.g. 2026-01-01T00:00:00Z)
        #[clap(long)]
        start: Option<DateTime<Utc>>,
        /// Inclusive end, RFC 3339
        #[clap(long)]
        end: Option<DateTime<Utc>>,
    },
}

impl From<Command> for Request {
    fn from(command: Command) -> Self {
        match command {
            Command::Best { symbol } => Request::Best { symbol },
            Command::All => Request::All,
            Command::Symbols => Request::Symbols,
            Command::Poll { symbol } => Request::Poll { symbol },
            Command::History { symbol, start, end } => Request::History { symbol, start, end },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_bounds_parse_as_rfc3339() {
        let args = Args::try_parse_from([
            "price_client",
            "history",
            "--symbol",
            "btcusd",
            "--start",
            "2026-01-01T00:00:00Z",
        ])
        .unwrap();
        assert_eq!(args.server, "127.0.0.1:8090");
        assert_eq!(
            Request::from(args.command),
            Request::History {
                symbol: Some("btcusd".into()),
                start: Some("2026-01-01T00:00:00Z".parse().unwrap()),
                end: None,
            }
        );
    }

    #[test]
    fn poll_takes_positional_symbol() {
        let args = Args::try_parse_from([
            "price_client",
            "--server",
            "10.0.0.1:9000",
            "poll",
            "ETHUSD",
        ])
        .unwrap();
        assert_eq!(args.server, "10.0.0.1:9000");
        assert_eq!(
            Request::from(args.command),
            Request::Poll { symbol: "ETHUSD".into() }
        );
    }
}
