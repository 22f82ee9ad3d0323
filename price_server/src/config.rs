//! Validated server configuration.
//!
//! `ServerConfig` is built from [`Args`] once at startup; anything invalid is
//! reported as `PriceError::InvalidConfig` before a socket is opened.

use std::path::PathBuf;
use std::time::Duration;

use price_common::{PriceError, Result};

use crate::args::Args;
use crate::engine::EngineConfig;
use crate::history::{HistoryArchive, InMemoryHistory, JsonlHistory};
use crate::sources::{AlphaVantageConfig, SourceKind};

/// Where accepted best prices are archived.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryMode {
    /// No archive.
    Disabled,
    /// In-process archive.
    InMemory,
    /// JSON-lines file.
    File(PathBuf),
}

impl HistoryMode {
    /// Build the archive for this mode.
    pub fn build(&self) -> Option<Box<dyn HistoryArchive>> {
        match self {
            HistoryMode::Disabled => None,
            HistoryMode::InMemory => Some(Box::new(InMemoryHistory::new())),
            HistoryMode::File(path) => Some(Box::new(JsonlHistory::new(path))),
        }
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Request listener address.
    pub bind: String,
    /// Engine thresholds.
    pub engine: EngineConfig,
    /// Sources in polling order.
    pub sources: Vec<SourceKind>,
    /// Archive backend.
    pub history: HistoryMode,
    /// Alpha Vantage settings, present when an API key was given.
    pub alpha_vantage: Option<AlphaVantageConfig>,
}

impl TryFrom<Args> for ServerConfig {
    type Error = PriceError;

    fn try_from(args: Args) -> Result<Self> {
        let engine = EngineConfig {
            stale_threshold: Duration::from_secs(args.stale_secs),
            outlier_percentage: args.outlier_pct,
        };
        engine.validate()?;

        let alpha_vantage = args
            .alphavantage_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .map(|key| AlphaVantageConfig {
                base_url: args.alphavantage_url.clone(),
                ..AlphaVantageConfig::new(key)
            });
        if args.sources.contains(&SourceKind::AlphaVantage) && alpha_vantage.is_none() {
            return Err(PriceError::InvalidConfig(
                "alpha_vantage source requires --alphavantage-key or ALPHAVANTAGE_API_KEY"
                    .to_string(),
            ));
        }

        let history = match (args.no_history, args.history_file) {
            (true, _) => HistoryMode::Disabled,
            (false, Some(path)) => HistoryMode::File(path),
            (false, None) => HistoryMode::InMemory,
        };

        Ok(Self {
            bind: args.bind.trim().to_string(),
            engine,
            sources: args.sources,
            history,
            alpha_vantage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> Result<ServerConfig> {
        let mut full = vec!["price_server"];
        full.extend_from_slice(argv);
        ServerConfig::try_from(Args::try_parse_from(full).unwrap())
    }

    #[test]
    fn defaults_match_engine_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8090");
        assert_eq!(config.engine, EngineConfig::default());
        assert_eq!(config.sources, SourceKind::DEFAULTS.to_vec());
        assert_eq!(config.history, HistoryMode::InMemory);
    }

    #[test]
    fn sources_keep_command_line_order() {
        let config = parse(&["--sources", "outlier,NORMAL"]).unwrap();
        assert_eq!(config.sources, vec![SourceKind::Outlier, SourceKind::Normal]);
    }

    #[test]
    fn history_modes() {
        assert_eq!(parse(&["--no-history"]).unwrap().history, HistoryMode::Disabled);
        assert_eq!(
            parse(&["--history-file", "prices.jsonl"]).unwrap().history,
            HistoryMode::File(PathBuf::from("prices.jsonl"))
        );
    }

    #[test]
    fn thresholds_are_configurable_and_validated() {
        let config = parse(&["--stale-secs", "5", "--outlier-pct", "0.1"]).unwrap();
        assert_eq!(config.engine.stale_threshold, Duration::from_secs(5));
        assert_eq!(config.engine.outlier_percentage, 0.1);

        assert!(matches!(
            parse(&["--outlier-pct=-1"]),
            Err(PriceError::InvalidConfig(_))
        ));
    }

    #[test]
    fn alpha_vantage_needs_a_key() {
        assert!(matches!(
            parse(&["--sources", "alpha_vantage", "--alphavantage-key", " "]),
            Err(PriceError::InvalidConfig(_))
        ));
        let config = parse(&["--sources", "alpha_vantage", "--alphavantage-key", "demo"]).unwrap();
        assert_eq!(config.alpha_vantage.unwrap().api_key, "demo");
    }
}
