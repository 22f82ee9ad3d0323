//! Price sources polled by the server.
//!
//! A source answers one question: "what is the latest tick for this symbol?"
//! It may answer with nothing. Failures (network, HTTP status, payload) are
//! handled inside the source and surface only as `None`; the poller and the
//! engine never see them.
//!
//! - `synthetic`: random-price sources used for demos and tests.
//! - `alpha_vantage`: live quotes over HTTP.

pub mod alpha_vantage;
pub mod synthetic;

use std::sync::Arc;

use clap::ValueEnum;
use price_common::{PriceError, Result};
use strum_macros::{Display, EnumString};

use crate::clock::Clock;
use crate::model::Tick;

pub use alpha_vantage::{AlphaVantageConfig, AlphaVantageSource};
pub use synthetic::{EmptyPriceSource, NormalPriceSource, OutlierPriceSource, StalePriceSource};

/// Something that can be asked for the latest tick of a symbol.
pub trait PriceSource: Send + Sync {
    /// Latest tick for `symbol`, or `None` if the source has nothing (or failed).
    fn latest_tick(&self, symbol: &str) -> Option<Tick>;

    /// Display name, used in logs.
    fn name(&self) -> &str;
}

/// Source implementations selectable from the command line.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Display, EnumString)]
#[clap(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SourceKind {
    Normal,
    Stale,
    Outlier,
    Empty,
    AlphaVantage,
}

impl SourceKind {
    /// Sources used when none are configured explicitly.
    pub const DEFAULTS: [SourceKind; 4] = [
        SourceKind::Normal,
        SourceKind::Stale,
        SourceKind::Outlier,
        SourceKind::Empty,
    ];
}

/// Instantiate `kinds` in order.
///
/// Fails if `AlphaVantage` is requested without `alpha_vantage` settings or
/// if its HTTP client cannot be built.
pub fn build_sources(
    kinds: &[SourceKind],
    clock: Arc<dyn Clock>,
    alpha_vantage: Option<&AlphaVantageConfig>,
) -> Result<Vec<Box<dyn PriceSource>>> {
    kinds
        .iter()
        .map(|kind| -> Result<Box<dyn PriceSource>> {
            let source: Box<dyn PriceSource> = match kind {
                SourceKind::Normal => Box::new(NormalPriceSource::new(Arc::clone(&clock))),
                SourceKind::Stale => Box::new(StalePriceSource::new(Arc::clone(&clock))),
                SourceKind::Outlier => Box::new(OutlierPriceSource::new(Arc::clone(&clock))),
                SourceKind::Empty => Box::new(EmptyPriceSource),
                SourceKind::AlphaVantage => {
                    let config = alpha_vantage.ok_or_else(|| {
                        PriceError::InvalidConfig(
                            "alpha_vantage source requires an API key".to_string(),
                        )
                    })?;
                    Box::new(AlphaVantageSource::new(config.clone(), Arc::clone(&clock))?)
                }
            };
            Ok(source)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use std::str::FromStr;

    #[test]
    fn source_kind_parses_case_insensitively() {
        assert_eq!(<SourceKind as FromStr>::from_str("NORMAL").unwrap(), SourceKind::Normal);
        assert_eq!(
            <SourceKind as FromStr>::from_str("alpha_vantage").unwrap(),
            SourceKind::AlphaVantage
        );
        assert_eq!(SourceKind::Outlier.to_string(), "outlier");
        assert!(<SourceKind as FromStr>::from_str("bloomberg").is_err());
    }

    #[test]
    fn build_keeps_configured_order() {
        let sources = build_sources(
            &[SourceKind::Outlier, SourceKind::Normal, SourceKind::Stale],
            Arc::new(SystemClock),
            None,
        )
        .unwrap();
        let names: Vec<_> = sources.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["OutlierPriceSource", "NormalPriceSource", "StalePriceSource"]
        );
    }

    #[test]
    fn alpha_vantage_without_key_is_a_config_error() {
        let result = build_sources(&[SourceKind::AlphaVantage], Arc::new(SystemClock), None);
        assert!(matches!(result, Err(PriceError::InvalidConfig(_))));
    }
}
