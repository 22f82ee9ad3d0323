//! Single price observation.
//!
//! A `Tick` is created by a source and consumed once by the engine. The
//! default value (blank symbol and source, zero price, Unix epoch timestamp)
//! is the *empty* tick: it carries no information and never changes state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One observation of `price` for `symbol`, reported by `source` at `observed_at`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Instrument symbol as reported by the source (any case, maybe padded).
    pub symbol: String,
    /// Observed price.
    pub price: f64,
    /// When the source observed the price.
    pub observed_at: DateTime<Utc>,
    /// Name of the reporting source.
    pub source: String,
}

impl Tick {
    /// Create a tick.
    pub fn new(
        symbol: impl Into<String>,
        price: f64,
        observed_at: DateTime<Utc>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            observed_at,
            source: source.into(),
        }
    }

    /// `true` iff every field is at its zero value at once.
    pub fn is_empty(&self) -> bool {
        self.symbol.is_empty()
            && self.price == 0.0
            && self.observed_at == DateTime::<Utc>::default()
            && self.source.is_empty()
    }
}
