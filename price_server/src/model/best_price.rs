//! Accepted best price for a symbol.
//!
//! Records are immutable once built; the engine replaces a symbol's record by
//! storing a new one. Fields are private so the uppercase-symbol invariant
//! cannot be broken after construction.

use chrono::{DateTime, Utc};
use price_common::PriceView;
use serde::{Deserialize, Serialize};

use crate::model::tick::Tick;

/// Snapshot of the tick that currently wins for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPrice {
    symbol: String,
    price: f64,
    observed_at: DateTime<Utc>,
    source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

impl BestPrice {
    /// Build a record. `symbol` is trimmed and uppercased.
    pub fn new(
        symbol: &str,
        price: f64,
        observed_at: DateTime<Utc>,
        source: &str,
        reason: Option<String>,
    ) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            price,
            observed_at,
            source: source.to_string(),
            reason,
        }
    }

    /// Derive a record from an accepted tick.
    pub fn from_tick(tick: &Tick, reason: Option<String>) -> Self {
        Self::new(
            &tick.symbol,
            tick.price,
            tick.observed_at,
            &tick.source,
            reason,
        )
    }

    /// Canonical uppercase symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Raw (unrounded) price.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Observation time of the winning tick.
    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }

    /// Source of the winning tick.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Free-form annotation; the engine stores why the tick was accepted.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Wire representation with the client-facing rounding applied.
    pub fn to_view(&self) -> PriceView {
        PriceView::new(&self.symbol, self.price, self.observed_at, &self.source)
    }
}
