//! Tick resolution engine.
//!
//! The engine owns the [`BestPriceStore`] and is the only writer to it. Each
//! incoming tick runs through the same checks, stopping at the first match:
//!
//! 1. empty ticks are ignored;
//! 2. ticks with a blank symbol or a non-finite price are rejected;
//! 3. ticks older than `now - stale_threshold` are rejected;
//! 4. the first tick for a symbol is accepted as-is;
//! 5. ticks deviating from the current price by more than
//!    `outlier_percentage` are rejected (only when the current price is > 0);
//! 6. newer ticks replace the current record, older ones are dropped, and
//!    ticks with the exact same timestamp go through the tie-break: the source
//!    name that sorts first (case-insensitive) wins, then the lower price.
//!
//! Rejections are ordinary outcomes. They are logged, never returned as errors.
//!
//! Steps 4–6 run under the store's write lock, so two concurrent ticks for
//! the same symbol cannot both decide against the same current record.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use log::{debug, info, warn};
use price_common::symbol;
use price_common::{PriceError, Result};

use crate::clock::Clock;
use crate::model::{BestPrice, Tick};
use crate::store::BestPriceStore;

/// Default freshness window.
pub const DEFAULT_STALE_THRESHOLD: Duration = Duration::from_secs(60);
/// Default maximum relative deviation from the current best price.
pub const DEFAULT_OUTLIER_PERCENTAGE: f64 = 0.25;

/// Policy knobs, fixed when the engine is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Ticks observed longer ago than this are stale.
    pub stale_threshold: Duration,
    /// Maximum `|new - current| / current` accepted once a baseline exists.
    pub outlier_percentage: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stale_threshold: DEFAULT_STALE_THRESHOLD,
            outlier_percentage: DEFAULT_OUTLIER_PERCENTAGE,
        }
    }
}

impl EngineConfig {
    /// Check that the knobs make sense.
    pub fn validate(&self) -> Result<()> {
        if !self.outlier_percentage.is_finite() || self.outlier_percentage < 0.0 {
            return Err(PriceError::InvalidConfig(format!(
                "outlier percentage must be a finite, non-negative fraction, got {}",
                self.outlier_percentage
            )));
        }
        Ok(())
    }
}

/// Why a tick became the best price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// No record existed for the symbol.
    First,
    /// Strictly newer than the current record.
    Newer,
    /// Same timestamp, won the tie-break.
    TieBreak,
}

impl fmt::Display for Acceptance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Acceptance::First => "first",
            Acceptance::Newer => "newer",
            Acceptance::TieBreak => "tie-break",
        })
    }
}

/// Why a tick was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Every field at its zero value.
    Empty,
    /// Blank symbol on an otherwise populated tick.
    BlankSymbol,
    /// NaN or infinite price.
    NonFinitePrice,
    /// Observed before `now - stale_threshold`.
    Stale,
    /// Too far from the current best price.
    Outlier,
    /// Same timestamp, lost the tie-break.
    LostTieBreak,
    /// Older than the current record.
    OutOfOrder,
}

/// Outcome of running one tick through the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The tick is now the best price for its symbol.
    Accepted(Acceptance),
    /// The tick left the store untouched.
    Rejected(Rejection),
}

/// Keeps one best price per symbol out of a stream of unreliable ticks.
pub struct ResolutionEngine {
    config: EngineConfig,
    stale_window: Option<TimeDelta>,
    clock: Arc<dyn Clock>,
    store: BestPriceStore,
}

impl ResolutionEngine {
    /// Build an engine with `config`, reading time from `clock`.
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        // A window too large for chrono means nothing is ever stale.
        let stale_window = TimeDelta::from_std(config.stale_threshold).ok();
        Self {
            config,
            stale_window,
            clock,
            store: BestPriceStore::new(),
        }
    }

    /// Engine with the default thresholds.
    pub fn with_defaults(clock: Arc<dyn Clock>) -> Self {
        Self::new(EngineConfig::default(), clock)
    }

    /// Offer `tick` as the new best price for its symbol.
    pub fn ingest(&self, tick: Tick) {
        let decision = self.resolve(&tick);
        match decision {
            Decision::Accepted(how) => info!(
                "Accepted best price ({}) for symbol={} price={} ts={} source={}",
                how, tick.symbol, tick.price, tick.observed_at, tick.source
            ),
            Decision::Rejected(Rejection::Stale) => warn!(
                "Rejected stale tick for symbol={} ts={} source={}",
                tick.symbol, tick.observed_at, tick.source
            ),
            Decision::Rejected(Rejection::Outlier) => warn!(
                "Rejected outlier tick for symbol={} price={} pctThreshold={} source={}",
                tick.symbol, tick.price, self.config.outlier_percentage, tick.source
            ),
            Decision::Rejected(why) => debug!(
                "Dropped tick ({:?}) for symbol={} price={} ts={} source={}",
                why, tick.symbol, tick.price, tick.observed_at, tick.source
            ),
        }
    }

    /// Best price for `symbol` (trimmed, case-insensitive).
    ///
    /// Blank input and records with a non-positive price come back as `None`.
    pub fn get_best(&self, symbol: &str) -> Option<Arc<BestPrice>> {
        let key = symbol::normalize(symbol)?;
        self.store.get(&key).filter(|record| record.price() > 0.0)
    }

    /// Snapshot of every stored record, ordered by symbol.
    pub fn get_all_best(&self) -> BTreeMap<String, Arc<BestPrice>> {
        self.store.snapshot()
    }

    fn resolve(&self, tick: &Tick) -> Decision {
        if tick.is_empty() {
            return Decision::Rejected(Rejection::Empty);
        }
        let Some(key) = symbol::normalize(&tick.symbol) else {
            return Decision::Rejected(Rejection::BlankSymbol);
        };
        if !tick.price.is_finite() {
            return Decision::Rejected(Rejection::NonFinitePrice);
        }
        if self.is_stale(tick.observed_at, self.clock.now()) {
            return Decision::Rejected(Rejection::Stale);
        }

        let mut records = self.store.write();
        let decision = match records.get(&key) {
            None => Decision::Accepted(Acceptance::First),
            Some(current) if self.is_outlier(tick.price, current.price()) => {
                Decision::Rejected(Rejection::Outlier)
            }
            Some(current) => match tick.observed_at.cmp(&current.observed_at()) {
                Ordering::Greater => Decision::Accepted(Acceptance::Newer),
                Ordering::Equal if wins_tie_break(tick, current) => {
                    Decision::Accepted(Acceptance::TieBreak)
                }
                Ordering::Equal => Decision::Rejected(Rejection::LostTieBreak),
                Ordering::Less => Decision::Rejected(Rejection::OutOfOrder),
            },
        };

        if let Decision::Accepted(how) = decision {
            let record = BestPrice::from_tick(tick, Some(how.to_string()));
            records.insert(key, Arc::new(record));
        }
        decision
    }

    fn is_stale(&self, observed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self.stale_window.and_then(|window| now.checked_sub_signed(window)) {
            Some(cutoff) => observed_at < cutoff,
            None => false,
        }
    }

    fn is_outlier(&self, price: f64, current: f64) -> bool {
        if current <= 0.0 {
            return false;
        }
        (price - current).abs() / current > self.config.outlier_percentage
    }
}

/// Same-timestamp rule: lexically smaller source (case-insensitive) wins,
/// then the lower price. A full tie keeps the current record.
fn wins_tie_break(tick: &Tick, current: &BestPrice) -> bool {
    let incoming = tick.source.to_uppercase();
    let existing = current.source().to_uppercase();
    match incoming.cmp(&existing) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => tick.price < current.price(),
    }
}
