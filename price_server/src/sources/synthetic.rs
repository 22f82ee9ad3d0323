//! Random-price sources.
//!
//! Each one models a kind of unreliable feed: a plausible one, one that lags
//! far behind, one that spikes, and one that never answers. Timestamps come
//! from the injected clock so tests can pin them.

use std::sync::Arc;

use chrono::TimeDelta;
use rand::Rng;

use crate::clock::Clock;
use crate::model::Tick;
use crate::sources::PriceSource;

/// How far behind the stale source reports.
const STALE_LAG_MINUTES: i64 = 100;

fn random_tick(
    symbol: &str,
    low: f64,
    high: f64,
    clock: &dyn Clock,
    lag: TimeDelta,
    name: &str,
) -> Option<Tick> {
    if symbol.trim().is_empty() {
        return None;
    }
    let price = rand::rng().random_range(low..high);
    Some(Tick::new(symbol, price, clock.now() - lag, name))
}

/// Fresh ticks priced uniformly in `[0, 30000)`.
pub struct NormalPriceSource {
    clock: Arc<dyn Clock>,
}

impl NormalPriceSource {
    /// Display name.
    pub const NAME: &'static str = "NormalPriceSource";

    /// Create the source.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl PriceSource for NormalPriceSource {
    fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        random_tick(symbol, 0.0, 30000.0, self.clock.as_ref(), TimeDelta::zero(), Self::NAME)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Ticks priced like [`NormalPriceSource`] but observed 100 minutes ago.
pub struct StalePriceSource {
    clock: Arc<dyn Clock>,
}

impl StalePriceSource {
    /// Display name.
    pub const NAME: &'static str = "StalePriceSource";

    /// Create the source.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl PriceSource for StalePriceSource {
    fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        random_tick(
            symbol,
            0.0,
            30000.0,
            self.clock.as_ref(),
            TimeDelta::minutes(STALE_LAG_MINUTES),
            Self::NAME,
        )
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Fresh ticks priced in `[40000, 60000)`, well above the normal range.
pub struct OutlierPriceSource {
    clock: Arc<dyn Clock>,
}

impl OutlierPriceSource {
    /// Display name.
    pub const NAME: &'static str = "OutlierPriceSource";

    /// Create the source.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl PriceSource for OutlierPriceSource {
    fn latest_tick(&self, symbol: &str) -> Option<Tick> {
        random_tick(symbol, 40000.0, 60000.0, self.clock.as_ref(), TimeDelta::zero(), Self::NAME)
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

/// Never produces a tick.
pub struct EmptyPriceSource;

impl EmptyPriceSource {
    /// Display name.
    pub const NAME: &'static str = "EmptyPriceSource";
}

impl PriceSource for EmptyPriceSource {
    fn latest_tick(&self, _symbol: &str) -> Option<Tick> {
        None
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{DateTime, Utc};

    fn fixed_clock() -> (Arc<ManualClock>, DateTime<Utc>) {
        let at: DateTime<Utc> = "2026-01-01T00:00:00Z".parse().unwrap();
        (Arc::new(ManualClock::new(at)), at)
    }

    #[test]
    fn normal_source_reports_now_in_range() {
        let (clock, at) = fixed_clock();
        let tick = NormalPriceSource::new(clock).latest_tick("BTCUSD").unwrap();

        assert_eq!(tick.symbol, "BTCUSD");
        assert_eq!(tick.source, NormalPriceSource::NAME);
        assert_eq!(tick.observed_at, at);
        assert!((0.0..30000.0).contains(&tick.price));
    }

    #[test]
    fn stale_source_lags_by_100_minutes() {
        let (clock, at) = fixed_clock();
        let tick = StalePriceSource::new(clock).latest_tick("BTCUSD").unwrap();

        assert_eq!(tick.observed_at, at - TimeDelta::minutes(100));
        assert!((0.0..30000.0).contains(&tick.price));
    }

    #[test]
    fn outlier_source_prices_above_normal_range() {
        let (clock, _) = fixed_clock();
        let tick = OutlierPriceSource::new(clock).latest_tick("BTCUSD").unwrap();
        assert!((40000.0..60000.0).contains(&tick.price));
    }

    #[test]
    fn empty_source_and_blank_symbols_yield_nothing() {
        let (clock, _) = fixed_clock();
        assert!(EmptyPriceSource.latest_tick("BTCUSD").is_none());
        assert!(NormalPriceSource::new(clock).latest_tick("  ").is_none());
    }
}
