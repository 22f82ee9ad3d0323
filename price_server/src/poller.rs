//! Polling orchestrator.
//!
//! Asks every configured source for one symbol, in configured order, and
//! forwards whatever comes back to the engine. It keeps no results and makes
//! no decisions; the engine's tie-break is what makes the final best price
//! independent of polling order.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::engine::ResolutionEngine;
use crate::sources::PriceSource;

/// Fans one symbol out to all sources and feeds the engine.
pub struct Poller {
    sources: Vec<Box<dyn PriceSource>>,
    engine: Arc<ResolutionEngine>,
}

impl Poller {
    /// Poll `sources` (in this order) into `engine`.
    pub fn new(sources: Vec<Box<dyn PriceSource>>, engine: Arc<ResolutionEngine>) -> Self {
        Self { sources, engine }
    }

    /// Names of the configured sources, in polling order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    /// Query each source once for `symbol` and ingest every non-empty tick.
    pub fn poll_once(&self, symbol: &str) {
        if self.sources.is_empty() {
            warn!("poll_once called but no sources configured for symbol={}", symbol);
            return;
        }
        info!(
            "poll_once start for symbol={}, sources={}",
            symbol,
            self.sources.len()
        );

        for source in &self.sources {
            match source.latest_tick(symbol) {
                Some(tick) if !tick.is_empty() => {
                    debug!(
                        "forwarding tick: symbol={} price={} ts={} source={}",
                        tick.symbol, tick.price, tick.observed_at, tick.source
                    );
                    self.engine.ingest(tick);
                }
                _ => debug!("source={} returned no tick for symbol={}", source.name(), symbol),
            }
        }

        info!("poll_once complete for symbol={}", symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::Tick;
    use chrono::{DateTime, Utc};
    use std::sync::Mutex;

    fn t0() -> DateTime<Utc> {
        "2026-01-01T00:00:00Z".parse().unwrap()
    }

    /// Returns a fixed tick (or nothing) and records every symbol it was asked for.
    struct ScriptedSource {
        name: String,
        reply: Option<Tick>,
        asked: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedSource {
        fn new(
            name: &str,
            reply: Option<Tick>,
            asked: &Arc<Mutex<Vec<String>>>,
        ) -> Box<dyn PriceSource> {
            Box::new(Self {
                name: name.to_string(),
                reply,
                asked: Arc::clone(asked),
            })
        }
    }

    impl PriceSource for ScriptedSource {
        fn latest_tick(&self, symbol: &str) -> Option<Tick> {
            self.asked.lock().unwrap().push(format!("{}:{}", self.name, symbol));
            self.reply.clone()
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn engine() -> Arc<ResolutionEngine> {
        Arc::new(ResolutionEngine::with_defaults(Arc::new(ManualClock::new(t0()))))
    }

    #[test]
    fn each_source_is_asked_once_in_order() {
        let asked = Arc::new(Mutex::new(Vec::new()));
        let poller = Poller::new(
            vec![
                ScriptedSource::new("first", None, &asked),
                ScriptedSource::new(
                    "second",
                    Some(Tick::new("BTCUSD", 10.0, t0(), "second")),
                    &asked,
                ),
                ScriptedSource::new("third", None, &asked),
            ],
            engine(),
        );

        poller.poll_once("BTCUSD");

        assert_eq!(
            *asked.lock().unwrap(),
            vec!["first:BTCUSD", "second:BTCUSD", "third:BTCUSD"]
        );
        assert_eq!(poller.source_names(), vec!["first", "second", "third"]);
    }

    #[test]
    fn produced_ticks_reach_the_engine() {
        let asked = Arc::new(Mutex::new(Vec::new()));
        let engine = engine();
        let poller = Poller::new(
            vec![
                ScriptedSource::new("empty", Some(Tick::default()), &asked),
                ScriptedSource::new(
                    "live",
                    Some(Tick::new("btcusd", 25000.0, t0(), "live")),
                    &asked,
                ),
            ],
            Arc::clone(&engine),
        );

        poller.poll_once("btcusd");

        let best = engine.get_best("BTCUSD").unwrap();
        assert_eq!(best.price(), 25000.0);
        assert_eq!(best.source(), "live");
    }

    #[test]
    fn no_sources_is_a_no_op() {
        let engine = engine();
        let poller = Poller::new(Vec::new(), Arc::clone(&engine));
        poller.poll_once("BTCUSD");
        assert!(engine.get_all_best().is_empty());
    }

    #[test]
    fn polling_order_does_not_change_the_winner() {
        let ticks = [
            Tick::new("BTCUSD", 25000.0, t0(), "WeakSource"),
            Tick::new("BTCUSD", 23500.0, t0(), "BetterSource"),
            Tick::new("BTCUSD", 25000.0, t0(), "ATierSource"),
        ];
        let orders: [[usize; 3]; 3] = [[0, 1, 2], [2, 1, 0], [1, 2, 0]];

        for order in orders {
            let asked = Arc::new(Mutex::new(Vec::new()));
            let engine = engine();
            let sources = order
                .iter()
                .map(|&i| ScriptedSource::new(&ticks[i].source, Some(ticks[i].clone()), &asked))
                .collect();
            Poller::new(sources, Arc::clone(&engine)).poll_once("BTCUSD");

            assert_eq!(engine.get_best("BTCUSD").unwrap().source(), "ATierSource");
        }
    }
}
