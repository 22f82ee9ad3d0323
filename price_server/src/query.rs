//! Read-only view over the engine's best prices.
//!
//! This is what the request layer talks to. It hands out `Arc` snapshots of
//! immutable records, so nothing it returns can change the store.

use std::sync::Arc;

use crate::engine::ResolutionEngine;
use crate::model::BestPrice;

/// Read-only accessors over the best-price store.
#[derive(Clone)]
pub struct PriceQuery {
    engine: Arc<ResolutionEngine>,
}

impl PriceQuery {
    /// Facade over `engine`.
    pub fn new(engine: Arc<ResolutionEngine>) -> Self {
        Self { engine }
    }

    /// Best price for `symbol` (trimmed, case-insensitive), if any.
    pub fn best(&self, symbol: &str) -> Option<Arc<BestPrice>> {
        self.engine.get_best(symbol)
    }

    /// Every stored record, ordered by symbol.
    pub fn all_best(&self) -> Vec<Arc<BestPrice>> {
        self.engine.get_all_best().into_values().collect()
    }

    /// Every symbol with a stored record, ascending.
    pub fn symbols(&self) -> Vec<String> {
        self.engine.get_all_best().into_keys().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::model::Tick;
    use chrono::Utc;

    #[test]
    fn reads_reflect_engine_state_in_symbol_order() {
        let engine = Arc::new(ResolutionEngine::with_defaults(Arc::new(SystemClock)));
        let query = PriceQuery::new(Arc::clone(&engine));
        assert!(query.all_best().is_empty());
        assert!(query.symbols().is_empty());

        let now = Utc::now();
        engine.ingest(Tick::new("ethusd", 3000.0, now, "A"));
        engine.ingest(Tick::new("BTCUSD", 25000.0, now, "A"));

        assert_eq!(query.symbols(), vec!["BTCUSD", "ETHUSD"]);
        let prices: Vec<_> = query.all_best().iter().map(|r| r.price()).collect();
        assert_eq!(prices, vec![25000.0, 3000.0]);
        assert_eq!(query.best(" EthUsd ").unwrap().price(), 3000.0);
    }
}
