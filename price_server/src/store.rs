//! Symbol → best price map owned by the resolution engine.
//!
//! Records are held behind `Arc` and swapped whole, so a reader either sees
//! the previous record or the new one, never a half-built value. Only the
//! engine gets write access (`pub(crate)`); everybody else reads snapshots.
//!
//! Keys are canonical symbols (see `price_common::symbol::normalize`). The
//! store itself does not normalise; callers pass canonical keys.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::model::BestPrice;

/// At most one record per symbol; entries are never removed.
#[derive(Debug, Default)]
pub struct BestPriceStore {
    records: RwLock<HashMap<String, Arc<BestPrice>>>,
}

impl BestPriceStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record stored under canonical `key`, if any.
    pub fn get(&self, key: &str) -> Option<Arc<BestPrice>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Point-in-time copy of every record, ordered by symbol.
    pub fn snapshot(&self) -> BTreeMap<String, Arc<BestPrice>> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(symbol, record)| (symbol.clone(), Arc::clone(record)))
            .collect()
    }

    /// Exclusive access for one read-modify-write decision.
    ///
    /// A poisoned lock is recovered: every write replaces a whole `Arc`, so
    /// the map is consistent even if a writer panicked.
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<BestPrice>>> {
        self.records.write().unwrap_or_else(PoisonError::into_inner)
    }
}
