//! PerformanceTracker — per-strategy accuracy documents and adaptive weights.
//!
//! One document per strategy in the `performance` collection. Every grading
//! event is a read-modify-write under a compare-and-swap retry loop; the
//! weight arithmetic itself lives in `spinlab_core::domain::performance` and
//! is recomputed deterministically on each event.

use crate::store::{self, Expected, Store, StoreError};
use spinlab_core::domain::{StrategyId, StrategyPerformance, WeightBlend};
use std::sync::Arc;

const COLLECTION: &str = "performance";

/// Durable per-strategy performance tracker.
#[derive(Clone)]
pub struct PerformanceTracker {
    store: Arc<dyn Store>,
    blend: WeightBlend,
    rolling_capacity: usize,
    max_retries: u32,
}

impl PerformanceTracker {
    pub fn new(
        store: Arc<dyn Store>,
        blend: WeightBlend,
        rolling_capacity: usize,
        max_retries: u32,
    ) -> Self {
        Self {
            store,
            blend,
            rolling_capacity,
            max_retries,
        }
    }

    /// Fold one grading event into the strategy's document.
    pub fn record(&self, strategy: &StrategyId, correct: bool) -> Result<(), StoreError> {
        let mut attempts = 0;
        loop {
            let existing = store::load::<StrategyPerformance>(
                self.store.as_ref(),
                COLLECTION,
                strategy.as_str(),
            )?;
            let (version, mut perf) = match existing {
                Some((version, perf)) => (version, perf),
                None => (0, StrategyPerformance::new(strategy.clone(), &self.blend)),
            };
            perf.record(correct, self.rolling_capacity, &self.blend);
            match store::save(
                self.store.as_ref(),
                COLLECTION,
                strategy.as_str(),
                &perf,
                Expected::Version(version),
            ) {
                Ok(_) => return Ok(()),
                Err(err @ StoreError::VersionConflict { .. }) => {
                    if attempts >= self.max_retries {
                        return Err(err);
                    }
                    attempts += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// Current performance document for one strategy, if any grading has
    /// ever happened.
    pub fn get(&self, strategy: &StrategyId) -> Result<Option<StrategyPerformance>, StoreError> {
        Ok(store::load::<StrategyPerformance>(
            self.store.as_ref(),
            COLLECTION,
            strategy.as_str(),
        )?
        .map(|(_, perf)| perf))
    }

    /// All performance documents, sorted by descending dynamic weight.
    pub fn snapshot(&self) -> Result<Vec<StrategyPerformance>, StoreError> {
        let mut all = Vec::new();
        for key in self.store.list_keys(COLLECTION)? {
            if let Some((_, perf)) =
                store::load::<StrategyPerformance>(self.store.as_ref(), COLLECTION, &key)?
            {
                all.push(perf);
            }
        }
        all.sort_by(|a, b| {
            b.dynamic_weight
                .partial_cmp(&a.dynamic_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.strategy_id.as_str().cmp(b.strategy_id.as_str()))
        });
        Ok(all)
    }

    pub fn blend(&self) -> &WeightBlend {
        &self.blend
    }
}
