//! StrategyPerformance — rolling accuracy and the derived adaptive weight.

use super::ids::StrategyId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Canonical blend of lifetime and rolling accuracy into a bounded weight.
///
/// `weight = clamp(100 · (lifetime_share · lifetime + rolling_share · rolling))`.
/// A strategy with no graded history sits at the neutral midpoint of the
/// clamp range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBlend {
    pub lifetime_share: f64,
    pub rolling_share: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for WeightBlend {
    fn default() -> Self {
        Self {
            lifetime_share: 0.3,
            rolling_share: 0.7,
            min_weight: 20.0,
            max_weight: 80.0,
        }
    }
}

impl WeightBlend {
    pub fn neutral(&self) -> f64 {
        (self.min_weight + self.max_weight) / 2.0
    }

    pub fn compute(&self, lifetime_accuracy: f64, rolling_accuracy: f64) -> f64 {
        let raw =
            100.0 * (self.lifetime_share * lifetime_accuracy + self.rolling_share * rolling_accuracy);
        raw.clamp(self.min_weight, self.max_weight)
    }
}

/// Per-strategy rolling accuracy and adaptive weight.
///
/// Recomputed deterministically from `usage_count` / `correct_count` /
/// `rolling` on every grading event; never mutated outside [`Self::record`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyPerformance {
    pub strategy_id: StrategyId,
    pub usage_count: u64,
    pub correct_count: u64,
    /// Bounded FIFO of recent grades, oldest first.
    pub rolling: VecDeque<bool>,
    pub dynamic_weight: f64,
    pub last_updated: DateTime<Utc>,
}

impl StrategyPerformance {
    pub fn new(strategy_id: StrategyId, blend: &WeightBlend) -> Self {
        Self {
            strategy_id,
            usage_count: 0,
            correct_count: 0,
            rolling: VecDeque::new(),
            dynamic_weight: blend.neutral(),
            last_updated: Utc::now(),
        }
    }

    pub fn lifetime_accuracy(&self) -> f64 {
        if self.usage_count == 0 {
            return 0.0;
        }
        self.correct_count as f64 / self.usage_count as f64
    }

    pub fn rolling_accuracy(&self) -> f64 {
        if self.rolling.is_empty() {
            return 0.0;
        }
        let hits = self.rolling.iter().filter(|&&hit| hit).count();
        hits as f64 / self.rolling.len() as f64
    }

    /// Fold one grading event into the counters and recompute the weight.
    pub fn record(&mut self, correct: bool, capacity: usize, blend: &WeightBlend) {
        self.usage_count += 1;
        if correct {
            self.correct_count += 1;
        }
        self.rolling.push_back(correct);
        while self.rolling.len() > capacity {
            self.rolling.pop_front();
        }
        self.dynamic_weight =
            blend.compute(self.lifetime_accuracy(), self.rolling_accuracy());
        self.last_updated = Utc::now();
    }
}
