//! Monte Carlo resampling strategy — vote by weighted redraw.
//!
//! Builds a recency-weighted frequency table (newer outcomes count more via
//! exponential decay, plus a small uniform floor so sparse histories still
//! spread), draws from it a fixed number of times, and returns the most
//! frequently drawn outcome.

use crate::domain::{Outcome, OUTCOME_COUNT};
use crate::score::{self, ScoreBoard};
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;

use super::Strategy;

/// Weighted-resampling strategy.
#[derive(Debug, Clone)]
pub struct MonteCarloResample {
    pub draws: usize,
    pub decay: f64,
    /// Uniform floor added to every outcome's weight.
    pub floor: f64,
}

impl MonteCarloResample {
    pub fn new(draws: usize, decay: f64, floor: f64) -> Self {
        assert!(draws >= 1, "draws must be >= 1");
        assert!(decay > 0.0 && decay <= 1.0, "decay must be in (0.0, 1.0]");
        assert!(floor > 0.0, "floor must be positive");
        Self { draws, decay, floor }
    }

    pub fn default_params() -> Self {
        Self::new(5_000, 0.97, 0.5)
    }

    fn weights(&self, history: &[Outcome]) -> [f64; OUTCOME_COUNT] {
        let mut weights = [self.floor; OUTCOME_COUNT];
        let mut contribution = 1.0;
        // history is most-recent-first, so decay applies per step of age.
        for outcome in history {
            weights[outcome.index()] += contribution;
            contribution *= self.decay;
        }
        weights
    }
}

impl Strategy for MonteCarloResample {
    fn name(&self) -> &str {
        "monte_carlo_resample"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        let weights = self.weights(history);
        // The floor keeps every weight positive, so this cannot fail.
        let Ok(distribution) = WeightedIndex::new(weights) else {
            return score::uniform_outcome(rng);
        };

        let mut tally = ScoreBoard::new();
        for _ in 0..self.draws {
            let slot = distribution.sample(rng) as u8;
            if let Ok(outcome) = Outcome::new(slot) {
                tally.add(outcome, 1.0);
            }
        }
        match tally.sample_max(rng) {
            Some(outcome) => outcome,
            None => score::uniform_outcome(rng),
        }
    }
}
