//! Hot-frequency strategy — outcomes running hot across three trailing windows.
//!
//! Frequency is computed over the 30, 60, and 90 most-recent outcomes,
//! combined 3:2:1 after normalizing each count by its window size, so the
//! short window dominates without drowning out persistence. The top seven
//! combined scores are the candidate pool.

use crate::domain::Outcome;
use crate::score::{self, ScoreBoard};
use rand::rngs::StdRng;

use super::Strategy;

/// Trailing windows and their blend weights, shortest first.
const WINDOWS: [(usize, f64); 3] = [(30, 3.0), (60, 2.0), (90, 1.0)];

/// Hot-number strategy over blended trailing frequency windows.
#[derive(Debug, Clone)]
pub struct HotFrequency {
    pub candidate_count: usize,
}

impl HotFrequency {
    pub fn new(candidate_count: usize) -> Self {
        assert!(candidate_count >= 1, "candidate_count must be >= 1");
        Self { candidate_count }
    }

    pub fn default_params() -> Self {
        Self::new(7)
    }

    /// The combined-score candidate pool, hottest first. Exposed so the
    /// candidate set itself is testable apart from the sampled pick.
    pub fn candidates(&self, history: &[Outcome]) -> Vec<Outcome> {
        let mut board = ScoreBoard::new();
        for (len, weight) in WINDOWS {
            let window = score::window(history, len);
            if window.is_empty() {
                continue;
            }
            let counts = score::frequencies(window);
            for outcome in Outcome::all() {
                let share = counts[outcome.index()] as f64 / window.len() as f64;
                board.add(outcome, weight * share);
            }
        }
        board.top(self.candidate_count)
    }
}

impl Strategy for HotFrequency {
    fn name(&self) -> &str {
        "hot_frequency"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        score::choose_or_uniform(&self.candidates(history), rng)
    }
}
