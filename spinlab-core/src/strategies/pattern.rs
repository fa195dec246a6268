//! Pattern-repeat strategy — repeated 2- and 3-outcome subsequences.
//!
//! Scans the trailing window for bigrams and trigrams that occurred before.
//! When the most recent outcomes match the prefix of a previously seen
//! subsequence, that subsequence's successor becomes a candidate; trigram
//! continuations weigh double the bigram ones.

use crate::domain::Outcome;
use crate::score::{self, ScoreBoard};
use rand::rngs::StdRng;

use super::Strategy;

/// Repeating-subsequence strategy over a trailing window.
#[derive(Debug, Clone)]
pub struct PatternRepeat {
    pub window: usize,
    pub bigram_weight: f64,
    pub trigram_weight: f64,
}

impl PatternRepeat {
    pub fn new(window: usize, bigram_weight: f64, trigram_weight: f64) -> Self {
        assert!(window >= 3, "window must be >= 3");
        Self {
            window,
            bigram_weight,
            trigram_weight,
        }
    }

    pub fn default_params() -> Self {
        Self::new(100, 1.0, 2.0)
    }

    fn board(&self, history: &[Outcome]) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        // The scan walks in play order; history arrives most-recent-first.
        let chrono: Vec<Outcome> = score::window(history, self.window)
            .iter()
            .rev()
            .copied()
            .collect();
        let n = chrono.len();
        if n < 3 {
            return board;
        }

        let last_two = (chrono[n - 2], chrono[n - 1]);
        // Bigram continuations: earlier (a, b) -> next. The final pair is the
        // query itself, so stop one short of it.
        for i in 0..n - 2 {
            if (chrono[i], chrono[i + 1]) == last_two {
                board.add(chrono[i + 2], self.bigram_weight);
            }
        }

        if n >= 4 {
            let last_three = (chrono[n - 3], chrono[n - 2], chrono[n - 1]);
            for i in 0..n - 3 {
                if (chrono[i], chrono[i + 1], chrono[i + 2]) == last_three {
                    board.add(chrono[i + 3], self.trigram_weight);
                }
            }
        }
        board
    }
}

impl Strategy for PatternRepeat {
    fn name(&self) -> &str {
        "pattern_repeat"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        match self.board(history).sample_max(rng) {
            Some(outcome) => outcome,
            // No subsequence match anywhere in the window.
            None => score::uniform_outcome(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    /// Build a most-recent-first history from play order.
    fn hist_chrono(values: &[u8]) -> Vec<Outcome> {
        values
            .iter()
            .rev()
            .map(|&v| Outcome::new(v).unwrap())
            .collect()
    }

    #[test]
    fn bigram_continuation_is_predicted() {
        // Play order: ... 5,9,22 ... then ends with 5,9 — continuation is 22.
        let history = hist_chrono(&[5, 9, 22, 14, 31, 2, 5, 9]);
        let strategy = PatternRepeat::default_params();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            strategy.predict(&history, &mut rng),
            Outcome::new(22).unwrap()
        );
    }

    #[test]
    fn trigram_outweighs_conflicting_bigram() {
        // Bigram (9,4) once continued by 30; trigram (5,9,4) once continued
        // by 17. The tail matches both; the trigram's double weight wins.
        // Note the bigram occurrence inside the trigram also adds 17.
        let history = hist_chrono(&[5, 9, 4, 17, 1, 9, 4, 30, 2, 5, 9, 4]);
        let strategy = PatternRepeat::default_params();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            strategy.predict(&history, &mut rng),
            Outcome::new(17).unwrap()
        );
    }

    #[test]
    fn no_repeat_falls_back_to_uniform() {
        let history = hist_chrono(&[1, 2, 3, 4, 5, 6, 7]);
        let strategy = PatternRepeat::default_params();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(strategy.predict(&history, &mut rng).value() <= 36);
    }

    #[test]
    fn short_history_falls_back_to_uniform() {
        let strategy = PatternRepeat::default_params();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(strategy
            .predict(&hist_chrono(&[3, 3]), &mut rng)
            .value()
            <= 36);
    }

    #[test]
    #[should_panic(expected = "window must be >= 3")]
    fn rejects_tiny_window() {
        PatternRepeat::new(2, 1.0, 2.0);
    }
}
