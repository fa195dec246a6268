//! Recency-penalty strategy — the wheel rarely repeats itself immediately.
//!
//! Every outcome starts at an even score; outcomes seen in the last few
//! rounds are docked proportionally to how recently they hit, the most
//! recent docked hardest. With 37 slots and a handful of penalties the
//! prediction is effectively a uniform draw over the not-recently-seen.

use crate::domain::Outcome;
use crate::score::{self, ScoreBoard};
use rand::rngs::StdRng;

use super::Strategy;

/// Recent-outcome penalty strategy.
#[derive(Debug, Clone)]
pub struct RecencyPenalty {
    /// How many trailing rounds attract a penalty.
    pub lookback: usize,
    /// Penalty per step of recency; the most recent outcome loses
    /// `lookback * step`, the oldest penalized one loses `step`.
    pub step: f64,
}

impl RecencyPenalty {
    pub fn new(lookback: usize, step: f64) -> Self {
        assert!((1..=36).contains(&lookback), "lookback must be in 1..=36");
        assert!(step > 0.0, "step must be positive");
        Self { lookback, step }
    }

    pub fn default_params() -> Self {
        Self::new(5, 0.15)
    }

    pub(crate) fn board(&self, history: &[Outcome]) -> ScoreBoard {
        let mut board = ScoreBoard::filled(1.0);
        for (age, outcome) in score::window(history, self.lookback).iter().enumerate() {
            let penalty = (self.lookback - age) as f64 * self.step;
            let score = (board.get(*outcome) - penalty).max(0.0);
            board.set(*outcome, score);
        }
        board
    }
}

impl Strategy for RecencyPenalty {
    fn name(&self) -> &str {
        "recency_penalty"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        match self.board(history).sample_max(rng) {
            Some(outcome) => outcome,
            None => score::uniform_outcome(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn hist(values: &[u8]) -> Vec<Outcome> {
        values.iter().map(|&v| Outcome::new(v).unwrap()).collect()
    }

    #[test]
    fn recent_outcomes_are_never_predicted() {
        let history = hist(&[10, 20, 30, 0, 5]);
        let strategy = RecencyPenalty::default_params();
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..100 {
            let pick = strategy.predict(&history, &mut rng);
            assert!(
                !history.contains(&pick),
                "predicted recently-seen outcome {pick}"
            );
        }
    }

    #[test]
    fn most_recent_is_penalized_hardest() {
        let strategy = RecencyPenalty::default_params();
        let history = hist(&[10, 20]);
        let board = strategy.board(&history);
        let p10 = 1.0 - board.get(Outcome::new(10).unwrap());
        let p20 = 1.0 - board.get(Outcome::new(20).unwrap());
        assert!(p10 > p20);
    }

    #[test]
    fn penalty_floors_at_zero() {
        // An outcome hitting repeatedly in the window cannot go negative.
        let strategy = RecencyPenalty::default_params();
        let board = strategy.board(&hist(&[4, 4, 4, 4, 4]));
        assert_eq!(board.get(Outcome::new(4).unwrap()), 0.0);
    }

    #[test]
    fn empty_history_falls_back_to_uniform() {
        let strategy = RecencyPenalty::default_params();
        let mut rng = StdRng::seed_from_u64(6);
        assert!(strategy.predict(&[], &mut rng).value() <= 36);
    }
}
