//! First-order Markov strategy — transition counts over the full history.
//!
//! Builds the outcome → next-outcome count matrix from every consecutive
//! pair observed so far and takes the argmax row of the current last
//! outcome, ties broken uniformly. A last outcome with no recorded
//! transitions falls back to a uniform draw. Grades strictly: a transition
//! model predicts an exact successor, not a sector.

use crate::domain::{Outcome, OUTCOME_COUNT};
use crate::score::{self, ScoreBoard};
use crate::wheel::WheelTopology;
use rand::rngs::StdRng;

use super::Strategy;

/// First-order transition-matrix strategy.
#[derive(Debug, Clone, Default)]
pub struct MarkovChain;

impl MarkovChain {
    pub fn default_params() -> Self {
        Self
    }

    /// Count matrix built in play order from a most-recent-first history:
    /// `counts[a][b]` = times `b` followed `a`.
    pub(crate) fn transition_counts(history: &[Outcome]) -> [[u32; OUTCOME_COUNT]; OUTCOME_COUNT] {
        let mut counts = [[0u32; OUTCOME_COUNT]; OUTCOME_COUNT];
        // history[i+1] happened immediately before history[i].
        for pair in history.windows(2) {
            counts[pair[1].index()][pair[0].index()] += 1;
        }
        counts
    }
}

impl Strategy for MarkovChain {
    fn name(&self) -> &str {
        "markov_chain"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        let Some(&last) = history.first() else {
            return score::uniform_outcome(rng);
        };
        let counts = Self::transition_counts(history);
        let row = &counts[last.index()];

        let mut board = ScoreBoard::new();
        for outcome in Outcome::all() {
            board.set(outcome, row[outcome.index()] as f64);
        }
        match board.sample_max(rng) {
            Some(outcome) => outcome,
            // Last outcome has never been followed by anything yet.
            None => score::uniform_outcome(rng),
        }
    }

    // Strict per-strategy policy: exact match only.
    fn grade(&self, predicted: Outcome, actual: Outcome, _wheel: &WheelTopology) -> bool {
        predicted == actual
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
    fn dominant_transition_is_predicted() {
        // 12 is followed by 35 twice and by 1 once; history ends on 12.
        let history = hist_chrono(&[12, 35, 4, 12, 1, 7, 12, 35, 9, 12]);
        let strategy = MarkovChain::default_params();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(
            strategy.predict(&history, &mut rng),
            Outcome::new(35).unwrap()
        );
    }

    #[test]
    fn tied_transitions_sample_among_the_tie() {
        // 6 → 11 once, 6 → 29 once.
        let history = hist_chrono(&[6, 11, 3, 6, 29, 8, 6]);
        let strategy = MarkovChain::default_params();
        let mut rng = StdRng::seed_from_u64(3);
        let eleven = Outcome::new(11).unwrap();
        let twentynine = Outcome::new(29).unwrap();
        for _ in 0..30 {
            let pick = strategy.predict(&history, &mut rng);
            assert!(pick == eleven || pick == twentynine);
        }
    }

    #[test]
    fn unseen_last_outcome_falls_back_to_uniform() {
        // History ends on 36, which never appeared before.
        let history = hist_chrono(&[1, 2, 1, 2, 36]);
        let strategy = MarkovChain::default_params();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(strategy.predict(&history, &mut rng).value() <= 36);
    }

    #[test]
    fn empty_history_falls_back_to_uniform() {
        let strategy = MarkovChain::default_params();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(strategy.predict(&[], &mut rng).value() <= 36);
    }

    #[test]
    fn grading_is_exact_only() {
        let wheel = WheelTopology::standard();
        let strategy = MarkovChain::default_params();
        let zero = Outcome::ZERO;
        assert!(strategy.grade(zero, zero, wheel));
        assert!(!strategy.grade(zero, Outcome::new(32).unwrap(), wheel));
    }

    #[test]
    fn counts_follow_play_order() {
        let history = hist_chrono(&[4, 9, 4, 9]);
        let counts = MarkovChain::transition_counts(&history);
        assert_eq!(counts[4][9], 2);
        assert_eq!(counts[9][4], 1);
        assert_eq!(counts[9][9], 0);
    }
}
