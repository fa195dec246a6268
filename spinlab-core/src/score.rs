//! Score-vector helpers shared by the strategy family.
//!
//! Every strategy reduces history to a 37-slot score vector and samples among
//! the maximal candidates, breaking ties uniformly with the injected RNG.
//! Centralizing that arithmetic keeps the per-strategy files down to the
//! heuristic itself.

use crate::domain::{Outcome, OUTCOME_COUNT};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Tolerance for "tied with the maximum" when sampling candidates.
const TIE_EPSILON: f64 = 1e-9;

/// A 37-slot score vector over all outcomes.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    scores: [f64; OUTCOME_COUNT],
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            scores: [0.0; OUTCOME_COUNT],
        }
    }

    /// Start every outcome at `base` (used by penalty-style strategies).
    pub fn filled(base: f64) -> Self {
        Self {
            scores: [base; OUTCOME_COUNT],
        }
    }

    pub fn add(&mut self, outcome: Outcome, weight: f64) {
        self.scores[outcome.index()] += weight;
    }

    pub fn scale(&mut self, outcome: Outcome, factor: f64) {
        self.scores[outcome.index()] *= factor;
    }

    pub fn set(&mut self, outcome: Outcome, score: f64) {
        self.scores[outcome.index()] = score;
    }

    pub fn get(&self, outcome: Outcome) -> f64 {
        self.scores[outcome.index()]
    }

    /// Merge another board in, scaled by `weight` (hybrid aggregation).
    pub fn merge(&mut self, other: &ScoreBoard, weight: f64) {
        for (slot, score) in self.scores.iter_mut().enumerate() {
            *score += other.scores[slot] * weight;
        }
    }

    /// Normalize to sum 1.0. A board with no positive mass is left untouched.
    pub fn normalize(&mut self) {
        let total: f64 = self.scores.iter().sum();
        if total > 0.0 {
            for score in &mut self.scores {
                *score /= total;
            }
        }
    }

    /// The `n` highest-scoring outcomes, best first. Ties resolve toward the
    /// lower outcome value so the cut is deterministic; randomness enters
    /// only at sampling time.
    pub fn top(&self, n: usize) -> Vec<Outcome> {
        let mut ranked: Vec<Outcome> = Outcome::all().collect();
        ranked.sort_by(|a, b| {
            self.get(*b)
                .partial_cmp(&self.get(*a))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(b))
        });
        ranked.truncate(n);
        ranked
    }

    /// Sample uniformly among all outcomes tied (within tolerance) for the
    /// maximal score. Returns `None` when no outcome has positive score —
    /// callers fall back to a uniform draw.
    pub fn sample_max(&self, rng: &mut StdRng) -> Option<Outcome> {
        let max = self
            .scores
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        if max <= 0.0 {
            return None;
        }
        let tied: Vec<Outcome> = Outcome::all()
            .filter(|o| (max - self.get(*o)) <= TIE_EPSILON)
            .collect();
        tied.choose(rng).copied()
    }
}

/// The most recent `n` outcomes of a most-recent-first history.
pub fn window(history: &[Outcome], n: usize) -> &[Outcome] {
    &history[..history.len().min(n)]
}

/// Occurrence counts per outcome over a slice of history.
pub fn frequencies(outcomes: &[Outcome]) -> [u32; OUTCOME_COUNT] {
    let mut counts = [0u32; OUTCOME_COUNT];
    for outcome in outcomes {
        counts[outcome.index()] += 1;
    }
    counts
}

/// Uniform draw over all 37 outcomes — the universal "no data" fallback.
pub fn uniform_outcome(rng: &mut StdRng) -> Outcome {
    let value = rng.gen_range(0..OUTCOME_COUNT as u8);
    Outcome::new(value).unwrap()
}

/// Uniform pick among explicit candidates; falls back to a uniform outcome
/// draw when the candidate list is empty.
pub fn choose_or_uniform(candidates: &[Outcome], rng: &mut StdRng) -> Outcome {
    match candidates.choose(rng) {
        Some(outcome) => *outcome,
        None => uniform_outcome(rng),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn o(v: u8) -> Outcome {
        Outcome::new(v).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn top_orders_by_score_then_value() {
        let mut board = ScoreBoard::new();
        board.set(o(5), 3.0);
        board.set(o(9), 3.0);
        board.set(o(1), 5.0);
        assert_eq!(board.top(3), vec![o(1), o(5), o(9)]);
    }

    #[test]
    fn sample_max_picks_only_maximal_outcomes() {
        let mut board = ScoreBoard::new();
        board.set(o(4), 2.0);
        board.set(o(30), 2.0);
        board.set(o(12), 1.0);

        let mut rng = rng();
        for _ in 0..50 {
            let pick = board.sample_max(&mut rng).unwrap();
            assert!(pick == o(4) || pick == o(30));
        }
    }

    #[test]
    fn sample_max_empty_board_is_none() {
        let board = ScoreBoard::new();
        assert!(board.sample_max(&mut rng()).is_none());

        // All-negative boards also defer to the uniform fallback.
        let negative = ScoreBoard::filled(-1.0);
        assert!(negative.sample_max(&mut rng()).is_none());
    }

    #[test]
    fn merge_and_normalize() {
        let mut a = ScoreBoard::new();
        a.set(o(0), 1.0);
        let mut b = ScoreBoard::new();
        b.set(o(1), 1.0);
        a.merge(&b, 3.0);
        a.normalize();
        assert!((a.get(o(0)) - 0.25).abs() < 1e-12);
        assert!((a.get(o(1)) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn window_clamps_to_history_length() {
        let history = vec![o(1), o(2), o(3)];
        assert_eq!(window(&history, 2), &[o(1), o(2)]);
        assert_eq!(window(&history, 10).len(), 3);
    }

    #[test]
    fn frequencies_counts_occurrences() {
        let history = vec![o(7), o(7), o(3)];
        let counts = frequencies(&history);
        assert_eq!(counts[7], 2);
        assert_eq!(counts[3], 1);
        assert_eq!(counts[0], 0);
    }

    #[test]
    fn uniform_outcome_stays_in_range() {
        let mut rng = rng();
        for _ in 0..200 {
            let outcome = uniform_outcome(&mut rng);
            assert!(outcome.value() <= 36);
        }
    }

    #[test]
    fn choose_or_uniform_empty_falls_back() {
        let mut rng = rng();
        let outcome = choose_or_uniform(&[], &mut rng);
        assert!(outcome.value() <= 36);
        let fixed = choose_or_uniform(&[o(11)], &mut rng);
        assert_eq!(fixed, o(11));
    }
}
