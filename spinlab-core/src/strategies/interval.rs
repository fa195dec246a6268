//! Due-interval strategy — outcomes whose recurrence clock has come around.
//!
//! For every outcome with at least two occurrences, compute the average gap
//! between successive hits. An outcome last seen `k` rounds ago scores
//! highest when `k / average_gap` sits in the "due band" [0.8, 1.2], and
//! proportionally lower the further the ratio drifts from 1.0.

use crate::domain::{Outcome, OUTCOME_COUNT};
use crate::score::{self, ScoreBoard};
use rand::rngs::StdRng;

use super::Strategy;

/// Recurrence-interval strategy.
#[derive(Debug, Clone)]
pub struct DueInterval {
    pub band_low: f64,
    pub band_high: f64,
}

impl DueInterval {
    pub fn new(band_low: f64, band_high: f64) -> Self {
        assert!(
            band_low < band_high,
            "band_low must be below band_high"
        );
        Self { band_low, band_high }
    }

    pub fn default_params() -> Self {
        Self::new(0.8, 1.2)
    }

    pub(crate) fn board(&self, history: &[Outcome]) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        // Occurrence ages per outcome, most recent first. history[i] happened
        // i rounds ago, so the gap between successive ages is the interval.
        let mut ages: [Vec<usize>; OUTCOME_COUNT] = std::array::from_fn(|_| Vec::new());
        for (age, outcome) in history.iter().enumerate() {
            ages[outcome.index()].push(age);
        }

        for outcome in Outcome::all() {
            let hits = &ages[outcome.index()];
            if hits.len() < 2 {
                continue;
            }
            let gaps: Vec<f64> = hits.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
            let average_gap = gaps.iter().sum::<f64>() / gaps.len() as f64;
            if average_gap == 0.0 {
                continue;
            }
            // hits[0] is how many rounds ago the outcome last occurred.
            let ratio = hits[0] as f64 / average_gap;
            let due = ratio >= self.band_low && ratio <= self.band_high;
            let weight = if due {
                2.0
            } else {
                1.0 / (1.0 + (ratio - 1.0).abs())
            };
            board.set(outcome, weight);
        }
        board
    }
}

impl Strategy for DueInterval {
    fn name(&self) -> &str {
        "due_interval"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        match self.board(history).sample_max(rng) {
            Some(outcome) => outcome,
            // No outcome has recurred yet.
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
    fn due_outcome_beats_off_schedule_one() {
        // 8 recurs every 4 rounds and last hit 4 rounds ago: squarely due.
        // 21 recurs every 2 rounds but last hit 11 rounds ago: overdue past
        // the band, so its weight decays.
        let history = hist(&[
            1, 2, 3, 4, 8, 5, 6, 7, 8, 9, 10, 21, 11, 21, 12, 21,
        ]);
        let strategy = DueInterval::default_params();
        let mut rng = StdRng::seed_from_u64(2);
        assert_eq!(
            strategy.predict(&history, &mut rng),
            Outcome::new(8).unwrap()
        );
    }

    #[test]
    fn single_occurrences_fall_back_to_uniform() {
        let history = hist(&[1, 2, 3, 4, 5]);
        let strategy = DueInterval::default_params();
        let mut rng = StdRng::seed_from_u64(2);
        assert!(strategy.predict(&history, &mut rng).value() <= 36);
    }

    #[test]
    fn band_membership_scores_highest() {
        let strategy = DueInterval::default_params();
        // 14 every 5 rounds, last seen 4 ago: ratio 0.8, on the band edge.
        let history = hist(&[1, 2, 3, 4, 14, 5, 6, 7, 8, 14, 9, 10, 11, 12, 14]);
        let board = strategy.board(&history);
        assert_eq!(board.get(Outcome::new(14).unwrap()), 2.0);
    }

    #[test]
    #[should_panic(expected = "band_low must be below band_high")]
    fn rejects_inverted_band() {
        DueInterval::new(1.2, 0.8);
    }
}
