//! Binary-partition imbalance strategies — odd/even, low/high, red/black.
//!
//! The three table-bet strategies are the same algorithm with a different
//! partition predicate, so they share one parameterized implementation: count
//! both sides over the trailing window, and when one side's observed share
//! drops below the threshold, its outcomes become the candidates. A balanced
//! window degrades to a coin flip between the two sides.
//!
//! `ZeroBias` layers the zero pocket on top of the color split: zero belongs
//! to neither side, so it gets an explicit bonus when absent from the window
//! and a penalty when over-represented.

use crate::domain::Outcome;
use crate::score::{self, ScoreBoard};
use rand::rngs::StdRng;
use rand::Rng;

use super::Strategy;

/// Which binary table bet the strategy watches. Zero sits outside every
/// partition and never counts toward a side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partition {
    /// Odd vs. even.
    Parity,
    /// Low (1–18) vs. high (19–36).
    Range,
    /// Red vs. black.
    Color,
}

impl Partition {
    /// `Some(true)` for the first side (odd/low/red), `Some(false)` for the
    /// second, `None` for zero.
    fn side_of(self, outcome: Outcome) -> Option<bool> {
        if outcome.is_zero() {
            return None;
        }
        Some(match self {
            Partition::Parity => outcome.is_odd(),
            Partition::Range => outcome.is_low(),
            Partition::Color => outcome.is_red(),
        })
    }

    fn members(self, side: bool) -> Vec<Outcome> {
        Outcome::all()
            .filter(|o| self.side_of(*o) == Some(side))
            .collect()
    }

    fn strategy_name(self) -> &'static str {
        match self {
            Partition::Parity => "parity_imbalance",
            Partition::Range => "range_imbalance",
            Partition::Color => "color_imbalance",
        }
    }
}

/// Parameterized binary-partition imbalance strategy.
#[derive(Debug, Clone)]
pub struct BinaryImbalance {
    pub partition: Partition,
    pub window: usize,
    pub threshold: f64,
}

impl BinaryImbalance {
    pub fn new(partition: Partition, window: usize, threshold: f64) -> Self {
        assert!(window >= 1, "window must be >= 1");
        assert!(
            (0.0..=0.5).contains(&threshold),
            "threshold must be in 0.0..=0.5"
        );
        Self {
            partition,
            window,
            threshold,
        }
    }

    pub fn parity() -> Self {
        Self::new(Partition::Parity, 50, 0.45)
    }

    pub fn range() -> Self {
        Self::new(Partition::Range, 50, 0.45)
    }

    pub fn color() -> Self {
        Self::new(Partition::Color, 50, 0.45)
    }

    /// The under-represented side's members, or `None` when the window is
    /// balanced (or contains no partitioned outcomes at all).
    pub fn underrepresented(&self, history: &[Outcome]) -> Option<Vec<Outcome>> {
        let window = score::window(history, self.window);
        let mut first = 0usize;
        let mut second = 0usize;
        for outcome in window {
            match self.partition.side_of(*outcome) {
                Some(true) => first += 1,
                Some(false) => second += 1,
                None => {}
            }
        }
        let total = first + second;
        if total == 0 {
            return None;
        }
        let first_share = first as f64 / total as f64;
        if first_share < self.threshold {
            Some(self.partition.members(true))
        } else if 1.0 - first_share < self.threshold {
            Some(self.partition.members(false))
        } else {
            None
        }
    }
}

impl Strategy for BinaryImbalance {
    fn name(&self) -> &str {
        self.partition.strategy_name()
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        match self.underrepresented(history) {
            Some(candidates) => score::choose_or_uniform(&candidates, rng),
            // Balanced window: coin-flip the side, uniform within it.
            None => {
                let members = self.partition.members(rng.gen_bool(0.5));
                score::choose_or_uniform(&members, rng)
            }
        }
    }
}

/// Color imbalance with an explicit zero-pocket adjustment.
///
/// Zero is invisible to every binary partition, which systematically
/// under-prices it. This variant scores the imbalance candidates as usual and
/// then bumps zero when it has been absent from the window, or suppresses it
/// when it has hit more than twice its fair share.
#[derive(Debug, Clone)]
pub struct ZeroBias {
    inner: BinaryImbalance,
}

impl ZeroBias {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            inner: BinaryImbalance::new(Partition::Color, window, threshold),
        }
    }

    pub fn default_params() -> Self {
        Self::new(50, 0.45)
    }

    fn board(&self, history: &[Outcome], rng: &mut StdRng) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        let side = match self.inner.underrepresented(history) {
            Some(candidates) => candidates,
            None => self.inner.partition.members(rng.gen_bool(0.5)),
        };
        for outcome in side {
            board.set(outcome, 1.0);
        }

        let window = score::window(history, self.inner.window);
        let zero_hits = window.iter().filter(|o| o.is_zero()).count() as f64;
        let fair_share = window.len() as f64 / 37.0;
        if zero_hits == 0.0 {
            board.set(Outcome::ZERO, 2.0);
        } else if zero_hits >= (2.0 * fair_share).max(2.0) {
            board.set(Outcome::ZERO, 0.0);
        } else {
            board.set(Outcome::ZERO, 1.0);
        }
        board
    }
}

impl Strategy for ZeroBias {
    fn name(&self) -> &str {
        "zero_bias"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        let board = self.board(history, rng);
        match board.sample_max(rng) {
            Some(outcome) => outcome,
            None => score::uniform_outcome(rng),
        }
    }
}
