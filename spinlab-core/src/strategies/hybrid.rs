//! Hybrid consensus strategy — several signals under one adaptive roof.
//!
//! Re-derives four of the family's signals (hot frequency, due interval,
//! Markov transition, recency penalty), sums their normalized score vectors
//! under internal per-signal weights, and predicts from the combined field.
//! After every observed outcome it grades each signal's own pick and nudges
//! that signal's weight up or down — the manager-level adaptation pattern,
//! replayed at strategy scale.
//!
//! The per-signal weights are the only cross-round state in the family; they
//! live behind a mutex so `predict` can stay `&self` on the parallel path.

use crate::domain::Outcome;
use crate::score::{self, ScoreBoard};
use crate::wheel::WheelTopology;
use rand::rngs::StdRng;
use std::sync::Mutex;

use super::interval::DueInterval;
use super::markov::MarkovChain;
use super::recency::RecencyPenalty;
use super::Strategy;

const SIGNAL_COUNT: usize = 4;
const SIGNAL_NAMES: [&str; SIGNAL_COUNT] = ["hot", "due", "markov", "recency"];

/// Multiplier applied to a signal's weight on a neighbor-rule hit / miss.
const HIT_FACTOR: f64 = 1.08;
const MISS_FACTOR: f64 = 0.96;
const WEIGHT_FLOOR: f64 = 0.25;
const WEIGHT_CEIL: f64 = 4.0;

#[derive(Debug)]
struct HybridState {
    weights: [f64; SIGNAL_COUNT],
    /// Each signal's own argmax pick from the latest predict call; graded
    /// and cleared on the next observed outcome.
    last_picks: Option<[Option<Outcome>; SIGNAL_COUNT]>,
}

/// Self-adapting multi-signal strategy.
#[derive(Debug)]
pub struct HybridConsensus {
    pub hot_window: usize,
    state: Mutex<HybridState>,
}

impl HybridConsensus {
    pub fn new(hot_window: usize) -> Self {
        assert!(hot_window >= 1, "hot_window must be >= 1");
        Self {
            hot_window,
            state: Mutex::new(HybridState {
                weights: [1.0; SIGNAL_COUNT],
                last_picks: None,
            }),
        }
    }

    pub fn default_params() -> Self {
        Self::new(30)
    }

    /// Snapshot of the internal per-signal weights (name, weight).
    pub fn signal_weights(&self) -> Vec<(&'static str, f64)> {
        let state = self.state.lock().unwrap();
        SIGNAL_NAMES
            .iter()
            .zip(state.weights)
            .map(|(name, weight)| (*name, weight))
            .collect()
    }

    fn hot_board(&self, history: &[Outcome]) -> ScoreBoard {
        let window = score::window(history, self.hot_window);
        let counts = score::frequencies(window);
        let mut board = ScoreBoard::new();
        for outcome in Outcome::all() {
            board.set(outcome, counts[outcome.index()] as f64);
        }
        board
    }

    fn markov_board(history: &[Outcome]) -> ScoreBoard {
        let mut board = ScoreBoard::new();
        let Some(&last) = history.first() else {
            return board;
        };
        let counts = MarkovChain::transition_counts(history);
        for outcome in Outcome::all() {
            board.set(outcome, counts[last.index()][outcome.index()] as f64);
        }
        board
    }

    fn signal_boards(&self, history: &[Outcome]) -> [ScoreBoard; SIGNAL_COUNT] {
        [
            self.hot_board(history),
            DueInterval::default_params().board(history),
            Self::markov_board(history),
            RecencyPenalty::default_params().board(history),
        ]
    }
}

impl Strategy for HybridConsensus {
    fn name(&self) -> &str {
        "hybrid_consensus"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }

        let mut boards = self.signal_boards(history);
        let mut picks = [None; SIGNAL_COUNT];
        let mut combined = ScoreBoard::new();
        {
            let mut state = self.state.lock().unwrap();
            for (slot, board) in boards.iter_mut().enumerate() {
                board.normalize();
                // A signal with no mass abstains this round.
                let top = board.top(1)[0];
                if board.get(top) > 0.0 {
                    picks[slot] = Some(top);
                }
                combined.merge(board, state.weights[slot]);
            }
            state.last_picks = Some(picks);
        }

        match combined.sample_max(rng) {
            Some(outcome) => outcome,
            None => score::uniform_outcome(rng),
        }
    }

    fn record_outcome(&self, actual: Outcome, wheel: &WheelTopology) {
        let mut state = self.state.lock().unwrap();
        let Some(picks) = state.last_picks.take() else {
            return;
        };
        for (slot, pick) in picks.into_iter().enumerate() {
            let Some(pick) = pick else { continue };
            let factor = if wheel.within_neighbors(pick, actual) {
                HIT_FACTOR
            } else {
                MISS_FACTOR
            };
            state.weights[slot] = (state.weights[slot] * factor).clamp(WEIGHT_FLOOR, WEIGHT_CEIL);
        }
    }
}
