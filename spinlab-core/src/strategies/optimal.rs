//! Optimal-position strategy — inverse-distance field over the rim.
//!
//! Anchors the last few outcomes plus the most frequent outcomes of the
//! recent window, scores every wheel position by inverse-distance decay from
//! each anchor, and takes the argmax position. The result gravitates toward
//! the physical region where recent activity clusters.

use crate::domain::Outcome;
use crate::score::{self, ScoreBoard};
use crate::wheel::WheelTopology;
use rand::rngs::StdRng;

use super::Strategy;

/// Inverse-distance field strategy.
#[derive(Debug, Clone)]
pub struct OptimalPosition {
    /// Recent outcomes used as anchors.
    pub recent_anchors: usize,
    /// Most-frequent outcomes of the window used as anchors.
    pub frequent_anchors: usize,
    pub window: usize,
}

impl OptimalPosition {
    pub fn new(recent_anchors: usize, frequent_anchors: usize, window: usize) -> Self {
        assert!(
            recent_anchors + frequent_anchors >= 1,
            "at least one anchor is required"
        );
        Self {
            recent_anchors,
            frequent_anchors,
            window,
        }
    }

    pub fn default_params() -> Self {
        Self::new(5, 3, 50)
    }

    fn board(&self, history: &[Outcome]) -> ScoreBoard {
        let wheel = WheelTopology::standard();
        let mut anchors: Vec<Outcome> = score::window(history, self.recent_anchors).to_vec();

        let window = score::window(history, self.window);
        let counts = score::frequencies(window);
        let mut by_count: Vec<Outcome> = Outcome::all()
            .filter(|o| counts[o.index()] > 0)
            .collect();
        by_count.sort_by_key(|o| std::cmp::Reverse(counts[o.index()]));
        anchors.extend(by_count.into_iter().take(self.frequent_anchors));

        let mut board = ScoreBoard::new();
        for target in Outcome::all() {
            let field: f64 = anchors
                .iter()
                .map(|anchor| 1.0 / (1.0 + wheel.distance(target, *anchor) as f64))
                .sum();
            board.set(target, field);
        }
        board
    }
}

impl Strategy for OptimalPosition {
    fn name(&self) -> &str {
        "optimal_position"
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
