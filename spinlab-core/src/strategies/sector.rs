//! Sector-rotation strategy — arcs of the wheel, not values.
//!
//! Partitions the 37 physical slots into contiguous arcs and favors the arc
//! that has gone longest without a hit, sampling uniformly among its
//! outcomes. An arc that has never been hit in the history outranks every
//! arc that has.

use crate::domain::Outcome;
use crate::score;
use crate::wheel::WheelTopology;
use rand::rngs::StdRng;

use super::Strategy;

/// Least-recently-hit arc strategy.
#[derive(Debug, Clone)]
pub struct SectorRotation {
    pub arc_count: usize,
}

impl SectorRotation {
    pub fn new(arc_count: usize) -> Self {
        assert!((2..=37).contains(&arc_count), "arc_count must be in 2..=37");
        Self { arc_count }
    }

    pub fn default_params() -> Self {
        Self::new(5)
    }

    /// Arc index of a wheel slot; arcs are contiguous and near-equal sized.
    fn arc_of(&self, wheel: &WheelTopology, outcome: Outcome) -> usize {
        wheel.position(outcome) * self.arc_count / 37
    }

    /// Rounds since each arc last hit (`None` = never hit in this history).
    fn ages(&self, wheel: &WheelTopology, history: &[Outcome]) -> Vec<Option<usize>> {
        let mut ages = vec![None; self.arc_count];
        for (age, outcome) in history.iter().enumerate() {
            let arc = self.arc_of(wheel, *outcome);
            if ages[arc].is_none() {
                ages[arc] = Some(age);
            }
        }
        ages
    }

    /// Outcomes of the coldest arc. Ties between never-hit arcs resolve
    /// deterministically by arc index; randomness enters when sampling
    /// within the arc.
    pub fn candidates(&self, history: &[Outcome]) -> Vec<Outcome> {
        let wheel = WheelTopology::standard();
        let ages = self.ages(wheel, history);
        let coldest = (0..self.arc_count)
            .max_by_key(|&arc| ages[arc].map_or(usize::MAX, |age| age))
            .unwrap_or(0);
        Outcome::all()
            .filter(|o| self.arc_of(wheel, *o) == coldest)
            .collect()
    }
}

impl Strategy for SectorRotation {
    fn name(&self) -> &str {
        "sector_rotation"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        score::choose_or_uniform(&self.candidates(history), rng)
    }
}
