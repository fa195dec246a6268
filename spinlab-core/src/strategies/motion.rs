//! Motion-vector strategy — extrapolate the wheel's angular drift.
//!
//! Treats consecutive outcomes as positions on the rim and computes the
//! average signed displacement (shortest way around, in slots) over recent
//! steps, then extrapolates one more step from the last position. Captures a
//! dealer whose release-to-pocket distance drifts consistently.

use crate::domain::{Outcome, OUTCOME_COUNT};
use crate::score;
use crate::wheel::WheelTopology;
use rand::rngs::StdRng;

use super::Strategy;

/// Angular-displacement extrapolation strategy.
#[derive(Debug, Clone)]
pub struct MotionVector {
    /// How many recent displacements feed the average.
    pub steps: usize,
}

impl MotionVector {
    pub fn new(steps: usize) -> Self {
        assert!(steps >= 1, "steps must be >= 1");
        Self { steps }
    }

    pub fn default_params() -> Self {
        Self::new(10)
    }

    /// Signed slot displacement from `a` to `b`, mapped into -18..=18.
    fn displacement(wheel: &WheelTopology, a: Outcome, b: Outcome) -> i64 {
        let len = OUTCOME_COUNT as i64;
        let raw = wheel.position(b) as i64 - wheel.position(a) as i64;
        let forward = raw.rem_euclid(len);
        if forward > len / 2 {
            forward - len
        } else {
            forward
        }
    }

    /// Extrapolated next outcome, or `None` when fewer than two outcomes
    /// exist to measure any displacement.
    pub fn extrapolate(&self, history: &[Outcome]) -> Option<Outcome> {
        if history.len() < 2 {
            return None;
        }
        let wheel = WheelTopology::standard();
        // history is most-recent-first: displacement of step i is from
        // history[i+1] (earlier) to history[i] (later).
        let displacements: Vec<i64> = history
            .windows(2)
            .take(self.steps)
            .map(|pair| Self::displacement(wheel, pair[1], pair[0]))
            .collect();
        let mean = displacements.iter().sum::<i64>() as f64 / displacements.len() as f64;
        let step = mean.round() as isize;
        let next = wheel.position(history[0]) as isize + step;
        Some(wheel.at(next))
    }
}

impl Strategy for MotionVector {
    fn name(&self) -> &str {
        "motion_vector"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        match self.extrapolate(history) {
            Some(outcome) => outcome,
            None => score::uniform_outcome(rng),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn constant_drift_extrapolates_one_more_step() {
        let wheel = WheelTopology::standard();
        // Positions 0, 3, 6, 9 — constant +3 drift.
        let positions = [9isize, 6, 3, 0]; // most-recent-first
        let history: Vec<Outcome> = positions.iter().map(|&p| wheel.at(p)).collect();
        let predicted = MotionVector::default_params()
            .extrapolate(&history)
            .unwrap();
        assert_eq!(predicted, wheel.at(12));
    }

    #[test]
    fn drift_wraps_around_the_rim() {
        let wheel = WheelTopology::standard();
        // Positions 30, 35 — drift +5 crosses slot 0 on the next step.
        let history = vec![wheel.at(35), wheel.at(30)];
        let predicted = MotionVector::default_params()
            .extrapolate(&history)
            .unwrap();
        assert_eq!(predicted, wheel.at(40)); // = slot 3
    }

    #[test]
    fn displacement_takes_the_short_way() {
        let wheel = WheelTopology::standard();
        // Slot 36 to slot 0 is +1 forward, not -36.
        assert_eq!(
            MotionVector::displacement(wheel, wheel.at(36), wheel.at(0)),
            1
        );
        assert_eq!(
            MotionVector::displacement(wheel, wheel.at(0), wheel.at(36)),
            -1
        );
    }

    #[test]
    fn too_short_history_falls_back_to_uniform() {
        let strategy = MotionVector::default_params();
        let mut rng = StdRng::seed_from_u64(14);
        assert!(strategy.predict(&[], &mut rng).value() <= 36);
        assert!(strategy.predict(&[Outcome::ZERO], &mut rng).value() <= 36);
    }
}
