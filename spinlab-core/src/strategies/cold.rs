//! Cold-absence strategy — outcomes overdue by virtue of not showing up.
//!
//! Candidates are the outcomes entirely absent from the trailing window;
//! when every outcome has appeared, the least-frequent ones stand in. Grades
//! strictly: a cold number either hits exactly or it doesn't — the neighbor
//! rule would credit the surrounding hot sector instead.

use crate::domain::Outcome;
use crate::score;
use crate::wheel::WheelTopology;
use rand::rngs::StdRng;

use super::Strategy;

/// Cold-number strategy over a single trailing window.
#[derive(Debug, Clone)]
pub struct ColdAbsence {
    pub window: usize,
}

impl ColdAbsence {
    pub fn new(window: usize) -> Self {
        assert!(window >= 1, "window must be >= 1");
        Self { window }
    }

    pub fn default_params() -> Self {
        Self::new(60)
    }

    pub fn candidates(&self, history: &[Outcome]) -> Vec<Outcome> {
        let window = score::window(history, self.window);
        let counts = score::frequencies(window);

        let absent: Vec<Outcome> = Outcome::all()
            .filter(|o| counts[o.index()] == 0)
            .collect();
        if !absent.is_empty() {
            return absent;
        }

        // Every outcome has hit at least once: take the least-frequent tier.
        let min = counts.iter().copied().min().unwrap_or(0);
        Outcome::all()
            .filter(|o| counts[o.index()] == min)
            .collect()
    }
}

impl Strategy for ColdAbsence {
    fn name(&self) -> &str {
        "cold_absence"
    }

    fn predict(&self, history: &[Outcome], rng: &mut StdRng) -> Outcome {
        if history.is_empty() {
            return score::uniform_outcome(rng);
        }
        score::choose_or_uniform(&self.candidates(history), rng)
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

    fn hist(values: &[u8]) -> Vec<Outcome> {
        values.iter().map(|&v| Outcome::new(v).unwrap()).collect()
    }

    #[test]
    fn absent_outcomes_are_the_candidates() {
        let history = hist(&[1, 2, 3, 1, 2, 3]);
        let candidates = ColdAbsence::default_params().candidates(&history);
        assert_eq!(candidates.len(), 34);
        assert!(!candidates.contains(&Outcome::new(1).unwrap()));
        assert!(!candidates.contains(&Outcome::new(2).unwrap()));
        assert!(!candidates.contains(&Outcome::new(3).unwrap()));
    }

    #[test]
    fn least_frequent_tier_when_nothing_is_absent() {
        // Every outcome once, then 5 again: everything but 5 is minimal.
        let mut values: Vec<u8> = (0..=36).collect();
        values.push(5);
        let strategy = ColdAbsence::new(values.len());
        let candidates = strategy.candidates(&hist(&values));
        assert_eq!(candidates.len(), 36);
        assert!(!candidates.contains(&Outcome::new(5).unwrap()));
    }

    #[test]
    fn grading_is_exact_only() {
        let wheel = WheelTopology::standard();
        let strategy = ColdAbsence::default_params();
        let zero = Outcome::ZERO;
        let adjacent = Outcome::new(26).unwrap();

        assert!(strategy.grade(zero, zero, wheel));
        // Physically adjacent, but strict policy rejects it.
        assert!(!strategy.grade(zero, adjacent, wheel));
    }

    #[test]
    fn empty_history_falls_back_to_uniform() {
        let strategy = ColdAbsence::default_params();
        let mut rng = StdRng::seed_from_u64(3);
        assert!(strategy.predict(&[], &mut rng).value() <= 36);
    }
}
