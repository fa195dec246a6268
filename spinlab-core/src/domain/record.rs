//! PredictionRecord — one strategy's guess for one round, with its grade.

use super::ids::{SessionId, StrategyId};
use super::outcome::Outcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grade of a prediction against the outcome that actually occurred.
///
/// A record is created `Pending` and transitions exactly once to `Correct` or
/// `Incorrect` when the next real outcome is observed. Grading an
/// already-graded record is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    Pending,
    Correct,
    Incorrect,
}

impl Grade {
    pub fn is_pending(self) -> bool {
        matches!(self, Grade::Pending)
    }
}

/// Durable record of a single (strategy, prediction, context, grade) tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub session_id: SessionId,
    pub strategy_id: StrategyId,
    /// Sequence length at prediction time; identifies the round.
    pub round: u64,
    pub timestamp: DateTime<Utc>,
    pub predicted: Outcome,
    pub actual: Option<Outcome>,
    pub grade: Grade,
    /// Last-K outcomes (most-recent-first) at prediction time.
    pub context: Vec<Outcome>,
    /// Neighbor set of the predicted outcome at prediction time.
    pub neighbor_set: Vec<Outcome>,
}

impl PredictionRecord {
    pub fn pending(
        session_id: SessionId,
        strategy_id: StrategyId,
        round: u64,
        predicted: Outcome,
        context: Vec<Outcome>,
        neighbor_set: Vec<Outcome>,
    ) -> Self {
        Self {
            session_id,
            strategy_id,
            round,
            timestamp: Utc::now(),
            predicted,
            actual: None,
            grade: Grade::Pending,
            context,
            neighbor_set,
        }
    }

    /// Apply a grade. The transition happens at most once: a record that is
    /// already graded keeps its grade and actual outcome unchanged.
    ///
    /// Returns `true` if this call performed the transition.
    pub fn apply_grade(&mut self, actual: Outcome, correct: bool) -> bool {
        if !self.grade.is_pending() {
            return false;
        }
        self.actual = Some(actual);
        self.grade = if correct {
            Grade::Correct
        } else {
            Grade::Incorrect
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PredictionRecord {
        PredictionRecord::pending(
            SessionId::new("s1"),
            StrategyId::new("hot_frequency"),
            12,
            Outcome::new(7).unwrap(),
            vec![Outcome::new(3).unwrap(), Outcome::new(7).unwrap()],
            vec![Outcome::new(7).unwrap(), Outcome::new(29).unwrap()],
        )
    }

    #[test]
    fn starts_pending_without_actual() {
        let rec = record();
        assert_eq!(rec.grade, Grade::Pending);
        assert!(rec.actual.is_none());
    }

    #[test]
    fn grades_exactly_once() {
        let mut rec = record();
        let actual = Outcome::new(7).unwrap();

        assert!(rec.apply_grade(actual, true));
        assert_eq!(rec.grade, Grade::Correct);
        assert_eq!(rec.actual, Some(actual));

        // Second grade attempt with a contradicting verdict changes nothing.
        let other = Outcome::new(20).unwrap();
        assert!(!rec.apply_grade(other, false));
        assert_eq!(rec.grade, Grade::Correct);
        assert_eq!(rec.actual, Some(actual));
    }

    #[test]
    fn incorrect_grade_recorded() {
        let mut rec = record();
        assert!(rec.apply_grade(Outcome::new(20).unwrap(), false));
        assert_eq!(rec.grade, Grade::Incorrect);
    }

    #[test]
    fn serialization_roundtrip() {
        let rec = record();
        let json = serde_json::to_string(&rec).unwrap();
        let back: PredictionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.strategy_id, rec.strategy_id);
        assert_eq!(back.round, rec.round);
        assert_eq!(back.predicted, rec.predicted);
        assert_eq!(back.grade, Grade::Pending);
        assert_eq!(back.context, rec.context);
    }
}
