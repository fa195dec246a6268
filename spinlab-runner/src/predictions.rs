//! PredictionLog — durable log of every (strategy, prediction, grade) tuple.
//!
//! Records are grouped into one document per (session, strategy), newest
//! first, mirroring the sequence layout. Grading finds the most recent
//! Pending record and applies the transition exactly once; a second grading
//! pass finds nothing pending and changes nothing, which is what makes
//! round replays harmless.

use crate::store::{self, Expected, Store, StoreError};
use serde::{Deserialize, Serialize};
use spinlab_core::domain::{Grade, Outcome, PredictionRecord, SessionId, StrategyId};
use std::sync::Arc;

const COLLECTION: &str = "predictions";

/// Persisted shape: all of one strategy's predictions for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionHistory {
    pub session_id: SessionId,
    pub strategy_id: StrategyId,
    /// Most-recent-first.
    pub records: Vec<PredictionRecord>,
}

/// Result of a grading attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeOutcome {
    /// A pending record transitioned to this grade.
    Applied(Grade),
    /// Nothing pending — either never predicted, or already graded.
    NonePending,
}

/// Durable per-(session, strategy) prediction log.
#[derive(Clone)]
pub struct PredictionLog {
    store: Arc<dyn Store>,
    max_retries: u32,
}

impl PredictionLog {
    pub fn new(store: Arc<dyn Store>, max_retries: u32) -> Self {
        Self { store, max_retries }
    }

    fn doc_key(session: &SessionId, strategy: &StrategyId) -> String {
        format!("{}__{}", session.as_str(), strategy.as_str())
    }

    /// Append a fresh (Pending) record at the front of the log.
    pub fn append(&self, record: PredictionRecord) -> Result<(), StoreError> {
        let key = Self::doc_key(&record.session_id, &record.strategy_id);
        let mut attempts = 0;
        loop {
            let existing = store::load::<PredictionHistory>(self.store.as_ref(), COLLECTION, &key)?;
            let (version, mut history) = match existing {
                Some((version, history)) => (version, history),
                None => (
                    0,
                    PredictionHistory {
                        session_id: record.session_id.clone(),
                        strategy_id: record.strategy_id.clone(),
                        records: Vec::new(),
                    },
                ),
            };
            history.records.insert(0, record.clone());
            match store::save(
                self.store.as_ref(),
                COLLECTION,
                &key,
                &history,
                Expected::Version(version),
            ) {
                Ok(_) => return Ok(()),
                Err(err @ StoreError::VersionConflict { .. }) => {
                    if attempts >= self.max_retries {
                        return Err(err);
                    }
                    attempts += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }

    /// The most recent Pending record, if any.
    pub fn latest_pending(
        &self,
        session: &SessionId,
        strategy: &StrategyId,
    ) -> Result<Option<PredictionRecord>, StoreError> {
        let key = Self::doc_key(session, strategy);
        let history = store::load::<PredictionHistory>(self.store.as_ref(), COLLECTION, &key)?;
        Ok(history.and_then(|(_, h)| {
            h.records
                .iter()
                .find(|r| r.grade.is_pending())
                .cloned()
        }))
    }

    /// Grade the most recent Pending record against `actual`.
    ///
    /// `correct` is the verdict of the owning strategy's own grading rule.
    /// Idempotent by construction: once graded, the record is no longer
    /// pending, so a replay returns `NonePending` without touching counters.
    pub fn grade_latest_pending(
        &self,
        session: &SessionId,
        strategy: &StrategyId,
        actual: Outcome,
        correct: bool,
    ) -> Result<GradeOutcome, StoreError> {
        let key = Self::doc_key(session, strategy);
        let mut attempts = 0;
        loop {
            let Some((version, mut history)) =
                store::load::<PredictionHistory>(self.store.as_ref(), COLLECTION, &key)?
            else {
                return Ok(GradeOutcome::NonePending);
            };
            let Some(record) = history.records.iter_mut().find(|r| r.grade.is_pending()) else {
                return Ok(GradeOutcome::NonePending);
            };
            record.apply_grade(actual, correct);
            let grade = record.grade;
            match store::save(
                self.store.as_ref(),
                COLLECTION,
                &key,
                &history,
                Expected::Version(version),
            ) {
                Ok(_) => return Ok(GradeOutcome::Applied(grade)),
                Err(err @ StoreError::VersionConflict { .. }) => {
                    if attempts >= self.max_retries {
                        return Err(err);
                    }
                    attempts += 1;
                }
                Err(other) => return Err(other),
            }
        }
    }
}
