//! StrategyManager — the per-round orchestration pipeline.
//!
//! One round = one observed outcome. The manager appends the outcome to the
//! session sequence, grades every strategy's pending prediction from the
//! previous round, folds the grades into the performance tracker, lets
//! self-adapting strategies observe the outcome, then fans the strategies out
//! in parallel to produce the next round's predictions and selects an
//! ensemble pick from them.
//!
//! Store failures during grading or persistence degrade the round (logged and
//! skipped) rather than abort it; only a missing session or an invalid
//! outcome fails the whole call.

use crate::config::ManagerConfig;
use crate::predictions::{GradeOutcome, PredictionLog};
use crate::sequence::SequenceStore;
use crate::store::{Store, StoreError};
use crate::tracker::PerformanceTracker;
use rayon::prelude::*;
use serde::Serialize;
use spinlab_core::domain::{Outcome, OutcomeError, PredictionRecord, SessionId, StrategyId};
use spinlab_core::rng::SeedHierarchy;
use spinlab_core::score;
use spinlab_core::domain::StrategyPerformance;
use spinlab_core::strategies::{default_strategy_set, Strategy};
use spinlab_core::wheel::WheelTopology;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Name reported when no strategy produced a usable prediction.
const UNIFORM_FALLBACK: &str = "uniform_fallback";
/// Name reported when the pick came from a plurality vote rather than a
/// single leading strategy.
const PLURALITY_VOTE: &str = "plurality_vote";
/// RNG stream label for ensemble-level tie breaking.
const ENSEMBLE_STREAM: &str = "ensemble";

/// Errors that fail an entire manager call.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("session has no initialized sequence")]
    NotInitialized,
    #[error("cannot initialize a session from an empty outcome list")]
    EmptyInitialize,
    #[error(transparent)]
    InvalidOutcome(#[from] OutcomeError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

/// Result of a session initialization.
#[derive(Debug, Clone, Serialize)]
pub struct InitializeReport {
    pub success: bool,
    /// Outcomes stored when `success`.
    pub count: usize,
    pub error: Option<String>,
}

/// One of the leading strategies in a round report.
#[derive(Debug, Clone, Serialize)]
pub struct TopStrategy {
    pub strategy_name: String,
    pub prediction: Outcome,
    /// Lifetime accuracy in [0, 1].
    pub success_rate: f64,
    pub dynamic_weight: f64,
}

/// Result of one observe-grade-predict round.
#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    pub success: bool,
    /// Ensemble pick for the next outcome.
    pub prediction: Option<Outcome>,
    /// Which strategy (or fallback rule) supplied the pick.
    pub strategy_name: Option<String>,
    /// Highest-weighted strategies that produced a prediction this round.
    pub top_strategies: Vec<TopStrategy>,
    /// Session sequence after the append, most-recent-first.
    pub current_sequence: Vec<Outcome>,
    pub error: Option<String>,
}

impl RoundReport {
    fn failure(error: ManagerError) -> Self {
        Self {
            success: false,
            prediction: None,
            strategy_name: None,
            top_strategies: Vec::new(),
            current_sequence: Vec::new(),
            error: Some(error.to_string()),
        }
    }
}

/// Orchestrates the full strategy set against one document store.
pub struct StrategyManager {
    strategies: Vec<Box<dyn Strategy>>,
    sequences: SequenceStore,
    predictions: PredictionLog,
    tracker: PerformanceTracker,
    seeds: SeedHierarchy,
    wheel: &'static WheelTopology,
    config: ManagerConfig,
}

impl StrategyManager {
    /// Manager over the default (full) strategy registry.
    pub fn new(store: Arc<dyn Store>, config: ManagerConfig) -> Self {
        Self::with_strategies(store, config, default_strategy_set())
    }

    /// Manager over an explicit strategy set (tests use reduced sets).
    pub fn with_strategies(
        store: Arc<dyn Store>,
        config: ManagerConfig,
        strategies: Vec<Box<dyn Strategy>>,
    ) -> Self {
        let retries = config.max_cas_retries;
        Self {
            strategies,
            sequences: SequenceStore::new(Arc::clone(&store), retries),
            predictions: PredictionLog::new(Arc::clone(&store), retries),
            tracker: PerformanceTracker::new(store, config.blend, config.rolling_capacity, retries),
            seeds: SeedHierarchy::new(config.master_seed),
            wheel: WheelTopology::standard(),
            config,
        }
    }

    /// Create or replace a session from a seed history (most-recent-first).
    pub fn initialize(&self, session: &SessionId, outcomes: &[i64]) -> InitializeReport {
        match self.try_initialize(session, outcomes) {
            Ok(count) => InitializeReport {
                success: true,
                count,
                error: None,
            },
            Err(err) => InitializeReport {
                success: false,
                count: 0,
                error: Some(err.to_string()),
            },
        }
    }

    fn try_initialize(&self, session: &SessionId, outcomes: &[i64]) -> Result<usize, ManagerError> {
        if outcomes.is_empty() {
            return Err(ManagerError::EmptyInitialize);
        }
        let validated = outcomes
            .iter()
            .map(|&raw| Outcome::try_from(raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.sequences.initialize(session, validated)?)
    }

    /// Record one observed outcome and produce the next-round prediction.
    pub fn add_outcome_and_predict(&self, session: &SessionId, outcome: i64) -> RoundReport {
        match self.run_round(session, outcome) {
            Ok(report) => report,
            Err(err) => RoundReport::failure(err),
        }
    }

    fn run_round(&self, session: &SessionId, raw: i64) -> Result<RoundReport, ManagerError> {
        let actual = Outcome::try_from(raw)?;
        let Some(sequence) = self.sequences.append(session, actual)? else {
            return Err(ManagerError::NotInitialized);
        };
        let round = sequence.len() as u64;
        debug!(session = session.as_str(), round, outcome = actual.value(), "round started");

        self.grade_previous_round(session, actual);

        let picks = self.fan_out_predictions(session, &sequence, round);
        self.persist_pending(session, &sequence, round, &picks);

        // A snapshot failure degrades selection to a pure plurality vote.
        let performance = match self.tracker.snapshot() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(error = %err, "performance snapshot unavailable, falling back to vote");
                Vec::new()
            }
        };
        let (prediction, strategy_name) = self.select_pick(session, round, &picks, &performance);
        let top_strategies = self.rank_top(&picks, &performance);

        Ok(RoundReport {
            success: true,
            prediction: Some(prediction),
            strategy_name: Some(strategy_name),
            top_strategies,
            current_sequence: sequence,
            error: None,
        })
    }

    /// Grade every strategy's pending prediction against `actual`, then let
    /// self-adapting strategies observe the outcome. Runs serially; a store
    /// failure skips that strategy's grade and leaves the record pending for
    /// the next round.
    fn grade_previous_round(&self, session: &SessionId, actual: Outcome) {
        for strategy in &self.strategies {
            let id = StrategyId::new(strategy.name());
            match self.predictions.latest_pending(session, &id) {
                Ok(Some(pending)) => {
                    let correct = strategy.grade(pending.predicted, actual, self.wheel);
                    match self
                        .predictions
                        .grade_latest_pending(session, &id, actual, correct)
                    {
                        Ok(GradeOutcome::Applied(_)) => {
                            if let Err(err) = self.tracker.record(&id, correct) {
                                warn!(strategy = strategy.name(), error = %err,
                                    "performance update failed, grade dropped");
                            }
                        }
                        Ok(GradeOutcome::NonePending) => {}
                        Err(err) => {
                            warn!(strategy = strategy.name(), error = %err,
                                "grading failed, record stays pending");
                        }
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(strategy = strategy.name(), error = %err, "pending lookup failed");
                }
            }
            strategy.record_outcome(actual, self.wheel);
        }
    }

    /// Run every strategy in parallel with its own derived RNG. Panicking or
    /// over-budget strategies are skipped for the round; their performance
    /// documents are untouched.
    fn fan_out_predictions(
        &self,
        session: &SessionId,
        sequence: &[Outcome],
        round: u64,
    ) -> Vec<(StrategyId, Outcome)> {
        let budget = Duration::from_millis(self.config.strategy_budget_ms);
        self.strategies
            .par_iter()
            .filter_map(|strategy| {
                let mut rng = self.seeds.rng_for(session, strategy.name(), round);
                let started = Instant::now();
                let result = catch_unwind(AssertUnwindSafe(|| strategy.predict(sequence, &mut rng)));
                match result {
                    Ok(outcome) => {
                        if started.elapsed() > budget {
                            warn!(strategy = strategy.name(), "prediction over time budget, skipped");
                            return None;
                        }
                        Some((StrategyId::new(strategy.name()), outcome))
                    }
                    Err(_) => {
                        warn!(strategy = strategy.name(), "prediction panicked, skipped");
                        None
                    }
                }
            })
            .collect()
    }

    /// Persist one Pending record per prediction. Failures are per-strategy:
    /// that strategy simply has nothing to grade next round.
    fn persist_pending(
        &self,
        session: &SessionId,
        sequence: &[Outcome],
        round: u64,
        picks: &[(StrategyId, Outcome)],
    ) {
        let context: Vec<Outcome> = sequence
            .iter()
            .take(self.config.context_len)
            .copied()
            .collect();
        for (id, predicted) in picks {
            let record = PredictionRecord::pending(
                session.clone(),
                id.clone(),
                round,
                *predicted,
                context.clone(),
                self.wheel.neighbors(*predicted),
            );
            if let Err(err) = self.predictions.append(record) {
                warn!(strategy = id.as_str(), error = %err, "prediction not persisted");
            }
        }
    }

    /// Pick the ensemble prediction: the single highest-weighted producing
    /// strategy; on a weight tie (or no weights at all) a plurality vote over
    /// all picks, with vote ties broken by a derived ensemble RNG; uniform
    /// draw when nothing produced.
    fn select_pick(
        &self,
        session: &SessionId,
        round: u64,
        picks: &[(StrategyId, Outcome)],
        performance: &[StrategyPerformance],
    ) -> (Outcome, String) {
        let mut rng = self.seeds.rng_for(session, ENSEMBLE_STREAM, round);
        if picks.is_empty() {
            return (score::uniform_outcome(&mut rng), UNIFORM_FALLBACK.to_string());
        }

        let weights: HashMap<&str, f64> = performance
            .iter()
            .map(|perf| (perf.strategy_id.as_str(), perf.dynamic_weight))
            .collect();
        let neutral = self.tracker.blend().neutral();
        let weight_of =
            |id: &StrategyId| weights.get(id.as_str()).copied().unwrap_or(neutral);

        let best = picks
            .iter()
            .map(|(id, _)| weight_of(id))
            .fold(f64::NEG_INFINITY, f64::max);
        let leaders: Vec<&(StrategyId, Outcome)> = picks
            .iter()
            .filter(|(id, _)| (weight_of(id) - best).abs() < 1e-9)
            .collect();
        if let [(id, outcome)] = leaders[..] {
            return (*outcome, id.as_str().to_string());
        }

        // Tied leaders (or uniform weights): plurality over all picks.
        let mut votes: HashMap<Outcome, usize> = HashMap::new();
        for (_, outcome) in picks {
            *votes.entry(*outcome).or_insert(0) += 1;
        }
        let max_votes = votes.values().copied().max().unwrap_or(0);
        let mut tied: Vec<Outcome> = votes
            .into_iter()
            .filter(|&(_, count)| count == max_votes)
            .map(|(outcome, _)| outcome)
            .collect();
        tied.sort_by_key(|o| o.value());
        let outcome = score::choose_or_uniform(&tied, &mut rng);
        (outcome, PLURALITY_VOTE.to_string())
    }

    /// The `top_strategies` section of the report: producing strategies
    /// ranked by dynamic weight.
    fn rank_top(
        &self,
        picks: &[(StrategyId, Outcome)],
        performance: &[StrategyPerformance],
    ) -> Vec<TopStrategy> {
        let by_id: HashMap<&str, &StrategyPerformance> = performance
            .iter()
            .map(|perf| (perf.strategy_id.as_str(), perf))
            .collect();
        let neutral = self.tracker.blend().neutral();
        let mut ranked: Vec<TopStrategy> = picks
            .iter()
            .map(|(id, outcome)| {
                let perf = by_id.get(id.as_str());
                TopStrategy {
                    strategy_name: id.as_str().to_string(),
                    prediction: *outcome,
                    success_rate: perf.map_or(0.0, |p| p.lifetime_accuracy()),
                    dynamic_weight: perf.map_or(neutral, |p| p.dynamic_weight),
                }
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.dynamic_weight
                .partial_cmp(&a.dynamic_weight)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.strategy_name.cmp(&b.strategy_name))
        });
        ranked.truncate(self.config.top_strategies);
        ranked
    }

    /// Current sequence for a session, if initialized.
    pub fn current_sequence(&self, session: &SessionId) -> Result<Option<Vec<Outcome>>, ManagerError> {
        Ok(self.sequences.current(session)?)
    }

    /// Performance snapshot across all strategies, sorted by weight.
    pub fn stats(&self) -> Result<Vec<StrategyPerformance>, ManagerError> {
        Ok(self.tracker.snapshot()?)
    }

    pub fn strategy_names(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> StrategyManager {
        StrategyManager::new(Arc::new(MemoryStore::new()), ManagerConfig::default())
    }

    fn session() -> SessionId {
        SessionId::new("table-1")
    }

    #[test]
    fn initialize_rejects_empty_history() {
        let report = manager().initialize(&session(), &[]);
        assert!(!report.success);
        assert!(report.error.unwrap().contains("empty"));
    }

    #[test]
    fn initialize_rejects_out_of_range_values() {
        let report = manager().initialize(&session(), &[5, 37]);
        assert!(!report.success);
        let report = manager().initialize(&session(), &[-1]);
        assert!(!report.success);
    }

    #[test]
    fn round_before_initialize_fails() {
        let report = manager().add_outcome_and_predict(&session(), 17);
        assert!(!report.success);
        assert!(report.prediction.is_none());
    }

    #[test]
    fn round_rejects_out_of_range_outcome() {
        let manager = manager();
        let session = session();
        assert!(manager.initialize(&session, &[1, 2, 3]).success);
        let report = manager.add_outcome_and_predict(&session, 37);
        assert!(!report.success);
        // The invalid value never reaches the sequence.
        assert_eq!(
            manager.current_sequence(&session).unwrap().unwrap().len(),
            3
        );
    }

    #[test]
    fn round_appends_and_predicts() {
        let manager = manager();
        let session = session();
        manager.initialize(&session, &[4, 9, 15]);

        let report = manager.add_outcome_and_predict(&session, 21);
        assert!(report.success);
        assert!(report.prediction.is_some());
        assert!(report.strategy_name.is_some());
        assert_eq!(report.current_sequence.len(), 4);
        assert_eq!(report.current_sequence[0].value(), 21);
    }

    #[test]
    fn second_round_grades_the_first() {
        let manager = manager();
        let session = session();
        manager.initialize(&session, &[4, 9, 15]);

        let first = manager.add_outcome_and_predict(&session, 21);
        assert!(first.success);
        // Feed the ensemble pick straight back: at least the picking strategy
        // must be graded correct, so some performance document appears.
        let pick = first.prediction.unwrap();
        let second = manager.add_outcome_and_predict(&session, i64::from(pick.value()));
        assert!(second.success);

        let stats = manager.stats().unwrap();
        assert!(!stats.is_empty());
        assert!(stats.iter().all(|p| p.usage_count == 1));
        assert!(stats.iter().any(|p| p.correct_count == 1));
    }

    #[test]
    fn predictions_are_reproducible_across_manager_instances() {
        let run = || {
            let manager = manager();
            let session = session();
            manager.initialize(&session, &[4, 9, 15]);
            let report = manager.add_outcome_and_predict(&session, 21);
            (report.prediction.unwrap(), report.strategy_name.unwrap())
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn top_strategies_is_bounded_by_config() {
        let mut config = ManagerConfig::default();
        config.top_strategies = 3;
        let manager = StrategyManager::new(Arc::new(MemoryStore::new()), config);
        let session = session();
        manager.initialize(&session, &[4, 9, 15, 22, 8]);
        let report = manager.add_outcome_and_predict(&session, 21);
        assert!(report.top_strategies.len() <= 3);
    }

    #[test]
    fn stats_tracks_every_graded_strategy() {
        let manager = manager();
        let session = session();
        manager.initialize(&session, &[4, 9, 15]);
        manager.add_outcome_and_predict(&session, 21);
        manager.add_outcome_and_predict(&session, 0);

        let stats = manager.stats().unwrap();
        // Every strategy predicted in round one and was graded in round two.
        assert_eq!(stats.len(), manager.strategy_names().len());
        for perf in &stats {
            assert!(perf.dynamic_weight >= 20.0 && perf.dynamic_weight <= 80.0);
        }
    }
}
