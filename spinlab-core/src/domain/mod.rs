//! Domain types for SpinLab.

pub mod ids;
pub mod outcome;
pub mod performance;
pub mod record;

pub use ids::{SessionId, StrategyId};
pub use outcome::{Outcome, OutcomeError, OUTCOME_COUNT};
pub use performance::{StrategyPerformance, WeightBlend};
pub use record::{Grade, PredictionRecord};
