//! SpinLab Runner — persistence and round orchestration.
//!
//! Everything stateful lives here: the versioned document store and its two
//! backends, the per-session sequence and prediction logs, the performance
//! tracker, and the `StrategyManager` that drives a full
//! observe-grade-predict round against the pure engine in `spinlab-core`.

pub mod config;
pub mod manager;
pub mod predictions;
pub mod sequence;
pub mod store;
pub mod tracker;

pub use config::ManagerConfig;
pub use manager::{InitializeReport, ManagerError, RoundReport, StrategyManager, TopStrategy};
pub use store::{JsonFileStore, MemoryStore, Store};
