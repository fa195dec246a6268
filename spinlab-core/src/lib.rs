//! SpinLab Core — outcomes, wheel topology, strategy family, weight arithmetic.
//!
//! This crate contains the prediction engine's pure parts:
//! - Domain types (outcomes, prediction records, per-strategy performance)
//! - The fixed single-zero wheel topology and neighbor lookup
//! - The `Strategy` trait and all concrete predictors
//! - Score-vector helpers shared by the strategy family
//! - A deterministic, hash-derived RNG hierarchy
//!
//! No I/O lives here; persistence and orchestration are in `spinlab-runner`.

pub mod domain;
pub mod rng;
pub mod score;
pub mod strategies;
pub mod wheel;
