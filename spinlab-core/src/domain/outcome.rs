//! Outcome — a validated wheel result in 0..=36.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of distinct outcomes on a single-zero wheel.
pub const OUTCOME_COUNT: usize = 37;

/// Red outcomes on the standard single-zero layout.
const RED: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

/// Errors from outcome construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OutcomeError {
    #[error("invalid outcome {0}: outcomes must be in 0..=36")]
    OutOfRange(i64),
}

/// A single wheel result, guaranteed in 0..=36.
///
/// Constructed only through [`Outcome::new`] / `TryFrom`, so every value in
/// the system is valid by the time it carries this type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Outcome(u8);

impl Outcome {
    pub const ZERO: Outcome = Outcome(0);

    pub fn new(value: u8) -> Result<Self, OutcomeError> {
        if value as usize >= OUTCOME_COUNT {
            return Err(OutcomeError::OutOfRange(value as i64));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Index into a 37-slot score table.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all 37 outcomes in numeric order.
    pub fn all() -> impl Iterator<Item = Outcome> {
        (0..OUTCOME_COUNT as u8).map(Outcome)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Red on the standard layout. Zero is neither red nor black.
    pub fn is_red(self) -> bool {
        RED.contains(&self.0)
    }

    pub fn is_black(self) -> bool {
        !self.is_zero() && !self.is_red()
    }

    /// Even/odd split; zero belongs to neither side of the bet.
    pub fn is_even(self) -> bool {
        !self.is_zero() && self.0 % 2 == 0
    }

    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    /// Low half (1..=18). Zero is neither low nor high.
    pub fn is_low(self) -> bool {
        (1..=18).contains(&self.0)
    }

    pub fn is_high(self) -> bool {
        (19..=36).contains(&self.0)
    }
}

impl TryFrom<i64> for Outcome {
    type Error = OutcomeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(0..OUTCOME_COUNT as i64).contains(&value) {
            return Err(OutcomeError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }
}

impl From<Outcome> for i64 {
    fn from(outcome: Outcome) -> Self {
        outcome.0 as i64
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
