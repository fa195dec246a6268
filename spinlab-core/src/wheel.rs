//! Wheel topology — the fixed physical ordering of the 37 outcomes.
//!
//! "Neighbors" are physical, not numeric: a prediction of 0 counts 32 and 26
//! as adjacent because they sit next to 0 on the wheel, regardless of value.
//! The topology is a process-wide constant; a malformed permutation is a
//! configuration fault caught at construction, never a runtime error.

use crate::domain::{Outcome, OUTCOME_COUNT};
use std::sync::OnceLock;
use thiserror::Error;

/// Clockwise ordering of the standard single-zero wheel.
const STANDARD_ORDER: [u8; OUTCOME_COUNT] = [
    0, 32, 15, 19, 4, 21, 2, 25, 17, 34, 6, 27, 13, 36, 11, 30, 8, 23, 10, 5, 24, 16, 33, 1, 20,
    14, 31, 9, 22, 18, 29, 7, 28, 12, 35, 3, 26,
];

/// Errors from topology construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    #[error("wheel order is not a permutation of 0..=36: {0} appears more than once")]
    DuplicateSlot(u8),
    #[error("wheel order contains {0}, outside 0..=36")]
    SlotOutOfRange(u8),
}

/// Immutable physical layout of the wheel.
///
/// Provides position lookup and the 19-outcome neighbor set (the outcome
/// itself plus [`Self::NEIGHBOR_RADIUS`] slots each way, wrapping around).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WheelTopology {
    order: [Outcome; OUTCOME_COUNT],
    /// positions[outcome.index()] = slot index in `order`.
    positions: [usize; OUTCOME_COUNT],
}

impl WheelTopology {
    /// Physical neighbors counted on each side of a prediction.
    pub const NEIGHBOR_RADIUS: usize = 9;

    /// The standard single-zero wheel, built once per process.
    pub fn standard() -> &'static WheelTopology {
        static STANDARD: OnceLock<WheelTopology> = OnceLock::new();
        STANDARD.get_or_init(|| {
            WheelTopology::new(STANDARD_ORDER).expect("standard wheel order is a permutation")
        })
    }

    /// Build a topology from an explicit ordering, verifying it is a
    /// permutation of 0..=36.
    pub fn new(order: [u8; OUTCOME_COUNT]) -> Result<Self, WheelError> {
        let mut positions = [usize::MAX; OUTCOME_COUNT];
        let mut outcomes = [Outcome::ZERO; OUTCOME_COUNT];
        for (slot, &value) in order.iter().enumerate() {
            let outcome = Outcome::new(value).map_err(|_| WheelError::SlotOutOfRange(value))?;
            if positions[outcome.index()] != usize::MAX {
                return Err(WheelError::DuplicateSlot(value));
            }
            positions[outcome.index()] = slot;
            outcomes[slot] = outcome;
        }
        Ok(Self {
            order: outcomes,
            positions,
        })
    }

    /// Slot index of an outcome on the wheel.
    pub fn position(&self, outcome: Outcome) -> usize {
        self.positions[outcome.index()]
    }

    /// Outcome at a slot index, wrapping around the rim.
    pub fn at(&self, slot: isize) -> Outcome {
        let len = OUTCOME_COUNT as isize;
        self.order[slot.rem_euclid(len) as usize]
    }

    /// Minimal number of slots separating two outcomes (0..=18).
    pub fn distance(&self, a: Outcome, b: Outcome) -> usize {
        let pa = self.position(a);
        let pb = self.position(b);
        let forward = (pa + OUTCOME_COUNT - pb) % OUTCOME_COUNT;
        forward.min(OUTCOME_COUNT - forward)
    }

    /// True when `b` lies within the neighbor radius of `a` (including `a`
    /// itself). This is the default grading rule's notion of a hit.
    pub fn within_neighbors(&self, a: Outcome, b: Outcome) -> bool {
        self.distance(a, b) <= Self::NEIGHBOR_RADIUS
    }

    /// The 19-outcome neighbor set: the outcome itself plus
    /// `NEIGHBOR_RADIUS` clockwise and counter-clockwise neighbors.
    pub fn neighbors(&self, outcome: Outcome) -> Vec<Outcome> {
        let center = self.position(outcome) as isize;
        let radius = Self::NEIGHBOR_RADIUS as isize;
        (-radius..=radius).map(|d| self.at(center + d)).collect()
    }
}
