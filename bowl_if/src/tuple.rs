//! # Control Tuples
//!
//! A control tuple is the discrete command given to the machine: launch speed,
//! swing level, spin level and aim position.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, NUM_POSITIONS};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Launch speeds supported by the machine.
///
/// Units: kilometers/hour
pub const SPEEDS_KMPH: [u32; 11] = [60, 70, 80, 90, 100, 110, 120, 130, 140, 150, 160];

/// Swing and spin levels. Level 0 means no effect of that kind.
pub const LEVELS: [i32; 11] = [-5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5];

/// Number of (speed, swing, spin) combinations.
pub const NUM_COMBINATIONS: usize = SPEEDS_KMPH.len() * LEVELS.len() * LEVELS.len();

/// Number of control tuples in the full parameter space.
pub const NUM_TUPLES: usize = NUM_COMBINATIONS * NUM_POSITIONS;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single command to the machine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlTuple {
    /// Launch speed.
    ///
    /// Units: kilometers/hour
    pub speed_kmph: u32,

    /// Swing level, positive swings favour the left flywheel.
    pub swing_level: i32,

    /// Spin level, positive spins raise the left tilt above the right.
    pub spin_level: i32,

    /// Aim position.
    pub position: Position,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ControlTuple {
    pub fn new(speed_kmph: u32, swing_level: i32, spin_level: i32, position: Position) -> Self {
        Self {
            speed_kmph,
            swing_level,
            spin_level,
            position,
        }
    }

    /// True if the tuple lies inside the declared parameter space.
    pub fn is_valid(&self) -> bool {
        SPEEDS_KMPH.contains(&self.speed_kmph)
            && LEVELS.contains(&self.swing_level)
            && LEVELS.contains(&self.spin_level)
    }

    pub fn has_swing(&self) -> bool {
        self.swing_level != 0
    }

    pub fn has_spin(&self) -> bool {
        self.spin_level != 0
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Iterate the full parameter space in its fixed order: speed, then swing,
/// then spin, then position.
///
/// Reproducible datasets depend on this order never changing.
pub fn all_tuples() -> impl Iterator<Item = ControlTuple> {
    SPEEDS_KMPH.iter().flat_map(|&speed| {
        LEVELS.iter().flat_map(move |&swing| {
            LEVELS.iter().flat_map(move |&spin| {
                Position::ALL
                    .iter()
                    .map(move |&pos| ControlTuple::new(speed, swing, spin, pos))
            })
        })
    })
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_all_tuples() {
        let tuples: Vec<ControlTuple> = all_tuples().collect();

        assert_eq!(tuples.len(), 10_648);
        assert_eq!(tuples.len(), NUM_TUPLES);
        assert!(tuples.iter().all(|t| t.is_valid()));

        // Order is speed, swing, spin, position
        assert_eq!(tuples[0], ControlTuple::new(60, -5, -5, Position::Centre));
        assert_eq!(tuples[1], ControlTuple::new(60, -5, -5, Position::Top));
        assert_eq!(tuples[8], ControlTuple::new(60, -5, -4, Position::Centre));
        assert_eq!(
            tuples[NUM_TUPLES - 1],
            ControlTuple::new(160, 5, 5, Position::TopMidRight)
        );
    }

    #[test]
    fn test_validity() {
        assert!(ControlTuple::new(100, 0, 0, Position::Left).is_valid());
        assert!(!ControlTuple::new(105, 0, 0, Position::Left).is_valid());
        assert!(!ControlTuple::new(100, 6, 0, Position::Left).is_valid());
        assert!(!ControlTuple::new(100, 0, -6, Position::Left).is_valid());
    }
}
