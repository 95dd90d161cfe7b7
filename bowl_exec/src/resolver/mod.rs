//! # Parameter Resolver
//!
//! Resolves a control tuple into a setpoint. Measured calibration data is
//! preferred, partial measurements are blended, and the synthetic formula
//! engine covers everything else, so every tuple resolves.
//!
//! Tiers, in priority order:
//! 1. Straight: no swing and no spin, straight-ball record.
//! 2. Pure spin: spin only, spin record, single RPM on both wheels.
//! 3. Pure swing: swing only, swing record, independent wheel speeds.
//! 4. Combined: swing and spin, the mean of a swing and a spin record, or
//!    whichever of the two exists.
//! 5. Synthetic: any lookup miss.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod blend;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use crate::failsafe::FailsafeReport;

pub use state::*;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Values substituted for readings missing from a matched record.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Sentinels {
    /// Left wheel, or the only wheel speed of a straight or spin record.
    ///
    /// Units: RPM
    pub left_rpm: f64,

    /// Units: RPM
    pub right_rpm: f64,

    pub pan: f64,

    pub tilt: f64,

    /// Used for both left and right tilts.
    pub side_tilt: f64,
}

/// Report on how a single tuple was resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// The tier which produced the setpoint.
    pub tier: Tier,

    /// Number of readings replaced by sentinels.
    pub sentinel_fields: u32,

    /// Number of lookups which matched more than one record.
    pub ambiguous_lookups: u32,

    /// Corrections applied by the failsafe, if it was run.
    pub failsafe: FailsafeReport,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Resolution tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Straight-ball record.
    Straight,

    /// Spin-only record for a tuple without swing.
    PureSpin,

    /// Swing-only record for a tuple without spin.
    PureSwing,

    /// Mean of a swing record and a spin record.
    Combined,

    /// Swing and spin demanded, only the swing record exists.
    CombinedSwingOnly,

    /// Swing and spin demanded, only the spin record exists.
    CombinedSpinOnly,

    /// Synthetic formula.
    Synthetic,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            left_rpm: 340.0,
            right_rpm: 320.0,
            pan: 2900.0,
            tilt: 3120.0,
            side_tilt: 1200.0,
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Tier::Synthetic
    }
}

impl Tier {
    /// All tiers in priority order.
    pub const ALL: [Tier; 7] = [
        Tier::Straight,
        Tier::PureSpin,
        Tier::PureSwing,
        Tier::Combined,
        Tier::CombinedSwingOnly,
        Tier::CombinedSpinOnly,
        Tier::Synthetic,
    ];

    /// True if the setpoint came from measured data.
    pub fn is_measured(&self) -> bool {
        *self != Tier::Synthetic
    }
}
