//! # Synthetic Formula Engine
//!
//! Estimates a setpoint from closed-form formulas when no measured
//! calibration data is available for a control tuple.
//!
//! Two formula variants are available, selected by [`FormulaVariant`]:
//! - `Physical` reproduces the measured speed, swing and spin patterns of the
//!   machine, including the asymmetry between positive and negative swing.
//! - `Linear` is a plain linear interpolation over the control levels.
//!
//! Commanded values are deterministic. The `_actual` fields add independent
//! uniform noise drawn from the caller's random source.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod calc_linear;
mod calc_physical;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Internal
use bowl_if::{ControlTuple, Setpoint};

pub use calc_physical::base_rpm;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the synthetic formula engine.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct SynthParams {
    /// Formula used to estimate setpoints.
    pub variant: FormulaVariant,

    /// Half-width of the uniform noise added to the `_actual` fields.
    pub noise_amplitude: f64,
}

/// The synthetic formula engine.
#[derive(Debug, Clone, Copy)]
pub struct SynthEngine {
    params: SynthParams,
}

/// Commanded actuator values, before noise and coordinates are added.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Commanded {
    pub l_rpm: f64,
    pub r_rpm: f64,
    pub pan: f64,
    pub tilt: f64,
    pub left_tilt: f64,
    pub right_tilt: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Selects the synthetic formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormulaVariant {
    /// Pattern-matched model of the measured machine behaviour.
    Physical,

    /// Linear interpolation over speed and levels.
    Linear,
}

/// A formula variant name which isn't recognised.
#[derive(Debug, thiserror::Error)]
#[error("Unknown formula variant {0:?}, expected \"physical\" or \"linear\"")]
pub struct UnknownVariant(String);

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            variant: FormulaVariant::Physical,
            noise_amplitude: 3.0,
        }
    }
}

impl Default for FormulaVariant {
    fn default() -> Self {
        FormulaVariant::Physical
    }
}

impl FromStr for FormulaVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "physical" | "a" => Ok(FormulaVariant::Physical),
            "linear" | "b" => Ok(FormulaVariant::Linear),
            _ => Err(UnknownVariant(s.to_string())),
        }
    }
}

impl SynthEngine {
    pub fn new(params: SynthParams) -> Self {
        Self { params }
    }

    pub fn variant(&self) -> FormulaVariant {
        self.params.variant
    }

    /// Estimate the setpoint for a control tuple.
    ///
    /// Draws exactly four noise samples from `rng`, in the order pan, tilt,
    /// left tilt, right tilt.
    pub fn synthesize<R>(&self, tuple: &ControlTuple, rng: &mut R) -> Setpoint
    where
        R: Rng + ?Sized,
    {
        let cmd = match self.params.variant {
            FormulaVariant::Physical => calc_physical::calc(tuple),
            FormulaVariant::Linear => calc_linear::calc(tuple),
        };

        Setpoint {
            l_rpm: cmd.l_rpm,
            r_rpm: cmd.r_rpm,
            pan: cmd.pan,
            pan_actual: cmd.pan + self.noise(rng),
            tilt: cmd.tilt,
            tilt_actual: cmd.tilt + self.noise(rng),
            left_tilt: cmd.left_tilt,
            left_tilt_actual: cmd.left_tilt + self.noise(rng),
            right_tilt: cmd.right_tilt,
            right_tilt_actual: cmd.right_tilt + self.noise(rng),
            ..Default::default()
        }
        .with_coordinate(tuple.position.coordinate())
    }

    /// Draw one simulated sensor error.
    fn noise<R>(&self, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        let amp = self.params.noise_amplitude.abs();

        if amp > 0.0 {
            rng.gen_range(-amp..=amp)
        } else {
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
