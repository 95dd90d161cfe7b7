//! # Failsafe Enforcer
//!
//! Final pass applied to every resolved setpoint before it leaves the
//! resolver. It limits the flywheel speeds and side tilts to what the hardware
//! can safely take, and guarantees the left and right tilts differ whenever
//! spin is demanded: the rig imparts spin through that differential, and
//! clamping alone could otherwise collapse both tilts onto the same limit.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use serde::Deserialize;

// Internal
use bowl_if::Setpoint;
use util::maths::{clamp, round_to};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Hardware limits enforced on every setpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Units: RPM
    pub min_rpm: f64,

    /// Units: RPM
    pub max_rpm: f64,

    pub min_side_tilt: f64,

    pub max_side_tilt: f64,

    /// Amount each side tilt is pushed away from the other when spin is
    /// demanded but the tilts are equal.
    ///
    /// Must be less than half the side tilt range.
    pub spin_separation: f64,
}

/// The failsafe enforcer.
#[derive(Debug, Clone, Copy)]
pub struct FailsafeEnforcer {
    limits: Limits,

    /// Decimal places the setpoints will be written with. Side tilts which
    /// only differ below this precision count as equal.
    output_decimals: Option<u32>,
}

/// Which corrections the enforcer applied to a setpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FailsafeReport {
    /// At least one flywheel speed was clamped.
    pub rpm_limited: bool,

    /// At least one side tilt was clamped.
    pub side_tilt_limited: bool,

    /// The side tilts were forced apart.
    pub separation_forced: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_rpm: 200.0,
            max_rpm: 800.0,
            min_side_tilt: 500.0,
            max_side_tilt: 1800.0,
            spin_separation: 20.0,
        }
    }
}

impl FailsafeEnforcer {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            output_decimals: None,
        }
    }

    /// Compare side tilts at the precision they will be written with.
    pub fn with_output_decimals(mut self, decimals: u32) -> Self {
        self.output_decimals = Some(decimals);
        self
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Enforce the hardware limits and the spin differential on a setpoint.
    ///
    /// Corrections are applied in order: flywheel clamp, side tilt clamp, then
    /// spin separation. Each side tilt's `_actual` reading moves by the same
    /// amount as its commanded value.
    pub fn enforce(&self, setpoint: Setpoint, spin_level: i32) -> (Setpoint, FailsafeReport) {
        let mut sp = setpoint;
        let mut report = FailsafeReport::default();
        let lim = &self.limits;

        // ---- FLYWHEELS ----

        let l_rpm = clamp(&sp.l_rpm, &lim.min_rpm, &lim.max_rpm);
        let r_rpm = clamp(&sp.r_rpm, &lim.min_rpm, &lim.max_rpm);
        report.rpm_limited = l_rpm != sp.l_rpm || r_rpm != sp.r_rpm;
        sp.l_rpm = l_rpm;
        sp.r_rpm = r_rpm;

        // ---- SIDE TILTS ----

        let left = clamp(&sp.left_tilt, &lim.min_side_tilt, &lim.max_side_tilt);
        let right = clamp(&sp.right_tilt, &lim.min_side_tilt, &lim.max_side_tilt);
        report.side_tilt_limited = left != sp.left_tilt || right != sp.right_tilt;
        let left_delta = left - sp.left_tilt;
        let right_delta = right - sp.right_tilt;
        shift_left_tilt(&mut sp, left_delta);
        shift_right_tilt(&mut sp, right_delta);

        // ---- SPIN SEPARATION ----

        if spin_level != 0 && self.tilts_equal(&sp) {
            let sep = lim.spin_separation * (spin_level.signum() as f64);

            trace!(
                "Forcing side tilts apart by {} at {} (spin level {})",
                sep,
                sp.left_tilt,
                spin_level
            );

            shift_left_tilt(&mut sp, sep);
            shift_right_tilt(&mut sp, -sep);
            report.separation_forced = true;

            // Slide the pair back inside the limits if separating pushed one
            // side out, keeping the differential
            let over = sp.left_tilt.max(sp.right_tilt) - lim.max_side_tilt;
            let under = lim.min_side_tilt - sp.left_tilt.min(sp.right_tilt);
            let slide = if over > 0.0 {
                -over
            } else if under > 0.0 {
                under
            } else {
                0.0
            };

            shift_left_tilt(&mut sp, slide);
            shift_right_tilt(&mut sp, slide);
        }

        (sp, report)
    }

    fn tilts_equal(&self, sp: &Setpoint) -> bool {
        match self.output_decimals {
            Some(d) => round_to(sp.left_tilt, d) == round_to(sp.right_tilt, d),
            None => sp.left_tilt == sp.right_tilt,
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn shift_left_tilt(sp: &mut Setpoint, delta: f64) {
    sp.left_tilt += delta;
    sp.left_tilt_actual += delta;
}

fn shift_right_tilt(sp: &mut Setpoint, delta: f64) {
    sp.right_tilt += delta;
    sp.right_tilt_actual += delta;
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
