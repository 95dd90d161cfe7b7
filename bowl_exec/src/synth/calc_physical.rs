//! Physical formula calculations
//!
//! Base values are taken from the measured speed progression and per-position
//! servo settings, then corrected for swing and spin.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::Commanded;
use bowl_if::{ControlTuple, Position};
use util::maths::clamp;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Limits applied to the side tilts by this formula.
const SIDE_TILT_LIMITS: (f64, f64) = (500.0, 1800.0);

/// Pan offset per swing level for the top-mid positions.
const SWING_PAN_PER_LEVEL: [(Position, f64); 3] = [
    (Position::TopMidCentre, 25.0),
    (Position::TopMidLeft, 50.0),
    (Position::TopMidRight, 10.0),
];

const SPIN_PAN_PER_LEVEL: f64 = 10.0;
const SPIN_TILT_PER_LEVEL: f64 = 5.0;
const SPIN_SIDE_TILT_PER_LEVEL: f64 = 40.0;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Flywheel speed of a straight ball at the given launch speed.
///
/// Rises by 15 RPM for every 10 km/h from 340 RPM at 60 km/h. Speeds off the
/// 10 km/h grid use the 60 km/h value.
pub fn base_rpm(speed_kmph: u32) -> f64 {
    match speed_kmph {
        60 => 340.0,
        70 => 355.0,
        80 => 370.0,
        90 => 385.0,
        100 => 400.0,
        110 => 415.0,
        120 => 430.0,
        130 => 445.0,
        140 => 460.0,
        150 => 475.0,
        160 => 490.0,
        _ => 340.0,
    }
}

/// Calculate the commanded values for a control tuple.
pub(crate) fn calc(tuple: &ControlTuple) -> Commanded {
    let spin_active = tuple.has_spin();
    let base_rpm = base_rpm(tuple.speed_kmph);
    let base_side_tilt = base_side_tilt(tuple.position, spin_active);

    let (swing_l_rpm, swing_r_rpm) = swing_rpm_offsets(tuple.swing_level);
    let swing_pan = swing_pan_offset(tuple.position, tuple.swing_level);

    let spin = tuple.spin_level as f64;
    let side_tilt_offset = SPIN_SIDE_TILT_PER_LEVEL * spin;

    // Spin never changes the flywheel speeds, only swing does
    Commanded {
        l_rpm: base_rpm + swing_l_rpm,
        r_rpm: base_rpm + swing_r_rpm,
        pan: base_pan(tuple.position) + swing_pan + SPIN_PAN_PER_LEVEL * spin,
        tilt: base_tilt(tuple.speed_kmph, spin_active) + SPIN_TILT_PER_LEVEL * spin,
        left_tilt: clamp(
            &(base_side_tilt + side_tilt_offset),
            &SIDE_TILT_LIMITS.0,
            &SIDE_TILT_LIMITS.1,
        ),
        right_tilt: clamp(
            &(base_side_tilt - side_tilt_offset),
            &SIDE_TILT_LIMITS.0,
            &SIDE_TILT_LIMITS.1,
        ),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn base_pan(position: Position) -> f64 {
    match position {
        Position::Left | Position::TopMidLeft => 3150.0,
        Position::Right | Position::TopMidRight => 2700.0,
        _ => 2900.0,
    }
}

/// Main tilt before spin correction.
///
/// Slow balls share a single tilt. Above 80 km/h a spinning ball's tilt scales
/// with speed, steeply up to 100 km/h and gently beyond.
fn base_tilt(speed_kmph: u32, spin_active: bool) -> f64 {
    let above_90 = speed_kmph as f64 - 90.0;

    match (speed_kmph, spin_active) {
        (s, _) if s <= 80 => 3120.0,
        (_, false) => 3300.0,
        (s, true) if s <= 100 => 3275.0 + above_90 * 10.0,
        (_, true) => 3275.0 + above_90 * 2.0,
    }
}

/// Midpoint of the left and right tilts.
///
/// With spin the midpoint is offset from the straight value so that the spin
/// correction lands on the measured side tilts.
fn base_side_tilt(position: Position, spin_active: bool) -> f64 {
    match (position, spin_active) {
        (Position::Top, true) => 1550.0,
        (Position::Top, false) => 1500.0,
        (p, true) if p.is_top_mid() => 1420.0,
        (p, false) if p.is_top_mid() => 1400.0,
        (Position::Bottom, true) => 750.0,
        (Position::Bottom, false) => 800.0,
        (_, true) => 1110.0,
        (_, false) => 1200.0,
    }
}

/// Flywheel speed offsets `(left, right)` due to swing.
///
/// Positive swing speeds up the left wheel progressively while the right wheel
/// drops by a constant amount. Negative swing is not the mirror image: the
/// left wheel drops by a near constant amount and the right wheel speeds up
/// progressively.
fn swing_rpm_offsets(swing_level: i32) -> (f64, f64) {
    if swing_level > 0 {
        let steps = (swing_level - 1) as f64;
        (25.0 + steps * 24.0, -51.0)
    } else if swing_level < 0 {
        let steps = (swing_level.abs() - 1) as f64;
        (-75.0 - steps * 2.0, 27.0 + steps * 27.0)
    } else {
        (0.0, 0.0)
    }
}

fn swing_pan_offset(position: Position, swing_level: i32) -> f64 {
    SWING_PAN_PER_LEVEL
        .iter()
        .find(|(p, _)| *p == position)
        .map(|(_, per_level)| per_level * swing_level as f64)
        .unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
