//! Linear formula calculations

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
const SIDE_TILT_LIMITS: (f64, f64) = (800.0, 1500.0);

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Calculate the commanded values for a control tuple.
pub(crate) fn calc(tuple: &ControlTuple) -> Commanded {
    let speed = tuple.speed_kmph as f64;
    let swing = tuple.swing_level as f64;
    let spin = tuple.spin_level as f64;

    let l_rpm = 340.0 + 1.2 * speed + 15.0 * swing + 5.0 * spin;

    // Without swing both wheels must turn at the same speed, so the right
    // channel follows the left one.
    let r_rpm = if tuple.has_swing() {
        320.0 + 1.1 * speed + 12.0 * swing + 8.0 * spin
    } else {
        l_rpm
    };

    let side_tilt_offset = 20.0 * swing - 15.0 * spin;

    Commanded {
        l_rpm,
        r_rpm,
        pan: 2900.0 + 10.0 * swing + 5.0 * spin + pan_adjustment(tuple.position),
        tilt: 3120.0 + 2.0 * swing + 3.0 * spin,
        left_tilt: clamp(
            &(1200.0 + side_tilt_offset),
            &SIDE_TILT_LIMITS.0,
            &SIDE_TILT_LIMITS.1,
        ),
        right_tilt: clamp(
            &(1200.0 - side_tilt_offset),
            &SIDE_TILT_LIMITS.0,
            &SIDE_TILT_LIMITS.1,
        ),
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Pan adjustment per position, relative to the centre line.
fn pan_adjustment(position: Position) -> f64 {
    match position {
        Position::Centre => 0.0,
        Position::Top => 0.0,
        Position::Left => 250.0,
        Position::Right => -200.0,
        Position::Bottom => 0.0,
        Position::TopMidCentre => 0.0,
        Position::TopMidLeft => 250.0,
        Position::TopMidRight => -200.0,
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_straight() {
        let cmd = calc(&ControlTuple::new(100, 0, 0, Position::Centre));

        assert_eq!(cmd.l_rpm, 460.0);
        assert_eq!(cmd.r_rpm, cmd.l_rpm);
        assert_eq!(cmd.pan, 2900.0);
        assert_eq!(cmd.tilt, 3120.0);
        assert_eq!(cmd.left_tilt, 1200.0);
        assert_eq!(cmd.right_tilt, 1200.0);
    }

    #[test]
    fn test_swing_and_spin() {
        let cmd = calc(&ControlTuple::new(100, 2, -1, Position::Left));

        assert_eq!(cmd.l_rpm, 485.0);
        assert_eq!(cmd.r_rpm, 446.0);
        assert_eq!(cmd.pan, 2900.0 + 20.0 - 5.0 + 250.0);
        assert_eq!(cmd.tilt, 3120.0 + 4.0 - 3.0);
        assert_eq!(cmd.left_tilt, 1200.0 + 55.0);
        assert_eq!(cmd.right_tilt, 1200.0 - 55.0);
    }

    #[test]
    fn test_spin_without_swing_keeps_wheels_matched() {
        for spin in bowl_if::tuple::LEVELS.iter() {
            let cmd = calc(&ControlTuple::new(140, 0, *spin, Position::Top));
            assert_eq!(cmd.l_rpm, cmd.r_rpm);
        }
    }

    #[test]
    fn test_side_tilt_limits() {
        let cmd = calc(&ControlTuple::new(60, 5, -5, Position::Right));

        // 20 * 5 + 15 * 5 = 175 either side of 1200, inside the limits
        assert_eq!(cmd.left_tilt, 1375.0);
        assert_eq!(cmd.right_tilt, 1025.0);

        assert!(bowl_if::tuple::all_tuples().all(|t| {
            let cmd = calc(&t);
            (800.0..=1500.0).contains(&cmd.left_tilt) && (800.0..=1500.0).contains(&cmd.right_tilt)
        }));
    }
}
