//! Conversion of measured records into setpoint values

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::Sentinels;
use crate::calib_store::{ServoReadings, SingleRpmRecord, SwingRecord};
use bowl_if::{PositionCoordinate, Setpoint};
use util::maths::mean;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A measured record with every reading present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Measured {
    pub l_rpm: f64,
    pub r_rpm: f64,
    pub pan: f64,
    pub pan_actual: f64,
    pub tilt: f64,
    pub tilt_actual: f64,
    pub left_tilt: f64,
    pub left_tilt_actual: f64,
    pub right_tilt: f64,
    pub right_tilt_actual: f64,
}

/// Fills missing readings from the sentinels, counting each substitution.
///
/// Non-finite readings (`NaN`, `inf`) count as missing.
pub(crate) struct Filler<'a> {
    sentinels: &'a Sentinels,
    pub num_filled: u32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Measured {
    /// Field-wise mean of two measurements.
    pub fn mean(&self, other: &Measured) -> Measured {
        Measured {
            l_rpm: mean(self.l_rpm, other.l_rpm),
            r_rpm: mean(self.r_rpm, other.r_rpm),
            pan: mean(self.pan, other.pan),
            pan_actual: mean(self.pan_actual, other.pan_actual),
            tilt: mean(self.tilt, other.tilt),
            tilt_actual: mean(self.tilt_actual, other.tilt_actual),
            left_tilt: mean(self.left_tilt, other.left_tilt),
            left_tilt_actual: mean(self.left_tilt_actual, other.left_tilt_actual),
            right_tilt: mean(self.right_tilt, other.right_tilt),
            right_tilt_actual: mean(self.right_tilt_actual, other.right_tilt_actual),
        }
    }

    pub fn into_setpoint(self, coord: PositionCoordinate) -> Setpoint {
        Setpoint {
            l_rpm: self.l_rpm,
            r_rpm: self.r_rpm,
            pan: self.pan,
            pan_actual: self.pan_actual,
            tilt: self.tilt,
            tilt_actual: self.tilt_actual,
            left_tilt: self.left_tilt,
            left_tilt_actual: self.left_tilt_actual,
            right_tilt: self.right_tilt,
            right_tilt_actual: self.right_tilt_actual,
            ..Default::default()
        }
        .with_coordinate(coord)
    }
}

impl<'a> Filler<'a> {
    pub fn new(sentinels: &'a Sentinels) -> Self {
        Self {
            sentinels,
            num_filled: 0,
        }
    }

    /// Convert a straight or spin record. Its single wheel speed drives both
    /// wheels.
    pub fn single_rpm(&mut self, record: &SingleRpmRecord) -> Measured {
        let rpm = self.or(record.rpm, self.sentinels.left_rpm);
        self.with_servo(rpm, rpm, &record.servo)
    }

    /// Convert a swing record, keeping the wheel speeds independent.
    pub fn swing(&mut self, record: &SwingRecord) -> Measured {
        let l_rpm = self.or(record.l_rpm, self.sentinels.left_rpm);
        let r_rpm = self.or(record.r_rpm, self.sentinels.right_rpm);
        self.with_servo(l_rpm, r_rpm, &record.servo)
    }

    fn with_servo(&mut self, l_rpm: f64, r_rpm: f64, servo: &ServoReadings) -> Measured {
        let s = *self.sentinels;

        // A missing reading falls back to its commanded value
        let pan = self.or(servo.pan, s.pan);
        let tilt = self.or(servo.tilt, s.tilt);
        let left_tilt = self.or(servo.left_tilt, s.side_tilt);
        let right_tilt = self.or(servo.right_tilt, s.side_tilt);

        Measured {
            l_rpm,
            r_rpm,
            pan,
            pan_actual: self.or(servo.pan_actual, pan),
            tilt,
            tilt_actual: self.or(servo.tilt_actual, tilt),
            left_tilt,
            left_tilt_actual: self.or(servo.left_tilt_actual, left_tilt),
            right_tilt,
            right_tilt_actual: self.or(servo.right_tilt_actual, right_tilt),
        }
    }

    fn or(&mut self, value: Option<f64>, sentinel: f64) -> f64 {
        match value {
            Some(v) if v.is_finite() => v,
            _ => {
                self.num_filled += 1;
                sentinel
            }
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_missing_rpm_sentinels() {
        let sentinels = Sentinels::default();
        let mut filler = Filler::new(&sentinels);

        let single = filler.single_rpm(&SingleRpmRecord::default());
        assert_eq!((single.l_rpm, single.r_rpm), (340.0, 340.0));

        let swing = filler.swing(&SwingRecord {
            l_rpm: Some(473.0),
            ..Default::default()
        });
        assert_eq!((swing.l_rpm, swing.r_rpm), (473.0, 320.0));
    }

    #[test]
    fn test_missing_servo_readings() {
        let sentinels = Sentinels::default();
        let mut filler = Filler::new(&sentinels);

        let m = filler.single_rpm(&SingleRpmRecord {
            rpm: Some(400.0),
            servo: ServoReadings {
                pan: Some(2950.0),
                left_tilt: Some(1300.0),
                left_tilt_actual: Some(1302.0),
                ..Default::default()
            },
        });

        assert_eq!(m.pan, 2950.0);
        assert_eq!(m.pan_actual, 2950.0);
        assert_eq!(m.tilt, 3120.0);
        assert_eq!(m.tilt_actual, 3120.0);
        assert_eq!(m.left_tilt_actual, 1302.0);
        assert_eq!(m.right_tilt, 1200.0);
        assert_eq!(m.right_tilt_actual, 1200.0);

        // pan_actual, tilt, tilt_actual, right_tilt, right_tilt_actual
        assert_eq!(filler.num_filled, 5);
    }

    #[test]
    fn test_non_finite_readings_are_missing() {
        let sentinels = Sentinels::default();
        let mut filler = Filler::new(&sentinels);

        let m = filler.swing(&SwingRecord {
            l_rpm: Some(f64::NAN),
            r_rpm: Some(f64::INFINITY),
            servo: ServoReadings {
                pan: Some(2950.0),
                pan_actual: Some(2951.0),
                tilt: Some(3300.0),
                tilt_actual: Some(f64::NEG_INFINITY),
                left_tilt: Some(f64::NAN),
                left_tilt_actual: Some(1302.0),
                right_tilt: Some(1100.0),
                right_tilt_actual: Some(1099.0),
            },
        });

        assert_eq!((m.l_rpm, m.r_rpm), (340.0, 320.0));
        assert_eq!(m.tilt_actual, 3300.0);
        assert_eq!(m.left_tilt, 1200.0);
        assert_eq!(m.left_tilt_actual, 1302.0);

        // l_rpm, r_rpm, tilt_actual, left_tilt
        assert_eq!(filler.num_filled, 4);
    }

    #[test]
    fn test_complete_record_fills_nothing() {
        let sentinels = Sentinels::default();
        let mut filler = Filler::new(&sentinels);

        filler.swing(&SwingRecord {
            l_rpm: Some(473.0),
            r_rpm: Some(349.0),
            servo: ServoReadings {
                pan: Some(2900.0),
                pan_actual: Some(2901.0),
                tilt: Some(3300.0),
                tilt_actual: Some(3299.0),
                left_tilt: Some(1200.0),
                left_tilt_actual: Some(1201.0),
                right_tilt: Some(1200.0),
                right_tilt_actual: Some(1198.0),
            },
        });

        assert_eq!(filler.num_filled, 0);
    }
}
