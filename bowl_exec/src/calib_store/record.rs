//! Measured calibration records

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Servo readings captured alongside every calibration shot.
///
/// Any reading may be missing from the source sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ServoReadings {
    pub pan: Option<f64>,
    pub pan_actual: Option<f64>,
    pub tilt: Option<f64>,
    pub tilt_actual: Option<f64>,
    pub left_tilt: Option<f64>,
    pub left_tilt_actual: Option<f64>,
    pub right_tilt: Option<f64>,
    pub right_tilt_actual: Option<f64>,
}

/// A record with a single flywheel speed, as measured for straight and
/// spin-only shots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleRpmRecord {
    /// Flywheel speed shared by both wheels.
    ///
    /// Units: RPM
    pub rpm: Option<f64>,

    pub servo: ServoReadings,
}

/// A record with independent left and right flywheel speeds, as measured for
/// swing-only shots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SwingRecord {
    /// Units: RPM
    pub l_rpm: Option<f64>,

    /// Units: RPM
    pub r_rpm: Option<f64>,

    pub servo: ServoReadings,
}

/// One row of a calibration sheet.
///
/// The three sheets share their servo columns, so a single row type covers
/// all of them; columns absent from a sheet deserialise as `None`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SheetRow {
    #[serde(rename = "Speed")]
    pub speed_kmph: u32,

    #[serde(rename = "Level", default)]
    pub level: Option<i32>,

    #[serde(rename = "Position")]
    pub position: String,

    #[serde(rename = "RPM", default)]
    pub rpm: Option<f64>,
    #[serde(rename = "L_RPM", default)]
    pub l_rpm: Option<f64>,
    #[serde(rename = "R_RPM", default)]
    pub r_rpm: Option<f64>,

    #[serde(rename = "Pan", default)]
    pub pan: Option<f64>,
    #[serde(rename = "Pan_actual", default)]
    pub pan_actual: Option<f64>,
    #[serde(rename = "Tilt", default)]
    pub tilt: Option<f64>,
    #[serde(rename = "Tilt_actual", default)]
    pub tilt_actual: Option<f64>,
    #[serde(rename = "Left_Tilt", default)]
    pub left_tilt: Option<f64>,
    #[serde(rename = "Left_Tilt_Actual", default)]
    pub left_tilt_actual: Option<f64>,
    #[serde(rename = "Right_Tilt", default)]
    pub right_tilt: Option<f64>,
    #[serde(rename = "Right_Tilt_Actual", default)]
    pub right_tilt_actual: Option<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SheetRow {
    pub(crate) fn servo(&self) -> ServoReadings {
        ServoReadings {
            pan: self.pan,
            pan_actual: self.pan_actual,
            tilt: self.tilt,
            tilt_actual: self.tilt_actual,
            left_tilt: self.left_tilt,
            left_tilt_actual: self.left_tilt_actual,
            right_tilt: self.right_tilt,
            right_tilt_actual: self.right_tilt_actual,
        }
    }

    pub(crate) fn to_single_rpm(&self) -> SingleRpmRecord {
        SingleRpmRecord {
            rpm: self.rpm,
            servo: self.servo(),
        }
    }

    pub(crate) fn to_swing(&self) -> SwingRecord {
        SwingRecord {
            l_rpm: self.l_rpm,
            r_rpm: self.r_rpm,
            servo: self.servo(),
        }
    }
}
