//! # Actuator Setpoints

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::geometry::PositionCoordinate;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Commanded and simulated-actual actuator values for one control tuple.
///
/// Field names follow the column names of the calibration sheets.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Setpoint {
    /// Left flywheel speed demand.
    ///
    /// Units: RPM
    #[serde(rename = "L_RPM")]
    pub l_rpm: f64,

    /// Right flywheel speed demand.
    ///
    /// Units: RPM
    #[serde(rename = "R_RPM")]
    pub r_rpm: f64,

    #[serde(rename = "Pan")]
    pub pan: f64,
    #[serde(rename = "Pan_actual")]
    pub pan_actual: f64,

    #[serde(rename = "Tilt")]
    pub tilt: f64,
    #[serde(rename = "Tilt_actual")]
    pub tilt_actual: f64,

    #[serde(rename = "Left_Tilt")]
    pub left_tilt: f64,
    #[serde(rename = "Left_Tilt_Actual")]
    pub left_tilt_actual: f64,

    #[serde(rename = "Right_Tilt")]
    pub right_tilt: f64,
    #[serde(rename = "Right_Tilt_Actual")]
    pub right_tilt_actual: f64,

    /// Target coordinate, copied from the aim position.
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Setpoint {
    /// Set the target coordinate.
    pub fn with_coordinate(mut self, coord: PositionCoordinate) -> Self {
        self.x = coord.x;
        self.y = coord.y;
        self
    }

    /// Apply `f` to every continuous value, leaving the coordinate untouched.
    pub fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(f64) -> f64,
    {
        Self {
            l_rpm: f(self.l_rpm),
            r_rpm: f(self.r_rpm),
            pan: f(self.pan),
            pan_actual: f(self.pan_actual),
            tilt: f(self.tilt),
            tilt_actual: f(self.tilt_actual),
            left_tilt: f(self.left_tilt),
            left_tilt_actual: f(self.left_tilt_actual),
            right_tilt: f(self.right_tilt),
            right_tilt_actual: f(self.right_tilt_actual),
            x: self.x,
            y: self.y,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
