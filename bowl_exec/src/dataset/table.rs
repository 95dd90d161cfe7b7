//! Flat table output

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Serialize;

use super::{Dataset, DatasetError, Entry};
use bowl_if::Position;
use util::{archive::Archiver, maths::round_to};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One row of the flat dataset table: the control tuple followed by its
/// setpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatasetRow {
    #[serde(rename = "Speed")]
    pub speed_kmph: u32,
    #[serde(rename = "Swing_Level")]
    pub swing_level: i32,
    #[serde(rename = "Spin_Level")]
    pub spin_level: i32,
    #[serde(rename = "Position")]
    pub position: Position,

    #[serde(rename = "L_RPM")]
    pub l_rpm: f64,
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
    #[serde(rename = "X")]
    pub x: i32,
    #[serde(rename = "Y")]
    pub y: i32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DatasetRow {
    fn from_entry(entry: &Entry, decimals: u32) -> Self {
        let t = &entry.tuple;
        let sp = entry.setpoint.map_values(|v| round_to(v, decimals));

        Self {
            speed_kmph: t.speed_kmph,
            swing_level: t.swing_level,
            spin_level: t.spin_level,
            position: t.position,
            l_rpm: sp.l_rpm,
            r_rpm: sp.r_rpm,
            pan: sp.pan,
            pan_actual: sp.pan_actual,
            tilt: sp.tilt,
            tilt_actual: sp.tilt_actual,
            left_tilt: sp.left_tilt,
            left_tilt_actual: sp.left_tilt_actual,
            right_tilt: sp.right_tilt,
            right_tilt_actual: sp.right_tilt_actual,
            x: sp.x,
            y: sp.y,
        }
    }
}

impl Dataset {
    /// Table rows in enumeration order, rounded to `decimals` places.
    pub fn rows(&self, decimals: u32) -> impl Iterator<Item = DatasetRow> + '_ {
        self.entries
            .iter()
            .map(move |e| DatasetRow::from_entry(e, decimals))
    }

    /// Write every row into an archive, returning the number written.
    pub fn archive(&self, archiver: &mut Archiver, decimals: u32) -> Result<usize, DatasetError> {
        for row in self.rows(decimals) {
            archiver.serialise(row)?;
        }
        archiver.flush()?;

        Ok(self.entries.len())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
