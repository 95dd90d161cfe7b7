//! Hierarchical JSON output

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde_json::{json, Map, Value};
use std::{collections::HashMap, fs::File, io::BufWriter, path::Path};

use super::{Dataset, DatasetError};
use bowl_if::{
    tuple::{LEVELS, NUM_COMBINATIONS, SPEEDS_KMPH},
    ControlTuple, Position, Setpoint,
};
use util::maths::round_to;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

const DESCRIPTION: &str =
    "Bowling machine setpoints for every speed, swing, spin and position combination";

/// Behaviour every setpoint in the dataset follows.
const PATTERN_NOTES: [&str; 5] = [
    "SWING: L_RPM > R_RPM for positive levels, L_RPM < R_RPM for negative levels",
    "SPIN: Left_Tilt > Right_Tilt for positive levels, Left_Tilt < Right_Tilt for negative levels",
    "SPIN: 40 units of side tilt difference per level",
    "FAILSAFE: Side tilts are never equal for non-zero spin levels",
    "MEASURED: Calibration records are used wherever they exist",
];

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Dataset {
    /// Build the hierarchical JSON document, rounding values to `decimals`
    /// places.
    ///
    /// `data` is keyed by speed, then swing level, then spin level, then
    /// position, each in enumeration order. Tuples missing from the dataset
    /// are left out of their position map.
    pub fn to_json(&self, decimals: u32) -> Result<Value, DatasetError> {
        let setpoints: HashMap<ControlTuple, &Setpoint> = self
            .entries
            .iter()
            .map(|e| (e.tuple, &e.setpoint))
            .collect();

        let mut data = Map::new();

        for &speed in SPEEDS_KMPH.iter() {
            let mut swing_levels = Map::new();

            for &swing in LEVELS.iter() {
                let mut spin_levels = Map::new();

                for &spin in LEVELS.iter() {
                    let mut positions = Map::new();

                    for &pos in Position::ALL.iter() {
                        let tuple = ControlTuple::new(speed, swing, spin, pos);

                        if let Some(sp) = setpoints.get(&tuple) {
                            let rounded = sp.map_values(|v| round_to(v, decimals));
                            positions.insert(
                                pos.id().to_string(),
                                serde_json::to_value(rounded).map_err(DatasetError::JsonError)?,
                            );
                        }
                    }

                    spin_levels.insert(
                        format!("spin_level_{}", spin),
                        json!({ "spin_level": spin, "positions": positions }),
                    );
                }

                swing_levels.insert(
                    format!("swing_level_{}", swing),
                    json!({ "swing_level": swing, "spin_levels": spin_levels }),
                );
            }

            data.insert(
                format!("{}_kmph", speed),
                json!({ "speed": speed, "swing_levels": swing_levels }),
            );
        }

        Ok(json!({
            "metadata": self.metadata(),
            "data": data,
        }))
    }

    /// Write the JSON document to a file.
    pub fn write_json<P: AsRef<Path>>(&self, path: P, decimals: u32) -> Result<(), DatasetError> {
        let path = path.as_ref();
        let doc = self.to_json(decimals)?;

        let file = File::create(path).map_err(|e| DatasetError::CreateError(path.to_path_buf(), e))?;

        serde_json::to_writer_pretty(BufWriter::new(file), &doc)
            .map_err(|e| DatasetError::WriteError(path.to_path_buf(), e))
    }

    fn metadata(&self) -> Value {
        let positions: Vec<&str> = Position::ALL.iter().map(|p| p.id()).collect();

        json!({
            "total_combinations": NUM_COMBINATIONS,
            "speeds": SPEEDS_KMPH,
            "swing_levels": LEVELS,
            "spin_levels": LEVELS,
            "positions": positions,
            "description": DESCRIPTION,
            "formula_variant": self.variant,
            "seed": self.seed,
            "measured_tuples": self.summary.num_measured(),
            "pattern_notes": PATTERN_NOTES,
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
