//! # Calibration Store
//!
//! Holds the measured calibration data for the three measurement classes
//! (straight, swing-only, spin-only) and answers keyed lookups into them.
//!
//! Lookups never fail. A key can match no record, exactly one, or several; the
//! last case is reported as [`Lookup::Ambiguous`] so the caller can surface it
//! while still using the first match.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod load;
mod record;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::collections::HashMap;

use bowl_if::Position;
use serde::Deserialize;

pub use load::*;
pub use record::*;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Source of measured calibration records.
pub trait CalibrationSource {
    /// Find the straight-ball record for a speed and position.
    fn straight(&self, speed_kmph: u32, position: Position) -> Lookup<'_, SingleRpmRecord>;

    /// Find the swing-only record for a speed, swing level and position.
    fn swing(&self, speed_kmph: u32, level: i32, position: Position) -> Lookup<'_, SwingRecord>;

    /// Find the spin-only record for a speed, spin level and position.
    fn spin(&self, speed_kmph: u32, level: i32, position: Position)
        -> Lookup<'_, SingleRpmRecord>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// In-memory calibration tables.
///
/// Records under the same key are kept in insertion (file) order.
#[derive(Debug, Default, Clone)]
pub struct CalibrationStore {
    straight: HashMap<(u32, Position), Vec<SingleRpmRecord>>,
    swing: HashMap<(u32, i32, Position), Vec<SwingRecord>>,
    spin: HashMap<(u32, i32, Position), Vec<SingleRpmRecord>>,
}

/// Paths of the calibration sheets, relative to the software root.
///
/// A missing path leaves that measurement class empty.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CalibParams {
    pub straight_path: Option<String>,
    pub swing_path: Option<String>,
    pub spin_path: Option<String>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of a keyed lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a, R> {
    /// No record matches the key.
    Missing,

    /// Exactly one record matches the key.
    Unique(&'a R),

    /// More than one record matches the key, `first` is the earliest in file
    /// order.
    Ambiguous { first: &'a R, count: usize },
}

/// The three classes of calibration measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementClass {
    Straight,
    Swing,
    Spin,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<'a, R> Lookup<'a, R> {
    fn from_slice(records: Option<&'a Vec<R>>) -> Self {
        match records.map(|v| v.as_slice()) {
            None | Some([]) => Lookup::Missing,
            Some([only]) => Lookup::Unique(only),
            Some(all) => Lookup::Ambiguous {
                first: &all[0],
                count: all.len(),
            },
        }
    }

    /// The record to use, if any. Ambiguous lookups resolve to the first match.
    pub fn first(&self) -> Option<&'a R> {
        match *self {
            Lookup::Missing => None,
            Lookup::Unique(r) => Some(r),
            Lookup::Ambiguous { first, .. } => Some(first),
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Lookup::Ambiguous { .. })
    }
}

impl CalibrationStore {
    /// Create an empty store, every lookup will miss.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_straight(&mut self, speed_kmph: u32, position: Position, record: SingleRpmRecord) {
        self.straight
            .entry((speed_kmph, position))
            .or_default()
            .push(record);
    }

    pub fn insert_swing(
        &mut self,
        speed_kmph: u32,
        level: i32,
        position: Position,
        record: SwingRecord,
    ) {
        self.swing
            .entry((speed_kmph, level, position))
            .or_default()
            .push(record);
    }

    pub fn insert_spin(
        &mut self,
        speed_kmph: u32,
        level: i32,
        position: Position,
        record: SingleRpmRecord,
    ) {
        self.spin
            .entry((speed_kmph, level, position))
            .or_default()
            .push(record);
    }

    /// Number of records held for a measurement class.
    pub fn num_records(&self, class: MeasurementClass) -> usize {
        match class {
            MeasurementClass::Straight => self.straight.values().map(Vec::len).sum(),
            MeasurementClass::Swing => self.swing.values().map(Vec::len).sum(),
            MeasurementClass::Spin => self.spin.values().map(Vec::len).sum(),
        }
    }

    /// Number of keys which match more than one record, for a measurement
    /// class.
    pub fn num_ambiguous_keys(&self, class: MeasurementClass) -> usize {
        match class {
            MeasurementClass::Straight => self.straight.values().filter(|v| v.len() > 1).count(),
            MeasurementClass::Swing => self.swing.values().filter(|v| v.len() > 1).count(),
            MeasurementClass::Spin => self.spin.values().filter(|v| v.len() > 1).count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.straight.is_empty() && self.swing.is_empty() && self.spin.is_empty()
    }
}

impl CalibrationSource for CalibrationStore {
    fn straight(&self, speed_kmph: u32, position: Position) -> Lookup<'_, SingleRpmRecord> {
        Lookup::from_slice(self.straight.get(&(speed_kmph, position)))
    }

    fn swing(&self, speed_kmph: u32, level: i32, position: Position) -> Lookup<'_, SwingRecord> {
        Lookup::from_slice(self.swing.get(&(speed_kmph, level, position)))
    }

    fn spin(
        &self,
        speed_kmph: u32,
        level: i32,
        position: Position,
    ) -> Lookup<'_, SingleRpmRecord> {
        Lookup::from_slice(self.spin.get(&(speed_kmph, level, position)))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
