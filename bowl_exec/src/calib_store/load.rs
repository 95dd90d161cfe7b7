//! Calibration sheet loading
//!
//! Sheets are CSV exports with a header row. See `SheetRow` for the columns
//! recognised in each sheet.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use super::{CalibParams, CalibrationStore, MeasurementClass, SheetRow};
use bowl_if::Position;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of loading one calibration sheet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows stored in the calibration tables.
    pub rows_loaded: usize,

    /// Rows dropped because their key couldn't be interpreted.
    pub rows_skipped: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while loading calibration sheets.
#[derive(Debug, Error)]
pub enum CalibLoadError {
    #[error("Cannot open calibration sheet {0:?}: {1}")]
    OpenError(PathBuf, std::io::Error),

    #[error("Cannot parse the {0:?} calibration sheet: {1}")]
    ParseError(MeasurementClass, csv::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CalibrationStore {
    /// Load all sheets named in the parameters, with paths relative to `root`.
    pub fn load(params: &CalibParams, root: &Path) -> Result<Self, CalibLoadError> {
        let mut store = Self::new();

        let sheets = [
            (MeasurementClass::Straight, &params.straight_path),
            (MeasurementClass::Swing, &params.swing_path),
            (MeasurementClass::Spin, &params.spin_path),
        ];

        for (class, rel_path) in sheets.iter() {
            let rel_path = match rel_path {
                Some(p) => p,
                None => {
                    info!("No {:?} calibration sheet configured", class);
                    continue;
                }
            };

            let path = root.join(rel_path);
            let file = File::open(&path).map_err(|e| CalibLoadError::OpenError(path.clone(), e))?;

            let report = store.read_sheet(*class, file)?;

            info!(
                "Loaded {:?} calibration sheet {:?}: {} rows ({} skipped)",
                class, path, report.rows_loaded, report.rows_skipped
            );
        }

        Ok(store)
    }

    /// Read one calibration sheet into the measurement class's table.
    pub fn read_sheet<R: Read>(
        &mut self,
        class: MeasurementClass,
        reader: R,
    ) -> Result<LoadReport, CalibLoadError> {
        let mut report = LoadReport::default();

        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        for result in csv_reader.deserialize::<SheetRow>() {
            let row = result.map_err(|e| CalibLoadError::ParseError(class, e))?;

            let position = match row.position.parse::<Position>() {
                Ok(p) => p,
                Err(e) => {
                    warn!("Skipping {:?} calibration row: {}", class, e);
                    report.rows_skipped += 1;
                    continue;
                }
            };

            match class {
                MeasurementClass::Straight => {
                    self.insert_straight(row.speed_kmph, position, row.to_single_rpm())
                }
                MeasurementClass::Swing | MeasurementClass::Spin => {
                    let level = match row.level {
                        Some(l) => l,
                        None => {
                            warn!(
                                "Skipping {:?} calibration row at {} km/h, {}: no level",
                                class, row.speed_kmph, position
                            );
                            report.rows_skipped += 1;
                            continue;
                        }
                    };

                    if class == MeasurementClass::Swing {
                        self.insert_swing(row.speed_kmph, level, position, row.to_swing())
                    } else {
                        self.insert_spin(row.speed_kmph, level, position, row.to_single_rpm())
                    }
                }
            }

            report.rows_loaded += 1;
        }

        let ambiguous = self.num_ambiguous_keys(class);
        if ambiguous > 0 {
            warn!(
                "{} {:?} calibration keys match more than one row, the first row will be used",
                ambiguous, class
            );
        }

        debug!("{:?} sheet report: {:?}", class, report);

        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
