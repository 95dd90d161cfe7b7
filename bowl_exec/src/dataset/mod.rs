//! # Dataset Generation
//!
//! Resolves every control tuple in the parameter space, in its fixed order,
//! and collects the setpoints along with a summary of how they were produced.
//! The dataset can then be written as hierarchical JSON or a flat CSV table.
//!
//! Values are kept at full precision in memory and rounded when written.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod json;
mod table;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf};
use thiserror::Error;

// Internal
use crate::{
    calib_store::CalibrationSource,
    resolver::{ParamResolver, StatusReport, Tier},
    synth::FormulaVariant,
};
use bowl_if::{
    geometry::NUM_POSITIONS,
    tuple::{all_tuples, NUM_COMBINATIONS, NUM_TUPLES},
    ControlTuple, Setpoint,
};

pub use table::DatasetRow;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for dataset generation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetParams {
    /// Seed of the random source used for simulated readings.
    pub seed: u64,

    /// Number of decimal places kept in the written values.
    pub decimals: u32,

    /// Log progress every this many (speed, swing, spin) combinations. Zero
    /// disables progress logging.
    pub progress_every: usize,

    /// Name of the JSON output inside the session directory.
    pub json_file_name: String,

    /// Name of the CSV output inside the session directory.
    pub csv_file_name: String,
}

/// One resolved tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub tuple: ControlTuple,
    pub setpoint: Setpoint,
}

/// A complete dataset, in enumeration order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub entries: Vec<Entry>,
    pub summary: DatasetSummary,
    pub variant: FormulaVariant,
    pub seed: u64,
}

/// Run-level counters aggregated from each tuple's status report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    pub num_tuples: usize,

    /// Number of tuples resolved by each tier.
    pub tier_counts: BTreeMap<Tier, usize>,

    /// Total readings replaced by sentinels.
    pub sentinel_fields: u64,

    /// Total lookups which matched more than one record.
    pub ambiguous_lookups: u64,

    /// Tuples whose flywheel speeds were clamped.
    pub rpm_limited: usize,

    /// Tuples whose side tilts were clamped.
    pub side_tilt_limited: usize,

    /// Tuples whose side tilts were forced apart.
    pub separations_forced: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised while writing a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Cannot create the dataset file {0:?}: {1}")]
    CreateError(PathBuf, std::io::Error),

    #[error("Cannot convert the dataset to JSON: {0}")]
    JsonError(serde_json::Error),

    #[error("Cannot write the dataset file {0:?}: {1}")]
    WriteError(PathBuf, serde_json::Error),

    #[error("Cannot archive the dataset table: {0}")]
    ArchiveError(#[from] util::archive::ArchiveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for DatasetParams {
    fn default() -> Self {
        Self {
            seed: 42,
            decimals: 1,
            progress_every: 300,
            json_file_name: String::from("bowl_dataset.json"),
            csv_file_name: String::from("bowl_dataset.csv"),
        }
    }
}

impl Dataset {
    /// Resolve every tuple in the parameter space.
    ///
    /// A single random source is seeded from `params.seed` and shared by all
    /// tuples in enumeration order, so the same seed and calibration data
    /// always give the same dataset.
    pub fn generate<S>(resolver: &ParamResolver<S>, params: &DatasetParams) -> Self
    where
        S: CalibrationSource + ?Sized,
    {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut entries = Vec::with_capacity(NUM_TUPLES);
        let mut summary = DatasetSummary::default();

        info!(
            "Generating {} setpoints ({} combinations) with the {:?} formula and seed {}",
            NUM_TUPLES,
            NUM_COMBINATIONS,
            resolver.synth().variant(),
            params.seed
        );

        let progress_tuples = params.progress_every * NUM_POSITIONS;

        for (i, tuple) in all_tuples().enumerate() {
            let (setpoint, report) = resolver.resolve_and_enforce(&tuple, &mut rng);

            summary.record(&report);
            entries.push(Entry { tuple, setpoint });

            if progress_tuples > 0 && (i + 1) % progress_tuples == 0 {
                info!(
                    "Progress: {}/{} combinations processed",
                    (i + 1) / NUM_POSITIONS,
                    NUM_COMBINATIONS
                );
            }
        }

        Self {
            entries,
            summary,
            variant: resolver.synth().variant(),
            seed: params.seed,
        }
    }
}

impl DatasetSummary {
    /// Add a tuple's status report to the summary.
    pub fn record(&mut self, report: &StatusReport) {
        self.num_tuples += 1;
        *self.tier_counts.entry(report.tier).or_insert(0) += 1;
        self.sentinel_fields += report.sentinel_fields as u64;
        self.ambiguous_lookups += report.ambiguous_lookups as u64;

        if report.failsafe.rpm_limited {
            self.rpm_limited += 1;
        }
        if report.failsafe.side_tilt_limited {
            self.side_tilt_limited += 1;
        }
        if report.failsafe.separation_forced {
            self.separations_forced += 1;
        }
    }

    /// Number of tuples resolved by the given tier.
    pub fn count(&self, tier: Tier) -> usize {
        self.tier_counts.get(&tier).copied().unwrap_or(0)
    }

    /// Number of tuples resolved from measured data.
    pub fn num_measured(&self) -> usize {
        self.num_tuples - self.count(Tier::Synthetic)
    }

    /// Log the summary, warning about any data quality issues.
    pub fn log(&self) {
        info!(
            "Resolved {} tuples, {} from measured data",
            self.num_tuples,
            self.num_measured()
        );

        for tier in Tier::ALL.iter() {
            info!("    {:?}: {}", tier, self.count(*tier));
        }

        info!(
            "Failsafe: {} RPM clamps, {} side tilt clamps, {} forced separations",
            self.rpm_limited, self.side_tilt_limited, self.separations_forced
        );

        if self.sentinel_fields > 0 {
            warn!(
                "{} missing calibration readings were replaced by sentinel values",
                self.sentinel_fields
            );
        }
        if self.ambiguous_lookups > 0 {
            warn!(
                "{} calibration lookups matched more than one record, the first was used",
                self.ambiguous_lookups
            );
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
