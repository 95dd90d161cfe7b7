//! # Bowling Executable Parameters
//!
//! This module provides parameters for the bowling machine executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{
    calib_store::CalibParams, dataset::DatasetParams, failsafe::Limits, resolver::Sentinels,
    synth::SynthParams,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters loaded from `bowl_exec.toml`. Any section left out of the file
/// takes its default values.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BowlExecParams {
    /// Synthetic formula selection and noise
    pub synth: SynthParams,

    /// Hardware limits enforced by the failsafe
    pub limits: Limits,

    /// Values used for readings missing from calibration records
    pub sentinels: Sentinels,

    /// Calibration sheet locations
    pub calibration: CalibParams,

    /// Dataset generation
    pub dataset: DatasetParams,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
