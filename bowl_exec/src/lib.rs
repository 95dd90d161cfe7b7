//! # Bowling machine library.
//!
//! This library allows other crates in the workspace, and the benchmarks, to access items defined
//! inside the bowling machine crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Calibration store - measured setpoints loaded from the calibration sheets
pub mod calib_store;

/// Dataset generation - resolves the whole parameter space and writes it out
pub mod dataset;

/// Failsafe enforcer - keeps setpoints inside the hardware limits
pub mod failsafe;

/// Executable parameters
pub mod params;

/// Parameter resolver - turns control tuples into setpoints
pub mod resolver;

/// Synthetic formula engine - estimates setpoints where nothing was measured
pub mod synth;
