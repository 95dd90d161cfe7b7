//! # Bowling machine interface crate.
//!
//! Provides the types shared between the setpoint generator and anything
//! consuming its output (the machine driver, model training scripts).

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Aim positions and their fixed target coordinates
pub mod geometry;

/// Control tuples and the discrete parameter space
pub mod tuple;

/// Actuator setpoints produced for each control tuple
pub mod setpoint;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use geometry::{Position, PositionCoordinate};
pub use setpoint::Setpoint;
pub use tuple::ControlTuple;
