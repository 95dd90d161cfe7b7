//! Host platform utility functions

use std::path::PathBuf;

/// Name of the environment variable pointing at the software root directory.
pub const SW_ROOT_ENV_VAR: &str = "BOWL_SW_ROOT";

/// Get the software root directory from the `BOWL_SW_ROOT` environment
/// variable.
pub fn get_bowl_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
