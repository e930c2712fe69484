//! Host platform utility functions

use std::path::PathBuf;

/// The environment variable pointing at the root of the software checkout.
///
/// Parameter files and session directories are resolved relative to this.
pub const SW_ROOT_ENV_VAR: &str = "MOTION_SW_ROOT";

/// Get the software root directory from the environment.
pub fn get_sw_root() -> Result<PathBuf, std::env::VarError> {
    std::env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
