//! CLI command implementations
//!
//! Each submodule implements a specific CLI command.

pub mod info;
pub mod integrate;
pub mod points;

use crate::{CliError, Result};

/// Converts a base-2 logarithm argument into a count
pub fn pow2(log2: u32, name: &str) -> Result<u32> {
    1u32.checked_shl(log2).ok_or_else(|| {
        CliError::InvalidArgument(format!("{} must be below 32, got {}", name, log2))
    })
}
