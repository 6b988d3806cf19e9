//! Random shifts for randomised QMC.

use rand::distributions::{Distribution, Standard};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::{QmcError, QmcFloat, Result};

/// Draws `replications` independent shift vectors of `dimension` uniforms.
///
/// The result is laid out replication-major: shift `r` occupies
/// `[r * dimension, (r + 1) * dimension)`.
///
/// # Errors
///
/// Returns `OutOfResources` if the buffer cannot be allocated.
///
/// # Examples
///
/// ```rust
/// use qmc_core::rng::random_shifts;
///
/// let shifts: Vec<f64> = random_shifts(42, 4, 3).unwrap();
/// assert_eq!(shifts.len(), 12);
/// assert!(shifts.iter().all(|u| (0.0..1.0).contains(u)));
/// ```
pub fn random_shifts<T>(seed: u64, replications: u32, dimension: u32) -> Result<Vec<T>>
where
    T: QmcFloat,
    Standard: Distribution<T>,
{
    let len = replications as usize * dimension as usize;
    let mut shifts = Vec::new();
    shifts.try_reserve_exact(len).map_err(|_| {
        QmcError::out_of_resources(format!("cannot allocate {} shift values", len))
    })?;

    let mut rng = StdRng::seed_from_u64(seed);
    shifts.extend((0..len).map(|_| rng.gen::<T>()));
    debug!(seed, replications, dimension, "drew random shifts");
    Ok(shifts)
}
