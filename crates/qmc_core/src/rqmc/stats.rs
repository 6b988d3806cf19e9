//! Sample statistics over replication estimates.

use crate::types::{QmcError, QmcFloat, Result};

/// Sample mean and unbiased sample variance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleStats<T> {
    /// Arithmetic mean of the sample.
    pub mean: T,
    /// Unbiased sample variance; `None` for a single observation.
    pub variance: Option<T>,
}

/// Computes the mean and sample variance of `values`.
///
/// Sums are accumulated in `f64` for both precisions:
/// `mean = sum / n` and `variance = (sum_of_squares - mean * sum) / (n - 1)`.
///
/// # Errors
///
/// Returns `InvalidValue` for an empty sample.
///
/// # Examples
///
/// ```rust
/// use qmc_core::rqmc::compute_stats;
///
/// let stats = compute_stats(&[1.0_f64, 2.0, 3.0]).unwrap();
/// assert_eq!(stats.mean, 2.0);
/// assert_eq!(stats.variance, Some(1.0));
///
/// assert_eq!(compute_stats(&[5.0_f32]).unwrap().variance, None);
/// ```
pub fn compute_stats<T: QmcFloat>(values: &[T]) -> Result<SampleStats<T>> {
    if values.is_empty() {
        return Err(QmcError::invalid_value("compute_stats(): empty sample"));
    }

    let (sum, sum_squares) = values.iter().fold((0.0_f64, 0.0_f64), |(s, sq), &v| {
        let v = v.widen();
        (s + v, sq + v * v)
    });
    let n = values.len() as f64;
    let mean = sum / n;
    let variance = if values.len() > 1 {
        Some(T::narrow((sum_squares - mean * sum) / (n - 1.0)))
    } else {
        None
    };

    Ok(SampleStats {
        mean: T::narrow(mean),
        variance,
    })
}

/// Averages each of `replications` contiguous blocks of `block_size` values.
///
/// `values[r * block_size + b]` is output `b` of replication `r`; the result
/// holds one estimate per replication.
///
/// # Errors
///
/// Returns `InvalidValue` if either count is zero or `values` does not hold
/// exactly `replications * block_size` elements.
///
/// # Examples
///
/// ```rust
/// use qmc_core::rqmc::reduce_replications;
///
/// let estimates = reduce_replications(2, 3, &[1.0_f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
/// assert_eq!(estimates, vec![2.0, 5.0]);
/// ```
pub fn reduce_replications<T: QmcFloat>(
    replications: u32,
    block_size: u32,
    values: &[T],
) -> Result<Vec<T>> {
    if replications == 0 || block_size == 0 {
        return Err(QmcError::invalid_value(format!(
            "reduce_replications(): replications ({}) and block size ({}) must be positive",
            replications, block_size
        )));
    }
    let expected = replications as usize * block_size as usize;
    if values.len() != expected {
        return Err(QmcError::invalid_value(format!(
            "reduce_replications(): expected {} values, got {}",
            expected,
            values.len()
        )));
    }

    let b = block_size as f64;
    Ok(values
        .chunks_exact(block_size as usize)
        .map(|block| T::narrow(block.iter().map(|v| v.widen()).sum::<f64>() / b))
        .collect())
}
