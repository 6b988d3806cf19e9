//! Test integrand with a known mean.

use crate::rng::CoordinateSource;
use crate::types::QmcFloat;

/// Evaluates `f(u) = prod_j 3 * u_j^2` at the current point of `source`,
/// then moves the source to its next point.
///
/// Every factor integrates to one over `[0, 1)`, so `f` has mean 1 in any
/// dimension.
///
/// # Examples
///
/// ```rust
/// use qmc_core::lattice::{LatticeRule, LatticeStream};
/// use qmc_core::simulation::product_of_squares;
///
/// let rule: LatticeRule<f64> = LatticeRule::new(4, 2, &[1, 1]).unwrap();
/// let mut stream = LatticeStream::over(&rule, 1, 0, None).unwrap();
///
/// assert_eq!(product_of_squares(&mut stream), 0.0);
/// // point 1 is (0.25, 0.25)
/// assert_eq!(product_of_squares(&mut stream), 3.0 * 0.0625 * 3.0 * 0.0625);
/// ```
#[inline]
pub fn product_of_squares<T, S>(source: &mut S) -> T
where
    T: QmcFloat,
    S: CoordinateSource<T>,
{
    let three = T::from_u32(3);
    let mut value = T::one();
    while let Some(u) = source.next_coordinate() {
        value = value * three * u * u;
    }
    source.forward_to_next_point();
    value
}

/// Averages the integrand over the next `count` points of `source`.
///
/// The sum is accumulated in `f64`.
pub fn average_over<T, S>(source: &mut S, count: u32) -> T
where
    T: QmcFloat,
    S: CoordinateSource<T>,
{
    if count == 0 {
        return T::zero();
    }
    let sum: f64 = (0..count).map(|_| product_of_squares(source).widen()).sum();
    T::narrow(sum / f64::from(count))
}
