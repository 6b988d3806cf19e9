//! Point-by-point coordinate enumeration.

use crate::types::QmcFloat;

/// A stream of points in the unit hypercube, read one coordinate at a time.
///
/// Implementors yield `dimension` coordinates in `[0, 1)` for the current
/// point and then `None` until [`CoordinateSource::forward_to_next_point`]
/// is called.
///
/// # Examples
///
/// ```rust
/// use qmc_core::rng::CoordinateSource;
/// use qmc_core::types::QmcFloat;
///
/// fn product<T: QmcFloat, S: CoordinateSource<T>>(source: &mut S) -> T {
///     let mut p = T::one();
///     while let Some(u) = source.next_coordinate() {
///         p = p * u;
///     }
///     source.forward_to_next_point();
///     p
/// }
/// ```
pub trait CoordinateSource<T: QmcFloat> {
    /// Returns the next coordinate of the current point, or `None` once the
    /// point is exhausted.
    fn next_coordinate(&mut self) -> Option<T>;

    /// Moves to the first coordinate of the next point.
    fn forward_to_next_point(&mut self);
}
