//! Partitioned coordinate streams over a lattice rule.
//!
//! A [`LatticeStream`] enumerates the coordinates of a contiguous partition
//! of a rule's points. Its whole mutable state is two counters; the rule and
//! the optional random shift are borrowed read-only. Constructing a stream
//! never allocates, so the same code runs on a control thread or inside any
//! number of independent compute lanes.
//!
//! # Partitioning
//!
//! With `n` points split into `K` parts (`K` must divide `n`), part `k`
//! covers the point indices `[(n / K) * k, (n / K) * (k + 1))`. The caller
//! enumerates exactly `n / K` points; advancing further is arithmetically
//! defined but leaves the partition.
//!
//! # Example
//!
//! ```rust
//! use qmc_core::lattice::{LatticeRule, LatticeStream};
//!
//! let rule: LatticeRule<f64> = LatticeRule::new(8, 1, &[3]).unwrap();
//! let mut stream = LatticeStream::over(&rule, 2, 1, None).unwrap();
//!
//! assert_eq!(stream.current_point_index(), 4);
//! assert_eq!(stream.next_coordinate(), Some(0.5));
//! assert_eq!(stream.next_coordinate(), None);
//! assert_eq!(stream.forward_to_next_point(), 5);
//! ```

use std::ops::Range;

use super::rule::LatticeRule;
use crate::rng::CoordinateSource;
use crate::types::{QmcError, QmcFloat, Result};

/// Returns the range of point indices assigned to one partition.
///
/// # Errors
///
/// Returns `InvalidValue` if `part_count` is zero, does not divide
/// `num_points`, or `part_index >= part_count`.
///
/// # Examples
///
/// ```rust
/// use qmc_core::lattice::partition_range;
///
/// assert_eq!(partition_range(8, 2, 1).unwrap(), 4..8);
/// assert!(partition_range(8, 3, 0).is_err());
/// ```
pub fn partition_range(num_points: u32, part_count: u32, part_index: u32) -> Result<Range<u32>> {
    if part_count == 0 {
        return Err(QmcError::invalid_value("partCount must be positive"));
    }
    if part_index >= part_count {
        return Err(QmcError::invalid_value(format!(
            "partIndex ({}) >= partCount ({})",
            part_index, part_count
        )));
    }
    if num_points % part_count != 0 {
        return Err(QmcError::invalid_value(format!(
            "number of points ({}) must be a multiple of partCount ({})",
            num_points, part_count
        )));
    }
    let size = num_points / part_count;
    Ok(size * part_index..size * (part_index + 1))
}

/// Enumerator over one partition of a lattice rule.
///
/// # Type Parameters
///
/// * `T` - Coordinate precision, matching the rule
///
/// # Thread Safety
///
/// The stream is `Copy` and holds only shared references, so each lane can
/// own a private stream over a rule shared by all lanes.
#[derive(Clone, Copy, Debug)]
pub struct LatticeStream<'a, T: QmcFloat> {
    rule: &'a LatticeRule<T>,
    shift: Option<&'a [T]>,
    point_index: u32,
    coordinate_index: u32,
}

/// Narrow-precision lattice stream.
pub type LatticeStreamF32<'a> = LatticeStream<'a, f32>;

/// Wide-precision lattice stream.
pub type LatticeStreamF64<'a> = LatticeStream<'a, f64>;

impl<'a, T: QmcFloat> LatticeStream<'a, T> {
    /// Attaches a stream to partition `part_index` of `part_count`.
    ///
    /// Does not allocate. The stream starts at the first point of its
    /// partition, coordinate 0.
    ///
    /// # Arguments
    ///
    /// * `rule` - Point set to enumerate
    /// * `part_count` - Number of equal partitions; must divide the point count
    /// * `part_index` - Partition to enumerate, in `[0, part_count)`
    /// * `shift` - Random shift of at least `dimension` values in `[0, 1)`, or
    ///   `None` for the unrandomised rule
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for an invalid partition or a shift shorter
    /// than the dimension.
    pub fn over(
        rule: &'a LatticeRule<T>,
        part_count: u32,
        part_index: u32,
        shift: Option<&'a [T]>,
    ) -> Result<Self> {
        let start = Self::validate(rule, part_count, part_index, shift)?;
        Ok(Self {
            rule,
            shift,
            point_index: start,
            coordinate_index: 0,
        })
    }

    /// Re-initialises this stream in place over a new partition and shift.
    ///
    /// All arguments are validated before any field is written; on error the
    /// stream is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Same as [`LatticeStream::over`].
    pub fn reattach(
        &mut self,
        rule: &'a LatticeRule<T>,
        part_count: u32,
        part_index: u32,
        shift: Option<&'a [T]>,
    ) -> Result<()> {
        let start = Self::validate(rule, part_count, part_index, shift)?;
        self.rule = rule;
        self.shift = shift;
        self.point_index = start;
        self.coordinate_index = 0;
        Ok(())
    }

    /// Allocating wrapper around [`LatticeStream::over`] for control-thread use.
    ///
    /// # Errors
    ///
    /// Same as [`LatticeStream::over`].
    pub fn create_stream(
        rule: &'a LatticeRule<T>,
        part_count: u32,
        part_index: u32,
        shift: Option<&'a [T]>,
    ) -> Result<Box<Self>> {
        Self::over(rule, part_count, part_index, shift).map(Box::new)
    }

    fn validate(
        rule: &LatticeRule<T>,
        part_count: u32,
        part_index: u32,
        shift: Option<&[T]>,
    ) -> Result<u32> {
        let range = partition_range(rule.num_points(), part_count, part_index)?;
        if let Some(shift) = shift {
            if shift.len() < rule.dimension() as usize {
                return Err(QmcError::invalid_value(format!(
                    "shift has {} values, lattice dimension is {}",
                    shift.len(),
                    rule.dimension()
                )));
            }
        }
        Ok(range.start)
    }

    /// Returns the next coordinate of the current point.
    ///
    /// Yields `frac(a_j / n * i + U_j)` for point `i`, coordinate `j` and
    /// shift `U` (zero when absent), then moves to coordinate `j + 1`.
    /// Returns `None` once all `dimension` coordinates have been produced;
    /// call [`LatticeStream::forward_to_next_point`] to continue.
    #[inline]
    pub fn next_coordinate(&mut self) -> Option<T> {
        if self.coordinate_index >= self.rule.dimension {
            return None;
        }
        let j = self.coordinate_index as usize;
        let offset = match self.shift {
            Some(shift) => shift[j],
            None => T::zero(),
        };
        let value = (self.rule.normalised[j] * T::from_u32(self.point_index) + offset) % T::one();
        self.coordinate_index += 1;
        Some(value)
    }

    /// Returns the next coordinate, or `-1` once the point is exhausted.
    ///
    /// Valid coordinates lie in `[0, 1)`, so `-1` cannot be confused with one.
    #[inline]
    pub fn next_coordinate_or_sentinel(&mut self) -> T {
        self.next_coordinate().unwrap_or_else(|| -T::one())
    }

    /// Writes every coordinate of the current point, then advances.
    ///
    /// Coordinates are produced from coordinate 0 whatever has already been
    /// consumed from the current point.
    ///
    /// # Returns
    ///
    /// The index of the next point.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `coords` is shorter than the dimension; the
    /// stream is not modified.
    pub fn next_point(&mut self, coords: &mut [T]) -> Result<u32> {
        let s = self.rule.dimension as usize;
        if coords.len() < s {
            return Err(QmcError::invalid_value(format!(
                "next_point(): buffer holds {} values, lattice dimension is {}",
                coords.len(),
                s
            )));
        }
        self.coordinate_index = 0;
        for slot in coords.iter_mut().take(s) {
            // coordinate_index < dimension inside this loop
            *slot = self.next_coordinate().unwrap_or_else(T::zero);
        }
        Ok(self.forward_to_next_point())
    }

    /// Moves to coordinate 0 of the next point and returns its index.
    ///
    /// No upper bound is enforced.
    #[inline]
    pub fn forward_to_next_point(&mut self) -> u32 {
        self.coordinate_index = 0;
        self.point_index = self.point_index.wrapping_add(1);
        self.point_index
    }

    /// Returns the index of the current point.
    #[inline]
    pub fn current_point_index(&self) -> u32 {
        self.point_index
    }

    /// Returns the index of the next coordinate to be produced.
    #[inline]
    pub fn current_coord_index(&self) -> u32 {
        self.coordinate_index
    }

    /// Returns the rule being enumerated.
    #[inline]
    pub fn rule(&self) -> &'a LatticeRule<T> {
        self.rule
    }

    /// Returns the attached shift, if any.
    #[inline]
    pub fn shift(&self) -> Option<&'a [T]> {
        self.shift
    }
}

impl<T: QmcFloat> CoordinateSource<T> for LatticeStream<'_, T> {
    #[inline]
    fn next_coordinate(&mut self) -> Option<T> {
        LatticeStream::next_coordinate(self)
    }

    #[inline]
    fn forward_to_next_point(&mut self) {
        LatticeStream::forward_to_next_point(self);
    }
}
