//! Rank-1 lattice point sets.
//!
//! A rank-1 lattice rule with `n` points in dimension `s` is the point set
//!
//! ```text
//! u_i = (i * a mod n) / n,    i = 0, ..., n - 1
//! ```
//!
//! where `a` is the generating vector. [`LatticeRule`] stores `a` verbatim for
//! reporting and precomputes `(a_j mod n) / n` once, so that enumerating a
//! coordinate costs a single multiply and a fractional part.

use std::fmt;
use std::io::Write;

use tracing::debug;

use crate::types::{QmcError, QmcFloat, Result};

/// Immutable rank-1 lattice rule.
///
/// Streams borrow a rule read-only; any number of streams, on any number of
/// threads, may enumerate the same rule concurrently.
///
/// # Type Parameters
///
/// * `T` - Coordinate precision (`f32` or `f64`)
///
/// # Examples
///
/// ```rust
/// use qmc_core::lattice::LatticeRule;
///
/// let rule: LatticeRule<f64> = LatticeRule::new(8, 1, &[3]).unwrap();
/// assert_eq!(rule.num_points(), 8);
/// assert_eq!(rule.normalised_generating_vector(), &[0.375]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct LatticeRule<T: QmcFloat> {
    pub(super) num_points: u32,
    pub(super) dimension: u32,
    pub(super) generating_vector: Vec<i32>,
    pub(super) normalised: Vec<T>,
}

/// Narrow-precision lattice rule.
pub type LatticeRuleF32 = LatticeRule<f32>;

/// Wide-precision lattice rule.
pub type LatticeRuleF64 = LatticeRule<f64>;

impl<T: QmcFloat> LatticeRule<T> {
    /// Creates a rank-1 lattice rule.
    ///
    /// # Arguments
    ///
    /// * `num_points` - Number of points `n > 0`
    /// * `dimension` - Dimension `s > 0`
    /// * `generating_vector` - `s` integers, conceptually in `[1, n - 1]`;
    ///   values outside that range are reduced modulo `n`
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if `n` or `s` is zero, or the vector length differs from `s`
    /// - `OutOfResources` if storage for the vectors cannot be reserved
    pub fn new(num_points: u32, dimension: u32, generating_vector: &[i32]) -> Result<Self> {
        if num_points == 0 {
            return Err(QmcError::invalid_value(
                "LatticeRule::new(): number of points must be positive",
            ));
        }
        if dimension == 0 {
            return Err(QmcError::invalid_value(
                "LatticeRule::new(): dimension must be positive",
            ));
        }
        if generating_vector.len() != dimension as usize {
            return Err(QmcError::invalid_value(format!(
                "LatticeRule::new(): generating vector has {} entries, dimension is {}",
                generating_vector.len(),
                dimension
            )));
        }

        let mut raw = Vec::new();
        raw.try_reserve_exact(generating_vector.len()).map_err(|_| {
            QmcError::out_of_resources("LatticeRule::new(): could not allocate memory for lattice")
        })?;
        raw.extend_from_slice(generating_vector);

        let mut normalised = Vec::new();
        normalised.try_reserve_exact(generating_vector.len()).map_err(|_| {
            QmcError::out_of_resources("LatticeRule::new(): could not allocate memory for lattice")
        })?;

        let mut rule = Self {
            num_points,
            dimension,
            generating_vector: raw,
            normalised,
        };
        rule.normalise();

        debug!(
            num_points,
            dimension,
            precision = T::NAME,
            byte_size = rule.byte_size(),
            "lattice rule created"
        );
        Ok(rule)
    }

    /// Creates a Korobov lattice rule.
    ///
    /// The generating vector is `(1, a, a^2 mod n, ..., a^(s-1) mod n)`.
    ///
    /// # Errors
    ///
    /// - `InvalidValue` if `n` or `s` is zero, or `n` does not fit a signed 32-bit generator
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qmc_core::lattice::LatticeRule;
    ///
    /// let rule: LatticeRule<f64> = LatticeRule::korobov(17, 4, 5).unwrap();
    /// assert_eq!(rule.generating_vector(), &[1, 5, 8, 6]);
    /// ```
    pub fn korobov(num_points: u32, dimension: u32, generator: i32) -> Result<Self> {
        if num_points == 0 || dimension == 0 {
            return Err(QmcError::invalid_value(
                "LatticeRule::korobov(): number of points and dimension must be positive",
            ));
        }
        if num_points > i32::MAX as u32 {
            return Err(QmcError::invalid_value(format!(
                "LatticeRule::korobov(): {} points exceed the generator range",
                num_points
            )));
        }

        let n = i64::from(num_points);
        let a = i64::from(generator).rem_euclid(n);
        let mut vector = Vec::with_capacity(dimension as usize);
        let mut power = 1_i64;
        vector.push(1);
        for _ in 1..dimension {
            power = (power * a) % n;
            // power < n <= i32::MAX
            vector.push(power as i32);
        }

        Self::new(num_points, dimension, &vector)
    }

    /// Recomputes the normalised generating vector from the stored fields.
    ///
    /// The quotient is taken in `f64` and rounded once. Narrow widths round
    /// `(n - 1) / n` up to one for large `n`, so such values are clamped to
    /// the largest value below one.
    fn normalise(&mut self) {
        let n = i64::from(self.num_points);
        let below_one = T::one() - T::epsilon() / (T::one() + T::one());
        self.normalised.clear();
        for &generator in &self.generating_vector {
            // 0 <= residue < n <= u32::MAX
            let residue = i64::from(generator).rem_euclid(n);
            let value = T::narrow(residue as f64 / n as f64);
            self.normalised
                .push(if value >= T::one() { below_one } else { value });
        }
    }

    /// Returns the number of points `n`.
    #[inline]
    pub fn num_points(&self) -> u32 {
        self.num_points
    }

    /// Returns the dimension `s`.
    #[inline]
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Returns the generating vector as supplied.
    #[inline]
    pub fn generating_vector(&self) -> &[i32] {
        &self.generating_vector
    }

    /// Returns `(a_j mod n) / n` for every coordinate, each in `[0, 1)`.
    #[inline]
    pub fn normalised_generating_vector(&self) -> &[T] {
        &self.normalised
    }

    /// Returns the size in bytes of the serialised point set.
    ///
    /// See [`LatticeRule::to_bytes`] for the layout.
    #[inline]
    pub fn byte_size(&self) -> usize {
        serialised_size::<T>(self.dimension)
    }

    /// Writes a one-line description of the rule.
    ///
    /// The format is
    /// `"<s>-dimensional, <n>-point lattice rule with generating vector [ g0, g1, ... ]"`
    /// followed by a newline, using the raw generating vector.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the sink fails.
    pub fn write_info<W: Write>(&self, sink: &mut W) -> Result<()> {
        writeln!(sink, "{}", self)?;
        Ok(())
    }

    /// Releases the point set.
    ///
    /// Equivalent to dropping it; streams cannot outlive the rule they borrow,
    /// so none can be left dangling.
    pub fn destroy(self) {
        debug!(num_points = self.num_points, "lattice rule released");
    }
}

impl<T: QmcFloat> fmt::Display for LatticeRule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-dimensional, {}-point lattice rule with generating vector [ ",
            self.dimension, self.num_points
        )?;
        for (j, generator) in self.generating_vector.iter().enumerate() {
            if j > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", generator)?;
        }
        f.write_str(" ]")
    }
}

/// Size of the serialised layout for a given dimension.
#[inline]
pub(crate) fn serialised_size<T: QmcFloat>(dimension: u32) -> usize {
    8 + dimension as usize * (4 + T::BYTES)
}

/// Writes the description of a possibly absent rule.
///
/// # Errors
///
/// - `InvalidValue` if `rule` is `None`
/// - `Io` if the sink fails
///
/// # Examples
///
/// ```rust
/// use qmc_core::lattice::{write_info, LatticeRule};
///
/// let mut out = Vec::new();
/// assert!(write_info::<f64, _>(None, &mut out).is_err());
/// ```
pub fn write_info<T: QmcFloat, W: Write>(rule: Option<&LatticeRule<T>>, sink: &mut W) -> Result<()> {
    match rule {
        Some(rule) => rule.write_info(sink),
        None => Err(QmcError::invalid_value("write_info(): lattice cannot be absent")),
    }
}

/// Releases a possibly absent rule.
///
/// # Errors
///
/// Returns `InvalidValue` if `rule` is `None`.
pub fn destroy<T: QmcFloat>(rule: Option<LatticeRule<T>>) -> Result<()> {
    match rule {
        Some(rule) => {
            rule.destroy();
            Ok(())
        }
        None => Err(QmcError::invalid_value("destroy(): lattice cannot be absent")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Status;
    use approx::assert_relative_eq;

    // ========================================================================
    // Construction Tests
    // ========================================================================

    #[test]
    fn test_new_stores_fields() {
        let rule: LatticeRule<f64> = LatticeRule::new(8, 1, &[3]).unwrap();
        assert_eq!(rule.num_points(), 8);
        assert_eq!(rule.dimension(), 1);
        assert_eq!(rule.generating_vector(), &[3]);
        assert_eq!(rule.normalised_generating_vector(), &[0.375]);
    }

    #[test]
    fn test_new_rejects_zero_points() {
        let err = LatticeRule::<f64>::new(0, 1, &[1]).unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }

    #[test]
    fn test_new_rejects_zero_dimension() {
        let err = LatticeRule::<f32>::new(8, 0, &[]).unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let err = LatticeRule::<f64>::new(8, 3, &[1, 3]).unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
        assert!(err.to_string().contains("2 entries"));
    }

    // ========================================================================
    // Normalisation Tests
    // ========================================================================

    #[test]
    fn test_negative_generator_is_corrected() {
        let rule: LatticeRule<f64> = LatticeRule::new(8, 2, &[-1, -11]).unwrap();
        assert_relative_eq!(rule.normalised_generating_vector()[0], 7.0 / 8.0);
        assert_relative_eq!(rule.normalised_generating_vector()[1], 5.0 / 8.0);
        // raw vector is kept verbatim
        assert_eq!(rule.generating_vector(), &[-1, -11]);
    }

    #[test]
    fn test_generator_larger_than_n_is_reduced() {
        let rule: LatticeRule<f32> = LatticeRule::new(10, 3, &[13, 10, 0]).unwrap();
        let normed = rule.normalised_generating_vector();
        assert_relative_eq!(normed[0], 0.3_f32, epsilon = 1e-7);
        assert_eq!(normed[1], 0.0);
        assert_eq!(normed[2], 0.0);
    }

    #[test]
    fn test_normalised_in_unit_interval_for_both_precisions() {
        let gens = [1, 201_367, 117_137, -36_487, i32::MAX, i32::MIN];
        let wide: LatticeRule<f64> = LatticeRule::new(1 << 19, 6, &gens).unwrap();
        let narrow: LatticeRule<f32> = LatticeRule::new(1 << 19, 6, &gens).unwrap();

        for &u in wide.normalised_generating_vector() {
            assert!((0.0..1.0).contains(&u), "{} outside [0, 1)", u);
        }
        for &u in narrow.normalised_generating_vector() {
            assert!((0.0..1.0).contains(&u), "{} outside [0, 1)", u);
        }
    }

    #[test]
    fn test_narrow_normalised_stays_below_one_for_large_n() {
        let n = (1u32 << 25) + 1;
        let rule: LatticeRule<f32> = LatticeRule::new(n, 2, &[-1, (n - 1) as i32]).unwrap();
        let below_one = 1.0_f32 - f32::EPSILON / 2.0;

        for &u in rule.normalised_generating_vector() {
            assert!((0.0..1.0).contains(&u), "{} outside [0, 1) for n={}", u, n);
            assert_eq!(u, below_one);
        }

        let wide: LatticeRule<f64> = LatticeRule::new(n, 2, &[-1, (n - 1) as i32]).unwrap();
        for &u in wide.normalised_generating_vector() {
            assert!(u < 1.0);
            assert_relative_eq!(u, f64::from(n - 1) / f64::from(n));
        }
    }

    #[test]
    fn test_narrow_stream_keeps_large_n_coordinate_alive() {
        let n = (1u32 << 25) + 1;
        let rule: LatticeRule<f32> = LatticeRule::new(n, 1, &[-1]).unwrap();
        let mut stream = crate::lattice::LatticeStream::over(&rule, 1, 0, None).unwrap();
        stream.forward_to_next_point();
        assert!(stream.next_coordinate().unwrap() > 0.5);
    }

    #[test]
    fn test_precisions_agree_modulo_rounding() {
        let gens = [1, 182_667, 469_891, 498_753];
        let wide: LatticeRule<f64> = LatticeRule::new(1 << 20, 4, &gens).unwrap();
        let narrow: LatticeRule<f32> = LatticeRule::new(1 << 20, 4, &gens).unwrap();

        for (w, n) in wide
            .normalised_generating_vector()
            .iter()
            .zip(narrow.normalised_generating_vector())
        {
            assert_relative_eq!(*w, f64::from(*n), epsilon = 1e-7);
        }
    }

    // ========================================================================
    // Korobov Tests
    // ========================================================================

    #[test]
    fn test_korobov_powers() {
        let rule: LatticeRule<f64> = LatticeRule::korobov(17, 5, 5).unwrap();
        // 5^2 = 25 = 8 (mod 17), 5^3 = 40 = 6, 5^4 = 30 = 13
        assert_eq!(rule.generating_vector(), &[1, 5, 8, 6, 13]);
    }

    #[test]
    fn test_korobov_negative_generator() {
        let rule: LatticeRule<f64> = LatticeRule::korobov(7, 3, -1).unwrap();
        assert_eq!(rule.generating_vector(), &[1, 6, 1]);
    }

    #[test]
    fn test_korobov_rejects_empty() {
        assert!(LatticeRule::<f64>::korobov(0, 3, 5).is_err());
        assert!(LatticeRule::<f64>::korobov(16, 0, 5).is_err());
    }

    // ========================================================================
    // Reporting and Lifetime Tests
    // ========================================================================

    #[test]
    fn test_write_info_format() {
        let rule: LatticeRule<f64> = LatticeRule::new(64, 3, &[1, 27, 15]).unwrap();
        let mut out = Vec::new();
        rule.write_info(&mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "3-dimensional, 64-point lattice rule with generating vector [ 1, 27, 15 ]\n"
        );
    }

    #[test]
    fn test_write_info_absent_rule() {
        let mut out = Vec::new();
        let err = write_info::<f32, _>(None, &mut out).unwrap_err();
        assert_eq!(err.status(), Status::InvalidValue);
        assert!(out.is_empty());
    }

    #[test]
    fn test_destroy() {
        let rule: LatticeRule<f64> = LatticeRule::new(4, 1, &[1]).unwrap();
        assert!(destroy(Some(rule)).is_ok());
        assert_eq!(
            destroy::<f64>(None).unwrap_err().status(),
            Status::InvalidValue
        );
    }

    #[test]
    fn test_byte_size() {
        let rule: LatticeRule<f64> = LatticeRule::new(8, 3, &[1, 3, 5]).unwrap();
        assert_eq!(rule.byte_size(), 8 + 3 * (4 + 8));

        let rule: LatticeRule<f32> = LatticeRule::new(8, 3, &[1, 3, 5]).unwrap();
        assert_eq!(rule.byte_size(), 8 + 3 * (4 + 4));
    }
}
