//! Serialised point-set layout.
//!
//! A point set is copied verbatim into memory shared with compute lanes:
//!
//! ```text
//! [num_points: u32][dimension: u32][generating vector: s x i32][normalised vector: s x T]
//! ```
//!
//! contiguous, native byte order, no padding. The normalised vector is
//! carried as computed on the host so that lanes reading a copy see
//! bit-identical values.

use std::io::Cursor;

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use super::rule::{serialised_size, LatticeRule};
use crate::types::{QmcError, QmcFloat, Result};

/// Size of the fixed header in bytes.
pub const HEADER_BYTES: usize = 8;

impl<T: QmcFloat> LatticeRule<T> {
    /// Serialises the point set into its contiguous layout.
    ///
    /// The returned buffer has exactly [`LatticeRule::byte_size`] bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use qmc_core::lattice::LatticeRule;
    ///
    /// let rule: LatticeRule<f32> = LatticeRule::new(64, 3, &[1, 27, 15]).unwrap();
    /// let bytes = rule.to_bytes();
    /// assert_eq!(bytes.len(), rule.byte_size());
    /// assert_eq!(&bytes[0..4], &64u32.to_ne_bytes());
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.byte_size());
        // Writing into a Vec cannot fail.
        let _ = self.write_layout(&mut buf);
        buf
    }

    fn write_layout(&self, buf: &mut Vec<u8>) -> std::io::Result<()> {
        buf.write_u32::<NativeEndian>(self.num_points)?;
        buf.write_u32::<NativeEndian>(self.dimension)?;
        for &g in &self.generating_vector {
            buf.write_i32::<NativeEndian>(g)?;
        }
        for &u in &self.normalised {
            u.write_ne(buf)?;
        }
        Ok(())
    }

    /// Reads a point set back from its serialised layout.
    ///
    /// The normalised vector is taken from the buffer as is, not recomputed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the buffer is too short for its header, its
    /// length disagrees with the declared dimension, or a header field is zero.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_BYTES {
            return Err(QmcError::invalid_value(format!(
                "LatticeRule::from_bytes(): {} bytes is shorter than the header",
                bytes.len()
            )));
        }

        let mut cursor = Cursor::new(bytes);
        let num_points = cursor.read_u32::<NativeEndian>()?;
        let dimension = cursor.read_u32::<NativeEndian>()?;

        if num_points == 0 || dimension == 0 {
            return Err(QmcError::invalid_value(
                "LatticeRule::from_bytes(): header declares an empty point set",
            ));
        }
        let expected = serialised_size::<T>(dimension);
        if bytes.len() != expected {
            return Err(QmcError::invalid_value(format!(
                "LatticeRule::from_bytes(): expected {} bytes for dimension {} ({} precision), got {}",
                expected,
                dimension,
                T::NAME,
                bytes.len()
            )));
        }

        let s = dimension as usize;
        let generating_vector = (0..s)
            .map(|_| cursor.read_i32::<NativeEndian>())
            .collect::<std::io::Result<Vec<_>>>()?;
        let normalised = (0..s)
            .map(|_| T::read_ne(&mut cursor))
            .collect::<std::io::Result<Vec<_>>>()?;

        Ok(Self {
            num_points,
            dimension,
            generating_vector,
            normalised,
        })
    }
}
