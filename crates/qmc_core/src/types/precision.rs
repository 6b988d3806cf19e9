//! Floating-point widths supported by point sets and streams.
//!
//! Lattice rules exist in a narrow (`f32`) and a wide (`f64`) variant. Both
//! run the same generic code; only rounding differs. [`QmcFloat`] adds the
//! pieces the generic code needs beyond [`num_traits::Float`]: the payload
//! width in the serialised layout and native-endian encoding.

use std::fmt::{Debug, Display};
use std::io::{self, Read, Write};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use num_traits::Float;

/// Floating-point type usable for lattice coordinates.
///
/// # Examples
/// ```
/// use qmc_core::types::QmcFloat;
///
/// fn width<T: QmcFloat>() -> usize {
///     T::BYTES
/// }
///
/// assert_eq!(width::<f32>(), 4);
/// assert_eq!(width::<f64>(), 8);
/// ```
pub trait QmcFloat: Float + Debug + Display + Default + Send + Sync + 'static {
    /// Size in bytes of one value in the serialised layout.
    const BYTES: usize;

    /// Short name of the precision variant.
    const NAME: &'static str;

    /// Writes the value in native byte order.
    fn write_ne<W: Write>(self, sink: &mut W) -> io::Result<()>;

    /// Reads a value in native byte order.
    fn read_ne<R: Read>(source: &mut R) -> io::Result<Self>;

    /// Converts a point index or residue to this width.
    fn from_u32(value: u32) -> Self;

    /// Widens to `f64` for accumulation.
    fn widen(self) -> f64;

    /// Rounds an `f64` accumulator back to this width.
    fn narrow(value: f64) -> Self;
}

impl QmcFloat for f32 {
    const BYTES: usize = 4;
    const NAME: &'static str = "single";

    #[inline]
    fn write_ne<W: Write>(self, sink: &mut W) -> io::Result<()> {
        sink.write_f32::<NativeEndian>(self)
    }

    #[inline]
    fn read_ne<R: Read>(source: &mut R) -> io::Result<Self> {
        source.read_f32::<NativeEndian>()
    }

    #[inline]
    fn from_u32(value: u32) -> Self {
        value as f32
    }

    #[inline]
    fn widen(self) -> f64 {
        self as f64
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value as f32
    }
}

impl QmcFloat for f64 {
    const BYTES: usize = 8;
    const NAME: &'static str = "double";

    #[inline]
    fn write_ne<W: Write>(self, sink: &mut W) -> io::Result<()> {
        sink.write_f64::<NativeEndian>(self)
    }

    #[inline]
    fn read_ne<R: Read>(source: &mut R) -> io::Result<Self> {
        source.read_f64::<NativeEndian>()
    }

    #[inline]
    fn from_u32(value: u32) -> Self {
        value as f64
    }

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value
    }
}
