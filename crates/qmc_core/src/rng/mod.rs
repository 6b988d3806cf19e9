//! # Coordinate Sources
//!
//! Integrands in this crate pull coordinates one at a time from a
//! [`CoordinateSource`]. Two sources exist:
//!
//! - [`LatticeStream`](crate::lattice::LatticeStream): deterministic
//!   (optionally shifted) rank-1 lattice points
//! - [`UniformStream`]: seeded pseudo-random points, for plain Monte Carlo
//!
//! Swapping one for the other turns a QMC estimator into an MC estimator with
//! no change to the integrand.
//!
//! The module also draws the random shifts used for randomised QMC.
//!
//! ## Usage Example
//!
//! ```rust
//! use qmc_core::rng::{CoordinateSource, UniformStream};
//!
//! let mut stream: UniformStream<f64> = UniformStream::from_seed(12345, 2);
//!
//! let x = stream.next_coordinate().unwrap();
//! let y = stream.next_coordinate().unwrap();
//! assert!(stream.next_coordinate().is_none());
//! assert!((0.0..1.0).contains(&x) && (0.0..1.0).contains(&y));
//!
//! stream.forward_to_next_point();
//! assert!(stream.next_coordinate().is_some());
//! ```

mod shifts;
mod source;
mod uniform;

pub use shifts::random_shifts;
pub use source::CoordinateSource;
pub use uniform::UniformStream;
