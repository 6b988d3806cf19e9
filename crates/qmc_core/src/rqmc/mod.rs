//! Randomised QMC reduction and reporting.
//!
//! An RQMC run produces `R` replications, each a full pass of the lattice
//! under its own random shift. The per-lane outputs of one replication are
//! averaged into a single estimate ([`reduce_replications`]); the mean of the
//! `R` estimates is the RQMC estimator and their sample variance
//! ([`compute_stats`]) estimates its error.
//!
//! # Example
//!
//! ```rust
//! use qmc_core::rqmc::RqmcReport;
//!
//! // 2 replications of 4 lane averages each
//! let values = [1.0_f64, 1.0, 1.0, 1.0, 3.0, 3.0, 3.0, 3.0];
//! let report = RqmcReport::from_values(2, 1024, 4, &values).unwrap();
//!
//! assert_eq!(report.mean, 2.0);
//! assert_eq!(report.variance, Some(2.0));
//! ```

mod format;
mod report;
mod stats;

pub use format::format_general;
pub use report::{report, RqmcReport};
pub use stats::{compute_stats, reduce_replications, SampleStats};
