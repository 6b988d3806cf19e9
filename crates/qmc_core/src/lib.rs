//! # qmc_core: Lattice Quasi-Monte Carlo Points and RQMC Reduction
//!
//! ## Overview
//!
//! qmc_core generates rank-1 lattice point sets for quasi-Monte Carlo
//! integration, enumerates them in independent partitions so that many
//! compute lanes can share one read-only point set, and reduces randomised
//! (shifted) replications into an estimate with an error bar.
//!
//! - Point sets: [`lattice::LatticeRule`] (validation, normalisation,
//!   Korobov rules, serialised layout, info output)
//! - Streams: [`lattice::LatticeStream`] (allocation-free, `Copy`,
//!   optionally shifted)
//! - Reduction: [`rqmc`] (sample statistics, per-replication estimates,
//!   report table)
//! - Errors: [`types::QmcError`] and the [`types::Status`] taxonomy
//!
//! Supporting modules supply a pseudo-random source for plain Monte Carlo
//! ([`rng`]), a lane launch service on rayon ([`dispatch`]) and ready-made
//! integration kernels ([`simulation`]).
//!
//! ## Usage Examples
//!
//! ```rust
//! use qmc_core::lattice::{LatticeRule, LatticeStream};
//! use qmc_core::rqmc::compute_stats;
//!
//! // 1024-point lattice in 3 dimensions
//! let rule: LatticeRule<f64> = LatticeRule::korobov(1024, 3, 75).unwrap();
//!
//! // Lane 2 of 4 enumerates points 512..768
//! let mut stream = LatticeStream::over(&rule, 4, 2, None).unwrap();
//! let mut sums = Vec::new();
//! for _ in 0..256 {
//!     let mut sum = 0.0;
//!     while let Some(u) = stream.next_coordinate() {
//!         assert!((0.0..1.0).contains(&u));
//!         sum += u;
//!     }
//!     sums.push(sum);
//!     stream.forward_to_next_point();
//! }
//! assert_eq!(stream.current_point_index(), 768);
//!
//! let stats = compute_stats(&sums).unwrap();
//! assert!(stats.mean > 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize` for [`rqmc::RqmcReport`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod dispatch;
pub mod lattice;
pub mod rng;
pub mod rqmc;
pub mod simulation;
pub mod types;
