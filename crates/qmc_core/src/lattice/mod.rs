//! Rank-1 lattice point sets and their coordinate streams.
//!
//! This module provides:
//! - `rule`: [`LatticeRule`], the immutable point set `{ frac(i * a / n) }`
//! - `layout`: the contiguous byte layout a point set is copied in
//! - `stream`: [`LatticeStream`], a per-partition enumerator over a rule
//!
//! # Precision
//!
//! Every type is generic over [`QmcFloat`](crate::types::QmcFloat); the
//! `F32`/`F64` aliases name the two variants.

mod layout;
mod rule;
mod stream;

pub use layout::HEADER_BYTES;
pub use rule::{destroy, write_info, LatticeRule, LatticeRuleF32, LatticeRuleF64};
pub use stream::{partition_range, LatticeStream, LatticeStreamF32, LatticeStreamF64};
