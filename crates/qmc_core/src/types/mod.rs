//! Shared error and precision types.
//!
//! This module provides:
//! - `error`: Status taxonomy and the `QmcError` value returned by every fallible operation
//! - `precision`: The `QmcFloat` trait implemented by `f32` and `f64`
//!
//! # Re-exports
//!
//! - [`QmcError`], [`Status`], [`Result`] from `error`
//! - [`QmcFloat`] from `precision`

pub mod error;
pub mod precision;

pub use error::{QmcError, Result, Status};
pub use precision::QmcFloat;
