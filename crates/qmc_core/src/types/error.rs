//! Error types for structured error handling.
//!
//! This module provides:
//! - `Status`: The status-code taxonomy shared by every fallible operation
//! - `QmcError`: A returned error value carrying a status and a diagnostic
//!
//! Every diagnostic travels with the error that produced it. There is no
//! process-wide "last error" buffer, so errors can be raised from any number
//! of lanes concurrently.

use std::fmt;
use thiserror::Error;

/// Status codes reported by point-set, stream and reduction operations.
///
/// # Variants
/// - `Success`: Operation completed
/// - `OutOfResources`: Allocation or capacity failure
/// - `InvalidValue`: An argument violated a precondition
/// - `InvalidEnvironment`: The runtime environment is unusable
/// - `NotImplemented`: The requested feature is not available
///
/// # Examples
/// ```
/// use qmc_core::types::Status;
///
/// assert_eq!(Status::InvalidValue.description(), "invalid value");
/// assert!(Status::Success.is_success());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Operation completed successfully
    Success,

    /// Memory or another resource could not be obtained
    OutOfResources,

    /// An argument was outside its valid domain
    InvalidValue,

    /// The environment (files, variables, devices) is not usable
    InvalidEnvironment,

    /// Feature not implemented
    NotImplemented,
}

impl Status {
    /// Returns the short human-readable description of the status.
    pub fn description(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::OutOfResources => "out of resources",
            Status::InvalidValue => "invalid value",
            Status::InvalidEnvironment => "invalid environment",
            Status::NotImplemented => "not implemented",
        }
    }

    /// Returns `true` for [`Status::Success`].
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Errors raised by lattice, stream, launch and reduction operations.
///
/// The rendered message has the form `"[<status>] <detail>"`.
///
/// # Examples
/// ```
/// use qmc_core::types::{QmcError, Status};
///
/// let err = QmcError::invalid_value("partIndex >= partCount");
/// assert_eq!(err.status(), Status::InvalidValue);
/// assert_eq!(format!("{}", err), "[invalid value] partIndex >= partCount");
/// ```
#[derive(Error, Debug)]
pub enum QmcError {
    /// Allocation or capacity failure.
    #[error("[out of resources] {0}")]
    OutOfResources(String),

    /// Precondition violated by an argument.
    #[error("[invalid value] {0}")]
    InvalidValue(String),

    /// Unusable runtime environment.
    #[error("[invalid environment] {0}")]
    InvalidEnvironment(String),

    /// Feature not implemented.
    #[error("[not implemented] {0}")]
    NotImplemented(String),

    /// I/O failure while writing diagnostics or reports.
    #[error("[invalid environment] I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QmcError {
    /// Creates an `InvalidValue` error.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        QmcError::InvalidValue(msg.into())
    }

    /// Creates an `OutOfResources` error.
    pub fn out_of_resources(msg: impl Into<String>) -> Self {
        QmcError::OutOfResources(msg.into())
    }

    /// Returns the status code carried by this error.
    pub fn status(&self) -> Status {
        match self {
            QmcError::OutOfResources(_) => Status::OutOfResources,
            QmcError::InvalidValue(_) => Status::InvalidValue,
            QmcError::InvalidEnvironment(_) | QmcError::Io(_) => Status::InvalidEnvironment,
            QmcError::NotImplemented(_) => Status::NotImplemented,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QmcError>;
