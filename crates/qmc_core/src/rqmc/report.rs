//! RQMC summary report.

use std::fmt;
use std::io::Write;

#[cfg(feature = "serde")]
use serde::Serialize;

use super::format::format_general;
use super::stats::{compute_stats, reduce_replications};
use crate::types::{QmcFloat, Result};

const COLUMN_WIDTH: usize = 16;
const SIGNIFICANT_DIGITS: usize = 6;

/// Summary of one MC, QMC or RQMC run.
///
/// Renders as a two-line fixed-width table:
///
/// ```text
///     replications          points            mean        variance
///               10           65536        0.999993     1.23456e-09
/// ```
///
/// The variance column is blank for a single replication.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RqmcReport {
    /// Number of independent replications.
    pub replications: u32,
    /// Points per replication.
    pub points: u32,
    /// Mean of the replication estimates.
    pub mean: f64,
    /// Sample variance of the replication estimates, when more than one.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub variance: Option<f64>,
}

impl RqmcReport {
    /// Reduces raw lane outputs into a report.
    ///
    /// # Arguments
    ///
    /// * `replications` - Number of replications `R`
    /// * `points` - Points per replication, for display
    /// * `block_size` - Outputs per replication `B`
    /// * `values` - `R` contiguous blocks of `B` outputs
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `values` does not hold `R * B` elements or
    /// either count is zero.
    pub fn from_values<T: QmcFloat>(
        replications: u32,
        points: u32,
        block_size: u32,
        values: &[T],
    ) -> Result<Self> {
        let estimates = reduce_replications(replications, block_size, values)?;
        let stats = compute_stats(&estimates)?;
        Ok(Self {
            replications,
            points,
            mean: stats.mean.widen(),
            variance: stats.variance.map(|v| v.widen()),
        })
    }

    /// Writes the report table to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if writing fails.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        write!(sink, "{}", self)?;
        Ok(())
    }
}

impl fmt::Display for RqmcReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = COLUMN_WIDTH;
        let variance_header = if self.variance.is_some() { "variance" } else { "" };
        writeln!(
            f,
            "{:>w$}{:>w$}{:>w$}{:>w$}",
            "replications", "points", "mean", variance_header
        )?;
        write!(
            f,
            "{:>w$}{:>w$}{:>w$}",
            self.replications,
            self.points,
            format_general(self.mean, SIGNIFICANT_DIGITS)
        )?;
        if let Some(variance) = self.variance {
            write!(f, "{:>w$}", format_general(variance, SIGNIFICANT_DIGITS))?;
        }
        writeln!(f)
    }
}

/// Reduces `values` and writes the report table to `sink`.
///
/// # Errors
///
/// See [`RqmcReport::from_values`] and [`RqmcReport::write_to`].
pub fn report<T: QmcFloat, W: Write>(
    replications: u32,
    points: u32,
    block_size: u32,
    values: &[T],
    sink: &mut W,
) -> Result<RqmcReport> {
    let summary = RqmcReport::from_values(replications, points, block_size, values)?;
    summary.write_to(sink)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_with_variance() {
        let values = [0.5_f64, 1.5, 1.0, 2.0];
        let mut out = Vec::new();
        let summary = report(2, 64, 2, &values, &mut out).unwrap();

        assert_eq!(summary.mean, 1.25);
        assert_eq!(summary.variance, Some(0.125));
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            format!(
                "{:>16}{:>16}{:>16}{:>16}\n{:>16}{:>16}{:>16}{:>16}\n",
                "replications", "points", "mean", "variance", 2, 64, "1.25", "0.125"
            )
        );
    }

    #[test]
    fn test_table_without_variance() {
        let summary = RqmcReport::from_values(1, 1024, 4, &[1.0_f32; 4]).unwrap();
        assert!(summary.variance.is_none());

        let text = summary.to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap().len(), 64);
        assert_eq!(lines.next().unwrap(), format!("{:>16}{:>16}{:>16}", 1, 1024, 1));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_report_rejects_bad_layout() {
        let mut out = Vec::new();
        assert!(report(3, 64, 2, &[1.0_f64; 5], &mut out).is_err());
        assert!(out.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_serialises() {
        let summary = RqmcReport::from_values(1, 8, 1, &[2.0_f64]).unwrap();
        let json = serde_json::to_string(&summary).unwrap();
        assert_eq!(json, r#"{"replications":1,"points":8,"mean":2.0}"#);
    }
}
