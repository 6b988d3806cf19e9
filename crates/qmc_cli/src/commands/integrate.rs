//! Integration command implementations
//!
//! Estimates the mean of the 30-dimensional product test integrand with
//! plain Monte Carlo, lattice QMC or randomised lattice QMC.

use std::io::Write;

use qmc_core::dispatch::RayonLauncher;
use qmc_core::lattice::LatticeRule;
use qmc_core::rqmc::RqmcReport;
use qmc_core::simulation::{
    simulate_with_mc, simulate_with_qmc, simulate_with_rqmc, LaneOutputs,
    DEFAULT_GENERATING_VECTOR, DIMENSION,
};
use qmc_core::types::QmcFloat;
use rand::distributions::{Distribution, Standard};
use serde::Serialize;
use tracing::info;

use super::pow2;
use crate::config::{OutputFormat, Precision, RunConfig};
use crate::Result;

/// Integration method and its replication parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Pseudo-random points
    MonteCarlo,
    /// Unshifted lattice
    Qmc,
    /// Independently shifted lattice copies
    Rqmc {
        /// Number of replications
        replications: u32,
        /// Replications handled by each lane
        replications_per_lane: u32,
    },
}

impl Method {
    fn title(&self) -> &'static str {
        match self {
            Method::MonteCarlo => "Monte Carlo integration",
            Method::Qmc => "Quasi-Monte Carlo integration",
            Method::Rqmc { .. } => "Randomised quasi-Monte Carlo integration",
        }
    }

    /// Lanes launched for a run with `partitions` point partitions
    fn launched_lanes(&self, partitions: u32) -> usize {
        match self {
            Method::Rqmc {
                replications,
                replications_per_lane,
            } => (replications / replications_per_lane) as usize * partitions as usize,
            _ => partitions as usize,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Method::MonteCarlo => "mc",
            Method::Qmc => "qmc",
            Method::Rqmc { .. } => "rqmc",
        }
    }
}

#[derive(Serialize)]
struct IntegrationSummary<'a> {
    method: &'static str,
    precision: &'static str,
    points_per_lane: u32,
    lanes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    lattice: Option<String>,
    report: &'a RqmcReport,
}

/// Run an integration command
pub fn run<W: Write>(
    config: &RunConfig,
    method: Method,
    log2_points: u32,
    log2_points_per_lane: u32,
    out: &mut W,
) -> Result<()> {
    let points = pow2(log2_points, "log2-points")?;
    let points_per_lane = pow2(log2_points_per_lane, "log2-points-per-lane")?;
    info!(
        method = method.name(),
        points,
        points_per_lane,
        precision = %config.precision,
        seed = config.seed,
        "starting integration"
    );

    match config.precision {
        Precision::Single => integrate::<f32, _>(config, method, points, points_per_lane, out),
        Precision::Double => integrate::<f64, _>(config, method, points, points_per_lane, out),
    }
}

fn integrate<T, W>(
    config: &RunConfig,
    method: Method,
    points: u32,
    points_per_lane: u32,
    out: &mut W,
) -> Result<()>
where
    T: QmcFloat,
    Standard: Distribution<T>,
    W: Write,
{
    let launcher = RayonLauncher::with_threads(config.lanes)?;

    let (outputs, rule): (LaneOutputs<T>, Option<LatticeRule<T>>) = match method {
        Method::MonteCarlo => {
            let outputs =
                simulate_with_mc(&launcher, points, points_per_lane, DIMENSION, config.seed)?;
            (outputs, None)
        }
        Method::Qmc => {
            let rule = LatticeRule::new(points, DIMENSION, &DEFAULT_GENERATING_VECTOR)?;
            (simulate_with_qmc(&launcher, &rule, points_per_lane)?, Some(rule))
        }
        Method::Rqmc {
            replications,
            replications_per_lane,
        } => {
            let rule = LatticeRule::new(points, DIMENSION, &DEFAULT_GENERATING_VECTOR)?;
            let outputs = simulate_with_rqmc(
                &launcher,
                &rule,
                points_per_lane,
                replications,
                replications_per_lane,
                config.seed,
            )?;
            (outputs, Some(rule))
        }
    };

    let report = outputs.report()?;
    info!(mean = report.mean, variance = ?report.variance, "integration complete");

    match config.format {
        OutputFormat::Table => {
            writeln!(out, "\n{}:\n", method.title())?;
            if let Some(rule) = &rule {
                rule.write_info(out)?;
                writeln!(out)?;
            }
            report.write_to(out)?;
        }
        OutputFormat::Json => {
            let summary = IntegrationSummary {
                method: method.name(),
                precision: T::NAME,
                points_per_lane,
                lanes: method.launched_lanes(outputs.lanes_per_replication),
                lattice: rule.as_ref().map(|r| r.to_string()),
                report: &report,
            };
            serde_json::to_writer_pretty(&mut *out, &summary)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
