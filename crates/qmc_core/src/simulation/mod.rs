//! Monte Carlo, QMC and randomised QMC integration kernels.
//!
//! Each kernel launches one body per lane through a [`LaneLauncher`]. A lane
//! owns a private coordinate source, averages the integrand over its share of
//! the points and returns the average; the control thread then arranges the
//! lane outputs into replication-major blocks for [`RqmcReport`].
//!
//! | Kernel                | Source per lane                         | Lanes                   |
//! |-----------------------|-----------------------------------------|-------------------------|
//! | [`simulate_with_mc`]  | seeded [`UniformStream`]                | `n / points_per_lane`   |
//! | [`simulate_with_qmc`] | lattice partition, no shift             | `n / points_per_lane`   |
//! | [`simulate_with_rqmc`]| lattice partition, one shift per block  | `N * R / reps_per_lane` |
//!
//! # Example
//!
//! ```rust
//! use qmc_core::dispatch::RayonLauncher;
//! use qmc_core::lattice::LatticeRule;
//! use qmc_core::simulation::{simulate_with_rqmc, DEFAULT_GENERATING_VECTOR, DIMENSION};
//!
//! let rule: LatticeRule<f64> =
//!     LatticeRule::new(1 << 10, DIMENSION, &DEFAULT_GENERATING_VECTOR).unwrap();
//! let outputs = simulate_with_rqmc(&RayonLauncher::global(), &rule, 1 << 6, 8, 2, 42).unwrap();
//!
//! let report = outputs.report().unwrap();
//! assert_eq!(report.replications, 8);
//! assert!(report.variance.is_some());
//! ```

mod integrand;

pub use integrand::{average_over, product_of_squares};

use rand::distributions::{Distribution, Standard};
use tracing::debug;

use crate::dispatch::LaneLauncher;
use crate::lattice::LatticeRule;
use crate::lattice::LatticeStream;
use crate::rng::{random_shifts, UniformStream};
use crate::rqmc::RqmcReport;
use crate::types::{QmcError, QmcFloat, Result};

/// Dimension of the default integration problem.
pub const DIMENSION: u32 = 30;

/// Generating vector for up to `2^20` points in [`DIMENSION`] dimensions.
pub const DEFAULT_GENERATING_VECTOR: [i32; DIMENSION as usize] = [
    1, 201367, 117137, 36487, 165651, 490691, 77109, 210171, 410853, 356813, 371285, 54177,
    312383, 487121, 29017, 392635, 45723, 454749, 64693, 130185, 288231, 141321, 197541, 499599,
    131691, 385041, 42593, 238365, 279943, 134157,
];

/// Raw lane outputs of one integration run.
///
/// `values` holds `replications` contiguous blocks of `lanes_per_replication`
/// lane averages.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneOutputs<T> {
    /// Number of replications (1 for MC and plain QMC).
    pub replications: u32,
    /// Points per replication.
    pub points: u32,
    /// Lane averages per replication.
    pub lanes_per_replication: u32,
    /// Lane averages, replication-major.
    pub values: Vec<T>,
}

impl<T: QmcFloat> LaneOutputs<T> {
    /// Reduces the outputs into a report.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if the output layout is inconsistent.
    pub fn report(&self) -> Result<RqmcReport> {
        RqmcReport::from_values(
            self.replications,
            self.points,
            self.lanes_per_replication,
            &self.values,
        )
    }
}

fn zeroed_outputs<T: QmcFloat>(len: usize) -> Result<Vec<T>> {
    let mut values = Vec::new();
    values.try_reserve_exact(len).map_err(|_| {
        QmcError::out_of_resources(format!("cannot allocate {} lane outputs", len))
    })?;
    values.resize(len, T::zero());
    Ok(values)
}

fn lanes_for(points: u32, points_per_lane: u32) -> Result<u32> {
    if points == 0 || points_per_lane == 0 || points % points_per_lane != 0 {
        return Err(QmcError::invalid_value(format!(
            "points ({}) must be a positive multiple of points_per_lane ({})",
            points, points_per_lane
        )));
    }
    Ok(points / points_per_lane)
}

/// Plain Monte Carlo: each lane averages `points_per_lane` pseudo-random points.
///
/// # Arguments
///
/// * `launcher` - Lane launch service
/// * `points` - Total number of points `n`
/// * `points_per_lane` - Points averaged by each lane; must divide `n`
/// * `dimension` - Dimension of each point
/// * `seed` - Run seed; lane `g` draws from a stream derived from it
///
/// # Errors
///
/// Returns `InvalidValue` if `points` is zero or `points_per_lane` does not
/// divide it.
pub fn simulate_with_mc<T, L>(
    launcher: &L,
    points: u32,
    points_per_lane: u32,
    dimension: u32,
    seed: u64,
) -> Result<LaneOutputs<T>>
where
    T: QmcFloat,
    Standard: Distribution<T>,
    L: LaneLauncher,
{
    let lanes = lanes_for(points, points_per_lane)?;
    debug!(lanes, points_per_lane, dimension, seed, "launching Monte Carlo lanes");

    let values = launcher.launch(lanes as usize, |gid| {
        let mut stream = UniformStream::<T>::for_lane(seed, gid, dimension);
        Ok(average_over(&mut stream, points_per_lane))
    })?;

    Ok(LaneOutputs {
        replications: 1,
        points,
        lanes_per_replication: lanes,
        values,
    })
}

/// Quasi-Monte Carlo: lane `g` averages partition `g` of the lattice.
///
/// # Errors
///
/// Returns `InvalidValue` if `points_per_lane` does not divide the number of
/// lattice points.
pub fn simulate_with_qmc<T, L>(
    launcher: &L,
    rule: &LatticeRule<T>,
    points_per_lane: u32,
) -> Result<LaneOutputs<T>>
where
    T: QmcFloat,
    L: LaneLauncher,
{
    let points = rule.num_points();
    let lanes = lanes_for(points, points_per_lane)?;
    debug!(lanes, points_per_lane, "launching QMC lanes");

    let values = launcher.launch(lanes as usize, |gid| {
        let mut stream = LatticeStream::over(rule, lanes, gid as u32, None)?;
        Ok(average_over(&mut stream, points_per_lane))
    })?;

    Ok(LaneOutputs {
        replications: 1,
        points,
        lanes_per_replication: lanes,
        values,
    })
}

/// Randomised QMC over `replications` independently shifted copies of the
/// lattice.
///
/// With `N = n / points_per_lane` point partitions, lane `gid` handles point
/// partition `gid % N` for the `replications_per_lane` replications of block
/// `gid / N`, re-attaching its stream to each replication's shift in turn.
/// Output `j` of replication `k` lands at `values[k * N + j]`.
///
/// Shifts are drawn from `seed`.
///
/// # Errors
///
/// - `InvalidValue` if `points_per_lane` does not divide the number of
///   lattice points, or `replications_per_lane` does not divide
///   `replications`
/// - `OutOfResources` if the shift or output buffers cannot be allocated
pub fn simulate_with_rqmc<T, L>(
    launcher: &L,
    rule: &LatticeRule<T>,
    points_per_lane: u32,
    replications: u32,
    replications_per_lane: u32,
    seed: u64,
) -> Result<LaneOutputs<T>>
where
    T: QmcFloat,
    Standard: Distribution<T>,
    L: LaneLauncher,
{
    let points = rule.num_points();
    let partitions = lanes_for(points, points_per_lane)?;
    if replications == 0
        || replications_per_lane == 0
        || replications % replications_per_lane != 0
    {
        return Err(QmcError::invalid_value(format!(
            "replications ({}) must be a positive multiple of replications_per_lane ({})",
            replications, replications_per_lane
        )));
    }

    let s = rule.dimension() as usize;
    let n = partitions as usize;
    let mut values = zeroed_outputs::<T>(replications as usize * n)?;
    let shifts: Vec<T> = random_shifts(seed, replications, rule.dimension())?;
    let blocks = replications / replications_per_lane;
    let lanes = blocks as usize * partitions as usize;
    debug!(
        lanes,
        partitions,
        replications,
        replications_per_lane,
        "launching RQMC lanes"
    );

    let per_lane = launcher.launch(lanes, |gid| {
        let block = (gid / partitions as usize) as u32;
        let part = (gid % partitions as usize) as u32;
        let first = block * replications_per_lane;

        let mut stream = LatticeStream::over(rule, partitions, part, None)?;
        let mut averages = Vec::with_capacity(replications_per_lane as usize);
        for k in first..first + replications_per_lane {
            let shift = &shifts[k as usize * s..(k as usize + 1) * s];
            stream.reattach(rule, partitions, part, Some(shift))?;
            averages.push(average_over(&mut stream, points_per_lane));
        }
        Ok(averages)
    })?;

    for (gid, averages) in per_lane.into_iter().enumerate() {
        let first = (gid / n) * replications_per_lane as usize;
        let part = gid % n;
        for (offset, value) in averages.into_iter().enumerate() {
            values[(first + offset) * n + part] = value;
        }
    }

    Ok(LaneOutputs {
        replications,
        points,
        lanes_per_replication: partitions,
        values,
    })
}
