//! Lane launch service.
//!
//! A launch runs the same body for every lane index in `[0, lane_count)`
//! and returns once all lanes have finished. Lanes share read-only inputs
//! (point set, shifts) captured by the body; each lane produces exactly one
//! output slot, so no lane writes memory another lane can see.
//!
//! There is no ordering guarantee between lanes. Results are returned in
//! lane order whatever order the lanes ran in.
//!
//! # Example
//!
//! ```rust
//! use qmc_core::dispatch::{LaneLauncher, RayonLauncher, SerialLauncher};
//!
//! let body = |lane: usize| Ok(lane * lane);
//! let serial = SerialLauncher.launch(8, body).unwrap();
//! let parallel = RayonLauncher::global().launch(8, body).unwrap();
//! assert_eq!(serial, parallel);
//! assert_eq!(serial[3], 9);
//! ```

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::types::{QmcError, Result};

/// Executes a per-lane body over a range of lane indices.
///
/// # Errors
///
/// A launch fails as a whole if any lane fails. The error of one failing
/// lane is returned; no per-lane status is reported.
pub trait LaneLauncher {
    /// Runs `body(lane)` for every lane and collects the outputs in lane order.
    fn launch<R, F>(&self, lane_count: usize, body: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> Result<R> + Sync + Send;
}

/// Runs lanes one after another on the calling thread.
///
/// When several lanes fail, the lowest-indexed failure is reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialLauncher;

impl LaneLauncher for SerialLauncher {
    fn launch<R, F>(&self, lane_count: usize, body: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> Result<R> + Sync + Send,
    {
        let out = (0..lane_count).map(body).collect::<Result<Vec<R>>>()?;
        trace!(lane_count, "serial launch complete");
        Ok(out)
    }
}

/// Runs lanes on a rayon thread pool.
///
/// Uses the global pool unless built with an explicit worker count.
#[derive(Clone, Debug, Default)]
pub struct RayonLauncher {
    pool: Option<Arc<ThreadPool>>,
}

impl RayonLauncher {
    /// Launcher on rayon's global pool.
    pub fn global() -> Self {
        Self { pool: None }
    }

    /// Launcher on a dedicated pool of `threads` workers.
    ///
    /// `threads == 0` selects the global pool.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnvironment` if the pool cannot be started.
    pub fn with_threads(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Ok(Self::global());
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("qmc-lane-{}", i))
            .build()
            .map_err(|e| QmcError::InvalidEnvironment(format!("cannot start thread pool: {}", e)))?;
        debug!(threads, "started dedicated lane pool");
        Ok(Self {
            pool: Some(Arc::new(pool)),
        })
    }

    /// Number of worker threads lanes are spread across.
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

impl LaneLauncher for RayonLauncher {
    fn launch<R, F>(&self, lane_count: usize, body: F) -> Result<Vec<R>>
    where
        R: Send,
        F: Fn(usize) -> Result<R> + Sync + Send,
    {
        let run = || {
            (0..lane_count)
                .into_par_iter()
                .map(&body)
                .collect::<Result<Vec<R>>>()
        };
        let out = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }?;
        trace!(lane_count, threads = self.threads(), "parallel launch complete");
        Ok(out)
    }
}
