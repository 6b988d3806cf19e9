//! Points command implementation
//!
//! Enumerates a small lattice with one lane per point. Lanes read a copy of
//! the point set rebuilt from its serialised layout, as a compute device would.

use std::io::Write;

use qmc_core::dispatch::{LaneLauncher, RayonLauncher};
use qmc_core::lattice::{LatticeRule, LatticeStream};
use qmc_core::types::QmcFloat;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{OutputFormat, Precision, RunConfig};
use crate::Result;

#[derive(Serialize)]
struct PointListing<T> {
    lattice: String,
    points: Vec<Vec<T>>,
}

/// Run the points command
pub fn run<W: Write>(
    config: &RunConfig,
    num_points: u32,
    generating_vector: &[i32],
    out: &mut W,
) -> Result<()> {
    info!(num_points, ?generating_vector, "enumerating lattice points");
    let launcher = RayonLauncher::with_threads(config.lanes)?;
    match config.precision {
        Precision::Single => {
            enumerate::<f32, _, _>(&launcher, num_points, generating_vector, config.format, out)
        }
        Precision::Double => {
            enumerate::<f64, _, _>(&launcher, num_points, generating_vector, config.format, out)
        }
    }
}

fn enumerate<T, L, W>(
    launcher: &L,
    num_points: u32,
    generating_vector: &[i32],
    format: OutputFormat,
    out: &mut W,
) -> Result<()>
where
    T: QmcFloat + Serialize,
    L: LaneLauncher,
    W: Write,
{
    let dimension = u32::try_from(generating_vector.len()).unwrap_or(u32::MAX);
    let host = LatticeRule::<T>::new(num_points, dimension, generating_vector)?;
    let buffer = host.to_bytes();
    let device = LatticeRule::<T>::from_bytes(&buffer)?;
    debug!(bytes = buffer.len(), "point set copied through serialised layout");

    // lane gid owns point gid
    let points = launcher.launch(num_points as usize, |gid| {
        let mut stream = LatticeStream::over(&device, num_points, gid as u32, None)?;
        let mut coords = vec![T::zero(); device.dimension() as usize];
        stream.next_point(&mut coords)?;
        Ok(coords)
    })?;

    match format {
        OutputFormat::Table => {
            host.write_info(out)?;
            writeln!(out)?;
            for point in &points {
                for u in point {
                    write!(out, "{:12.5}", u)?;
                }
                writeln!(out)?;
            }
        }
        OutputFormat::Json => {
            let listing = PointListing {
                lattice: host.to_string(),
                points,
            };
            serde_json::to_writer_pretty(&mut *out, &listing)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
