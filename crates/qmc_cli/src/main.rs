//! latqmc - Lattice Quasi-Monte Carlo Drivers
//!
//! Command-line front end for `qmc_core`.
//!
//! # Commands
//!
//! - `latqmc info` - Describe a lattice rule
//! - `latqmc points` - Enumerate a small lattice, one lane per point
//! - `latqmc mc <log2-points> <log2-points-per-lane>` - Monte Carlo integration
//! - `latqmc qmc <log2-points> <log2-points-per-lane>` - Lattice QMC integration
//! - `latqmc rqmc <log2-points> <log2-points-per-lane> <replications> <replications-per-lane>`
//!   - Randomised QMC integration
//!
//! # Configuration
//!
//! Settings are resolved CLI > environment (`LATQMC_*`) > TOML file > defaults.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use qmc_core::simulation::DIMENSION;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;

use commands::integrate::Method;
use config::{build_config, CliArgs as ConfigCliArgs};
pub use error::{CliError, Result};

/// Lattice quasi-Monte Carlo integration drivers
#[derive(Parser, Debug)]
#[command(name = "latqmc")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Configuration file path (TOML format)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Floating-point precision (single, double)
    #[arg(short, long, global = true)]
    precision: Option<String>,

    /// Worker threads for lane launches (0 = one per core)
    #[arg(short, long, global = true)]
    lanes: Option<usize>,

    /// Seed for random shifts and Monte Carlo streams
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Output format (table, json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe a lattice rule
    Info {
        /// Base-2 logarithm of the number of points
        #[arg(long, default_value_t = 10)]
        log2_points: u32,

        /// Dimension of the rule
        #[arg(short, long, default_value_t = DIMENSION)]
        dimension: u32,

        /// Build a Korobov rule with this generator instead of the default vector
        #[arg(short, long, allow_negative_numbers = true)]
        korobov: Option<i32>,
    },

    /// Enumerate every point of a small lattice, one lane per point
    Points {
        /// Number of points (and lanes)
        #[arg(short, long, default_value_t = 64)]
        num_points: u32,

        /// Comma-separated generating vector
        #[arg(
            short,
            long,
            value_delimiter = ',',
            allow_negative_numbers = true,
            default_values_t = [1, 27, 15]
        )]
        generating_vector: Vec<i32>,
    },

    /// Monte Carlo integration of the test integrand
    Mc {
        /// Base-2 logarithm of the number of points
        log2_points: u32,
        /// Base-2 logarithm of the points averaged by each lane
        log2_points_per_lane: u32,
    },

    /// Lattice QMC integration of the test integrand
    Qmc {
        /// Base-2 logarithm of the number of points
        log2_points: u32,
        /// Base-2 logarithm of the points averaged by each lane
        log2_points_per_lane: u32,
    },

    /// Randomised lattice QMC integration of the test integrand
    Rqmc {
        /// Base-2 logarithm of the number of points
        log2_points: u32,
        /// Base-2 logarithm of the points averaged by each lane
        log2_points_per_lane: u32,
        /// Number of independent random shifts
        replications: u32,
        /// Replications handled by each lane
        replications_per_lane: u32,
    },
}

impl From<&Cli> for ConfigCliArgs {
    fn from(cli: &Cli) -> Self {
        ConfigCliArgs {
            config_file: cli.config.clone(),
            log_level: cli.log_level.clone(),
            precision: cli.precision.clone(),
            lanes: cli.lanes,
            seed: cli.seed,
            format: cli.format.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&ConfigCliArgs::from(&cli))?;

    init_tracing(config.log_level.as_filter_str());
    info!(
        precision = %config.precision,
        lanes = config.lanes,
        seed = config.seed,
        format = %config.format,
        "configuration loaded"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Info {
            log2_points,
            dimension,
            korobov,
        } => commands::info::run(&config, log2_points, dimension, korobov, &mut out)?,
        Commands::Points {
            num_points,
            generating_vector,
        } => commands::points::run(&config, num_points, &generating_vector, &mut out)?,
        Commands::Mc {
            log2_points,
            log2_points_per_lane,
        } => commands::integrate::run(
            &config,
            Method::MonteCarlo,
            log2_points,
            log2_points_per_lane,
            &mut out,
        )?,
        Commands::Qmc {
            log2_points,
            log2_points_per_lane,
        } => commands::integrate::run(
            &config,
            Method::Qmc,
            log2_points,
            log2_points_per_lane,
            &mut out,
        )?,
        Commands::Rqmc {
            log2_points,
            log2_points_per_lane,
            replications,
            replications_per_lane,
        } => commands::integrate::run(
            &config,
            Method::Rqmc {
                replications,
                replications_per_lane,
            },
            log2_points,
            log2_points_per_lane,
            &mut out,
        )?,
    }

    out.flush()?;
    Ok(())
}
