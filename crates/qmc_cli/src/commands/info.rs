//! Info command implementation
//!
//! Builds a lattice rule and writes its description.

use std::io::Write;

use qmc_core::lattice::LatticeRule;
use qmc_core::simulation::{DEFAULT_GENERATING_VECTOR, DIMENSION};
use qmc_core::types::QmcFloat;
use serde::Serialize;
use tracing::info;

use super::pow2;
use crate::config::{OutputFormat, Precision, RunConfig};
use crate::{CliError, Result};

#[derive(Serialize)]
struct RuleInfo<'a> {
    num_points: u32,
    dimension: u32,
    precision: &'static str,
    generating_vector: &'a [i32],
    byte_size: usize,
}

/// Run the info command
pub fn run<W: Write>(
    config: &RunConfig,
    log2_points: u32,
    dimension: u32,
    korobov: Option<i32>,
    out: &mut W,
) -> Result<()> {
    let n = pow2(log2_points, "log2-points")?;
    info!(n, dimension, ?korobov, precision = %config.precision, "building lattice rule");

    match config.precision {
        Precision::Single => {
            let rule = build_rule::<f32>(n, dimension, korobov)?;
            describe(&rule, config.format, out)
        }
        Precision::Double => {
            let rule = build_rule::<f64>(n, dimension, korobov)?;
            describe(&rule, config.format, out)
        }
    }
}

/// Korobov rule when a generator is given, else a prefix of the default vector
fn build_rule<T: QmcFloat>(
    n: u32,
    dimension: u32,
    korobov: Option<i32>,
) -> Result<LatticeRule<T>> {
    let rule = match korobov {
        Some(generator) => LatticeRule::korobov(n, dimension, generator)?,
        None => {
            if dimension > DIMENSION {
                return Err(CliError::InvalidArgument(format!(
                    "default generating vector has {} coordinates, {} requested; pass --korobov",
                    DIMENSION, dimension
                )));
            }
            LatticeRule::new(n, dimension, &DEFAULT_GENERATING_VECTOR[..dimension as usize])?
        }
    };
    Ok(rule)
}

fn describe<T: QmcFloat, W: Write>(
    rule: &LatticeRule<T>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            rule.write_info(out)?;
            writeln!(
                out,
                "serialised size: {} bytes ({} precision)",
                rule.byte_size(),
                T::NAME
            )?;
        }
        OutputFormat::Json => {
            let info = RuleInfo {
                num_points: rule.num_points(),
                dimension: rule.dimension(),
                precision: T::NAME,
                generating_vector: rule.generating_vector(),
                byte_size: rule.byte_size(),
            };
            serde_json::to_writer_pretty(&mut *out, &info)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(
        config: &RunConfig,
        log2_points: u32,
        dimension: u32,
        korobov: Option<i32>,
    ) -> Result<String> {
        let mut out = Vec::new();
        run(config, log2_points, dimension, korobov, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_table_output() {
        let text = render(&RunConfig::default(), 10, 3, None).unwrap();
        assert_eq!(
            text,
            "3-dimensional, 1024-point lattice rule with generating vector [ 1, 201367, 117137 ]\n\
             serialised size: 44 bytes (double precision)\n"
        );
    }

    #[test]
    fn test_json_output_korobov() {
        let config = RunConfig {
            format: OutputFormat::Json,
            precision: Precision::Single,
            ..Default::default()
        };
        let text = render(&config, 4, 4, Some(3)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["generating_vector"], serde_json::json!([1, 3, 9, 11]));
        assert_eq!(value["precision"], "single");
        assert_eq!(value["byte_size"], 40);
    }

    #[test]
    fn test_dimension_beyond_default_vector() {
        assert!(render(&RunConfig::default(), 10, 31, None).is_err());
        assert!(render(&RunConfig::default(), 10, 31, Some(5)).is_ok());
    }
}
