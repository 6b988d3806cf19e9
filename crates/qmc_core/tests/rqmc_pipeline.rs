//! End-to-end tests: point set construction, copy through the serialised
//! layout, lane launches and RQMC reporting.

use approx::assert_relative_eq;
use qmc_core::dispatch::{LaneLauncher, RayonLauncher, SerialLauncher};
use qmc_core::lattice::{destroy, write_info, LatticeRule, LatticeStream};
use qmc_core::rng::random_shifts;
use qmc_core::rqmc::{report, RqmcReport};
use qmc_core::simulation::{
    simulate_with_mc, simulate_with_qmc, simulate_with_rqmc, DEFAULT_GENERATING_VECTOR, DIMENSION,
};
use qmc_core::types::Status;

/// Enumerates every point of every lane, writing lane-major coordinates.
fn enumerate_lanes<L: LaneLauncher>(
    launcher: &L,
    rule: &LatticeRule<f32>,
    lanes: u32,
) -> Vec<Vec<f32>> {
    let per_lane = rule.num_points() / lanes;
    launcher
        .launch(lanes as usize, |gid| {
            let mut stream = LatticeStream::over(rule, lanes, gid as u32, None)?;
            let mut coords = vec![0.0; (per_lane * rule.dimension()) as usize];
            for point in coords.chunks_mut(rule.dimension() as usize) {
                stream.next_point(point)?;
            }
            Ok(coords)
        })
        .unwrap()
}

#[test]
fn test_lanes_read_serialised_copy() {
    let host: LatticeRule<f32> = LatticeRule::new(64, 3, &[1, 27, 15]).unwrap();
    let bytes = host.to_bytes();
    assert_eq!(bytes.len(), host.byte_size());

    let device = LatticeRule::<f32>::from_bytes(&bytes).unwrap();
    let from_host = enumerate_lanes(&SerialLauncher, &host, 8);
    let from_device = enumerate_lanes(&RayonLauncher::global(), &device, 8);

    assert_eq!(from_host.len(), 8);
    assert_eq!(from_host, from_device);
    // lane 1 starts at point 8
    assert_relative_eq!(from_device[1][1], (8.0 * 27.0 / 64.0) % 1.0);
}

#[test]
fn test_lanes_partition_the_lattice() {
    let rule: LatticeRule<f32> = LatticeRule::new(64, 3, &[1, 27, 15]).unwrap();
    let split: Vec<f32> = enumerate_lanes(&RayonLauncher::global(), &rule, 16)
        .into_iter()
        .flatten()
        .collect();
    let whole: Vec<f32> = enumerate_lanes(&SerialLauncher, &rule, 1)
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(split, whole);
}

#[test]
fn test_rqmc_report_matches_manual_reduction() {
    let rule: LatticeRule<f64> =
        LatticeRule::new(1 << 10, DIMENSION, &DEFAULT_GENERATING_VECTOR).unwrap();
    let outputs = simulate_with_rqmc(&RayonLauncher::global(), &rule, 1 << 7, 4, 2, 99).unwrap();
    assert_eq!(outputs.lanes_per_replication, 8);

    // one full pass per replication, recomputed serially
    let shifts: Vec<f64> = random_shifts(99, 4, DIMENSION).unwrap();
    let s = DIMENSION as usize;
    let estimates: Vec<f64> = (0..4)
        .map(|k| {
            let shift = &shifts[k * s..(k + 1) * s];
            let mut stream = LatticeStream::over(&rule, 1, 0, Some(shift)).unwrap();
            let mut sum = 0.0;
            for _ in 0..rule.num_points() {
                let mut f = 1.0;
                while let Some(u) = stream.next_coordinate() {
                    f *= 3.0 * u * u;
                }
                stream.forward_to_next_point();
                sum += f;
            }
            sum / f64::from(rule.num_points())
        })
        .collect();

    let summary = outputs.report().unwrap();
    let mean = estimates.iter().sum::<f64>() / 4.0;
    let variance = estimates.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / 3.0;
    assert_relative_eq!(summary.mean, mean, max_relative = 1e-9);
    assert_relative_eq!(summary.variance.unwrap(), variance, max_relative = 1e-6);
}

#[test]
fn test_report_output_format() {
    let mut out = Vec::new();
    let summary = report(1, 1 << 16, 4, &[0.5_f32, 1.0, 1.5, 1.0], &mut out).unwrap();
    assert_eq!(
        summary,
        RqmcReport {
            replications: 1,
            points: 1 << 16,
            mean: 1.0,
            variance: None,
        }
    );
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("    replications          points            mean"));
    assert!(text.ends_with("               1           65536               1\n"));
}

#[test]
fn test_mc_and_qmc_reports_have_one_replication() {
    let rule: LatticeRule<f32> =
        LatticeRule::new(1 << 8, DIMENSION, &DEFAULT_GENERATING_VECTOR).unwrap();

    let qmc = simulate_with_qmc(&SerialLauncher, &rule, 1 << 4).unwrap().report().unwrap();
    let mc = simulate_with_mc::<f32, _>(&SerialLauncher, 1 << 8, 1 << 4, DIMENSION, 5)
        .unwrap()
        .report()
        .unwrap();
    assert!(qmc.variance.is_none());
    assert!(mc.variance.is_none());
    assert_eq!(qmc.points, mc.points);
}

#[test]
fn test_absent_rule_is_invalid_value() {
    let mut sink = Vec::new();
    let err = write_info::<f64, _>(None, &mut sink).unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);
    assert!(sink.is_empty());

    let err = destroy::<f32>(None).unwrap_err();
    assert_eq!(err.status(), Status::InvalidValue);

    let rule: LatticeRule<f32> = LatticeRule::new(4, 1, &[1]).unwrap();
    write_info(Some(&rule), &mut sink).unwrap();
    assert_eq!(
        String::from_utf8(sink).unwrap(),
        "1-dimensional, 4-point lattice rule with generating vector [ 1 ]\n"
    );
    assert!(destroy(Some(rule)).is_ok());
}
