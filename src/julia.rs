use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{LabError, Result};
use crate::math::C;

/// Constant of the canonical Julia set run.
pub const JULIA_C: C = C { re: -0.62772, im: -0.42193 };

/// Sum of escape times for the canonical run (width 1000, 300 iterations).
pub const EXPECTED_SUM: u64 = 33_219_980;
pub const CANONICAL_WIDTH: usize = 1000;
pub const CANONICAL_MAX_ITER: u32 = 300;

/// Upper bound on sample points in one grid (about 1 GiB of `C`).
pub const MAX_POINTS: usize = 1 << 26;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

impl Default for Region {
    fn default() -> Self {
        Region { x1: -1.8, x2: 1.8, y1: -1.8, y2: 1.8 }
    }
}

/// Sample points, row-major, top row first.
#[derive(Clone, Debug)]
pub struct JuliaGrid {
    pub width: usize,
    pub height: usize,
    pub points: Vec<C>,
}

#[derive(Clone, Debug, Serialize)]
pub struct JuliaReport {
    pub desired_width: usize,
    pub max_iter: u32,
    pub width: usize,
    pub height: usize,
    pub points: usize,
    pub sum: u64,
    #[serde(rename = "elapsed_secs", serialize_with = "crate::timing::secs")]
    pub elapsed: Duration,
}

/// Iterations of z <- z^2 + c applied while |z| <= 2, capped at `max_iter`.
pub fn escape_time(z0: C, c: C, max_iter: u32) -> u32 {
    let mut z = z0;
    for i in 0..max_iter {
        if z.abs() > 2.0 { return i; }
        z = z.mul(z).add(c);
    }
    max_iter
}

/// Build the sample grid by stepping from the region's corners.
///
/// Coordinates are accumulated by repeated addition, so rounding can add one
/// extra row or column past `desired_width`.
pub fn calc_complex_numbers(region: Region, desired_width: usize) -> Result<JuliaGrid> {
    check_width(desired_width)?;
    let Region { x1, x2, y1, y2 } = region;
    if ![x1, x2, y1, y2].iter().all(|v| v.is_finite()) || x1 >= x2 || y1 >= y2 {
        return Err(LabError::InvalidArgument(format!("degenerate region {region:?}")));
    }

    let xstep = (x2 - x1) / desired_width as f64;
    let ystep = (y1 - y2) / desired_width as f64;
    // |coord| peaks at the region's edges, so a step that moves both edges moves every point
    if x1 + xstep == x1 || x2 - xstep == x2 || y2 + ystep == y2 || y1 - ystep == y1 {
        return Err(LabError::InvalidArgument(format!(
            "width {desired_width} is too fine for region {region:?}"
        )));
    }

    let mut ys = Vec::with_capacity(desired_width.saturating_add(1));
    let mut ycoord = y2;
    while ycoord > y1 {
        ys.push(ycoord);
        ycoord += ystep;
    }

    let mut xs = Vec::with_capacity(desired_width.saturating_add(1));
    let mut xcoord = x1;
    while xcoord < x2 {
        xs.push(xcoord);
        xcoord += xstep;
    }

    let mut points = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            points.push(C::new(x, y));
        }
    }

    debug!(width = xs.len(), height = ys.len(), "generated julia grid");
    Ok(JuliaGrid { width: xs.len(), height: ys.len(), points })
}

/// Rejects widths whose grid could exceed `MAX_POINTS`.
pub fn check_width(desired_width: usize) -> Result<()> {
    if desired_width == 0 {
        return Err(LabError::InvalidArgument("desired width must be positive".into()));
    }
    let side = desired_width.saturating_add(1);
    match side.checked_mul(side) {
        Some(points) if points <= MAX_POINTS => Ok(()),
        _ => Err(LabError::InvalidArgument(format!(
            "width {desired_width} would exceed {MAX_POINTS} points"
        ))),
    }
}

/// Escape time of every point, in input order.
pub fn calc_z_serial(max_iter: u32, zs: &[C], c: C) -> Vec<u32> {
    zs.iter().map(|&z| escape_time(z, c, max_iter)).collect()
}

pub fn run_julia_set(desired_width: usize, max_iter: u32) -> Result<JuliaReport> {
    if max_iter == 0 {
        return Err(LabError::InvalidArgument("max iterations must be positive".into()));
    }
    info!("generating complex numbers to calculate julia set");
    let grid = calc_complex_numbers(Region::default(), desired_width)?;
    info!(len = grid.points.len(), "length of zs");

    let start = Instant::now();
    let output = calc_z_serial(max_iter, &grid.points, JULIA_C);
    let elapsed = start.elapsed();
    info!(elapsed_secs = elapsed.as_secs_f64(), "calc_z_serial finished");

    Ok(JuliaReport {
        desired_width,
        max_iter,
        width: grid.width,
        height: grid.height,
        points: output.len(),
        sum: output.iter().map(|&n| n as u64).sum(),
        elapsed,
    })
}

pub fn verify_checksum(report: &JuliaReport, expected: u64) -> Result<()> {
    if report.sum != expected {
        return Err(LabError::ChecksumMismatch { expected, actual: report.sum });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_stays_bounded_for_zero_c() {
        assert_eq!(escape_time(C::new(0.0, 0.0), C::new(0.0, 0.0), 300), 300);
    }

    #[test]
    fn far_point_escapes_immediately() {
        assert_eq!(escape_time(C::new(3.0, 0.0), JULIA_C, 300), 0);
    }

    #[test]
    fn boundary_magnitude_two_is_inside() {
        // |2| <= 2 so one step is taken: 2^2 + 0 = 4 escapes next.
        assert_eq!(escape_time(C::new(2.0, 0.0), C::new(0.0, 0.0), 10), 1);
    }

    #[test]
    fn zero_budget_gives_zero() {
        assert_eq!(escape_time(C::new(0.0, 0.0), JULIA_C, 0), 0);
    }

    #[test]
    fn small_grid_has_extra_row_and_column() {
        let grid = calc_complex_numbers(Region::default(), 10).expect("grid");
        assert_eq!((grid.width, grid.height), (11, 11));
        assert_eq!(grid.points.len(), 121);
        assert_eq!(grid.points[0], C::new(-1.8, 1.8));
    }

    #[test]
    fn rows_run_top_to_bottom() {
        let grid = calc_complex_numbers(Region::default(), 100).expect("grid");
        assert_eq!((grid.width, grid.height), (100, 100));
        let first_row = grid.points[0].im;
        let second_row = grid.points[grid.width].im;
        assert!(second_row < first_row);
        assert_eq!(grid.points[1].im, first_row);
        assert!(grid.points[1].re > grid.points[0].re);
    }

    #[test]
    fn rejects_zero_width_and_degenerate_region() {
        assert!(matches!(
            calc_complex_numbers(Region::default(), 0),
            Err(LabError::InvalidArgument(_))
        ));
        let flat = Region { x1: 1.0, x2: 1.0, y1: -1.0, y2: 1.0 };
        assert!(calc_complex_numbers(flat, 10).is_err());
        let nan = Region { x1: f64::NAN, ..Region::default() };
        assert!(calc_complex_numbers(nan, 10).is_err());
    }

    #[test]
    fn huge_widths_rejected_without_allocating() {
        for width in [usize::MAX, 1usize << 40, 8192] {
            assert!(matches!(
                calc_complex_numbers(Region::default(), width),
                Err(LabError::InvalidArgument(_))
            ), "width {width}");
        }
        assert!(check_width(8191).is_ok());
        assert!(check_width(CANONICAL_WIDTH).is_ok());
    }

    #[test]
    fn step_too_small_to_advance_rejected() {
        // ulp at 1e16 is 2, so a 0.04 step leaves the coordinate unchanged
        let far_x = Region { x1: 1e16, x2: 1e16 + 4.0, y1: -1.0, y2: 1.0 };
        let far_y = Region { x1: -1.0, x2: 1.0, y1: 1e16, y2: 1e16 + 4.0 };
        for region in [far_x, far_y] {
            assert!(matches!(
                calc_complex_numbers(region, 100),
                Err(LabError::InvalidArgument(_))
            ), "{region:?}");
        }
        let near = Region { x1: 1e16, x2: 1e16 + 4.0, y1: -1.0, y2: 1.0 };
        let grid = calc_complex_numbers(near, 2).expect("2-wide step advances");
        assert_eq!(grid.width, 2);
    }

    #[test]
    fn serial_kernel_keeps_order() {
        let zs = [C::new(3.0, 0.0), C::new(0.0, 0.0), C::new(2.5, 2.5)];
        let out = calc_z_serial(50, &zs, C::new(0.0, 0.0));
        assert_eq!(out, vec![0, 50, 0]);
    }

    #[test]
    fn reference_sums_for_small_widths() {
        let report = run_julia_set(10, 50).expect("run");
        assert_eq!(report.points, 121);
        assert_eq!(report.sum, 804);

        let report = run_julia_set(100, 300).expect("run");
        assert_eq!(report.points, 10_000);
        assert_eq!(report.sum, 334_236);
        verify_checksum(&report, 334_236).expect("checksum");
    }

    #[test]
    fn checksum_mismatch_reports_both_values() {
        let report = run_julia_set(10, 50).expect("run");
        match verify_checksum(&report, EXPECTED_SUM) {
            Err(LabError::ChecksumMismatch { expected, actual }) => {
                assert_eq!(expected, EXPECTED_SUM);
                assert_eq!(actual, 804);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn zero_iterations_rejected() {
        assert!(run_julia_set(10, 0).is_err());
    }
}
