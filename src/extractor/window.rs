//! Sliding-window surface normal estimation and planarity mask.
//!
//! Every cell with a finite height gets a local plane fitted over its
//! kernel window, clipped at the raster borders. The window gathers
//! offset coordinates rather than world coordinates; the mean subtraction
//! inside the covariance cancels the common origin, and the offsets use
//! the same sign convention as the index→world mapping so window normals
//! stay comparable with region normals.

use super::params::ExtractorParams;
use crate::angle::inclination_degrees;
use crate::elevation::ElevationMap;
use crate::fit::{CovarianceAccumulator, FitOutcome};
use crate::raster::BinaryMask;
use nalgebra::Vector3;

/// Output of the window stage.
pub(super) struct WindowScan {
    pub mask: BinaryMask,
    pub planar_cells: usize,
    pub degenerate_windows: usize,
}

/// Fits a plane to the kernel window centered on (row, col).
///
/// Non-finite and out-of-map neighbors are skipped; windows with fewer
/// than three usable samples come back degenerate.
pub(super) fn window_fit(
    map: &ElevationMap,
    row: usize,
    col: usize,
    kernel_size: usize,
) -> FitOutcome {
    let half = (kernel_size / 2) as isize;
    let resolution = map.resolution();
    let mut acc = CovarianceAccumulator::new();
    for dr in -half..=half {
        let r = row as isize + dr;
        if r < 0 || r >= map.rows() as isize {
            continue;
        }
        for dc in -half..=half {
            let c = col as isize + dc;
            if c < 0 || c >= map.cols() as isize {
                continue;
            }
            let height = map.height(r as usize, c as usize);
            if !height.is_finite() {
                continue;
            }
            acc.add(Vector3::new(
                -(dr as f64) * resolution,
                -(dc as f64) * resolution,
                height as f64,
            ));
        }
    }
    acc.fit()
}

/// Local planarity predicate: window error below the patch threshold and
/// window normal within the inclination threshold. Degenerate fits fail
/// the error check through their sentinel error.
pub(super) fn is_locally_planar(fit: &FitOutcome, params: &ExtractorParams) -> bool {
    fit.rms_error() < params.plane_patch_error_threshold
        && inclination_degrees(&fit.normal_or_up()) < params.plane_inclination_threshold_degrees
}

/// Runs the window stage: fills `normals` (one entry per cell) and builds
/// the planarity mask. Cells without a finite height keep the up normal
/// and stay outside the mask.
pub(super) fn run_window_scan(
    map: &ElevationMap,
    params: &ExtractorParams,
    normals: &mut [Vector3<f64>],
) -> WindowScan {
    let mut mask = BinaryMask::new(map.rows(), map.cols());
    let mut planar_cells = 0usize;
    let mut degenerate_windows = 0usize;
    for row in 0..map.rows() {
        for col in 0..map.cols() {
            if !map.height(row, col).is_finite() {
                continue;
            }
            let fit = window_fit(map, row, col, params.kernel_size);
            if fit.is_degenerate() {
                degenerate_windows += 1;
            }
            normals[map.idx(row, col)] = fit.normal_or_up();
            let planar = is_locally_planar(&fit, params);
            if planar {
                planar_cells += 1;
                mask.set(row, col, true);
            }
        }
    }
    WindowScan {
        mask,
        planar_cells,
        degenerate_windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::DEGENERATE_FIT_ERROR;
    use nalgebra::Vector2;

    fn flat_map(rows: usize, cols: usize, height: f32) -> ElevationMap {
        ElevationMap::from_fn(rows, cols, 0.1, Vector2::new(0.0, 0.0), |_, _| height)
    }

    #[test]
    fn flat_window_is_planar_with_vertical_normal() {
        let map = flat_map(5, 5, 1.0);
        let fit = window_fit(&map, 2, 2, 3);
        assert!(!fit.is_degenerate());
        assert!(fit.rms_error() < 1e-6);
        assert!((fit.normal_or_up() - Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn two_sample_window_is_degenerate_with_sentinel_observables() {
        let mut map = ElevationMap::new(5, 5, 0.1, Vector2::new(0.0, 0.0));
        map.set_height(2, 2, 0.4);
        map.set_height(2, 3, 0.4);
        let fit = window_fit(&map, 2, 2, 3);
        assert!(fit.is_degenerate());
        assert_eq!(fit.rms_error(), DEGENERATE_FIT_ERROR);
        assert_eq!(fit.normal_or_up(), Vector3::z());
    }

    #[test]
    fn border_windows_clip_instead_of_failing() {
        let map = flat_map(4, 4, 0.2);
        // Corner window covers 2×2 = 4 finite cells, enough for a fit.
        let fit = window_fit(&map, 0, 0, 3);
        assert!(!fit.is_degenerate());
        assert!(fit.rms_error() < 1e-6);
    }

    #[test]
    fn tilted_window_normal_matches_slope() {
        // Heights rise along rows; world x falls along rows, so the normal
        // leans toward +x for positive slope in world terms.
        let slope = 0.2;
        let map = ElevationMap::from_fn(7, 7, 0.1, Vector2::new(0.0, 0.0), |row, _| {
            (row as f64 * 0.1 * slope) as f32
        });
        let fit = window_fit(&map, 3, 3, 3);
        let normal = fit.normal_or_up();
        let expected = Vector3::new(slope, 0.0, 1.0).normalize();
        assert!(
            normal.dot(&expected) > 1.0 - 1e-9,
            "normal {normal:?} vs {expected:?}"
        );
    }

    #[test]
    fn scan_masks_steep_and_rough_cells_out() {
        // Left half flat, right half a steep wall.
        let map = ElevationMap::from_fn(6, 8, 0.1, Vector2::new(0.0, 0.0), |_, col| {
            if col < 4 {
                0.0
            } else {
                (col as f32 - 3.0) * 0.3
            }
        });
        let params = ExtractorParams {
            kernel_size: 3,
            plane_patch_error_threshold: 0.01,
            plane_inclination_threshold_degrees: 30.0,
            ..ExtractorParams::default()
        };
        let mut normals = vec![Vector3::z(); map.len()];
        let scan = run_window_scan(&map, &params, &mut normals);
        assert_eq!(scan.degenerate_windows, 0);
        assert!(scan.mask.get(2, 1), "flat interior must stay planar");
        assert!(
            !scan.mask.get(2, 5),
            "wall cells must fail inclination or error"
        );
        assert_eq!(scan.planar_cells, scan.mask.count_true());
    }

    #[test]
    fn nan_cells_keep_default_normal_and_stay_unmasked() {
        let mut map = flat_map(5, 5, 0.0);
        map.set_height(2, 2, f32::NAN);
        let params = ExtractorParams::default();
        let mut normals = vec![Vector3::x(); map.len()];
        let scan = run_window_scan(&map, &params, &mut normals);
        assert!(!scan.mask.get(2, 2));
        // The scan only writes normals for finite cells.
        assert_eq!(normals[map.idx(2, 2)], Vector3::x());
        assert_eq!(scan.planar_cells, 24);
    }
}
