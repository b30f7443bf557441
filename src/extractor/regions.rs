//! Per-region plane fitting, global planarity testing and refinement.
//!
//! Regions are the connected components of the planarity mask. Each one
//! gets a least-squares plane; a region whose cells all lie close to that
//! plane (and whose cell normals agree with it) is emitted directly,
//! otherwise the RANSAC detector decomposes it into sub-planes. Label
//! bookkeeping during refinement: the first sub-plane keeps the region's
//! label, every further sub-plane mints `highest_label + 1`, and cells no
//! sub-plane claims fall back to background.

use super::params::ExtractorParams;
use crate::angle::{angle_between_unit_vectors_degrees, inclination_degrees};
use crate::elevation::ElevationMap;
use crate::fit::CovarianceAccumulator;
use crate::ransac::PlaneDetector;
use crate::types::{LabeledPlane, PointWithNormal, SegmentedPlanes, TerrainPlane};
use log::debug;
use nalgebra::{Vector2, Vector3};

/// Counters reported by the fitting stage.
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct FitStats {
    /// Labels visited (the pre-refinement region count).
    pub regions_total: usize,
    /// Planes emitted straight from the global fit.
    pub planes_accepted: usize,
    /// Regions skipped for having too few points.
    pub dropped_small: usize,
    /// Regions or sub-planes withheld for exceeding the inclination bound.
    pub dropped_steep: usize,
    /// Regions dropped for failing the global test with refinement off.
    pub dropped_nonplanar: usize,
    /// Regions handed to the RANSAC detector.
    pub refined_regions: usize,
    /// Sub-planes emitted by refinement.
    pub refinement_planes: usize,
    /// Fresh labels minted during refinement.
    pub new_labels: usize,
    /// Cells rewritten to a fresh label.
    pub relabeled_cells: usize,
    /// Cells demoted to background by refinement.
    pub demoted_cells: usize,
}

/// Fits planes for every label present after segmentation.
///
/// The label range is captured up front: labels minted by refinement are
/// final and never re-visited.
pub(super) fn fit_region_planes(
    map: &ElevationMap,
    params: &ExtractorParams,
    normals: &[Vector3<f64>],
    scratch: &mut Vec<PointWithNormal>,
    result: &mut SegmentedPlanes,
) -> FitStats {
    let initial_highest = result.highest_label;
    let mut stats = FitStats::default();
    for label in 1..=initial_highest {
        fit_plane_for_label(map, params, normals, scratch, result, label, &mut stats);
    }
    stats
}

fn fit_plane_for_label(
    map: &ElevationMap,
    params: &ExtractorParams,
    normals: &[Vector3<f64>],
    scratch: &mut Vec<PointWithNormal>,
    result: &mut SegmentedPlanes,
    label: u32,
    stats: &mut FitStats,
) {
    stats.regions_total += 1;

    let mut acc = CovarianceAccumulator::new();
    collect_region_points(map, normals, result, label, scratch, &mut acc);

    let count = acc.count();
    if count < params.min_points_per_label.max(3) {
        stats.dropped_small += 1;
        debug!(
            "PlaneExtractor::fit label {} skipped with {} point(s)",
            label, count
        );
        return;
    }
    let Some(support) = acc.mean() else {
        stats.dropped_small += 1;
        return;
    };
    let normal = acc.fit().normal_or_up();

    if !is_globally_planar(&normal, &support, scratch, params) {
        if params.include_ransac_refinement {
            stats.refined_regions += 1;
            refine_label_with_ransac(map, params, label, scratch, result, stats);
        } else {
            stats.dropped_nonplanar += 1;
            debug!(
                "PlaneExtractor::fit label {} failed the global planarity test, refinement disabled",
                label
            );
        }
        return;
    }

    if inclination_degrees(&normal) < params.plane_inclination_threshold_degrees {
        result.planes.push(LabeledPlane {
            label,
            plane: TerrainPlane::from_support_and_normal(support, normal),
        });
        stats.planes_accepted += 1;
    } else {
        // Too steep for contact planning: the raster keeps the label but no
        // plane is published for it.
        stats.dropped_steep += 1;
    }
}

/// Collects a label's cells as world points paired with their stage-1
/// normals, feeding the covariance on the way. Column-major order fixes
/// the point order handed to the RANSAC detector.
fn collect_region_points(
    map: &ElevationMap,
    normals: &[Vector3<f64>],
    result: &SegmentedPlanes,
    label: u32,
    scratch: &mut Vec<PointWithNormal>,
    acc: &mut CovarianceAccumulator,
) {
    scratch.clear();
    for col in 0..map.cols() {
        for row in 0..map.rows() {
            if result.labels.get(row, col) != label {
                continue;
            }
            let height = map.height(row, col);
            if !height.is_finite() {
                continue;
            }
            let xy = map.cell_position(row, col);
            let point = Vector3::new(xy.x, xy.y, height as f64);
            acc.add(point);
            scratch.push(PointWithNormal {
                point,
                normal: normals[map.idx(row, col)],
            });
        }
    }
}

/// Point-wise global planarity test. Short-circuits on the first cell that
/// sits too far from the plane or whose own normal deviates too much.
fn is_globally_planar(
    normal: &Vector3<f64>,
    support: &Vector3<f64>,
    points: &[PointWithNormal],
    params: &ExtractorParams,
) -> bool {
    let offset = normal.dot(support);
    for sample in points {
        let distance_error = (normal.dot(&sample.point) - offset).abs();
        if distance_error > params.global_plane_fit_distance_error_threshold {
            return false;
        }
        let angle_error = angle_between_unit_vectors_degrees(&sample.normal, normal);
        if angle_error > params.global_plane_fit_angle_error_threshold_degrees {
            return false;
        }
    }
    true
}

/// Decomposes a globally non-planar region into planes via RANSAC and
/// rewrites the raster accordingly.
fn refine_label_with_ransac(
    map: &ElevationMap,
    params: &ExtractorParams,
    label: u32,
    points: &[PointWithNormal],
    result: &mut SegmentedPlanes,
    stats: &mut FitStats,
) {
    // A fresh detector per region resets the seed, keeping reruns and
    // region order independent.
    let detector = PlaneDetector::new(params.ransac.clone());
    let detection = detector.detect_planes(points);
    debug!(
        "PlaneExtractor::refine label {} -> {} plane(s), {} unassigned point(s)",
        label,
        detection.planes.len(),
        detection.unassigned.len()
    );

    let mut reuse_label = true;
    for plane in &detection.planes {
        let plane_label = if reuse_label {
            label
        } else {
            result.highest_label += 1;
            stats.new_labels += 1;
            result.highest_label
        };
        reuse_label = false;

        // Support and normal come from the claimed points only; the
        // detector's own estimate served selection, not publication.
        let mut acc = CovarianceAccumulator::new();
        for &index in &plane.point_indices {
            let point = points[index].point;
            acc.add(point);
            if plane_label != label {
                if let Some((row, col)) =
                    map.world_to_index(&Vector2::new(point.x, point.y))
                {
                    result.labels.set(row, col, plane_label);
                    stats.relabeled_cells += 1;
                }
            }
        }
        let Some(support) = acc.mean() else {
            continue;
        };
        let normal = acc.fit().normal_or_up();
        if inclination_degrees(&normal) < params.plane_inclination_threshold_degrees {
            result.planes.push(LabeledPlane {
                label: plane_label,
                plane: TerrainPlane::from_support_and_normal(support, normal),
            });
            stats.refinement_planes += 1;
        } else {
            stats.dropped_steep += 1;
        }
    }

    for &index in &detection.unassigned {
        let point = points[index].point;
        if let Some((row, col)) = map.world_to_index(&Vector2::new(point.x, point.y)) {
            result.labels.set(row, col, 0);
            stats.demoted_cells += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::LabelGrid;

    fn flat_points(count: usize, z: f64) -> Vec<PointWithNormal> {
        (0..count)
            .map(|i| PointWithNormal {
                point: Vector3::new((i % 5) as f64 * 0.1, (i / 5) as f64 * 0.1, z),
                normal: Vector3::z(),
            })
            .collect()
    }

    #[test]
    fn globally_planar_accepts_flat_region() {
        let points = flat_points(20, 0.3);
        let params = ExtractorParams::default();
        assert!(is_globally_planar(
            &Vector3::z(),
            &Vector3::new(0.0, 0.0, 0.3),
            &points,
            &params
        ));
    }

    #[test]
    fn global_test_rejects_distant_point() {
        let mut points = flat_points(20, 0.3);
        points[7].point.z += 0.1;
        let params = ExtractorParams::default();
        assert!(!is_globally_planar(
            &Vector3::z(),
            &Vector3::new(0.0, 0.0, 0.3),
            &points,
            &params
        ));
    }

    #[test]
    fn global_test_rejects_deviating_normal() {
        let mut points = flat_points(20, 0.3);
        // On-plane point whose own normal disagrees with the region fit.
        points[3].normal = Vector3::new(1.0, 0.0, 1.0).normalize();
        let params = ExtractorParams::default();
        assert!(!is_globally_planar(
            &Vector3::z(),
            &Vector3::new(0.0, 0.0, 0.3),
            &points,
            &params
        ));
    }

    #[test]
    fn region_collection_is_column_major() {
        let map = ElevationMap::from_fn(
            3,
            3,
            0.1,
            Vector2::new(0.0, 0.0),
            |row, col| (row * 3 + col) as f32,
        );
        let normals = vec![Vector3::z(); map.len()];
        let mut labels = LabelGrid::new(3, 3);
        labels.set(0, 0, 1);
        labels.set(2, 0, 1);
        labels.set(0, 1, 1);
        let result = SegmentedPlanes {
            resolution: 0.1,
            map_origin: Vector2::new(0.0, 0.0),
            highest_label: 1,
            labels,
            planes: Vec::new(),
        };
        let mut scratch = Vec::new();
        let mut acc = CovarianceAccumulator::new();
        collect_region_points(&map, &normals, &result, 1, &mut scratch, &mut acc);
        let heights: Vec<f32> = scratch.iter().map(|p| p.point.z as f32).collect();
        // Column 0 first (rows 0 then 2), then column 1.
        assert_eq!(heights, vec![0.0, 6.0, 1.0]);
        assert_eq!(acc.count(), 3);
    }
}
