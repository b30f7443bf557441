//! Seeded multi-plane RANSAC over points with per-point normals.
//!
//! The detector greedily extracts the plane with the largest consensus
//! set, removes its points, and repeats until too few points remain to
//! form a plane. Sampling is driven by a seeded generator, so detection
//! is deterministic for a given seed and input order.

use crate::fit::CovarianceAccumulator;
use crate::types::PointWithNormal;
use log::debug;
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Parameters of the multi-plane detector.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacParams {
    /// Acceptable probability of missing the largest remaining plane;
    /// drives the adaptive iteration count. Lower means more iterations.
    pub probability: f64,
    /// Minimum number of points a detected plane must claim (effective
    /// minimum is 3, the minimal sample size).
    pub min_points: usize,
    /// Maximum point-to-plane distance for an inlier, in world units.
    pub distance_epsilon: f64,
    /// Maximum deviation between a point normal and the candidate plane
    /// normal, in degrees. Compared direction-agnostically.
    pub normal_threshold_degrees: f64,
    /// Hard iteration budget per extracted plane.
    pub max_iterations: usize,
    /// Seed for the sampling generator.
    pub seed: u64,
}

impl Default for RansacParams {
    fn default() -> Self {
        Self {
            probability: 0.001,
            min_points: 25,
            distance_epsilon: 0.025,
            normal_threshold_degrees: 25.0,
            max_iterations: 1000,
            seed: 0,
        }
    }
}

/// One detected plane and the input indices it claims.
#[derive(Clone, Debug)]
pub struct DetectedPlane {
    /// Centroid of the claimed points.
    pub support: Vector3<f64>,
    /// Unit plane normal with z ≥ 0.
    pub normal: Vector3<f64>,
    /// Indices into the detector input, ascending, never empty.
    pub point_indices: Vec<usize>,
}

/// Detection output: disjoint planes plus everything left unclaimed.
///
/// Every input index appears in exactly one plane's `point_indices` or in
/// `unassigned`; both are sorted ascending.
#[derive(Clone, Debug, Default)]
pub struct RansacDetection {
    pub planes: Vec<DetectedPlane>,
    pub unassigned: Vec<usize>,
}

/// Greedy sequential multi-plane detector.
pub struct PlaneDetector {
    params: RansacParams,
}

impl PlaneDetector {
    pub fn new(params: RansacParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &RansacParams {
        &self.params
    }

    /// Detects zero or more planes among `points`.
    ///
    /// Each round samples minimal triplets, keeps the candidate with the
    /// most inliers (distance and normal-deviation bounded), refits it on
    /// its consensus set and claims the result. Rounds stop once fewer
    /// than `max(min_points, 3)` points remain or no candidate reaches
    /// that size.
    pub fn detect_planes(&self, points: &[PointWithNormal]) -> RansacDetection {
        let min_points = self.params.min_points.max(3);
        let mut rng = StdRng::seed_from_u64(self.params.seed);
        let mut remaining: Vec<usize> = (0..points.len()).collect();
        let mut planes: Vec<DetectedPlane> = Vec::new();
        let mut claimed = vec![false; points.len()];

        while remaining.len() >= min_points {
            let Some(plane) = self.search_plane(points, &remaining, &mut rng) else {
                break;
            };
            claimed.iter_mut().for_each(|c| *c = false);
            for &idx in &plane.point_indices {
                claimed[idx] = true;
            }
            remaining.retain(|&idx| !claimed[idx]);
            debug!(
                "PlaneDetector: plane {} claims {} point(s), {} remaining",
                planes.len(),
                plane.point_indices.len(),
                remaining.len()
            );
            planes.push(plane);
        }

        RansacDetection {
            planes,
            unassigned: remaining,
        }
    }

    /// One detection round over the still-unclaimed points.
    fn search_plane(
        &self,
        points: &[PointWithNormal],
        remaining: &[usize],
        rng: &mut StdRng,
    ) -> Option<DetectedPlane> {
        let n = remaining.len();
        if n < 3 {
            return None;
        }
        let min_points = self.params.min_points.max(3);
        let cos_threshold = self.params.normal_threshold_degrees.to_radians().cos();

        let mut best_support = Vector3::zeros();
        let mut best_normal = Vector3::z();
        let mut best_inliers: Vec<usize> = Vec::new();

        let mut iteration = 0usize;
        let mut iteration_bound = self.params.max_iterations.max(1);
        while iteration < iteration_bound {
            iteration += 1;
            let (s0, s1, s2) = sample_distinct_triplet(rng, n);
            let Some((support, normal)) = plane_from_triplet(
                &points[remaining[s0]].point,
                &points[remaining[s1]].point,
                &points[remaining[s2]].point,
            ) else {
                continue;
            };
            let inliers = collect_inliers(
                points,
                remaining,
                &support,
                &normal,
                self.params.distance_epsilon,
                cos_threshold,
            );
            if inliers.len() > best_inliers.len() {
                best_support = support;
                best_normal = normal;
                best_inliers = inliers;
                iteration_bound = iteration_bound.min(adaptive_iteration_bound(
                    best_inliers.len(),
                    n,
                    self.params.probability,
                    self.params.max_iterations,
                ));
            }
        }

        if best_inliers.len() < min_points {
            return None;
        }

        // Refit on the consensus set and re-collect against the refitted
        // plane; keep whichever set is larger so the result never shrinks
        // below the accepted size.
        let acc =
            CovarianceAccumulator::from_points(best_inliers.iter().map(|&idx| &points[idx].point));
        let refit = acc.fit();
        if let Some(mean) = acc.mean() {
            if !refit.is_degenerate() {
                let refined_normal = refit.normal_or_up();
                let refined = collect_inliers(
                    points,
                    remaining,
                    &mean,
                    &refined_normal,
                    self.params.distance_epsilon,
                    cos_threshold,
                );
                if refined.len() >= best_inliers.len() {
                    return Some(DetectedPlane {
                        support: mean,
                        normal: refined_normal,
                        point_indices: refined,
                    });
                }
            }
        }

        Some(DetectedPlane {
            support: best_support,
            normal: best_normal,
            point_indices: best_inliers,
        })
    }
}

fn sample_distinct_triplet(rng: &mut StdRng, n: usize) -> (usize, usize, usize) {
    let i0 = rng.gen_range(0..n);
    let mut i1 = rng.gen_range(0..n);
    while i1 == i0 {
        i1 = rng.gen_range(0..n);
    }
    let mut i2 = rng.gen_range(0..n);
    while i2 == i0 || i2 == i1 {
        i2 = rng.gen_range(0..n);
    }
    (i0, i1, i2)
}

/// Plane through three points: support and unit normal flipped to z ≥ 0.
/// `None` when the triplet is (near-)collinear.
fn plane_from_triplet(
    a: &Vector3<f64>,
    b: &Vector3<f64>,
    c: &Vector3<f64>,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let cross = (b - a).cross(&(c - a));
    let norm = cross.norm();
    if norm < 1e-12 {
        return None;
    }
    let mut normal = cross / norm;
    if normal.z < 0.0 {
        normal = -normal;
    }
    Some((*a, normal))
}

fn collect_inliers(
    points: &[PointWithNormal],
    remaining: &[usize],
    support: &Vector3<f64>,
    normal: &Vector3<f64>,
    distance_epsilon: f64,
    cos_threshold: f64,
) -> Vec<usize> {
    let offset = normal.dot(support);
    remaining
        .iter()
        .copied()
        .filter(|&idx| {
            let sample = &points[idx];
            (normal.dot(&sample.point) - offset).abs() <= distance_epsilon
                && sample.normal.dot(normal).abs() >= cos_threshold
        })
        .collect()
}

/// Iterations needed to sample an all-inlier triplet with probability
/// `1 - miss_probability`, given the current best consensus fraction.
fn adaptive_iteration_bound(
    inlier_count: usize,
    total: usize,
    miss_probability: f64,
    cap: usize,
) -> usize {
    let w = inlier_count as f64 / total as f64;
    let p_all_inliers = w * w * w;
    if p_all_inliers >= 1.0 {
        return 1;
    }
    if p_all_inliers <= 0.0 {
        return cap.max(1);
    }
    let miss = miss_probability.clamp(1e-9, 0.999);
    let bound = (miss.ln() / (1.0 - p_all_inliers).ln()).ceil();
    if !bound.is_finite() || bound < 1.0 {
        return 1;
    }
    (bound as usize).min(cap.max(1))
}
