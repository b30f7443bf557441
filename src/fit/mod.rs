//! Least-squares plane fitting from running point statistics.
//!
//! Both the sliding-window stage and the per-region stage reduce their
//! points to a count, a sum and a sum of outer products, then derive the
//! plane from the eigendecomposition of the covariance matrix. The
//! smallest-eigenvalue eigenvector is the surface normal; the square root
//! of the smallest eigenvalue is the RMS point-to-plane distance.

pub mod orientation;

pub use orientation::orientation_world_to_terrain;

use nalgebra::{Matrix3, SymmetricEigen, Vector3};
use std::cmp::Ordering;

/// Error reported for windows where no plane is defined. Large enough to
/// fail any reasonable planarity threshold.
pub const DEGENERATE_FIT_ERROR: f64 = 1e30;

/// Second-smallest eigenvalue at or below this bound means the points are
/// (numerically) collinear and span no unique plane.
const RANK_DEFICIENCY_EPS: f64 = 1e-8;

/// Result of a covariance plane fit.
#[derive(Clone, Debug, PartialEq)]
pub enum FitOutcome {
    /// A well-defined plane: unit normal with non-negative z component and
    /// the RMS distance of the points to the plane.
    Plane {
        normal: Vector3<f64>,
        rms_error: f64,
    },
    /// Fewer than three points, or points without a unique plane.
    Degenerate,
}

impl FitOutcome {
    /// The fitted normal, or the world vertical for degenerate fits.
    #[inline]
    pub fn normal_or_up(&self) -> Vector3<f64> {
        match self {
            FitOutcome::Plane { normal, .. } => *normal,
            FitOutcome::Degenerate => Vector3::z(),
        }
    }

    /// The RMS plane-fit error, or [`DEGENERATE_FIT_ERROR`] for degenerate
    /// fits so threshold comparisons reject them without a special case.
    #[inline]
    pub fn rms_error(&self) -> f64 {
        match self {
            FitOutcome::Plane { rms_error, .. } => *rms_error,
            FitOutcome::Degenerate => DEGENERATE_FIT_ERROR,
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, FitOutcome::Degenerate)
    }
}

/// Running first- and second-order statistics of a 3D point set.
///
/// Accumulating sums instead of storing points keeps the window stage
/// allocation-free; the covariance follows as `sumSq/n - mean·meanᵀ`.
#[derive(Clone, Debug)]
pub struct CovarianceAccumulator {
    count: usize,
    sum: Vector3<f64>,
    sum_squared: Matrix3<f64>,
}

impl CovarianceAccumulator {
    pub fn new() -> Self {
        Self {
            count: 0,
            sum: Vector3::zeros(),
            sum_squared: Matrix3::zeros(),
        }
    }

    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Vector3<f64>>,
    {
        let mut acc = Self::new();
        for point in points {
            acc.add(*point);
        }
        acc
    }

    #[inline]
    pub fn add(&mut self, point: Vector3<f64>) {
        self.count += 1;
        self.sum += point;
        self.sum_squared += point * point.transpose();
    }

    pub fn clear(&mut self) {
        self.count = 0;
        self.sum = Vector3::zeros();
        self.sum_squared = Matrix3::zeros();
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Centroid of the accumulated points, `None` while empty.
    pub fn mean(&self) -> Option<Vector3<f64>> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// Fits a plane to the accumulated points. Fewer than three points are
    /// degenerate by definition.
    pub fn fit(&self) -> FitOutcome {
        if self.count < 3 {
            return FitOutcome::Degenerate;
        }
        let mean = self.sum / self.count as f64;
        normal_and_error_from_covariance(self.count, &mean, &self.sum_squared)
    }
}

impl Default for CovarianceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives the plane normal and RMS error from point statistics.
///
/// nalgebra leaves the eigenvalues of [`SymmetricEigen`] unsorted, so the
/// three indices are ordered ascending first. The fit is degenerate when
/// the second-smallest eigenvalue vanishes (points on a line). The normal
/// is flipped to point upward (z ≥ 0); a tiny negative smallest eigenvalue
/// from round-off clamps to zero error.
pub fn normal_and_error_from_covariance(
    count: usize,
    mean: &Vector3<f64>,
    sum_squared: &Matrix3<f64>,
) -> FitOutcome {
    let covariance = sum_squared / count as f64 - mean * mean.transpose();
    let eigen = SymmetricEigen::new(covariance);

    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| {
        eigen.eigenvalues[a]
            .partial_cmp(&eigen.eigenvalues[b])
            .unwrap_or(Ordering::Equal)
    });

    if eigen.eigenvalues[order[1]] <= RANK_DEFICIENCY_EPS {
        return FitOutcome::Degenerate;
    }

    let mut normal = eigen.eigenvectors.column(order[0]).into_owned();
    if normal.z < 0.0 {
        normal = -normal;
    }
    let smallest = eigen.eigenvalues[order[0]];
    let rms_error = if smallest > 0.0 { smallest.sqrt() } else { 0.0 };
    FitOutcome::Plane { normal, rms_error }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_on_plane(a: f64, b: f64, c: f64) -> Vec<Vector3<f64>> {
        // z = a·x + b·y + c sampled on a 5×5 grid.
        let mut points = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                let x = i as f64 * 0.1;
                let y = j as f64 * 0.1;
                points.push(Vector3::new(x, y, a * x + b * y + c));
            }
        }
        points
    }

    #[test]
    fn horizontal_plane_has_vertical_normal_and_zero_error() {
        let acc = CovarianceAccumulator::from_points(&grid_on_plane(0.0, 0.0, 1.5));
        let fit = acc.fit();
        let normal = fit.normal_or_up();
        assert!((normal - Vector3::z()).norm() < 1e-6);
        assert!(fit.rms_error() < 1e-6);
    }

    #[test]
    fn tilted_plane_normal_matches_analytic() {
        let (a, b) = (0.5, -0.25);
        let acc = CovarianceAccumulator::from_points(&grid_on_plane(a, b, 0.3));
        let fit = acc.fit();
        let expected = Vector3::new(-a, -b, 1.0).normalize();
        let normal = fit.normal_or_up();
        assert!(
            normal.dot(&expected) > 1.0 - 1e-9,
            "normal {normal:?} vs expected {expected:?}"
        );
        assert!(fit.rms_error() < 1e-6);
        assert!(normal.z > 0.0);
    }

    #[test]
    fn fewer_than_three_points_is_degenerate() {
        let mut acc = CovarianceAccumulator::new();
        acc.add(Vector3::new(0.0, 0.0, 0.0));
        acc.add(Vector3::new(1.0, 0.0, 0.0));
        let fit = acc.fit();
        assert!(fit.is_degenerate());
        assert_eq!(fit.rms_error(), DEGENERATE_FIT_ERROR);
        assert_eq!(fit.normal_or_up(), Vector3::z());
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let points: Vec<_> = (0..10)
            .map(|i| Vector3::new(i as f64 * 0.2, i as f64 * 0.1, 0.7))
            .collect();
        let acc = CovarianceAccumulator::from_points(&points);
        assert!(acc.fit().is_degenerate());
    }

    #[test]
    fn noisy_plane_reports_residual_error() {
        let mut points = grid_on_plane(0.1, 0.0, 0.0);
        // Push alternate points off the plane by ±0.02 along z.
        for (i, p) in points.iter_mut().enumerate() {
            p.z += if i % 2 == 0 { 0.02 } else { -0.02 };
        }
        let acc = CovarianceAccumulator::from_points(&points);
        let fit = acc.fit();
        assert!(!fit.is_degenerate());
        let err = fit.rms_error();
        assert!(err > 1e-3, "error {err} should reflect the perturbation");
        assert!(err < 0.05, "error {err} should stay near the noise scale");
    }

    #[test]
    fn mean_tracks_centroid() {
        let mut acc = CovarianceAccumulator::new();
        assert!(acc.mean().is_none());
        acc.add(Vector3::new(1.0, 2.0, 3.0));
        acc.add(Vector3::new(3.0, 2.0, 1.0));
        let mean = acc.mean().unwrap();
        assert!((mean - Vector3::new(2.0, 2.0, 2.0)).norm() < 1e-12);
        acc.clear();
        assert_eq!(acc.count(), 0);
        assert!(acc.mean().is_none());
    }
}
