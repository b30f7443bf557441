//! Angle utilities used across the extraction pipeline.

use nalgebra::Vector3;

/// Computes the unsigned angle between two unit vectors in degrees.
/// Returns a value in [0, 180]. The dot product is clamped to [-1, 1]
/// so floating-point overshoot near parallel vectors cannot produce NaN.
///
/// Both inputs must already be normalized.
#[inline]
pub fn angle_between_unit_vectors_degrees(a: &Vector3<f64>, b: &Vector3<f64>) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos().to_degrees().abs()
}

/// Computes the inclination of a unit surface normal: its angle to the
/// world vertical, in degrees. Zero for horizontal ground.
#[inline]
pub fn inclination_degrees(normal: &Vector3<f64>) -> f64 {
    angle_between_unit_vectors_degrees(normal, &Vector3::z())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn angle_between_basic() {
        let x = Vector3::x();
        assert!(approx_eq(angle_between_unit_vectors_degrees(&x, &x), 0.0));
        assert!(approx_eq(
            angle_between_unit_vectors_degrees(&x, &-x),
            180.0
        ));
        assert!(approx_eq(
            angle_between_unit_vectors_degrees(&x, &Vector3::y()),
            90.0
        ));
    }

    #[test]
    fn angle_between_clamps_overshoot() {
        // A dot product slightly past 1 must not produce NaN.
        let a = Vector3::new(1.0, 1.0, 1.0).normalize();
        let angle = angle_between_unit_vectors_degrees(&a, &a);
        assert!(angle.is_finite());
        assert!(angle < 1e-5);
    }

    #[test]
    fn inclination_of_tilted_normal() {
        let slope = Vector3::new(1.0, 0.0, 1.0).normalize();
        assert!(approx_eq(inclination_degrees(&slope), 45.0));
        assert!(approx_eq(inclination_degrees(&Vector3::z()), 0.0));
    }
}
