//! Terrain frame construction from a fitted surface normal.

use nalgebra::{Matrix3, Vector3};

/// Builds the world→terrain rotation for a unit surface normal.
///
/// The rows of the returned matrix are the terrain axes expressed in world
/// coordinates: row 2 is the normal itself, row 0 is the world x axis
/// projected onto the plane (world y substitutes when the normal is
/// parallel to world x), row 1 completes the right-handed frame. Applying
/// the matrix to the normal yields `(0, 0, 1)`.
pub fn orientation_world_to_terrain(surface_normal: &Vector3<f64>) -> Matrix3<f64> {
    let z_axis = surface_normal.normalize();

    let mut x_axis = Vector3::x() - z_axis.x * z_axis;
    if x_axis.norm_squared() < 1e-12 {
        x_axis = Vector3::y() - z_axis.y * z_axis;
    }
    let x_axis = x_axis.normalize();
    let y_axis = z_axis.cross(&x_axis);

    Matrix3::from_rows(&[x_axis.transpose(), y_axis.transpose(), z_axis.transpose()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rotation(rotation: &Matrix3<f64>) {
        let identity = rotation * rotation.transpose();
        assert!((identity - Matrix3::identity()).norm() < 1e-9, "not orthonormal");
        assert!((rotation.determinant() - 1.0).abs() < 1e-9, "not right-handed");
    }

    #[test]
    fn vertical_normal_maps_to_identity() {
        let rotation = orientation_world_to_terrain(&Vector3::z());
        assert!((rotation - Matrix3::identity()).norm() < 1e-12);
    }

    #[test]
    fn normal_maps_to_terrain_up() {
        let normal = Vector3::new(0.3, -0.2, 0.93).normalize();
        let rotation = orientation_world_to_terrain(&normal);
        assert_rotation(&rotation);
        let up = rotation * normal;
        assert!((up - Vector3::z()).norm() < 1e-9, "rotated normal {up:?}");
    }

    #[test]
    fn normal_along_world_x_uses_fallback_axis() {
        let rotation = orientation_world_to_terrain(&Vector3::x());
        assert_rotation(&rotation);
        let up = rotation * Vector3::x();
        assert!((up - Vector3::z()).norm() < 1e-9);
    }

    #[test]
    fn rows_are_terrain_axes() {
        let normal = Vector3::new(0.1, 0.1, 1.0).normalize();
        let rotation = orientation_world_to_terrain(&normal);
        let x_axis = rotation.row(0).transpose();
        // The terrain x axis stays in the plane and keeps a world-x heading.
        assert!(x_axis.dot(&normal).abs() < 1e-12);
        assert!(x_axis.x > 0.9);
    }
}
