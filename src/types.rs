use crate::fit::orientation_world_to_terrain;
use crate::raster::LabelGrid;
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// World-space sample paired with the surface normal estimated at its cell.
#[derive(Clone, Copy, Debug)]
pub struct PointWithNormal {
    pub point: Vector3<f64>,
    pub normal: Vector3<f64>,
}

/// Planar terrain patch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainPlane {
    /// A point on the plane (the region centroid).
    pub support: Vector3<f64>,
    /// World→terrain rotation; row 2 is the surface normal.
    pub orientation: Matrix3<f64>,
}

impl TerrainPlane {
    pub fn from_support_and_normal(support: Vector3<f64>, normal: Vector3<f64>) -> Self {
        Self {
            support,
            orientation: orientation_world_to_terrain(&normal),
        }
    }

    /// Unit surface normal (z ≥ 0 by construction).
    #[inline]
    pub fn surface_normal(&self) -> Vector3<f64> {
        self.orientation.row(2).transpose()
    }

    /// Signed distance of a world point to the plane, positive along the normal.
    #[inline]
    pub fn signed_distance(&self, point: &Vector3<f64>) -> f64 {
        self.surface_normal().dot(&(point - self.support))
    }
}

/// A region plane together with the raster label it describes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledPlane {
    pub label: u32,
    pub plane: TerrainPlane,
}

/// Result of a segmentation run.
///
/// `labels` assigns every cell of the input map to background (0) or to a
/// planar region; `planes` carries at most one descriptor per label. A
/// label may appear in the raster without a plane entry (region judged too
/// steep), but never the other way around. `highest_label` bounds every
/// label in the raster and in `planes`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SegmentedPlanes {
    /// Cell edge length of the segmented map, in world units.
    pub resolution: f64,
    /// World position of cell (0, 0) of the segmented map.
    pub map_origin: Vector2<f64>,
    /// Highest label in use; 0 when nothing was segmented.
    pub highest_label: u32,
    pub labels: LabelGrid,
    pub planes: Vec<LabeledPlane>,
}

impl SegmentedPlanes {
    /// Plane descriptor for a label, if the region produced one.
    pub fn plane_for_label(&self, label: u32) -> Option<&TerrainPlane> {
        self.planes
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| &entry.plane)
    }
}
