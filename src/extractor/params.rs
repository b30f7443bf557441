//! Parameter types configuring the extraction stages.
//!
//! This module groups knobs for the sliding-window planarity test, the
//! mask morphology, connected-component segmentation and the per-region
//! plane fitting with optional RANSAC refinement.
//!
//! Defaults target legged-locomotion elevation maps at centimeter
//! resolution. For tuning, start with the window thresholds; they decide
//! how much terrain survives into segmentation.

use crate::ransac::RansacParams;
use crate::raster::Connectivity;
use serde::{Deserialize, Serialize};

/// Extractor-wide parameters controlling the staged pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorParams {
    /// Sliding-window side length in cells (odd, >= 3).
    pub kernel_size: usize,
    /// Maximum RMS plane-fit error for a locally planar window (world units).
    pub plane_patch_error_threshold: f64,
    /// Maximum angle between a fitted normal and the world vertical before
    /// a window or region counts as too steep (degrees).
    pub plane_inclination_threshold_degrees: f64,
    /// Radius of the cross-shaped erosion applied to the planarity mask;
    /// 0 disables erosion.
    pub erosion_radius: usize,
    /// Pixel adjacency used by connected-component labeling.
    pub connectivity: Connectivity,
    /// Minimum number of cells a region needs to be fitted at all.
    pub min_points_per_label: usize,
    /// Enables RANSAC decomposition of regions that fail the global
    /// planarity test. When disabled, such regions keep their labels but
    /// produce no plane.
    pub include_ransac_refinement: bool,
    /// Maximum |signed distance| of any region cell to the fitted plane
    /// before the region counts as globally non-planar (world units).
    pub global_plane_fit_distance_error_threshold: f64,
    /// Maximum deviation of any cell normal from the fitted region normal
    /// before the region counts as globally non-planar (degrees).
    pub global_plane_fit_angle_error_threshold_degrees: f64,
    /// Parameters forwarded to the RANSAC plane detector.
    pub ransac: RansacParams,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            kernel_size: 3,
            plane_patch_error_threshold: 0.02,
            plane_inclination_threshold_degrees: 30.0,
            erosion_radius: 0,
            connectivity: Connectivity::Four,
            min_points_per_label: 4,
            include_ransac_refinement: true,
            global_plane_fit_distance_error_threshold: 0.025,
            global_plane_fit_angle_error_threshold_degrees: 25.0,
            ransac: RansacParams::default(),
        }
    }
}
