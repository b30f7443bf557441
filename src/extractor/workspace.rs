//! Per-run extractor workspace reusing buffers across maps.
//!
//! The extractor keeps the surface-normal field and the region point
//! scratch alive between runs to avoid repeated allocations when
//! processing a stream of elevation maps. Contents are fully rewritten
//! each run; only capacity carries over.

use crate::types::PointWithNormal;
use nalgebra::Vector3;

/// Workspace storing the per-cell normal field and region scratch.
pub struct ExtractorWorkspace {
    /// One entry per map cell, reset to the up vector each run. Cells whose
    /// window fit is degenerate or skipped keep the up default.
    pub(super) surface_normals: Vec<Vector3<f64>>,
    /// Point collection reused by every region of a run.
    pub(super) region_points: Vec<PointWithNormal>,
}

impl ExtractorWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares buffers for a map of `cell_count` cells. Existing capacity
    /// is kept; every normal in range is reset to the up vector.
    pub fn reset(&mut self, cell_count: usize) {
        if self.surface_normals.len() < cell_count {
            self.surface_normals.resize(cell_count, Vector3::z());
        }
        for normal in &mut self.surface_normals[..cell_count] {
            *normal = Vector3::z();
        }
        self.region_points.clear();
    }
}

impl Default for ExtractorWorkspace {
    fn default() -> Self {
        Self {
            surface_normals: Vec::new(),
            region_points: Vec::new(),
        }
    }
}
