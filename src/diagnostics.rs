//! Structured run reports produced alongside the segmentation result.
//!
//! Every `process_with_diagnostics` call returns an [`ExtractionReport`]
//! carrying the [`SegmentedPlanes`] plus a [`PipelineTrace`] with per-stage
//! timings and counters. All types serialize to camelCase JSON for the
//! demo tooling.

use crate::raster::Connectivity;
use crate::types::SegmentedPlanes;
use serde::{Deserialize, Serialize};

/// Timing entry describing a single stage of the pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTiming {
    pub label: String,
    pub elapsed_ms: f64,
}

impl StageTiming {
    pub fn new(label: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            label: label.into(),
            elapsed_ms,
        }
    }
}

/// Aggregated timing trace for an extraction run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingBreakdown {
    pub total_ms: f64,
    pub stages: Vec<StageTiming>,
}

impl TimingBreakdown {
    pub fn with_total(total_ms: f64) -> Self {
        Self {
            total_ms,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, elapsed_ms: f64) {
        self.stages.push(StageTiming::new(label, elapsed_ms));
    }
}

/// Shape and validity of the input map.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub rows: usize,
    pub cols: usize,
    pub resolution: f64,
    /// Cells with a finite height.
    pub valid_cells: usize,
}

/// Sliding-window stage: local fits, planarity mask and erosion.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStage {
    pub elapsed_ms: f64,
    pub kernel_size: usize,
    /// Cells that passed the local planarity test before erosion.
    pub planar_cells: usize,
    /// Finite cells whose window had no unique plane.
    pub degenerate_windows: usize,
    pub erosion_radius: usize,
    /// Mask cells cleared by erosion.
    pub eroded_cells: usize,
}

/// Connected-component labeling stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStage {
    pub elapsed_ms: f64,
    pub connectivity: Connectivity,
    /// Component count excluding background.
    pub regions: u32,
}

/// Region fitting and refinement stage.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FittingStage {
    pub elapsed_ms: f64,
    /// Labels visited (pre-refinement region count).
    pub regions_total: usize,
    /// Planes emitted straight from the global fit.
    pub planes_accepted: usize,
    /// Regions skipped for having too few points.
    pub dropped_small: usize,
    /// Regions or sub-planes withheld as too steep.
    pub dropped_steep: usize,
    /// Regions dropped after failing the global test with refinement off.
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

/// Structured trace of one extraction run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub window: Option<WindowStage>,
    pub segmentation: Option<SegmentationStage>,
    pub fitting: Option<FittingStage>,
}

/// Result plus trace returned by `process_with_diagnostics`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionReport {
    pub result: SegmentedPlanes,
    pub trace: PipelineTrace,
}
