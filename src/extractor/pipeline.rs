//! Extractor pipeline driving terrain segmentation end-to-end.
//!
//! The [`PlaneExtractor`] exposes a simple API: feed an elevation map and
//! get a label raster plus plane descriptors with detailed diagnostics.
//! Internally it coordinates the sliding-window planarity scan, mask
//! erosion, connected-component labeling, per-region plane fitting and
//! the RANSAC refinement of globally non-planar regions.
//!
//! Typical usage:
//! ```no_run
//! use plane_extractor::elevation::ElevationMap;
//! use plane_extractor::{ExtractorParams, PlaneExtractor};
//!
//! # fn example(map: ElevationMap) {
//! let mut extractor = PlaneExtractor::new(ExtractorParams::default());
//! let report = extractor.process_with_diagnostics(&map);
//! for plane in &report.result.planes {
//!     println!("label {} support {:?}", plane.label, plane.plane.support);
//! }
//! # }
//! ```
use super::params::ExtractorParams;
use super::regions::fit_region_planes;
use super::window::run_window_scan;
use super::workspace::ExtractorWorkspace;
use crate::diagnostics::{
    ExtractionReport, FittingStage, InputDescriptor, PipelineTrace, SegmentationStage,
    TimingBreakdown, WindowStage,
};
use crate::elevation::ElevationMap;
use crate::raster::{erode, label_connected_components, StructuringElement};
use crate::types::SegmentedPlanes;
use log::debug;
use std::time::Instant;

/// Plane extractor orchestrating the window scan, mask morphology,
/// segmentation and region plane fitting.
pub struct PlaneExtractor {
    params: ExtractorParams,
    workspace: ExtractorWorkspace,
}

impl PlaneExtractor {
    /// Create an extractor with the supplied parameters.
    ///
    /// Panics if `kernel_size` is even or below 3.
    pub fn new(params: ExtractorParams) -> Self {
        assert_kernel(params.kernel_size);
        Self {
            params,
            workspace: ExtractorWorkspace::new(),
        }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Replace the parameters for subsequent runs.
    ///
    /// Panics if `kernel_size` is even or below 3.
    pub fn set_params(&mut self, params: ExtractorParams) {
        assert_kernel(params.kernel_size);
        self.params = params;
    }

    /// Run the extractor on an elevation map, returning a compact result.
    pub fn process(&mut self, map: &ElevationMap) -> SegmentedPlanes {
        self.process_with_diagnostics(map).result
    }

    /// Run the extractor and return both the result and a detailed report.
    ///
    /// Panics if the map has no cells.
    pub fn process_with_diagnostics(&mut self, map: &ElevationMap) -> ExtractionReport {
        assert!(!map.is_empty(), "elevation map must contain cells");
        debug!(
            "PlaneExtractor::process start rows={} cols={} kernel={}",
            map.rows(),
            map.cols(),
            self.params.kernel_size
        );
        let total_start = Instant::now();

        self.workspace.reset(map.len());

        let window_start = Instant::now();
        let scan = run_window_scan(
            map,
            &self.params,
            &mut self.workspace.surface_normals[..map.len()],
        );
        let mut mask = scan.mask;
        let window_ms = window_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "PlaneExtractor::window planar={} degenerate={} elapsed_ms={:.3}",
            scan.planar_cells, scan.degenerate_windows, window_ms
        );

        let erosion_start = Instant::now();
        let mut eroded_cells = 0usize;
        if self.params.erosion_radius > 0 {
            let before = mask.count_true();
            mask = erode(&mask, &StructuringElement::Cross(self.params.erosion_radius));
            eroded_cells = before - mask.count_true();
        }
        let erosion_ms = erosion_start.elapsed().as_secs_f64() * 1000.0;

        let labeling_start = Instant::now();
        let (labels, component_count) =
            label_connected_components(&mask, self.params.connectivity);
        let highest_label = component_count - 1;
        let labeling_ms = labeling_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "PlaneExtractor::segmentation regions={} elapsed_ms={:.3}",
            highest_label, labeling_ms
        );

        let mut result = SegmentedPlanes {
            resolution: map.resolution(),
            map_origin: map.origin(),
            highest_label,
            labels,
            planes: Vec::new(),
        };

        let fitting_start = Instant::now();
        let stats = fit_region_planes(
            map,
            &self.params,
            &self.workspace.surface_normals[..map.len()],
            &mut self.workspace.region_points,
            &mut result,
        );
        let fitting_ms = fitting_start.elapsed().as_secs_f64() * 1000.0;

        let latency = total_start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "PlaneExtractor::process done planes={} highest_label={} latency_ms={:.3}",
            result.planes.len(),
            result.highest_label,
            latency
        );

        let mut timings = TimingBreakdown::with_total(latency);
        timings.push("window", window_ms);
        if self.params.erosion_radius > 0 {
            timings.push("erosion", erosion_ms);
        }
        timings.push("labeling", labeling_ms);
        timings.push("fitting", fitting_ms);

        let trace = PipelineTrace {
            input: InputDescriptor {
                rows: map.rows(),
                cols: map.cols(),
                resolution: map.resolution(),
                valid_cells: map.valid_cells(),
            },
            timings,
            window: Some(WindowStage {
                elapsed_ms: window_ms,
                kernel_size: self.params.kernel_size,
                planar_cells: scan.planar_cells,
                degenerate_windows: scan.degenerate_windows,
                erosion_radius: self.params.erosion_radius,
                eroded_cells,
            }),
            segmentation: Some(SegmentationStage {
                elapsed_ms: labeling_ms,
                connectivity: self.params.connectivity,
                regions: highest_label,
            }),
            fitting: Some(FittingStage {
                elapsed_ms: fitting_ms,
                regions_total: stats.regions_total,
                planes_accepted: stats.planes_accepted,
                dropped_small: stats.dropped_small,
                dropped_steep: stats.dropped_steep,
                dropped_nonplanar: stats.dropped_nonplanar,
                refined_regions: stats.refined_regions,
                refinement_planes: stats.refinement_planes,
                new_labels: stats.new_labels,
                relabeled_cells: stats.relabeled_cells,
                demoted_cells: stats.demoted_cells,
            }),
        };

        ExtractionReport { result, trace }
    }
}

fn assert_kernel(kernel_size: usize) {
    assert!(
        kernel_size >= 3 && kernel_size % 2 == 1,
        "kernel_size must be odd and >= 3, got {kernel_size}"
    );
}
