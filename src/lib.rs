#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod elevation;
pub mod extractor;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
// (You can tighten or feature-gate these later.)
pub mod angle;
pub mod fit;
pub mod ransac;
pub mod raster;

// --- High-level re-exports -------------------------------------------------

// Main entry points: extractor + results.
pub use crate::extractor::{ExtractorParams, ExtractorWorkspace, PlaneExtractor};
pub use crate::types::{LabeledPlane, SegmentedPlanes, TerrainPlane};

// High-level diagnostics returned by the extractor.
pub use crate::diagnostics::{ExtractionReport, PipelineTrace};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use plane_extractor::prelude::*;
/// use nalgebra::Vector2;
///
/// # fn main() {
/// let map = ElevationMap::from_fn(120, 160, 0.04, Vector2::new(0.0, 0.0), |row, _col| {
///     if row < 60 { 0.0 } else { 0.25 }
/// });
///
/// let mut extractor = PlaneExtractor::new(ExtractorParams::default());
/// let report = extractor.process_with_diagnostics(&map);
/// println!(
///     "planes={} highest_label={} latency_ms={:.3}",
///     report.result.planes.len(),
///     report.result.highest_label,
///     report.trace.timings.total_ms
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::elevation::ElevationMap;
    pub use crate::{ExtractorParams, PlaneExtractor, SegmentedPlanes};
}
