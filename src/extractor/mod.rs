//! Plane extractor orchestrating the sliding-window segmentation pipeline.
//!
//! Overview
//! - Fits a local plane around every finite cell from the covariance of its
//!   kernel window; the smallest-eigenvalue eigenvector is the cell's
//!   surface normal (flipped upward), the square root of the smallest
//!   eigenvalue its RMS flatness error.
//! - Builds a binary planarity mask from the per-window error and
//!   inclination thresholds, optionally eroded with a cross element so that
//!   cells bordering non-planar terrain drop out.
//! - Labels the connected components of the mask (label 0 = background) and
//!   fits one least-squares plane per region.
//! - Tests each region point-by-point for global planarity; regions that
//!   fail are decomposed by a seeded RANSAC detector. The first sub-plane
//!   keeps the region's label, later sub-planes mint fresh labels, and
//!   unclaimed cells fall back to background.
//!
//! Modules
//! - [`params`] – configuration types used by the extractor and demos.
//! - `pipeline` – the main [`PlaneExtractor`] implementation.
//! - `window` – stage 1/2: local fits and the planarity mask.
//! - `regions` – stage 4/5: region fitting, global test, refinement.
//! - `workspace` – reusable buffers that amortise allocations across maps.
//!
//! Key ideas
//! - Window offsets share the sign convention of the index→world mapping,
//!   so window normals compare directly against region normals.
//! - Label bookkeeping is exact: labels minted by refinement are final,
//!   never reused, and `highest_label` only grows during a run.

pub mod params;
mod pipeline;
mod regions;
mod window;
mod workspace;

pub use params::ExtractorParams;
pub use pipeline::PlaneExtractor;
pub use workspace::ExtractorWorkspace;
