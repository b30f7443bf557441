//! Runtime configuration for the segmentation demos.
//!
//! Configs are plain JSON files deserialized with serde. Every field has a
//! default so partial configs stay valid; an empty object `{}` runs the
//! synthetic demo map with default extractor parameters.

use crate::extractor::ExtractorParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where the elevation map comes from and how to interpret it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ElevationInputConfig {
    /// Optional 16-bit grayscale PNG with one pixel per cell.
    /// When `None`, the demo falls back to a built-in synthetic map.
    pub image: Option<PathBuf>,
    /// Cell edge length in meters.
    pub resolution: f64,
    /// World position of cell (0, 0), meters.
    pub origin: [f64; 2],
    /// Height mapped to pixel value 0, meters.
    pub min_height: f64,
    /// Height mapped to pixel value 65535, meters.
    pub max_height: f64,
}

impl Default for ElevationInputConfig {
    fn default() -> Self {
        Self {
            image: None,
            resolution: 0.04,
            origin: [0.0, 0.0],
            min_height: 0.0,
            max_height: 1.0,
        }
    }
}

/// Optional artifacts written after a run. Absent paths skip the artifact.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Normalized grayscale render of the input heights.
    pub elevation_png: Option<PathBuf>,
    /// Planarity mask after erosion (planar cells white).
    pub mask_png: Option<PathBuf>,
    /// Color-coded label raster.
    pub labels_png: Option<PathBuf>,
    /// Full extraction report (result + per-stage diagnostics).
    pub report_json: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub input: ElevationInputConfig,
    pub output: OutputConfig,
    pub extractor: ExtractorParams,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let data = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    serde_json::from_str(&data)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}
