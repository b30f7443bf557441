//! I/O helpers for elevation maps, label rasters and JSON reports.
//!
//! - `load_elevation_png`: read a 16-bit grayscale PNG as a height field.
//! - `save_elevation_png`: write a normalized height rendering for inspection.
//! - `save_mask_png`: write a binary mask (set cells white).
//! - `save_labels_png`: write a label raster as a color PNG (label 0 black).
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ElevationMap;
use crate::raster::{BinaryMask, LabelGrid};
use image::{GrayImage, Luma, Rgb, RgbImage};
use nalgebra::Vector2;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Fixed palette cycled over labels 1, 2, …; label 0 renders black.
const LABEL_PALETTE: [[u8; 3]; 12] = [
    [230, 25, 75],
    [60, 180, 75],
    [255, 225, 25],
    [0, 130, 200],
    [245, 130, 48],
    [145, 30, 180],
    [70, 240, 240],
    [240, 50, 230],
    [210, 245, 60],
    [250, 190, 190],
    [0, 128, 128],
    [170, 110, 40],
];

/// Load a PNG as an elevation map.
///
/// Pixels are read as 16-bit grayscale and mapped linearly from
/// `[0, 65535]` to `[min_height, max_height]`; image rows become map rows.
pub fn load_elevation_png(
    path: &Path,
    resolution: f64,
    origin: Vector2<f64>,
    min_height: f64,
    max_height: f64,
) -> Result<ElevationMap, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma16();
    let cols = img.width() as usize;
    let rows = img.height() as usize;
    let span = max_height - min_height;
    Ok(ElevationMap::from_fn(
        rows,
        cols,
        resolution,
        origin,
        |row, col| {
            let raw = img.get_pixel(col as u32, row as u32)[0] as f64 / 65535.0;
            (min_height + raw * span) as f32
        },
    ))
}

/// Save a height rendering: finite heights normalized to [0, 255] over the
/// map's own range, non-finite cells black.
pub fn save_elevation_png(map: &ElevationMap, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for &h in map.heights() {
        if h.is_finite() {
            min = min.min(h);
            max = max.max(h);
        }
    }
    let span = if max > min { max - min } else { 1.0 };
    let mut out = GrayImage::new(map.cols() as u32, map.rows() as u32);
    for row in 0..map.rows() {
        for col in 0..map.cols() {
            let h = map.height(row, col);
            let v = if h.is_finite() {
                (((h - min) / span) * 255.0).clamp(0.0, 255.0) as u8
            } else {
                0
            };
            out.put_pixel(col as u32, row as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a binary mask as a grayscale PNG, set cells white.
pub fn save_mask_png(mask: &BinaryMask, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = GrayImage::new(mask.cols() as u32, mask.rows() as u32);
    for row in 0..mask.rows() {
        for col in 0..mask.cols() {
            let v = if mask.get(row, col) { 255 } else { 0 };
            out.put_pixel(col as u32, row as u32, Luma([v]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Save a label raster as a color PNG, cycling the palette over labels.
pub fn save_labels_png(labels: &LabelGrid, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let mut out = RgbImage::new(labels.cols() as u32, labels.rows() as u32);
    for row in 0..labels.rows() {
        for col in 0..labels.cols() {
            let label = labels.get(row, col);
            let rgb = if label == 0 {
                [0, 0, 0]
            } else {
                LABEL_PALETTE[(label as usize - 1) % LABEL_PALETTE.len()]
            };
            out.put_pixel(col as u32, row as u32, Rgb(rgb));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
