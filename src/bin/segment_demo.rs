//! Demonstration binary for the plane extractor.
//!
//! Loads a JSON runtime config, reads the elevation map it names (or
//! synthesizes a stepped slope when no image is configured), runs the full
//! extraction pipeline and writes the configured artifacts: elevation and
//! label PNGs, the planarity mask and a JSON extraction report.

use nalgebra::Vector2;
use plane_extractor::config::{load_config, ElevationInputConfig};
use plane_extractor::diagnostics::ExtractionReport;
use plane_extractor::elevation::io::{
    save_elevation_png, save_labels_png, save_mask_png, write_json_file,
};
use plane_extractor::elevation::ElevationMap;
use plane_extractor::raster::BinaryMask;
use plane_extractor::PlaneExtractor;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path))?;

    let map = load_map(&config.input)?;

    let mut extractor = PlaneExtractor::new(config.extractor.clone());
    let report = extractor.process_with_diagnostics(&map);
    print_text_summary(&report);

    if let Some(path) = &config.output.elevation_png {
        save_elevation_png(&map, path)?;
        println!("Elevation rendering written to {}", path.display());
    }
    if let Some(path) = &config.output.mask_png {
        save_mask_png(&labeled_mask(&report), path)?;
        println!("Planarity mask written to {}", path.display());
    }
    if let Some(path) = &config.output.labels_png {
        save_labels_png(&report.result.labels, path)?;
        println!("Label raster written to {}", path.display());
    }
    if let Some(path) = &config.output.report_json {
        write_json_file(path, &report)?;
        println!("JSON report written to {}", path.display());
    }

    Ok(())
}

fn usage() -> String {
    "Usage: segment_demo <config.json>".to_string()
}

fn load_map(input: &ElevationInputConfig) -> Result<ElevationMap, String> {
    let origin = Vector2::new(input.origin[0], input.origin[1]);
    match &input.image {
        Some(path) => plane_extractor::elevation::io::load_elevation_png(
            path,
            input.resolution,
            origin,
            input.min_height,
            input.max_height,
        ),
        // Synthetic fallback: a flat floor stepping up to a gentle ramp.
        None => Ok(ElevationMap::from_fn(
            120,
            160,
            input.resolution,
            origin,
            |row, col| {
                if row < 60 {
                    0.0
                } else {
                    0.25 + 0.002 * col as f32
                }
            },
        )),
    }
}

/// Mask of cells that kept a non-background label after extraction.
fn labeled_mask(report: &ExtractionReport) -> BinaryMask {
    let labels = &report.result.labels;
    let mut mask = BinaryMask::new(labels.rows(), labels.cols());
    for row in 0..labels.rows() {
        for col in 0..labels.cols() {
            mask.set(row, col, labels.get(row, col) != 0);
        }
    }
    mask
}

fn print_text_summary(report: &ExtractionReport) {
    let res = &report.result;
    println!("Extraction summary");
    println!("  planes: {}", res.planes.len());
    println!("  highest_label: {}", res.highest_label);
    println!("  latency_ms: {:.3}", report.trace.timings.total_ms);
    for plane in &res.planes {
        let n = plane.plane.surface_normal();
        println!(
            "  label {}: cells={} support=[{:.3}, {:.3}, {:.3}] normal=[{:.3}, {:.3}, {:.3}]",
            plane.label,
            res.labels.count_of(plane.label),
            plane.plane.support[0],
            plane.plane.support[1],
            plane.plane.support[2],
            n[0],
            n[1],
            n[2],
        );
    }

    if let Some(window) = &report.trace.window {
        println!(
            "\nWindow stage: planar={} degenerate={} eroded={} elapsed_ms={:.3}",
            window.planar_cells, window.degenerate_windows, window.eroded_cells, window.elapsed_ms
        );
    }
    if let Some(segmentation) = &report.trace.segmentation {
        println!(
            "Segmentation: regions={} connectivity={:?} elapsed_ms={:.3}",
            segmentation.regions, segmentation.connectivity, segmentation.elapsed_ms
        );
    }
    if let Some(fitting) = &report.trace.fitting {
        println!(
            "Fitting: accepted={} refined={} dropped_small={} dropped_steep={} dropped_nonplanar={} elapsed_ms={:.3}",
            fitting.planes_accepted,
            fitting.refined_regions,
            fitting.dropped_small,
            fitting.dropped_steep,
            fitting.dropped_nonplanar,
            fitting.elapsed_ms
        );
        if fitting.refined_regions > 0 {
            println!(
                "  refinement: planes={} new_labels={} relabeled={} demoted={}",
                fitting.refinement_planes,
                fitting.new_labels,
                fitting.relabeled_cells,
                fitting.demoted_cells
            );
        }
    }
}
