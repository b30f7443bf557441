use nalgebra::Vector2;
use plane_extractor::elevation::ElevationMap;
use plane_extractor::{ExtractorParams, PlaneExtractor};

fn main() {
    // Demo stub: segments a synthetic two-level terrain
    let rows = 60usize;
    let cols = 80usize;
    let map = ElevationMap::from_fn(rows, cols, 0.05, Vector2::new(0.0, 0.0), |row, _col| {
        if row < 30 {
            0.0
        } else {
            0.3
        }
    });

    let mut extractor = PlaneExtractor::new(ExtractorParams::default());
    let report = extractor.process_with_diagnostics(&map);
    println!(
        "planes={} highest_label={} latency_ms={:.3}",
        report.result.planes.len(),
        report.result.highest_label,
        report.trace.timings.total_ms
    );
}
