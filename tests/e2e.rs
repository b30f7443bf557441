mod common;

use common::synthetic_map::{flat_map, slope_map, split_blocks_map};
use plane_extractor::{ExtractorParams, PlaneExtractor};

#[test]
fn flat_plateau_yields_a_single_upright_plane() {
    let _ = env_logger::builder().is_test(true).try_init();
    let map = flat_map(10, 10, 0.1, 1.0);
    // Tight gates: a perfect plateau passes them with room to spare.
    let params = ExtractorParams {
        kernel_size: 3,
        plane_patch_error_threshold: 0.01,
        plane_inclination_threshold_degrees: 10.0,
        ..ExtractorParams::default()
    };
    let mut extractor = PlaneExtractor::new(params);
    let report = extractor.process_with_diagnostics(&map);
    let result = &report.result;

    assert_eq!(result.highest_label, 1);
    assert!(result.labels.as_slice().iter().all(|&l| l == 1));
    assert_eq!(result.planes.len(), 1);

    let plane = result
        .plane_for_label(1)
        .expect("plateau must produce a plane");
    assert!(
        (plane.support.z - 1.0).abs() < 1e-6,
        "support height off: {:.6}",
        plane.support.z
    );
    let normal = plane.surface_normal();
    assert!(
        normal.z > 0.9999,
        "plateau normal must point up, got {normal:?}"
    );

    assert_eq!(report.trace.input.valid_cells, 100);
    let fitting = report.trace.fitting.expect("fitting stage must run");
    assert_eq!(fitting.planes_accepted, 1);
    assert_eq!(fitting.refined_regions, 0);
}

#[test]
fn blocks_split_by_a_missing_column_segment_separately() {
    let map = split_blocks_map();
    let params = ExtractorParams {
        erosion_radius: 1,
        ..ExtractorParams::default()
    };
    let mut extractor = PlaneExtractor::new(params);
    let report = extractor.process_with_diagnostics(&map);
    let result = &report.result;

    assert_eq!(result.highest_label, 2);
    assert_eq!(result.planes.len(), 2);

    // Scan order labels the left block first.
    let left = result.plane_for_label(1).expect("left block plane");
    let right = result.plane_for_label(2).expect("right block plane");
    assert!((left.support.z - 0.1).abs() < 1e-6);
    assert!((right.support.z - 0.4).abs() < 1e-6);
    assert_eq!(result.labels.count_of(1), 12);
    assert_eq!(result.labels.count_of(2), 12);

    // The missing column and the flanks the erosion peeled stay background.
    for row in 0..map.rows() {
        for col in 3..=5 {
            assert_eq!(result.labels.get(row, col), 0, "cell ({row}, {col})");
        }
    }

    let window = report.trace.window.expect("window stage must run");
    assert_eq!(window.planar_cells, 32);
    assert_eq!(window.eroded_cells, 8);
    assert_eq!(report.trace.input.valid_cells, 32);
    // Window, erosion, labeling and fitting all report a timing entry.
    assert_eq!(report.trace.timings.stages.len(), 4);
}

#[test]
fn gentle_slope_keeps_its_tilted_normal() {
    let map = slope_map(12, 12, 0.1, 0.02);
    let mut extractor = PlaneExtractor::new(ExtractorParams::default());
    let result = extractor.process(&map);

    assert_eq!(result.highest_label, 1);
    assert_eq!(result.planes.len(), 1);
    let normal = result
        .plane_for_label(1)
        .expect("slope plane")
        .surface_normal();
    // Heights rise by 0.02 per 0.1 m of row travel: grade 0.2.
    let expected_x = 0.2 / (1.0f64 + 0.04).sqrt();
    assert!((normal.x - expected_x).abs() < 1e-3, "normal {normal:?}");
    assert!(normal.y.abs() < 1e-6);
    assert!(normal.z > 0.98);
}

#[test]
fn steep_slope_is_rejected_by_the_window_gate() {
    let map = slope_map(12, 12, 0.1, 0.08);
    let mut extractor = PlaneExtractor::new(ExtractorParams::default());
    let report = extractor.process_with_diagnostics(&map);
    let result = &report.result;

    // 38.7° of inclination exceeds the 30° default everywhere.
    assert_eq!(result.highest_label, 0);
    assert!(result.planes.is_empty());
    assert!(result.labels.as_slice().iter().all(|&l| l == 0));
    let window = report.trace.window.expect("window stage must run");
    assert_eq!(window.planar_cells, 0);
}

#[test]
fn report_serializes_to_json() {
    let map = flat_map(6, 6, 0.1, 0.2);
    let mut extractor = PlaneExtractor::new(ExtractorParams::default());
    let report = extractor.process_with_diagnostics(&map);

    let json = serde_json::to_string(&report).expect("report must serialize");
    assert!(json.contains("\"highest_label\":1"));
    assert!(json.contains("\"validCells\":36"));
    assert!(json.contains("\"planarCells\":36"));
}
