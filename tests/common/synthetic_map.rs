use nalgebra::Vector2;
use plane_extractor::elevation::ElevationMap;

/// Generates a uniform plateau at `height`.
pub fn flat_map(rows: usize, cols: usize, resolution: f64, height: f32) -> ElevationMap {
    assert!(rows > 0 && cols > 0, "map dimensions must be positive");
    ElevationMap::from_fn(rows, cols, resolution, Vector2::new(0.0, 0.0), |_, _| {
        height
    })
}

/// Generates a plane rising by `rise_per_row` with every row.
pub fn slope_map(rows: usize, cols: usize, resolution: f64, rise_per_row: f32) -> ElevationMap {
    assert!(rows > 0 && cols > 0, "map dimensions must be positive");
    ElevationMap::from_fn(rows, cols, resolution, Vector2::new(0.0, 0.0), |row, _| {
        rise_per_row * row as f32
    })
}

/// Two flat 4×4 blocks at different heights separated by a column of
/// missing cells: columns 0–3 at 0.1 m, column 4 NaN, columns 5–8 at 0.4 m.
pub fn split_blocks_map() -> ElevationMap {
    ElevationMap::from_fn(4, 9, 0.1, Vector2::new(0.0, 0.0), |_, col| match col {
        0..=3 => 0.1,
        4 => f32::NAN,
        _ => 0.4,
    })
}

/// A tent profile: a short arm climbing 0.04 m per row up to the apex at
/// row 4, then a long arm descending at the same rate through row 14.
/// Both arms are exactly planar with a 21.8° inclination; only the apex
/// row bends.
pub fn ridge_map() -> ElevationMap {
    ElevationMap::from_fn(15, 10, 0.1, Vector2::new(0.0, 0.0), |row, _| {
        if row <= 4 {
            0.04 * row as f32
        } else {
            0.16 - 0.04 * (row as f32 - 4.0)
        }
    })
}
