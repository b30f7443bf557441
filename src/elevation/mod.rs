//! Owned single-layer elevation raster in row-major layout.
//!
//! Heights are stored as `f32` with NaN (or any non-finite value) marking
//! cells without measurements. Geometry is kept in `f64`: cell `(0, 0)`
//! sits at `origin`, and positions decrease along both index axes, so
//! `world = origin - index · resolution` per axis. `world_to_index` is the
//! exact rounding inverse of `cell_position` on cell centers.

pub mod io;

use nalgebra::{Vector2, Vector3};

#[derive(Clone, Debug, PartialEq)]
pub struct ElevationMap {
    rows: usize,
    cols: usize,
    resolution: f64,
    origin: Vector2<f64>,
    data: Vec<f32>,
}

impl ElevationMap {
    /// Construct a map of `rows × cols` cells, every height NaN.
    ///
    /// Panics if `resolution` is not strictly positive.
    pub fn new(rows: usize, cols: usize, resolution: f64, origin: Vector2<f64>) -> Self {
        assert!(resolution > 0.0, "resolution must be positive");
        Self {
            rows,
            cols,
            resolution,
            origin,
            data: vec![f32::NAN; rows * cols],
        }
    }

    /// Construct a map filling every cell from `f(row, col)`.
    pub fn from_fn<F>(
        rows: usize,
        cols: usize,
        resolution: f64,
        origin: Vector2<f64>,
        mut f: F,
    ) -> Self
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut map = Self::new(rows, cols, resolution, origin);
        for row in 0..rows {
            for col in 0..cols {
                let i = map.idx(row, col);
                map.data[i] = f(row, col);
            }
        }
        map
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert (row, col) to a linear index into the height data.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Height at (row, col). Non-finite values mean "no measurement".
    #[inline]
    pub fn height(&self, row: usize, col: usize) -> f32 {
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub fn set_height(&mut self, row: usize, col: usize, height: f32) {
        let i = self.idx(row, col);
        self.data[i] = height;
    }

    /// Backing height storage in row-major order.
    #[inline]
    pub fn heights(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// World position of cell (0, 0).
    #[inline]
    pub fn origin(&self) -> Vector2<f64> {
        self.origin
    }

    /// World xy position of the center of cell (row, col).
    #[inline]
    pub fn cell_position(&self, row: usize, col: usize) -> Vector2<f64> {
        Vector2::new(
            self.origin.x - row as f64 * self.resolution,
            self.origin.y - col as f64 * self.resolution,
        )
    }

    /// World xyz point at (row, col), pairing the cell center with its height.
    #[inline]
    pub fn cell_point(&self, row: usize, col: usize) -> Vector3<f64> {
        let xy = self.cell_position(row, col);
        Vector3::new(xy.x, xy.y, self.height(row, col) as f64)
    }

    /// Nearest cell for a world position, `None` outside the map.
    pub fn world_to_index(&self, position: &Vector2<f64>) -> Option<(usize, usize)> {
        let row = ((self.origin.x - position.x) / self.resolution).round();
        let col = ((self.origin.y - position.y) / self.resolution).round();
        if row < 0.0 || col < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.rows && col < self.cols).then_some((row, col))
    }

    /// Number of cells carrying a finite height.
    pub fn valid_cells(&self) -> usize {
        self.data.iter().filter(|h| h.is_finite()).count()
    }
}
