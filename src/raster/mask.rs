//! Owned binary raster in row-major layout.

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryMask {
    rows: usize,
    cols: usize,
    data: Vec<bool>,
}

impl BinaryMask {
    /// Construct an all-false mask of `rows × cols` cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![false; rows * cols],
        }
    }

    /// Construct a mask with every cell set to `value`.
    pub fn filled(rows: usize, cols: usize, value: bool) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert (row, col) to a linear index into the mask data.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let i = self.idx(row, col);
        self.data[i] = value;
    }

    /// Backing storage in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.data
    }

    /// Number of set cells.
    pub fn count_true(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}
