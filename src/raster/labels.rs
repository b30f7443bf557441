//! Connected-component labeling over binary masks.

use super::mask::BinaryMask;
use serde::{Deserialize, Serialize};

const NEIGHBORS_4: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Pixel adjacency used when growing components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Four,
    Eight,
}

impl Connectivity {
    fn offsets(&self) -> &'static [(isize, isize)] {
        match self {
            Connectivity::Four => &NEIGHBORS_4,
            Connectivity::Eight => &NEIGHBORS_8,
        }
    }
}

/// Owned label raster in row-major layout. Label 0 is background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelGrid {
    rows: usize,
    cols: usize,
    data: Vec<u32>,
}

impl LabelGrid {
    /// Construct an all-background grid of `rows × cols` cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
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

    /// Convert (row, col) to a linear index into the label data.
    #[inline]
    pub fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[self.idx(row, col)]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, label: u32) {
        let i = self.idx(row, col);
        self.data[i] = label;
    }

    /// Backing storage in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Number of cells carrying `label`.
    pub fn count_of(&self, label: u32) -> usize {
        self.data.iter().filter(|&&v| v == label).count()
    }
}

/// Labels the connected components of `mask`.
///
/// Set cells receive labels 1, 2, … in raster scan order of each
/// component's first-visited cell; unset cells keep label 0. Returns the
/// label grid and the component count including background, so
/// `count - 1` is the highest label in the grid.
pub fn label_connected_components(
    mask: &BinaryMask,
    connectivity: Connectivity,
) -> (LabelGrid, u32) {
    let rows = mask.rows();
    let cols = mask.cols();
    let mut labels = LabelGrid::new(rows, cols);
    let offsets = connectivity.offsets();
    let mut next_label = 0u32;
    let mut stack: Vec<usize> = Vec::with_capacity(64);

    for seed in 0..mask.len() {
        if !mask.as_slice()[seed] || labels.data[seed] != 0 {
            continue;
        }
        next_label += 1;
        labels.data[seed] = next_label;
        stack.push(seed);
        while let Some(idx) = stack.pop() {
            let row = (idx / cols) as isize;
            let col = (idx % cols) as isize;
            for &(dr, dc) in offsets {
                let r = row + dr;
                let c = col + dc;
                if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
                    continue;
                }
                let nidx = r as usize * cols + c as usize;
                if mask.as_slice()[nidx] && labels.data[nidx] == 0 {
                    labels.data[nidx] = next_label;
                    stack.push(nidx);
                }
            }
        }
    }

    (labels, next_label + 1)
}
