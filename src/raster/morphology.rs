//! Binary morphology over masks.
//!
//! Cells outside the mask count as set, so a feature touching the border
//! is not eaten by erosion. This keeps fully planar maps fully planar.

use super::mask::BinaryMask;

/// Neighborhood shape for morphological operations, by radius in cells.
/// Radius `r` spans `2r + 1` cells per side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructuringElement {
    /// Horizontal and vertical arms through the center (a plus sign).
    Cross(usize),
    /// Full square block.
    Square(usize),
}

impl StructuringElement {
    pub fn radius(&self) -> usize {
        match *self {
            StructuringElement::Cross(radius) | StructuringElement::Square(radius) => radius,
        }
    }

    /// Side length of the bounding box in cells.
    pub fn size(&self) -> usize {
        2 * self.radius() + 1
    }

    fn offsets(&self) -> Vec<(isize, isize)> {
        let r = self.radius() as isize;
        match self {
            StructuringElement::Cross(_) => {
                let mut offsets = Vec::with_capacity(4 * r as usize + 1);
                for d in -r..=r {
                    offsets.push((d, 0));
                    if d != 0 {
                        offsets.push((0, d));
                    }
                }
                offsets
            }
            StructuringElement::Square(_) => {
                let mut offsets = Vec::with_capacity(((2 * r + 1) * (2 * r + 1)) as usize);
                for dr in -r..=r {
                    for dc in -r..=r {
                        offsets.push((dr, dc));
                    }
                }
                offsets
            }
        }
    }
}

/// Erodes a mask: a cell stays set only if every in-bounds cell covered by
/// the element (centered on it) is set. Out-of-bounds cells pass.
pub fn erode(mask: &BinaryMask, element: &StructuringElement) -> BinaryMask {
    let rows = mask.rows();
    let cols = mask.cols();
    let offsets = element.offsets();
    let mut out = BinaryMask::new(rows, cols);
    for row in 0..rows {
        for col in 0..cols {
            if !mask.get(row, col) {
                continue;
            }
            let mut keep = true;
            for &(dr, dc) in &offsets {
                let r = row as isize + dr;
                let c = col as isize + dc;
                if r < 0 || c < 0 || r >= rows as isize || c >= cols as isize {
                    continue;
                }
                if !mask.get(r as usize, c as usize) {
                    keep = false;
                    break;
                }
            }
            out.set(row, col, keep);
        }
    }
    out
}
