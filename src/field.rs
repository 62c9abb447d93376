//! Per-group trail field: deposit, box-blur diffusion and exponential decay.

use crate::grid::GridDims;
use rayon::prelude::*;

/// Value written into a cell when a bot passes over it.
pub const DEPOSIT_VALUE: f32 = 1.0;

/// Read access to window sums over a trail-like grid.
///
/// Implemented by [`TrailField`] itself and by views that derive a field
/// from others without materializing it.
pub trait TrailSampler: Sync {
    /// Sum of the square window of half-width `half` around `(cx, cy)`,
    /// clipped to the grid.
    fn window_sum(&self, cx: i64, cy: i64, half: usize) -> f32;
}

/// A scalar grid the size of the environment.
///
/// Blur writes into a second buffer and swaps, so a pass never reads a
/// neighbour it has already updated.
#[derive(Debug, Clone)]
pub struct TrailField {
    dims: GridDims,
    cells: Vec<f32>,
    // Blur target, swapped with `cells` after each pass
    scratch: Vec<f32>,
}

impl TrailField {
    pub fn new(dims: GridDims) -> Self {
        TrailField {
            dims,
            cells: vec![0.0; dims.num_cells()],
            scratch: vec![0.0; dims.num_cells()],
        }
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    /// Row-major cell values.
    pub fn cells(&self) -> &[f32] {
        &self.cells
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.cells[self.dims.cell_idx(x, y)]
    }

    /// Marks the cell at the rounded position. No-op outside the grid.
    pub fn deposit(&mut self, x: f32, y: f32) {
        self.deposit_cell(x.round() as i64, y.round() as i64);
    }

    /// Marks an integer cell. No-op outside the grid.
    #[inline(always)]
    pub fn deposit_cell(&mut self, x: i64, y: i64) {
        if self.dims.contains(x, y) {
            let idx = self.dims.cell_idx(x as usize, y as usize);
            self.cells[idx] = DEPOSIT_VALUE;
        }
    }

    /// Blends every cell toward the mean of its in-bounds 3x3 neighbourhood:
    /// `factor * mean + (1 - factor) * original`.
    pub fn blur(&mut self, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        let width = self.dims.width;
        let height = self.dims.height;
        let src = &self.cells;

        self.scratch
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row_out)| {
                let y0 = y.saturating_sub(1);
                let y1 = (y + 1).min(height - 1);
                for (x, out) in row_out.iter_mut().enumerate() {
                    let x0 = x.saturating_sub(1);
                    let x1 = (x + 1).min(width - 1);
                    let mut sum = 0.0;
                    for ny in y0..=y1 {
                        let row = &src[ny * width..(ny + 1) * width];
                        sum += row[x0..=x1].iter().sum::<f32>();
                    }
                    let count = ((x1 - x0 + 1) * (y1 - y0 + 1)) as f32;
                    let original = src[y * width + x];
                    *out = factor * (sum / count) + (1.0 - factor) * original;
                }
            });

        std::mem::swap(&mut self.cells, &mut self.scratch);
    }

    /// Multiplies every cell by `1 - amount`.
    pub fn decay(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        let keep = 1.0 - amount;
        self.cells.par_iter_mut().for_each(|c| *c *= keep);
    }

    /// Zeroes the field.
    pub fn reset(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }

    /// Overwrites this field with the cell-wise sum of `fields`.
    pub fn set_to_sum<'a, I>(&mut self, fields: I)
    where
        I: IntoIterator<Item = &'a TrailField>,
    {
        self.reset();
        for field in fields {
            debug_assert_eq!(field.dims, self.dims);
            self.cells
                .par_iter_mut()
                .zip(field.cells.par_iter())
                .for_each(|(acc, v)| *acc += v);
        }
    }

    /// Sum of all cells.
    pub fn mass(&self) -> f32 {
        self.cells.par_iter().sum()
    }

    /// Largest cell value, 0 for an empty field.
    pub fn peak(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }
}

impl TrailSampler for TrailField {
    fn window_sum(&self, cx: i64, cy: i64, half: usize) -> f32 {
        let Some((cols, rows)) = self.dims.clamp_window(cx, cy, half as i64) else {
            return 0.0;
        };
        let width = self.dims.width;
        rows.map(|y| self.cells[y * width + cols.start..y * width + cols.end].iter().sum::<f32>())
            .sum()
    }
}

/// Mean of every group's field except one, derived from the all-groups sum.
///
/// Window sums are linear, so `(total - own) / rivals` equals the window sum
/// of the mean rival field without building it per group.
pub struct RivalMean<'a> {
    total: &'a TrailField,
    own: &'a TrailField,
    num_rivals: usize,
}

impl<'a> RivalMean<'a> {
    pub fn new(total: &'a TrailField, own: &'a TrailField, num_rivals: usize) -> Self {
        RivalMean { total, own, num_rivals }
    }
}

impl TrailSampler for RivalMean<'_> {
    fn window_sum(&self, cx: i64, cy: i64, half: usize) -> f32 {
        if self.num_rivals == 0 {
            return 0.0;
        }
        let rivals = self.total.window_sum(cx, cy, half) - self.own.window_sum(cx, cy, half);
        rivals.max(0.0) / self.num_rivals as f32
    }
}
