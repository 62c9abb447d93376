use crate::error::{SwarmError, SwarmResult};
use std::ops::Range;
use swarm_common::Vec2;

/// Dimensions of the environment grid. One trail cell per environment unit,
/// stored row-major (`y * width + x`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDims {
    pub width: usize,
    pub height: usize,
}

impl GridDims {
    pub fn new(width: usize, height: usize) -> SwarmResult<Self> {
        if width == 0 || height == 0 {
            return Err(SwarmError::InvalidConfiguration(format!(
                "environment dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        Ok(GridDims { width, height })
    }

    #[inline(always)]
    pub fn num_cells(&self) -> usize {
        self.width * self.height
    }

    /// Largest valid x coordinate (`width - 1`).
    #[inline(always)]
    pub fn max_x(&self) -> f32 {
        (self.width - 1) as f32
    }

    /// Largest valid y coordinate (`height - 1`).
    #[inline(always)]
    pub fn max_y(&self) -> f32 {
        (self.height - 1) as f32
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.max_x() / 2.0, self.max_y() / 2.0)
    }

    #[inline(always)]
    pub fn cell_idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    #[inline(always)]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Cell index under a continuous position, truncating toward zero.
    /// Returns `None` for positions outside the grid.
    #[inline(always)]
    pub fn cell_of(&self, pos: Vec2) -> Option<usize> {
        let (x, y) = (pos.x as i64, pos.y as i64);
        if self.contains(x, y) {
            Some(self.cell_idx(x as usize, y as usize))
        } else {
            None
        }
    }

    /// The `[c - half, c + half]` square around `(cx, cy)` clipped to the grid,
    /// as column and row ranges. `None` if nothing of it lies inside.
    pub fn clamp_window(&self, cx: i64, cy: i64, half: i64) -> Option<(Range<usize>, Range<usize>)> {
        let x0 = (cx - half).max(0);
        let y0 = (cy - half).max(0);
        let x1 = (cx + half).min(self.width as i64 - 1);
        let y1 = (cy + half).min(self.height as i64 - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some((x0 as usize..x1 as usize + 1, y0 as usize..y1 as usize + 1))
    }
}
