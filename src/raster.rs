//! Deposits the path a bot travelled during a tick, not just its endpoint.

use crate::field::TrailField;
use swarm_common::Vec2;

/// Deposits every cell along the segment `prev -> pos`.
///
/// Walks `ceil(max(|dx|, |dy|)) + 1` evenly spaced points, so consecutive
/// samples are at most one cell apart on each axis and the trail has no
/// gaps at any speed. Cells are taken by truncating toward zero.
pub fn deposit_segment(field: &mut TrailField, prev: Vec2, pos: Vec2) {
    let delta = pos - prev;
    let steps = delta.max_abs().ceil();
    if !(steps > 0.0) {
        field.deposit_cell(pos.x as i64, pos.y as i64);
        return;
    }

    let increment = delta / steps;
    let steps = steps as u32;
    for i in 0..=steps {
        let p = prev + increment * i as f32;
        field.deposit_cell(p.x as i64, p.y as i64);
    }
}

/// Deposits the segments of a batch of bots into one group's field.
pub fn deposit_group(field: &mut TrailField, prev_x: &[f32], prev_y: &[f32], pos_x: &[f32], pos_y: &[f32]) {
    for i in 0..pos_x.len() {
        deposit_segment(
            field,
            Vec2::new(prev_x[i], prev_y[i]),
            Vec2::new(pos_x[i], pos_y[i]),
        );
    }
}
