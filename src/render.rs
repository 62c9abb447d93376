//! Composes the RGB field handed to the external renderer.

use crate::color::Rgb;
use crate::population::BotPopulation;
use rayon::prelude::*;

/// Builds the output color field, row-major (`y * width + x`).
///
/// Each cell is the sum of `group color * group trail` over all groups,
/// clamped to [0, 1]; cells under a bot get `bot_accent` added (and clamped
/// again); the result is scaled by `brightness`.
pub fn compose_rgb(population: &BotPopulation, brightness: f32, bot_accent: f32) -> Vec<Rgb> {
    let dims = population.dims();
    let width = dims.width;

    let occupied = population.occupied_cells();

    let groups = population.groups();
    let mut rgb = vec![[0.0f32; 3]; dims.num_cells()];
    rgb.par_chunks_mut(width)
        .zip(occupied.par_chunks(width))
        .enumerate()
        .for_each(|(y, (row, occupied_row))| {
            for (x, (cell, &has_bot)) in row.iter_mut().zip(occupied_row).enumerate() {
                let idx = y * width + x;
                let mut color = [0.0f32; 3];
                for group in groups {
                    let value = group.trail.cells()[idx];
                    for c in 0..3 {
                        color[c] += group.color[c] * value;
                    }
                }
                for channel in color.iter_mut() {
                    let mut v = channel.clamp(0.0, 1.0);
                    if has_bot {
                        v = (v + bot_accent).min(1.0);
                    }
                    *channel = v * brightness;
                }
                *cell = color;
            }
        });
    rgb
}
