//! Group color generation.

use rand::seq::SliceRandom;
use rand::Rng;

/// RGB with channels in [0, 1].
pub type Rgb = [f32; 3];

/// Minimum summed channel-to-neighbour difference (0..=255 scale) for a
/// color to count as vivid.
pub const VIVIDNESS_THRESHOLD: u32 = 350;

fn to_unit(rgb: [u32; 3]) -> Rgb {
    rgb.map(|c| c as f32 / 255.0)
}

/// Sum of `|c[i] - c[i-1]|` over the three channels, cyclically.
fn channel_spread(rgb: [u32; 3]) -> u32 {
    (0..3).map(|i| rgb[i].abs_diff(rgb[(i + 2) % 3])).sum()
}

/// Draws random colors until one is vivid: its channels differ strongly
/// from each other, which rules out greys and washed-out tints.
pub fn random_vibrant<R: Rng>(rng: &mut R) -> Rgb {
    loop {
        let rgb = [
            rng.random_range(0..256u32),
            rng.random_range(0..256u32),
            rng.random_range(0..256u32),
        ];
        if channel_spread(rgb) > VIVIDNESS_THRESHOLD {
            return to_unit(rgb);
        }
    }
}

/// Picks `n` distinct colors from an evenly stepped RGB lattice, which keeps
/// them far apart from each other.
pub fn random_different<R: Rng>(n: usize, rng: &mut R) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    // At least two levels per channel so the step is defined for n == 1
    let levels = ((n as f64).cbrt().ceil() as u32).max(2);
    let step = (255 / (levels - 1)) as usize;
    let steps: Vec<u32> = (0..=255u32).step_by(step).collect();

    let mut lattice: Vec<[u32; 3]> = Vec::with_capacity(steps.len().pow(3));
    for &r in &steps {
        for &g in &steps {
            for &b in &steps {
                lattice.push([r, g, b]);
            }
        }
    }
    lattice.shuffle(rng);
    lattice.truncate(n);
    lattice.into_iter().map(to_unit).collect()
}
