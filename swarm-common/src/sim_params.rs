use serde::{Deserialize, Serialize};

/// Fixed parameters derived from the configuration, read every tick.
/// UI-adjustable knobs live in [`crate::Settings`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimParams {
    // Environment
    pub env_width: u32,
    pub env_height: u32,

    // Sensors
    pub sensor_reach: f32,
    pub sensor_half_size: u32,
    pub sensor_offsets: Vec<f32>, // Radians, relative to heading

    // Randomness
    pub seed: u64,
}
