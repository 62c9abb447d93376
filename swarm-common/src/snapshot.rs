use serde::{Deserialize, Serialize};

/// Population and trail statistics recorded at a specific tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Number of completed ticks when the snapshot was taken.
    pub tick: u64,
    pub num_bots: u32,
    pub num_groups: u32,
    /// Bots per group, indexed by group id.
    pub group_member_counts: Vec<u32>,
    /// Sum of all trail cells per group.
    pub group_trail_mass: Vec<f32>,
    /// Largest trail cell value per group.
    pub group_trail_peak: Vec<f32>,
    /// Number of distinct grid cells holding at least one bot.
    pub occupied_cells: u32,
    /// Composed RGB output, row-major (`y * width + x`).
    /// Only present when `output.save_frame_in_snapshot` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame: Option<Vec<[f32; 3]>>,
}
