pub mod config;
pub mod settings;
pub mod sim_params;
pub mod snapshot;
pub mod vecmath;

// Re-export key types for easier use by dependent crates
pub use config::{
    EnvironmentConfig, OutputConfig, PointerButton, PointerConfig, PopulationConfig, SensorConfig,
    SimulationConfig, TimingConfig,
};
pub use settings::{SettingDomain, Settings};
pub use sim_params::SimParams;
pub use snapshot::Snapshot;
pub use vecmath::{angle_to_vec, clamp, signed_angle_delta, vec_to_angle, wrap_angle, Vec2};
