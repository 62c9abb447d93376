use crate::settings::Settings;
use crate::sim_params::SimParams;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Size of the environment grid, one trail cell per unit
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EnvironmentConfig {
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PopulationConfig {
    /// Seed for the simulation's owned RNG (placement, colors, jitter).
    #[serde(default = "default_seed")]
    pub seed: u64,
}

// Placement of the steering sensors ahead of each bot
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SensorConfig {
    #[serde(default = "default_sensor_reach")]
    pub reach: f32,
    #[serde(default = "default_sensor_half_size")]
    pub half_size: u32,
    /// Candidate heading offsets, in multiples of π.
    #[serde(default = "default_sensor_offsets_pi")]
    pub offsets_pi: Vec<f32>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub total_ticks: u32,
    #[serde(default = "default_record_interval")]
    pub record_interval_ticks: u32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    None,
    Attract,
    Repel,
}

// Scripted pointer used by headless runs in place of a live UI
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PointerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default = "default_pointer_button")]
    pub button: PointerButton,
    #[serde(default)]
    pub start_tick: u32,
    #[serde(default)]
    pub end_tick: Option<u32>, // None = until the end of the run
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_positions: bool,
    pub save_stats: bool,
    #[serde(default)]
    pub save_frame_in_snapshot: bool,
    pub format: Option<String>, // "json", "bincode", "messagepack"
}

/// Main configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct SimulationConfig {
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub population: PopulationConfig,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub sensor: SensorConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub pointer: PointerConfig,
    pub output: OutputConfig,
}

fn default_seed() -> u64 {
    42
}

fn default_sensor_reach() -> f32 {
    6.0
}

fn default_sensor_half_size() -> u32 {
    1
}

fn default_sensor_offsets_pi() -> Vec<f32> {
    vec![-0.2, 0.0, 0.2]
}

fn default_record_interval() -> u32 {
    100
}

fn default_pointer_button() -> PointerButton {
    PointerButton::None
}

impl Default for PopulationConfig {
    fn default() -> Self {
        PopulationConfig { seed: default_seed() }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        SensorConfig {
            reach: default_sensor_reach(),
            half_size: default_sensor_half_size(),
            offsets_pi: default_sensor_offsets_pi(),
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        PointerConfig {
            enabled: false,
            x: 0.0,
            y: 0.0,
            button: PointerButton::None,
            start_tick: 0,
            end_tick: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            environment: EnvironmentConfig { width: 100, height: 100 },
            population: PopulationConfig::default(),
            settings: Settings::default(),
            sensor: SensorConfig::default(),
            timing: TimingConfig {
                total_ticks: 1000,
                record_interval_ticks: default_record_interval(),
            },
            pointer: PointerConfig::default(),
            output: OutputConfig {
                base_filename: "swarm".to_string(),
                save_positions: false,
                save_stats: true,
                save_frame_in_snapshot: false,
                format: Some("json".to_string()),
            },
        }
    }
}

impl SimulationConfig {
    /// Loads the configuration from a TOML file, validates it, and clamps settings into their domains.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let mut config: SimulationConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        config.settings = config.settings.clamped();
        Ok(config)
    }

    /// Rejects configurations the simulation cannot be built from.
    pub fn validate(&self) -> Result<()> {
        if self.environment.width == 0 || self.environment.height == 0 {
            anyhow::bail!(
                "environment dimensions must be positive, got {}x{}",
                self.environment.width,
                self.environment.height
            );
        }
        if self.settings.num_bots == 0 {
            anyhow::bail!("num_bots must be greater than 0.");
        }
        if self.settings.num_bot_groups == 0 {
            anyhow::bail!("num_bot_groups must be greater than 0.");
        }
        if self.sensor.offsets_pi.is_empty() {
            anyhow::bail!("sensor.offsets_pi must list at least one offset.");
        }
        if !(self.sensor.reach.is_finite() && self.sensor.reach >= 0.0) {
            anyhow::bail!("sensor.reach must be a non-negative number.");
        }
        if self.timing.record_interval_ticks == 0 {
            anyhow::bail!("timing.record_interval_ticks must be greater than 0.");
        }
        Ok(())
    }

    /// Converts the configuration into the fixed runtime parameters.
    pub fn sim_params(&self) -> SimParams {
        SimParams {
            env_width: self.environment.width,
            env_height: self.environment.height,
            sensor_reach: self.sensor.reach,
            sensor_half_size: self.sensor.half_size,
            sensor_offsets: self
                .sensor
                .offsets_pi
                .iter()
                .map(|o| o * std::f32::consts::PI)
                .collect(),
            seed: self.population.seed,
        }
    }
}
