//! Multi-group trail-following swarm simulation.
//!
//! Bots steer by sampling their own group's diffusing trail (and, with more
//! than one group, avoiding the others'), deposit along the path they
//! travel, bounce off the environment edges and can be pushed around by a
//! pointer. [`SwarmSimulation`] owns everything and advances it a tick at a
//! time; the composed RGB field is the only output a renderer needs.

pub mod color;
pub mod error;
pub mod field;
pub mod grid;
pub mod interaction;
pub mod motion;
pub mod population;
pub mod raster;
pub mod render;
pub mod sensor;
pub mod simulation;

pub use error::{SwarmError, SwarmResult};
pub use field::{RivalMean, TrailField, TrailSampler};
pub use grid::GridDims;
pub use interaction::{PointerNudge, PointerState};
pub use population::{BotPopulation, Group};
pub use simulation::SwarmSimulation;
pub use swarm_common::{Settings, SimulationConfig, Snapshot, Vec2};
