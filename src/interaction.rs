//! Pointer attraction and repulsion.
//!
//! The pointer position arrives already translated into environment
//! coordinates; screen, pan and zoom handling belong to the UI layer.

use swarm_common::{clamp, signed_angle_delta, vec_to_angle, PointerButton, PointerConfig, Vec2};

/// Share of the heading error toward the pointer corrected per tick at full strength.
pub const POINTER_TURN_RATE: f32 = 0.1;

/// Pointer state as seen by the simulation for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Pointer position in environment coordinates.
    pub pos: Vec2,
    /// Left button: attract.
    pub left_held: bool,
    /// Right button: repel.
    pub right_held: bool,
}

impl PointerState {
    pub fn new(pos: Vec2, left_held: bool, right_held: bool) -> Self {
        PointerState { pos, left_held, right_held }
    }

    pub fn is_pressed(&self) -> bool {
        self.left_held || self.right_held
    }

    /// Pointer described by a scripted config section at `tick`, or `None`
    /// when the script is disabled or outside its tick window.
    pub fn from_config(config: &PointerConfig, tick: u32) -> Option<Self> {
        if !config.enabled || tick < config.start_tick {
            return None;
        }
        if config.end_tick.is_some_and(|end| tick >= end) {
            return None;
        }
        let pos = Vec2::new(config.x, config.y);
        Some(match config.button {
            PointerButton::None => PointerState::new(pos, false, false),
            PointerButton::Attract => PointerState::new(pos, true, false),
            PointerButton::Repel => PointerState::new(pos, false, true),
        })
    }
}

/// Displacement and heading change a pointer applies to one bot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerNudge {
    pub displacement: Vec2,
    pub turn: f32,
}

/// Force of `pointer` on a bot at `pos` heading `angle`.
///
/// Strength falls off linearly from 1 at the pointer to 0 at `range`. A bot
/// sitting exactly on the pointer has no direction to move in and gets no nudge.
pub fn pointer_nudge(pos: Vec2, angle: f32, pointer: &PointerState, range: f32, strength: f32) -> PointerNudge {
    if !pointer.is_pressed() || range <= 0.0 {
        return PointerNudge::default();
    }
    let to_pointer = pointer.pos - pos;
    let distance = to_pointer.length();
    if distance == 0.0 {
        return PointerNudge::default();
    }

    let dist_factor = 1.0 - clamp(distance, 0.0, range) / range;
    let unit = to_pointer / distance;
    let heading_error = signed_angle_delta(angle, vec_to_angle(to_pointer));

    let pull = unit * (dist_factor * strength);
    let turn = POINTER_TURN_RATE * dist_factor * heading_error;

    let mut nudge = PointerNudge::default();
    if pointer.left_held {
        nudge.displacement += pull;
        nudge.turn += turn;
    }
    if pointer.right_held {
        nudge.displacement += -pull;
        nudge.turn -= turn;
    }
    nudge
}
