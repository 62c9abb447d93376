//! Per-bot heading and position update with boundary reflection.

use crate::interaction::{pointer_nudge, PointerState};
use std::f32::consts::PI;
use swarm_common::{angle_to_vec, wrap_angle, Vec2};

/// Knobs the integrator reads each tick.
#[derive(Debug, Clone, Copy)]
pub struct MotionParams {
    pub speed: f32,
    pub angle_nudge: f32,
    /// Pointer influence radius and force.
    pub pointer_range: f32,
    pub pointer_strength: f32,
    pub max_x: f32,
    pub max_y: f32,
}

/// Kinematic state of one bot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotMotion {
    pub pos: Vec2,
    pub angle: f32,
}

/// Advances one bot by a tick.
///
/// Order: sensor steering, pointer nudge, random jitter, move at `speed`,
/// reflect at the boundaries, wrap the heading into [0, 2π). The pointer
/// turn is measured from the already steered heading. `jitter` is the
/// already-drawn uniform sample in `[-randomness, randomness]`.
pub fn advance(
    bot: BotMotion,
    preference: f32,
    pointer: Option<&PointerState>,
    jitter: f32,
    params: &MotionParams,
) -> BotMotion {
    let mut angle = bot.angle + params.angle_nudge * preference;

    let mut pos = bot.pos;
    if let Some(pointer) = pointer {
        let nudge = pointer_nudge(pos, angle, pointer, params.pointer_range, params.pointer_strength);
        pos += nudge.displacement;
        angle += nudge.turn;
    }

    angle += jitter;

    pos += angle_to_vec(angle) * params.speed;

    reflect(&mut pos, &mut angle, params.max_x, params.max_y);

    BotMotion { pos, angle: wrap_angle(angle) }
}

/// Mirrors position and heading off the environment edges.
///
/// The x rule runs first and the y rule then reads the heading it left
/// behind, so a bot out on both axes at once is mirrored twice. A bot pushed
/// further than one environment width past an edge is clamped onto it.
pub fn reflect(pos: &mut Vec2, angle: &mut f32, max_x: f32, max_y: f32) {
    if pos.x < 0.0 {
        *angle = PI - *angle;
        pos.x = -pos.x;
    } else if pos.x > max_x {
        *angle = PI - *angle;
        pos.x = 2.0 * max_x - pos.x;
    }

    if pos.y < 0.0 {
        *angle = -*angle;
        pos.y = -pos.y;
    } else if pos.y > max_y {
        *angle = -*angle;
        pos.y = 2.0 * max_y - pos.y;
    }

    pos.x = pos.x.clamp(0.0, max_x);
    pos.y = pos.y.clamp(0.0, max_y);
}
