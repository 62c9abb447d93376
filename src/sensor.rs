//! Steering sensors: sample trail windows ahead of a bot along candidate
//! headings and pick the most attractive one.

use crate::field::TrailSampler;
use swarm_common::{angle_to_vec, SimParams, Vec2};

/// Sensor geometry plus the rival-trail weight.
#[derive(Debug, Clone)]
pub struct SensorParams {
    /// Distance from the bot to each sample point.
    pub reach: f32,
    /// Half-width of the square window summed at each sample point.
    pub half_size: usize,
    /// Candidate heading offsets (radians, relative to the bot's heading).
    pub offsets: Vec<f32>,
    /// Weight of rival trail versus own trail, in [0, 1].
    pub avoidance: f32,
}

impl SensorParams {
    pub fn from_params(params: &SimParams, avoidance: f32) -> Self {
        SensorParams {
            reach: params.sensor_reach,
            half_size: params.sensor_half_size as usize,
            offsets: params.sensor_offsets.clone(),
            avoidance,
        }
    }
}

/// Combined score of one sample point.
#[inline(always)]
fn score<O, R>(own: &O, rivals: Option<&R>, cx: i64, cy: i64, sensor: &SensorParams) -> f32
where
    O: TrailSampler,
    R: TrailSampler,
{
    let own_sum = own.window_sum(cx, cy, sensor.half_size);
    match rivals {
        Some(rivals) => {
            let rival_sum = rivals.window_sum(cx, cy, sensor.half_size);
            (1.0 - sensor.avoidance) * own_sum - sensor.avoidance * rival_sum
        }
        None => own_sum,
    }
}

/// Returns the heading offset whose sample window scores highest.
///
/// With `rivals` present the score is
/// `(1 - avoidance) * own - avoidance * rival`; without it, the own-trail sum.
/// Ties go to the first offset in `sensor.offsets`. Returns 0 when no offsets
/// are configured.
pub fn read<O, R>(own: &O, rivals: Option<&R>, pos: Vec2, angle: f32, sensor: &SensorParams) -> f32
where
    O: TrailSampler,
    R: TrailSampler,
{
    let mut best_offset = 0.0;
    let mut best_score = f32::NEG_INFINITY;

    for &offset in &sensor.offsets {
        let sample = pos + angle_to_vec(angle + offset) * sensor.reach;
        let value = score(own, rivals, sample.x as i64, sample.y as i64, sensor);
        if value > best_score {
            best_score = value;
            best_offset = offset;
        }
    }
    best_offset
}
