use serde::{Deserialize, Serialize};

/// Closed interval a UI-supplied knob is allowed to take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettingDomain {
    pub min: f32,
    pub max: f32,
}

impl SettingDomain {
    pub const fn new(min: f32, max: f32) -> Self {
        SettingDomain { min, max }
    }

    #[inline]
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        value.max(self.min).min(self.max)
    }

    #[inline]
    pub fn clamp_count(self, value: u32) -> u32 {
        (value as f32).max(self.min).min(self.max) as u32
    }
}

impl SettingDomain {
    pub const BRIGHTNESS: SettingDomain = SettingDomain::new(0.0, 1.0);
    pub const BOT_ACCENT: SettingDomain = SettingDomain::new(0.0, 1.0);
    pub const BLUR_FACTOR: SettingDomain = SettingDomain::new(0.0, 0.5);
    pub const DECAY: SettingDomain = SettingDomain::new(0.0, 0.4);
    pub const BOT_SPEED: SettingDomain = SettingDomain::new(0.0, 4.0);
    pub const RANDOMNESS: SettingDomain = SettingDomain::new(0.0, 1.0);
    pub const ANGLE_NUDGE: SettingDomain = SettingDomain::new(0.0, 1.0);
    pub const AVOIDANCE: SettingDomain = SettingDomain::new(0.0, 1.0);
    pub const MOUSE_RANGE: SettingDomain = SettingDomain::new(10.0, 200.0);
    pub const MOUSE_STRENGTH: SettingDomain = SettingDomain::new(0.0, 5.0);
    pub const NUM_BOTS: SettingDomain = SettingDomain::new(1.0, 10_000.0);
    pub const NUM_BOT_GROUPS: SettingDomain = SettingDomain::new(1.0, 8.0);
}

/// Numeric knobs written by the UI layer and copied into the simulation by value.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Output scaling of the composed color field.
    pub brightness: f32,
    /// Extra brightness added to cells occupied by a bot.
    pub bot_accent: f32,
    pub blur_factor: f32,
    /// Fraction of every trail cell lost per tick.
    pub decay: f32,
    /// Displacement per tick, in environment units.
    pub bot_speed: f32,
    /// Maximum angular jitter per tick (radians).
    pub randomness: f32,
    pub angle_nudge: f32,
    /// Weight of rival-group trail in steering.
    pub avoidance: f32,
    pub mouse_range: f32,
    pub mouse_strength: f32,
    pub num_bots: u32,
    pub num_bot_groups: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            brightness: 1.0,
            bot_accent: 0.3,
            blur_factor: 0.2,
            decay: 0.05,
            bot_speed: 1.0,
            randomness: 0.1,
            angle_nudge: 0.3,
            avoidance: 0.5,
            mouse_range: 50.0,
            mouse_strength: 1.0,
            num_bots: 1000,
            num_bot_groups: 2,
        }
    }
}

impl Settings {
    /// Returns a copy with every knob clamped into its declared domain.
    pub fn clamped(&self) -> Settings {
        let clamped = Settings {
            brightness: SettingDomain::BRIGHTNESS.clamp(self.brightness),
            bot_accent: SettingDomain::BOT_ACCENT.clamp(self.bot_accent),
            blur_factor: SettingDomain::BLUR_FACTOR.clamp(self.blur_factor),
            decay: SettingDomain::DECAY.clamp(self.decay),
            bot_speed: SettingDomain::BOT_SPEED.clamp(self.bot_speed),
            randomness: SettingDomain::RANDOMNESS.clamp(self.randomness),
            angle_nudge: SettingDomain::ANGLE_NUDGE.clamp(self.angle_nudge),
            avoidance: SettingDomain::AVOIDANCE.clamp(self.avoidance),
            mouse_range: SettingDomain::MOUSE_RANGE.clamp(self.mouse_range),
            mouse_strength: SettingDomain::MOUSE_STRENGTH.clamp(self.mouse_strength),
            num_bots: SettingDomain::NUM_BOTS.clamp_count(self.num_bots),
            num_bot_groups: SettingDomain::NUM_BOT_GROUPS.clamp_count(self.num_bot_groups),
        };
        if clamped != *self {
            log::trace!("Settings clamped into their domains: {:?}", clamped);
        }
        clamped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_values_are_clamped() {
        let wild = Settings {
            blur_factor: 0.9,
            decay: -1.0,
            mouse_range: 1.0,
            bot_speed: f32::NAN,
            num_bots: 0,
            num_bot_groups: 50,
            ..Settings::default()
        };
        let s = wild.clamped();
        assert_eq!(s.blur_factor, 0.5);
        assert_eq!(s.decay, 0.0);
        assert_eq!(s.mouse_range, 10.0);
        assert_eq!(s.bot_speed, 0.0);
        assert_eq!(s.num_bots, 1);
        assert_eq!(s.num_bot_groups, 8);
    }

    #[test]
    fn defaults_are_inside_their_domains() {
        let d = Settings::default();
        assert_eq!(d.clamped(), d);
    }
}
