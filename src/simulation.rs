use crate::color::Rgb;
use crate::error::{SwarmError, SwarmResult};
use crate::field::{RivalMean, TrailField};
use crate::grid::GridDims;
use crate::interaction::PointerState;
use crate::motion::{advance, BotMotion, MotionParams};
use crate::population::BotPopulation;
use crate::raster::deposit_group;
use crate::render::compose_rgb;
use crate::sensor::{self, SensorParams};
use log::{debug, info};
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use swarm_common::{SettingDomain, Settings, SimParams, SimulationConfig, Snapshot, Vec2};

// Spreads bot indices across the seed space for per-bot jitter RNGs
const BOT_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Owns the bots, the group trail fields and the RNG, and advances them one
/// tick at a time.
///
/// Settings come in by value through [`SwarmSimulation::apply_settings`];
/// readers only ever see state between ticks.
pub struct SwarmSimulation {
    config: SimulationConfig,
    params: SimParams,
    settings: Settings,
    population: BotPopulation,
    /// Sum of all group trails at the start of the tick, for rival sensing.
    aggregate: TrailField,
    /// Seeded RNG for placement, colors and per-tick jitter seeds.
    rng: StdRng,
    tick_count: u64,
    recorded_snapshots: Vec<Snapshot>,
}

impl SwarmSimulation {
    /// Builds the simulation from a configuration, seeding the RNG from `population.seed`.
    pub fn new(config: SimulationConfig) -> SwarmResult<Self> {
        let seed = config.sim_params().seed;
        debug!("Seeding simulation RNG with {}.", seed);
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Builds the simulation with an explicitly supplied RNG.
    pub fn with_rng(config: SimulationConfig, mut rng: StdRng) -> SwarmResult<Self> {
        let params = config.sim_params();
        if params.sensor_offsets.is_empty() {
            return Err(SwarmError::InvalidConfiguration(
                "at least one sensor offset is required".into(),
            ));
        }
        let dims = GridDims::new(params.env_width as usize, params.env_height as usize)?;
        let raw = config.settings;
        if raw.num_bots == 0 || raw.num_bot_groups == 0 {
            return Err(SwarmError::InvalidConfiguration(format!(
                "need at least one bot and one group, got {} bots / {} groups",
                raw.num_bots, raw.num_bot_groups
            )));
        }
        let settings = raw.clamped();

        let population = BotPopulation::new(
            dims,
            settings.num_bots as usize,
            settings.num_bot_groups as usize,
            &mut rng,
        )?;
        info!(
            "Simulation initialized: {}x{} environment, {} bots in {} groups.",
            dims.width,
            dims.height,
            population.len(),
            population.num_groups()
        );
        debug!("Simulation parameters: {:#?}", params);

        Ok(Self {
            config,
            params,
            settings,
            population,
            aggregate: TrailField::new(dims),
            rng,
            tick_count: 0,
            recorded_snapshots: Vec::new(),
        })
    }

    /// Copies UI settings in (clamped to their domains) and resizes the
    /// population if the bot or group count changed.
    pub fn apply_settings(&mut self, settings: Settings) -> SwarmResult<()> {
        let settings = settings.clamped();
        let num_bots = settings.num_bots as usize;
        let num_groups = settings.num_bot_groups as usize;
        if num_bots != self.population.len() || num_groups != self.population.num_groups() {
            self.population.resize(num_bots, num_groups, &mut self.rng)?;
        }
        self.settings = settings;
        Ok(())
    }

    /// Resizes the population. Zero bots or groups is rejected and leaves
    /// the state untouched; counts above their domain are clamped.
    pub fn resize(&mut self, num_bots: u32, num_groups: u32) -> SwarmResult<()> {
        if num_bots == 0 || num_groups == 0 {
            return Err(SwarmError::InvalidConfiguration(format!(
                "need at least one bot and one group, got {} bots / {} groups",
                num_bots, num_groups
            )));
        }
        let num_bots = SettingDomain::NUM_BOTS.clamp_count(num_bots);
        let num_groups = SettingDomain::NUM_BOT_GROUPS.clamp_count(num_groups);
        self.population
            .resize(num_bots as usize, num_groups as usize, &mut self.rng)?;
        self.settings.num_bots = num_bots;
        self.settings.num_bot_groups = num_groups;
        Ok(())
    }

    /// Advances the simulation by one tick.
    ///
    /// Order: save previous positions, sense and move every bot, deposit
    /// each group's paths, then blur and decay each group's trail. The
    /// pointer only acts when `pointer_enabled` is set and a button is held.
    pub fn tick(&mut self, pointer_enabled: bool, pointer: PointerState) {
        let settings = self.settings;
        let num_groups = self.population.num_groups();

        // --- 1. Save previous positions ---
        self.population.save_previous();

        // --- 2. Snapshot the all-groups trail sum for rival sensing ---
        if num_groups > 1 {
            self.aggregate
                .set_to_sum(self.population.groups.iter().map(|g| &g.trail));
        }

        // --- 3. Sense, nudge, jitter, move, reflect (parallel per bot) ---
        let sensor_params = SensorParams::from_params(&self.params, settings.avoidance);
        let dims = self.population.dims();
        let motion_params = MotionParams {
            speed: settings.bot_speed,
            angle_nudge: settings.angle_nudge,
            pointer_range: settings.mouse_range,
            pointer_strength: settings.mouse_strength,
            max_x: dims.max_x(),
            max_y: dims.max_y(),
        };
        let pointer = (pointer_enabled && pointer.is_pressed()).then_some(pointer);
        let tick_seed: u64 = self.rng.random();
        let randomness = settings.randomness;

        let BotPopulation {
            positions_x,
            positions_y,
            angles,
            membership,
            groups,
            ..
        } = &mut self.population;
        let groups: &[_] = groups;
        let aggregate = &self.aggregate;

        positions_x
            .par_iter_mut()
            .zip(positions_y.par_iter_mut())
            .zip(angles.par_iter_mut())
            .zip(membership.par_iter())
            .enumerate()
            .for_each(|(idx, (((x, y), angle), &group))| {
                let pos = Vec2::new(*x, *y);
                let own = &groups[group as usize].trail;

                let preference = if num_groups > 1 {
                    let rivals = RivalMean::new(aggregate, own, num_groups - 1);
                    sensor::read(own, Some(&rivals), pos, *angle, &sensor_params)
                } else {
                    sensor::read::<_, TrailField>(own, None, pos, *angle, &sensor_params)
                };

                let jitter = if randomness > 0.0 {
                    let mut rng = StdRng::seed_from_u64(
                        tick_seed ^ (idx as u64).wrapping_mul(BOT_SEED_STRIDE),
                    );
                    rng.random_range(-randomness..=randomness)
                } else {
                    0.0
                };

                let bot = BotMotion { pos, angle: *angle };
                let next = advance(bot, preference, pointer.as_ref(), jitter, &motion_params);
                *x = next.pos.x;
                *y = next.pos.y;
                *angle = next.angle;
            });

        // --- 4. Rasterize paths into each group's trail (parallel per group) ---
        let population = &mut self.population;
        let (prev_x, prev_y) = (&population.prev_x, &population.prev_y);
        let (pos_x, pos_y) = (&population.positions_x, &population.positions_y);
        population
            .groups
            .par_iter_mut()
            .zip(population.group_ranges.par_iter())
            .for_each(|(group, range)| {
                deposit_group(
                    &mut group.trail,
                    &prev_x[range.clone()],
                    &prev_y[range.clone()],
                    &pos_x[range.clone()],
                    &pos_y[range.clone()],
                );
            });

        // --- 5. Diffuse and decay (parallel per group) ---
        population.groups.par_iter_mut().for_each(|group| {
            group.trail.blur(settings.blur_factor);
            group.trail.decay(settings.decay);
        });

        self.tick_count += 1;
    }

    /// Moves every bot to the environment center.
    pub fn reset_positions(&mut self) {
        info!("Resetting bot positions to the environment center.");
        self.population.reset_positions();
    }

    /// Zeroes every group's trail.
    pub fn reset_trails(&mut self) {
        info!("Resetting trails.");
        self.population.reset_trails();
    }

    /// Gives every group a new vivid color.
    pub fn randomize_colors(&mut self) {
        self.population.randomize_colors(&mut self.rng);
    }

    /// Gives every group a distinct color from a coarse RGB lattice.
    pub fn randomize_colors_distinct(&mut self) {
        self.population.randomize_colors_distinct(&mut self.rng);
    }

    /// Composed RGB output for the renderer, row-major (`y * width + x`).
    pub fn rgb_frame(&self) -> Vec<Rgb> {
        compose_rgb(&self.population, self.settings.brightness, self.settings.bot_accent)
    }

    /// Collects population and trail statistics into a snapshot.
    pub fn record_snapshot(&mut self) {
        debug!("Recording snapshot at tick {}...", self.tick_count);
        let groups = self.population.groups();

        let group_trail_mass: Vec<f32> = groups.par_iter().map(|g| g.trail.mass()).collect();
        let group_trail_peak: Vec<f32> = groups.par_iter().map(|g| g.trail.peak()).collect();

        let occupied_cells = self.population.occupied_cells().into_iter().filter(|&o| o).count() as u32;

        let frame = if self.config.output.save_frame_in_snapshot {
            Some(self.rgb_frame())
        } else {
            None
        };

        let snapshot = Snapshot {
            tick: self.tick_count,
            num_bots: self.population.len() as u32,
            num_groups: self.population.num_groups() as u32,
            group_member_counts: self
                .population
                .member_counts()
                .into_iter()
                .map(|c| c as u32)
                .collect(),
            group_trail_mass,
            group_trail_peak,
            occupied_cells,
            frame,
        };
        self.recorded_snapshots.push(snapshot);
    }

    pub fn recorded_snapshots(&self) -> &[Snapshot] {
        &self.recorded_snapshots
    }

    /// Final bot positions with their group id.
    pub fn get_results(&self) -> Vec<(f32, f32, u32)> {
        self.population
            .positions()
            .zip(self.population.membership())
            .map(|(p, &g)| (p.x, p.y, g))
            .collect()
    }

    /// Total trail mass over all groups.
    pub fn total_trail_mass(&self) -> f32 {
        self.population.groups().iter().map(|g| g.trail.mass()).sum()
    }

    pub fn population(&self) -> &BotPopulation {
        &self.population
    }

    /// Mutable access for tools that place bots or seed trails directly.
    /// Must not be used while a tick is running.
    pub fn population_mut(&mut self) -> &mut BotPopulation {
        &mut self.population
    }

    pub fn trail(&self, group: usize) -> Option<&TrailField> {
        self.population.groups().get(group).map(|g| &g.trail)
    }

    pub fn group_colors(&self) -> Vec<Rgb> {
        self.population.groups().iter().map(|g| g.color).collect()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn dims(&self) -> GridDims {
        self.population.dims()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32, settings: Settings) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.environment.width = width;
        config.environment.height = height;
        config.settings = settings;
        config
    }

    #[test]
    fn zero_environment_is_rejected() {
        let err = SwarmSimulation::new(config(0, 10, Settings::default())).err();
        assert!(matches!(err, Some(SwarmError::InvalidConfiguration(_))));
    }

    #[test]
    fn same_seed_replays_identically() {
        let settings = Settings { num_bots: 200, num_bot_groups: 3, ..Settings::default() };
        let mut a = SwarmSimulation::new(config(60, 40, settings)).unwrap();
        let mut b = SwarmSimulation::new(config(60, 40, settings)).unwrap();
        let pointer = PointerState::new(Vec2::new(30.0, 20.0), true, false);
        for _ in 0..25 {
            a.tick(true, pointer);
            b.tick(true, pointer);
        }
        assert_eq!(a.get_results(), b.get_results());
        assert_eq!(a.population().angles(), b.population().angles());
        assert_eq!(a.trail(2).unwrap().cells(), b.trail(2).unwrap().cells());
    }

    #[test]
    fn apply_settings_resizes_and_clamps() {
        let mut sim = SwarmSimulation::new(config(30, 30, Settings::default())).unwrap();
        let wanted = Settings { num_bots: 25, num_bot_groups: 20, decay: 3.0, ..Settings::default() };
        sim.apply_settings(wanted).unwrap();
        assert_eq!(sim.population().len(), 25);
        assert_eq!(sim.population().num_groups(), 8);
        assert_eq!(sim.settings().decay, 0.4);
    }

    #[test]
    fn resize_rejects_zero_and_keeps_state() {
        let mut sim = SwarmSimulation::new(config(30, 30, Settings::default())).unwrap();
        let before = sim.get_results();
        assert!(sim.resize(0, 2).is_err());
        assert!(sim.resize(10, 0).is_err());
        assert_eq!(sim.get_results(), before);
        assert_eq!(sim.settings().num_bots, 1000);
    }

    #[test]
    fn ticks_deposit_trail_and_snapshots_record_it() {
        let settings = Settings { num_bots: 50, num_bot_groups: 2, decay: 0.0, ..Settings::default() };
        let mut sim = SwarmSimulation::new(config(40, 40, settings)).unwrap();
        sim.tick(false, PointerState::default());
        assert_eq!(sim.tick_count(), 1);
        assert!(sim.total_trail_mass() > 0.0);

        sim.record_snapshot();
        let snap = &sim.recorded_snapshots()[0];
        assert_eq!(snap.tick, 1);
        assert_eq!(snap.group_member_counts, vec![25, 25]);
        assert!(snap.group_trail_mass.iter().all(|&m| m > 0.0));
        assert!(snap.occupied_cells > 0);
        assert!(snap.frame.is_none());
    }

    #[test]
    fn configured_seed_drives_the_rng() {
        let mut cfg = config(30, 30, Settings { num_bots: 40, ..Settings::default() });
        cfg.population.seed = 1234;
        let from_config = SwarmSimulation::new(cfg.clone()).unwrap();
        let explicit = SwarmSimulation::with_rng(cfg.clone(), StdRng::seed_from_u64(1234)).unwrap();
        assert_eq!(from_config.get_results(), explicit.get_results());

        cfg.population.seed = 1235;
        let other = SwarmSimulation::new(cfg).unwrap();
        assert_ne!(from_config.get_results(), other.get_results());
    }

    #[test]
    fn stacked_bots_count_as_one_occupied_cell() {
        let settings = Settings { num_bots: 30, num_bot_groups: 3, bot_accent: 1.0, ..Settings::default() };
        let mut sim = SwarmSimulation::new(config(20, 10, settings)).unwrap();
        sim.reset_positions();
        sim.record_snapshot();
        assert_eq!(sim.recorded_snapshots()[0].occupied_cells, 1);

        // The same cell is the only one the renderer accents
        let frame = sim.rgb_frame();
        let lit: Vec<usize> = (0..frame.len()).filter(|&i| frame[i] != [0.0; 3]).collect();
        assert_eq!(lit, vec![sim.dims().cell_idx(9, 4)]);
    }

    #[test]
    fn control_operations() {
        let settings = Settings { num_bots: 30, num_bot_groups: 2, ..Settings::default() };
        let mut sim = SwarmSimulation::new(config(20, 10, settings)).unwrap();
        for _ in 0..5 {
            sim.tick(false, PointerState::default());
        }
        sim.reset_trails();
        assert_eq!(sim.total_trail_mass(), 0.0);

        sim.reset_positions();
        assert!(sim.get_results().iter().all(|&(x, y, _)| x == 9.5 && y == 4.5));

        let frame = sim.rgb_frame();
        assert_eq!(frame.len(), 200);
        sim.randomize_colors();
        assert_eq!(sim.group_colors().len(), 2);
    }
}
