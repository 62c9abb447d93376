use crate::color::{random_different, random_vibrant, Rgb};
use crate::error::{SwarmError, SwarmResult};
use crate::field::TrailField;
use crate::grid::GridDims;
use rand::Rng;
use std::f32::consts::TAU;
use std::ops::Range;
use swarm_common::Vec2;

/// A set of bots sharing one trail field and display color.
#[derive(Debug, Clone)]
pub struct Group {
    pub trail: TrailField,
    pub color: Rgb,
}

/// Holds the bots (structure-of-arrays) and the group arena.
///
/// Resizing appends or truncates; surviving bots and groups keep their index
/// and state. Group membership is contiguous: group `g` owns the bots in
/// `group_range(g)`.
#[derive(Debug)]
pub struct BotPopulation {
    dims: GridDims,

    // --- Per-bot state, all of length `len()` ---
    pub(crate) positions_x: Vec<f32>,
    pub(crate) positions_y: Vec<f32>,
    // Positions at the start of the current tick
    pub(crate) prev_x: Vec<f32>,
    pub(crate) prev_y: Vec<f32>,
    pub(crate) angles: Vec<f32>,
    pub(crate) membership: Vec<u32>,

    // --- Groups ---
    pub(crate) groups: Vec<Group>,
    pub(crate) group_ranges: Vec<Range<usize>>,
}

impl BotPopulation {
    /// Creates a population of `num_bots` randomly placed bots split across `num_groups` groups.
    pub fn new<R: Rng>(dims: GridDims, num_bots: usize, num_groups: usize, rng: &mut R) -> SwarmResult<Self> {
        validate_sizes(num_bots, num_groups)?;
        let mut population = BotPopulation {
            dims,
            positions_x: Vec::new(),
            positions_y: Vec::new(),
            prev_x: Vec::new(),
            prev_y: Vec::new(),
            angles: Vec::new(),
            membership: Vec::new(),
            groups: Vec::new(),
            group_ranges: Vec::new(),
        };
        population.resize(num_bots, num_groups, rng)?;
        Ok(population)
    }

    /// Grows or shrinks the bot and group sets, then recomputes membership.
    ///
    /// New bots are placed uniformly over the environment with a uniform
    /// heading; new groups start with a zeroed trail and a fresh vivid color.
    /// Removed bots and groups are always the highest-indexed ones. Zero bots
    /// or zero groups is rejected before anything changes.
    pub fn resize<R: Rng>(&mut self, num_bots: usize, num_groups: usize, rng: &mut R) -> SwarmResult<()> {
        validate_sizes(num_bots, num_groups)?;
        let old_bots = self.len();
        let old_groups = self.num_groups();

        if num_groups > old_groups {
            for _ in old_groups..num_groups {
                self.groups.push(Group {
                    trail: TrailField::new(self.dims),
                    color: random_vibrant(rng),
                });
            }
        } else {
            self.groups.truncate(num_groups);
        }

        if num_bots > old_bots {
            self.reserve(num_bots - old_bots);
            let max_x = self.dims.max_x();
            let max_y = self.dims.max_y();
            for _ in old_bots..num_bots {
                let x = rng.random_range(0.0..=max_x);
                let y = rng.random_range(0.0..=max_y);
                let angle = rng.random_range(0.0..TAU);
                self.push_bot(Vec2::new(x, y), angle);
            }
        } else {
            self.positions_x.truncate(num_bots);
            self.positions_y.truncate(num_bots);
            self.prev_x.truncate(num_bots);
            self.prev_y.truncate(num_bots);
            self.angles.truncate(num_bots);
        }

        self.assign_membership();

        if old_bots != num_bots || old_groups != num_groups {
            log::info!(
                "Population resized from {} bots / {} groups to {} bots / {} groups.",
                old_bots,
                old_groups,
                num_bots,
                num_groups
            );
        }
        Ok(())
    }

    fn reserve(&mut self, additional: usize) {
        self.positions_x.reserve(additional);
        self.positions_y.reserve(additional);
        self.prev_x.reserve(additional);
        self.prev_y.reserve(additional);
        self.angles.reserve(additional);
        self.membership.reserve(additional);
    }

    fn push_bot(&mut self, pos: Vec2, angle: f32) {
        self.positions_x.push(pos.x);
        self.positions_y.push(pos.y);
        self.prev_x.push(pos.x);
        self.prev_y.push(pos.y);
        self.angles.push(angle);
    }

    /// Even split with the remainder going one each to the lowest-indexed groups.
    fn assign_membership(&mut self) {
        let num_bots = self.len();
        let num_groups = self.num_groups();
        let base = num_bots / num_groups;
        let remainder = num_bots % num_groups;

        self.group_ranges.clear();
        self.membership.clear();
        let mut start = 0;
        for g in 0..num_groups {
            let count = base + usize::from(g < remainder);
            self.group_ranges.push(start..start + count);
            self.membership.extend(std::iter::repeat(g as u32).take(count));
            start += count;
        }
    }

    /// Moves every bot to the environment center. Headings are kept.
    pub fn reset_positions(&mut self) {
        let center = self.dims.center();
        self.positions_x.iter_mut().for_each(|x| *x = center.x);
        self.positions_y.iter_mut().for_each(|y| *y = center.y);
        self.save_previous();
    }

    /// Zeroes every group's trail.
    pub fn reset_trails(&mut self) {
        self.groups.iter_mut().for_each(|g| g.trail.reset());
    }

    /// Gives every group a new vivid color.
    pub fn randomize_colors<R: Rng>(&mut self, rng: &mut R) {
        for group in &mut self.groups {
            group.color = random_vibrant(rng);
        }
    }

    /// Gives the groups colors drawn from a coarse RGB lattice, all distinct.
    pub fn randomize_colors_distinct<R: Rng>(&mut self, rng: &mut R) {
        let colors = random_different(self.groups.len(), rng);
        for (group, color) in self.groups.iter_mut().zip(colors) {
            group.color = color;
        }
    }

    /// Copies current positions into the previous-position buffers.
    pub fn save_previous(&mut self) {
        self.prev_x.copy_from_slice(&self.positions_x);
        self.prev_y.copy_from_slice(&self.positions_y);
    }

    /// Places bot `idx` at `pos` (clamped into the environment) with heading `angle`.
    pub fn set_bot(&mut self, idx: usize, pos: Vec2, angle: f32) -> SwarmResult<()> {
        if idx >= self.len() {
            return Err(SwarmError::BotIndexOutOfRange { index: idx, len: self.len() });
        }
        let x = pos.x.clamp(0.0, self.dims.max_x());
        let y = pos.y.clamp(0.0, self.dims.max_y());
        self.positions_x[idx] = x;
        self.positions_y[idx] = y;
        self.prev_x[idx] = x;
        self.prev_y[idx] = y;
        self.angles[idx] = swarm_common::wrap_angle(angle);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.positions_x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions_x.is_empty()
    }

    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn position(&self, idx: usize) -> Vec2 {
        Vec2::new(self.positions_x[idx], self.positions_y[idx])
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.positions_x
            .iter()
            .zip(&self.positions_y)
            .map(|(&x, &y)| Vec2::new(x, y))
    }

    /// Per-cell flag, row-major, set where at least one bot sits.
    pub fn occupied_cells(&self) -> Vec<bool> {
        let mut occupied = vec![false; self.dims.num_cells()];
        for pos in self.positions() {
            if let Some(idx) = self.dims.cell_of(pos) {
                occupied[idx] = true;
            }
        }
        occupied
    }

    pub fn angles(&self) -> &[f32] {
        &self.angles
    }

    /// Group id of every bot.
    pub fn membership(&self) -> &[u32] {
        &self.membership
    }

    pub fn group_range(&self, group: usize) -> Range<usize> {
        self.group_ranges[group].clone()
    }

    pub fn member_counts(&self) -> Vec<usize> {
        self.group_ranges.iter().map(|r| r.len()).collect()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_mut(&mut self, group: usize) -> Option<&mut Group> {
        self.groups.get_mut(group)
    }
}

fn validate_sizes(num_bots: usize, num_groups: usize) -> SwarmResult<()> {
    if num_bots == 0 {
        return Err(SwarmError::InvalidConfiguration("num_bots must be greater than 0".into()));
    }
    if num_groups == 0 {
        return Err(SwarmError::InvalidConfiguration("num_bot_groups must be greater than 0".into()));
    }
    Ok(())
}
