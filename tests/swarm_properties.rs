use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use swarm_engine::field::TrailField;
use swarm_engine::raster::deposit_segment;
use swarm_engine::sensor::{self, SensorParams};
use swarm_engine::{GridDims, PointerState, Settings, SimulationConfig, SwarmSimulation, Vec2};

fn config(width: u32, height: u32, settings: Settings, seed: u64) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.environment.width = width;
    config.environment.height = height;
    config.population.seed = seed;
    config.settings = settings;
    config
}

fn still_settings() -> Settings {
    Settings {
        num_bots: 1,
        num_bot_groups: 1,
        bot_speed: 0.0,
        randomness: 0.0,
        angle_nudge: 0.0,
        ..Settings::default()
    }
}

#[test]
fn bots_stay_in_bounds_with_normalized_headings() {
    let settings = Settings {
        num_bots: 400,
        num_bot_groups: 3,
        bot_speed: 4.0,
        randomness: 1.0,
        angle_nudge: 1.0,
        mouse_strength: 5.0,
        mouse_range: 200.0,
        ..Settings::default()
    };
    let mut sim = SwarmSimulation::new(config(25, 17, settings, 9)).unwrap();
    for tick in 0..200 {
        let pointer = PointerState::new(Vec2::new(3.0, 15.0), tick % 3 == 0, tick % 5 == 0);
        sim.tick(true, pointer);
        for (x, y, _) in sim.get_results() {
            assert!((0.0..=24.0).contains(&x), "x = {} at tick {}", x, tick);
            assert!((0.0..=16.0).contains(&y), "y = {} at tick {}", y, tick);
        }
        for &a in sim.population().angles() {
            assert!((0.0..TAU).contains(&a), "angle = {} at tick {}", a, tick);
        }
    }
}

#[test]
fn membership_is_conserved_across_resizes() {
    let mut sim = SwarmSimulation::new(config(50, 50, Settings::default(), 1)).unwrap();
    for &(bots, groups) in &[(7u32, 3u32), (1, 1), (1000, 8), (999, 8), (13, 5), (10_000, 2), (3, 4)] {
        sim.resize(bots, groups).unwrap();
        let pop = sim.population();
        let counts = pop.member_counts();
        assert_eq!(counts.iter().sum::<usize>(), bots as usize);
        assert_eq!(pop.membership().len(), bots as usize);
        assert!(pop.membership().iter().all(|&g| (g as usize) < groups as usize));
        let max = *counts.iter().max().unwrap();
        let min = *counts.iter().min().unwrap();
        assert!(max - min <= 1);
        // Larger shares come first
        assert!(counts.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn rasterized_segments_are_connected() {
    let dims = GridDims::new(40, 40).unwrap();
    let segments = [
        (Vec2::new(1.2, 3.7), Vec2::new(9.9, 4.1)),
        (Vec2::new(20.5, 20.5), Vec2::new(23.3, 35.6)),
        (Vec2::new(30.1, 2.2), Vec2::new(5.7, 27.9)),
        (Vec2::new(0.0, 39.0), Vec2::new(2.6, 36.3)),
        (Vec2::new(12.4, 12.4), Vec2::new(12.6, 12.9)),
    ];
    for (prev, pos) in segments {
        let mut field = TrailField::new(dims);
        deposit_segment(&mut field, prev, pos);

        let cells: HashSet<(usize, usize)> = (0..dims.height)
            .flat_map(|y| (0..dims.width).map(move |x| (x, y)))
            .filter(|&(x, y)| field.get(x, y) > 0.0)
            .collect();
        assert!(cells.contains(&(prev.x as usize, prev.y as usize)));
        assert!(cells.contains(&(pos.x as usize, pos.y as usize)));

        // Flood fill over 8-neighbourhood reaches every deposited cell
        let start = (prev.x as usize, prev.y as usize);
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some((x, y)) = stack.pop() {
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let n = ((x as i64 + dx) as usize, (y as i64 + dy) as usize);
                    if cells.contains(&n) && seen.insert(n) {
                        stack.push(n);
                    }
                }
            }
        }
        assert_eq!(seen.len(), cells.len(), "gap in segment {:?} -> {:?}", prev, pos);
    }
}

#[test]
fn trail_values_stay_in_unit_interval() {
    let settings = Settings {
        num_bots: 300,
        num_bot_groups: 2,
        bot_speed: 3.0,
        blur_factor: 0.5,
        decay: 0.0,
        ..Settings::default()
    };
    let mut sim = SwarmSimulation::new(config(30, 30, settings, 5)).unwrap();
    for round in 0..60 {
        if round == 30 {
            let mut s = *sim.settings();
            s.decay = 0.4;
            s.blur_factor = 0.1;
            sim.apply_settings(s).unwrap();
        }
        sim.tick(false, PointerState::default());
        for g in 0..2 {
            let trail = sim.trail(g).unwrap();
            assert!(trail.cells().iter().all(|&v| (0.0..=1.0 + 1e-6).contains(&v)));
        }
    }
}

#[test]
fn zero_speed_bot_never_moves() {
    let mut sim = SwarmSimulation::new(config(10, 10, still_settings(), 3)).unwrap();
    let start = sim.get_results()[0];
    for _ in 0..100 {
        sim.tick(false, PointerState::default());
    }
    assert_eq!(sim.get_results()[0], start);
}

#[test]
fn single_bounce_off_the_left_edge() {
    let settings = Settings { bot_speed: 1.0, ..still_settings() };
    let mut sim = SwarmSimulation::new(config(10, 10, settings, 3)).unwrap();
    sim.population_mut().set_bot(0, Vec2::new(0.5, 5.0), PI).unwrap();
    sim.tick(false, PointerState::default());

    let (x, y, _) = sim.get_results()[0];
    assert!((x - 0.5).abs() < 1e-5, "x = {}", x);
    assert!((y - 5.0).abs() < 1e-5, "y = {}", y);
    let angle = sim.population().angles()[0];
    assert!(angle < 1e-5 || TAU - angle < 1e-5, "angle = {}", angle);
}

/// Heading after one tick for a group-0 bot at (20, 20) facing +x, with
/// group 1's trail laid over the left-hand sensor's sample window.
fn heading_next_to_rival_trail(avoidance: f32) -> f32 {
    let settings = Settings {
        num_bots: 2,
        num_bot_groups: 2,
        bot_speed: 0.0,
        randomness: 0.0,
        angle_nudge: 1.0,
        avoidance,
        ..Settings::default()
    };
    let mut sim = SwarmSimulation::new(config(40, 40, settings, 8)).unwrap();
    sim.population_mut().set_bot(0, Vec2::new(20.0, 20.0), 0.0).unwrap();
    sim.population_mut().set_bot(1, Vec2::new(5.0, 35.0), 0.0).unwrap();
    assert_eq!(sim.population().membership(), &[0, 1]);

    // Left sensor (-0.2π, reach 6) samples around cell (24, 16)
    let rival = &mut sim.population_mut().group_mut(1).unwrap().trail;
    for x in 23..=25 {
        for y in 15..=17 {
            rival.deposit_cell(x, y);
        }
    }

    sim.tick(false, PointerState::default());
    sim.population().angles()[0]
}

#[test]
fn avoidance_steers_away_from_rival_trail() {
    // Every reading ties without avoidance, so the first (leftmost) offset wins
    let ignoring = heading_next_to_rival_trail(0.0);
    assert!((ignoring - (TAU - 0.2 * PI)).abs() < 1e-5, "angle = {}", ignoring);

    // With avoidance the rival trail makes the left offset the worst choice
    let avoiding = heading_next_to_rival_trail(1.0);
    assert!(avoiding < 1e-5 || TAU - avoiding < 1e-5, "angle = {}", avoiding);
}

#[test]
fn rival_trail_lowers_the_sensor_reading_ahead() {
    let dims = GridDims::new(40, 40).unwrap();
    let own = TrailField::new(dims);
    let mut rival = TrailField::new(dims);
    let sensor_params = SensorParams {
        reach: 6.0,
        half_size: 1,
        offsets: vec![-0.2 * PI, 0.0, 0.2 * PI],
        avoidance: 1.0,
    };
    for dx in -1..=1 {
        for dy in -1..=1 {
            rival.deposit_cell(26 + dx, 20 + dy);
        }
    }

    let preference = sensor::read(&own, Some(&rival), Vec2::new(20.0, 20.0), 0.0, &sensor_params);
    assert_ne!(preference, 0.0);
}

#[test]
fn pointer_turn_follows_sensor_steering() {
    let settings = Settings {
        bot_speed: 0.0,
        angle_nudge: 1.0,
        mouse_range: 20.0,
        mouse_strength: 0.0,
        ..still_settings()
    };
    let mut sim = SwarmSimulation::new(config(40, 40, settings, 4)).unwrap();
    sim.population_mut().set_bot(0, Vec2::new(20.0, 20.0), 0.0).unwrap();

    // Empty field: all offsets tie and the bot steers to -0.2π first
    sim.tick(true, PointerState::new(Vec2::new(30.0, 20.0), true, false));

    let expected = TAU - 0.2 * PI + 0.1 * 0.5 * 0.2 * PI;
    let angle = sim.population().angles()[0];
    assert!((angle - expected).abs() < 1e-5, "angle = {}, expected {}", angle, expected);
}

#[test]
fn repeated_resize_to_same_size_changes_nothing() {
    let settings = Settings { num_bots: 120, num_bot_groups: 3, ..Settings::default() };
    let mut sim = SwarmSimulation::new(config(32, 32, settings, 21)).unwrap();
    for _ in 0..10 {
        sim.tick(false, PointerState::default());
    }

    sim.resize(80, 2).unwrap();
    let results = sim.get_results();
    let angles = sim.population().angles().to_vec();
    let trails: Vec<Vec<f32>> = (0..2).map(|g| sim.trail(g).unwrap().cells().to_vec()).collect();
    let colors = sim.group_colors();

    sim.resize(80, 2).unwrap();
    assert_eq!(sim.get_results(), results);
    assert_eq!(sim.population().angles(), &angles[..]);
    for g in 0..2 {
        assert_eq!(sim.trail(g).unwrap().cells(), &trails[g][..]);
    }
    assert_eq!(sim.group_colors(), colors);
}

#[test]
fn pointer_attraction_draws_bots_in() {
    let settings = Settings {
        num_bots: 200,
        num_bot_groups: 1,
        bot_speed: 0.0,
        randomness: 0.0,
        angle_nudge: 0.0,
        mouse_range: 200.0,
        mouse_strength: 1.0,
        ..Settings::default()
    };
    let mut sim = SwarmSimulation::new(config(60, 60, settings, 17)).unwrap();
    let target = Vec2::new(30.0, 30.0);
    let mean_distance = |sim: &SwarmSimulation| {
        let results = sim.get_results();
        results.iter().map(|&(x, y, _)| Vec2::new(x, y).distance(target)).sum::<f32>() / results.len() as f32
    };

    let before = mean_distance(&sim);
    for _ in 0..20 {
        sim.tick(true, PointerState::new(target, true, false));
    }
    assert!(mean_distance(&sim) < before);

    // Disabled pointer has no effect
    let frozen = sim.get_results();
    sim.tick(false, PointerState::new(target, true, false));
    assert_eq!(sim.get_results(), frozen);
}
