use swarm_common::{PointerButton, SimulationConfig};
use swarm_engine::{PointerState, SwarmSimulation};

#[test]
fn shipped_config_loads_and_runs() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml");
    let mut config = SimulationConfig::load(path).unwrap();
    assert_eq!(config.settings.num_bot_groups, 3);
    assert_eq!(config.pointer.button, PointerButton::Attract);

    // Keep the run short
    config.settings.num_bots = 300;
    let pointer_config = config.pointer.clone();
    let mut sim = SwarmSimulation::new(config).unwrap();
    for tick in 0..5 {
        let pointer = PointerState::from_config(&pointer_config, tick);
        assert!(pointer.is_some());
        sim.tick(true, pointer.unwrap_or_default());
    }
    sim.record_snapshot();
    assert_eq!(sim.recorded_snapshots()[0].group_member_counts, vec![100, 100, 100]);
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(SimulationConfig::load("does/not/exist.toml").is_err());
}
