//! End-to-end chases against the sandbox host

use glam::{Vec2, Vec3};
use grid_chase::consts::SIM_DT;
use grid_chase::sim::{Actor, ChaseEvent, ChaseHost, ChaseState, TickInput, tick};
use grid_chase::{SandboxHost, SimSettings};

fn start(settings: &SimSettings, seed: u64) -> (ChaseState, SandboxHost) {
    let mut state = ChaseState::new(settings, seed).unwrap();
    let (seeker, target) = state.spawn_points().unwrap();
    let host = SandboxHost::new(seeker, target, state.grid.area());
    (state, host)
}

#[test]
fn seeker_catches_a_stationary_target() {
    let settings = SimSettings::default();
    let (mut state, mut host) = start(&settings, 11);

    let input = TickInput::default();
    let mut caught = false;
    for _ in 0..60 * 60 {
        tick(&mut state, &mut host, &input, SIM_DT);
        if state.events.contains(&ChaseEvent::Collision) {
            caught = true;
            break;
        }
    }

    assert!(caught);
    assert_eq!(state.stats.collisions, 1);
    assert!(state.stats.paths_found >= 1);
    assert_eq!(host.hidden_tiles(), sorted(state.grid.hidden()));
}

#[test]
fn wandering_chase_keeps_invariants() {
    let settings = SimSettings {
        grid_width: 12,
        grid_height: 12,
        seed: Some(7),
        ..Default::default()
    };
    let (mut state, mut host) = start(&settings, 7);
    let max = state.grid.max_hidden();
    let mut input = TickInput::default();

    for n in 0..5000u64 {
        input.add_obstacle = n % 90 == 0;
        input.remove_obstacle = n % 300 == 0;
        if n % 40 == 0 {
            let angle = n as f32 * 0.7;
            host.push_target(Vec2::from_angle(angle), 0.1);
        }
        host.step();
        let p = host.target.position;
        host.target.position = p.clamp(Vec3::new(0.01, 0.0, 0.01), Vec3::new(11.99, 10.0, 11.99));

        tick(&mut state, &mut host, &input, SIM_DT);

        assert!(state.grid.hidden_count() <= max);
        assert_eq!(host.hidden_tiles(), sorted(state.grid.hidden()));
        for &tile in state.grid.hidden() {
            assert!(!state.grid.tile(tile).is_active());
        }

        // Every published waypoint sits on an open tile at the waypoint height
        let height = state.waypoint_height();
        for point in state.waypoints() {
            assert_eq!(point.y, height);
            assert!(state.grid.closest_tile(point).is_some());
        }
    }

    assert_eq!(state.time_ticks, 5000);
    assert!(state.stats.searches >= 1);
    assert_eq!(
        state.stats.searches,
        state.stats.paths_found + state.stats.paths_failed
    );
}

#[test]
fn same_seed_same_chase() {
    let settings = SimSettings {
        grid_width: 10,
        grid_height: 14,
        ..Default::default()
    };

    let run = || {
        let (mut state, mut host) = start(&settings, 2024);
        let mut input = TickInput::default();
        for n in 0..2500u32 {
            input.add_obstacle = n % 53 == 0;
            input.remove_obstacle = n % 177 == 0;
            tick(&mut state, &mut host, &input, SIM_DT);
        }
        (
            state.stats.clone(),
            state.grid.hidden().to_vec(),
            host.position(Actor::Seeker),
            host.position(Actor::Target),
        )
    };

    assert_eq!(run(), run());
}

#[test]
fn settings_file_round_trip() {
    let path = std::env::temp_dir().join(format!("grid-chase-settings-{}.json", std::process::id()));
    let settings = SimSettings {
        grid_width: 9,
        seed: Some(5),
        ..Default::default()
    };

    settings.save(&path).unwrap();
    let loaded = SimSettings::load(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded, settings);
}

fn sorted(tiles: &[usize]) -> Vec<usize> {
    let mut tiles = tiles.to_vec();
    tiles.sort_unstable();
    tiles
}
