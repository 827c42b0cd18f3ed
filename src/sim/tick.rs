//! Per-frame simulation tick
//!
//! Fixed order: input, car, road, obstacles, collisions. Nothing moves while
//! the run is over.

use super::car::JumpEvent;
use super::collision::detect_collisions;
use super::state::{GameEvent, GameState};

/// Host-provided timing for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Seconds since the previous tick
    pub dt: f32,
    /// Monotonic clock reading (milliseconds), sampled once per tick
    pub now_ms: f64,
    /// Restart command (e.g. game-over button)
    pub restart: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
    }

    if !input.dt.is_finite() || input.dt < 0.0 || !input.now_ms.is_finite() {
        log::warn!(
            "Skipping tick with bad timing (dt={}, now_ms={})",
            input.dt,
            input.now_ms
        );
        return;
    }

    if state.is_game_over() {
        return;
    }

    state.time_ticks += 1;
    let epoch = state.epoch();
    let intents = state.sample_input();

    if let Some(jump) = state.car.step(&intents, &state.settings) {
        log::debug!("Car {:?} at x={:.2}", jump, state.car.position.x);
        state.push_event(match jump {
            JumpEvent::TookOff => GameEvent::TookOff,
            JumpEvent::Landed => GameEvent::Landed,
        });
    }

    let recycled = state.road.update(input.dt, input.now_ms, &state.settings);
    for (slot, z) in recycled {
        state.push_event(GameEvent::TileRecycled { slot, z });
    }

    let report = state.spawner.update(
        &mut state.obstacles,
        input.dt,
        input.now_ms,
        epoch,
        &state.settings,
    );
    if let Some((id, kind)) = report.spawned {
        state.push_event(GameEvent::ObstacleSpawned { id, kind });
    }
    for id in report.retired {
        state.push_event(GameEvent::ObstacleRetired { id });
    }

    let hits = detect_collisions(
        &state.car,
        &mut state.obstacles,
        state.settings.collision_band_half_width,
    );
    for hit in hits {
        state.report_collision(epoch, hit.obstacle_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::sim::obstacle::{Obstacle, ObstacleKind};
    use crate::sim::state::GameStatus;
    use glam::Vec3;

    const DT: f32 = 1.0 / 60.0;
    const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Drives ticks with a synthetic clock
    struct Clock {
        frame: u64,
    }

    impl Clock {
        fn new() -> Self {
            Self { frame: 0 }
        }

        fn next(&mut self) -> TickInput {
            self.frame += 1;
            TickInput {
                dt: DT,
                now_ms: self.frame as f64 * FRAME_MS,
                restart: false,
            }
        }
    }

    fn collisions(events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Collision { .. }))
            .count()
    }

    #[test]
    fn test_spawned_obstacle_reaches_car_and_ends_run() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut clock = Clock::new();

        // 3.5 s until the first spawn, then 25 s to cover 100 units at 4 u/s
        let mut first_spawn = None;
        for _ in 0..(60 * 30) {
            tick(&mut state, &clock.next());
            if first_spawn.is_none() && !state.obstacles.is_empty() {
                first_spawn = Some(clock.frame);
            }
            if state.is_game_over() {
                break;
            }
        }

        assert_eq!(state.status(), GameStatus::GameOver);
        let spawned_at = first_spawn.expect("an obstacle spawned");
        let travel_secs = (clock.frame - spawned_at) as f32 * DT;
        // Hit registers when the obstacle enters the band one unit out
        assert!((travel_secs - 24.75).abs() < 0.1, "travelled {travel_secs}s");
        assert_eq!(collisions(&state.drain_events()), 1);
    }

    #[test]
    fn test_world_frozen_during_game_over() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut clock = Clock::new();
        tick(&mut state, &clock.next());
        state.report_collision(0, 99);

        let car_before = state.car.position;
        let tiles_before: Vec<f32> = state.tiles().iter().map(|t| t.z_position).collect();
        state.key_down("d");
        for _ in 0..600 {
            tick(&mut state, &clock.next());
        }
        assert_eq!(state.car.position, car_before);
        let tiles_after: Vec<f32> = state.tiles().iter().map(|t| t.z_position).collect();
        assert_eq!(tiles_before, tiles_after);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_airborne_car_clears_two_obstacles() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut clock = Clock::new();
        let settings = state.settings.clone();
        state.obstacles.push(Obstacle::new(1, ObstacleKind::A, Vec3::new(0.0, 0.0, 1.5), 0.5, 0));
        state.obstacles.push(Obstacle::new(2, ObstacleKind::C, Vec3::new(0.0, 0.0, 1.6), 0.5, 0));

        state.key_down("w");
        for _ in 0..60 {
            tick(&mut state, &clock.next());
            if state.obstacles.iter().all(|o| o.position.z < -settings.collision_band_half_width) {
                break;
            }
            assert!(state.car.is_airborne || state.obstacles.iter().all(|o| o.collision_tested));
        }

        assert_eq!(state.status(), GameStatus::Running);
        assert!(state.obstacles.iter().all(|o| o.collision_tested));
        assert_eq!(collisions(&state.drain_events()), 0);
    }

    #[test]
    fn test_two_hits_in_one_tick_end_run_once() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut clock = Clock::new();
        state.obstacles.push(Obstacle::new(1, ObstacleKind::A, Vec3::new(0.0, 0.0, 0.5), 0.5, 0));
        state.obstacles.push(Obstacle::new(2, ObstacleKind::B, Vec3::new(0.0, 0.0, 0.6), 0.5, 0));

        tick(&mut state, &clock.next());
        assert!(state.is_game_over());
        let events = state.drain_events();
        assert_eq!(collisions(&events), 1);
        assert!(events.contains(&GameEvent::Collision {
            epoch: 0,
            obstacle_id: 1
        }));
    }

    #[test]
    fn test_restart_rebuilds_world() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let settings = state.settings.clone();
        let mut clock = Clock::new();

        state.key_down("a");
        for _ in 0..(60 * 10) {
            tick(&mut state, &clock.next());
        }
        state.key_up("a");
        assert!(state.car.position.x > 1.0);
        assert!(!state.obstacles.is_empty());
        state.report_collision(0, state.obstacles[0].id);

        let mut restart = clock.next();
        restart.restart = true;
        tick(&mut state, &restart);

        assert_eq!(state.epoch(), 1);
        assert_eq!(state.status(), GameStatus::Running);
        assert_eq!(state.car.position.x, settings.car_start_position.x);
        assert!(state.obstacles.is_empty());
        assert!(state.road.spacing_within(settings.tile_length, 0.1));
        assert!(state.tiles()[0].z_position > -settings.tile_length);

        // Spawn interval counts from the restart tick
        let restart_frame = clock.frame;
        while state.obstacles.is_empty() {
            tick(&mut state, &clock.next());
        }
        let waited_ms = (clock.frame - restart_frame) as f64 * FRAME_MS;
        assert!(waited_ms >= settings.obstacle_spawn_interval_ms - 1.0);
        assert!(waited_ms < settings.obstacle_spawn_interval_ms + 2.0 * FRAME_MS);
    }

    #[test]
    fn test_restart_mid_jump_restores_start_pose() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let settings = state.settings.clone();
        let mut clock = Clock::new();

        state.key_down("a");
        state.key_down(" ");
        for _ in 0..20 {
            tick(&mut state, &clock.next());
        }
        assert!(state.car.is_airborne);
        assert!(state.car.jump_height > 0.0);
        assert!(state.car.tilt() > 0.0);
        state.key_up("a");
        state.key_up(" ");

        let mut restart = clock.next();
        restart.restart = true;
        tick(&mut state, &restart);

        let fresh = crate::sim::car::CarState::new(&settings);
        let car = &state.car;
        assert_eq!(car.position, fresh.position);
        assert_eq!(car.rotation, fresh.rotation);
        assert_eq!(car.smoothed_rotation_y, fresh.smoothed_rotation_y);
        assert_eq!(car.base_rotation_y, fresh.base_rotation_y);
        assert!(!car.is_airborne);
        assert_eq!(car.vertical_velocity, 0.0);
        assert_eq!(car.jump_height, 0.0);
        assert_eq!(car.bounds(), fresh.bounds());

        // Canonical layout, scrolled by the restart tick itself
        let step = settings.forward_speed * DT;
        let tiles: Vec<f32> = state.tiles().iter().map(|t| t.z_position).collect();
        let expected: Vec<f32> = (0..3).map(|i| i as f32 * settings.tile_length - step).collect();
        assert_eq!(tiles, expected);
    }

    #[test]
    fn test_long_frame_cannot_skip_collision_test() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut clock = Clock::new();
        tick(&mut state, &clock.next());
        state.obstacles.push(Obstacle::new(1, ObstacleKind::C, Vec3::new(0.0, 0.0, 1.2), 0.5, 0));

        // 0.6 s hitch moves it 2.4 units, across the whole band
        let mut hitch = clock.next();
        hitch.dt = 0.6;
        tick(&mut state, &hitch);

        assert!(state.obstacles[0].collision_tested);
        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(collisions(&state.drain_events()), 1);
    }

    #[test]
    fn test_very_long_frame_still_hits_before_retiring() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let mut clock = Clock::new();
        tick(&mut state, &clock.next());
        state.obstacles.push(Obstacle::new(1, ObstacleKind::A, Vec3::new(0.0, 0.0, 4.0), 0.4, 0));

        // Far enough to land behind the rear threshold
        let mut hitch = clock.next();
        hitch.dt = 8.0;
        tick(&mut state, &hitch);

        assert_eq!(state.status(), GameStatus::GameOver);
        assert_eq!(collisions(&state.drain_events()), 1);
    }

    #[test]
    fn test_fixed_obstacle_scale_runs() {
        let settings = Settings {
            obstacle_scale_min: 0.4,
            obstacle_scale_max: 0.4,
            ..Settings::default()
        };
        let mut state = GameState::new(settings).unwrap();
        let mut clock = Clock::new();
        for _ in 0..400 {
            tick(&mut state, &clock.next());
        }
        assert!(!state.obstacles.is_empty());
        assert!(state.obstacles.iter().all(|o| o.scale == 0.4));
    }

    #[test]
    fn test_tile_spacing_holds_over_long_run() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let length = state.settings.tile_length;
        let mut clock = Clock::new();
        for _ in 0..(60 * 120) {
            tick(&mut state, &clock.next());
            assert!(state.road.spacing_within(length, 0.1));
            // Keep the run alive
            if state.is_game_over() {
                state.restart();
            }
        }
    }

    #[test]
    fn test_bad_timing_skips_tick() {
        let mut state = GameState::new(Settings::default()).unwrap();
        let tiles_before: Vec<f32> = state.tiles().iter().map(|t| t.z_position).collect();
        tick(
            &mut state,
            &TickInput {
                dt: f32::NAN,
                now_ms: 0.0,
                restart: false,
            },
        );
        let tiles_after: Vec<f32> = state.tiles().iter().map(|t| t.z_position).collect();
        assert_eq!(tiles_before, tiles_after);
        assert_eq!(state.time_ticks, 0);
    }
}
