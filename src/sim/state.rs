//! Game state and run lifecycle
//!
//! Everything a run needs lives in [`GameState`]; a restart rebuilds it in
//! place and bumps the epoch.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::car::CarState;
use super::input::{InputState, InputTracker};
use super::obstacle::{Obstacle, ObstacleKind, ObstacleSpawner};
use super::road::{RoadTile, RoadTileManager};
use crate::consts::MAX_PENDING_EVENTS;
use crate::{Settings, SettingsError};

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// World is moving
    #[default]
    Running,
    /// Car crashed; world frozen until restart
    GameOver,
}

/// Status plus the play-through counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameSession {
    pub status: GameStatus,
    /// Incremented on every restart
    pub epoch: u64,
}

impl GameSession {
    /// Whether something tagged with `epoch` belongs to this play-through
    #[inline]
    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Running -> GameOver. Returns false for stale epochs or when already over.
    pub fn end_run(&mut self, epoch: u64) -> bool {
        if !self.is_current(epoch) || self.status == GameStatus::GameOver {
            return false;
        }
        self.status = GameStatus::GameOver;
        true
    }

    /// Start the next play-through and return its epoch
    pub fn begin_next(&mut self) -> u64 {
        self.epoch += 1;
        self.status = GameStatus::Running;
        self.epoch
    }
}

/// Notifications for presentation code, drained by the host.
///
/// At most [`MAX_PENDING_EVENTS`] are kept; an undrained queue drops its
/// oldest entries. Nothing is pushed after `Collision` until the next restart,
/// so a collision is always the last event of its epoch and survives the cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Car hit an obstacle; fired at most once per epoch
    Collision { epoch: u64, obstacle_id: u64 },
    Restarted { epoch: u64 },
    ObstacleSpawned { id: u64, kind: ObstacleKind },
    ObstacleRetired { id: u64 },
    TileRecycled { slot: usize, z: f32 },
    TookOff,
    Landed,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub session: GameSession,
    pub car: CarState,
    pub road: RoadTileManager,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pub spawner: ObstacleSpawner,
    /// Held keys; sampled once per tick
    pub input: InputTracker,
    /// Ticks simulated in the current epoch
    pub time_ticks: u64,
    events: VecDeque<GameEvent>,
}

impl GameState {
    /// Build a run from validated settings
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            session: GameSession::default(),
            car: CarState::new(&settings),
            road: RoadTileManager::new(&settings),
            obstacles: Vec::new(),
            spawner: ObstacleSpawner::new(settings.rng_seed),
            input: InputTracker::new(),
            time_ticks: 0,
            events: VecDeque::new(),
            settings,
        })
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn epoch(&self) -> u64 {
        self.session.epoch
    }

    pub fn is_game_over(&self) -> bool {
        self.session.status == GameStatus::GameOver
    }

    pub fn tiles(&self) -> &[RoadTile] {
        self.road.tiles()
    }

    /// Raw key-down from the host
    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    /// Raw key-up from the host
    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Intents for this tick
    pub fn sample_input(&self) -> InputState {
        self.input.snapshot()
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    /// Number of events waiting to be drained
    pub fn pending_events(&self) -> usize {
        self.events.len()
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    /// Record a collision reported for `epoch`.
    ///
    /// Ends the run on the first report of the current epoch. Reports from an
    /// older epoch or after the run already ended are dropped.
    pub fn report_collision(&mut self, epoch: u64, obstacle_id: u64) -> bool {
        if !self.session.is_current(epoch) {
            log::debug!(
                "Dropped collision with obstacle {} from stale epoch {} (now {})",
                obstacle_id,
                epoch,
                self.session.epoch
            );
            return false;
        }
        if !self.session.end_run(epoch) {
            log::debug!("Ignored collision with obstacle {} after game over", obstacle_id);
            return false;
        }

        log::info!(
            "Game over: hit obstacle {} after {} ticks (epoch {})",
            obstacle_id,
            self.time_ticks,
            epoch
        );
        self.push_event(GameEvent::Collision { epoch, obstacle_id });
        true
    }

    /// Start a fresh run. Also valid while running.
    pub fn restart(&mut self) -> u64 {
        if !self.is_game_over() {
            log::debug!("Restart requested while running; resetting anyway");
        }

        let epoch = self.session.begin_next();
        self.car = CarState::new(&self.settings);
        self.road.reset(&self.settings);
        self.obstacles.clear();
        self.spawner.reset_timer();
        self.time_ticks = 0;
        self.events.clear();

        log::info!("Restarted (epoch {})", epoch);
        self.push_event(GameEvent::Restarted { epoch });
        epoch
    }
}
