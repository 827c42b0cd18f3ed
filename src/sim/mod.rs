//! Simulation module
//!
//! All gameplay logic lives here. No rendering or platform dependencies:
//! - The host drives `tick` once per frame with elapsed time and a clock reading
//! - Key events go in through `GameState::key_down`/`key_up`
//! - Renderers read `Snapshot` or the state fields directly

pub mod car;
pub mod collision;
pub mod input;
pub mod obstacle;
pub mod road;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use car::{CarState, JumpEvent};
pub use collision::{
    Aabb, CollisionHit, crossed_collision_band, detect_collisions, in_collision_band,
};
pub use input::{InputState, InputTracker, Intent};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleSpawner, SpawnReport};
pub use road::{RoadTile, RoadTileManager, recycle_target};
pub use snapshot::Snapshot;
pub use state::{GameEvent, GameSession, GameState, GameStatus};
pub use tick::{TickInput, tick};
