//! Read-only view of the world for renderers

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::obstacle::ObstacleKind;
use super::state::{GameState, GameStatus};

/// Car transform and presentation flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarView {
    pub position: Vec3,
    pub rotation: Vec3,
    pub airborne: bool,
    pub wheels_spinning: bool,
    pub headlight_targets: [Vec3; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub id: u64,
    pub kind: ObstacleKind,
    pub asset: String,
    pub position: Vec3,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub slot: usize,
    pub z: f32,
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub epoch: u64,
    pub status: GameStatus,
    pub tick: u64,
    pub car: CarView,
    pub obstacles: Vec<ObstacleView>,
    pub tiles: Vec<TileView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let car = &state.car;
        Self {
            epoch: state.epoch(),
            status: state.status(),
            tick: state.time_ticks,
            car: CarView {
                position: car.position,
                rotation: car.rotation,
                airborne: car.is_airborne,
                wheels_spinning: car.wheels_spinning(),
                headlight_targets: car.headlight_targets(),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    asset: o.kind.asset_key().to_owned(),
                    position: o.position,
                    scale: o.scale,
                })
                .collect(),
            tiles: state
                .tiles()
                .iter()
                .map(|t| TileView {
                    slot: t.slot_index,
                    z: t.z_position,
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
