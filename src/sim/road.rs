//! Road tiles recycled into an endless track
//!
//! A fixed set of tiles scrolls toward the camera. A tile that falls behind
//! the rear threshold is moved one tile length ahead of the frontmost tile.

use serde::{Deserialize, Serialize};

use crate::Settings;
use crate::consts::{TILE_COUNT, TILE_SPACING_TOLERANCE};

/// One reusable road segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoadTile {
    pub slot_index: usize,
    pub z_position: f32,
    /// Clock reading of the last recycle
    #[serde(skip)]
    pub last_recycle_ms: Option<f64>,
}

/// Where a recycled tile should go, given the Z of every other tile.
///
/// Normally one tile length past the frontmost tile. If the two front tiles
/// have drifted apart, the target is re-derived from the second tile, then
/// clamped so it never lands closer than one tile length to the front.
pub fn recycle_target(others: &[f32], tile_length: f32) -> Option<f32> {
    let mut highest = f32::NEG_INFINITY;
    let mut second = f32::NEG_INFINITY;
    for &z in others {
        if z > highest {
            second = highest;
            highest = z;
        } else if z > second {
            second = z;
        }
    }
    if highest == f32::NEG_INFINITY {
        return None;
    }

    let mut target = highest + tile_length;
    if second != f32::NEG_INFINITY {
        let gap = highest - second;
        if (gap - tile_length).abs() > TILE_SPACING_TOLERANCE {
            target = second + tile_length;
        }
    }
    if target - highest < tile_length {
        target = highest + tile_length;
    }
    Some(target)
}

/// Owns the road tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadTileManager {
    tiles: [RoadTile; TILE_COUNT],
}

impl RoadTileManager {
    /// Tiles laid out back to back from Z = 0
    pub fn new(settings: &Settings) -> Self {
        let tiles = std::array::from_fn(|slot_index| RoadTile {
            slot_index,
            z_position: slot_index as f32 * settings.tile_length,
            last_recycle_ms: None,
        });
        Self { tiles }
    }

    pub fn tiles(&self) -> &[RoadTile] {
        &self.tiles
    }

    /// Back to the initial layout
    pub fn reset(&mut self, settings: &Settings) {
        *self = Self::new(settings);
    }

    /// Scroll all tiles, then recycle the ones behind the threshold.
    ///
    /// Returns `(slot, new_z)` for every recycled tile.
    pub fn update(&mut self, dt: f32, now_ms: f64, settings: &Settings) -> Vec<(usize, f32)> {
        let step = settings.forward_speed * dt;
        for tile in &mut self.tiles {
            tile.z_position -= step;
        }

        // Rearmost first, so every recycle moves the tile at the back
        let mut order: [usize; TILE_COUNT] = std::array::from_fn(|i| i);
        order.sort_by(|&a, &b| self.tiles[a].z_position.total_cmp(&self.tiles[b].z_position));

        let mut recycled = Vec::new();
        for slot in order {
            if self.tiles[slot].z_position >= settings.tile_rear_threshold {
                break;
            }
            let debounced = self.tiles[slot]
                .last_recycle_ms
                .is_some_and(|last| now_ms - last < settings.recycle_debounce_ms);
            if debounced {
                log::trace!("Tile {} recycle debounced", slot);
                break;
            }

            let others: Vec<f32> = self
                .tiles
                .iter()
                .filter(|t| t.slot_index != slot)
                .map(|t| t.z_position)
                .collect();
            let Some(target) = recycle_target(&others, settings.tile_length) else {
                continue;
            };

            let tile = &mut self.tiles[slot];
            log::trace!("Recycled tile {} from z={} to z={}", slot, tile.z_position, target);
            tile.z_position = target;
            tile.last_recycle_ms = Some(now_ms);
            recycled.push((slot, target));
        }

        recycled
    }

    /// Whether consecutive tiles (front to back) are `tile_length` apart
    pub fn spacing_within(&self, tile_length: f32, tolerance: f32) -> bool {
        let mut zs: Vec<f32> = self.tiles.iter().map(|t| t.z_position).collect();
        zs.sort_by(|a, b| b.total_cmp(a));
        zs.windows(2)
            .all(|pair| ((pair[0] - pair[1]) - tile_length).abs() <= tolerance)
    }
}
