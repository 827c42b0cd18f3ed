//! Collision detection between the car and obstacles
//!
//! Each obstacle gets exactly one box test, taken the first tick it is inside
//! the Z band around the car. An obstacle that jumps the whole band in one long
//! frame is tested on that frame with its box stretched over the distance it
//! travelled. A car in the air never collides.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::car::CarState;
use super::obstacle::Obstacle;
use crate::rotate_y;

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box enclosing a local-space box after scale, yaw, then translation
    pub fn from_transform(
        local_min: Vec3,
        local_max: Vec3,
        scale: f32,
        yaw: f32,
        translation: Vec3,
    ) -> Self {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { local_min.x } else { local_max.x },
                if i & 2 == 0 { local_min.y } else { local_max.y },
                if i & 4 == 0 { local_min.z } else { local_max.z },
            );
            let world = rotate_y(corner * scale, yaw) + translation;
            min = min.min(world);
            max = max.max(world);
        }
        Self { min, max }
    }

    /// Shrink on X and Z by `margin` per side (never past the center)
    pub fn inset_xz(self, margin: f32) -> Self {
        let center = self.center();
        let min_x = (self.min.x + margin).min(center.x);
        let max_x = (self.max.x - margin).max(center.x);
        let min_z = (self.min.z + margin).min(center.z);
        let max_z = (self.max.z - margin).max(center.z);
        Self {
            min: Vec3::new(min_x, self.min.y, min_z),
            max: Vec3::new(max_x, self.max.y, max_z),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Overlap test; touching faces count as intersecting
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }
}

/// An obstacle that hit the car this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionHit {
    pub obstacle_id: u64,
}

/// Whether `z` lies inside the collision band centred on `car_z`
#[inline]
pub fn in_collision_band(z: f32, car_z: f32, band_half_width: f32) -> bool {
    (z - car_z).abs() <= band_half_width
}

/// Whether a move from `previous_z` to `z` skipped over the whole band
#[inline]
pub fn crossed_collision_band(
    previous_z: f32,
    z: f32,
    car_z: f32,
    band_half_width: f32,
) -> bool {
    previous_z - car_z > band_half_width && z - car_z < -band_half_width
}

/// Run the one-shot test for every untested obstacle inside the band, or that
/// crossed it this tick.
///
/// Latches `collision_tested` whatever the outcome, so an obstacle sitting in
/// the band for several ticks is tested once.
pub fn detect_collisions(
    car: &CarState,
    obstacles: &mut [Obstacle],
    band_half_width: f32,
) -> Vec<CollisionHit> {
    let mut hits = Vec::new();
    let car_bounds = car.bounds();

    for obstacle in obstacles.iter_mut() {
        if obstacle.collision_tested {
            continue;
        }
        let z = obstacle.position.z;
        let crossed =
            crossed_collision_band(obstacle.previous_z, z, car.position.z, band_half_width);
        if !crossed && !in_collision_band(z, car.position.z, band_half_width) {
            continue;
        }
        obstacle.collision_tested = true;

        if car.is_airborne {
            log::trace!("Obstacle {} passed under an airborne car", obstacle.id);
            continue;
        }
        let mut bounds = obstacle.bounds();
        if crossed {
            bounds.max.z += obstacle.previous_z - z;
        }
        if car_bounds.intersects(&bounds) {
            hits.push(CollisionHit {
                obstacle_id: obstacle.id,
            });
        }
    }

    hits
}
