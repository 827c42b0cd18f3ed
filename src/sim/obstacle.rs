//! Obstacles: timed spawning, scrolling, and retirement
//!
//! Spawning runs off the host's monotonic clock rather than summed frame
//! deltas, so the rhythm holds under uneven frame rates.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::Settings;

/// Obstacle variants; each maps to one model asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    A,
    B,
    C,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 3] = [ObstacleKind::A, ObstacleKind::B, ObstacleKind::C];

    /// Renderer asset key
    pub fn asset_key(self) -> &'static str {
        match self {
            ObstacleKind::A => "obstacle1.glb",
            ObstacleKind::B => "obstacle2.glb",
            ObstacleKind::C => "obstacle3.glb",
        }
    }

    /// Placeholder unscaled extents standing in for each model's measured
    /// box, origin at ground center. Replace with the real asset bounds.
    pub fn local_extents(self) -> (Vec3, Vec3) {
        match self {
            ObstacleKind::A => (Vec3::new(-2.0, 0.0, -1.0), Vec3::new(2.0, 2.4, 1.0)),
            ObstacleKind::B => (Vec3::new(-1.6, 0.0, -1.6), Vec3::new(1.6, 3.0, 1.6)),
            ObstacleKind::C => (Vec3::new(-2.0, 0.0, -2.0), Vec3::new(2.0, 4.0, 2.0)),
        }
    }
}

/// A live obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u64,
    pub kind: ObstacleKind,
    pub position: Vec3,
    /// Z before the most recent move, used to catch band crossings
    pub previous_z: f32,
    /// Uniform scale
    pub scale: f32,
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    /// Set once the single collision test has run
    pub collision_tested: bool,
    /// Epoch the obstacle was spawned in
    pub epoch: u64,
}

impl Obstacle {
    pub fn new(id: u64, kind: ObstacleKind, position: Vec3, scale: f32, epoch: u64) -> Self {
        let mut obstacle = Self {
            id,
            kind,
            position,
            previous_z: position.z,
            scale,
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::ZERO,
            collision_tested: false,
            epoch,
        };
        obstacle.refresh_bounds();
        obstacle
    }

    fn refresh_bounds(&mut self) {
        let (local_min, local_max) = self.kind.local_extents();
        let bounds = Aabb::from_transform(local_min, local_max, self.scale, 0.0, self.position);
        self.bounds_min = bounds.min;
        self.bounds_max = bounds.max;
    }

    /// Move along Z and keep the bounds in sync
    pub fn set_z(&mut self, z: f32) {
        self.previous_z = self.position.z;
        self.position.z = z;
        self.refresh_bounds();
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.bounds_min, self.bounds_max)
    }
}

/// What one spawner update did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub spawned: Option<(u64, ObstacleKind)>,
    pub retired: Vec<u64>,
}

/// Spawns obstacles on a fixed interval and removes the ones left behind
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    rng: Pcg32,
    /// Clock reading of the last spawn; `None` until the epoch's first tick
    last_spawn_ms: Option<f64>,
    /// Never reset, so IDs stay unique across restarts
    next_id: u64,
}

impl ObstacleSpawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_ms: None,
            next_id: 1,
        }
    }

    /// Restart the spawn interval from the next tick
    pub fn reset_timer(&mut self) {
        self.last_spawn_ms = None;
    }

    /// Scroll, spawn on schedule, then drop obstacles behind the rear threshold.
    ///
    /// An obstacle that crossed the threshold this tick without its collision
    /// test stays one more tick so the test still runs.
    pub fn update(
        &mut self,
        obstacles: &mut Vec<Obstacle>,
        dt: f32,
        now_ms: f64,
        epoch: u64,
        settings: &Settings,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();

        let step = settings.forward_speed * dt;
        for obstacle in obstacles.iter_mut() {
            let z = obstacle.position.z - step;
            obstacle.set_z(z);
        }

        match self.last_spawn_ms {
            None => self.last_spawn_ms = Some(now_ms),
            Some(last) if now_ms - last > settings.obstacle_spawn_interval_ms => {
                self.last_spawn_ms = Some(now_ms);
                let obstacle = self.roll(epoch, settings);
                log::debug!(
                    "Spawned obstacle {} ({:?}, scale {:.2}) at z={}",
                    obstacle.id,
                    obstacle.kind,
                    obstacle.scale,
                    obstacle.position.z
                );
                report.spawned = Some((obstacle.id, obstacle.kind));
                obstacles.push(obstacle);
            }
            Some(_) => {}
        }

        let threshold = settings.obstacle_rear_threshold;
        obstacles.retain(|o| {
            if o.position.z < threshold && (o.collision_tested || o.previous_z < threshold) {
                log::debug!("Retired obstacle {}", o.id);
                report.retired.push(o.id);
                false
            } else {
                true
            }
        });

        report
    }

    fn roll(&mut self, epoch: u64, settings: &Settings) -> Obstacle {
        let kind = ObstacleKind::ALL[self.rng.random_range(0..ObstacleKind::ALL.len())];
        let (min, max) = (settings.obstacle_scale_min, settings.obstacle_scale_max);
        let scale = if min < max {
            self.rng.random_range(min..max)
        } else {
            min
        };
        let id = self.next_id;
        self.next_id += 1;
        Obstacle::new(
            id,
            kind,
            Vec3::new(0.0, 0.0, settings.obstacle_spawn_z),
            scale,
            epoch,
        )
    }
}
