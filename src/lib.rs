//! Night Drive - endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Simulation (car physics, road recycling, obstacles, collisions, game state)
//! - `settings`: Tuning constants fixed at construction, loadable from JSON
//!
//! Rendering, camera, and UI live outside this crate and only read `sim` state.

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec3;

/// Default tuning constants
///
/// Car constants are applied once per tick, not per second.
pub mod consts {
    /// Sideways displacement per tick while steering
    pub const HORIZONTAL_SPEED: f32 = 0.07;
    /// Yaw smoothing factor when holding or releasing a direction
    pub const ROTATION_BLEND_DEFAULT: f32 = 0.03;
    /// Yaw smoothing factor when steering against the current tilt
    pub const ROTATION_BLEND_REVERSING: f32 = 0.25;
    /// Yaw smoothing factor when the wrong-way tilt is large
    pub const ROTATION_BLEND_SHARP: f32 = 0.4;
    /// Wrong-way tilt (radians past base yaw) that selects the sharp factor
    pub const SHARP_REVERSAL_THRESHOLD: f32 = 0.12;
    /// Target yaw offset while steering (radians, ~8.5 degrees)
    pub const MAX_ROTATION_ANGLE: f32 = 0.15;
    /// Hard yaw limit around base yaw (radians, ~11.5 degrees)
    pub const MAX_TILT: f32 = 0.2;

    /// Downward acceleration per tick while airborne
    pub const GRAVITY: f32 = 0.008;
    /// Upward velocity applied on takeoff
    pub const JUMP_LAUNCH_VELOCITY: f32 = 0.2;
    /// Height above rest where the car stops rising
    pub const MAX_JUMP_HEIGHT: f32 = 3.0;

    /// Length of one road tile along Z
    pub const TILE_LENGTH: f32 = 31.65;
    /// Number of recycled road tiles
    pub const TILE_COUNT: usize = 3;
    /// Tiles behind this Z get moved to the front
    pub const TILE_REAR_THRESHOLD: f32 = -20.0;
    /// Minimum time between two recycles of the same tile
    pub const RECYCLE_DEBOUNCE_MS: f64 = 100.0;
    /// Allowed deviation of a tile gap from `TILE_LENGTH`
    pub const TILE_SPACING_TOLERANCE: f32 = 0.1;

    /// Time between obstacle spawns
    pub const OBSTACLE_SPAWN_INTERVAL_MS: f64 = 3500.0;
    /// Z where new obstacles appear
    pub const OBSTACLE_SPAWN_Z: f32 = 100.0;
    /// Obstacles behind this Z are removed
    pub const OBSTACLE_REAR_THRESHOLD: f32 = -20.0;
    pub const OBSTACLE_SCALE_MIN: f32 = 0.3;
    pub const OBSTACLE_SCALE_MAX: f32 = 0.5;

    /// Half depth of the Z band where an obstacle gets its single collision test
    pub const COLLISION_BAND_HALF_WIDTH: f32 = 1.0;
    /// Shrink applied to the car box on X and Z
    pub const BOUNDS_INSET: f32 = 0.3;

    /// World scroll speed (units per second)
    pub const FORWARD_SPEED: f32 = 4.0;

    /// Car spawn pose
    pub const CAR_START_POSITION: [f32; 3] = [0.0, 0.05, 0.0];
    pub const CAR_START_ROTATION_Y: f32 = 0.0;
    pub const CAR_SCALE: f32 = 0.7;
    /// Unscaled car model extents (local space, origin at the rear axle midpoint)
    pub const CAR_LOCAL_MIN: [f32; 3] = [-1.3, 0.0, -2.3];
    pub const CAR_LOCAL_MAX: [f32; 3] = [1.3, 1.6, 2.3];

    /// Headlight aim distance ahead of the car
    pub const HEADLIGHT_REACH: f32 = 10.0;
    /// Sideways offset of each headlight aim point
    pub const HEADLIGHT_SPREAD: f32 = 0.8;
    /// Height of the headlight aim points above the car origin
    pub const HEADLIGHT_HEIGHT: f32 = 0.3;

    /// Undrained events kept before the oldest are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;
}

/// Linear interpolation from `a` toward `b` by `t`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Rotate a point around the Y axis (right-handed, yaw in radians)
#[inline]
pub fn rotate_y(point: Vec3, yaw: f32) -> Vec3 {
    let (sin, cos) = yaw.sin_cos();
    Vec3::new(
        point.x * cos + point.z * sin,
        point.y,
        -point.x * sin + point.z * cos,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(1.0, 3.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 3.0, 1.0), 3.0);
        assert!((lerp(1.0, 3.0, 0.25) - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        // +Z forward turns to +X after a quarter turn
        let p = rotate_y(Vec3::Z, std::f32::consts::FRAC_PI_2);
        assert!((p - Vec3::X).length() < 1e-5);
        assert_eq!(rotate_y(Vec3::Y, 1.0), Vec3::Y);
    }
}
