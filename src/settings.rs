//! Simulation tuning
//!
//! Fixed when the simulation is built. Loaded from JSON; missing fields fall
//! back to the defaults in [`crate::consts`].

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Settings loading errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// Settings JSON is malformed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of its valid range
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Simulation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Steering (per tick) ===
    pub horizontal_speed: f32,
    pub rotation_blend_default: f32,
    pub rotation_blend_reversing: f32,
    pub rotation_blend_sharp: f32,
    pub sharp_reversal_threshold: f32,
    pub max_rotation_angle: f32,
    pub max_tilt: f32,

    // === Jump (per tick) ===
    pub gravity: f32,
    pub jump_launch_velocity: f32,
    pub max_jump_height: f32,

    // === Road ===
    pub tile_length: f32,
    pub tile_rear_threshold: f32,
    pub recycle_debounce_ms: f64,

    // === Obstacles ===
    pub obstacle_spawn_interval_ms: f64,
    pub obstacle_spawn_z: f32,
    pub obstacle_rear_threshold: f32,
    pub obstacle_scale_min: f32,
    pub obstacle_scale_max: f32,

    // === Collision ===
    pub collision_band_half_width: f32,
    pub bounds_inset: f32,

    /// World scroll speed (units per second)
    pub forward_speed: f32,

    // === Car ===
    pub car_start_position: Vec3,
    pub car_start_rotation_y: f32,
    pub car_scale: f32,
    pub car_local_min: Vec3,
    pub car_local_max: Vec3,

    /// Seed for obstacle kind/scale rolls
    pub rng_seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            horizontal_speed: HORIZONTAL_SPEED,
            rotation_blend_default: ROTATION_BLEND_DEFAULT,
            rotation_blend_reversing: ROTATION_BLEND_REVERSING,
            rotation_blend_sharp: ROTATION_BLEND_SHARP,
            sharp_reversal_threshold: SHARP_REVERSAL_THRESHOLD,
            max_rotation_angle: MAX_ROTATION_ANGLE,
            max_tilt: MAX_TILT,

            gravity: GRAVITY,
            jump_launch_velocity: JUMP_LAUNCH_VELOCITY,
            max_jump_height: MAX_JUMP_HEIGHT,

            tile_length: TILE_LENGTH,
            tile_rear_threshold: TILE_REAR_THRESHOLD,
            recycle_debounce_ms: RECYCLE_DEBOUNCE_MS,

            obstacle_spawn_interval_ms: OBSTACLE_SPAWN_INTERVAL_MS,
            obstacle_spawn_z: OBSTACLE_SPAWN_Z,
            obstacle_rear_threshold: OBSTACLE_REAR_THRESHOLD,
            obstacle_scale_min: OBSTACLE_SCALE_MIN,
            obstacle_scale_max: OBSTACLE_SCALE_MAX,

            collision_band_half_width: COLLISION_BAND_HALF_WIDTH,
            bounds_inset: BOUNDS_INSET,

            forward_speed: FORWARD_SPEED,

            car_start_position: Vec3::from_array(CAR_START_POSITION),
            car_start_rotation_y: CAR_START_ROTATION_Y,
            car_scale: CAR_SCALE,
            car_local_min: Vec3::from_array(CAR_LOCAL_MIN),
            car_local_max: Vec3::from_array(CAR_LOCAL_MAX),

            rng_seed: 0x5eed_d21e,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document and validate them
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON (for writing a starter settings file)
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), SettingsError> {
            Err(SettingsError::Invalid { field, reason })
        }

        for (field, value) in [
            ("horizontal_speed", self.horizontal_speed),
            ("sharp_reversal_threshold", self.sharp_reversal_threshold),
            ("max_rotation_angle", self.max_rotation_angle),
            ("max_tilt", self.max_tilt),
            ("tile_rear_threshold", self.tile_rear_threshold),
            ("obstacle_spawn_z", self.obstacle_spawn_z),
            ("obstacle_rear_threshold", self.obstacle_rear_threshold),
            ("bounds_inset", self.bounds_inset),
            ("car_start_rotation_y", self.car_start_rotation_y),
        ] {
            if !value.is_finite() {
                return invalid(field, "must be finite");
            }
        }
        if !self.car_start_position.is_finite()
            || !self.car_local_min.is_finite()
            || !self.car_local_max.is_finite()
        {
            return invalid("car_start_position", "car pose and extents must be finite");
        }

        for (field, value) in [
            ("rotation_blend_default", self.rotation_blend_default),
            ("rotation_blend_reversing", self.rotation_blend_reversing),
            ("rotation_blend_sharp", self.rotation_blend_sharp),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(field, "blend factor must be within [0, 1]");
            }
        }

        for (field, value) in [
            ("tile_length", self.tile_length),
            ("gravity", self.gravity),
            ("jump_launch_velocity", self.jump_launch_velocity),
            ("max_jump_height", self.max_jump_height),
            ("forward_speed", self.forward_speed),
            ("collision_band_half_width", self.collision_band_half_width),
            ("car_scale", self.car_scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(field, "must be positive");
            }
        }

        if self.max_tilt < 0.0 {
            return invalid("max_tilt", "must not be negative");
        }
        if self.horizontal_speed < 0.0 {
            return invalid("horizontal_speed", "must not be negative");
        }
        if self.bounds_inset < 0.0 {
            return invalid("bounds_inset", "must not be negative");
        }
        if !self.obstacle_spawn_interval_ms.is_finite() || self.obstacle_spawn_interval_ms <= 0.0 {
            return invalid("obstacle_spawn_interval_ms", "must be positive");
        }
        if !self.recycle_debounce_ms.is_finite() || self.recycle_debounce_ms < 0.0 {
            return invalid("recycle_debounce_ms", "must not be negative");
        }
        // Equal bounds pin every obstacle to one scale
        if !(self.obstacle_scale_min > 0.0 && self.obstacle_scale_min <= self.obstacle_scale_max)
            || !self.obstacle_scale_max.is_finite()
        {
            return invalid("obstacle_scale_min", "scale range must be positive and ordered");
        }
        if self.obstacle_rear_threshold >= self.obstacle_spawn_z {
            return invalid("obstacle_rear_threshold", "must be behind the spawn point");
        }
        if self.car_local_min.cmpge(self.car_local_max).any() {
            return invalid("car_local_min", "must be below car_local_max on every axis");
        }
        if self.tile_rear_threshold >= self.tile_length {
            return invalid("tile_rear_threshold", "must be behind the second tile");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "forward_speed": 8.0, "rng_seed": 7 }"#).unwrap();
        assert_eq!(settings.forward_speed, 8.0);
        assert_eq!(settings.rng_seed, 7);
        assert_eq!(settings.tile_length, TILE_LENGTH);
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let mut settings = Settings::default();
        settings.car_start_position = Vec3::new(1.0, 0.5, -2.0);
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_bad_blend_factor() {
        let err = Settings::from_json(r#"{ "rotation_blend_sharp": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid {
                field: "rotation_blend_sharp",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_inverted_scale_range() {
        let err =
            Settings::from_json(r#"{ "obstacle_scale_min": 0.6, "obstacle_scale_max": 0.5 }"#)
                .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { .. }));
    }

    #[test]
    fn test_accepts_fixed_obstacle_scale() {
        let settings = Settings {
            obstacle_scale_min: 0.4,
            obstacle_scale_max: 0.4,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let settings = Settings {
            max_tilt: f32::NAN,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "max_tilt",
                ..
            })
        ));

        let settings = Settings {
            forward_speed: f32::INFINITY,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Settings::load("/definitely/not/here/settings.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }
}
