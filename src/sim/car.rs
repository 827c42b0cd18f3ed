//! Car kinematics: steering, yaw smoothing, and jumping
//!
//! All car constants are per tick. The host calls [`CarState::step`] once per
//! frame, the same way the car was tuned.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::input::InputState;
use crate::consts::{HEADLIGHT_HEIGHT, HEADLIGHT_REACH, HEADLIGHT_SPREAD};
use crate::{Settings, lerp};

/// Jump transitions reported by [`CarState::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpEvent {
    TookOff,
    Landed,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarState {
    pub position: Vec3,
    /// Euler rotation (radians); only yaw (`y`) changes
    pub rotation: Vec3,
    /// Upward velocity per tick while airborne
    pub vertical_velocity: f32,
    pub is_airborne: bool,
    /// Neutral yaw the car returns to
    pub base_rotation_y: f32,
    /// Current yaw after smoothing
    pub smoothed_rotation_y: f32,
    /// Collision box (already inset on X and Z)
    pub bounds_min: Vec3,
    pub bounds_max: Vec3,
    /// Height above the resting Y
    pub jump_height: f32,
    /// Resting Y (spawn height)
    pub rest_y: f32,
    /// Jump intent seen last tick, for rising-edge detection
    jump_held: bool,
}

impl CarState {
    /// Car at its spawn pose
    pub fn new(settings: &Settings) -> Self {
        let yaw = settings.car_start_rotation_y;
        let mut car = Self {
            position: settings.car_start_position,
            rotation: Vec3::new(0.0, yaw, 0.0),
            vertical_velocity: 0.0,
            is_airborne: false,
            base_rotation_y: yaw,
            smoothed_rotation_y: yaw,
            bounds_min: Vec3::ZERO,
            bounds_max: Vec3::ZERO,
            jump_height: 0.0,
            rest_y: settings.car_start_position.y,
            jump_held: false,
        };
        car.refresh_bounds(settings);
        car
    }

    /// Advance one tick: jump, steering, yaw smoothing, then bounds
    pub fn step(&mut self, input: &InputState, settings: &Settings) -> Option<JumpEvent> {
        let jump_event = self.update_jump(input.jump, settings);
        self.update_steering(input, settings);
        self.refresh_bounds(settings);
        jump_event
    }

    fn update_jump(&mut self, jump: bool, settings: &Settings) -> Option<JumpEvent> {
        let rising_edge = jump && !self.jump_held;
        self.jump_held = jump;

        let mut event = None;
        if rising_edge && !self.is_airborne {
            self.is_airborne = true;
            self.vertical_velocity = settings.jump_launch_velocity;
            event = Some(JumpEvent::TookOff);
        }

        if !self.is_airborne {
            return event;
        }

        self.vertical_velocity -= settings.gravity;
        self.jump_height += self.vertical_velocity;

        // Stop rising at the ceiling; falling starts next tick
        if self.jump_height > settings.max_jump_height {
            self.jump_height = settings.max_jump_height;
            self.vertical_velocity = 0.0;
        }

        if self.jump_height <= 0.0 && self.vertical_velocity < 0.0 {
            self.is_airborne = false;
            self.jump_height = 0.0;
            self.vertical_velocity = 0.0;
            self.position.y = self.rest_y;
            return Some(JumpEvent::Landed);
        }

        self.position.y = self.rest_y + self.jump_height;
        event
    }

    fn update_steering(&mut self, input: &InputState, settings: &Settings) {
        let base = self.base_rotation_y;

        if input.left {
            self.position.x -= settings.horizontal_speed;
        }
        if input.right {
            self.position.x += settings.horizontal_speed;
        }

        // Right wins when both are held
        let steer = if input.right {
            1.0
        } else if input.left {
            -1.0
        } else {
            0.0
        };

        let target = (base + steer * settings.max_rotation_angle)
            .clamp(base - settings.max_tilt, base + settings.max_tilt);

        // Positive when tilted against the steering direction
        let wrong_way_tilt = -(self.smoothed_rotation_y - base) * steer;
        let factor = if wrong_way_tilt > settings.sharp_reversal_threshold {
            settings.rotation_blend_sharp
        } else if wrong_way_tilt > 0.0 {
            settings.rotation_blend_reversing
        } else {
            settings.rotation_blend_default
        };

        self.smoothed_rotation_y = lerp(self.smoothed_rotation_y, target, factor)
            .clamp(base - settings.max_tilt, base + settings.max_tilt);
        self.rotation.y = self.smoothed_rotation_y;
    }

    /// Recompute the inset collision box from the current transform
    pub fn refresh_bounds(&mut self, settings: &Settings) {
        let bounds = Aabb::from_transform(
            settings.car_local_min,
            settings.car_local_max,
            settings.car_scale,
            self.smoothed_rotation_y,
            self.position,
        )
        .inset_xz(settings.bounds_inset);
        self.bounds_min = bounds.min;
        self.bounds_max = bounds.max;
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.bounds_min, self.bounds_max)
    }

    /// Yaw offset from neutral
    #[inline]
    pub fn tilt(&self) -> f32 {
        self.smoothed_rotation_y - self.base_rotation_y
    }

    /// Wheel animation runs only on the ground
    #[inline]
    pub fn wheels_spinning(&self) -> bool {
        !self.is_airborne
    }

    /// World-space aim points for the left and right headlights
    pub fn headlight_targets(&self) -> [Vec3; 2] {
        let yaw = self.rotation.y;
        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos()) * HEADLIGHT_REACH;
        let base = self.position + forward + Vec3::new(0.0, HEADLIGHT_HEIGHT, 0.0);
        [
            base - Vec3::new(HEADLIGHT_SPREAD, 0.0, 0.0),
            base + Vec3::new(HEADLIGHT_SPREAD, 0.0, 0.0),
        ]
    }
}
