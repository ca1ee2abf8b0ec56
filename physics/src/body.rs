//! Arcade body integrator.
//!
//! One `Body` per agent, owned and stepped by a single consumer once per tick.
//! Horizontal velocity is rebuilt from input every tick (no inertia); vertical
//! velocity accumulates gravity until the caller reports landing via
//! [`Body::set_grounded`]. The integrator never looks at the world: collision and
//! ground contact are the caller's business.

use crate::{
    collision::types::{Vec2, Vec3},
    constants::{
        DEFAULT_GRAVITY, DEFAULT_JUMP_IMPULSE, DEFAULT_MOVE_SPEED, DEFAULT_SPRINT_MULTIPLIER,
        MOVE_EPS,
    },
    utils::{sanitize_axis, yaw_from_xz},
};

/// Per-agent tuning, fixed at spawn.
///
/// Speeds and accelerations are expressed per reference frame (`dt = 1.0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTuning {
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    pub jump_impulse: f32,
    /// Signed vertical acceleration; negative pulls down.
    pub gravity: f32,
}

impl Default for BodyTuning {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            sprint_multiplier: DEFAULT_SPRINT_MULTIPLIER,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

/// Movement intent for one tick.
///
/// `move_x` strafes along `cam_right`, `move_z` walks along `cam_forward`. Both camera
/// vectors are expected on the ground plane and normalized by the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveInput {
    pub move_x: f32,
    pub move_z: f32,
    pub cam_forward: Vec2,
    pub cam_right: Vec2,
    pub sprinting: bool,
    pub jump: bool,
}

/// Output of a single [`Body::update`] tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyStep {
    /// Proposed position; feed it through collision before committing.
    pub position: Vec3,
    /// Facing of the horizontal movement vector, `atan2(z, x)`.
    /// Unchanged from the previous tick when not moving.
    pub facing_angle: f32,
    pub is_moving: bool,
}

#[derive(Clone, Debug)]
pub struct Body {
    position: Vec3,
    velocity: Vec3,
    grounded: bool,
    facing_angle: f32,
    tuning: BodyTuning,
}

impl Body {
    pub fn new(position: Vec3, tuning: BodyTuning) -> Self {
        Self {
            position,
            velocity: Vec3::zeros(),
            grounded: false,
            facing_angle: 0.0,
            tuning,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn facing_angle(&self) -> f32 {
        self.facing_angle
    }

    #[inline]
    pub fn tuning(&self) -> &BodyTuning {
        &self.tuning
    }

    /// Commit a position, typically the one returned by the collision resolver.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Report vertical contact. Landing (`true`) also zeroes vertical velocity.
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
        if grounded {
            self.velocity.y = 0.0;
        }
    }

    /// Advance one tick.
    ///
    /// `dt` is a frame-time scale where `1.0` is the reference frame. There is no
    /// sub-stepping. Non-finite or out-of-range input degrades to no horizontal motion.
    pub fn update(&mut self, input: &MoveInput, dt: f32) -> BodyStep {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let planar = self.planar_velocity(input);
        self.velocity.x = planar.x;
        self.velocity.z = planar.y;

        // Gravity always applies; a jump from the ground overrides it for this tick.
        self.velocity.y += self.tuning.gravity * dt;
        if input.jump && self.grounded {
            self.velocity.y = self.tuning.jump_impulse;
            self.grounded = false;
        }

        let displacement = self.velocity * dt;
        self.position += displacement;

        let displacement_xz = Vec2::new(displacement.x, displacement.z);
        let is_moving = displacement_xz.norm() > MOVE_EPS;
        if is_moving {
            if let Some(yaw) = yaw_from_xz(displacement_xz) {
                self.facing_angle = yaw;
            }
        }

        BodyStep {
            position: self.position,
            facing_angle: self.facing_angle,
            is_moving,
        }
    }

    /// World-space planar velocity `(x, z)` for this tick's input.
    fn planar_velocity(&self, input: &MoveInput) -> Vec2 {
        let (Some(mx), Some(mz)) = (sanitize_axis(input.move_x), sanitize_axis(input.move_z))
        else {
            return Vec2::zeros();
        };
        if mx.abs() <= MOVE_EPS && mz.abs() <= MOVE_EPS {
            return Vec2::zeros();
        }

        let basis_ok = input.cam_forward.iter().all(|c| c.is_finite())
            && input.cam_right.iter().all(|c| c.is_finite());
        if !basis_ok {
            return Vec2::zeros();
        }

        let mut speed = self.tuning.move_speed;
        if input.sprinting {
            speed *= self.tuning.sprint_multiplier;
        }

        (input.cam_forward * mz + input.cam_right * mx) * speed
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new(Vec3::zeros(), BodyTuning::default())
    }
}
