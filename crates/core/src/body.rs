//! # Rigid Body
//!
//! The rigid-body capability surface every simulator writes forces into, plus
//! a self-contained implementation for hosts without a physics engine.
//!
//! ## Table of Contents
//!
//! 1. **RigidBody** - Trait consumed by the simulators
//! 2. **RigidBodyState** - Force-accumulating reference body
//!
//! Body frame is right-handed as Bevy renders it: +Z forward, +Y up, so +X
//! points to port and -X to starboard.

use bevy::math::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::GRAVITY;

// ============================================================================
// 1. RigidBody trait
// ============================================================================

/// Forces and torques added through this trait accumulate until the host
/// integrates the body. Velocity getters return pre-step values for the whole
/// step, so the evaluation order of simulators never changes what they read.
pub trait RigidBody {
    /// World position of the body origin
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn linear_velocity(&self) -> Vec3;
    /// Angular velocity in world space (rad/s)
    fn angular_velocity(&self) -> Vec3;
    fn mass(&self) -> f32;

    /// Center of mass in body-local space
    fn center_of_mass(&self) -> Vec3;
    fn set_center_of_mass(&mut self, local: Vec3);

    /// Force through the center of mass (N)
    fn add_force(&mut self, force: Vec3);
    /// Torque in world space (N·m)
    fn add_torque(&mut self, torque: Vec3);
    /// Angular acceleration in world space, independent of inertia (rad/s²)
    fn add_angular_acceleration(&mut self, acceleration: Vec3);

    fn set_linear_damping(&mut self, damping: f32);

    /// A kinematic body ignores accumulated forces and does not move
    fn set_kinematic(&mut self, kinematic: bool);
    fn is_kinematic(&self) -> bool;

    fn world_center_of_mass(&self) -> Vec3 {
        self.position() + self.rotation() * self.center_of_mass()
    }

    /// Velocity of a world point rigidly attached to the body
    fn point_velocity(&self, world_point: Vec3) -> Vec3 {
        let r = world_point - self.world_center_of_mass();
        self.linear_velocity() + self.angular_velocity().cross(r)
    }

    fn add_force_at_position(&mut self, force: Vec3, world_point: Vec3) {
        let r = world_point - self.world_center_of_mass();
        self.add_force(force);
        self.add_torque(r.cross(force));
    }

    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Starboard direction
    fn right(&self) -> Vec3 {
        self.rotation() * Vec3::NEG_X
    }

    fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Body-local point to world space
    fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position() + self.rotation() * local
    }

    /// World point to body-local space
    fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * (world - self.position())
    }
}

// ============================================================================
// 2. RigidBodyState
// ============================================================================

/// Rigid body with a diagonal inertia tensor, integrated with semi-implicit
/// Euler about its center of mass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    pub position: Vec3,
    pub rotation: Quat,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    /// Mass in kilograms
    pub mass: f32,
    /// Principal moments of inertia in body space (kg·m²)
    pub inertia: Vec3,
    pub center_of_mass: Vec3,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub use_gravity: bool,
    pub kinematic: bool,
    /// Accumulated force this step (N)
    pub accumulated_force: Vec3,
    /// Accumulated torque this step (N·m)
    pub accumulated_torque: Vec3,
    /// Accumulated angular acceleration this step (rad/s²)
    pub accumulated_angular_acceleration: Vec3,
}

impl Default for RigidBodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            inertia: Vec3::ONE,
            center_of_mass: Vec3::ZERO,
            linear_damping: 0.0,
            angular_damping: 0.05,
            use_gravity: true,
            kinematic: false,
            accumulated_force: Vec3::ZERO,
            accumulated_torque: Vec3::ZERO,
            accumulated_angular_acceleration: Vec3::ZERO,
        }
    }
}

impl RigidBodyState {
    /// Solid box hull of the given mass and full extents (m)
    pub fn from_box(mass: f32, size: Vec3) -> Self {
        let k = mass / 12.0;
        let inertia = Vec3::new(
            k * (size.y * size.y + size.z * size.z),
            k * (size.x * size.x + size.z * size.z),
            k * (size.x * size.x + size.y * size.y),
        );
        Self {
            mass,
            inertia,
            ..Default::default()
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn clear_forces(&mut self) {
        self.accumulated_force = Vec3::ZERO;
        self.accumulated_torque = Vec3::ZERO;
        self.accumulated_angular_acceleration = Vec3::ZERO;
    }

    /// World-space angular acceleration produced by `torque`
    fn angular_acceleration_from(&self, torque: Vec3) -> Vec3 {
        let local = self.rotation.inverse() * torque;
        let inv = Vec3::new(
            safe_recip(self.inertia.x),
            safe_recip(self.inertia.y),
            safe_recip(self.inertia.z),
        );
        self.rotation * (local * inv)
    }

    /// Advances the body by `dt` and clears the accumulators.
    pub fn integrate(&mut self, dt: f32) {
        if self.kinematic || dt <= 0.0 {
            self.clear_forces();
            return;
        }

        let mut acceleration = self.accumulated_force * safe_recip(self.mass);
        if self.use_gravity {
            acceleration.y -= GRAVITY;
        }
        self.linear_velocity += acceleration * dt;
        self.linear_velocity /= 1.0 + self.linear_damping.max(0.0) * dt;

        let angular_acceleration = self.angular_acceleration_from(self.accumulated_torque)
            + self.accumulated_angular_acceleration;
        self.angular_velocity += angular_acceleration * dt;
        self.angular_velocity /= 1.0 + self.angular_damping.max(0.0) * dt;

        // rotate about the center of mass
        let com = self.world_center_of_mass() + self.linear_velocity * dt;
        let spin = Quat::from_scaled_axis(self.angular_velocity * dt);
        self.rotation = (spin * self.rotation).normalize();
        self.position = com - self.rotation * self.center_of_mass;

        self.clear_forces();
    }
}

#[inline]
fn safe_recip(value: f32) -> f32 {
    if value.abs() > f32::EPSILON {
        1.0 / value
    } else {
        0.0
    }
}

impl RigidBody for RigidBodyState {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn center_of_mass(&self) -> Vec3 {
        self.center_of_mass
    }

    fn set_center_of_mass(&mut self, local: Vec3) {
        self.center_of_mass = local;
    }

    fn add_force(&mut self, force: Vec3) {
        self.accumulated_force += force;
    }

    fn add_torque(&mut self, torque: Vec3) {
        self.accumulated_torque += torque;
    }

    fn add_angular_acceleration(&mut self, acceleration: Vec3) {
        self.accumulated_angular_acceleration += acceleration;
    }

    fn set_linear_damping(&mut self, damping: f32) {
        self.linear_damping = damping;
    }

    fn set_kinematic(&mut self, kinematic: bool) {
        self.kinematic = kinematic;
    }

    fn is_kinematic(&self) -> bool {
        self.kinematic
    }
}
