//! Verlet point mass.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// A sail particle in sail-local space.
///
/// Velocity is implicit in `position - previous_position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringNode {
    pub position: Vec3,
    pub previous_position: Vec3,
    /// Accumulated this step, cleared by `update_position`
    pub external_force: Vec3,
    /// Pinned nodes never move
    pub is_fixed: bool,
    /// Velocity retention per step, in (0, 1]
    pub damping: f32,
}

impl SpringNode {
    pub fn new(position: Vec3, is_fixed: bool, damping: f32) -> Self {
        Self {
            position,
            previous_position: position,
            external_force: Vec3::ZERO,
            is_fixed,
            damping,
        }
    }

    #[inline]
    pub fn apply_external_force(&mut self, force: Vec3) {
        self.external_force += force;
    }

    /// Displacement over the last step, after damping
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        (self.position - self.previous_position) * self.damping
    }

    pub fn update_position(&mut self, dt: f32) {
        if self.is_fixed {
            self.external_force = Vec3::ZERO;
            return;
        }

        let velocity = self.velocity();
        let next = self.position + velocity + self.external_force * dt * dt;
        self.previous_position = self.position;
        self.position = next;
        self.external_force = Vec3::ZERO;
    }
}
