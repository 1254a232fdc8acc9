//! # Wind
//!
//! Wind sources consumed by the sail simulator.
//!
//! ## Table of Contents
//!
//! 1. **WindSource** - Query trait
//! 2. **GlobalWind** - Uniform wind set by heading and strength

use bevy::math::Vec3;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

// ============================================================================
// Wind Source
// ============================================================================

/// Supplies the true wind vector at a world position.
pub trait WindSource: Send + Sync {
    /// True wind velocity (m/s) at `position`
    fn sample_wind(&self, position: Vec3) -> Vec3;

    /// Scalar wind strength used to scale forward drive
    fn strength(&self) -> f32 {
        self.sample_wind(Vec3::ZERO).length()
    }
}

// ============================================================================
// Global Wind
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct WindState {
    angle_deg: f32,
    strength: f32,
}

/// Uniform wind blowing along `(cos a, 0, sin a)`.
///
/// Shared between simulators behind an `Arc`; `set_wind` may be called from
/// the host while boats hold a reference.
#[derive(Debug)]
pub struct GlobalWind {
    state: RwLock<WindState>,
}

impl GlobalWind {
    pub fn new(angle_deg: f32, strength: f32) -> Self {
        Self {
            state: RwLock::new(WindState {
                angle_deg: wrap_degrees(angle_deg),
                strength,
            }),
        }
    }

    /// Updates heading and strength. The heading wraps into [0, 360).
    pub fn set_wind(&self, angle_deg: f32, strength: f32) {
        let mut state = self.state.write();
        state.angle_deg = wrap_degrees(angle_deg);
        state.strength = strength;
    }

    pub fn angle_deg(&self) -> f32 {
        self.state.read().angle_deg
    }

    /// Wind velocity vector
    pub fn direction(&self) -> Vec3 {
        let state = *self.state.read();
        let rad = state.angle_deg.to_radians();
        Vec3::new(rad.cos(), 0.0, rad.sin()) * state.strength
    }
}

impl Default for GlobalWind {
    fn default() -> Self {
        Self::new(0.0, 10.0)
    }
}

impl WindSource for GlobalWind {
    fn sample_wind(&self, _position: Vec3) -> Vec3 {
        self.direction()
    }

    fn strength(&self) -> f32 {
        self.state.read().strength
    }
}

fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
