//! # Stabilizer
//!
//! PD attitude controllers standing in for hull form stability. Each torque
//! pulls the body toward level and damps the matching angular rate:
//!
//! - roll about the forward axis
//! - pitch about the right axis
//! - yaw damping about the up axis
//! - weathervaning: the bow is turned toward the horizontal velocity
//!   once the boat is moving

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::RigidBody;
use crate::math::{project_on_plane, signed_angle_deg};

/// Gains for [`Stabilizer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// N·m per radian of roll
    pub roll_stiffness: f32,
    /// N·m per rad/s of roll rate
    pub roll_damping: f32,
    pub pitch_stiffness: f32,
    pub pitch_damping: f32,
    /// N·m per rad/s of yaw rate
    pub yaw_damping: f32,
    /// N·m per radian between heading and course
    pub yaw_restoring: f32,
    /// Squared horizontal speed below which weathervaning is off (m²/s²)
    pub min_restoring_speed_sq: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            roll_stiffness: 500.0,
            roll_damping: 50.0,
            pitch_stiffness: 300.0,
            pitch_damping: 30.0,
            yaw_damping: 200.0,
            yaw_restoring: 2000.0,
            min_restoring_speed_sq: 0.1,
        }
    }
}

/// Torques applied by one [`Stabilizer::apply`] call, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StabilizerTorques {
    pub roll: Vec3,
    pub pitch: Vec3,
    pub yaw: Vec3,
}

impl StabilizerTorques {
    pub fn total(&self) -> Vec3 {
        self.roll + self.pitch + self.yaw
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stabilizer {
    config: StabilizerConfig,
}

impl Stabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StabilizerConfig {
        &self.config
    }

    /// Adds the stabilizing torques to `body`. A frozen body is left alone.
    pub fn apply(&self, body: &mut dyn RigidBody) -> StabilizerTorques {
        if body.is_kinematic() {
            return StabilizerTorques::default();
        }

        let c = &self.config;
        let forward = body.forward();
        let right = body.right();
        let up = body.up();
        let omega = body.angular_velocity();

        // error angles are measured from the current attitude toward level
        let roll_error = signed_angle_deg(up, Vec3::Y, forward).to_radians();
        let roll = forward * (c.roll_stiffness * roll_error - c.roll_damping * omega.dot(forward));

        let level_forward = project_on_plane(forward, Vec3::Y);
        let pitch_error = signed_angle_deg(forward, level_forward, right).to_radians();
        let pitch = right * (c.pitch_stiffness * pitch_error - c.pitch_damping * omega.dot(right));

        let mut yaw = up * (-c.yaw_damping * omega.dot(up));
        let course = project_on_plane(body.linear_velocity(), Vec3::Y);
        if course.length_squared() > c.min_restoring_speed_sq {
            let heading = project_on_plane(forward, Vec3::Y);
            let yaw_error = signed_angle_deg(heading, course, Vec3::Y).to_radians();
            yaw += Vec3::Y * (yaw_error * c.yaw_restoring);
        }

        let torques = StabilizerTorques { roll, pitch, yaw };
        body.add_torque(torques.total());
        torques
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBodyState;
    use bevy::math::Quat;

    fn boat() -> RigidBodyState {
        RigidBodyState::from_box(1000.0, Vec3::new(2.5, 1.0, 8.0))
    }

    #[test]
    fn test_level_body_at_rest_gets_no_torque() {
        let mut body = boat();
        let torques = Stabilizer::default().apply(&mut body);
        assert!(torques.total().length() < 1e-4);
    }

    #[test]
    fn test_roll_is_opposed() {
        // heeled to port: the body rotates negatively about forward
        let mut body = boat().with_rotation(Quat::from_rotation_z(-0.3));
        let torques = Stabilizer::default().apply(&mut body);
        assert!(torques.roll.dot(body.forward()) > 0.0);
        assert!((torques.roll.length() - 500.0 * 0.3).abs() < 1.0);
    }

    #[test]
    fn test_pitch_is_opposed() {
        // bow down: forward dips below the horizon
        let mut body = boat().with_rotation(Quat::from_rotation_x(0.2));
        assert!(body.forward().y < 0.0);
        let torques = Stabilizer::default().apply(&mut body);
        // rotating negatively about +X lifts +Z
        assert!(torques.pitch.dot(Vec3::X) < 0.0);
    }

    #[test]
    fn test_roll_rate_is_damped() {
        let mut body = boat();
        body.angular_velocity = Vec3::Z * 2.0;
        let torques = Stabilizer::default().apply(&mut body);
        assert!((torques.roll.z + 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_bow_turns_toward_course() {
        let mut body = boat();
        // drifting forward and to port
        body.linear_velocity = Vec3::new(1.0, 0.0, 1.0);
        let torques = Stabilizer::default().apply(&mut body);
        // positive yaw about +Y swings +Z toward +X
        assert!(torques.yaw.y > 0.0);
    }

    #[test]
    fn test_slow_drift_does_not_weathervane() {
        let mut body = boat();
        body.linear_velocity = Vec3::new(0.2, 0.0, 0.0);
        let torques = Stabilizer::default().apply(&mut body);
        assert!(torques.yaw.length() < 1e-6);
    }

    #[test]
    fn test_frozen_body_untouched() {
        let mut body = boat().with_rotation(Quat::from_rotation_z(0.5));
        body.kinematic = true;
        let torques = Stabilizer::default().apply(&mut body);
        assert_eq!(torques, StabilizerTorques::default());
        assert_eq!(body.accumulated_torque, Vec3::ZERO);
    }
}
