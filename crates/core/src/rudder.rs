//! # Rudder
//!
//! Thin-foil rudder at the stern. Steering input in [-1, 1] maps to a blade
//! angle; lift is capped at a fixed coefficient so hard-over steering stalls
//! instead of growing without bound. Positive steer pushes the stern to
//! port, swinging the bow to starboard.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::body::RigidBody;
use crate::constants::FRESH_WATER_DENSITY;

/// Below this hull speed at the rudder nothing is applied (m/s)
const MIN_FLOW_SPEED: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RudderConfig {
    /// Body-local blade position
    pub position: Vec3,
    /// Blade area (m²)
    pub area: f32,
    pub lift_slope: f32,
    /// Blade angle at full steer (degrees)
    pub max_angle_deg: f32,
    /// Lift coefficient cap
    pub max_lift_coefficient: f32,
    pub water_density: f32,
    /// N·m per rad/s of yaw rate
    pub yaw_damping: f32,
}

impl Default for RudderConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -0.8, -3.8),
            area: 0.5,
            lift_slope: 2.0 * std::f32::consts::PI,
            max_angle_deg: 30.0,
            max_lift_coefficient: 0.8,
            water_density: FRESH_WATER_DENSITY,
            yaw_damping: 500.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RudderReport {
    /// Blade angle (degrees)
    pub angle_deg: f32,
    /// Angle of attack (radians)
    pub angle_of_attack: f32,
    pub lift_coefficient: f32,
    pub lift: Vec3,
    pub yaw_torque: Vec3,
}

#[derive(Debug, Clone, Default)]
pub struct Rudder {
    config: RudderConfig,
    steer: f32,
}

impl Rudder {
    pub fn new(config: RudderConfig) -> Self {
        Self { config, steer: 0.0 }
    }

    pub fn config(&self) -> &RudderConfig {
        &self.config
    }

    /// Steering input, clamped to [-1, 1]
    pub fn set_steer(&mut self, steer: f32) {
        self.steer = steer.clamp(-1.0, 1.0);
    }

    pub fn steer(&self) -> f32 {
        self.steer
    }

    pub fn angle_deg(&self) -> f32 {
        self.steer * self.config.max_angle_deg
    }

    pub fn step(&self, body: &mut dyn RigidBody) -> RudderReport {
        let c = &self.config;
        let angle_deg = self.angle_deg();
        let mut report = RudderReport {
            angle_deg,
            ..Default::default()
        };

        let blade = body.transform_point(c.position);
        let velocity = body.point_velocity(blade);
        let speed = velocity.length();
        if speed < MIN_FLOW_SPEED {
            return report;
        }

        let flow = velocity / speed;
        let local_flow = body.rotation().inverse() * flow;
        let aoa = local_flow.x.atan2(local_flow.z) - angle_deg.to_radians();
        let cl = (c.lift_slope * aoa).clamp(-c.max_lift_coefficient, c.max_lift_coefficient);

        let lift_dir = flow.cross(body.up()).normalize_or_zero();
        let lift = lift_dir * (0.5 * c.water_density * speed * speed * c.area * cl);
        body.add_force_at_position(lift, blade);

        let yaw_torque = Vec3::Y * (-body.angular_velocity().y * c.yaw_damping);
        body.add_torque(yaw_torque);

        report.angle_of_attack = aoa;
        report.lift_coefficient = cl;
        report.lift = lift;
        report.yaw_torque = yaw_torque;
        report
    }
}
