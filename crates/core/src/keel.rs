//! # Keel Foil
//!
//! Lift and drag on a row of sample points along the keel. Only the flow
//! component across the keel counts; the lift from leeway is turned along
//! the keel line and the drag resists the sideways slip.

use std::sync::Arc;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::body::RigidBody;
use crate::constants::SEA_WATER_DENSITY;
use crate::math::{project_on_plane, signed_angle_deg};
use crate::surface::{SurfaceRequest, SurfaceSampler};

/// Squared lateral speed below which a point is skipped (m²/s²)
const MIN_LATERAL_SPEED_SQ: f32 = 1e-4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeelConfig {
    /// Body-local sample points along the foil
    pub points: Vec<Vec3>,
    /// Foil area per point (m²)
    pub area: f32,
    /// dCL/dα per radian
    pub lift_slope: f32,
    pub drag_coefficient: f32,
    pub water_density: f32,
}

impl Default for KeelConfig {
    fn default() -> Self {
        Self {
            points: vec![Vec3::new(0.0, -1.6, 0.6), Vec3::new(0.0, -1.6, -0.6)],
            area: 2.0,
            lift_slope: 2.0 * std::f32::consts::PI,
            drag_coefficient: 0.1,
            water_density: SEA_WATER_DENSITY,
        }
    }
}

/// Forces the keel applied during one step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeelReport {
    pub data_ready: bool,
    pub lift: Vec3,
    pub drag: Vec3,
    /// Points that were below the surface and moving sideways
    pub active_points: usize,
}

pub struct KeelFoil {
    config: KeelConfig,
    sampler: Arc<dyn SurfaceSampler>,
    request: SurfaceRequest,
    world_points: Vec<Vec3>,
}

impl KeelFoil {
    pub fn new(config: KeelConfig, sampler: Arc<dyn SurfaceSampler>) -> Self {
        info!("Keel foil: {} sample points", config.points.len());
        Self {
            world_points: Vec::with_capacity(config.points.len()),
            config,
            sampler,
            request: SurfaceRequest::new(),
        }
    }

    pub fn config(&self) -> &KeelConfig {
        &self.config
    }

    /// Does nothing until the surface batch for the points is ready.
    pub fn step(&mut self, body: &mut dyn RigidBody) -> KeelReport {
        self.world_points.clear();
        self.world_points
            .extend(self.config.points.iter().map(|&p| body.transform_point(p)));

        let Some(samples) = self
            .request
            .poll(self.sampler.as_ref(), &self.world_points)
        else {
            return KeelReport::default();
        };

        let c = &self.config;
        let keel_dir = body.forward();
        let mut report = KeelReport {
            data_ready: true,
            ..Default::default()
        };

        for (point, sample) in self.world_points.iter().zip(samples) {
            if sample.position.y <= point.y {
                continue;
            }
            let relative = body.point_velocity(*point) - sample.velocity;
            let lateral = project_on_plane(relative, keel_dir);
            let v2 = lateral.length_squared();
            if v2 < MIN_LATERAL_SPEED_SQ {
                continue;
            }

            let q_area = 0.5 * c.water_density * v2 * c.area;
            let alpha = signed_angle_deg(lateral, keel_dir, Vec3::Y).to_radians();
            let lift = Vec3::Y.cross(lateral).normalize_or_zero() * (q_area * c.lift_slope * alpha);
            let drag = -lateral.normalize_or_zero() * (q_area * c.drag_coefficient);

            body.add_force_at_position(lift + drag, *point);
            report.lift += lift;
            report.drag += drag;
            report.active_points += 1;
        }

        debug!(active = report.active_points, "keel step");
        report
    }
}
