//! # Line Buoyancy
//!
//! Simplified hull made of sample points along the centre line and the port
//! side (mirrored to starboard). Each submerged point carries an equal share
//! of the Archimedes force, ramped by `sqrt(depth)` over the first metre.

use std::sync::Arc;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::BuoyancyReport;
use crate::body::RigidBody;
use crate::constants::{FRESH_WATER_DENSITY, GRAVITY};
use crate::error::{Result, TradewindError};
use crate::math::{clamp01, lerp};
use crate::surface::{SurfaceRequest, SurfaceSampler};

/// Depth over which a point reaches its full share of buoyancy (m)
const FULL_BUOYANCY_DEPTH: f32 = 1.0;

/// Mass-proportional damping per point
const POINT_DAMPING: f32 = 0.05;

/// Tunables for [`LineBuoyancy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineBuoyancyConfig {
    /// Body-local points on the centre line
    pub center_line: Vec<Vec3>,
    /// Body-local points on the port side; starboard mirrors them
    pub port_line: Vec<Vec3>,
    pub water_density: f32,
    pub gravity: f32,
    /// Hull material density; lighter material floats higher (kg/m³)
    pub material_density: f32,
    /// Linear damping when fully submerged
    pub water_drag: f32,
    /// Linear damping when clear of the water
    pub air_drag: f32,
    /// How strongly surface velocity drags the hull along, 10 = fully
    pub velocity_force: f32,
    pub center_of_mass: Option<Vec3>,
}

impl Default for LineBuoyancyConfig {
    fn default() -> Self {
        Self {
            center_line: vec![
                Vec3::new(0.0, -0.4, 3.5),
                Vec3::new(0.0, -0.6, 1.5),
                Vec3::new(0.0, -0.6, -0.5),
                Vec3::new(0.0, -0.5, -2.5),
                Vec3::new(0.0, -0.3, -4.0),
            ],
            port_line: vec![
                Vec3::new(0.8, -0.2, 2.5),
                Vec3::new(1.2, -0.3, 0.5),
                Vec3::new(1.2, -0.3, -1.5),
                Vec3::new(1.0, -0.2, -3.5),
            ],
            water_density: FRESH_WATER_DENSITY,
            gravity: GRAVITY,
            material_density: 500.0,
            water_drag: 1.0,
            air_drag: 0.1,
            velocity_force: 10.0,
            center_of_mass: Some(Vec3::new(0.0, -1.2, -0.2)),
        }
    }
}

/// Point-sampled hull buoyancy.
pub struct LineBuoyancy {
    config: LineBuoyancyConfig,
    local_points: Vec<Vec3>,
    sampler: Arc<dyn SurfaceSampler>,
    request: SurfaceRequest,
    world_points: Vec<Vec3>,
}

impl LineBuoyancy {
    /// Fails when no sample points are configured.
    pub fn new(config: LineBuoyancyConfig, sampler: Arc<dyn SurfaceSampler>) -> Result<Self> {
        let mut local_points = config.center_line.clone();
        local_points.extend_from_slice(&config.port_line);
        local_points.extend(config.port_line.iter().map(|p| Vec3::new(-p.x, p.y, p.z)));

        if local_points.is_empty() {
            return Err(TradewindError::InvalidHullLines(
                "line buoyancy needs at least one sample point".to_string(),
            ));
        }
        if config.material_density <= 0.0 {
            return Err(TradewindError::InvalidConfig {
                field: "line_buoyancy.material_density",
                reason: format!("{} must be positive", config.material_density),
            });
        }

        info!("Line buoyancy: {} sample points", local_points.len());
        Ok(Self {
            world_points: Vec::with_capacity(local_points.len()),
            config,
            local_points,
            sampler,
            request: SurfaceRequest::new(),
        })
    }

    pub fn initialize(&mut self, body: &mut dyn RigidBody) {
        if let Some(com) = self.config.center_of_mass {
            body.set_center_of_mass(com);
        }
    }

    /// Centre, port and mirrored starboard points in body space
    pub fn local_points(&self) -> &[Vec3] {
        &self.local_points
    }

    pub fn step(&mut self, body: &mut dyn RigidBody) -> BuoyancyReport {
        self.world_points.clear();
        self.world_points
            .extend(self.local_points.iter().map(|&p| body.transform_point(p)));

        let Some(samples) = self
            .request
            .poll(self.sampler.as_ref(), &self.world_points)
        else {
            body.set_kinematic(true);
            return BuoyancyReport::default();
        };
        body.set_kinematic(false);

        let count = self.world_points.len();
        let mass = body.mass();
        let total_archimedes =
            self.config.water_density * self.config.gravity * (mass / self.config.material_density);
        let per_point = Vec3::Y * (total_archimedes / count as f32);
        let water_follow = self.config.velocity_force / 10.0;

        let mut submerged = 0usize;
        let mut buoyant_force = Vec3::ZERO;
        let mut drag_force = Vec3::ZERO;
        let mut moment = Vec3::ZERO;
        let mut moment_weight = 0.0;

        for (point, sample) in self.world_points.iter().zip(samples) {
            let depth = sample.position.y - point.y;
            if depth <= 0.0 {
                continue;
            }
            submerged += 1;

            let lift = per_point * clamp01(depth / FULL_BUOYANCY_DEPTH).sqrt();
            let relative = body.point_velocity(*point) - sample.velocity * water_follow;
            let damping = -relative * (POINT_DAMPING * mass);
            body.add_force_at_position(lift + damping, *point);

            buoyant_force += lift;
            drag_force += damping;
            moment += *point * lift.y;
            moment_weight += lift.y;
        }

        let submerged_fraction = submerged as f32 / count as f32;
        body.set_linear_damping(lerp(
            self.config.air_drag,
            self.config.water_drag,
            submerged_fraction,
        ));

        debug!(submerged, fraction = submerged_fraction, "line buoyancy step");
        BuoyancyReport {
            data_ready: true,
            submerged_volume: buoyant_force.y / (self.config.water_density * self.config.gravity),
            center_of_buoyancy: if moment_weight > 0.0 {
                moment / moment_weight
            } else {
                Vec3::ZERO
            },
            buoyant_force,
            drag_force,
            submerged_fraction,
        }
    }
}
