//! # Mesh Buoyancy
//!
//! Archimedes force from clipping every hull triangle at the sampled water
//! surface, applied at the center of buoyancy and low-pass filtered.

use std::sync::Arc;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clip::{submerged_volume, SubmergedVolume};
use super::{BuoyancyReport, HullMesh};
use crate::body::RigidBody;
use crate::constants::{GRAVITY, SEA_WATER_DENSITY, VOLUME_EPSILON};
use crate::math::{clamp01, triangle_area};
use crate::surface::{SurfaceRequest, SurfaceSampler};

/// Tunables for [`MeshBuoyancy`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshBuoyancyConfig {
    /// Fluid density (kg/m³)
    pub water_density: f32,
    pub gravity: f32,
    /// Viscous drag per unit of triangle area
    pub drag_coefficient: f32,
    /// Angular velocity damping, applied as acceleration
    pub angular_damping: f32,
    /// Time constant of the buoyant force filter (s)
    pub smoothing_time: f32,
    /// Body-local center of mass set by `initialize`
    pub center_of_mass: Option<Vec3>,
}

impl Default for MeshBuoyancyConfig {
    fn default() -> Self {
        Self {
            water_density: SEA_WATER_DENSITY,
            gravity: GRAVITY,
            drag_coefficient: 1.0,
            angular_damping: 1.0,
            smoothing_time: 0.1,
            center_of_mass: Some(Vec3::new(0.0, -1.0, 0.0)),
        }
    }
}

/// Hull buoyancy from a closed helper mesh.
pub struct MeshBuoyancy {
    config: MeshBuoyancyConfig,
    mesh: HullMesh,
    sampler: Arc<dyn SurfaceSampler>,
    request: SurfaceRequest,
    world_vertices: Vec<Vec3>,
    smoothed_force: Vec3,
}

impl MeshBuoyancy {
    pub fn new(
        config: MeshBuoyancyConfig,
        mesh: HullMesh,
        sampler: Arc<dyn SurfaceSampler>,
    ) -> Self {
        info!(
            "Mesh buoyancy: {} vertices, {} triangles",
            mesh.vertices().len(),
            mesh.triangles().len()
        );
        Self {
            world_vertices: Vec::with_capacity(mesh.vertices().len()),
            config,
            mesh,
            sampler,
            request: SurfaceRequest::new(),
            smoothed_force: Vec3::ZERO,
        }
    }

    pub fn initialize(&mut self, body: &mut dyn RigidBody) {
        if let Some(com) = self.config.center_of_mass {
            body.set_center_of_mass(com);
        }
    }

    pub fn mesh(&self) -> &HullMesh {
        &self.mesh
    }

    pub fn smoothed_force(&self) -> Vec3 {
        self.smoothed_force
    }

    /// Applies drag, buoyancy and angular damping for one step.
    ///
    /// Until the first surface batch arrives the body is held kinematic and
    /// nothing is applied. A hull clear of the water gets drag only.
    pub fn step(&mut self, body: &mut dyn RigidBody, dt: f32) -> BuoyancyReport {
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.mesh.vertices().iter().map(|&v| body.transform_point(v)));

        let Some(samples) = self
            .request
            .poll(self.sampler.as_ref(), &self.world_vertices)
        else {
            body.set_kinematic(true);
            return BuoyancyReport::default();
        };
        body.set_kinematic(false);

        let vertices = &self.world_vertices;
        let mut total = SubmergedVolume::default();
        let mut drag_force = Vec3::ZERO;
        let mut submerged_vertices = 0usize;

        for &[i0, i1, i2] in self.mesh.triangles() {
            let hull = [vertices[i0], vertices[i1], vertices[i2]];
            let heights = [
                samples[i0].position.y,
                samples[i1].position.y,
                samples[i2].position.y,
            ];
            total += submerged_volume(hull, heights);

            let per_vertex_area = triangle_area(hull[0], hull[1], hull[2]) / 3.0;
            for &vi in &[i0, i1, i2] {
                let point = vertices[vi];
                if samples[vi].position.y <= point.y {
                    continue;
                }
                let relative = body.point_velocity(point) - samples[vi].velocity;
                let drag = -relative * (self.config.drag_coefficient * per_vertex_area);
                body.add_force_at_position(drag, point);
                drag_force += drag;
                submerged_vertices += 1;
            }
        }

        let mut report = BuoyancyReport {
            data_ready: true,
            submerged_volume: total.volume,
            drag_force,
            submerged_fraction: submerged_vertices as f32
                / (self.mesh.triangles().len() * 3).max(1) as f32,
            ..Default::default()
        };

        if total.volume > VOLUME_EPSILON {
            let center = total.moment / total.volume;
            let raw = Vec3::Y * (self.config.water_density * total.volume * self.config.gravity);
            let alpha = if self.config.smoothing_time > 0.0 {
                clamp01(dt / self.config.smoothing_time)
            } else {
                1.0
            };
            self.smoothed_force = self.smoothed_force.lerp(raw, alpha);
            body.add_force_at_position(self.smoothed_force, center);

            report.center_of_buoyancy = center;
            report.buoyant_force = self.smoothed_force;

            body.add_angular_acceleration(-body.angular_velocity() * self.config.angular_damping);
        }

        debug!(
            volume = total.volume,
            force = report.buoyant_force.y,
            "mesh buoyancy step"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBodyState;
    use crate::surface::{FlatWater, LatentSampler};

    /// Closed box hull, 2 m wide, 1 m tall, 4 m long, centered on the origin
    fn box_hull() -> HullMesh {
        let (x, y, z) = (1.0, 0.5, 2.0);
        let vertices = vec![
            Vec3::new(-x, -y, -z),
            Vec3::new(x, -y, -z),
            Vec3::new(x, y, -z),
            Vec3::new(-x, y, -z),
            Vec3::new(-x, -y, z),
            Vec3::new(x, -y, z),
            Vec3::new(x, y, z),
            Vec3::new(-x, y, z),
        ];
        let triangles = vec![
            [0, 2, 1], [0, 3, 2], // back
            [4, 5, 6], [4, 6, 7], // front
            [0, 1, 5], [0, 5, 4], // bottom
            [3, 7, 6], [3, 6, 2], // top
            [0, 4, 7], [0, 7, 3], // left
            [1, 2, 6], [1, 6, 5], // right
        ];
        HullMesh::new(vertices, triangles).unwrap()
    }

    #[test]
    fn test_freeze_without_surface_data() {
        let water = Arc::new(FlatWater::new(0.0));
        let sampler: Arc<dyn SurfaceSampler> = Arc::new(LatentSampler::new(water, u64::MAX));
        let mut buoyancy = MeshBuoyancy::new(MeshBuoyancyConfig::default(), box_hull(), sampler);
        let mut body = RigidBodyState::from_box(2000.0, Vec3::new(2.0, 1.0, 4.0));
        let before = body.clone();

        let report = buoyancy.step(&mut body, 0.02);

        assert!(!report.data_ready);
        assert!(body.kinematic);
        assert_eq!(body.accumulated_force, Vec3::ZERO);
        assert_eq!(body.accumulated_torque, Vec3::ZERO);
        assert_eq!(body.position, before.position);
        assert_eq!(body.linear_velocity, before.linear_velocity);
    }

    #[test]
    fn test_half_submerged_box_displaces_half_volume() {
        let sampler: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
        let config = MeshBuoyancyConfig {
            smoothing_time: 0.0,
            ..Default::default()
        };
        let mut buoyancy = MeshBuoyancy::new(config, box_hull(), sampler);
        let mut body = RigidBodyState::from_box(2000.0, Vec3::new(2.0, 1.0, 4.0));

        let report = buoyancy.step(&mut body, 0.02);

        assert!(report.data_ready);
        assert!(!body.kinematic);
        // 2 × 0.5 × 4 below the waterline; only the bottom faces contribute
        assert!((report.submerged_volume - 4.0).abs() < 1e-3);
        let expected = SEA_WATER_DENSITY * 4.0 * GRAVITY;
        assert!((report.buoyant_force.y - expected).abs() < 1.0);
        assert!((report.center_of_buoyancy.y + 0.25).abs() < 1e-3);
    }

    #[test]
    fn test_force_is_smoothed() {
        let sampler: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
        let mut buoyancy = MeshBuoyancy::new(MeshBuoyancyConfig::default(), box_hull(), sampler);
        let mut body = RigidBodyState::from_box(2000.0, Vec3::new(2.0, 1.0, 4.0));
        let first = buoyancy.step(&mut body, 0.02).buoyant_force.y;
        let second = buoyancy.step(&mut body, 0.02).buoyant_force.y;
        let raw = SEA_WATER_DENSITY * 4.0 * GRAVITY;
        assert!((first - raw * 0.2).abs() < 1.0);
        assert!(second > first && second < raw);
    }

    #[test]
    fn test_airborne_hull_gets_nothing() {
        let sampler: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(-10.0));
        let mut buoyancy = MeshBuoyancy::new(MeshBuoyancyConfig::default(), box_hull(), sampler);
        let mut body = RigidBodyState {
            angular_velocity: Vec3::Y,
            ..Default::default()
        };
        let report = buoyancy.step(&mut body, 0.02);
        assert!(report.data_ready);
        assert_eq!(report.submerged_volume, 0.0);
        assert_eq!(body.accumulated_force, Vec3::ZERO);
        assert_eq!(body.accumulated_torque, Vec3::ZERO);
        assert_eq!(body.accumulated_angular_acceleration, Vec3::ZERO);
    }

    #[test]
    fn test_floating_hull_damps_rotation() {
        let sampler: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
        let mut buoyancy = MeshBuoyancy::new(MeshBuoyancyConfig::default(), box_hull(), sampler);
        let mut body = RigidBodyState {
            angular_velocity: Vec3::Y,
            ..RigidBodyState::from_box(2000.0, Vec3::new(2.0, 1.0, 4.0))
        };
        buoyancy.step(&mut body, 0.02);
        assert!((body.accumulated_angular_acceleration - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_sinking_hull_feels_drag() {
        let sampler: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
        let mut buoyancy = MeshBuoyancy::new(MeshBuoyancyConfig::default(), box_hull(), sampler);
        let mut body = RigidBodyState {
            linear_velocity: Vec3::new(0.0, -2.0, 0.0),
            ..RigidBodyState::from_box(2000.0, Vec3::new(2.0, 1.0, 4.0))
        };
        let report = buoyancy.step(&mut body, 0.02);
        assert!(report.drag_force.y > 0.0);
    }
}
