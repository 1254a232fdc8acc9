//! # Cloth Sail Simulator
//!
//! One step, in order:
//!
//! ```text
//!   leech stiffness ← trim
//!   normals ← triangles
//!   per node: lift + drag + pressure + gravity (+ flutter)     [parallel]
//!   clew    : port sheet + starboard sheet
//!   integrate (Verlet)
//!   boat    : forward drive (+ optional heel torque)
//!   relax springs  lerp(min, max, trim) passes
//! ```

use std::sync::Arc;

use bevy::math::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::aero::{node_aero_force, NodeAero};
use super::power::SailPower;
use super::sheet::Sheet;
use super::{RelaxationSchedule, SailConfig};
use crate::body::RigidBody;
use crate::cloth::{GridStiffness, SailGrid};
use crate::constants::{
    BEND_STIFFNESS_FACTOR, FLUTTER_FACTOR, SAIL_GRAVITY_SCALE_LEECH, SAIL_GRAVITY_SCALE_LUFF,
    VECTOR_EPSILON,
};
use crate::error::{Result, TradewindError};
use crate::math::{clamp01, lerp, triangle_area};
use crate::wind::WindSource;

/// Node count above which the aero pass runs on the rayon pool
const PARALLEL_AERO_THRESHOLD: usize = 64;

/// What one sail step did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SailStepReport {
    pub power: SailPower,
    /// Forward drive applied to the body (N)
    pub drive_force: Vec3,
    /// Sum of node aerodynamic forces in world space (N)
    pub aerodynamic_force: Vec3,
    /// Force-weighted node position in world space
    pub center_of_effort: Vec3,
    pub relaxation_passes: usize,
    /// Nodes with no lift this step
    pub stalled_nodes: usize,
}

/// Mass-spring sail bound to a wind source.
pub struct ClothSail {
    config: SailConfig,
    grid: SailGrid,
    port: Sheet,
    starboard: Sheet,
    wind: Arc<dyn WindSource>,
    area_per_node: f32,
    gravity_scales: Vec<f32>,
    rng: ChaCha8Rng,
    pass_accumulator: f32,
    last_report: SailStepReport,
}

impl ClothSail {
    /// Builds the grid and sheets from `config`.
    ///
    /// Fails on invalid segments or when head, tack and clew are collinear.
    pub fn new(config: SailConfig, wind: Arc<dyn WindSource>) -> Result<Self> {
        config.validate()?;

        let area = triangle_area(config.head, config.tack, config.clew);
        if area < VECTOR_EPSILON {
            return Err(TradewindError::DegenerateSail { area });
        }

        let active_trim = config.port_trim.max(config.starboard_trim);
        let stiffness = GridStiffness {
            structural: config.structural_stiffness,
            shear: config.shear_stiffness,
            bend: config.luff_stiffness * BEND_STIFFNESS_FACTOR,
            leech_rail: config.leech_stiffness * config.starboard_trim,
        };
        let mut grid = SailGrid::triangular(
            config.head,
            config.tack,
            config.clew,
            config.horizontal_segments,
            config.vertical_segments,
            config.node_damping,
            stiffness,
        )?;
        grid.set_leech_stiffness(clamp01(config.leech_stiffness * active_trim));

        Self::from_grid(config, grid, wind, area)
    }

    /// Wraps a prebuilt grid. `sail_area` is shared evenly between nodes.
    pub fn from_grid(
        config: SailConfig,
        grid: SailGrid,
        wind: Arc<dyn WindSource>,
        sail_area: f32,
    ) -> Result<Self> {
        config.validate()?;

        let clew = grid.nodes[grid.clew_index()].position;
        let port = Sheet::new(
            config.port_attach,
            clew,
            config.port_sheet_stiffness,
            config.port_trim,
        );
        let starboard = Sheet::new(
            config.starboard_attach,
            clew,
            config.starboard_sheet_stiffness,
            config.starboard_trim,
        );

        let area_per_node = sail_area / grid.node_count().max(1) as f32;
        let gravity_scales = grid
            .u_coords()
            .iter()
            .map(|&u| lerp(SAIL_GRAVITY_SCALE_LUFF, SAIL_GRAVITY_SCALE_LEECH, u))
            .collect();

        info!(
            "Sail built: {} nodes, {} springs, {:.2} m² per node",
            grid.node_count(),
            grid.springs.len(),
            area_per_node
        );

        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            grid,
            port,
            starboard,
            wind,
            area_per_node,
            gravity_scales,
            pass_accumulator: 0.0,
            last_report: SailStepReport::default(),
        })
    }

    // ------------------------------------------------------------------------
    // Controls
    // ------------------------------------------------------------------------

    pub fn set_port_trim(&mut self, trim: f32) {
        self.port.set_trim(trim);
    }

    pub fn set_starboard_trim(&mut self, trim: f32) {
        self.starboard.set_trim(trim);
    }

    pub fn port_trim(&self) -> f32 {
        self.port.trim()
    }

    pub fn starboard_trim(&self) -> f32 {
        self.starboard.trim()
    }

    /// Trim of the tighter sheet
    pub fn active_trim(&self) -> f32 {
        self.port.trim().max(self.starboard.trim())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn grid(&self) -> &SailGrid {
        &self.grid
    }

    /// Direct node access, e.g. to reset or disturb the cloth
    pub fn grid_mut(&mut self) -> &mut SailGrid {
        &mut self.grid
    }

    pub fn config(&self) -> &SailConfig {
        &self.config
    }

    pub fn last_report(&self) -> &SailStepReport {
        &self.last_report
    }

    pub fn total_spring_tension(&self) -> f32 {
        self.grid.total_spring_tension()
    }

    /// Spring segments in world space for debug drawing
    pub fn debug_lines(&self, body: &dyn RigidBody) -> Vec<(Vec3, Vec3)> {
        self.grid
            .springs
            .iter()
            .map(|s| {
                (
                    body.transform_point(self.grid.nodes[s.a].position),
                    body.transform_point(self.grid.nodes[s.b].position),
                )
            })
            .collect()
    }

    // ------------------------------------------------------------------------
    // Step
    // ------------------------------------------------------------------------

    pub fn step(&mut self, body: &mut dyn RigidBody, dt: f32) -> SailStepReport {
        if dt <= 0.0 {
            warn!("Sail step skipped: non-positive dt {dt}");
            return self.last_report;
        }

        let active_trim = self.active_trim();
        self.grid
            .set_leech_stiffness(clamp01(self.config.leech_stiffness * active_trim));
        self.grid.recalculate_normals();

        let sail_center = body.transform_point(
            (self.config.head + self.config.tack + self.config.clew) / 3.0,
        );
        let true_wind = self.wind.sample_wind(sail_center);
        let local_wind = body.rotation().inverse() * true_wind;

        let (aero_local, center_local, stalled) = self.apply_aero(local_wind, active_trim);
        self.apply_sheets(dt);
        self.grid.integrate(dt);

        let apparent_wind = true_wind - body.linear_velocity();
        let power = self.config.power_model.evaluate(
            body.forward(),
            body.up(),
            apparent_wind,
            self.port.trim(),
            self.starboard.trim(),
        );
        let drive_force =
            body.forward() * (power.power * self.config.max_sail_power * self.wind.strength());
        body.add_force(drive_force);

        let aerodynamic_force = body.rotation() * aero_local;
        let center_of_effort = body.transform_point(center_local);
        if self.config.heel_sensitivity > 0.0 {
            let arm = center_of_effort - body.world_center_of_mass();
            body.add_torque(arm.cross(aerodynamic_force) * self.config.heel_sensitivity);
        }

        let relaxation_passes = self.relaxation_passes(active_trim);
        for _ in 0..relaxation_passes {
            self.grid.relax();
        }
        debug!(
            passes = relaxation_passes,
            power = power.power,
            awa = power.apparent_wind_angle,
            "sail step"
        );

        self.last_report = SailStepReport {
            power,
            drive_force,
            aerodynamic_force,
            center_of_effort,
            relaxation_passes,
            stalled_nodes: stalled,
        };
        self.last_report
    }

    /// Applies aero, gravity and flutter to every node. Returns the sail-local
    /// aero resultant, its center of effort and the stalled node count.
    fn apply_aero(&mut self, local_wind: Vec3, active_trim: f32) -> (Vec3, Vec3, usize) {
        let wind_speed = local_wind.length();
        let scaled_speed = wind_speed * self.config.wind_scale;
        let q_area = 0.5 * scaled_speed * scaled_speed * self.area_per_node;
        let wind_dir = local_wind.normalize_or_zero();
        let stall = self.config.stall_angle_deg;

        let normals = self.grid.normals();
        let forces: Vec<NodeAero> =
            if self.config.parallel_aero && normals.len() >= PARALLEL_AERO_THRESHOLD {
                normals
                    .par_iter()
                    .map(|&n| node_aero_force(n, wind_dir, q_area, stall))
                    .collect()
            } else {
                normals
                    .iter()
                    .map(|&n| node_aero_force(n, wind_dir, q_area, stall))
                    .collect()
            };

        let flutter_strength = wind_speed * FLUTTER_FACTOR * (1.0 - active_trim);
        let gravity = Vec3::NEG_Y * self.config.gravity_strength;

        let mut resultant = Vec3::ZERO;
        let mut weighted_position = Vec3::ZERO;
        let mut weight = 0.0;
        let mut stalled = 0;

        for (i, aero) in forces.iter().enumerate() {
            let mut force = aero.force;
            if aero.lift_coefficient == 0.0 {
                stalled += 1;
                if self.config.flutter && flutter_strength > 0.0 {
                    force += random_unit_sphere(&mut self.rng) * flutter_strength;
                }
            }

            let node = &mut self.grid.nodes[i];
            let magnitude = aero.force.length();
            resultant += aero.force;
            weighted_position += node.position * magnitude;
            weight += magnitude;

            node.apply_external_force(force + gravity * self.gravity_scales[i]);
        }

        let center = if weight > VECTOR_EPSILON {
            weighted_position / weight
        } else {
            (self.config.head + self.config.tack + self.config.clew) / 3.0
        };
        (resultant, center, stalled)
    }

    fn apply_sheets(&mut self, dt: f32) {
        let clew_index = self.grid.clew_index();
        let clew = self.grid.nodes[clew_index];
        let damping = self.config.sheet_damping;
        let preload = self.config.preload_fraction;
        let force = self.port.force(&clew, dt, damping, preload)
            + self.starboard.force(&clew, dt, damping, preload);
        self.grid.nodes[clew_index].apply_external_force(force);
    }

    /// `lerp(min, max, trim)` passes; the fractional part becomes one extra
    /// pass on some steps.
    fn relaxation_passes(&mut self, active_trim: f32) -> usize {
        let target = lerp(
            self.config.min_passes as f32,
            self.config.max_passes as f32,
            active_trim,
        );
        let base = target.floor();
        let fraction = target - base;

        let extra = match self.config.relaxation {
            RelaxationSchedule::Accumulated => {
                self.pass_accumulator += fraction;
                if self.pass_accumulator >= 1.0 {
                    self.pass_accumulator -= 1.0;
                    1
                } else {
                    0
                }
            }
            RelaxationSchedule::Stochastic => usize::from(self.rng.gen::<f32>() < fraction),
        };
        base as usize + extra
    }
}

/// Uniform sample inside the unit ball
fn random_unit_sphere(rng: &mut ChaCha8Rng) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::RigidBodyState;
    use crate::wind::GlobalWind;

    fn calm() -> Arc<dyn WindSource> {
        Arc::new(GlobalWind::new(0.0, 0.0))
    }

    #[test]
    fn test_collinear_sail_rejected() {
        let config = SailConfig {
            head: Vec3::new(0.0, 2.0, 0.0),
            tack: Vec3::ZERO,
            clew: Vec3::new(0.0, 1.0, 0.0),
            ..Default::default()
        };
        assert!(matches!(
            ClothSail::new(config, calm()),
            Err(TradewindError::DegenerateSail { .. })
        ));
    }

    #[test]
    fn test_accumulated_passes_average_to_target() {
        let config = SailConfig {
            port_trim: 0.1,
            starboard_trim: 0.0,
            ..Default::default()
        };
        let mut sail = ClothSail::new(config, calm()).unwrap();
        // lerp(5, 20, 0.1) = 6.5
        let total: usize = (0..100).map(|_| sail.relaxation_passes(0.1)).sum();
        assert!((649..=651).contains(&total));
    }

    #[test]
    fn test_stochastic_passes_are_seeded() {
        let config = SailConfig {
            relaxation: RelaxationSchedule::Stochastic,
            ..Default::default()
        };
        let mut a = ClothSail::new(config.clone(), calm()).unwrap();
        let mut b = ClothSail::new(config, calm()).unwrap();
        let pa: Vec<usize> = (0..20).map(|_| a.relaxation_passes(0.37)).collect();
        let pb: Vec<usize> = (0..20).map(|_| b.relaxation_passes(0.37)).collect();
        assert_eq!(pa, pb);
        assert!(pa.iter().all(|&p| p == 10 || p == 11));
    }

    #[test]
    fn test_wind_on_beam_drives_forward() {
        // wind blowing toward -X: arrives over the port beam
        let wind: Arc<dyn WindSource> = Arc::new(GlobalWind::new(180.0, 8.0));
        let config = SailConfig {
            port_trim: 0.5,
            starboard_trim: 0.5,
            ..Default::default()
        };
        let mut sail = ClothSail::new(config, wind).unwrap();
        let mut body = RigidBodyState::from_box(800.0, Vec3::new(2.5, 1.0, 8.0));
        let report = sail.step(&mut body, 0.02);
        assert!(report.power.power > 0.9);
        assert!(body.accumulated_force.z > 0.0);
        assert!(report.aerodynamic_force.is_finite());
    }

    #[test]
    fn test_calm_step_stays_finite() {
        let mut sail = ClothSail::new(SailConfig::default(), calm()).unwrap();
        let mut body = RigidBodyState::default();
        for _ in 0..50 {
            let report = sail.step(&mut body, 0.02);
            assert_eq!(report.drive_force, Vec3::ZERO);
        }
        assert!(sail.grid().positions().all(|p| p.is_finite()));
    }

    #[test]
    fn test_tighter_trim_stiffens_leech() {
        let mut sail = ClothSail::new(SailConfig::default(), calm()).unwrap();
        let mut body = RigidBodyState::default();
        sail.set_starboard_trim(1.0);
        sail.step(&mut body, 0.02);
        let rail = sail
            .grid()
            .springs
            .iter()
            .find(|s| s.kind == crate::cloth::SpringKind::LeechRail)
            .map(|s| s.stiffness);
        assert_eq!(rail, Some(clamp01(sail.config().leech_stiffness)));
        assert_eq!(sail.last_report().relaxation_passes, 20);
    }
}
