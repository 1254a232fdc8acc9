//! # Boat
//!
//! Owns every simulator acting on one hull and steps them in a fixed order:
//!
//! ```text
//!   sails (aero → sheets → drive) → engine → rudder → keel → hull buoyancy → stabilizer
//! ```
//!
//! All of them add forces to the same [`RigidBody`]; the host integrates it
//! once after [`Boat::step`] returns.

use std::sync::Arc;

use bevy::math::Vec3;
use tracing::{debug, info};

use crate::body::RigidBody;
use crate::buoyancy::{BuoyancyReport, LineBuoyancy, MeshBuoyancy};
use crate::config::{HullKind, TradewindConfig};
use crate::engine::{BoatEngine, EngineReport};
use crate::error::Result;
use crate::keel::{KeelFoil, KeelReport};
use crate::rudder::{Rudder, RudderReport};
use crate::sail::{ClothSail, SailStepReport};
use crate::stabilizer::{Stabilizer, StabilizerTorques};
use crate::surface::SurfaceSampler;
use crate::wind::WindSource;

/// The hull flotation model
pub enum HullModel {
    Mesh(MeshBuoyancy),
    Line(LineBuoyancy),
}

impl HullModel {
    pub fn initialize(&mut self, body: &mut dyn RigidBody) {
        match self {
            HullModel::Mesh(mesh) => mesh.initialize(body),
            HullModel::Line(line) => line.initialize(body),
        }
    }

    pub fn step(&mut self, body: &mut dyn RigidBody, dt: f32) -> BuoyancyReport {
        match self {
            HullModel::Mesh(mesh) => mesh.step(body, dt),
            HullModel::Line(line) => line.step(body),
        }
    }
}

/// Everything one [`Boat::step`] applied
#[derive(Debug, Clone, Default)]
pub struct BoatStepReport {
    pub sails: Vec<SailStepReport>,
    pub engine: Option<EngineReport>,
    pub rudder: Option<RudderReport>,
    pub keel: Option<KeelReport>,
    pub hull: BuoyancyReport,
    pub stabilizer: StabilizerTorques,
}

impl BoatStepReport {
    /// Combined forward drive of all sails
    pub fn sail_drive(&self) -> Vec3 {
        self.sails.iter().map(|s| s.drive_force).sum()
    }
}

pub struct Boat {
    sails: Vec<ClothSail>,
    hull: HullModel,
    keel: Option<KeelFoil>,
    rudder: Option<Rudder>,
    engine: Option<BoatEngine>,
    stabilizer: Option<Stabilizer>,
    /// Hull had surface data on the last step
    hull_ready: bool,
}

impl Boat {
    /// A bare hull; add parts with the `with_*` builders.
    pub fn new(hull: HullModel) -> Self {
        Self {
            sails: Vec::new(),
            hull,
            keel: None,
            rudder: None,
            engine: None,
            stabilizer: None,
            hull_ready: false,
        }
    }

    /// Builds the boat described by `config`.
    ///
    /// The wind and surface sampler are shared with every part that reads
    /// them.
    pub fn from_config(
        config: &TradewindConfig,
        wind: Arc<dyn WindSource>,
        sampler: Arc<dyn SurfaceSampler>,
    ) -> Result<Self> {
        config.validate()?;
        let layout = &config.boat;

        let hull = match layout.hull {
            HullKind::Mesh => HullModel::Mesh(MeshBuoyancy::new(
                config.mesh_buoyancy.clone(),
                config.hull_lines.build_mesh()?,
                Arc::clone(&sampler),
            )),
            HullKind::Line => HullModel::Line(LineBuoyancy::new(
                config.line_buoyancy.clone(),
                Arc::clone(&sampler),
            )?),
        };

        let mut boat = Self::new(hull);
        if layout.sail {
            boat = boat.with_sail(ClothSail::new(config.sail.clone(), wind)?);
        }
        if layout.keel {
            boat = boat.with_keel(KeelFoil::new(config.keel.clone(), sampler));
        }
        if layout.rudder {
            boat = boat.with_rudder(Rudder::new(config.rudder.clone()));
        }
        if layout.engine {
            boat = boat.with_engine(BoatEngine::new(config.engine.clone()));
        }
        if layout.stabilizer {
            boat = boat.with_stabilizer(Stabilizer::new(config.stabilizer.clone()));
        }

        info!(
            "Boat built: {:?} hull, {} sail(s), keel={}, rudder={}, engine={}",
            layout.hull,
            boat.sails.len(),
            boat.keel.is_some(),
            boat.rudder.is_some(),
            boat.engine.is_some()
        );
        Ok(boat)
    }

    pub fn with_sail(mut self, sail: ClothSail) -> Self {
        self.sails.push(sail);
        self
    }

    pub fn with_keel(mut self, keel: KeelFoil) -> Self {
        self.keel = Some(keel);
        self
    }

    pub fn with_rudder(mut self, rudder: Rudder) -> Self {
        self.rudder = Some(rudder);
        self
    }

    pub fn with_engine(mut self, engine: BoatEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    pub fn with_stabilizer(mut self, stabilizer: Stabilizer) -> Self {
        self.stabilizer = Some(stabilizer);
        self
    }

    /// Sets the hull's center of mass on `body`
    pub fn initialize(&mut self, body: &mut dyn RigidBody) {
        self.hull.initialize(body);
    }

    pub fn sails(&self) -> &[ClothSail] {
        &self.sails
    }

    pub fn sails_mut(&mut self) -> &mut [ClothSail] {
        &mut self.sails
    }

    pub fn hull(&self) -> &HullModel {
        &self.hull
    }

    pub fn engine(&self) -> Option<&BoatEngine> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut BoatEngine> {
        self.engine.as_mut()
    }

    pub fn rudder(&self) -> Option<&Rudder> {
        self.rudder.as_ref()
    }

    /// Rudder input in [-1, 1]; ignored without a rudder
    pub fn set_steer(&mut self, steer: f32) {
        if let Some(rudder) = &mut self.rudder {
            rudder.set_steer(steer);
        }
    }

    /// Engine throttle; ignored without an engine
    pub fn set_throttle(&mut self, throttle: f32) {
        if let Some(engine) = &mut self.engine {
            engine.set_throttle(throttle);
        }
    }

    /// Trims every sail's sheets
    pub fn set_trim(&mut self, port: f32, starboard: f32) {
        for sail in &mut self.sails {
            sail.set_port_trim(port);
            sail.set_starboard_trim(starboard);
        }
    }

    pub fn step(&mut self, body: &mut dyn RigidBody, dt: f32) -> BoatStepReport {
        let sails = self.sails.iter_mut().map(|sail| sail.step(body, dt)).collect();
        // no fuel burn or wear while the hull waits for water
        let propulsion = self.hull_ready && !body.is_kinematic();
        let engine = self.engine.as_mut().map(|engine| {
            if propulsion {
                engine.step(body, dt)
            } else {
                EngineReport::default()
            }
        });
        let rudder = self.rudder.as_ref().map(|rudder| rudder.step(body));
        let keel = self.keel.as_mut().map(|keel| keel.step(body));
        let hull = self.hull.step(body, dt);
        self.hull_ready = hull.data_ready;
        let stabilizer = self
            .stabilizer
            .as_ref()
            .map(|stabilizer| stabilizer.apply(body))
            .unwrap_or_default();

        debug!(
            frozen = body.is_kinematic(),
            volume = hull.submerged_volume,
            "boat step"
        );
        BoatStepReport {
            sails,
            engine,
            rudder,
            keel,
            hull,
            stabilizer,
        }
    }

    /// World-space sail spring segments for debug drawing
    pub fn debug_lines(&self, body: &dyn RigidBody) -> Vec<(Vec3, Vec3)> {
        self.sails
            .iter()
            .flat_map(|sail| sail.debug_lines(body))
            .collect()
    }
}
