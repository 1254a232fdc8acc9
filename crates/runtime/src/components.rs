//! # Boat Components
//!
//! - `Sailboat`: the simulators of one boat
//! - `BoatBody`: its rigid body state
//! - `BoatControls`: helm, throttle and sheet inputs
//! - `BoatTelemetry`: the latest step report

use std::sync::Arc;

use bevy::prelude::*;
use tradewind_core::body::RigidBodyState;
use tradewind_core::boat::{Boat, BoatStepReport};
use tradewind_core::config::TradewindConfig;
use tradewind_core::error::Result;
use tradewind_core::surface::SurfaceSampler;
use tradewind_core::wind::WindSource;

/// A boat stepped on the fixed timestep
#[derive(Component)]
pub struct Sailboat {
    pub boat: Boat,
}

impl Sailboat {
    pub fn new(boat: Boat) -> Self {
        Self { boat }
    }

    pub fn from_config(
        config: &TradewindConfig,
        wind: Arc<dyn WindSource>,
        sampler: Arc<dyn SurfaceSampler>,
    ) -> Result<Self> {
        Ok(Self::new(Boat::from_config(config, wind, sampler)?))
    }
}

/// Rigid body the boat's forces act on. Its pose drives the `Transform`.
#[derive(Component, Debug, Clone, Default)]
pub struct BoatBody {
    pub body: RigidBodyState,
    /// Set once the boat has written its center of mass into `body`
    pub initialized: bool,
}

impl BoatBody {
    pub fn new(body: RigidBodyState) -> Self {
        Self {
            body,
            initialized: false,
        }
    }
}

/// Player or autopilot inputs, applied before each step
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct BoatControls {
    /// Helm in [-1, 1]
    pub steer: f32,
    /// Engine throttle
    pub throttle: f32,
    pub port_trim: f32,
    pub starboard_trim: f32,
}

impl Default for BoatControls {
    fn default() -> Self {
        Self {
            steer: 0.0,
            throttle: 0.0,
            port_trim: 0.5,
            starboard_trim: 0.5,
        }
    }
}

/// What the last fixed step applied
#[derive(Component, Debug, Clone, Default)]
pub struct BoatTelemetry {
    pub last: BoatStepReport,
}
