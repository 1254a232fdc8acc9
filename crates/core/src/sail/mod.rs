//! # Sail
//!
//! Cloth sail driven by wind, trimmed by two sheets, producing forward drive
//! on the boat.
//!
//! ## Table of Contents
//!
//! 1. **SailConfig** - Geometry and tunables
//! 2. **Aerodynamics** - Per-node lift/drag/pressure (`aero`)
//! 3. **Point of sail** - Forward power from wind angle and trim (`power`)
//! 4. **Sheets** - Clew spring-dampers (`sheet`)
//! 5. **ClothSail** - The simulator (`simulator`)

pub mod aero;
pub mod power;
pub mod sheet;
pub mod simulator;

pub use aero::{angle_of_attack, lift_coefficient, node_aero_force, NodeAero};
pub use power::{SailPower, SailPowerModel, SheetSide};
pub use sheet::Sheet;
pub use simulator::{ClothSail, SailStepReport};

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::GRAVITY;
use crate::error::{Result, TradewindError};

// ============================================================================
// Relaxation schedule
// ============================================================================

/// How the fractional part of the per-step pass count is spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationSchedule {
    /// Carry the fraction across steps; an extra pass runs when it reaches 1
    #[default]
    Accumulated,
    /// Extra pass with probability equal to the fraction (seeded)
    Stochastic,
}

// ============================================================================
// Sail Config
// ============================================================================

/// Sail geometry and tunables. Positions are in boat-local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SailConfig {
    pub head: Vec3,
    pub tack: Vec3,
    pub clew: Vec3,
    pub horizontal_segments: usize,
    pub vertical_segments: usize,

    /// Velocity retention per step for every node
    pub node_damping: f32,
    pub structural_stiffness: f32,
    pub shear_stiffness: f32,
    /// Bend springs use `luff_stiffness · 0.2`
    pub luff_stiffness: f32,
    /// Leech rail runs at `leech_stiffness · active trim`
    pub leech_stiffness: f32,

    /// Lift vanishes at and beyond this angle of attack (degrees)
    pub stall_angle_deg: f32,
    /// Multiplier on wind speed before squaring (folds in air density)
    pub wind_scale: f32,
    /// Downward acceleration on nodes (m/s²)
    pub gravity_strength: f32,
    pub flutter: bool,

    pub port_attach: Vec3,
    pub starboard_attach: Vec3,
    pub port_sheet_stiffness: f32,
    pub starboard_sheet_stiffness: f32,
    pub sheet_damping: f32,
    /// Preload as a fraction of the initial sheet length
    pub preload_fraction: f32,
    pub port_trim: f32,
    pub starboard_trim: f32,

    pub min_passes: usize,
    pub max_passes: usize,
    pub relaxation: RelaxationSchedule,

    pub power_model: SailPowerModel,
    /// Forward force per unit of power and wind strength (N)
    pub max_sail_power: f32,
    /// Scales the aerodynamic heeling torque; 0 disables it
    pub heel_sensitivity: f32,

    pub parallel_aero: bool,
    /// Seed for flutter and stochastic relaxation
    pub seed: u64,
}

impl Default for SailConfig {
    fn default() -> Self {
        Self {
            head: Vec3::new(0.0, 9.0, 0.0),
            tack: Vec3::new(0.0, 1.0, 0.0),
            clew: Vec3::new(0.0, 1.0, -3.5),
            horizontal_segments: 8,
            vertical_segments: 12,
            node_damping: 0.98,
            structural_stiffness: 0.2,
            shear_stiffness: 0.2,
            luff_stiffness: 1.0,
            leech_stiffness: 1.0,
            stall_angle_deg: 45.0,
            wind_scale: 2.0,
            gravity_strength: GRAVITY,
            flutter: true,
            port_attach: Vec3::new(1.0, 0.6, -3.8),
            starboard_attach: Vec3::new(-1.0, 0.6, -3.8),
            port_sheet_stiffness: 20.0,
            starboard_sheet_stiffness: 20.0,
            sheet_damping: 2.0,
            preload_fraction: 0.1,
            port_trim: 0.5,
            starboard_trim: 0.5,
            min_passes: 5,
            max_passes: 20,
            relaxation: RelaxationSchedule::Accumulated,
            power_model: SailPowerModel::default(),
            max_sail_power: 10.0,
            heel_sensitivity: 0.0,
            parallel_aero: true,
            seed: 0x5A11,
        }
    }
}

impl SailConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.node_damping > 0.0 && self.node_damping <= 1.0) {
            return Err(TradewindError::InvalidConfig {
                field: "sail.node_damping",
                reason: format!("{} is outside (0, 1]", self.node_damping),
            });
        }
        if self.stall_angle_deg <= 0.0 {
            return Err(TradewindError::InvalidConfig {
                field: "sail.stall_angle_deg",
                reason: format!("{} must be positive", self.stall_angle_deg),
            });
        }
        if self.min_passes > self.max_passes {
            return Err(TradewindError::InvalidConfig {
                field: "sail.min_passes",
                reason: format!("{} exceeds max_passes {}", self.min_passes, self.max_passes),
            });
        }
        if self.horizontal_segments == 0 || self.vertical_segments == 0 {
            return Err(TradewindError::InvalidTopology(
                "sail segments must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SailConfig::default().validate().is_ok());
    }

    #[test]
    fn test_damping_out_of_range() {
        let config = SailConfig {
            node_damping: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TradewindError::InvalidConfig { field: "sail.node_damping", .. })
        ));
    }

    #[test]
    fn test_pass_range_inverted() {
        let config = SailConfig {
            min_passes: 30,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
