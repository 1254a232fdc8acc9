//! # Boat Configuration
//!
//! Parses `tradewind.toml`, the tunables for one boat and its wind. Every
//! section and field is optional; missing values take the defaults below.
//!
//! ## Table of Contents
//! 1. TradewindConfig - Top-level config
//! 2. BoatLayout - Which parts the boat carries
//! 3. WindConfig - Initial global wind
//! 4. Parsing and validation

use std::path::Path;

use bevy::math::Vec3;
use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::buoyancy::{HullLines, LineBuoyancyConfig, MeshBuoyancyConfig};
use crate::engine::EngineConfig;
use crate::error::{Result, TradewindError};
use crate::keel::KeelConfig;
use crate::rudder::RudderConfig;
use crate::sail::SailConfig;
use crate::stabilizer::StabilizerConfig;
use crate::wind::GlobalWind;

// ============================================================================
// 1. TradewindConfig - Top-level config
// ============================================================================

/// Top-level boat configuration, parsed from `tradewind.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Resource)]
pub struct TradewindConfig {
    #[serde(default)]
    pub wind: WindConfig,
    #[serde(default)]
    pub boat: BoatLayout,
    #[serde(default)]
    pub sail: SailConfig,
    #[serde(default)]
    pub mesh_buoyancy: MeshBuoyancyConfig,
    /// Construction lines the mesh hull is generated from
    #[serde(default = "default_hull_lines")]
    pub hull_lines: HullLines,
    #[serde(default)]
    pub line_buoyancy: LineBuoyancyConfig,
    #[serde(default)]
    pub stabilizer: StabilizerConfig,
    #[serde(default)]
    pub keel: KeelConfig,
    #[serde(default)]
    pub rudder: RudderConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for TradewindConfig {
    fn default() -> Self {
        Self {
            wind: WindConfig::default(),
            boat: BoatLayout::default(),
            sail: SailConfig::default(),
            mesh_buoyancy: MeshBuoyancyConfig::default(),
            hull_lines: default_hull_lines(),
            line_buoyancy: LineBuoyancyConfig::default(),
            stabilizer: StabilizerConfig::default(),
            keel: KeelConfig::default(),
            rudder: RudderConfig::default(),
            engine: EngineConfig::default(),
        }
    }
}

/// An 8 m day-sailer hull
fn default_hull_lines() -> HullLines {
    HullLines {
        center: vec![
            Vec3::new(0.0, 0.2, 4.0),
            Vec3::new(0.0, -0.5, 2.5),
            Vec3::new(0.0, -0.7, 0.5),
            Vec3::new(0.0, -0.7, -1.5),
            Vec3::new(0.0, -0.5, -3.5),
            Vec3::new(0.0, -0.2, -4.0),
        ],
        port_boot: vec![
            Vec3::new(0.2, 0.0, 3.8),
            Vec3::new(1.0, -0.1, 1.0),
            Vec3::new(1.1, -0.1, -1.5),
            Vec3::new(0.9, 0.0, -4.0),
        ],
        port_deck: vec![
            Vec3::new(0.1, 0.6, 4.0),
            Vec3::new(1.2, 0.6, 1.0),
            Vec3::new(1.3, 0.6, -1.5),
            Vec3::new(1.1, 0.6, -4.0),
        ],
    }
}

// ============================================================================
// 2. BoatLayout - Which parts the boat carries
// ============================================================================

/// Hull flotation model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HullKind {
    /// Closed helper mesh generated from `hull_lines`
    Mesh,
    /// Sample points from `line_buoyancy`
    #[default]
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatLayout {
    pub hull: HullKind,
    pub sail: bool,
    pub keel: bool,
    pub rudder: bool,
    pub engine: bool,
    pub stabilizer: bool,
}

impl Default for BoatLayout {
    fn default() -> Self {
        Self {
            hull: HullKind::default(),
            sail: true,
            keel: true,
            rudder: true,
            engine: true,
            stabilizer: true,
        }
    }
}

// ============================================================================
// 3. WindConfig - Initial global wind
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Heading of the wind velocity: `(cos a, 0, sin a)` in degrees
    pub angle_deg: f32,
    /// Wind speed (m/s)
    pub strength: f32,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            angle_deg: 0.0,
            strength: 10.0,
        }
    }
}

impl WindConfig {
    pub fn build(&self) -> GlobalWind {
        GlobalWind::new(self.angle_deg, self.strength)
    }
}

// ============================================================================
// 4. Parsing and validation
// ============================================================================

impl TradewindConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TradewindError::ConfigIo(path.to_path_buf(), e))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded boat config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TradewindConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.sail.validate()?;

        let positive = [
            ("mesh_buoyancy.water_density", self.mesh_buoyancy.water_density),
            ("line_buoyancy.water_density", self.line_buoyancy.water_density),
            ("line_buoyancy.material_density", self.line_buoyancy.material_density),
            ("keel.water_density", self.keel.water_density),
            ("rudder.water_density", self.rudder.water_density),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TradewindError::InvalidConfig {
                    field,
                    reason: format!("{value} must be positive"),
                });
            }
        }

        if self.mesh_buoyancy.smoothing_time < 0.0 {
            return Err(TradewindError::InvalidConfig {
                field: "mesh_buoyancy.smoothing_time",
                reason: format!("{} must not be negative", self.mesh_buoyancy.smoothing_time),
            });
        }
        if !(0.0..=1.0).contains(&self.engine.failure_chance_per_minute) {
            return Err(TradewindError::InvalidConfig {
                field: "engine.failure_chance_per_minute",
                reason: format!("{} is outside [0, 1]", self.engine.failure_chance_per_minute),
            });
        }
        if self.engine.min_throttle > 0.0 {
            return Err(TradewindError::InvalidConfig {
                field: "engine.min_throttle",
                reason: format!("{} must not be positive", self.engine.min_throttle),
            });
        }
        if self.wind.strength < 0.0 {
            return Err(TradewindError::InvalidConfig {
                field: "wind.strength",
                reason: format!("{} must not be negative", self.wind.strength),
            });
        }
        Ok(())
    }
}
