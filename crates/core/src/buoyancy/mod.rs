//! # Buoyancy
//!
//! Hull flotation from sampled water surfaces.
//!
//! ## Table of Contents
//!
//! 1. **BuoyancyReport** - What a hull step applied
//! 2. **Triangle clipping** - Submerged volume per triangle (`clip`)
//! 3. **MeshBuoyancy** - Closed helper mesh integration (`mesh`)
//! 4. **LineBuoyancy** - Point-sampled simplified hull (`line`)
//! 5. **HullMesh / HullLines** - Helper mesh and its generator (`hull_mesh`)

pub mod clip;
pub mod hull_mesh;
pub mod line;
pub mod mesh;

pub use clip::{clip_triangle, submerged_volume, ClippedPolygon, SubmergedVolume};
pub use hull_mesh::{HullLines, HullMesh};
pub use line::{LineBuoyancy, LineBuoyancyConfig};
pub use mesh::{MeshBuoyancy, MeshBuoyancyConfig};

use bevy::math::Vec3;

/// Result of one hull buoyancy step
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BuoyancyReport {
    /// False while waiting for the first surface batch; nothing was applied
    pub data_ready: bool,
    /// Displaced volume (m³)
    pub submerged_volume: f32,
    /// World-space point the buoyant force acts through
    pub center_of_buoyancy: Vec3,
    /// Applied buoyant force (N)
    pub buoyant_force: Vec3,
    /// Sum of viscous drag applied (N)
    pub drag_force: Vec3,
    /// Share of sample points below the surface
    pub submerged_fraction: f32,
}
