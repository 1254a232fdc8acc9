//! # Physical Constants
//!
//! Fluid properties and numeric guards shared by the sail and hull simulators.

// ============================================================================
// Fluids
// ============================================================================

/// Sea water density (kg/m³), used by hull and keel integration
pub const SEA_WATER_DENSITY: f32 = 1025.0;

/// Fresh water density (kg/m³), used by the rudder and line buoyancy
pub const FRESH_WATER_DENSITY: f32 = 1000.0;

/// Standard gravity (m/s²)
pub const GRAVITY: f32 = 9.81;

// ============================================================================
// Sail
// ============================================================================

/// Drag coefficient applied along the wind direction per sail node
pub const SAIL_DRAG_COEFFICIENT: f32 = 0.1;

/// Gravity multiplier at the luff (u = 0)
pub const SAIL_GRAVITY_SCALE_LUFF: f32 = 1.0;

/// Gravity multiplier at the leech (u = 1)
pub const SAIL_GRAVITY_SCALE_LEECH: f32 = 0.2;

/// Flutter force per unit of wind speed when a node is stalled
pub const FLUTTER_FACTOR: f32 = 0.02;

/// Stiffness multiplier applied to luff stiffness for bend springs
pub const BEND_STIFFNESS_FACTOR: f32 = 0.2;

// ============================================================================
// Numeric guards
// ============================================================================

/// Springs shorter than this are skipped during relaxation (m)
pub const SPRING_EPSILON: f32 = 1e-5;

/// Vectors shorter than this are treated as zero
pub const VECTOR_EPSILON: f32 = 1e-6;

/// Submerged volume below which no buoyant force is applied (m³)
pub const VOLUME_EPSILON: f32 = 1e-6;
