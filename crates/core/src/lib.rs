//! # tradewind-core
//!
//! Sailing-boat physics: a mass-spring cloth sail driven by wind, point of
//! sail power with two-sheet trim, hull buoyancy from sampled water surfaces
//! and the foils and controllers that keep the boat upright and on course.
//!
//! ## Features
//! - `ClothSail`: Verlet cloth with position-based spring relaxation
//! - `SailPowerModel`: forward drive from apparent wind angle and trim
//! - `MeshBuoyancy` / `LineBuoyancy`: two hull flotation models
//! - `KeelFoil`, `Rudder`, `BoatEngine`, `Stabilizer`
//! - `Boat`: steps every part in a fixed order against one `RigidBody`
//! - `TradewindConfig`: TOML tunables
//!
//! ## Table of Contents
//! 1. Errors and constants (`error`, `constants`)
//! 2. Math and curves (`math`, `curve`)
//! 3. Environment (`wind`, `surface`)
//! 4. Rigid body (`body`)
//! 5. Cloth and sail (`cloth`, `sail`)
//! 6. Hull (`buoyancy`, `keel`, `rudder`, `engine`, `stabilizer`)
//! 7. Boat and configuration (`boat`, `config`)

pub mod body;
pub mod boat;
pub mod buoyancy;
pub mod cloth;
pub mod config;
pub mod constants;
pub mod curve;
pub mod engine;
pub mod error;
pub mod keel;
pub mod math;
pub mod rudder;
pub mod sail;
pub mod stabilizer;
pub mod surface;
pub mod wind;

pub use error::{Result, TradewindError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::body::{RigidBody, RigidBodyState};
    pub use crate::boat::{Boat, BoatStepReport, HullModel};
    pub use crate::buoyancy::{
        BuoyancyReport, HullLines, HullMesh, LineBuoyancy, LineBuoyancyConfig, MeshBuoyancy,
        MeshBuoyancyConfig,
    };
    pub use crate::cloth::{SailGrid, Spring, SpringKind, SpringNode};
    pub use crate::config::{BoatLayout, HullKind, TradewindConfig, WindConfig};
    pub use crate::curve::{Curve, CurveInterpolation, Keyframe};
    pub use crate::engine::{BoatEngine, EngineConfig, EngineReport};
    pub use crate::error::{Result, TradewindError};
    pub use crate::keel::{KeelConfig, KeelFoil, KeelReport};
    pub use crate::rudder::{Rudder, RudderConfig, RudderReport};
    pub use crate::sail::{
        ClothSail, RelaxationSchedule, SailConfig, SailPower, SailPowerModel, SailStepReport,
        SheetSide,
    };
    pub use crate::stabilizer::{Stabilizer, StabilizerConfig, StabilizerTorques};
    pub use crate::surface::{
        FlatWater, LatentSampler, QueryHandle, SurfaceRequest, SurfaceSample, SurfaceSampler,
        Wave, WaveField,
    };
    pub use crate::wind::{GlobalWind, WindSource};
}
