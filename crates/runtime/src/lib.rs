//! # Tradewind Runtime
//!
//! Hosts `tradewind-core` boats inside a Bevy app on the fixed timestep.
//!
//! ## Modules
//!
//! - [`components`]: `Sailboat`, `BoatBody`, `BoatControls`, `BoatTelemetry`
//! - [`systems`]: Stepping, integration and transform sync
//!
//! ## Schedule
//!
//! ```text
//! FixedUpdate
//!   apply_boat_controls → step_sailboats → integrate_boat_bodies → sync_boat_transforms
//! ```
//!
//! Every boat simulator adds forces during `step_sailboats`; the body is
//! integrated once afterwards so all of them read the same velocities.

pub mod components;
pub mod systems;

pub use components::*;
pub use systems::*;

use std::sync::Arc;

use bevy::prelude::*;
use tracing::info;
use tradewind_core::config::TradewindConfig;
use tradewind_core::wind::GlobalWind;

// ============================================================================
// Resources
// ============================================================================

/// The world wind shared by every sail
#[derive(Resource, Clone)]
pub struct SharedWind(pub Arc<GlobalWind>);

impl Default for SharedWind {
    fn default() -> Self {
        Self(Arc::new(GlobalWind::default()))
    }
}

// ============================================================================
// Plugin
// ============================================================================

/// Runs sailboat physics on `FixedUpdate`.
///
/// # Example
/// ```rust,ignore
/// use bevy::prelude::*;
/// use tradewind_runtime::TradewindPlugin;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(TradewindPlugin)
///         .run();
/// }
/// ```
pub struct TradewindPlugin;

impl Plugin for TradewindPlugin {
    fn build(&self, app: &mut App) {
        // Wind follows the config when one was inserted before the plugin
        let wind = app
            .world()
            .get_resource::<TradewindConfig>()
            .map(|config| SharedWind(Arc::new(config.wind.build())))
            .unwrap_or_default();
        app.insert_resource(wind);

        app.add_systems(
            FixedUpdate,
            (
                apply_boat_controls,
                step_sailboats,
                integrate_boat_bodies,
                sync_boat_transforms,
            )
                .chain(),
        );

        info!("TradewindPlugin initialized");
    }
}
