//! # Boat Systems
//!
//! Fixed-timestep systems, chained in this order by `TradewindPlugin`.

use bevy::prelude::*;
use tradewind_core::body::RigidBody;

use crate::components::{BoatBody, BoatControls, BoatTelemetry, Sailboat};

/// Copies helm, throttle and trim inputs into the boats
pub fn apply_boat_controls(mut boats: Query<(&mut Sailboat, &BoatControls), Changed<BoatControls>>) {
    for (mut sailboat, controls) in boats.iter_mut() {
        let boat = &mut sailboat.boat;
        boat.set_steer(controls.steer);
        boat.set_throttle(controls.throttle);
        boat.set_trim(controls.port_trim, controls.starboard_trim);
    }
}

/// Runs every boat's simulators against its body
pub fn step_sailboats(
    time: Res<Time>,
    mut boats: Query<(&mut Sailboat, &mut BoatBody, Option<&mut BoatTelemetry>)>,
) {
    let dt = time.delta_secs();
    if dt <= 0.0 {
        return;
    }

    for (mut sailboat, mut body, telemetry) in boats.iter_mut() {
        let BoatBody { body, initialized } = &mut *body;
        if !*initialized {
            sailboat.boat.initialize(body);
            *initialized = true;
        }

        let report = sailboat.boat.step(body, dt);
        if let Some(mut telemetry) = telemetry {
            telemetry.last = report;
        }
    }
}

/// Integrates accumulated forces into velocity and pose
pub fn integrate_boat_bodies(time: Res<Time>, mut bodies: Query<&mut BoatBody>) {
    let dt = time.delta_secs();
    for mut body in bodies.iter_mut() {
        body.body.integrate(dt);
    }
}

/// Writes body poses to `Transform`
pub fn sync_boat_transforms(mut boats: Query<(&BoatBody, &mut Transform)>) {
    for (body, mut transform) in boats.iter_mut() {
        transform.translation = body.body.position();
        transform.rotation = body.body.rotation();
    }
}
