//! Whole-boat runs on flat water

use std::sync::Arc;

use bevy::math::{Quat, Vec3};
use tradewind_core::constants::SEA_WATER_DENSITY;
use tradewind_core::prelude::*;

const DT: f32 = 0.02;

fn hull_body() -> RigidBodyState {
    RigidBodyState::from_box(1000.0, Vec3::new(2.5, 1.0, 8.0))
}

fn run(boat: &mut Boat, body: &mut RigidBodyState, seconds: f32) -> BoatStepReport {
    let steps = (seconds / DT) as usize;
    let mut last = BoatStepReport::default();
    for _ in 0..steps {
        last = boat.step(body, DT);
        body.integrate(DT);
    }
    last
}

fn layout(config: &mut TradewindConfig, sail: bool, engine: bool) {
    config.boat.sail = sail;
    config.boat.engine = engine;
}

#[test]
fn test_line_hull_floats_upright() {
    let mut config = TradewindConfig::default();
    layout(&mut config, false, false);
    let water: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
    let mut boat = Boat::from_config(&config, Arc::new(GlobalWind::new(0.0, 0.0)), water).unwrap();

    let mut body = hull_body();
    boat.initialize(&mut body);
    let report = run(&mut boat, &mut body, 30.0);

    assert!(report.hull.data_ready);
    assert!(body.position.y.abs() < 1.5, "settled at {}", body.position.y);
    assert!(body.linear_velocity.y.abs() < 0.2);
    assert!(body.up().y > 0.95);
    assert!(report.hull.submerged_fraction > 0.0);
}

#[test]
fn test_heeled_boat_rights_itself() {
    let mut config = TradewindConfig::default();
    layout(&mut config, false, false);
    let water: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
    let mut boat = Boat::from_config(&config, Arc::new(GlobalWind::new(0.0, 0.0)), water).unwrap();

    let mut body = hull_body().with_rotation(Quat::from_rotation_z(0.4));
    boat.initialize(&mut body);
    run(&mut boat, &mut body, 20.0);

    assert!(body.up().y > 0.98, "still heeled: up = {:?}", body.up());
}

#[test]
fn test_mesh_hull_floats_between_keel_and_deck() {
    let mut config = TradewindConfig::default();
    layout(&mut config, false, false);
    config.boat.hull = HullKind::Mesh;
    config.mesh_buoyancy.smoothing_time = 0.0;
    let water: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
    let mut boat = Boat::from_config(&config, Arc::new(GlobalWind::new(0.0, 0.0)), water).unwrap();

    let mut body = hull_body();
    body.linear_damping = 3.0;
    boat.initialize(&mut body);
    let report = run(&mut boat, &mut body, 20.0);

    // keel line at -0.7 and deck at +0.6 in hull space
    let waterline = -body.position.y;
    assert!(waterline > -0.7 && waterline < 0.6, "waterline {waterline}");
    let displaced = report.hull.submerged_volume * SEA_WATER_DENSITY;
    assert!((displaced - body.mass).abs() / body.mass < 0.1);
}

#[test]
fn test_engine_drives_boat_ahead() {
    let mut config = TradewindConfig::default();
    layout(&mut config, false, true);
    config.engine.failure_chance_per_minute = 0.0;
    config.engine.max_power = 2000.0;
    let water: Arc<dyn SurfaceSampler> = Arc::new(FlatWater::new(0.0));
    let mut boat = Boat::from_config(&config, Arc::new(GlobalWind::new(0.0, 0.0)), water).unwrap();

    let mut body = hull_body();
    boat.initialize(&mut body);
    run(&mut boat, &mut body, 5.0);
    boat.set_throttle(1.0);
    let report = run(&mut boat, &mut body, 10.0);

    assert!(report.engine.is_some_and(|e| e.running));
    assert!(body.linear_velocity.z > 0.1);
    assert!(body.position.z > 0.5);
    assert!(boat.engine().is_some_and(|e| e.fuel_percentage() < 1.0));
}

#[test]
fn test_latent_water_holds_boat_until_ready() {
    let mut config = TradewindConfig::default();
    layout(&mut config, false, false);
    let water = Arc::new(FlatWater::new(0.0));
    let latent = Arc::new(LatentSampler::new(water, 3));
    let sampler: Arc<dyn SurfaceSampler> = latent.clone();
    let mut boat = Boat::from_config(&config, Arc::new(GlobalWind::new(0.0, 0.0)), sampler).unwrap();

    let mut body = hull_body();
    boat.initialize(&mut body);
    let start = body.position;

    for _ in 0..3 {
        let report = boat.step(&mut body, DT);
        body.integrate(DT);
        assert!(!report.hull.data_ready);
        assert_eq!(body.position, start);
        latent.tick();
    }

    let report = boat.step(&mut body, DT);
    assert!(report.hull.data_ready);
    assert!(!body.kinematic);
}
