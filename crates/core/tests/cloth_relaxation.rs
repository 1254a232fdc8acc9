//! Cloth settling through the full sail step

use std::sync::Arc;

use bevy::math::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tradewind_core::cloth::GridStiffness;
use tradewind_core::prelude::*;

fn calm() -> Arc<dyn WindSource> {
    Arc::new(GlobalWind::new(0.0, 0.0))
}

/// Sail with no gravity, slack sheets and heavy damping
fn quiet_config() -> SailConfig {
    SailConfig {
        node_damping: 0.5,
        gravity_strength: 0.0,
        port_sheet_stiffness: 0.0,
        starboard_sheet_stiffness: 0.0,
        sheet_damping: 0.0,
        flutter: false,
        ..Default::default()
    }
}

fn perturb(sail: &mut ClothSail, seed: u64, amount: f32) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for node in sail.grid_mut().nodes.iter_mut().filter(|n| !n.is_fixed) {
        let offset = Vec3::new(
            rng.gen_range(-amount..amount),
            rng.gen_range(-amount..amount),
            rng.gen_range(-amount..amount),
        );
        node.position += offset;
        node.previous_position = node.position;
    }
}

fn max_stiff_spring_error(sail: &ClothSail) -> f32 {
    let grid = sail.grid();
    grid.springs
        .iter()
        .filter(|s| s.stiffness > 0.0)
        .map(|s| s.extension(&grid.nodes).abs())
        .fold(0.0, f32::max)
}

#[test]
fn test_two_by_two_patch_returns_to_rest() {
    let rows = vec![
        vec![Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 2.0, -1.0)],
        vec![Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, -1.0)],
    ];
    let grid = SailGrid::from_rows(rows, 0.5, GridStiffness::default()).unwrap();
    let mut sail = ClothSail::from_grid(quiet_config(), grid, calm(), 1.0).unwrap();
    perturb(&mut sail, 11, 0.05);
    assert!(max_stiff_spring_error(&sail) > 1e-3);

    let mut body = RigidBodyState::default();
    for _ in 0..400 {
        sail.step(&mut body, 0.02);
    }

    assert!(max_stiff_spring_error(&sail) < 1e-3);
}

#[test]
fn test_full_sail_settles_in_calm() {
    let mut sail = ClothSail::new(quiet_config(), calm()).unwrap();
    perturb(&mut sail, 3, 0.02);

    let mut body = RigidBodyState::default();
    let mut tension = Vec::new();
    for _ in 0..600 {
        sail.step(&mut body, 0.02);
        tension.push(sail.total_spring_tension());
    }

    assert!(sail.grid().positions().all(|p| p.is_finite()));
    assert!(tension[tension.len() - 1] < tension[0]);
    assert!(sail.last_report().drive_force.length() < 1e-6);
}

#[test]
fn test_luff_never_moves() {
    let mut sail = ClothSail::new(SailConfig::default(), Arc::new(GlobalWind::new(90.0, 12.0)))
        .unwrap();
    let luff: Vec<Vec3> = sail
        .grid()
        .nodes
        .iter()
        .filter(|n| n.is_fixed)
        .map(|n| n.position)
        .collect();
    assert!(!luff.is_empty());

    let mut body = RigidBodyState::default();
    for _ in 0..200 {
        sail.step(&mut body, 0.02);
    }

    let after: Vec<Vec3> = sail
        .grid()
        .nodes
        .iter()
        .filter(|n| n.is_fixed)
        .map(|n| n.position)
        .collect();
    assert_eq!(luff, after);
}
