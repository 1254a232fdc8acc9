//! # Sail Aerodynamics
//!
//! Per-node lift, drag and pressure in sail-local space. A thin-airfoil lift
//! curve `sin(2α)` collapses to zero past the stall angle.

use bevy::math::Vec3;

use crate::constants::SAIL_DRAG_COEFFICIENT;

/// Aerodynamic result for one node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeAero {
    /// Lift + drag + pressure (N)
    pub force: Vec3,
    /// Lift coefficient used, exactly 0 when stalled
    pub lift_coefficient: f32,
}

/// Unsigned angle of attack in [0, π/2] between the chord and the wind
#[inline]
pub fn angle_of_attack(chord: Vec3, wind_dir: Vec3) -> f32 {
    let cos_a = chord.dot(wind_dir).clamp(-1.0, 1.0);
    cos_a.abs().acos()
}

/// `sin(2α)` below the stall angle, exactly 0 at or beyond it
#[inline]
pub fn lift_coefficient(aoa_rad: f32, stall_angle_deg: f32) -> f32 {
    if aoa_rad.to_degrees() < stall_angle_deg {
        (2.0 * aoa_rad).sin()
    } else {
        0.0
    }
}

/// Aerodynamic force on a node.
///
/// # Arguments
/// * `normal` - Unit node normal (either side)
/// * `wind_dir` - Unit wind direction in sail space, zero for calm
/// * `dynamic_pressure_area` - `0.5 · v² · area_per_node`
/// * `stall_angle_deg` - Angle of attack at which lift vanishes
pub fn node_aero_force(
    normal: Vec3,
    wind_dir: Vec3,
    dynamic_pressure_area: f32,
    stall_angle_deg: f32,
) -> NodeAero {
    let chord = Vec3::Y.cross(normal).normalize_or_zero();
    let aoa = angle_of_attack(chord, wind_dir);
    let cl = lift_coefficient(aoa, stall_angle_deg);

    let facing = wind_dir.dot(normal);
    // lift always points to the leeward side of the node
    let side = if facing < 0.0 { 1.0 } else { -1.0 };
    let lift = chord.cross(wind_dir).normalize_or_zero() * (side * dynamic_pressure_area * cl);
    let drag = wind_dir * (dynamic_pressure_area * SAIL_DRAG_COEFFICIENT);
    let pressure = normal * (dynamic_pressure_area * facing);

    NodeAero {
        force: lift + drag + pressure,
        lift_coefficient: cl,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_stall_cutoff_is_exact() {
        for deg in [45.0_f32, 50.0, 60.0, 89.9, 90.0] {
            assert_eq!(lift_coefficient(deg.to_radians(), 45.0), 0.0);
        }
        assert!(lift_coefficient(30.0_f32.to_radians(), 45.0) > 0.8);
    }

    #[test]
    fn test_angle_of_attack_range() {
        let aoa = angle_of_attack(Vec3::Z, -Vec3::Z);
        assert!(aoa.abs() < 1e-5);
        let aoa = angle_of_attack(Vec3::Z, Vec3::X);
        assert!((aoa - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_calm_wind_gives_zero_force() {
        let aero = node_aero_force(Vec3::X, Vec3::ZERO, 0.0, 45.0);
        assert_eq!(aero.force, Vec3::ZERO);
        assert!(aero.force.is_finite());
    }

    #[test]
    fn test_head_to_wind_luffs() {
        // wind along the chord: zero angle of attack, no pressure
        let aero = node_aero_force(Vec3::X, -Vec3::Z, 10.0, 45.0);
        assert!(aero.lift_coefficient.abs() < 1e-5);
        assert!(aero.force.x.abs() < 1e-4);
        assert!((aero.force.z + 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_lift_is_perpendicular_to_wind() {
        let normal = Vec3::X;
        let wind = Vec3::new(0.5, 0.0, -1.0).normalize();
        let aero = node_aero_force(normal, wind, 1.0, 45.0);
        assert!(aero.lift_coefficient > 0.0);
        let drag = wind * SAIL_DRAG_COEFFICIENT;
        let pressure = normal * wind.dot(normal);
        let lift = aero.force - drag - pressure;
        assert!(lift.dot(wind).abs() < 1e-4);
    }

    #[test]
    fn test_normal_flip_gives_same_force() {
        let wind = Vec3::new(0.3, 0.0, -1.0).normalize();
        let a = node_aero_force(Vec3::X, wind, 2.0, 45.0);
        let b = node_aero_force(-Vec3::X, wind, 2.0, 45.0);
        assert!((a.force - b.force).length() < 1e-4);
    }
}
