//! # Point-of-Sail Power
//!
//! Scalar forward drive derived from the apparent wind angle and the trim of
//! the controlling sheet.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::VECTOR_EPSILON;
use crate::curve::Curve;
use crate::math::{clamp01, inverse_lerp, lerp, signed_angle_deg};

/// Which sheet is controlling the sail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SheetSide {
    Port,
    #[default]
    Starboard,
}

/// Breakdown of one forward-power evaluation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SailPower {
    /// Apparent wind angle in degrees, signed about the up axis.
    /// Positive angles are wind over the port side, which hands control to
    /// the port sheet.
    pub apparent_wind_angle: f32,
    pub base_power: f32,
    pub optimal_trim: f32,
    /// Trim actually used after the dead-run blend
    pub effective_trim: f32,
    pub trim_penalty: f32,
    pub controlling_sheet: SheetSide,
    /// `base_power · trim_penalty`, in [0, base_power]
    pub power: f32,
}

/// Power and optimal-trim tables with the dead-run blend zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SailPowerModel {
    pub power_curve: Curve,
    pub trim_curve: Curve,
    /// Width of the handoff between sheets near 180° (degrees)
    pub blend_zone_deg: f32,
}

impl Default for SailPowerModel {
    fn default() -> Self {
        Self {
            power_curve: Curve::sail_power(),
            trim_curve: Curve::optimal_trim(),
            blend_zone_deg: 20.0,
        }
    }
}

impl SailPowerModel {
    /// Evaluates forward power for the given heading and apparent wind.
    ///
    /// Calm apparent wind returns zero power.
    pub fn evaluate(
        &self,
        boat_forward: Vec3,
        up: Vec3,
        apparent_wind: Vec3,
        port_trim: f32,
        starboard_trim: f32,
    ) -> SailPower {
        if apparent_wind.length_squared() < VECTOR_EPSILON * VECTOR_EPSILON {
            return SailPower::default();
        }

        let awa = signed_angle_deg(boat_forward, -apparent_wind, up);
        let abs_awa = awa.abs();
        let norm = inverse_lerp(0.0, 180.0, abs_awa);
        let base_power = self.power_curve.evaluate(norm);

        let (controlling_sheet, chosen) = if awa > 0.0 {
            (SheetSide::Port, port_trim)
        } else {
            (SheetSide::Starboard, starboard_trim)
        };
        let blend = inverse_lerp(180.0, 180.0 - self.blend_zone_deg, abs_awa);
        let effective_trim = lerp(port_trim.max(starboard_trim), chosen, blend);

        let optimal_trim = self.trim_curve.evaluate(norm);
        let trim_penalty = clamp01(1.0 - (effective_trim - optimal_trim).abs());

        SailPower {
            apparent_wind_angle: awa,
            base_power,
            optimal_trim,
            effective_trim,
            trim_penalty,
            controlling_sheet,
            power: base_power * trim_penalty,
        }
    }
}
