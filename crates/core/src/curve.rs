//! # Keyframe Curves
//!
//! Lookup tables for the point-of-sail tables. A curve is plain data: editing
//! the keys in config changes behavior without touching code.

use serde::{Deserialize, Serialize};

/// A single control point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub x: f32,
    pub y: f32,
}

impl Keyframe {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// How values between two keys are blended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveInterpolation {
    #[default]
    Linear,
    /// Cubic Hermite with zero tangents at every key (flat at the keys)
    Smooth,
}

/// Keyframe curve evaluated by `evaluate(x) -> y`.
///
/// Keys are kept sorted by `x`. Inputs outside the key range clamp to the
/// first or last value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveDef")]
pub struct Curve {
    keys: Vec<Keyframe>,
    #[serde(default)]
    interpolation: CurveInterpolation,
}

/// Curve as written in config, before keys are checked and sorted
#[derive(Deserialize)]
struct CurveDef {
    keys: Vec<Keyframe>,
    #[serde(default)]
    interpolation: CurveInterpolation,
}

impl TryFrom<CurveDef> for Curve {
    type Error = String;

    fn try_from(def: CurveDef) -> std::result::Result<Self, Self::Error> {
        if let Some(key) = def.keys.iter().find(|k| !k.is_finite()) {
            return Err(format!("curve key ({}, {}) is not finite", key.x, key.y));
        }
        Ok(Self::new(def.keys, def.interpolation))
    }
}

impl Curve {
    /// Sorts the keys by `x`. Non-finite keys are dropped.
    pub fn new(mut keys: Vec<Keyframe>, interpolation: CurveInterpolation) -> Self {
        keys.retain(Keyframe::is_finite);
        keys.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { keys, interpolation }
    }

    /// Builds a linear curve from `(degrees, value)` pairs, normalizing
    /// degrees to [0, 1] over 180°.
    pub fn from_degrees(points: &[(f32, f32)]) -> Self {
        let keys = points
            .iter()
            .map(|&(deg, y)| Keyframe::new(deg / 180.0, y))
            .collect();
        Self::new(keys, CurveInterpolation::Linear)
    }

    /// Base sail power by point of sail: in irons, close-hauled ramp,
    /// beam-reach peak, decline toward a run.
    pub fn sail_power() -> Self {
        Self::from_degrees(&[
            (0.0, 0.0),
            (25.0, 0.01),
            (60.0, 0.6),
            (90.0, 1.0),
            (120.0, 0.7),
            (180.0, 0.4),
        ])
    }

    /// Ideal sheet trim by point of sail: fully trimmed close-hauled,
    /// eased toward a run.
    pub fn optimal_trim() -> Self {
        Self::from_degrees(&[
            (0.0, 1.0),
            (60.0, 1.0),
            (90.0, 0.5),
            (150.0, 0.2),
            (180.0, 0.2),
        ])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    pub fn with_interpolation(mut self, interpolation: CurveInterpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn evaluate(&self, x: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if x.is_nan() || x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }

        // First key strictly right of x; x > first.x guarantees idx >= 1
        let idx = self.keys.partition_point(|k| k.x <= x);
        let a = self.keys[idx - 1];
        let b = self.keys[idx];
        let span = b.x - a.x;
        if span <= f32::EPSILON {
            return b.y;
        }
        let t = (x - a.x) / span;
        let t = match self.interpolation {
            CurveInterpolation::Linear => t,
            CurveInterpolation::Smooth => t * t * (3.0 - 2.0 * t),
        };
        a.y + (b.y - a.y) * t
    }
}
