//! Sheet lines: spring + damper from the clew to a deck attach point.

use bevy::math::Vec3;

use crate::cloth::SpringNode;
use crate::math::{clamp01, lerp_unclamped};

/// One sheet pulling the clew toward its attach point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sheet {
    /// Attach point in sail space
    pub attach: Vec3,
    /// Clew-to-attach distance at build time
    pub initial_rest: f32,
    pub stiffness: f32,
    /// 0 = fully eased, 1 = fully trimmed
    trim: f32,
}

impl Sheet {
    pub fn new(attach: Vec3, clew: Vec3, stiffness: f32, trim: f32) -> Self {
        Self {
            attach,
            initial_rest: attach.distance(clew),
            stiffness,
            trim: clamp01(trim),
        }
    }

    pub fn trim(&self) -> f32 {
        self.trim
    }

    pub fn set_trim(&mut self, trim: f32) {
        self.trim = clamp01(trim);
    }

    /// Rest length: `initial + preload` eased, `-preload` fully trimmed.
    /// Over-trimming drives the clew hard onto the attach point.
    pub fn rest_length(&self, preload_fraction: f32) -> f32 {
        let preload = self.initial_rest * preload_fraction;
        lerp_unclamped(self.initial_rest + preload, -preload, self.trim)
    }

    /// Spring-damper force on the clew node
    pub fn force(&self, clew: &SpringNode, dt: f32, damping: f32, preload_fraction: f32) -> Vec3 {
        if dt <= 0.0 {
            return Vec3::ZERO;
        }
        let to_attach = self.attach - clew.position;
        let distance = to_attach.length();
        let direction = to_attach.normalize_or_zero();
        let velocity = (clew.position - clew.previous_position) / dt;

        let stretch = distance - self.rest_length(preload_fraction);
        direction * (stretch * self.stiffness) - velocity * damping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_length_span() {
        let sheet = Sheet::new(Vec3::new(0.0, 0.0, -4.0), Vec3::ZERO, 20.0, 0.0);
        assert!((sheet.rest_length(0.1) - 4.4).abs() < 1e-5);
        let mut tight = sheet;
        tight.set_trim(1.0);
        assert!((tight.rest_length(0.1) + 0.4).abs() < 1e-5);
    }

    #[test]
    fn test_trim_is_clamped() {
        let mut sheet = Sheet::new(Vec3::X, Vec3::ZERO, 20.0, 2.0);
        assert_eq!(sheet.trim(), 1.0);
        sheet.set_trim(-1.0);
        assert_eq!(sheet.trim(), 0.0);
    }

    #[test]
    fn test_trimmed_sheet_pulls_toward_attach() {
        let sheet = Sheet::new(Vec3::X * 2.0, Vec3::ZERO, 20.0, 1.0);
        let clew = SpringNode::new(Vec3::ZERO, false, 0.98);
        let f = sheet.force(&clew, 0.02, 2.0, 0.1);
        assert!(f.x > 0.0);
        assert!(f.y.abs() < 1e-6 && f.z.abs() < 1e-6);
    }

    #[test]
    fn test_damping_opposes_motion() {
        let sheet = Sheet::new(Vec3::X, Vec3::ZERO, 0.0, 0.5);
        let mut clew = SpringNode::new(Vec3::ZERO, false, 0.98);
        clew.previous_position = Vec3::new(0.0, -0.1, 0.0);
        let f = sheet.force(&clew, 0.02, 2.0, 0.1);
        assert!(f.y < 0.0);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let sheet = Sheet::new(Vec3::X, Vec3::ZERO, 20.0, 0.5);
        let clew = SpringNode::new(Vec3::ZERO, false, 0.98);
        assert_eq!(sheet.force(&clew, 0.0, 2.0, 0.1), Vec3::ZERO);
    }
}
