//! Submerged volume of one hull triangle.
//!
//! Each hull vertex `H` is paired with its water point `W` directly above or
//! below it. Clipping the triangle at the waterline gives a polygon of hull
//! points and the matching water points; the column between the two
//! polygons is the displaced water.

use bevy::math::Vec3;

use crate::math::{signed_tetrahedron_volume, triangle_area};

/// Clipped polygon: at most one point per vertex plus two crossings
const MAX_POINTS: usize = 6;

/// Hull and water outlines of the submerged part of a triangle
#[derive(Debug, Clone, Copy)]
pub struct ClippedPolygon {
    hull: [Vec3; MAX_POINTS],
    water: [Vec3; MAX_POINTS],
    len: usize,
}

impl ClippedPolygon {
    fn new() -> Self {
        Self {
            hull: [Vec3::ZERO; MAX_POINTS],
            water: [Vec3::ZERO; MAX_POINTS],
            len: 0,
        }
    }

    fn push(&mut self, hull: Vec3, water: Vec3) {
        if self.len < MAX_POINTS {
            self.hull[self.len] = hull;
            self.water[self.len] = water;
            self.len += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn hull_points(&self) -> &[Vec3] {
        &self.hull[..self.len]
    }

    pub fn water_points(&self) -> &[Vec3] {
        &self.water[..self.len]
    }

    /// Adds the submerged start of edge `i → j` and its waterline crossing
    fn clip_edge(&mut self, hi: Vec3, wi: Vec3, di: f32, hj: Vec3, wj: Vec3, dj: f32) {
        if di > 0.0 {
            self.push(hi, wi);
        }
        if (di > 0.0) != (dj > 0.0) {
            let f = di / (di - dj);
            self.push(hi.lerp(hj, f), wi.lerp(wj, f));
        }
    }
}

/// Clips a hull triangle against per-vertex water heights
pub fn clip_triangle(hull: [Vec3; 3], water_heights: [f32; 3]) -> ClippedPolygon {
    let water = [0, 1, 2].map(|i| Vec3::new(hull[i].x, water_heights[i], hull[i].z));
    let depth = [0, 1, 2].map(|i| water_heights[i] - hull[i].y);

    let mut polygon = ClippedPolygon::new();
    for (i, j) in [(0, 1), (1, 2), (2, 0)] {
        polygon.clip_edge(hull[i], water[i], depth[i], hull[j], water[j], depth[j]);
    }
    polygon
}

/// Displaced volume and its volume-weighted centroid sum
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubmergedVolume {
    pub volume: f32,
    /// Σ centroid · volume, divide by the total volume for the center of buoyancy
    pub moment: Vec3,
}

impl std::ops::AddAssign for SubmergedVolume {
    fn add_assign(&mut self, rhs: Self) {
        self.volume += rhs.volume;
        self.moment += rhs.moment;
    }
}

/// Volume of the water column above the submerged part of a triangle.
///
/// Three points: a prism of the submerged area times the mean depth.
/// Four or more: the polygon is fanned into triangles and each triangular
/// column is split into three tetrahedra. Every term is non-negative.
pub fn submerged_volume(hull: [Vec3; 3], water_heights: [f32; 3]) -> SubmergedVolume {
    let polygon = clip_triangle(hull, water_heights);
    let h = polygon.hull_points();
    let w = polygon.water_points();

    match polygon.len() {
        3 => {
            let area = triangle_area(h[0], h[1], h[2]);
            let mean_depth = (0..3).map(|i| w[i].y - h[i].y).sum::<f32>() / 3.0;
            let volume = (area * mean_depth).max(0.0);
            let centroid = ((h[0] + h[1] + h[2]) / 3.0 + (w[0] + w[1] + w[2]) / 3.0) * 0.5;
            SubmergedVolume {
                volume,
                moment: centroid * volume,
            }
        }
        n if n >= 4 => {
            let mut total = SubmergedVolume::default();
            for k in 1..n - 1 {
                let (a, b, c) = (0, k, k + 1);
                total += tetrahedron(h[a], h[b], h[c], w[a]);
                total += tetrahedron(h[b], h[c], w[a], w[b]);
                total += tetrahedron(h[c], w[a], w[b], w[c]);
            }
            total
        }
        _ => SubmergedVolume::default(),
    }
}

fn tetrahedron(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> SubmergedVolume {
    let volume = signed_tetrahedron_volume(a, b, c, d).abs();
    SubmergedVolume {
        volume,
        moment: (a + b + c + d) * 0.25 * volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    const FLAT: [f32; 3] = [0.0, 0.0, 0.0];

    fn right_triangle(y: f32) -> [Vec3; 3] {
        [
            Vec3::new(0.0, y, 0.0),
            Vec3::new(1.0, y, 0.0),
            Vec3::new(0.0, y, 1.0),
        ]
    }

    #[test]
    fn test_dry_triangle_has_no_volume() {
        let v = submerged_volume(right_triangle(0.5), FLAT);
        assert_eq!(v.volume, 0.0);
        assert!(clip_triangle(right_triangle(0.5), FLAT).is_empty());
    }

    #[test]
    fn test_submerged_triangle_is_prism() {
        let v = submerged_volume(right_triangle(-2.0), FLAT);
        // area 0.5, depth 2
        assert!((v.volume - 1.0).abs() < 1e-5);
        let cob = v.moment / v.volume;
        assert!((cob.y + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_two_vertices_under_gives_quad() {
        // vertices 0 and 1 under water, vertex 2 above
        let hull = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let polygon = clip_triangle(hull, FLAT);
        assert_eq!(polygon.len(), 4);
        let v = submerged_volume(hull, FLAT);
        assert!(v.volume > 0.0);
        // bounded by the full prism of the triangle footprint at depth 1
        assert!(v.volume < 0.5 * 1.0 + 1e-5);
    }

    #[test]
    fn test_sloped_quad_column_matches_integral() {
        // hull plane y = 2z - 1 over the footprint (0,0), (1,0), (0,1):
        // ∫₀^½ (1 - 2z)(1 - z) dz = 5/24
        let hull = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let v = submerged_volume(hull, FLAT);
        assert!((v.volume - 5.0 / 24.0).abs() < 1e-5, "volume {}", v.volume);
    }

    #[test]
    fn test_quad_column_volume_is_exact() {
        // vertical wall from y = -1 to y = 1: footprint is a line, no volume
        let hull = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let v = submerged_volume(hull, FLAT);
        assert!(v.volume.abs() < 1e-5);
    }

    #[test]
    fn test_volume_translation_invariant() {
        let hull = [
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(2.0, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 1.5),
        ];
        let offset = Vec3::new(300.0, 0.0, -120.0);
        let a = submerged_volume(hull, FLAT);
        let b = submerged_volume(hull.map(|p| p + offset), FLAT);
        assert!((a.volume - b.volume).abs() < 1e-3);
    }

    #[test]
    fn test_volume_never_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..2000 {
            let hull = [0, 1, 2].map(|_| {
                Vec3::new(
                    rng.gen_range(-5.0..5.0),
                    rng.gen_range(-2.0..2.0),
                    rng.gen_range(-5.0..5.0),
                )
            });
            let water = [0, 1, 2].map(|_| rng.gen_range(-0.5..0.5));
            let v = submerged_volume(hull, water);
            assert!(v.volume >= 0.0);
            assert!(v.volume.is_finite());
        }
    }
}
