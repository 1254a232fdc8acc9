//! Hull helper meshes.
//!
//! A [`HullMesh`] is the closed triangle soup the mesh buoyancy integrates.
//! [`HullLines`] builds one from three construction lines drawn on the port
//! side of a hull: the centre line, the boot (waterline) and the deck edge.
//!
//! ```text
//!   columns   C    B    D    SD   SB   (then back to C)
//!   rows      0 .. N-1, bow to stern
//! ```

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TradewindError};

/// Closed hull surface in body-local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HullMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<[usize; 3]>,
}

impl HullMesh {
    /// Fails with fewer than four vertices or an out-of-range index.
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Result<Self> {
        if vertices.len() < 4 {
            return Err(TradewindError::InvalidHullMesh(format!(
                "need at least 4 vertices, got {}",
                vertices.len()
            )));
        }
        if let Some(tri) = triangles
            .iter()
            .find(|tri| tri.iter().any(|&i| i >= vertices.len()))
        {
            return Err(TradewindError::InvalidHullMesh(format!(
                "triangle {tri:?} indexes past {} vertices",
                vertices.len()
            )));
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }
}

/// Port-side construction lines of a hull, each ordered or unordered along Z.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HullLines {
    pub center: Vec<Vec3>,
    pub port_boot: Vec<Vec3>,
    pub port_deck: Vec<Vec3>,
}

impl HullLines {
    /// Builds the helper mesh.
    ///
    /// Lines are sorted by Z, boot and deck are resampled to one point per
    /// centre station and mirrored to starboard about that station.
    pub fn build_mesh(&self) -> Result<HullMesh> {
        for (name, line) in [
            ("center", &self.center),
            ("port_boot", &self.port_boot),
            ("port_deck", &self.port_deck),
        ] {
            if line.len() < 2 {
                return Err(TradewindError::InvalidHullLines(format!(
                    "{name} line needs at least 2 points, got {}",
                    line.len()
                )));
            }
        }

        let center = sorted_along_z(&self.center);
        let boot = sorted_along_z(&self.port_boot);
        let deck = sorted_along_z(&self.port_deck);

        let rows = center.len();
        let resample = |line: &[Vec3]| -> Vec<Vec3> {
            (0..rows)
                .map(|i| sample_polyline(line, i as f32 / (rows - 1) as f32))
                .collect()
        };
        let boot = resample(&boot);
        let deck = resample(&deck);

        let mirror = |points: &[Vec3]| -> Vec<Vec3> {
            points
                .iter()
                .zip(&center)
                .map(|(p, c)| Vec3::new(2.0 * c.x - p.x, p.y, p.z))
                .collect()
        };
        let starboard_deck = mirror(&deck);
        let starboard_boot = mirror(&boot);

        let columns = [&center, &boot, &deck, &starboard_deck, &starboard_boot];
        let vertices: Vec<Vec3> = columns.iter().flat_map(|col| col.iter().copied()).collect();

        let mut triangles = Vec::with_capacity(columns.len() * (rows - 1) * 2);
        for x in 0..columns.len() {
            // the last strip wraps back to the centre line
            let next = (x + 1) % columns.len();
            for y in 0..rows - 1 {
                let a = x * rows + y;
                let b = x * rows + y + 1;
                let c = next * rows + y;
                let d = next * rows + y + 1;
                triangles.push([a, b, c]);
                triangles.push([b, d, c]);
            }
        }

        HullMesh::new(vertices, triangles)
    }
}

fn sorted_along_z(line: &[Vec3]) -> Vec<Vec3> {
    let mut sorted = line.to_vec();
    sorted.sort_by(|a, b| a.z.total_cmp(&b.z));
    sorted
}

/// Point at fraction `t` of the index range of `line`
fn sample_polyline(line: &[Vec3], t: f32) -> Vec3 {
    match line {
        [] => Vec3::ZERO,
        [only] => *only,
        _ => {
            let index = t.clamp(0.0, 1.0) * (line.len() - 1) as f32;
            let i = (index.floor() as usize).min(line.len() - 1);
            let next = (i + 1).min(line.len() - 1);
            line[i].lerp(line[next], index - i as f32)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> HullLines {
        HullLines {
            center: vec![
                Vec3::new(0.0, -0.8, 2.0),
                Vec3::new(0.0, -1.0, 0.0),
                Vec3::new(0.0, -0.8, -2.0),
            ],
            port_boot: vec![Vec3::new(1.0, -0.2, 2.0), Vec3::new(1.0, -0.2, -2.0)],
            port_deck: vec![
                Vec3::new(1.2, 0.5, -2.0),
                Vec3::new(1.3, 0.5, 0.0),
                Vec3::new(1.2, 0.5, 2.0),
                Vec3::new(1.1, 0.5, 3.0),
            ],
        }
    }

    #[test]
    fn test_mesh_layout() {
        let mesh = lines().build_mesh().unwrap();
        assert_eq!(mesh.vertices().len(), 15);
        // five strips of two rows, two triangles per quad
        assert_eq!(mesh.triangles().len(), 5 * 2 * 2);
    }

    #[test]
    fn test_starboard_mirrors_port() {
        let mesh = lines().build_mesh().unwrap();
        let v = mesh.vertices();
        let rows = 3;
        for y in 0..rows {
            let boot = v[rows + y];
            let starboard_boot = v[4 * rows + y];
            assert!((boot.x + starboard_boot.x).abs() < 1e-6);
            assert_eq!(boot.z, starboard_boot.z);
        }
    }

    #[test]
    fn test_boot_resampled_to_stations() {
        let mesh = lines().build_mesh().unwrap();
        // middle station of a two-point boot line is its midpoint
        let mid = mesh.vertices()[3 + 1];
        assert!((mid - Vec3::new(1.0, -0.2, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_short_line_rejected() {
        let mut short = lines();
        short.port_deck.truncate(1);
        assert!(matches!(
            short.build_mesh(),
            Err(TradewindError::InvalidHullLines(_))
        ));
    }

    #[test]
    fn test_mesh_rejects_bad_index() {
        let vertices = vec![Vec3::ZERO; 4];
        assert!(HullMesh::new(vertices, vec![[0, 1, 9]]).is_err());
    }
}
