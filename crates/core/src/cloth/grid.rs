//! Sail node/spring network built from rows of positions.
//!
//! Row 0 is the foot (tack to clew), the last row is at the head. Column 0
//! of every row is the luff and is pinned; the last column is the leech.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use super::node::SpringNode;
use super::spring::{relax, Spring, SpringKind};
use crate::error::{Result, TradewindError};

/// Stiffness assigned to each spring family at build time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStiffness {
    pub structural: f32,
    pub shear: f32,
    pub bend: f32,
    pub leech_rail: f32,
}

impl Default for GridStiffness {
    fn default() -> Self {
        Self {
            structural: 0.2,
            shear: 0.2,
            bend: 0.2,
            leech_rail: 0.0,
        }
    }
}

/// Arena of nodes and springs plus the render topology of the sail.
#[derive(Debug, Clone)]
pub struct SailGrid {
    pub nodes: Vec<SpringNode>,
    pub springs: Vec<Spring>,
    row_start: Vec<usize>,
    row_count: Vec<usize>,
    /// Chordwise coordinate per node: 0 at the luff, 1 at the leech
    u_coords: Vec<f32>,
    triangles: Vec<[usize; 3]>,
    normals: Vec<Vec3>,
}

impl SailGrid {
    /// Builds a triangular sail tapering from the foot to a single head node.
    ///
    /// Row `y` has `max(1, horizontal_segments + 1 - y)` columns.
    pub fn triangular(
        head: Vec3,
        tack: Vec3,
        clew: Vec3,
        horizontal_segments: usize,
        vertical_segments: usize,
        damping: f32,
        stiffness: GridStiffness,
    ) -> Result<Self> {
        if horizontal_segments == 0 || vertical_segments == 0 {
            return Err(TradewindError::InvalidTopology(format!(
                "segments must be at least 1 (horizontal {horizontal_segments}, vertical {vertical_segments})"
            )));
        }

        let rows = (0..=vertical_segments)
            .map(|y| {
                let t_y = y as f32 / vertical_segments as f32;
                let count = (horizontal_segments + 1).saturating_sub(y).max(1);
                let front = tack.lerp(head, t_y);
                let back = clew.lerp(head, t_y);
                (0..count)
                    .map(|x| front.lerp(back, column_fraction(x, count)))
                    .collect()
            })
            .collect();

        Self::from_rows(rows, damping, stiffness)
    }

    /// Builds the network from explicit rows. Fails on fewer than two rows,
    /// an empty row or a non-finite position.
    pub fn from_rows(rows: Vec<Vec<Vec3>>, damping: f32, stiffness: GridStiffness) -> Result<Self> {
        if rows.len() < 2 {
            return Err(TradewindError::InvalidTopology(format!(
                "need at least 2 rows, got {}",
                rows.len()
            )));
        }
        if let Some(y) = rows.iter().position(|row| row.is_empty()) {
            return Err(TradewindError::InvalidTopology(format!("row {y} is empty")));
        }
        if rows.iter().flatten().any(|p| !p.is_finite()) {
            return Err(TradewindError::InvalidTopology(
                "node position is not finite".to_string(),
            ));
        }

        let mut nodes = Vec::new();
        let mut u_coords = Vec::new();
        let mut row_start = Vec::with_capacity(rows.len());
        let mut row_count = Vec::with_capacity(rows.len());
        for row in &rows {
            row_start.push(nodes.len());
            row_count.push(row.len());
            for (x, &position) in row.iter().enumerate() {
                nodes.push(SpringNode::new(position, x == 0, damping));
                u_coords.push(column_fraction(x, row.len()));
            }
        }

        let mut grid = Self {
            normals: vec![Vec3::ZERO; nodes.len()],
            nodes,
            springs: Vec::new(),
            row_start,
            row_count,
            u_coords,
            triangles: Vec::new(),
        };
        grid.build_structure(stiffness);
        grid.build_leech_rail(stiffness.leech_rail);
        grid.build_bend(stiffness.bend);
        grid.build_triangles();
        grid.recalculate_normals();
        Ok(grid)
    }

    fn push_spring(&mut self, a: usize, b: usize, stiffness: f32, kind: SpringKind) {
        if a != b {
            self.springs
                .push(Spring::new(&self.nodes, a, b, stiffness, kind));
        }
    }

    fn build_structure(&mut self, stiffness: GridStiffness) {
        for y in 0..self.row_count.len() - 1 {
            let (start_a, count_a) = (self.row_start[y], self.row_count[y]);
            let (start_b, count_b) = (self.row_start[y + 1], self.row_count[y + 1]);

            for x in 0..count_a {
                let a = start_a + x;
                let x_b = map_column(x, count_a, count_b);
                if x + 1 < count_a {
                    self.push_spring(a, a + 1, stiffness.structural, SpringKind::Structural);
                }
                self.push_spring(a, start_b + x_b, stiffness.structural, SpringKind::Structural);

                if x + 1 < count_a {
                    let x_b2 = map_column(x + 1, count_a, count_b);
                    if x_b2 != x_b {
                        self.push_spring(a, start_b + x_b2, stiffness.shear, SpringKind::Shear);
                    }
                    self.push_spring(a + 1, start_b + x_b, stiffness.shear, SpringKind::Shear);
                }
            }
        }
    }

    fn build_leech_rail(&mut self, stiffness: f32) {
        let rows = self.row_count.len();
        for y in 0..rows {
            let count = self.row_count[y];
            if count < 2 {
                continue;
            }
            let last = self.row_start[y] + count - 1;
            self.push_spring(last, last - 1, stiffness, SpringKind::LeechRail);
            if y + 1 < rows {
                let next_last = self.row_start[y + 1] + self.row_count[y + 1] - 1;
                self.push_spring(last, next_last, stiffness, SpringKind::LeechRail);
            }
        }
    }

    fn build_bend(&mut self, stiffness: f32) {
        let rows = self.row_count.len();
        for y in 0..rows {
            let (start, count) = (self.row_start[y], self.row_count[y]);
            for x in 0..count.saturating_sub(2) {
                self.push_spring(start + x, start + x + 2, stiffness, SpringKind::Bend);
            }
            if y + 2 < rows {
                let (start_c, count_c) = (self.row_start[y + 2], self.row_count[y + 2]);
                for x in 0..count {
                    let x_c = map_column(x, count, count_c);
                    self.push_spring(start + x, start_c + x_c, stiffness, SpringKind::Bend);
                }
            }
        }
    }

    fn build_triangles(&mut self) {
        for y in 0..self.row_count.len() - 1 {
            let (start_a, count_a) = (self.row_start[y], self.row_count[y]);
            let (start_b, count_b) = (self.row_start[y + 1], self.row_count[y + 1]);
            for x in 0..count_a.saturating_sub(1) {
                let a = start_a + x;
                let a2 = a + 1;
                let b = start_b + map_column(x, count_a, count_b);
                let b2 = start_b + map_column(x + 1, count_a, count_b);
                if b != b2 {
                    self.triangles.push([a, b, b2]);
                }
                self.triangles.push([a, b2, a2]);
            }
        }
    }

    /// Rebuilds per-node normals from the area-weighted face normals
    pub fn recalculate_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);
        for &[i0, i1, i2] in &self.triangles {
            let p0 = self.nodes[i0].position;
            let face = (self.nodes[i1].position - p0).cross(self.nodes[i2].position - p0);
            self.normals[i0] += face;
            self.normals[i1] += face;
            self.normals[i2] += face;
        }
        self.normals
            .iter_mut()
            .for_each(|n| *n = n.normalize_or_zero());
    }

    /// Sets the stiffness of every leech-rail spring
    pub fn set_leech_stiffness(&mut self, stiffness: f32) {
        self.springs
            .iter_mut()
            .filter(|s| s.kind == SpringKind::LeechRail)
            .for_each(|s| s.stiffness = stiffness);
    }

    /// One Gauss-Seidel sweep over all springs
    pub fn relax(&mut self) {
        relax(&self.springs, &mut self.nodes);
    }

    pub fn integrate(&mut self, dt: f32) {
        self.nodes.iter_mut().for_each(|n| n.update_position(dt));
    }

    /// Σ |k · (len − rest)| over every spring
    pub fn total_spring_tension(&self) -> f32 {
        self.springs
            .iter()
            .map(|s| (s.stiffness * s.extension(&self.nodes)).abs())
            .sum()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count.len()
    }

    /// Nodes in row `y`
    pub fn row_len(&self, y: usize) -> usize {
        self.row_count.get(y).copied().unwrap_or(0)
    }

    /// Index of the clew: the leech end of the foot row
    pub fn clew_index(&self) -> usize {
        self.row_start[0] + self.row_count[0] - 1
    }

    pub fn u_coords(&self) -> &[f32] {
        &self.u_coords
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.nodes.iter().map(|n| n.position)
    }
}

/// `x / (count - 1)`, or 0 for a single-node row
fn column_fraction(x: usize, count: usize) -> f32 {
    if count > 1 {
        x as f32 / (count - 1) as f32
    } else {
        0.0
    }
}

/// Column in a row of `count_to` nodes at the same chordwise fraction as
/// column `x` of a row of `count_from` nodes. Ties round to even.
fn map_column(x: usize, count_from: usize, count_to: usize) -> usize {
    if count_to <= 1 {
        return 0;
    }
    let fraction = column_fraction(x, count_from);
    let mapped = (fraction * (count_to - 1) as f32).round_ties_even();
    (mapped.max(0.0) as usize).min(count_to - 1)
}
