//! Position-based distance constraints.

use serde::{Deserialize, Serialize};

use super::node::SpringNode;
use crate::constants::SPRING_EPSILON;

/// Role of a spring in the sail network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpringKind {
    /// Row edges and row-to-row verticals
    Structural,
    /// Diagonals between rows
    Shear,
    /// Skip-one links resisting folding
    Bend,
    /// Leech edge links whose stiffness follows sheet trim
    LeechRail,
}

/// Distance constraint between two nodes of the owning arena.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub rest_length: f32,
    pub stiffness: f32,
    pub kind: SpringKind,
}

impl Spring {
    /// Captures the current distance between `a` and `b` as rest length
    pub fn new(nodes: &[SpringNode], a: usize, b: usize, stiffness: f32, kind: SpringKind) -> Self {
        let rest_length = nodes[a].position.distance(nodes[b].position);
        Self {
            a,
            b,
            rest_length,
            stiffness,
            kind,
        }
    }

    /// Signed stretch beyond rest length
    pub fn extension(&self, nodes: &[SpringNode]) -> f32 {
        nodes[self.a].position.distance(nodes[self.b].position) - self.rest_length
    }

    /// Moves the free endpoints toward rest length by half the stiffness-scaled
    /// error each. Springs shorter than `SPRING_EPSILON` are skipped.
    pub fn apply_constraint(&self, nodes: &mut [SpringNode]) {
        let delta = nodes[self.b].position - nodes[self.a].position;
        let current = delta.length();
        if current < SPRING_EPSILON {
            return;
        }

        let difference = (current - self.rest_length) / current;
        let offset = delta * difference * self.stiffness * 0.5;

        if !nodes[self.a].is_fixed {
            nodes[self.a].position += offset;
        }
        if !nodes[self.b].is_fixed {
            nodes[self.b].position -= offset;
        }
    }
}

/// One Gauss-Seidel sweep over `springs` in order
pub fn relax(springs: &[Spring], nodes: &mut [SpringNode]) {
    for spring in springs {
        spring.apply_constraint(nodes);
    }
}
