//! Many-body repulsion approximated over the quadtree
//!
//! A full pairwise pass is O(n²); this walks a charge-aggregated quadtree and
//! applies whole subtrees once they are far enough away (Barnes-Hut cutoff),
//! bringing a step to O(n log n).

use crate::forces::Force;
use crate::quadtree::{Extent, Quadtree};
use crate::simulation::SimNode;

/// Deterministic stand-in for a zero separation
const COINCIDENT_NUDGE: f64 = 1e-6;

/// Coulomb-style repulsion between all node pairs (negative strength repels)
pub struct ManyBodyForce {
    strength: f64,
    theta2: f64,
    distance_min2: f64,
    distance_max2: f64,
}

impl ManyBodyForce {
    /// Create a repulsion force with the given charge strength
    pub fn new(strength: f64) -> Self {
        Self {
            strength,
            theta2: 0.81,
            distance_min2: 1.0,
            distance_max2: f64::INFINITY,
        }
    }

    /// Ignore interactions beyond this distance
    pub fn with_max_distance(mut self, distance: f64) -> Self {
        self.distance_max2 = distance * distance;
        self
    }

    /// Barnes-Hut accuracy parameter; lower is more exact, slower
    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta2 = theta * theta;
        self
    }
}

impl Default for ManyBodyForce {
    fn default() -> Self {
        Self::new(-30.0)
    }
}

impl Force for ManyBodyForce {
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
        if nodes.len() < 2 {
            return;
        }

        let points: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
        let mut tree = Quadtree::build(&points, Extent::from_points(&points));
        let strengths = vec![self.strength; nodes.len()];
        tree.accumulate(&strengths);

        let (strength, theta2) = (self.strength, self.theta2);
        let (distance_min2, distance_max2) = (self.distance_min2, self.distance_max2);

        for i in 0..nodes.len() {
            let (x, y) = (nodes[i].x, nodes[i].y);
            let mut vx = 0.0;
            let mut vy = 0.0;

            tree.visit(|cell, x0, _y0, x1, _y1| {
                if cell.value() == 0.0 {
                    return true;
                }
                let mut dx = cell.x() - x;
                let mut dy = cell.y() - y;
                let width = x1 - x0;
                let mut l = dx * dx + dy * dy;

                // Far enough: treat the whole subtree as one charge.
                if width * width / theta2 < l {
                    if l < distance_max2 {
                        if dx == 0.0 {
                            dx = COINCIDENT_NUDGE;
                            l += dx * dx;
                        }
                        if dy == 0.0 {
                            dy = COINCIDENT_NUDGE;
                            l += dy * dy;
                        }
                        if l < distance_min2 {
                            l = (distance_min2 * l).sqrt();
                        }
                        vx += dx * cell.value() * alpha / l;
                        vy += dy * cell.value() * alpha / l;
                    }
                    return true;
                }

                let Some(entries) = cell.entries() else {
                    // Near internal cell: descend.
                    return false;
                };
                if l >= distance_max2 {
                    return true;
                }
                if dx == 0.0 {
                    dx = COINCIDENT_NUDGE;
                    l += dx * dx;
                }
                if dy == 0.0 {
                    dy = COINCIDENT_NUDGE;
                    l += dy * dy;
                }
                if l < distance_min2 {
                    l = (distance_min2 * l).sqrt();
                }
                for entry in entries {
                    if entry.index == i {
                        continue;
                    }
                    let w = strength * alpha / l;
                    vx += dx * w;
                    vy += dy * w;
                }
                true
            });

            nodes[i].vx += vx;
            nodes[i].vy += vy;
        }
    }
}
