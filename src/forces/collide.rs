//! Pairwise collision avoidance over the spatial index
//!
//! Nodes are treated as circles of radius `r + padding`. One sweep in node
//! array order separates each overlapping pair it finds, splitting the
//! correction evenly between the two nodes. The sweep is not iterated to
//! convergence within a step; residual overlap resolves over the following
//! steps as the simulation keeps running.

use crate::forces::Force;
use crate::graph::Viewport;
use crate::quadtree::{Extent, Quadtree};
use crate::simulation::SimNode;

/// Single-pass separation of overlapping node circles
pub struct CollideForce {
    padding: f64,
    viewport: Viewport,
}

impl CollideForce {
    /// Separate circles of `r + padding`, indexing within the viewport extent
    pub fn new(padding: f64, viewport: Viewport) -> Self {
        Self { padding, viewport }
    }
}

impl Force for CollideForce {
    fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64) {
        if nodes.len() < 2 {
            return;
        }

        let points: Vec<(f64, f64)> = nodes.iter().map(|n| (n.x, n.y)).collect();
        let tree = Quadtree::build(&points, Extent::around(self.viewport));
        let padding = self.padding;

        for i in 0..nodes.len() {
            // Search box around the node's padded circle, from its position
            // at the start of its sweep.
            let search = nodes[i].r + padding;
            let nx1 = nodes[i].x - search;
            let ny1 = nodes[i].y - search;
            let nx2 = nodes[i].x + search;
            let ny2 = nodes[i].y + search;

            tree.visit(|cell, x0, y0, x1, y1| {
                if let Some(entries) = cell.entries() {
                    for entry in entries {
                        let j = entry.index;
                        if j == i {
                            continue;
                        }
                        // Live positions, not the build-time snapshot, so
                        // corrections from earlier pairs are respected.
                        let dx = nodes[i].x - nodes[j].x;
                        let dy = nodes[i].y - nodes[j].y;
                        let l = (dx * dx + dy * dy).sqrt();
                        let separation = nodes[i].r + nodes[j].r + padding;
                        if l < separation {
                            if l == 0.0 {
                                // Zero distance makes the correction
                                // undefined; skip the pair and let another
                                // force pull them apart first.
                                tracing::debug!(
                                    node = %nodes[i].id,
                                    other = %nodes[j].id,
                                    "coincident nodes in collision pass, skipping pair"
                                );
                                continue;
                            }
                            let k = (l - separation) / l * 0.5;
                            let mx = dx * k;
                            let my = dy * k;
                            nodes[i].x -= mx;
                            nodes[i].y -= my;
                            nodes[j].x += mx;
                            nodes[j].y += my;
                        }
                    }
                }
                // Skip quadrants lying entirely outside the search box.
                x0 > nx2 || x1 < nx1 || y0 > ny2 || y1 < ny1
            });
        }
    }
}
