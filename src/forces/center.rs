//! Centering force keeping the layout anchored to a fixed point

use crate::forces::Force;
use crate::simulation::SimNode;

/// Translates all nodes so their centroid moves toward a fixed point
///
/// This is positional and mass-independent: the whole layout shifts as one,
/// so relative geometry is untouched. Alpha is ignored on purpose; the
/// anchor holds even as the simulation cools.
pub struct CenterForce {
    x: f64,
    y: f64,
    strength: f64,
}

impl CenterForce {
    /// Anchor the centroid to the given point at full strength
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            strength: 1.0,
        }
    }

    /// Scale how much of the centroid offset is corrected per step
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl Force for CenterForce {
    fn apply(&mut self, nodes: &mut [SimNode], _alpha: f64) {
        let n = nodes.len();
        if n == 0 {
            return;
        }

        let mut sx = 0.0;
        let mut sy = 0.0;
        for node in nodes.iter() {
            sx += node.x;
            sy += node.y;
        }
        let shift_x = (sx / n as f64 - self.x) * self.strength;
        let shift_y = (sy / n as f64 - self.y) * self.strength;

        for node in nodes.iter_mut() {
            node.x -= shift_x;
            node.y -= shift_y;
        }
    }
}
