//! Spring force pulling linked nodes toward a rest distance

use crate::forces::Force;
use crate::simulation::{BoundLink, SimNode};

/// Default rest length of a link spring
pub const DEFAULT_DISTANCE: f64 = 50.0;

/// Hooke spring between the endpoints of every bound link
///
/// Endpoints are resolved to node indices before construction (see
/// [`Simulation::set_links`](crate::Simulation::set_links)), so application
/// never has to deal with dangling ids.
pub struct LinkForce {
    links: Vec<BoundLink>,
    distance: f64,
    strength: f64,
}

impl LinkForce {
    /// Create a spring force over already-resolved links
    pub fn new(links: Vec<BoundLink>) -> Self {
        Self {
            links,
            distance: DEFAULT_DISTANCE,
            strength: 1.0,
        }
    }

    /// Override the rest distance
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Override the spring strength
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }
}

impl Force for LinkForce {
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64) {
        for link in &self.links {
            let (source, target) = (link.source, link.target);

            let dx = nodes[target].x - nodes[source].x;
            let dy = nodes[target].y - nodes[source].y;

            // Clamp below 1 so coincident endpoints cannot blow up.
            let dist = (dx * dx + dy * dy).sqrt().max(1.0);

            // Hooke's law: F = k * (x - x0)
            let stretch = dist - self.distance;
            let force = self.strength * stretch / dist * alpha;

            let fx = force * dx;
            let fy = force * dy;

            nodes[source].vx += fx;
            nodes[source].vy += fy;
            nodes[target].vx -= fx;
            nodes[target].vy -= fy;
        }
    }
}
