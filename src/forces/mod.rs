//! Pluggable forces applied by the simulation each step
//!
//! Forces are registered under a name and applied in registration order.
//! Link and many-body forces accumulate into node velocities only, so every
//! force in a step reads the position set produced by the previous step.
//! The centering and collision forces adjust positions directly and are
//! documented as position-phase forces; register them after the velocity
//! forces to keep that split.

mod center;
mod collide;
mod link;
mod many_body;

pub use center::CenterForce;
pub use collide::CollideForce;
pub use link::LinkForce;
pub use many_body::ManyBodyForce;

use crate::simulation::SimNode;

/// A named rule contributing velocity or position changes to nodes each step
pub trait Force {
    /// Apply one step's contribution at the given alpha
    fn apply(&mut self, nodes: &mut [SimNode], alpha: f64);
}
