//! nodelink - a force-directed layout engine for interactive node-link diagrams.
//!
//! The crate owns the physics only: per-node kinetic state, a pluggable set of
//! forces (link springs, many-body repulsion, centering, pairwise collision
//! avoidance over a quadtree), and the alpha lifecycle that decides when the
//! layout has settled. Rendering and input are external collaborators: a
//! driver calls [`Simulation::step`] once per animation frame and reads
//! positions back through the tick listener or [`Simulation::nodes`]; pointer
//! events are fed to [`DragController`].

pub mod drag;
pub mod forces;
pub mod graph;
pub mod quadtree;
pub mod simulation;

pub use drag::DragController;
pub use graph::{GraphDocument, GraphError, GraphLink, GraphNode, GraphResult, Viewport};
pub use simulation::{BoundLink, SimNode, Simulation, SimulationConfig};
