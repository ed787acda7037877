//! Drag interaction controller
//!
//! Translates pointer drag events from the input collaborator into pinning
//! and alpha-target changes on the simulation. Pointer coordinates arrive as
//! explicit event parameters. A count of active gestures ensures that
//! simultaneous drags (multi-touch) reheat the simulation once and let it
//! cool only when the last finger lifts.

use crate::graph::GraphResult;
use crate::simulation::Simulation;

/// Alpha target while at least one drag gesture is active
pub const DRAG_ALPHA_TARGET: f64 = 0.3;

/// Shared drag state across pointers
#[derive(Debug, Default)]
pub struct DragController {
    active: usize,
}

impl DragController {
    /// Create a controller with no active gestures
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any drag gesture is in progress
    pub fn is_active(&self) -> bool {
        self.active > 0
    }

    /// Begin dragging a node at the pointer position
    ///
    /// The first gesture reheats the simulation so the dragged node visibly
    /// perturbs its neighbors. An unknown id fails before any state changes.
    pub fn drag_start(
        &mut self,
        sim: &mut Simulation,
        id: &str,
        x: f64,
        y: f64,
    ) -> GraphResult<()> {
        sim.pin(id, x, y)?;
        if self.active == 0 {
            sim.restart(DRAG_ALPHA_TARGET);
        }
        self.active += 1;
        Ok(())
    }

    /// Track the pointer: update the pinned position, leave velocity alone
    pub fn drag_move(
        &mut self,
        sim: &mut Simulation,
        id: &str,
        x: f64,
        y: f64,
    ) -> GraphResult<()> {
        sim.pin(id, x, y)
    }

    /// End a drag gesture: unpin the node, and once no gesture remains let
    /// the simulation settle again
    pub fn drag_end(&mut self, sim: &mut Simulation, id: &str) -> GraphResult<()> {
        sim.unpin(id)?;
        if self.active > 0 {
            self.active -= 1;
            if self.active == 0 {
                sim.set_alpha_target(0.0);
            }
        }
        Ok(())
    }
}
