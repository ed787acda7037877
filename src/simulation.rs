//! Force simulation engine
//!
//! Maintains per-node kinetic state and a named, ordered set of forces. An
//! external driver calls [`Simulation::step`] once per animation frame; each
//! step applies every force, integrates positions, decays alpha toward its
//! target and notifies the tick listener exactly once. The engine never
//! schedules itself and never blocks: stopping the simulation just means the
//! driver stops stepping once [`Simulation::step`] reports it settled.

use std::collections::HashMap;

use crate::forces::{CenterForce, CollideForce, Force, LinkForce, ManyBodyForce};
use crate::graph::{GraphDocument, GraphError, GraphLink, GraphResult, Viewport};

/// Radius step of the deterministic seeding spiral
const INITIAL_RADIUS: f64 = 10.0;
/// Golden angle, pi * (3 - sqrt(5))
const INITIAL_ANGLE: f64 = 2.399963229728653;

/// Collision padding used by the default force set
const DEFAULT_COLLIDE_PADDING: f64 = 2.0;

/// A node's kinetic state
///
/// Positions and velocities are mutated in place every step; the rendering
/// collaborator reads them between steps. A fixed position (`fx`/`fy`)
/// overrides integration on that axis and zeroes its velocity, but the node
/// still exerts forces on others.
#[derive(Debug, Clone)]
pub struct SimNode {
    /// Identity, unique within the graph
    pub id: String,
    /// Position
    pub x: f64,
    pub y: f64,
    /// Velocity
    pub vx: f64,
    pub vy: f64,
    /// Collision radius
    pub r: f64,
    /// Fixed x position while pinned
    pub fx: Option<f64>,
    /// Fixed y position while pinned
    pub fy: Option<f64>,
}

/// A link with endpoints resolved to live node indices
#[derive(Debug, Clone, Copy)]
pub struct BoundLink {
    /// Index of the source node
    pub source: usize,
    /// Index of the target node
    pub target: usize,
    /// Visual weight carried through for the renderer
    pub value: f64,
}

/// Alpha lifecycle and integration constants
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Current alpha (simulation temperature)
    pub alpha: f64,
    /// Minimum alpha before the layout counts as settled
    pub alpha_min: f64,
    /// Per-step convergence rate of alpha toward its target
    pub alpha_decay: f64,
    /// Drag-interaction override; 0 lets the simulation cool
    pub alpha_target: f64,
    /// Velocity damping factor applied each step
    pub velocity_decay: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_min: 0.001,
            alpha_decay: 1.0 - 0.001_f64.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.6,
        }
    }
}

type TickListener = Box<dyn FnMut(&[SimNode])>;

/// The force simulation engine
///
/// Owns the node set for the simulation's lifetime. Forces run in
/// registration order; the link and many-body forces accumulate velocities
/// only, while centering and collision adjust positions directly, so each
/// step's velocity math always reads the previous step's positions.
pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<BoundLink>,
    forces: Vec<(String, Box<dyn Force>)>,
    node_index: HashMap<String, usize>,
    viewport: Viewport,
    /// Alpha lifecycle state; adjust freely between steps
    pub config: SimulationConfig,
    on_tick: Option<TickListener>,
}

impl Simulation {
    /// Bind a validated graph document, with no forces registered yet
    ///
    /// Every node gets zero velocity. Nodes without an initial position are
    /// seeded deterministically on a phyllotaxis spiral around the viewport
    /// center, so repeated runs over the same document produce the same
    /// layout. Radii come from the document and are never defaulted.
    pub fn new(document: &GraphDocument, viewport: Viewport) -> GraphResult<Self> {
        document.validate()?;

        let nodes: Vec<SimNode> = document
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| {
                let (sx, sy) = seed_position(i, viewport);
                SimNode {
                    id: n.id.clone(),
                    x: n.x.unwrap_or(sx),
                    y: n.y.unwrap_or(sy),
                    vx: 0.0,
                    vy: 0.0,
                    r: n.r,
                    fx: None,
                    fy: None,
                }
            })
            .collect();

        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();

        Ok(Self {
            nodes,
            links: Vec::new(),
            forces: Vec::new(),
            node_index,
            viewport,
            config: SimulationConfig::default(),
            on_tick: None,
        })
    }

    /// Bind a document and register the standard force set: link springs,
    /// many-body repulsion, centering on the viewport and collision
    pub fn with_default_forces(document: &GraphDocument, viewport: Viewport) -> GraphResult<Self> {
        let mut sim = Self::new(document, viewport)?;
        sim.set_links(&document.links)?;
        sim.register_force("charge", ManyBodyForce::default());
        let (cx, cy) = viewport.center();
        sim.register_force("center", CenterForce::new(cx, cy));
        sim.register_force(
            "collision",
            CollideForce::new(DEFAULT_COLLIDE_PADDING, viewport),
        );
        Ok(sim)
    }

    /// Resolve link endpoints against the bound node set and register (or
    /// replace) the `"link"` force
    ///
    /// Fails fast with [`GraphError::UnknownNode`] on the first endpoint that
    /// does not resolve; nothing is rebound in that case.
    pub fn set_links(&mut self, links: &[GraphLink]) -> GraphResult<()> {
        let mut bound = Vec::with_capacity(links.len());
        for link in links {
            bound.push(BoundLink {
                source: self.index_of(&link.source)?,
                target: self.index_of(&link.target)?,
                value: link.value,
            });
        }
        self.register_force("link", LinkForce::new(bound.clone()));
        self.links = bound;
        Ok(())
    }

    /// Register a force under a name
    ///
    /// Forces apply in registration order. Re-registering a name replaces the
    /// force in place, keeping its position in that order.
    pub fn register_force(&mut self, name: &str, force: impl Force + 'static) {
        if let Some(slot) = self.forces.iter_mut().find(|(n, _)| n == name) {
            slot.1 = Box::new(force);
        } else {
            self.forces.push((name.to_string(), Box::new(force)));
        }
    }

    /// Remove a force by name; returns whether it was registered
    pub fn remove_force(&mut self, name: &str) -> bool {
        let before = self.forces.len();
        self.forces.retain(|(n, _)| n != name);
        self.forces.len() != before
    }

    /// Advance the simulation by one step; returns `true` once settled
    ///
    /// Applies every force at the current alpha, integrates
    /// `position += velocity` with damping for every non-fixed axis, decays
    /// alpha toward the target and invokes the tick listener exactly once.
    /// Stepping a settled simulation is harmless.
    pub fn step(&mut self) -> bool {
        let alpha = self.config.alpha;
        for (_, force) in self.forces.iter_mut() {
            force.apply(&mut self.nodes, alpha);
        }

        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= self.config.velocity_decay;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= self.config.velocity_decay;
                    node.y += node.vy;
                }
            }
        }

        self.config.alpha += (self.config.alpha_target - self.config.alpha) * self.config.alpha_decay;

        if let Some(listener) = self.on_tick.as_mut() {
            listener(&self.nodes);
        }

        self.is_settled()
    }

    /// Step until settled, bounded by `max_steps`
    pub fn run_to_convergence(&mut self, max_steps: usize) {
        for _ in 0..max_steps {
            if self.step() {
                tracing::debug!(alpha = self.config.alpha, "layout settled");
                break;
            }
        }
    }

    /// Whether alpha has decayed below the stop threshold
    pub fn is_settled(&self) -> bool {
        self.config.alpha < self.config.alpha_min
    }

    /// Current alpha
    pub fn alpha(&self) -> f64 {
        self.config.alpha
    }

    /// Current alpha target
    pub fn alpha_target(&self) -> f64 {
        self.config.alpha_target
    }

    /// Reheat the layout: set the alpha target and lift alpha to at least
    /// that target so the next step visibly perturbs positions
    pub fn restart(&mut self, target_alpha: f64) {
        self.config.alpha_target = target_alpha;
        if self.config.alpha < target_alpha {
            self.config.alpha = target_alpha;
        }
    }

    /// Adjust the alpha target without reheating
    pub fn set_alpha_target(&mut self, target_alpha: f64) {
        self.config.alpha_target = target_alpha;
    }

    /// Pin a node at a fixed position; integration stops moving it
    pub fn pin(&mut self, id: &str, x: f64, y: f64) -> GraphResult<()> {
        let i = self.index_of(id)?;
        self.nodes[i].fx = Some(x);
        self.nodes[i].fy = Some(y);
        Ok(())
    }

    /// Clear a node's fixed position so it integrates normally again
    pub fn unpin(&mut self, id: &str) -> GraphResult<()> {
        let i = self.index_of(id)?;
        self.nodes[i].fx = None;
        self.nodes[i].fy = None;
        Ok(())
    }

    /// Read access for the rendering collaborator
    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&SimNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// The links bound by the last successful [`Simulation::set_links`]
    pub fn links(&self) -> &[BoundLink] {
        &self.links
    }

    /// The viewport the simulation was created with
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Install the tick listener, replacing any previous one
    pub fn on_tick(&mut self, listener: impl FnMut(&[SimNode]) + 'static) {
        self.on_tick = Some(Box::new(listener));
    }

    fn index_of(&self, id: &str) -> GraphResult<usize> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }
}

/// Deterministic initial placement: a phyllotaxis spiral around the
/// viewport center, matching position-free nodes across runs
fn seed_position(i: usize, viewport: Viewport) -> (f64, f64) {
    let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
    let angle = i as f64 * INITIAL_ANGLE;
    let (cx, cy) = viewport.center();
    (cx + radius * angle.cos(), cy + radius * angle.sin())
}
