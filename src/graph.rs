//! Graph document types and validation
//!
//! The engine consumes an already-fetched graph document: nodes carrying an
//! identity and a collision radius, links referencing node identities by id.
//! Parsing the document out of JSON is offered as a convenience; everything
//! upstream of that (file I/O, network) belongs to the caller.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or binding a graph
#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph document is malformed: bad JSON, duplicate ids, unusable radii
    #[error("malformed graph document: {0}")]
    DataLoad(String),

    /// A link endpoint or node lookup referenced an id that is not bound
    #[error("unknown node id: {0}")]
    UnknownNode(String),
}

/// Result type for graph and simulation setup operations
pub type GraphResult<T> = Result<T, GraphError>;

/// A node in the graph document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique identifier within the document
    pub id: String,

    /// Collision radius; must be present and positive before the simulation
    /// starts (the collision force reads it every step)
    pub r: f64,

    /// Optional initial x position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,

    /// Optional initial y position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

/// A link connecting two nodes by id
///
/// `value` is a visual weight (the renderer scales stroke width with
/// `sqrt(value)`); it does not participate in the physics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphLink {
    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Visual weight of the link
    pub value: f64,
}

/// Complete graph document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    /// All nodes in the graph
    pub nodes: Vec<GraphNode>,

    /// All links in the graph
    pub links: Vec<GraphLink>,
}

impl GraphDocument {
    /// Parse a graph document from a JSON string
    pub fn from_json(json: &str) -> GraphResult<Self> {
        serde_json::from_str(json).map_err(|e| GraphError::DataLoad(e.to_string()))
    }

    /// Check document-level invariants: unique node ids, usable radii
    ///
    /// Link endpoints are not checked here; they are resolved (and rejected)
    /// when the simulation binds them.
    pub fn validate(&self) -> GraphResult<()> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DataLoad(format!(
                    "duplicate node id: {}",
                    node.id
                )));
            }
            if !node.r.is_finite() || node.r <= 0.0 {
                return Err(GraphError::DataLoad(format!(
                    "node {} has unusable radius {}",
                    node.id, node.r
                )));
            }
        }
        Ok(())
    }
}

/// Render surface bounds
///
/// The same bounds seed the collision index extent, so the index is never
/// tighter than the surface it serves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Surface width in layout units
    pub width: f64,
    /// Surface height in layout units
    pub height: f64,
}

impl Viewport {
    /// Create a viewport with the given bounds
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The center point of the surface
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(600.0, 400.0)
    }
}
