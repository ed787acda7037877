//! Point quadtree used by the collision and repulsion passes
//!
//! The tree is ephemeral: rebuilt from current node positions every time a
//! force needs it and never kept across steps. Cells expose their bounds to
//! the visitor, which returns `true` to prune a subtree; exactly coincident
//! points share a leaf.

/// Axis-aligned bounds of the indexed region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Extent {
    /// Create an extent from its corners
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// The viewport plus a 1-unit margin, so boundary nodes stay indexed
    pub fn around(viewport: crate::graph::Viewport) -> Self {
        Self::new(-1.0, -1.0, viewport.width + 1.0, viewport.height + 1.0)
    }

    /// Tight bounds of a point set, padded to nonzero size on each axis
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let mut extent = Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for &(x, y) in points {
            extent.cover(x, y);
        }
        if extent.x0 > extent.x1 {
            return Self::new(0.0, 0.0, 1.0, 1.0);
        }
        if extent.x1 <= extent.x0 {
            extent.x1 = extent.x0 + 1.0;
        }
        if extent.y1 <= extent.y0 {
            extent.y1 = extent.y0 + 1.0;
        }
        extent
    }

    /// Grow the extent to include a point
    pub fn cover(&mut self, x: f64, y: f64) {
        if x < self.x0 {
            self.x0 = x;
        }
        if x > self.x1 {
            self.x1 = x;
        }
        if y < self.y0 {
            self.y0 = y;
        }
        if y > self.y1 {
            self.y1 = y;
        }
    }
}

/// A point stored in a leaf: the node index and the position it was indexed at
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    /// Index of the node in the array the tree was built from
    pub index: usize,
    /// Position at build time
    pub x: f64,
    /// Position at build time
    pub y: f64,
}

/// A cell of the tree, handed to [`Quadtree::visit`] callbacks
#[derive(Debug)]
pub enum Cell {
    /// Terminal cell holding one point (or several exactly coincident ones)
    Leaf(Leaf),
    /// Subdivided cell with up to four children
    Internal(Internal),
}

#[derive(Debug)]
pub struct Leaf {
    entries: Vec<Entry>,
    value: f64,
    x: f64,
    y: f64,
}

#[derive(Debug)]
pub struct Internal {
    children: [Option<Box<Cell>>; 4],
    value: f64,
    x: f64,
    y: f64,
}

impl Cell {
    /// Entries stored at this cell; `Some` exactly for leaves
    pub fn entries(&self) -> Option<&[Entry]> {
        match self {
            Cell::Leaf(leaf) => Some(&leaf.entries),
            Cell::Internal(_) => None,
        }
    }

    /// Whether this cell is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, Cell::Leaf(_))
    }

    /// Accumulated charge of the subtree; populated by [`Quadtree::accumulate`]
    pub fn value(&self) -> f64 {
        match self {
            Cell::Leaf(leaf) => leaf.value,
            Cell::Internal(internal) => internal.value,
        }
    }

    /// Charge-weighted centroid x; for leaves, the point position itself
    pub fn x(&self) -> f64 {
        match self {
            Cell::Leaf(leaf) => leaf.x,
            Cell::Internal(internal) => internal.x,
        }
    }

    /// Charge-weighted centroid y; for leaves, the point position itself
    pub fn y(&self) -> f64 {
        match self {
            Cell::Leaf(leaf) => leaf.y,
            Cell::Internal(internal) => internal.y,
        }
    }
}

/// Subdivision cutoff for near-coincident points
const MAX_DEPTH: usize = 48;

/// Spatial index over a snapshot of node positions
#[derive(Debug)]
pub struct Quadtree {
    root: Option<Box<Cell>>,
    extent: Extent,
}

impl Quadtree {
    /// Build a tree over the given points
    ///
    /// The requested extent is unioned with the actual point bounds, so the
    /// index is never tighter than the data even if a point has strayed
    /// outside the viewport. Non-finite points are not indexed.
    pub fn build(points: &[(f64, f64)], extent: Extent) -> Self {
        let mut extent = extent;
        for &(x, y) in points {
            if x.is_finite() && y.is_finite() {
                extent.cover(x, y);
            }
        }
        let mut tree = Self { root: None, extent };
        for (index, &(x, y)) in points.iter().enumerate() {
            if x.is_finite() && y.is_finite() {
                tree.insert(Entry { index, x, y });
            }
        }
        tree
    }

    /// Whether the tree holds no points
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The bounds the root cell spans
    pub fn extent(&self) -> Extent {
        self.extent
    }

    fn insert(&mut self, entry: Entry) {
        let Extent { x0, y0, x1, y1 } = self.extent;
        insert_into(&mut self.root, entry, x0, y0, x1, y1, 0);
    }

    /// Compute per-cell charge aggregates for Barnes-Hut style traversal
    ///
    /// `strengths` is indexed by the node index each entry was built with.
    /// Internal cells get the charge sum and the absolute-charge-weighted
    /// centroid of their subtree.
    pub fn accumulate(&mut self, strengths: &[f64]) {
        if let Some(root) = &mut self.root {
            accumulate_cell(root, strengths);
        }
    }

    /// Walk cells pre-order; the visitor returns `true` to skip a subtree
    ///
    /// The visitor receives each cell with the bounds of the quadrant it
    /// spans. Leaves are visited whenever their parent is not pruned, so a
    /// range query still has to distance-check the entries it is handed.
    pub fn visit<F>(&self, mut visitor: F)
    where
        F: FnMut(&Cell, f64, f64, f64, f64) -> bool,
    {
        if let Some(root) = &self.root {
            let Extent { x0, y0, x1, y1 } = self.extent;
            visit_cell(root, x0, y0, x1, y1, &mut visitor);
        }
    }
}

fn insert_into(
    slot: &mut Option<Box<Cell>>,
    entry: Entry,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    depth: usize,
) {
    let Some(cell) = slot else {
        *slot = Some(Box::new(Cell::Leaf(Leaf {
            entries: vec![entry],
            value: 0.0,
            x: entry.x,
            y: entry.y,
        })));
        return;
    };
    match cell.as_mut() {
        Cell::Leaf(leaf) => {
            let first = leaf.entries[0];
            if depth >= MAX_DEPTH || (first.x == entry.x && first.y == entry.y) {
                leaf.entries.push(entry);
                return;
            }
            // Split the leaf and push both points down a level.
            let existing = std::mem::take(&mut leaf.entries);
            let mut internal = Internal {
                children: Default::default(),
                value: 0.0,
                x: 0.0,
                y: 0.0,
            };
            for e in existing {
                insert_child(&mut internal, e, x0, y0, x1, y1, depth);
            }
            insert_child(&mut internal, entry, x0, y0, x1, y1, depth);
            **cell = Cell::Internal(internal);
        }
        Cell::Internal(internal) => {
            insert_child(internal, entry, x0, y0, x1, y1, depth);
        }
    }
}

fn insert_child(
    internal: &mut Internal,
    entry: Entry,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    depth: usize,
) {
    let xm = (x0 + x1) / 2.0;
    let ym = (y0 + y1) / 2.0;
    let right = entry.x >= xm;
    let bottom = entry.y >= ym;
    let quadrant = (right as usize) | ((bottom as usize) << 1);
    let (cx0, cx1) = if right { (xm, x1) } else { (x0, xm) };
    let (cy0, cy1) = if bottom { (ym, y1) } else { (y0, ym) };
    insert_into(
        &mut internal.children[quadrant],
        entry,
        cx0,
        cy0,
        cx1,
        cy1,
        depth + 1,
    );
}

fn accumulate_cell(cell: &mut Cell, strengths: &[f64]) {
    match cell {
        Cell::Leaf(leaf) => {
            leaf.value = leaf.entries.iter().map(|e| strengths[e.index]).sum();
        }
        Cell::Internal(internal) => {
            let mut value = 0.0;
            let mut weight = 0.0;
            let mut x = 0.0;
            let mut y = 0.0;
            for child in internal.children.iter_mut().flatten() {
                accumulate_cell(child, strengths);
                let v = child.value();
                let w = v.abs();
                if w > 0.0 {
                    value += v;
                    weight += w;
                    x += w * child.x();
                    y += w * child.y();
                }
            }
            internal.value = value;
            if weight > 0.0 {
                internal.x = x / weight;
                internal.y = y / weight;
            }
        }
    }
}

fn visit_cell<F>(cell: &Cell, x0: f64, y0: f64, x1: f64, y1: f64, visitor: &mut F)
where
    F: FnMut(&Cell, f64, f64, f64, f64) -> bool,
{
    if visitor(cell, x0, y0, x1, y1) {
        return;
    }
    if let Cell::Internal(internal) = cell {
        let xm = (x0 + x1) / 2.0;
        let ym = (y0 + y1) / 2.0;
        for (quadrant, child) in internal.children.iter().enumerate() {
            let Some(child) = child else { continue };
            let (cx0, cx1) = if quadrant & 1 == 1 { (xm, x1) } else { (x0, xm) };
            let (cy0, cy1) = if quadrant & 2 == 2 { (ym, y1) } else { (y0, ym) };
            visit_cell(child, cx0, cy0, cx1, cy1, visitor);
        }
    }
}
