//! Hierarchical circle packing: weighted tree in, nested circles out.
//!
//! Radii are area-proportional (`r ∝ sqrt(weight)`) per sibling group,
//! siblings are placed with the front chain in `geometry`, and each level is
//! normalized to fit its parent's circle inset by the configured padding.
//! The result is an immutable flat snapshot; a new input hierarchy produces a
//! whole new snapshot instead of mutating this one.

use std::fmt;

use generational_arena::Index;
use itertools::Itertools;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::ChartConfig;
use crate::domain::error::{LayoutError, LayoutResult};
use crate::domain::geometry::{pack_siblings, Circle};
use crate::domain::hierarchy::{Hierarchy, SectorSpec};

/// Radius assigned to a zero-weight node in sibling-local units, so padding
/// math never sees a zero-area circle.
const MIN_RADIUS: f64 = 1e-6;

/// Identifier of a node within one packed snapshot (its preorder position).
/// Focus bookkeeping compares these ids, never node contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Structural role of a packed node, mirrored by renderers as styling classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    Interior,
    Leaf,
}

/// One node of the packed snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct PackedNode {
    pub name: String,
    pub weight: f64,
    pub depth: usize,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub circle: Circle,
    pub kind: NodeKind,
    pub sectors: Option<SectorSpec>,
}

/// Packed layout snapshot: a flat preorder node table.
///
/// Treated as immutable by everything downstream; replaced wholesale when the
/// source hierarchy changes.
#[derive(Debug, Serialize)]
pub struct PackedTree {
    nodes: Vec<PackedNode>,
    root: NodeId,
}

impl PackedTree {
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Borrow a node by id. Panics on an id from another snapshot that is out
    /// of range; use [`PackedTree::get`] when the id's origin is uncertain.
    pub fn node(&self, id: NodeId) -> &PackedNode {
        &self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&PackedNode> {
        self.nodes.get(id.0)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Preorder iteration over `(id, node)`.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &PackedNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Number of levels, for external color-scale domains.
    pub fn depth_count(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().map_or(0, |d| d + 1)
    }

    /// First preorder node with the given name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }
}

/// Intermediate per-subtree layout, merged into the flat table afterwards.
struct LayoutNode {
    source: Index,
    circle: Circle,
    depth: usize,
    children: Vec<LayoutNode>,
}

/// Pack a validated hierarchy into nested circles.
///
/// The root circle is centered on the chart's logical origin with radius
/// `diameter / 2`. Fails without producing geometry when the tree carries no
/// weight at all.
#[instrument(skip(hierarchy, config), fields(nodes = hierarchy.len()))]
pub fn pack(hierarchy: &Hierarchy, config: &ChartConfig) -> LayoutResult<PackedTree> {
    if hierarchy.total_weight() <= 0.0 {
        return Err(LayoutError::DegenerateLayout(
            "hierarchy has zero total weight".into(),
        ));
    }
    if !(config.diameter.is_finite() && config.diameter > 0.0) {
        return Err(LayoutError::DegenerateLayout(format!(
            "chart diameter must be positive, got {}",
            config.diameter
        )));
    }

    let root_circle = Circle::new(0.0, 0.0, config.diameter / 2.0);
    let layout = layout_subtree(hierarchy, hierarchy.root(), root_circle, 0, config.padding);

    let mut nodes = Vec::with_capacity(hierarchy.len());
    flatten(hierarchy, layout, None, &mut nodes);
    debug!(nodes = nodes.len(), "pack complete");
    Ok(PackedTree {
        nodes,
        root: NodeId(0),
    })
}

fn layout_subtree(
    hierarchy: &Hierarchy,
    index: Index,
    circle: Circle,
    depth: usize,
    padding: f64,
) -> LayoutNode {
    let node = hierarchy.node(index);
    if node.children.is_empty() {
        return LayoutNode {
            source: index,
            circle,
            depth,
            children: Vec::new(),
        };
    }

    let placed = place_children(hierarchy, &node.children, &circle, padding);

    // Sibling subtrees share no mutable state once their circles are fixed,
    // so recursion can fan out; collect keeps child order.
    let children: Vec<LayoutNode> = placed
        .into_par_iter()
        .map(|(child, child_circle)| {
            layout_subtree(hierarchy, child, child_circle, depth + 1, padding)
        })
        .collect();

    LayoutNode {
        source: index,
        circle,
        depth,
        children,
    }
}

/// Compute the circles of a sibling group inside `parent`.
///
/// Unit radii come from the square root of each child's effective weight;
/// the packed arrangement is then scaled so its enclosing circle fits the
/// parent radius minus the padding inset. A second pass re-packs with the
/// inter-sibling padding expressed in unit space, so tangent siblings end up
/// separated by approximately `padding` in final units.
fn place_children(
    hierarchy: &Hierarchy,
    children: &[Index],
    parent: &Circle,
    padding: f64,
) -> Vec<(Index, Circle)> {
    let inset = padding.min(parent.r * 0.5);
    let available = parent.r - inset;

    let unit_radii: Vec<f64> = children
        .iter()
        .map(|&c| {
            let r = hierarchy.node(c).effective_weight.sqrt();
            if r > 0.0 {
                r
            } else {
                MIN_RADIUS
            }
        })
        .collect();

    // Largest first, original order on ties; reproducible packs depend on
    // this ordering being total.
    let order: Vec<usize> = (0..children.len())
        .sorted_by(|&a, &b| unit_radii[b].total_cmp(&unit_radii[a]).then(a.cmp(&b)))
        .collect();

    let mut circles: Vec<Circle> = order
        .iter()
        .map(|&i| Circle::new(0.0, 0.0, unit_radii[i]))
        .collect();
    let enclosing = pack_siblings(&mut circles);
    let mut scale = available / enclosing;

    if padding > 0.0 && children.len() > 1 {
        let pad_unit = padding / scale / 2.0;
        for c in circles.iter_mut() {
            c.r += pad_unit;
        }
        let enclosing = pack_siblings(&mut circles);
        for c in circles.iter_mut() {
            c.r -= pad_unit;
        }
        scale = available / enclosing;
    }

    let mut slot_of = vec![0usize; children.len()];
    for (slot, &i) in order.iter().enumerate() {
        slot_of[i] = slot;
    }
    children
        .iter()
        .enumerate()
        .map(|(i, &child)| {
            let c = circles[slot_of[i]];
            (
                child,
                Circle::new(parent.x + c.x * scale, parent.y + c.y * scale, c.r * scale),
            )
        })
        .collect()
}

fn flatten(
    hierarchy: &Hierarchy,
    layout: LayoutNode,
    parent: Option<NodeId>,
    out: &mut Vec<PackedNode>,
) -> NodeId {
    let source = hierarchy.node(layout.source);
    let kind = if parent.is_none() {
        NodeKind::Root
    } else if layout.children.is_empty() {
        NodeKind::Leaf
    } else {
        NodeKind::Interior
    };

    let id = NodeId(out.len());
    out.push(PackedNode {
        name: source.name.clone(),
        weight: source.effective_weight,
        depth: layout.depth,
        parent,
        children: Vec::with_capacity(layout.children.len()),
        circle: layout.circle,
        kind,
        sectors: source.sectors.clone(),
    });

    let mut child_ids = Vec::with_capacity(layout.children.len());
    for child in layout.children {
        child_ids.push(flatten(hierarchy, child, Some(id), out));
    }
    out[id.0].children = child_ids;
    id
}
