//! Pie augmentation: expand packed nodes into drawable sector nodes.
//!
//! Every packed node yields at least one sector. Declared sector weights are
//! rendered in declaration order (never re-sorted; consumers color by slice
//! index and rely on the ordering being caller-controlled). A node without
//! sectors yields a single full-circle sector.

use std::f64::consts::TAU;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::hierarchy::SectorSpec;
use crate::domain::pack::{NodeId, PackedTree};

/// One angular sector of a packed node's ring: the unit handed to renderers.
///
/// Geometry fields are copies of the owning node's; sector nodes are derived,
/// read-only projections recomputed whenever the packed snapshot changes.
#[derive(Debug, Clone, Serialize)]
pub struct SectorNode {
    /// Id of the owning node in the packed snapshot
    pub node: NodeId,
    pub name: String,
    /// 0-based position among this node's sectors
    pub slice: usize,
    /// Radians, `0 <= start < end <= 2π`
    pub start_angle: f64,
    pub end_angle: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub depth: usize,
    pub parent: Option<NodeId>,
}

/// Expand every node of a packed snapshot into its sectors, in preorder.
///
/// Sectors of one node are contiguous and in declaration order; the relative
/// order of different nodes carries no meaning.
#[instrument(skip(tree))]
pub fn augment(tree: &PackedTree) -> Vec<SectorNode> {
    let mut sectors = Vec::with_capacity(tree.len());
    for (id, node) in tree.iter() {
        let spans = match &node.sectors {
            None => vec![(0.0, TAU)],
            Some(SectorSpec::Weights(weights)) => proportional_spans(weights),
            Some(SectorSpec::Fraction(percent)) => {
                let split = percent / 100.0 * TAU;
                vec![(0.0, split), (split, TAU)]
            }
        };
        for (slice, (start_angle, end_angle)) in spans.into_iter().enumerate() {
            sectors.push(SectorNode {
                node: id,
                name: node.name.clone(),
                slice,
                start_angle,
                end_angle,
                x: node.circle.x,
                y: node.circle.y,
                r: node.circle.r,
                depth: node.depth,
                parent: node.parent,
            });
        }
    }
    debug!(nodes = tree.len(), sectors = sectors.len(), "pie augmentation complete");
    sectors
}

/// Angular spans proportional to the given weights, covering `[0, 2π)`.
///
/// Each span starts where the previous one ended; the last span ends at
/// exactly `2π` rather than at an accumulated sum, so rounding never leaves
/// a gap at the seam.
fn proportional_spans(weights: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = weights.iter().sum();
    let mut spans = Vec::with_capacity(weights.len());
    let mut acc = 0.0;
    let mut start = 0.0;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        let end = if i == weights.len() - 1 {
            TAU
        } else {
            acc / total * TAU
        };
        spans.push((start, end));
        start = end;
    }
    spans
}
