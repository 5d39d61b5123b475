//! Arc geometry: map a sector and the current zoom scale to ring bounds.
//!
//! Pure per-frame math. Renderers call this on every animation tick with the
//! scale derived from the current view; nothing here touches packing or pie
//! state.

use serde::Serialize;

use crate::domain::pie::SectorNode;

/// Ring bounds of one sector at a given zoom scale, ready for path drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ring {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

/// Compute a sector's ring at zoom scale `k`.
///
/// The outer radius is the node radius scaled to screen space; the inner
/// radius sits `ring_thickness` inside it, clamped at zero for nodes smaller
/// than the ring is thick.
pub fn ring(sector: &SectorNode, k: f64, ring_thickness: f64) -> Ring {
    let outer_radius = sector.r * k;
    Ring {
        inner_radius: (outer_radius - ring_thickness).max(0.0),
        outer_radius,
        start_angle: sector.start_angle,
        end_angle: sector.end_angle,
    }
}
