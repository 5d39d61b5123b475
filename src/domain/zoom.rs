//! Zoom/focus state machine and smooth camera interpolation.
//!
//! The camera is either idle on a focus node or transitioning between two
//! views. Transitions follow the smooth pan-and-zoom path of van Wijk & Nuij
//! ("Smooth and efficient zooming and panning", 2003): translation and scale
//! are blended so apparent on-screen velocity stays uniform, instead of
//! interpolating the three view parameters independently.
//!
//! Advancing is tick-driven: an external frame clock calls
//! [`Camera::advance`] with elapsed time and every tick recomputes the view
//! purely from `(from, to, elapsed)`. The terminal frame is taken verbatim
//! from the target view, so no floating-point drift accumulates.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::ChartConfig;
use crate::domain::error::{TransitionError, TransitionResult};
use crate::domain::pack::{NodeId, PackedNode, PackedTree};

const RHO: f64 = std::f64::consts::SQRT_2;
const EPSILON2: f64 = 1e-12;

/// Camera state: center of attention and the diameter of layout space mapped
/// onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ZoomView {
    pub cx: f64,
    pub cy: f64,
    pub diameter: f64,
}

impl ZoomView {
    pub fn new(cx: f64, cy: f64, diameter: f64) -> Self {
        Self { cx, cy, diameter }
    }

    /// The view framing `node`: its circle plus the configured margin.
    pub fn framing(node: &PackedNode, margin: f64) -> Self {
        Self {
            cx: node.circle.x,
            cy: node.circle.y,
            diameter: node.circle.r * 2.0 + margin,
        }
    }

    /// Zoom scale for a chart of the given diameter.
    pub fn scale(&self, chart_diameter: f64) -> f64 {
        chart_diameter / self.diameter
    }

    /// Project a layout-space point into screen space relative to the chart
    /// center.
    pub fn project(&self, x: f64, y: f64, chart_diameter: f64) -> (f64, f64) {
        let k = self.scale(chart_diameter);
        ((x - self.cx) * k, (y - self.cy) * k)
    }
}

/// Smooth-zoom interpolation between two views at normalized `t` in `[0, 1]`.
///
/// Degenerates to pure exponential scaling when the two centers coincide.
pub fn interpolate_zoom(from: &ZoomView, to: &ZoomView, t: f64) -> ZoomView {
    let dx = to.cx - from.cx;
    let dy = to.cy - from.cy;
    let d2 = dx * dx + dy * dy;
    let w0 = from.diameter;
    let w1 = to.diameter;

    if d2 < EPSILON2 {
        let s = t * (w1 / w0).ln() / RHO;
        return ZoomView {
            cx: from.cx + t * dx,
            cy: from.cy + t * dy,
            diameter: w0 * (RHO * s).exp(),
        };
    }

    let d1 = d2.sqrt();
    let rho2 = RHO * RHO;
    let rho4 = rho2 * rho2;
    let b0 = (w1 * w1 - w0 * w0 + rho4 * d2) / (2.0 * w0 * rho2 * d1);
    let b1 = (w1 * w1 - w0 * w0 - rho4 * d2) / (2.0 * w1 * rho2 * d1);
    let r0 = ((b0 * b0 + 1.0).sqrt() - b0).ln();
    let r1 = ((b1 * b1 + 1.0).sqrt() - b1).ln();
    let s = t * (r1 - r0) / RHO;

    let u = w0 / (rho2 * d1) * (r0.cosh() * (RHO * s + r0).tanh() - r0.sinh());
    ZoomView {
        cx: from.cx + u * dx,
        cy: from.cy + u * dy,
        diameter: w0 * r0.cosh() / (RHO * s + r0).cosh(),
    }
}

/// Symmetric cubic easing, the curve the camera rides along the zoom path.
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) * 2.0;
    if t <= 1.0 {
        t * t * t / 2.0
    } else {
        let t = t - 2.0;
        (t * t * t + 2.0) / 2.0
    }
}

/// Duration preset for a focus change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionSpeed {
    #[default]
    Normal,
    /// Inspection mode, an order of magnitude slower; interactive renderers
    /// typically bind this to a modifier key.
    Slow,
}

/// Display decision for one node's label on the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelState {
    /// Whether the label element should be present at all
    pub displayed: bool,
    /// Fill opacity in `[0, 1]`
    pub opacity: f64,
}

impl LabelState {
    const HIDDEN: LabelState = LabelState {
        displayed: false,
        opacity: 0.0,
    };
    const SHOWN: LabelState = LabelState {
        displayed: true,
        opacity: 1.0,
    };
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Idle,
    Transitioning {
        from: ZoomView,
        to: ZoomView,
        /// Focus before the transition started; labels visible under it stay
        /// displayed (fading) until the transition completes.
        prev_focus: NodeId,
        elapsed: f64,
        duration: f64,
    },
}

/// The zoom/focus state machine.
///
/// Owns the full camera state explicitly; the packed tree it navigates is an
/// immutable snapshot. Replacing the tree means building a new camera, and an
/// in-flight transition on the old snapshot should be [`Camera::cancel`]ed
/// first, which snaps to its target view rather than leaving a partial
/// interpolation.
#[derive(Debug)]
pub struct Camera {
    focus: NodeId,
    root: NodeId,
    view: ZoomView,
    phase: Phase,
    margin: f64,
    duration_normal: f64,
    duration_slow: f64,
}

impl Camera {
    /// A camera idle on the root, framing the whole chart.
    pub fn new(tree: &PackedTree, config: &ChartConfig) -> Self {
        let root = tree.root();
        Self {
            focus: root,
            root,
            view: ZoomView::framing(tree.node(root), config.margin),
            phase: Phase::Idle,
            margin: config.margin,
            duration_normal: config.transition_duration_normal,
            duration_slow: config.transition_duration_slow,
        }
    }

    pub fn focus(&self) -> NodeId {
        self.focus
    }

    pub fn view(&self) -> ZoomView {
        self.view
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }

    /// Begin a transition to `target`.
    ///
    /// Only available while idle: a call during an in-flight transition is
    /// rejected with [`TransitionError::TransitionInFlight`], never queued,
    /// since overlapping camera paths would race. Selecting the current
    /// focus is a no-op. The target must belong to the packed tree this
    /// camera navigates.
    #[instrument(skip(self, tree))]
    pub fn select_focus(
        &mut self,
        tree: &PackedTree,
        target: NodeId,
        speed: TransitionSpeed,
    ) -> TransitionResult<()> {
        if self.is_transitioning() {
            return Err(TransitionError::TransitionInFlight);
        }
        if !tree.contains(target) {
            return Err(TransitionError::UnknownNode(target));
        }
        if target == self.focus {
            return Ok(());
        }

        let duration = match speed {
            TransitionSpeed::Normal => self.duration_normal,
            TransitionSpeed::Slow => self.duration_slow,
        };
        let to = ZoomView::framing(tree.node(target), self.margin);
        debug!(%target, ?to, duration, "zoom transition started");
        self.phase = Phase::Transitioning {
            from: self.view,
            to,
            prev_focus: self.focus,
            elapsed: 0.0,
            duration,
        };
        self.focus = target;
        Ok(())
    }

    /// Advance the camera by `dt` time units and return the current view.
    ///
    /// Idle cameras return their steady view. A transition that reaches its
    /// duration lands exactly on the target view and goes idle.
    pub fn advance(&mut self, dt: f64) -> ZoomView {
        if let Phase::Transitioning {
            from,
            to,
            prev_focus,
            elapsed,
            duration,
        } = self.phase
        {
            let elapsed = elapsed + dt;
            if elapsed >= duration {
                self.view = to;
                self.phase = Phase::Idle;
                debug!(focus = %self.focus, "zoom transition complete");
            } else {
                let t = ease_cubic_in_out(elapsed / duration);
                self.view = interpolate_zoom(&from, &to, t);
                self.phase = Phase::Transitioning {
                    from,
                    to,
                    prev_focus,
                    elapsed,
                    duration,
                };
            }
        }
        self.view
    }

    /// Cancel an in-flight transition, snapping to its target view.
    ///
    /// Call before replacing the packed snapshot so the next camera does not
    /// inherit a half-interpolated view. Idle cameras are unaffected.
    pub fn cancel(&mut self) -> ZoomView {
        if let Phase::Transitioning { to, .. } = self.phase {
            debug!(focus = %self.focus, "zoom transition cancelled");
            self.view = to;
            self.phase = Phase::Idle;
        }
        self.view
    }

    /// Return the camera to the root focus, as a background click does.
    pub fn select_root(&mut self, tree: &PackedTree, speed: TransitionSpeed) -> TransitionResult<()> {
        self.select_focus(tree, self.root, speed)
    }

    /// Label display decision for `node` on the current frame.
    ///
    /// Steady state: a label is shown iff its parent IS the focus (id
    /// comparison; no structural inspection). During a transition, labels
    /// visible under either the previous or the new focus stay displayed,
    /// with opacity eased toward the steady-state rule.
    pub fn label_state(&self, node: &PackedNode) -> LabelState {
        let under = |focus: NodeId| node.parent == Some(focus);
        match self.phase {
            Phase::Idle => {
                if under(self.focus) {
                    LabelState::SHOWN
                } else {
                    LabelState::HIDDEN
                }
            }
            Phase::Transitioning {
                prev_focus,
                elapsed,
                duration,
                ..
            } => {
                let was = under(prev_focus);
                let will = under(self.focus);
                if !was && !will {
                    return LabelState::HIDDEN;
                }
                let t = ease_cubic_in_out(elapsed / duration);
                let start = if was { 1.0 } else { 0.0 };
                let target = if will { 1.0 } else { 0.0 };
                LabelState {
                    displayed: true,
                    opacity: start + (target - start) * t,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_identical_centers_when_interpolated_then_diameter_scales_smoothly() {
        let from = ZoomView::new(0.0, 0.0, 100.0);
        let to = ZoomView::new(0.0, 0.0, 400.0);
        let mid = interpolate_zoom(&from, &to, 0.5);
        assert_eq!(mid.cx, 0.0);
        assert_eq!(mid.cy, 0.0);
        // Geometric, not arithmetic, midpoint: uniform apparent velocity.
        assert!((mid.diameter - 200.0).abs() < 1e-9);
    }

    #[test]
    fn given_distinct_views_when_interpolated_then_endpoints_match() {
        let from = ZoomView::new(0.0, 0.0, 820.0);
        let to = ZoomView::new(120.0, -40.0, 90.0);
        let start = interpolate_zoom(&from, &to, 0.0);
        let end = interpolate_zoom(&from, &to, 1.0);
        assert!((start.cx - from.cx).abs() < 1e-9);
        assert!((start.cy - from.cy).abs() < 1e-9);
        assert!((start.diameter - from.diameter).abs() < 1e-9);
        assert!((end.cx - to.cx).abs() < 1e-6);
        assert!((end.cy - to.cy).abs() < 1e-6);
        assert!((end.diameter - to.diameter).abs() < 1e-6);
    }

    #[test]
    fn given_ease_curve_then_symmetric_and_clamped() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert_eq!(ease_cubic_in_out(0.5), 0.5);
        assert_eq!(ease_cubic_in_out(-1.0), 0.0);
        assert_eq!(ease_cubic_in_out(2.0), 1.0);
        let a = ease_cubic_in_out(0.25);
        let b = ease_cubic_in_out(0.75);
        assert!((a + b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn given_view_when_projected_then_matches_scale_formula() {
        let view = ZoomView::new(10.0, 20.0, 200.0);
        let k = view.scale(800.0);
        assert_eq!(k, 4.0);
        let (sx, sy) = view.project(15.0, 20.0, 800.0);
        assert_eq!(sx, 20.0);
        assert_eq!(sy, 0.0);
    }
}
