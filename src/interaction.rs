//! Gesture state and viewport mutation helpers.
//!
//! The pure viewport operations here are used by the widget's input
//! handlers to implement consistent pan and zoom semantics across input
//! devices.

use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_8, SQRT_2};

use crate::geom::{CanvasPoint, Point};
use crate::state::ViewerState;
use crate::transform::{CanvasSize, Transform};

/// Identifier of an active pointer (a mouse or one touch contact).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Modifier keys accompanying an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputModifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub ctrl: bool,
    /// Alt key held.
    pub alt: bool,
}

impl InputModifiers {
    /// Whether any modifier key is held.
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt
    }
}

/// Wheel movement, either in discrete notches or pixel-granular steps.
///
/// Positive values follow the downward-scroll convention and zoom out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelDelta {
    /// Notched wheel movement in lines.
    Lines(f64),
    /// Trackpad-style movement in pixels.
    Pixels(f64),
}

/// The active gesture.
///
/// Exactly one gesture is active at a time. All gesture-scoped scratch data
/// lives in its variant, so stale values cannot leak from one gesture into
/// the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Gesture {
    /// No gesture in progress.
    Idle,
    /// Dragging the coordinate plane.
    Panning {
        pointer: PointerId,
        /// Logical coordinates under the pointer when the drag started.
        anchor: Point,
    },
    /// Two-pointer zoom.
    Zooming {
        first: PointerId,
        second: PointerId,
        /// Logical coordinates of the initial pointer center.
        center: Point,
        start_distance: f64,
        start_span_x: f64,
        start_span_y: f64,
        zoom_x: bool,
        zoom_y: bool,
    },
    /// Selecting or resizing an x axis segment.
    SegmentSelecting {
        pointer: PointerId,
        anchor_x: f64,
        end_x: f64,
    },
}

/// Recompute the viewport so `canvas_point` maps to `logical_anchor`,
/// keeping the spans (and thereby the zoom factors) unchanged.
pub(crate) fn pan(
    state: &mut ViewerState,
    canvas_point: CanvasPoint,
    logical_anchor: Point,
    size: CanvasSize,
) {
    let span_x = state.x_span();
    let span_y = state.y_span();
    let width = f64::from(size.width);
    let height = f64::from(size.height);
    state.x_min = logical_anchor.x - canvas_point.x * span_x / width;
    state.x_max = state.x_min + span_x;
    state.y_min = logical_anchor.y - (height - canvas_point.y) * span_y / height;
    state.y_max = state.y_min + span_y;
}

/// Zoom the viewport by `fx` / `fy` around `center` in canvas coordinates
/// (default: the surface midpoint). A factor above 1 zooms in.
pub(crate) fn zoom(
    state: &mut ViewerState,
    fx: f64,
    fy: f64,
    center: Option<CanvasPoint>,
    size: CanvasSize,
) {
    let center = center.unwrap_or_else(|| {
        CanvasPoint::new(f64::from(size.width) / 2.0, f64::from(size.height) / 2.0)
    });
    let anchor = Transform::new(state, size).canvas_to_logical(center);
    state.x_max = state.x_min + state.x_span() / fx;
    state.y_max = state.y_min + state.y_span() / fy;
    pan(state, center, anchor, size);
}

/// Zoom factor for one wheel event, or `None` for an empty delta.
///
/// Notched wheels zoom by a fixed factor of sqrt(2) per event; pixel
/// deltas from trackpads use a finer exponential curve that meets the
/// notch factor at a delta of 100 pixels.
pub(crate) fn wheel_zoom_factor(delta: WheelDelta) -> Option<f64> {
    let (direction, factor) = match delta {
        WheelDelta::Lines(d) => (d, SQRT_2),
        WheelDelta::Pixels(d) => (d, 2.0_f64.powf(d.abs() / 200.0)),
    };
    if direction == 0.0 {
        return None;
    }
    Some(if direction > 0.0 { 1.0 / factor } else { factor })
}

/// Zoom factors for a keyboard zoom command, or `None` for non-zoom keys.
pub(crate) fn key_zoom_factors(ch: char) -> Option<(f64, f64)> {
    match ch {
        '+' => Some((SQRT_2, SQRT_2)),
        '-' => Some((FRAC_1_SQRT_2, FRAC_1_SQRT_2)),
        'X' => Some((SQRT_2, 1.0)),
        'x' => Some((FRAC_1_SQRT_2, 1.0)),
        'Y' => Some((1.0, SQRT_2)),
        'y' => Some((1.0, FRAC_1_SQRT_2)),
        _ => None,
    }
}

/// Classify a two-pointer gesture as x-only, y-only or both-axes zoom.
///
/// The pointer separation is tested against a 22.5 degree cone around each
/// axis: a near-horizontal separation zooms x only, a near-vertical one y
/// only, anything in between zooms both.
pub(crate) fn classify_zoom_axes(p1: CanvasPoint, p2: CanvasPoint) -> (bool, bool) {
    let x_dist = (p1.x - p2.x).abs();
    let y_dist = (p1.y - p2.y).abs();
    let cone = FRAC_PI_8.tan();
    let zoom_x = x_dist > y_dist * cone;
    let zoom_y = y_dist > x_dist * cone;
    (zoom_x, zoom_y)
}
