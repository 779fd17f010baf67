//! The core curve viewer widget.
//!
//! [`CurveViewer`] owns the viewer state, the gesture state machine and the
//! repaint/notification bookkeeping. It is backend-agnostic: a render
//! backend feeds it pointer, wheel and key events, asks it to paint into a
//! [`RenderList`](crate::render::RenderList), and flushes queued change
//! notifications at a task boundary.

use crate::events::{EventListener, EventQueue, ListenerId, ViewerEvent};
use crate::geom::CanvasPoint;
use crate::interaction::{
    self, Gesture, InputModifiers, PointerId, WheelDelta, classify_zoom_axes, key_zoom_factors,
    wheel_zoom_factor,
};
use crate::plotter;
use crate::render::RenderList;
use crate::state::{ViewerState, ZoomMode};
use crate::style::Theme;
use crate::transform::{CanvasSize, Transform};

/// Widget-level configuration that is not part of the viewer state.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Side length of the resize-handle hot zone in the bottom-right
    /// corner; pointer events inside it are left to the host.
    pub resize_corner_px: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            resize_corner_px: 16.0,
        }
    }
}

/// Cursor feedback for the active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    /// No gesture: default cursor.
    Default,
    /// Dragging the plane.
    Move,
    /// Adjusting a segment selection.
    ResizeHorizontal,
}

/// The core curve viewer widget.
#[derive(Debug)]
pub struct CurveViewer {
    config: ViewerConfig,
    state: ViewerState,
    initial_state: ViewerState,
    gesture: Gesture,
    /// Currently pressed pointers; at most two take part in gestures.
    pointers: Vec<(PointerId, CanvasPoint)>,
    theme: Theme,
    events: EventQueue,
    size: CanvasSize,
    pending_size: Option<CanvasSize>,
    surface_origin: CanvasPoint,
    active: bool,
    disabled_override: bool,
    repaint_needed: bool,
}

impl CurveViewer {
    /// Create an inactive viewer with default configuration.
    ///
    /// The viewer accepts no input and requests no repaints until
    /// [`set_active`](Self::set_active) connects it.
    pub fn new() -> Self {
        Self::with_config(ViewerConfig::default())
    }

    /// Create an inactive viewer with the given configuration.
    pub fn with_config(config: ViewerConfig) -> Self {
        Self {
            config,
            state: ViewerState::default(),
            initial_state: ViewerState::default(),
            gesture: Gesture::Idle,
            pointers: Vec::new(),
            theme: Theme::default(),
            events: EventQueue::default(),
            size: CanvasSize::new(200, 200),
            pending_size: None,
            surface_origin: CanvasPoint::new(0.0, 0.0),
            active: false,
            disabled_override: false,
            repaint_needed: false,
        }
    }

    /// Connect or disconnect the viewer.
    ///
    /// Connecting requests an immediate repaint; disconnecting aborts any
    /// gesture in progress and drops pending repaint work.
    pub fn set_active(&mut self, active: bool) {
        if self.active == active {
            return;
        }
        self.active = active;
        if active {
            self.request_repaint();
        } else {
            self.gesture = Gesture::Idle;
            self.pointers.clear();
            self.repaint_needed = false;
        }
    }

    /// Whether the viewer is connected.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Replace the theme, for example when the host appearance changes.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.request_repaint();
    }

    /// Access the current theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// A defensive copy of the current viewer state.
    pub fn viewer_state(&self) -> ViewerState {
        self.state.clone()
    }

    /// Replace the current state and the reset snapshot.
    pub fn set_viewer_state(&mut self, state: ViewerState) {
        self.state = state.clone();
        self.initial_state = state;
        self.request_repaint();
    }

    /// Restore the state captured at the last
    /// [`set_viewer_state`](Self::set_viewer_state) call and abort any
    /// gesture in progress.
    pub fn reset(&mut self) {
        let segment_changed = self.state.segment_selected != self.initial_state.segment_selected
            || self.state.segment_start != self.initial_state.segment_start
            || self.state.segment_end != self.initial_state.segment_end;
        self.state = self.initial_state.clone();
        self.gesture = Gesture::Idle;
        self.events.enqueue(ViewerEvent::ViewportChanged);
        if segment_changed {
            self.events.enqueue(ViewerEvent::SegmentChanged);
        }
        self.request_repaint();
    }

    /// Set the externally controlled disabled flag.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled_override == disabled {
            return;
        }
        self.disabled_override = disabled;
        self.gesture = Gesture::Idle;
        self.request_repaint();
    }

    /// Whether the widget is disabled, either externally or because the
    /// state provides nothing to draw.
    pub fn is_disabled(&self) -> bool {
        self.disabled_override || !self.state.has_content()
    }

    /// Current pixel buffer size.
    pub fn canvas_size(&self) -> CanvasSize {
        self.size
    }

    /// Announce a new surface layout. The pixel buffer resize is deferred
    /// to the next paint.
    pub fn notify_resized(&mut self, width: u32, height: u32) {
        let size = CanvasSize::new(width, height);
        if size == self.size {
            self.pending_size = None;
            return;
        }
        self.pending_size = Some(size);
        self.request_repaint();
    }

    /// Announce the surface's on-screen origin together with its layout
    /// size, for input-coordinate correction.
    pub fn notify_layout(&mut self, origin: CanvasPoint, width: u32, height: u32) {
        self.surface_origin = origin;
        self.notify_resized(width, height);
    }

    /// Map a raw input-device position to canvas buffer coordinates.
    ///
    /// While a resize is pending the on-screen size differs from the buffer
    /// size, and this correction keeps hit positions accurate.
    pub fn client_to_canvas(&self, client: CanvasPoint) -> CanvasPoint {
        let css = self.pending_size.unwrap_or(self.size);
        Transform::new(&self.state, self.size).client_to_canvas(
            client,
            self.surface_origin,
            f64::from(css.width),
            f64::from(css.height),
        )
    }

    /// Whether a repaint has been requested since the last paint.
    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::replace(&mut self.repaint_needed, false)
    }

    fn request_repaint(&mut self) {
        if self.active {
            self.repaint_needed = true;
        }
    }

    /// Paint the current state into a render list.
    ///
    /// Applies any pending resize first and clears the repaint request.
    pub fn paint(&mut self) -> RenderList {
        if let Some(size) = self.pending_size.take() {
            self.size = size;
        }
        self.repaint_needed = false;
        let provisional = match self.gesture {
            Gesture::SegmentSelecting {
                anchor_x, end_x, ..
            } => Some((anchor_x, end_x)),
            _ => None,
        };
        plotter::paint(
            &self.state,
            provisional,
            &self.theme,
            self.size,
            self.is_disabled(),
        )
    }

    /// Cursor feedback for the active gesture.
    pub fn cursor_hint(&self) -> CursorHint {
        match self.gesture {
            Gesture::Panning { .. } | Gesture::Zooming { .. } => CursorHint::Move,
            Gesture::SegmentSelecting { .. } => CursorHint::ResizeHorizontal,
            Gesture::Idle => CursorHint::Default,
        }
    }

    // --- Input handling ---------------------------------------------------

    /// Handle a pressed pointer. Returns whether the event was consumed.
    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        position: CanvasPoint,
        modifiers: InputModifiers,
    ) -> bool {
        if !self.active || self.is_disabled() || self.in_resize_corner(position) {
            return false;
        }
        if let Some(entry) = self.pointers.iter_mut().find(|(id, _)| *id == pointer) {
            entry.1 = position;
        } else {
            if self.pointers.len() >= 2 {
                // A third contact never joins a gesture.
                return false;
            }
            self.pointers.push((pointer, position));
        }
        match self.pointers.len() {
            1 => {
                self.finish_gesture();
                if modifiers.any() {
                    self.begin_segment_selection(pointer, position, modifiers);
                } else {
                    if self.state.segment_selected {
                        self.state.segment_selected = false;
                        self.events.enqueue(ViewerEvent::SegmentChanged);
                    }
                    let anchor = self.transform().canvas_to_logical(position);
                    self.gesture = Gesture::Panning { pointer, anchor };
                }
                self.request_repaint();
                true
            }
            2 => {
                self.finish_gesture();
                self.begin_zoom();
                self.request_repaint();
                true
            }
            _ => false,
        }
    }

    /// Handle a pointer movement. Returns whether the event was consumed.
    pub fn pointer_move(&mut self, pointer: PointerId, position: CanvasPoint) -> bool {
        if !self.active || self.is_disabled() {
            return false;
        }
        let Some(entry) = self.pointers.iter_mut().find(|(id, _)| *id == pointer) else {
            return false;
        };
        entry.1 = position;
        match self.gesture {
            Gesture::Panning {
                pointer: active,
                anchor,
            } if active == pointer => {
                interaction::pan(&mut self.state, position, anchor, self.size);
                self.events.enqueue(ViewerEvent::ViewportChanged);
                self.request_repaint();
                true
            }
            Gesture::SegmentSelecting {
                pointer: active,
                anchor_x,
                ..
            } if active == pointer => {
                let end_x = self.transform().canvas_to_logical_x(position.x);
                self.gesture = Gesture::SegmentSelecting {
                    pointer: active,
                    anchor_x,
                    end_x,
                };
                self.request_repaint();
                true
            }
            Gesture::Zooming {
                first,
                second,
                center,
                start_distance,
                start_span_x,
                start_span_y,
                zoom_x,
                zoom_y,
            } if first == pointer || second == pointer => {
                let (Some(p1), Some(p2)) = (self.pointer_position(first), self.pointer_position(second))
                else {
                    return false;
                };
                let distance = p1.distance(p2);
                if start_distance <= 0.0 || distance <= 0.0 {
                    return true;
                }
                let factor = distance / start_distance;
                if zoom_x {
                    self.state.x_max = self.state.x_min + start_span_x / factor;
                }
                if zoom_y {
                    self.state.y_max = self.state.y_min + start_span_y / factor;
                }
                interaction::pan(&mut self.state, p1.midpoint(p2), center, self.size);
                self.events.enqueue(ViewerEvent::ViewportChanged);
                self.request_repaint();
                true
            }
            _ => false,
        }
    }

    /// Handle a released pointer. Returns whether the event was consumed.
    pub fn pointer_up(&mut self, pointer: PointerId) -> bool {
        let was_tracked = self.untrack_pointer(pointer);
        if !was_tracked {
            return false;
        }
        match self.gesture {
            Gesture::Panning {
                pointer: active, ..
            } if active == pointer => {
                self.gesture = Gesture::Idle;
                self.request_repaint();
                true
            }
            Gesture::SegmentSelecting {
                pointer: active,
                anchor_x,
                end_x,
            } if active == pointer => {
                self.commit_segment(anchor_x, end_x);
                self.gesture = Gesture::Idle;
                self.request_repaint();
                true
            }
            Gesture::Zooming { first, second, .. } if first == pointer || second == pointer => {
                let survivor = if first == pointer { second } else { first };
                self.gesture = match self.pointer_position(survivor) {
                    Some(position) => Gesture::Panning {
                        pointer: survivor,
                        anchor: self.transform().canvas_to_logical(position),
                    },
                    None => Gesture::Idle,
                };
                self.request_repaint();
                true
            }
            _ => false,
        }
    }

    /// Handle a cancelled pointer. The gesture is aborted; a provisional
    /// segment selection is discarded without touching the committed state.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> bool {
        let was_tracked = self.untrack_pointer(pointer);
        let involved = match self.gesture {
            Gesture::Panning {
                pointer: active, ..
            }
            | Gesture::SegmentSelecting {
                pointer: active, ..
            } => active == pointer,
            Gesture::Zooming { first, second, .. } => first == pointer || second == pointer,
            Gesture::Idle => false,
        };
        if involved {
            self.gesture = Gesture::Idle;
            self.request_repaint();
        }
        was_tracked || involved
    }

    /// Handle a wheel event. Returns whether the event was consumed.
    pub fn wheel(
        &mut self,
        position: CanvasPoint,
        delta: WheelDelta,
        modifiers: InputModifiers,
        focused: bool,
    ) -> bool {
        if !self.active || self.is_disabled() {
            return false;
        }
        if self.state.focus_shield && !focused {
            return false;
        }
        let Some(factor) = wheel_zoom_factor(delta) else {
            return false;
        };
        let mode = if modifiers.shift {
            ZoomMode::Y
        } else if modifiers.alt {
            ZoomMode::X
        } else if modifiers.ctrl {
            ZoomMode::Both
        } else {
            self.state.primary_zoom_mode
        };
        let (fx, fy) = match mode {
            ZoomMode::X => (factor, 1.0),
            ZoomMode::Y => (1.0, factor),
            ZoomMode::Both => (factor, factor),
        };
        interaction::zoom(&mut self.state, fx, fy, Some(position), self.size);
        self.events.enqueue(ViewerEvent::ViewportChanged);
        self.request_repaint();
        true
    }

    /// Handle a character key press. Returns whether the key was consumed.
    pub fn key_press(&mut self, ch: char) -> bool {
        if !self.active || self.is_disabled() {
            return false;
        }
        if let Some((fx, fy)) = key_zoom_factors(ch) {
            interaction::zoom(&mut self.state, fx, fy, None, self.size);
            self.events.enqueue(ViewerEvent::ViewportChanged);
            self.request_repaint();
            return true;
        }
        match ch {
            'g' => {
                self.state.grid_enabled = !self.state.grid_enabled;
                self.request_repaint();
                true
            }
            'r' => {
                self.reset();
                true
            }
            _ => false,
        }
    }

    // --- Events -----------------------------------------------------------

    /// Register a listener for one event kind.
    pub fn add_listener(&mut self, event: ViewerEvent, listener: EventListener) -> ListenerId {
        self.events.add_listener(event, listener)
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.events.remove_listener(id)
    }

    /// Whether notifications are waiting to be flushed.
    pub fn has_pending_notifications(&self) -> bool {
        self.events.has_pending()
    }

    /// Take the queued events together with snapshots of their listeners.
    ///
    /// The caller invokes the listeners outside of any lock it holds on the
    /// viewer, at a task boundary after the triggering call has returned.
    pub fn take_pending_notifications(&mut self) -> Vec<(ViewerEvent, Vec<EventListener>)> {
        self.events
            .take_pending()
            .into_iter()
            .map(|event| (event, self.events.listeners_for(event)))
            .collect()
    }

    // --- Help text --------------------------------------------------------

    /// Interaction help as ordered (action, description) pairs, reflecting
    /// the configured primary zoom axis.
    pub fn help_entries(&self) -> Vec<(&'static str, String)> {
        let primary_zoom_axis = match self.state.primary_zoom_mode {
            ZoomMode::X => "x-axis",
            ZoomMode::Y => "y-axis",
            ZoomMode::Both => "both axes",
        };
        vec![
            (
                "drag plane with mouse or touch",
                "move the coordinate space".into(),
            ),
            ("mouse wheel", format!("zoom {primary_zoom_axis}")),
            ("shift + mouse wheel", "zoom y-axis".into()),
            ("ctrl + mouse wheel", "zoom both axes".into()),
            ("alt + mouse wheel", "zoom x-axis".into()),
            ("touch zoom gesture", "zoom x, y or both axes".into()),
            ("shift + drag", "select an x-axis segment".into()),
            (
                "ctrl/alt + drag",
                "extend the nearer end of the segment selection".into(),
            ),
            ("+ / -", "zoom both axes in/out".into()),
            ("X / x", "zoom x-axis in/out".into()),
            ("Y / y", "zoom y-axis in/out".into()),
            ("g", "toggle coordinate grid".into()),
            ("r", "reset to the initial state".into()),
        ]
    }

    /// Interaction help as an HTML table.
    pub fn formatted_help_text(&self) -> String {
        let mut a = String::new();
        a.push_str("<table class='curveViewerHelp'>");
        a.push_str("<colgroup>");
        a.push_str("<col class='curveViewerHelpCol1'>");
        a.push_str("<col class='curveViewerHelpCol2'>");
        a.push_str("</colgroup>");
        a.push_str("<tbody>");
        for (action, description) in self.help_entries() {
            a.push_str("<tr><td>");
            a.push_str(action);
            a.push_str("</td><td>");
            a.push_str(&description);
            a.push_str("</td></tr>");
        }
        a.push_str("</tbody>");
        a.push_str("</table>");
        a
    }

    // --- Internals --------------------------------------------------------

    fn transform(&self) -> Transform {
        Transform::new(&self.state, self.size)
    }

    fn in_resize_corner(&self, position: CanvasPoint) -> bool {
        let corner = self.config.resize_corner_px;
        position.x >= f64::from(self.size.width) - corner
            && position.y >= f64::from(self.size.height) - corner
    }

    fn pointer_position(&self, pointer: PointerId) -> Option<CanvasPoint> {
        self.pointers
            .iter()
            .find(|(id, _)| *id == pointer)
            .map(|(_, position)| *position)
    }

    fn untrack_pointer(&mut self, pointer: PointerId) -> bool {
        let before = self.pointers.len();
        self.pointers.retain(|(id, _)| *id != pointer);
        self.pointers.len() != before
    }

    /// Force a clean exit from the current gesture before a new one starts.
    /// An in-progress segment selection is committed.
    fn finish_gesture(&mut self) {
        if let Gesture::SegmentSelecting {
            anchor_x, end_x, ..
        } = self.gesture
        {
            self.commit_segment(anchor_x, end_x);
        }
        self.gesture = Gesture::Idle;
    }

    fn begin_segment_selection(
        &mut self,
        pointer: PointerId,
        position: CanvasPoint,
        modifiers: InputModifiers,
    ) {
        let lx = self.transform().canvas_to_logical_x(position.x);
        let anchor_x = if !modifiers.shift
            && (modifiers.ctrl || modifiers.alt)
            && self.state.segment_selected
        {
            // Resize from the nearer end; the far end stays anchored.
            let to_start = (lx - self.state.segment_start).abs();
            let to_end = (lx - self.state.segment_end).abs();
            if to_start <= to_end {
                self.state.segment_end
            } else {
                self.state.segment_start
            }
        } else {
            lx
        };
        self.gesture = Gesture::SegmentSelecting {
            pointer,
            anchor_x,
            end_x: lx,
        };
    }

    fn begin_zoom(&mut self) {
        let (first, p1) = self.pointers[0];
        let (second, p2) = self.pointers[1];
        let (zoom_x, zoom_y) = classify_zoom_axes(p1, p2);
        self.gesture = Gesture::Zooming {
            first,
            second,
            center: self.transform().canvas_to_logical(p1.midpoint(p2)),
            start_distance: p1.distance(p2),
            start_span_x: self.state.x_span(),
            start_span_y: self.state.y_span(),
            zoom_x,
            zoom_y,
        };
    }

    fn commit_segment(&mut self, anchor_x: f64, end_x: f64) {
        let start = anchor_x.min(end_x);
        let end = anchor_x.max(end_x);
        self.state.segment_start = start;
        self.state.segment_end = end;
        self.state.segment_selected = end > start;
        self.events.enqueue(ViewerEvent::SegmentChanged);
    }
}

impl Default for CurveViewer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Sample;
    use std::f64::consts::SQRT_2;
    use std::sync::Arc;

    fn test_viewer() -> CurveViewer {
        let mut viewer = CurveViewer::new();
        viewer.set_active(true);
        viewer.set_viewer_state(ViewerState {
            viewer_function: Some(Arc::new(|x, _, _| Some(Sample::Value(x.sin())))),
            x_min: -20.0,
            x_max: 20.0,
            y_min: -1.2,
            y_max: 1.2,
            ..ViewerState::default()
        });
        viewer.notify_resized(800, 500);
        let _ = viewer.paint();
        viewer
    }

    fn drag_to_x(viewer: &CurveViewer, lx: f64) -> CanvasPoint {
        let cx = Transform::new(&viewer.state, viewer.size).logical_to_canvas_x(lx);
        CanvasPoint::new(cx, 250.0)
    }

    const P1: PointerId = PointerId(1);
    const P2: PointerId = PointerId(2);

    #[test]
    fn plus_key_zooms_both_axes_around_the_center() {
        let mut viewer = test_viewer();
        let center = CanvasPoint::new(400.0, 250.0);
        let before = Transform::new(&viewer.state, viewer.size).canvas_to_logical(center);
        assert!(viewer.key_press('+'));
        let state = viewer.viewer_state();
        assert!((state.x_span() - 40.0 / SQRT_2).abs() < 1e-9);
        assert!((state.y_span() - 2.4 / SQRT_2).abs() < 1e-9);
        let after = Transform::new(&state, viewer.size).logical_to_canvas(before);
        assert!((after.x - center.x).abs() < 1e-9);
        assert!((after.y - center.y).abs() < 1e-9);
    }

    #[test]
    fn wheel_with_primary_mode_x_scales_only_the_x_span() {
        let mut viewer = test_viewer();
        let mut state = viewer.viewer_state();
        state.primary_zoom_mode = ZoomMode::X;
        viewer.set_viewer_state(state);
        let position = CanvasPoint::new(400.0, 250.0);
        assert!(viewer.wheel(
            position,
            WheelDelta::Lines(1.0),
            InputModifiers::default(),
            true,
        ));
        let state = viewer.viewer_state();
        assert!((state.x_span() - 40.0 * SQRT_2).abs() < 1e-9);
        assert!((state.y_span() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn wheel_modifiers_override_the_primary_mode() {
        let mut viewer = test_viewer();
        let position = CanvasPoint::new(100.0, 100.0);
        let shift = InputModifiers {
            shift: true,
            ..InputModifiers::default()
        };
        assert!(viewer.wheel(position, WheelDelta::Lines(-1.0), shift, true));
        let state = viewer.viewer_state();
        assert!((state.x_span() - 40.0).abs() < 1e-9);
        assert!((state.y_span() - 2.4 / SQRT_2).abs() < 1e-9);
    }

    #[test]
    fn focus_shield_blocks_unfocused_wheel() {
        let mut viewer = test_viewer();
        let mut state = viewer.viewer_state();
        state.focus_shield = true;
        viewer.set_viewer_state(state);
        let position = CanvasPoint::new(100.0, 100.0);
        assert!(!viewer.wheel(
            position,
            WheelDelta::Lines(1.0),
            InputModifiers::default(),
            false,
        ));
        assert!(viewer.wheel(
            position,
            WheelDelta::Lines(1.0),
            InputModifiers::default(),
            true,
        ));
    }

    #[test]
    fn panning_keeps_the_grabbed_point_under_the_pointer() {
        let mut viewer = test_viewer();
        let grab = CanvasPoint::new(100.0, 100.0);
        let anchor = Transform::new(&viewer.state, viewer.size).canvas_to_logical(grab);
        assert!(viewer.pointer_down(P1, grab, InputModifiers::default()));
        let target = CanvasPoint::new(300.0, 220.0);
        assert!(viewer.pointer_move(P1, target));
        let state = viewer.viewer_state();
        let mapped = Transform::new(&state, viewer.size).canvas_to_logical(target);
        assert!((mapped.x - anchor.x).abs() < 1e-9);
        assert!((mapped.y - anchor.y).abs() < 1e-9);
        assert!(viewer.pointer_up(P1));
        assert_eq!(viewer.gesture, Gesture::Idle);
    }

    #[test]
    fn second_pointer_switches_panning_to_zooming() {
        let mut viewer = test_viewer();
        viewer.pointer_down(P1, CanvasPoint::new(100.0, 250.0), InputModifiers::default());
        assert!(matches!(viewer.gesture, Gesture::Panning { .. }));
        viewer.pointer_down(P2, CanvasPoint::new(300.0, 250.0), InputModifiers::default());
        assert!(matches!(viewer.gesture, Gesture::Zooming { .. }));
        // Releasing one pointer returns to panning with the survivor.
        assert!(viewer.pointer_up(P1));
        assert!(
            matches!(viewer.gesture, Gesture::Panning { pointer, .. } if pointer == P2),
            "{:?}",
            viewer.gesture
        );
        assert!(viewer.pointer_up(P2));
        assert_eq!(viewer.gesture, Gesture::Idle);
    }

    #[test]
    fn horizontal_pinch_zooms_only_the_x_axis() {
        let mut viewer = test_viewer();
        viewer.pointer_down(P1, CanvasPoint::new(300.0, 250.0), InputModifiers::default());
        viewer.pointer_down(P2, CanvasPoint::new(500.0, 250.0), InputModifiers::default());
        // Spread the pointers to twice their initial distance.
        viewer.pointer_move(P1, CanvasPoint::new(200.0, 250.0));
        viewer.pointer_move(P2, CanvasPoint::new(600.0, 250.0));
        let state = viewer.viewer_state();
        assert!((state.x_span() - 20.0).abs() < 1e-9);
        assert!((state.y_span() - 2.4).abs() < 1e-9);
    }

    #[test]
    fn shift_drag_commits_a_segment_on_release() {
        let mut viewer = test_viewer();
        let shift = InputModifiers {
            shift: true,
            ..InputModifiers::default()
        };
        assert!(viewer.pointer_down(P1, drag_to_x(&viewer, 2.0), shift));
        assert!(viewer.pointer_move(P1, drag_to_x(&viewer, 5.0)));
        // Provisional bounds are not committed yet.
        assert!(!viewer.viewer_state().segment_selected);
        assert!(viewer.pointer_up(P1));
        let state = viewer.viewer_state();
        assert!(state.segment_selected);
        assert!((state.segment_start - 2.0).abs() < 1e-9);
        assert!((state.segment_end - 5.0).abs() < 1e-9);
    }

    #[test]
    fn leftward_drag_normalizes_the_segment() {
        let mut viewer = test_viewer();
        let shift = InputModifiers {
            shift: true,
            ..InputModifiers::default()
        };
        viewer.pointer_down(P1, drag_to_x(&viewer, 5.0), shift);
        viewer.pointer_move(P1, drag_to_x(&viewer, 2.0));
        viewer.pointer_up(P1);
        let state = viewer.viewer_state();
        assert!(state.segment_selected);
        assert!(state.segment_start <= state.segment_end);
        assert!((state.segment_start - 2.0).abs() < 1e-9);
    }

    #[test]
    fn plain_click_clears_the_selection() {
        let mut viewer = test_viewer();
        let shift = InputModifiers {
            shift: true,
            ..InputModifiers::default()
        };
        viewer.pointer_down(P1, drag_to_x(&viewer, 2.0), shift);
        viewer.pointer_move(P1, drag_to_x(&viewer, 5.0));
        viewer.pointer_up(P1);
        let _ = viewer.take_pending_notifications();
        viewer.pointer_down(P1, drag_to_x(&viewer, 10.0), InputModifiers::default());
        viewer.pointer_up(P1);
        assert!(!viewer.viewer_state().segment_selected);
        let events: Vec<_> = viewer
            .take_pending_notifications()
            .into_iter()
            .map(|(event, _)| event)
            .collect();
        assert!(events.contains(&ViewerEvent::SegmentChanged));
    }

    #[test]
    fn ctrl_click_resizes_the_nearer_end() {
        let mut viewer = test_viewer();
        let shift = InputModifiers {
            shift: true,
            ..InputModifiers::default()
        };
        viewer.pointer_down(P1, drag_to_x(&viewer, 2.0), shift);
        viewer.pointer_move(P1, drag_to_x(&viewer, 5.0));
        viewer.pointer_up(P1);
        // A ctrl drag near the upper end moves that end; the lower end
        // stays anchored.
        let ctrl = InputModifiers {
            ctrl: true,
            ..InputModifiers::default()
        };
        viewer.pointer_down(P1, drag_to_x(&viewer, 4.5), ctrl);
        viewer.pointer_move(P1, drag_to_x(&viewer, 8.0));
        viewer.pointer_up(P1);
        let state = viewer.viewer_state();
        assert!(state.segment_selected);
        assert!((state.segment_start - 2.0).abs() < 1e-9);
        assert!((state.segment_end - 8.0).abs() < 1e-9);
    }

    #[test]
    fn cancel_discards_the_provisional_selection() {
        let mut viewer = test_viewer();
        let shift = InputModifiers {
            shift: true,
            ..InputModifiers::default()
        };
        viewer.pointer_down(P1, drag_to_x(&viewer, 2.0), shift);
        viewer.pointer_move(P1, drag_to_x(&viewer, 5.0));
        assert!(viewer.pointer_cancel(P1));
        assert!(!viewer.viewer_state().segment_selected);
        assert_eq!(viewer.gesture, Gesture::Idle);
    }

    #[test]
    fn notifications_are_queued_not_dispatched() {
        let mut viewer = test_viewer();
        viewer.pointer_down(P1, CanvasPoint::new(100.0, 100.0), InputModifiers::default());
        viewer.pointer_move(P1, CanvasPoint::new(120.0, 100.0));
        viewer.pointer_move(P1, CanvasPoint::new(140.0, 100.0));
        viewer.pointer_up(P1);
        let events: Vec<_> = viewer
            .take_pending_notifications()
            .into_iter()
            .map(|(event, _)| event)
            .collect();
        // Repeated pans within one flush collapse into a single event.
        assert_eq!(events, vec![ViewerEvent::ViewportChanged]);
        assert!(!viewer.has_pending_notifications());
    }

    #[test]
    fn disabled_viewer_ignores_input() {
        let mut viewer = test_viewer();
        viewer.set_disabled(true);
        assert!(viewer.is_disabled());
        assert!(!viewer.pointer_down(P1, CanvasPoint::new(10.0, 10.0), InputModifiers::default()));
        assert!(!viewer.key_press('+'));
        assert!(!viewer.wheel(
            CanvasPoint::new(10.0, 10.0),
            WheelDelta::Lines(1.0),
            InputModifiers::default(),
            true,
        ));
    }

    #[test]
    fn empty_state_is_derived_disabled() {
        let mut viewer = CurveViewer::new();
        viewer.set_active(true);
        assert!(viewer.is_disabled());
        viewer.set_viewer_state(ViewerState {
            viewer_function: Some(Arc::new(|_, _, _| Some(Sample::Value(0.0)))),
            ..ViewerState::default()
        });
        assert!(!viewer.is_disabled());
    }

    #[test]
    fn resize_corner_is_left_to_the_host() {
        let mut viewer = test_viewer();
        assert!(!viewer.pointer_down(
            P1,
            CanvasPoint::new(795.0, 495.0),
            InputModifiers::default()
        ));
        assert_eq!(viewer.gesture, Gesture::Idle);
    }

    #[test]
    fn resize_is_deferred_until_paint() {
        let mut viewer = test_viewer();
        viewer.notify_resized(1024, 768);
        assert_eq!(viewer.canvas_size(), CanvasSize::new(800, 500));
        let _ = viewer.paint();
        assert_eq!(viewer.canvas_size(), CanvasSize::new(1024, 768));
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut viewer = test_viewer();
        viewer.key_press('+');
        viewer.key_press('g');
        assert!(viewer.key_press('r'));
        let state = viewer.viewer_state();
        assert!((state.x_span() - 40.0).abs() < 1e-9);
        assert!(state.grid_enabled);
    }

    #[test]
    fn grid_toggle_repaints_without_viewport_event() {
        let mut viewer = test_viewer();
        let _ = viewer.take_repaint_request();
        assert!(viewer.key_press('g'));
        assert!(viewer.take_repaint_request());
        assert!(!viewer.has_pending_notifications());
    }

    #[test]
    fn inactive_viewer_accumulates_no_repaints() {
        let mut viewer = CurveViewer::new();
        viewer.set_viewer_state(ViewerState::default());
        assert!(!viewer.take_repaint_request());
    }

    #[test]
    fn help_reflects_the_primary_zoom_mode() {
        let mut viewer = test_viewer();
        let mut state = viewer.viewer_state();
        state.primary_zoom_mode = ZoomMode::X;
        viewer.set_viewer_state(state);
        let entries = viewer.help_entries();
        let wheel = entries
            .iter()
            .find(|(action, _)| *action == "mouse wheel")
            .unwrap();
        assert_eq!(wheel.1, "zoom x-axis");
        assert!(viewer.formatted_help_text().starts_with("<table"));
    }
}
