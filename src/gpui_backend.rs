//! GPUI integration for gpui_curveview.
//!
//! This module provides a GPUI view that renders a [`CurveViewer`] and
//! feeds it mouse, wheel and keyboard input.

use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{
    App, BorderStyle, Bounds, Corners, CursorStyle, Edges, EventEmitter, FocusHandle, Focusable,
    KeyDownEvent, Keystroke, Modifiers, MouseButton, MouseDownEvent, MouseMoveEvent, MouseUpEvent,
    PathBuilder, Pixels, Point, ScrollDelta, ScrollWheelEvent, TextRun, Window, WindowAppearance,
    canvas, div, font, point, px, quad,
};

use crate::events::ViewerEvent;
use crate::geom::{CanvasPoint, CanvasRect};
use crate::interaction::{InputModifiers, PointerId, WheelDelta};
use crate::render::{Color, LineStyle, RenderCommand, RenderList, TextStyle};
use crate::style::Theme;
use crate::viewer::{CurveViewer, CursorHint};

/// The mouse is a single well-known pointer; touch contacts would use
/// distinct ids.
const MOUSE_POINTER: PointerId = PointerId(0);

/// A GPUI view that renders a [`CurveViewer`] with interactive controls.
pub struct CurveView {
    viewer: Arc<RwLock<CurveViewer>>,
    focus_handle: FocusHandle,
    appearance_resolved: bool,
}

impl CurveView {
    /// Create a view around the given viewer and activate it.
    pub fn new(mut viewer: CurveViewer, cx: &mut App) -> Self {
        viewer.set_active(true);
        Self {
            viewer: Arc::new(RwLock::new(viewer)),
            focus_handle: cx.focus_handle(),
            appearance_resolved: false,
        }
    }

    /// Get a handle for reading and mutating the underlying viewer.
    pub fn handle(&self) -> ViewerHandle {
        ViewerHandle {
            viewer: Arc::clone(&self.viewer),
        }
    }

    fn on_mouse_down(&mut self, ev: &MouseDownEvent, window: &mut Window, cx: &mut Context<Self>) {
        if ev.button != MouseButton::Left {
            return;
        }
        window.focus(&self.focus_handle);
        let handled = {
            let mut viewer = self.viewer.write().expect("viewer lock");
            let position = viewer.client_to_canvas(screen_point(ev.position));
            viewer.pointer_down(MOUSE_POINTER, position, to_modifiers(ev.modifiers))
        };
        if handled {
            self.after_input(cx);
        }
    }

    fn on_mouse_move(&mut self, ev: &MouseMoveEvent, cx: &mut Context<Self>) {
        let handled = {
            let mut viewer = self.viewer.write().expect("viewer lock");
            let position = viewer.client_to_canvas(screen_point(ev.position));
            viewer.pointer_move(MOUSE_POINTER, position)
        };
        if handled {
            self.after_input(cx);
        }
    }

    fn on_mouse_up(&mut self, ev: &MouseUpEvent, cx: &mut Context<Self>) {
        if ev.button != MouseButton::Left {
            return;
        }
        let handled = {
            let mut viewer = self.viewer.write().expect("viewer lock");
            viewer.pointer_up(MOUSE_POINTER)
        };
        if handled {
            self.after_input(cx);
        }
    }

    fn on_scroll(&mut self, ev: &ScrollWheelEvent, window: &mut Window, cx: &mut Context<Self>) {
        // GPUI reports upward scrolling as positive; the viewer follows the
        // downward-positive convention.
        let delta = match ev.delta {
            ScrollDelta::Lines(lines) => WheelDelta::Lines(-f64::from(lines.y)),
            ScrollDelta::Pixels(pixels) => WheelDelta::Pixels(-f64::from(f32::from(pixels.y))),
        };
        let focused = self.focus_handle.is_focused(window);
        let handled = {
            let mut viewer = self.viewer.write().expect("viewer lock");
            let position = viewer.client_to_canvas(screen_point(ev.position));
            viewer.wheel(position, delta, to_modifiers(ev.modifiers), focused)
        };
        if handled {
            self.after_input(cx);
        }
    }

    fn on_key_down(&mut self, ev: &KeyDownEvent, cx: &mut Context<Self>) {
        let Some(ch) = keystroke_char(&ev.keystroke) else {
            return;
        };
        let handled = {
            let mut viewer = self.viewer.write().expect("viewer lock");
            viewer.key_press(ch)
        };
        if handled {
            self.after_input(cx);
        }
    }

    /// Repaint and flush notifications after a consumed input event.
    ///
    /// Listener callbacks run from a deferred closure and events are
    /// re-emitted through GPUI's effect queue, so neither is delivered
    /// synchronously within the input handler's call stack.
    fn after_input(&mut self, cx: &mut Context<Self>) {
        let (repaint, notifications) = {
            let mut viewer = self.viewer.write().expect("viewer lock");
            (
                viewer.take_repaint_request(),
                viewer.take_pending_notifications(),
            )
        };
        if repaint {
            cx.notify();
        }
        if !notifications.is_empty() {
            let view = cx.entity();
            cx.defer(move |cx| {
                view.update(cx, |_, cx| {
                    for (event, listeners) in notifications {
                        for listener in &listeners {
                            listener(event);
                        }
                        cx.emit(event);
                    }
                });
            });
        }
    }
}

impl EventEmitter<ViewerEvent> for CurveView {}

impl Focusable for CurveView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for CurveView {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if !self.appearance_resolved {
            self.appearance_resolved = true;
            let theme = match window.appearance() {
                WindowAppearance::Dark | WindowAppearance::VibrantDark => Theme::dark(),
                _ => Theme::light(),
            };
            self.viewer.write().expect("viewer lock").set_theme(theme);
        }

        let viewer = Arc::clone(&self.viewer);
        let (background, cursor) = {
            let viewer = viewer.read().expect("viewer lock");
            (
                viewer.theme().background,
                cursor_style(viewer.cursor_hint()),
            )
        };

        div()
            .size_full()
            .track_focus(&self.focus_handle)
            .cursor(cursor)
            .bg(to_hsla(background))
            .child(
                canvas(
                    move |bounds, _, _| {
                        let mut viewer = viewer.write().expect("viewer lock");
                        viewer.notify_layout(
                            screen_point(bounds.origin),
                            f32::from(bounds.size.width).max(1.0) as u32,
                            f32::from(bounds.size.height).max(1.0) as u32,
                        );
                        viewer.paint()
                    },
                    move |bounds, frame: RenderList, window, cx| {
                        paint_frame(&frame, bounds, window, cx);
                    },
                )
                .size_full(),
            )
            .on_mouse_down(
                MouseButton::Left,
                cx.listener(|this, ev, window, cx| {
                    this.on_mouse_down(ev, window, cx);
                }),
            )
            .on_mouse_move(cx.listener(|this, ev, _, cx| {
                this.on_mouse_move(ev, cx);
            }))
            .on_mouse_up(
                MouseButton::Left,
                cx.listener(|this, ev, _, cx| {
                    this.on_mouse_up(ev, cx);
                }),
            )
            .on_scroll_wheel(cx.listener(|this, ev, window, cx| {
                this.on_scroll(ev, window, cx);
            }))
            .on_key_down(cx.listener(|this, ev, _, cx| {
                this.on_key_down(ev, cx);
            }))
    }
}

/// A handle for accessing a [`CurveViewer`] held inside a `CurveView`.
#[derive(Clone)]
pub struct ViewerHandle {
    viewer: Arc<RwLock<CurveViewer>>,
}

impl ViewerHandle {
    /// Read the viewer state.
    pub fn read<R>(&self, f: impl FnOnce(&CurveViewer) -> R) -> R {
        let viewer = self.viewer.read().expect("viewer lock");
        f(&viewer)
    }

    /// Mutate the viewer state. Call `cx.notify()` afterwards when the
    /// mutation needs a repaint.
    pub fn write<R>(&self, f: impl FnOnce(&mut CurveViewer) -> R) -> R {
        let mut viewer = self.viewer.write().expect("viewer lock");
        f(&mut viewer)
    }
}

fn paint_frame(frame: &RenderList, bounds: Bounds<Pixels>, window: &mut Window, cx: &mut App) {
    let origin = screen_point(bounds.origin);
    for command in frame.commands() {
        match command {
            RenderCommand::FillRect { rect, color } => {
                paint_fill(window, offset_rect(*rect, origin), *color);
            }
            RenderCommand::FillRects { rects, color } => {
                for rect in rects {
                    paint_fill(window, offset_rect(*rect, origin), *color);
                }
            }
            RenderCommand::Polyline { points, style } => {
                paint_polyline(window, points, origin, *style);
            }
            RenderCommand::Text {
                position,
                text,
                style,
            } => {
                paint_text(window, cx, offset_point(*position, origin), text, style);
            }
        }
    }
}

fn paint_fill(window: &mut Window, rect: CanvasRect, color: Color) {
    let bounds = to_bounds(rect);
    window.paint_quad(quad(
        bounds,
        Corners::all(px(0.0)),
        to_rgba(color),
        Edges::all(px(0.0)),
        to_rgba(color),
        BorderStyle::default(),
    ));
}

fn paint_polyline(
    window: &mut Window,
    points: &[CanvasPoint],
    origin: CanvasPoint,
    style: LineStyle,
) {
    if points.len() < 2 {
        return;
    }
    let width = style.width.max(0.5);
    let mut builder = PathBuilder::stroke(px(width));
    let first = offset_point(points[0], origin);
    builder.move_to(point(px(first.x as f32), px(first.y as f32)));
    for p in &points[1..] {
        let p = offset_point(*p, origin);
        builder.line_to(point(px(p.x as f32), px(p.y as f32)));
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, to_rgba(style.color));
    }
}

fn paint_text(
    window: &mut Window,
    cx: &mut App,
    position: CanvasPoint,
    text: &str,
    style: &TextStyle,
) {
    if text.is_empty() {
        return;
    }
    let font_size = px(style.size);
    let run = TextRun {
        len: text.len(),
        font: font(".SystemUIFont"),
        color: to_hsla(style.color),
        background_color: None,
        underline: None,
        strikethrough: None,
    };
    let shaped = window
        .text_system()
        .shape_line(text.to_string().into(), font_size, &[run], None);
    let line_height = shaped.ascent + shaped.descent;
    // Labels are anchored at their bottom-left corner.
    let origin = point(px(position.x as f32), px(position.y as f32) - line_height);
    let _ = shaped.paint(origin, line_height, window, cx);
}

fn cursor_style(hint: CursorHint) -> CursorStyle {
    match hint {
        CursorHint::Default => CursorStyle::Arrow,
        CursorHint::Move => CursorStyle::ClosedHand,
        CursorHint::ResizeHorizontal => CursorStyle::ResizeLeftRight,
    }
}

fn keystroke_char(keystroke: &Keystroke) -> Option<char> {
    if let Some(key_char) = &keystroke.key_char {
        let mut chars = key_char.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Some(ch);
        }
    }
    let mut chars = keystroke.key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

fn to_modifiers(modifiers: Modifiers) -> InputModifiers {
    InputModifiers {
        shift: modifiers.shift,
        ctrl: modifiers.control,
        alt: modifiers.alt,
    }
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn screen_point(point: Point<Pixels>) -> CanvasPoint {
    CanvasPoint::new(f64::from(f32::from(point.x)), f64::from(f32::from(point.y)))
}

fn offset_point(point: CanvasPoint, origin: CanvasPoint) -> CanvasPoint {
    CanvasPoint::new(point.x + origin.x, point.y + origin.y)
}

fn offset_rect(rect: CanvasRect, origin: CanvasPoint) -> CanvasRect {
    CanvasRect::new(
        offset_point(rect.min, origin),
        offset_point(rect.max, origin),
    )
}

fn to_bounds(rect: CanvasRect) -> Bounds<Pixels> {
    Bounds::from_corners(
        point(px(rect.min.x as f32), px(rect.min.y as f32)),
        point(px(rect.max.x as f32), px(rect.max.y as f32)),
    )
}
