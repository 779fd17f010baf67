//! Coordinate transforms between logical and canvas space.

use crate::geom::{CanvasPoint, Point};
use crate::state::ViewerState;

/// Size of the drawing surface's pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Create a new canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Transform from logical coordinates into canvas coordinates.
///
/// Captured from the viewer state once per use; canvas y grows downward
/// while logical y grows upward, so the y mapping is inverted. The mapping
/// functions and their inverses are exact algebraic inverses up to
/// floating-point precision.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    x_min: f64,
    y_min: f64,
    zoom_factor_x: f64,
    zoom_factor_y: f64,
    width: f64,
    height: f64,
}

impl Transform {
    /// Create a transform for the given state and surface size.
    pub fn new(state: &ViewerState, size: CanvasSize) -> Self {
        let width = f64::from(size.width);
        let height = f64::from(size.height);
        Self {
            x_min: state.x_min,
            y_min: state.y_min,
            zoom_factor_x: width / state.x_span(),
            zoom_factor_y: height / state.y_span(),
            width,
            height,
        }
    }

    /// Canvas pixels per logical x unit.
    pub fn zoom_factor_x(&self) -> f64 {
        self.zoom_factor_x
    }

    /// Canvas pixels per logical y unit.
    pub fn zoom_factor_y(&self) -> f64 {
        self.zoom_factor_y
    }

    /// Map a logical x coordinate to a canvas x coordinate.
    pub fn logical_to_canvas_x(&self, lx: f64) -> f64 {
        (lx - self.x_min) * self.zoom_factor_x
    }

    /// Map a logical y coordinate to a canvas y coordinate.
    pub fn logical_to_canvas_y(&self, ly: f64) -> f64 {
        self.height - (ly - self.y_min) * self.zoom_factor_y
    }

    /// Map a logical point to a canvas point.
    pub fn logical_to_canvas(&self, point: Point) -> CanvasPoint {
        CanvasPoint::new(
            self.logical_to_canvas_x(point.x),
            self.logical_to_canvas_y(point.y),
        )
    }

    /// Map a canvas x coordinate to a logical x coordinate.
    pub fn canvas_to_logical_x(&self, cx: f64) -> f64 {
        self.x_min + cx / self.zoom_factor_x
    }

    /// Map a canvas y coordinate to a logical y coordinate.
    pub fn canvas_to_logical_y(&self, cy: f64) -> f64 {
        self.y_min + (self.height - cy) / self.zoom_factor_y
    }

    /// Map a canvas point to a logical point.
    pub fn canvas_to_logical(&self, point: CanvasPoint) -> Point {
        Point::new(
            self.canvas_to_logical_x(point.x),
            self.canvas_to_logical_y(point.y),
        )
    }

    /// Map a raw input-device position to canvas buffer coordinates.
    ///
    /// `origin` is the surface's on-screen position and `css_width` /
    /// `css_height` its on-screen size, which may differ from the pixel
    /// buffer size while a resize is pending.
    pub fn client_to_canvas(
        &self,
        client: CanvasPoint,
        origin: CanvasPoint,
        css_width: f64,
        css_height: f64,
    ) -> CanvasPoint {
        let x1 = client.x - origin.x;
        let y1 = client.y - origin.y;
        CanvasPoint::new(x1 / css_width * self.width, y1 / css_height * self.height)
    }
}
