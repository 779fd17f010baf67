//! gpui_curveview is an interactive function curve viewer widget for GPUI.
//! A pluggable sampling function is plotted over a logical viewport with an
//! adaptive coordinate grid; pointer and keyboard input pan, zoom and
//! select x-axis segments.

#![forbid(unsafe_code)]

pub mod events;
pub mod geom;
pub mod gpui_backend;
pub mod grid;
pub mod interaction;
mod plotter;
pub mod render;
pub mod state;
pub mod style;
pub mod transform;
pub mod viewer;

pub use events::{EventListener, ListenerId, ViewerEvent};
pub use geom::{CanvasPoint, CanvasRect, Point};
pub use gpui_backend::{CurveView, ViewerHandle};
pub use grid::{Axis, GridParms, compute_grid_parms, format_label};
pub use interaction::{InputModifiers, PointerId, WheelDelta};
pub use render::{Color, LineStyle, RenderCommand, RenderList, TextStyle};
pub use state::{CustomPaintFunction, Sample, ViewerFunction, ViewerState, ZoomMode};
pub use style::Theme;
pub use transform::{CanvasSize, Transform};
pub use viewer::{CurveViewer, CursorHint, ViewerConfig};
