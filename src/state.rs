//! Viewer state and the pluggable sampling function.

use std::fmt;
use std::sync::Arc;

use crate::render::RenderList;
use crate::transform::Transform;

/// One sampled value of the viewer function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// A single y value.
    Value(f64),
    /// The lowest and highest y values within the sampled x range.
    Range {
        /// Lowest value.
        lo: f64,
        /// Highest value.
        hi: f64,
    },
}

/// The function plotted by the viewer.
///
/// Receives the logical x coordinate, the sample width (logical width of one
/// pixel column) and the channel index. Returns `None` where the function is
/// undefined; [`Sample::Range`] reports the value envelope within
/// `x - sampleWidth/2` to `x + sampleWidth/2`. The function must be pure
/// from the viewer's perspective.
pub type ViewerFunction = Arc<dyn Fn(f64, f64, usize) -> Option<Sample> + Send + Sync>;

/// Callback painting caller-supplied overlays after the curves.
///
/// Receives the frame's render list and the coordinate transform bound to
/// the current viewport, so overlays can be placed in logical space.
pub type CustomPaintFunction = Arc<dyn Fn(&mut RenderList, &Transform) + Send + Sync>;

/// Axis selection for unmodified mouse wheel zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomMode {
    /// Zoom the x axis only.
    X,
    /// Zoom the y axis only.
    Y,
    /// Zoom both axes.
    Both,
}

/// Complete externally visible state of a curve viewer.
///
/// Construct with struct update syntax over [`ViewerState::default`]; the
/// defaults are part of the public contract. The viewport invariant
/// `x_max > x_min` and `y_max > y_min` is the caller's responsibility; a
/// degenerate viewport produces NaN/infinite coordinate mappings.
#[derive(Clone)]
pub struct ViewerState {
    /// The function to be plotted, or `None` to draw no curves.
    pub viewer_function: Option<ViewerFunction>,
    /// Number of curves plotted, each as a separately styled channel.
    pub channels: usize,
    /// Lower x bound of the logical viewport.
    pub x_min: f64,
    /// Upper x bound of the logical viewport.
    pub x_max: f64,
    /// Lower y bound of the logical viewport.
    pub y_min: f64,
    /// Upper y bound of the logical viewport.
    pub y_max: f64,
    /// Whether the coordinate grid is drawn.
    pub grid_enabled: bool,
    /// Unit suffix appended to x axis labels.
    pub x_axis_unit: Option<String>,
    /// Unit suffix appended to y axis labels.
    pub y_axis_unit: Option<String>,
    /// Zoom axis used by the mouse wheel without modifier keys.
    pub primary_zoom_mode: ZoomMode,
    /// When set, wheel zoom only acts while the widget has input focus.
    pub focus_shield: bool,
    /// Whether an x axis segment is currently selected.
    pub segment_selected: bool,
    /// Lower bound of the selected segment (`<= segment_end` when selected).
    pub segment_start: f64,
    /// Upper bound of the selected segment.
    pub segment_end: f64,
    /// Overlay painting callback, invoked after the curves are drawn.
    pub custom_paint_function: Option<CustomPaintFunction>,
}

impl Default for ViewerState {
    fn default() -> Self {
        Self {
            viewer_function: None,
            channels: 1,
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
            grid_enabled: true,
            x_axis_unit: None,
            y_axis_unit: None,
            primary_zoom_mode: ZoomMode::Both,
            focus_shield: false,
            segment_selected: false,
            segment_start: 0.0,
            segment_end: 0.0,
            custom_paint_function: None,
        }
    }
}

impl ViewerState {
    /// Width of the logical viewport.
    pub fn x_span(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Height of the logical viewport.
    pub fn y_span(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Whether the state provides anything to draw.
    pub(crate) fn has_content(&self) -> bool {
        self.viewer_function.is_some() || self.custom_paint_function.is_some()
    }
}

impl fmt::Debug for ViewerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewerState")
            .field("viewer_function", &self.viewer_function.is_some())
            .field("channels", &self.channels)
            .field("x_min", &self.x_min)
            .field("x_max", &self.x_max)
            .field("y_min", &self.y_min)
            .field("y_max", &self.y_max)
            .field("grid_enabled", &self.grid_enabled)
            .field("x_axis_unit", &self.x_axis_unit)
            .field("y_axis_unit", &self.y_axis_unit)
            .field("primary_zoom_mode", &self.primary_zoom_mode)
            .field("focus_shield", &self.focus_shield)
            .field("segment_selected", &self.segment_selected)
            .field("segment_start", &self.segment_start)
            .field("segment_end", &self.segment_end)
            .field(
                "custom_paint_function",
                &self.custom_paint_function.is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_defaults() {
        let state = ViewerState::default();
        assert!(state.viewer_function.is_none());
        assert_eq!(state.channels, 1);
        assert_eq!((state.x_min, state.x_max), (0.0, 1.0));
        assert_eq!((state.y_min, state.y_max), (0.0, 1.0));
        assert!(state.grid_enabled);
        assert_eq!(state.primary_zoom_mode, ZoomMode::Both);
        assert!(!state.focus_shield);
        assert!(!state.segment_selected);
    }

    #[test]
    fn content_detection() {
        let mut state = ViewerState::default();
        assert!(!state.has_content());
        state.viewer_function = Some(Arc::new(|x, _, _| Some(Sample::Value(x))));
        assert!(state.has_content());
    }
}
