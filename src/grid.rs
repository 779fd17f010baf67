//! Adaptive grid line layout and axis label formatting.
//!
//! Grid spacing is chosen per axis so that lines keep a minimum pixel
//! distance at any zoom level, using decimal powers with span multipliers
//! of 1, 2 or 5.

use crate::state::ViewerState;
use crate::transform::{CanvasSize, Transform};

/// Axis selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Placement parameters for the grid lines of one axis.
///
/// `first_pos` is the position of the first visible grid line in units of
/// `space`; its logical coordinate is `first_pos * space`. Further lines
/// follow at steps of `span` grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridParms {
    /// Distance between grid positions in logical units, a power of ten.
    pub space: f64,
    /// Step between visible grid lines in grid positions: 1, 2 or 5.
    pub span: f64,
    /// First visible grid line, in grid positions.
    pub first_pos: f64,
    /// Decimal power of `space`, used for label formatting.
    pub dec_pow: i32,
}

// X labels are wider than Y labels are tall, so the x axis needs more room.
const MIN_SPACE_X: f64 = 66.0;
const MIN_SPACE_Y: f64 = 50.0;

/// Compute the grid layout for one axis.
///
/// Returns `None` when the viewport edge is so many orders of magnitude
/// away from the grid resolution that line positions would be numerically
/// meaningless.
pub fn compute_grid_parms(state: &ViewerState, size: CanvasSize, axis: Axis) -> Option<GridParms> {
    let transform = Transform::new(state, size);
    let (min_space_c, edge, zoom_factor) = match axis {
        Axis::X => (MIN_SPACE_X, state.x_min, transform.zoom_factor_x()),
        Axis::Y => (MIN_SPACE_Y, state.y_min, transform.zoom_factor_y()),
    };
    let min_space_l = min_space_c / zoom_factor;
    let dec_pow = (min_space_l / 5.0).log10().ceil();
    let edge_dec_pow = if edge == 0.0 {
        -99.0
    } else {
        edge.abs().log10()
    };
    if edge_dec_pow - dec_pow > 10.0 {
        return None;
    }
    let space = 10.0_f64.powi(dec_pow as i32);
    let f = min_space_l / space;
    let span = if f > 2.001 {
        5.0
    } else if f > 1.001 {
        2.0
    } else {
        1.0
    };
    let p1 = (edge / space).ceil();
    let first_pos = span * (p1 / span).ceil();
    Some(GridParms {
        space,
        span,
        first_pos,
        dec_pow: dec_pow as i32,
    })
}

/// Format an axis label for the given grid resolution.
///
/// Fixed-point notation is used within a moderate decade range, scientific
/// notation outside of it; labels longer than ten characters fall back to
/// six significant digits. The unit suffix is appended with a space.
pub fn format_label(value: f64, dec_pow: i32, unit: Option<&str>) -> String {
    let mut s = if (-6..=7).contains(&dec_pow) {
        let decimals = (-dec_pow).max(0) as usize;
        format!("{value:.decimals$}")
    } else {
        format!("{value:e}")
    };
    if s.len() > 10 {
        s = format!("{value:.5e}");
    }
    if let Some(unit) = unit {
        s.push(' ');
        s.push_str(unit);
    }
    s
}
