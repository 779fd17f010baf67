//! Frame construction: background, selection band, grid, curves, overlays.
//!
//! Curve drawing samples the viewer function once per pixel column and
//! switches between a line mode and a fill mode. Line mode is preferred for
//! single-valued samples because a stroked path is antialiased; fill mode
//! covers min/max envelopes with per-column bands whose edges are merged
//! with the neighboring column under a fractional-pixel accumulator, so the
//! bands touch without gaps or systematic overlap.

use crate::geom::{CanvasPoint, CanvasRect};
use crate::grid::{self, Axis};
use crate::render::{LineStyle, RenderCommand, RenderList, TextStyle};
use crate::state::{Sample, ViewerState};
use crate::style::Theme;
use crate::transform::{CanvasSize, Transform};

const LABEL_FONT_SIZE: f32 = 12.0;
const GRID_LINE_CAP: u32 = 100;
const PIXEL_COMPENSATION: f64 = 0.41;
// Stroked path coordinates are kept within a range the backend can handle.
const LINE_COORD_CLAMP: f64 = 1e6;
// Infinite sample values become a large finite sentinel so they still
// contribute fill geometry; NaN does not survive the clamp and skips.
const VALUE_CLAMP: f64 = 1e300;

/// Paint one frame of the viewer into a render list.
pub(crate) fn paint(
    state: &ViewerState,
    provisional_segment: Option<(f64, f64)>,
    theme: &Theme,
    size: CanvasSize,
    disabled: bool,
) -> RenderList {
    let mut list = RenderList::new();
    let surface = CanvasRect::new(
        CanvasPoint::new(0.0, 0.0),
        CanvasPoint::new(f64::from(size.width), f64::from(size.height)),
    );
    if disabled {
        list.push(RenderCommand::FillRect {
            rect: surface,
            color: theme.disabled_background,
        });
        return list;
    }
    list.push(RenderCommand::FillRect {
        rect: surface,
        color: theme.background,
    });
    let transform = Transform::new(state, size);
    draw_segment_band(&mut list, state, provisional_segment, theme, &transform, size);
    if state.grid_enabled {
        draw_grid(&mut list, state, theme, &transform, size, Axis::X);
        draw_grid(&mut list, state, theme, &transform, size, Axis::Y);
    }
    draw_curves(&mut list, state, theme, &transform, size);
    if let Some(custom_paint) = &state.custom_paint_function {
        custom_paint(&mut list, &transform);
    }
    list
}

fn draw_segment_band(
    list: &mut RenderList,
    state: &ViewerState,
    provisional: Option<(f64, f64)>,
    theme: &Theme,
    transform: &Transform,
    size: CanvasSize,
) {
    let (start, end) = match provisional {
        Some((a, b)) => (a.min(b), a.max(b)),
        None if state.segment_selected => (state.segment_start, state.segment_end),
        None => return,
    };
    let width = f64::from(size.width);
    let x0 = transform.logical_to_canvas_x(start).clamp(0.0, width);
    let x1 = transform.logical_to_canvas_x(end).clamp(0.0, width);
    if x1 < x0 {
        return;
    }
    // A zero-width band still shows a one pixel caret.
    list.push(RenderCommand::FillRect {
        rect: CanvasRect::new(
            CanvasPoint::new(x0, 0.0),
            CanvasPoint::new(x1.max(x0 + 1.0), f64::from(size.height)),
        ),
        color: theme.selection_fill,
    });
}

fn draw_grid(
    list: &mut RenderList,
    state: &ViewerState,
    theme: &Theme,
    transform: &Transform,
    size: CanvasSize,
    axis: Axis,
) {
    let Some(parms) = grid::compute_grid_parms(state, size, axis) else {
        return;
    };
    let width = f64::from(size.width);
    let height = f64::from(size.height);
    let unit = match axis {
        Axis::X => state.x_axis_unit.as_deref(),
        Axis::Y => state.y_axis_unit.as_deref(),
    };
    let mut p = parms.first_pos;
    let mut line_count = 0;
    loop {
        let l_pos = p * parms.space;
        let c_pos = match axis {
            Axis::X => transform.logical_to_canvas_x(l_pos),
            Axis::Y => transform.logical_to_canvas_y(l_pos),
        };
        let off_surface = match axis {
            Axis::X => c_pos > width,
            Axis::Y => c_pos < 0.0,
        };
        if off_surface {
            break;
        }
        let color = if p == 0.0 {
            theme.grid_zero
        } else if p % 10.0 == 0.0 {
            theme.grid_decade
        } else {
            theme.grid_minor
        };
        let rect = match axis {
            Axis::X => CanvasRect::new(
                CanvasPoint::new(c_pos, 0.0),
                CanvasPoint::new(c_pos + 1.0, height),
            ),
            Axis::Y => CanvasRect::new(
                CanvasPoint::new(0.0, c_pos),
                CanvasPoint::new(width, c_pos + 1.0),
            ),
        };
        list.push(RenderCommand::FillRect { rect, color });
        let label_pos = match axis {
            Axis::X => CanvasPoint::new(c_pos + 5.0, height - 2.0),
            Axis::Y => CanvasPoint::new(5.0, c_pos - 2.0),
        };
        list.push(RenderCommand::Text {
            position: label_pos,
            text: grid::format_label(l_pos, parms.dec_pow, unit),
            style: TextStyle {
                color: theme.label_text,
                size: LABEL_FONT_SIZE,
            },
        });
        p += parms.span;
        line_count += 1;
        if line_count > GRID_LINE_CAP {
            // Guards against an endless loop on numerical instability.
            break;
        }
    }
}

fn draw_curves(
    list: &mut RenderList,
    state: &ViewerState,
    theme: &Theme,
    transform: &Transform,
    size: CanvasSize,
) {
    let Some(function) = &state.viewer_function else {
        return;
    };
    let sample_width = state.x_span() / f64::from(size.width);
    for channel in 0..state.channels {
        draw_channel(
            list,
            function.as_ref(),
            channel,
            theme.channel_style(channel),
            transform,
            size,
            sample_width,
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Skip,
    Line,
    Fill,
}

#[allow(clippy::too_many_arguments)]
fn draw_channel(
    list: &mut RenderList,
    function: &(dyn Fn(f64, f64, usize) -> Option<Sample> + Send + Sync),
    channel: usize,
    style: LineStyle,
    transform: &Transform,
    size: CanvasSize,
    sample_width: f64,
) {
    let height = f64::from(size.height);
    let mut mode = Mode::Skip;
    let mut fill_mode_used = false;
    let mut line_points: Vec<CanvasPoint> = Vec::new();
    let mut fill_rects: Vec<CanvasRect> = Vec::new();
    let mut prev_cy_lo: Option<f64> = None;
    let mut prev_cy_hi: Option<f64> = None;
    let mut pixel_acc = 0.0_f64;

    for cx in 0..size.width {
        let lx = transform.canvas_to_logical_x(f64::from(cx) + 0.5);
        let (ly_lo, ly_hi) = match function(lx, sample_width, channel) {
            None => {
                switch_mode(
                    &mut mode,
                    Mode::Skip,
                    list,
                    &mut line_points,
                    style,
                    &mut prev_cy_lo,
                    &mut prev_cy_hi,
                    &mut fill_mode_used,
                );
                continue;
            }
            Some(Sample::Value(v)) => (v, v),
            Some(Sample::Range { lo, hi }) => (lo, hi),
        };
        let ly_lo = ly_lo.clamp(-VALUE_CLAMP, VALUE_CLAMP);
        let ly_hi = ly_hi.clamp(-VALUE_CLAMP, VALUE_CLAMP);
        let next_mode = if !ly_lo.is_finite() || !ly_hi.is_finite() {
            Mode::Skip
        } else if !fill_mode_used && ly_lo == ly_hi {
            // Exact equality detects genuinely single-valued samples; once a
            // run has filled, it stays in fill mode until the next break so
            // the band does not flicker against antialiased strokes.
            Mode::Line
        } else {
            Mode::Fill
        };
        switch_mode(
            &mut mode,
            next_mode,
            list,
            &mut line_points,
            style,
            &mut prev_cy_lo,
            &mut prev_cy_hi,
            &mut fill_mode_used,
        );
        match mode {
            Mode::Skip => {}
            Mode::Line => {
                let cy = transform
                    .logical_to_canvas_y(ly_lo)
                    .clamp(-LINE_COORD_CLAMP, LINE_COORD_CLAMP);
                line_points.push(CanvasPoint::new(f64::from(cx), cy));
            }
            Mode::Fill => {
                // hi/lo swap: the canvas y axis points down.
                let cy_lo0 = transform.logical_to_canvas_y(ly_hi).clamp(0.0, height);
                let cy_hi0 = transform.logical_to_canvas_y(ly_lo).clamp(0.0, height);
                let cy_lo1 = cy_lo0.floor();
                let cy_hi1 = cy_hi0.ceil();
                let cy_lo2 = cy_lo1;
                let cy_hi2 = cy_hi1.max(cy_lo1 + 1.0);
                let mut cy_lo = match prev_cy_hi {
                    None => cy_lo2,
                    Some(prev) => cy_lo2.min(prev),
                };
                let mut cy_hi = match prev_cy_lo {
                    None => cy_hi2,
                    Some(prev) => cy_hi2.max(prev),
                };
                if prev_cy_hi == Some(cy_lo) {
                    pixel_acc += PIXEL_COMPENSATION;
                    if pixel_acc >= cy_hi1 - cy_hi0 {
                        cy_lo -= 1.0;
                        pixel_acc -= 1.0;
                    }
                } else if prev_cy_lo == Some(cy_hi) {
                    pixel_acc += PIXEL_COMPENSATION;
                    if pixel_acc >= cy_lo0 - cy_lo1 {
                        cy_hi += 1.0;
                        pixel_acc -= 1.0;
                    }
                }
                fill_rects.push(CanvasRect::new(
                    CanvasPoint::new(f64::from(cx), cy_lo),
                    CanvasPoint::new(f64::from(cx) + 1.0, cy_hi),
                ));
                prev_cy_lo = Some(cy_lo);
                prev_cy_hi = Some(cy_hi);
            }
        }
    }
    flush_line(list, &mut line_points, style);
    if !fill_rects.is_empty() {
        list.push(RenderCommand::FillRects {
            rects: fill_rects,
            color: style.color,
        });
    }
}

#[allow(clippy::too_many_arguments)]
fn switch_mode(
    mode: &mut Mode,
    next: Mode,
    list: &mut RenderList,
    line_points: &mut Vec<CanvasPoint>,
    style: LineStyle,
    prev_cy_lo: &mut Option<f64>,
    prev_cy_hi: &mut Option<f64>,
    fill_mode_used: &mut bool,
) {
    if next == *mode {
        return;
    }
    if *mode == Mode::Line {
        flush_line(list, line_points, style);
    }
    *mode = next;
    match next {
        Mode::Line => line_points.clear(),
        Mode::Fill => {
            *prev_cy_lo = None;
            *prev_cy_hi = None;
            *fill_mode_used = true;
        }
        Mode::Skip => {}
    }
}

// The accumulated path is stroked in one operation; stroking per column
// would produce visible antialiasing seams.
fn flush_line(list: &mut RenderList, points: &mut Vec<CanvasPoint>, style: LineStyle) {
    if points.len() > 1 {
        list.push(RenderCommand::Polyline {
            points: std::mem::take(points),
            style,
        });
    } else {
        points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn base_state() -> ViewerState {
        ViewerState {
            x_min: 0.0,
            x_max: 10.0,
            y_min: -2.0,
            y_max: 2.0,
            grid_enabled: false,
            ..ViewerState::default()
        }
    }

    fn paint_commands(state: &ViewerState, size: CanvasSize) -> Vec<RenderCommand> {
        paint(state, None, &Theme::light(), size, false)
            .commands()
            .to_vec()
    }

    fn polylines(commands: &[RenderCommand]) -> Vec<&Vec<CanvasPoint>> {
        commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    fn fill_batches(commands: &[RenderCommand]) -> Vec<&Vec<CanvasRect>> {
        commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::FillRects { rects, .. } => Some(rects),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn constant_function_draws_one_unbroken_stroke() {
        let mut state = base_state();
        state.viewer_function = Some(Arc::new(|_, _, _| Some(Sample::Value(1.0))));
        let size = CanvasSize::new(200, 100);
        let commands = paint_commands(&state, size);
        let lines = polylines(&commands);
        assert_eq!(lines.len(), 1);
        let points = lines[0];
        assert_eq!(points.len(), 200);
        for (index, point) in points.iter().enumerate() {
            assert_eq!(point.x, index as f64);
        }
    }

    #[test]
    fn undefined_region_breaks_the_path() {
        let mut state = base_state();
        state.viewer_function = Some(Arc::new(|x, _, _| {
            if (4.0..6.0).contains(&x) {
                None
            } else {
                Some(Sample::Value(0.5))
            }
        }));
        let commands = paint_commands(&state, CanvasSize::new(100, 100));
        assert_eq!(polylines(&commands).len(), 2);
    }

    #[test]
    fn fill_mode_never_reverts_to_line() {
        let mut state = base_state();
        // Scalar run, then an envelope, then scalars again: the trailing
        // scalars must still render as fill bands.
        state.viewer_function = Some(Arc::new(|x, _, _| {
            if (3.0..5.0).contains(&x) {
                Some(Sample::Range { lo: -1.0, hi: 1.0 })
            } else {
                Some(Sample::Value(0.0))
            }
        }));
        let commands = paint_commands(&state, CanvasSize::new(100, 100));
        assert_eq!(polylines(&commands).len(), 1);
        let batches = fill_batches(&commands);
        assert_eq!(batches.len(), 1);
        // Columns from the envelope start to the right edge are all filled.
        assert_eq!(batches[0].len(), 70);
    }

    #[test]
    fn fill_columns_touch_without_gaps() {
        let mut state = base_state();
        state.viewer_function = Some(Arc::new(|x, w, _| {
            let lo = 0.17 * x - 1.8;
            Some(Sample::Range { lo, hi: lo + w })
        }));
        let commands = paint_commands(&state, CanvasSize::new(400, 300));
        let batches = fill_batches(&commands);
        assert_eq!(batches.len(), 1);
        let rects = batches[0];
        assert_eq!(rects.len(), 400);
        for pair in rects.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            // No vertical gap between neighboring columns.
            assert!(b.min.y <= a.max.y, "gap after column at x {}", a.min.x);
            assert!(b.max.y >= a.min.y, "gap after column at x {}", a.min.x);
            // Bands stay at least one pixel tall.
            assert!(b.height() >= 1.0);
        }
    }

    #[test]
    fn infinite_samples_participate_in_fill() {
        let mut state = base_state();
        state.viewer_function = Some(Arc::new(|_, _, _| {
            Some(Sample::Range {
                lo: 0.0,
                hi: f64::INFINITY,
            })
        }));
        let commands = paint_commands(&state, CanvasSize::new(50, 100));
        let batches = fill_batches(&commands);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 50);
    }

    #[test]
    fn nan_samples_skip() {
        let mut state = base_state();
        state.viewer_function = Some(Arc::new(|_, _, _| Some(Sample::Value(f64::NAN))));
        let commands = paint_commands(&state, CanvasSize::new(50, 100));
        assert!(polylines(&commands).is_empty());
        assert!(fill_batches(&commands).is_empty());
    }

    #[test]
    fn channels_render_separately() {
        let mut state = base_state();
        state.channels = 3;
        state.viewer_function = Some(Arc::new(|_, _, channel| {
            Some(Sample::Value(channel as f64 * 0.5 - 1.0))
        }));
        let commands = paint_commands(&state, CanvasSize::new(100, 100));
        assert_eq!(polylines(&commands).len(), 3);
    }

    #[test]
    fn committed_selection_paints_a_band() {
        let mut state = base_state();
        state.segment_selected = true;
        state.segment_start = 2.0;
        state.segment_end = 5.0;
        let size = CanvasSize::new(100, 100);
        let commands = paint_commands(&state, size);
        let band = commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::FillRect { rect, color }
                    if *color == Theme::light().selection_fill =>
                {
                    Some(*rect)
                }
                _ => None,
            })
            .next()
            .expect("selection band");
        assert!((band.min.x - 20.0).abs() < 1e-9);
        assert!((band.max.x - 50.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_paints_background_only() {
        let mut state = base_state();
        state.viewer_function = Some(Arc::new(|_, _, _| Some(Sample::Value(0.0))));
        let list = paint(&state, None, &Theme::light(), CanvasSize::new(100, 100), true);
        assert_eq!(list.commands().len(), 1);
    }

    #[test]
    fn grid_lines_and_labels_are_emitted() {
        let mut state = base_state();
        state.grid_enabled = true;
        let commands = paint_commands(&state, CanvasSize::new(800, 500));
        let labels = commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::Text { .. }))
            .count();
        assert!(labels > 4);
    }

    #[test]
    fn custom_paint_runs_after_curves() {
        let mut state = base_state();
        state.custom_paint_function = Some(Arc::new(|list, transform| {
            let origin = transform.logical_to_canvas(crate::geom::Point::new(0.0, 0.0));
            list.push(RenderCommand::Text {
                position: origin,
                text: "origin".into(),
                style: TextStyle::default(),
            });
        }));
        let commands = paint_commands(&state, CanvasSize::new(100, 100));
        match commands.last() {
            Some(RenderCommand::Text { text, .. }) => assert_eq!(text, "origin"),
            other => panic!("expected trailing overlay text, got {other:?}"),
        }
    }
}
