use std::sync::Arc;

use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

use gpui_curveview::{
    CurveView, CurveViewer, Sample, ViewerEvent, ViewerState, ZoomMode,
};

/// A synthetic two-channel "audio" signal.
fn signal(x: f64, channel: usize) -> f64 {
    let detune = 1.0 + channel as f64 * 0.003;
    (x * 440.0 * detune * std::f64::consts::TAU).sin() * (-x * 0.8).exp()
}

/// Min/max envelope of the signal over one pixel column.
fn envelope(x: f64, sample_width: f64, channel: usize) -> Option<Sample> {
    if x < 0.0 {
        return None;
    }
    const STEPS: usize = 16;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for step in 0..=STEPS {
        let sx = x - sample_width / 2.0 + sample_width * step as f64 / STEPS as f64;
        let value = signal(sx.max(0.0), channel);
        lo = lo.min(value);
        hi = hi.max(value);
    }
    Some(Sample::Range { lo, hi })
}

fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(900.0), px(400.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let mut viewer = CurveViewer::new();
            viewer.set_viewer_state(ViewerState {
                viewer_function: Some(Arc::new(envelope)),
                channels: 2,
                x_min: 0.0,
                x_max: 3.0,
                y_min: -1.1,
                y_max: 1.1,
                x_axis_unit: Some("s".into()),
                primary_zoom_mode: ZoomMode::X,
                ..ViewerState::default()
            });
            let view = cx.new(|cx| CurveView::new(viewer, cx));

            // Shift-drag selects a time range; report it on the console.
            let handle = view.read(cx).handle();
            let report = handle.clone();
            handle.write(move |viewer| {
                viewer.add_listener(
                    ViewerEvent::SegmentChanged,
                    Arc::new(move |_| {
                        report.read(|viewer| {
                            let state = viewer.viewer_state();
                            if state.segment_selected {
                                println!(
                                    "selected {:.4} s .. {:.4} s",
                                    state.segment_start, state.segment_end
                                );
                            } else {
                                println!("selection cleared");
                            }
                        });
                    }),
                );
            });

            view
        })
        .unwrap();
    });
}
