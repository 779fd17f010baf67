use std::sync::Arc;

use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, px, size};

use gpui_curveview::{CurveView, CurveViewer, Sample, ViewerState};

fn main() {
    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(800.0), px(500.0)),
                cx,
            ))),
            ..Default::default()
        };

        cx.open_window(options, |_window, cx| {
            let mut viewer = CurveViewer::new();
            viewer.set_viewer_state(ViewerState {
                viewer_function: Some(Arc::new(|x, _, _| Some(Sample::Value(x.sin())))),
                x_min: -10.0,
                x_max: 10.0,
                y_min: -1.2,
                y_max: 1.2,
                ..ViewerState::default()
            });
            cx.new(|cx| CurveView::new(viewer, cx))
        })
        .unwrap();
    });
}
