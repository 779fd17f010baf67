//! Visual themes for the curve viewer.

use crate::render::{Color, LineStyle};

/// Resolved colors and widths for painting.
///
/// A theme is resolved once when the widget becomes active. Channels beyond
/// the configured curve styles receive generated colors from an HSL ramp,
/// so any channel count renders with distinct colors.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Surface background.
    pub background: Color,
    /// Surface background while the widget is disabled.
    pub disabled_background: Color,
    /// Axis label text.
    pub label_text: Color,
    /// Grid line through the coordinate origin.
    pub grid_zero: Color,
    /// Every tenth grid line.
    pub grid_decade: Color,
    /// Regular grid line.
    pub grid_minor: Color,
    /// Segment selection band.
    pub selection_fill: Color,
    /// Explicit per-channel curve styles.
    pub curve_styles: Vec<LineStyle>,
}

impl Theme {
    /// Light theme.
    pub fn light() -> Self {
        Self {
            background: Color::WHITE,
            disabled_background: Color::rgb8(0xF1, 0xF1, 0xF1),
            label_text: Color::rgb8(0x70, 0x70, 0x70),
            grid_zero: Color::rgb8(0x98, 0x98, 0x98),
            grid_decade: Color::rgb8(0xD4, 0xD4, 0xD4),
            grid_minor: Color::rgb8(0xEE, 0xEE, 0xEE),
            selection_fill: Color::new(0.25, 0.5, 1.0, 0.2),
            curve_styles: vec![LineStyle {
                color: Color::rgb8(0x44, 0xCC, 0x44),
                width: 1.0,
            }],
        }
    }

    /// Dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::rgb8(0x1C, 0x1C, 0x1E),
            disabled_background: Color::rgb8(0x26, 0x26, 0x28),
            label_text: Color::rgb8(0x9A, 0x9A, 0x9A),
            grid_zero: Color::rgb8(0x77, 0x77, 0x7A),
            grid_decade: Color::rgb8(0x48, 0x48, 0x4B),
            grid_minor: Color::rgb8(0x2E, 0x2E, 0x31),
            selection_fill: Color::new(0.35, 0.55, 1.0, 0.25),
            curve_styles: vec![LineStyle {
                color: Color::rgb8(0x55, 0xDD, 0x55),
                width: 1.0,
            }],
        }
    }

    /// Style for the given channel.
    pub fn channel_style(&self, channel: usize) -> LineStyle {
        if let Some(style) = self.curve_styles.get(channel) {
            return *style;
        }
        // Golden-angle hue spacing keeps neighboring channels distinct.
        let hue = 120.0 + channel as f32 * 137.0;
        LineStyle {
            color: Color::from_hsl(hue, 0.7, 0.45),
            width: 1.0,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
