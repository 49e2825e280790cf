//! Plotters-powered segment chart widget for Ratatui.
//!
//! The panel itself is described by `render::panel::Panel`, the same type the
//! SVG figure uses; this widget only adapts it to the terminal buffer through
//! `plotters-ratatui-backend`.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::render::panel::{Panel, draw_panel};

pub struct SegmentChart<'a> {
    pub panel: Panel<'a>,
}

impl Widget for SegmentChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let (x, y) = (&self.panel.x_range, &self.panel.y_range);
        if !(x.start.is_finite() && x.end.is_finite() && y.start.is_finite() && y.end.is_finite())
            || x.end <= x.start
            || y.end <= y.start
        {
            return;
        }

        let panel = self.panel;
        let widget = widget_fn(move |root| {
            draw_panel(&root, &panel)?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
