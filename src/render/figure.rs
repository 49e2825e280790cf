//! Multi-panel SVG figure.
//!
//! Layout:
//! - title banner
//! - one small panel per segment: the full rolling mean in faint gray, the
//!   segment's stretch in its color, and thin separators at the boundaries
//! - one wide panel overlaying every segment, with a legend
//! - optional footer banner

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::{ChartStyle, SegmentView, SmoothedSeries};
use crate::error::AppError;
use crate::render::panel::{
    Panel, Trace, boundaries, draw_panel, own_boundaries, rolling_xy, view_xy, x_bounds, y_bounds,
    year_ticks,
};

const BANNER_PX: i32 = 32;
const FOOTER_PX: i32 = 24;

/// Render the segment figure to an SVG file.
pub fn render_figure(
    path: &Path,
    series: &SmoothedSeries,
    views: &[SegmentView<'_>],
    style: &ChartStyle,
) -> Result<(), AppError> {
    if style.width < 200 || style.height < 200 {
        return Err(AppError::new(
            2,
            format!("Figure size {}x{} is too small (min 200x200)", style.width, style.height),
        ));
    }

    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    draw_figure(&root, series, views, style)
        .and_then(|()| root.present())
        .map_err(|e| AppError::new(4, format!("Failed to render '{}': {e}", path.display())))?;

    log::info!("rendered {} segment panels to {}", views.len(), path.display());
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    series: &SmoothedSeries,
    views: &[SegmentView<'_>],
    style: &ChartStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (banner, body) = root.split_vertically(BANNER_PX);
    banner.fill(&RGBColor(128, 128, 128))?;
    banner.draw_text(
        &style.title,
        &("sans-serif", 15).into_font().color(&WHITE),
        (10, 9),
    )?;

    let body = match &style.footer {
        Some(text) => {
            let (_, h) = body.dim_in_pixel();
            let (upper, footer) = body.split_vertically((h as i32 - FOOTER_PX).max(0));
            footer.fill(&RGBColor(128, 128, 128))?;
            footer.draw_text(text, &("sans-serif", 12).into_font().color(&WHITE), (10, 5))?;
            upper
        }
        None => body,
    };

    let base = rolling_xy(series);
    let x_range = x_bounds(series);
    let y_range = y_bounds(&base, tick_range(&style.y_ticks));
    let base_color = RGBColor::from(style.base_color).mix(style.base_opacity);

    let (_, h) = body.dim_in_pixel();
    let (top, bottom) = if views.is_empty() {
        (None, body)
    } else {
        let (top, bottom) = body.split_vertically(h as i32 * 45 / 100);
        (Some(top), bottom)
    };

    if let Some(top) = top {
        let cells = top.split_evenly((1, views.len()));
        for (i, (cell, view)) in cells.iter().zip(views).enumerate() {
            let color = RGBColor::from(view.segment.color);
            let panel = Panel {
                title: Some((view.segment.label.as_str(), color)),
                x_range: x_range.clone(),
                y_range: y_range.clone(),
                base: Some((base.as_slice(), base_color)),
                traces: vec![Trace {
                    points: view_xy(view),
                    color,
                    width: 2,
                    label: None,
                }],
                boundaries: own_boundaries(view),
                x_ticks: year_ticks(&style.panel_x_tick_years),
                y_ticks: style.y_ticks.clone(),
                show_y_labels: i == 0,
                legend: false,
                foreground: BLACK,
                font_size: 11,
                margin: 6,
                label_area: (if i == 0 { 40 } else { 8 }, 24),
            };
            draw_panel(cell, &panel)?;
        }
    }

    let overlay = Panel {
        title: None,
        x_range,
        y_range,
        base: Some((base.as_slice(), base_color)),
        traces: views
            .iter()
            .map(|view| Trace {
                points: view_xy(view),
                color: view.segment.color.into(),
                width: 2,
                label: Some(view.segment.legend_label()),
            })
            .collect(),
        boundaries: boundaries(views),
        x_ticks: year_ticks(&style.x_tick_years),
        y_ticks: style.y_ticks.clone(),
        show_y_labels: true,
        legend: !views.is_empty(),
        foreground: BLACK,
        font_size: 12,
        margin: 10,
        label_area: (44, 28),
    };
    draw_panel(&bottom, &overlay)
}

fn tick_range(ticks: &[f64]) -> std::ops::Range<f64> {
    let lo = ticks.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = ticks.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo.is_finite() && hi.is_finite() && hi > lo {
        lo..hi
    } else {
        0.0..1.0
    }
}
