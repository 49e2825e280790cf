//! One chart panel, drawn on any Plotters backend.
//!
//! The SVG figure and the TUI widget both describe their panels with `Panel`
//! and hand them to `draw_panel`, so the two outputs cannot drift apart.

use std::ops::Range;

use plotters::coord::Shift;
use plotters::coord::combinators::BindKeyPoints;
use plotters::prelude::*;

use crate::domain::{Rgb, SegmentView, SmoothedSeries, decimal_year};

/// A colored line with an optional legend entry.
#[derive(Debug, Clone)]
pub struct Trace<'a> {
    pub points: Vec<(f64, f64)>,
    pub color: RGBColor,
    pub width: u32,
    pub label: Option<&'a str>,
}

/// A render-only panel description.
///
/// All series and bounds are computed before drawing, which keeps
/// `draw_panel` focused on drawing and makes the data prep testable.
pub struct Panel<'a> {
    pub title: Option<(&'a str, RGBColor)>,
    /// X bounds (decimal years).
    pub x_range: Range<f64>,
    /// Y bounds (rate units).
    pub y_range: Range<f64>,
    /// Faint full-series line drawn underneath the traces.
    pub base: Option<(&'a [(f64, f64)], RGBAColor)>,
    pub traces: Vec<Trace<'a>>,
    /// X positions of thin vertical separator lines.
    pub boundaries: Vec<f64>,
    /// Labelled x positions; empty (or all out of range) means evenly spaced.
    pub x_ticks: Vec<f64>,
    /// Labelled y positions, same fallback as `x_ticks`.
    pub y_ticks: Vec<f64>,
    pub show_y_labels: bool,
    pub legend: bool,
    pub foreground: RGBColor,
    pub font_size: u32,
    pub margin: u32,
    /// `(left, bottom)` label area sizes in backend units.
    pub label_area: (u32, u32),
}

impl From<Rgb> for RGBColor {
    fn from(c: Rgb) -> Self {
        RGBColor(c.0, c.1, c.2)
    }
}

/// Draw `panel` into `area`.
pub fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(panel.margin)
        .set_label_area_size(LabelAreaPosition::Left, panel.label_area.0)
        .set_label_area_size(LabelAreaPosition::Bottom, panel.label_area.1);
    if let Some((title, color)) = panel.title {
        builder.caption(title, ("sans-serif", panel.font_size + 2).into_font().color(&color));
    }
    let x_keys = key_points(&panel.x_range, &panel.x_ticks);
    let y_keys = key_points(&panel.y_range, &panel.y_ticks);
    let (x_count, y_count) = (x_keys.len(), y_keys.len());
    let mut chart = builder.build_cartesian_2d(
        panel.x_range.clone().with_key_points(x_keys),
        panel.y_range.clone().with_key_points(y_keys),
    )?;

    let show_y = panel.show_y_labels;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(x_count)
        .y_labels(y_count)
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| if show_y { format!("{v:.2}") } else { String::new() })
        .label_style(("sans-serif", panel.font_size).into_font().color(&panel.foreground))
        .axis_style(&panel.foreground)
        .draw()?;

    if let Some((base, color)) = panel.base {
        chart.draw_series(LineSeries::new(base.iter().copied(), color.stroke_width(1)))?;
    }

    let (y0, y1) = (panel.y_range.start, panel.y_range.end);
    for &x in &panel.boundaries {
        if panel.x_range.contains(&x) {
            chart.draw_series(LineSeries::new(
                [(x, y0), (x, y1)],
                panel.foreground.mix(0.5).stroke_width(1),
            ))?;
        }
    }

    for trace in &panel.traces {
        let style = trace.color.stroke_width(trace.width);
        let drawn = chart.draw_series(LineSeries::new(trace.points.iter().copied(), style))?;
        if let Some(label) = trace.label {
            drawn
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], style));
        }
    }

    if panel.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", panel.font_size).into_font().color(&panel.foreground))
            .border_style(&panel.foreground)
            .draw()?;
    }

    Ok(())
}

const AUTO_TICKS: usize = 5;

/// Configured ticks inside `range`, or `AUTO_TICKS` evenly spaced ones.
pub fn key_points(range: &Range<f64>, configured: &[f64]) -> Vec<f64> {
    let mut keys: Vec<f64> = configured
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v >= range.start && *v <= range.end)
        .collect();
    if keys.is_empty() {
        let step = (range.end - range.start) / (AUTO_TICKS - 1) as f64;
        keys = (0..AUTO_TICKS).map(|i| range.start + step * i as f64).collect();
    }
    keys.sort_by(f64::total_cmp);
    keys.dedup();
    keys
}

/// Years as x coordinates.
pub fn year_ticks(years: &[i32]) -> Vec<f64> {
    years.iter().map(|&y| f64::from(y)).collect()
}

/// `(decimal year, rolling mean)` pairs for the whole series.
pub fn rolling_xy(series: &SmoothedSeries) -> Vec<(f64, f64)> {
    series
        .rolling()
        .map(|(t, v)| (decimal_year(t), v))
        .collect()
}

/// `(decimal year, rolling mean)` pairs for one segment.
pub fn view_xy(view: &SegmentView<'_>) -> Vec<(f64, f64)> {
    view.rolling().map(|(t, v)| (decimal_year(t), v)).collect()
}

/// X bounds covering every observation (not only those with a rolling value).
pub fn x_bounds(series: &SmoothedSeries) -> Range<f64> {
    let points = series.points();
    match (points.first(), points.last()) {
        (Some(first), Some(last)) if last.time > first.time => {
            decimal_year(first.time)..decimal_year(last.time)
        }
        (Some(only), _) => {
            let x = decimal_year(only.time);
            x - 0.5..x + 0.5
        }
        _ => 0.0..1.0,
    }
}

/// Y bounds of the rolling mean padded by 5%; `fallback` when nothing is defined.
pub fn y_bounds(points: &[(f64, f64)], fallback: Range<f64>) -> Range<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in points {
        lo = lo.min(y);
        hi = hi.max(y);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return fallback;
    }
    let pad = ((hi - lo).abs() * 0.05).max(1e-6);
    lo - pad..hi + pad
}

/// Start and end of one segment as decimal years.
pub fn own_boundaries(view: &SegmentView<'_>) -> Vec<f64> {
    vec![decimal_year(view.segment.start), decimal_year(view.segment.end)]
}

/// Segment boundaries as decimal years, deduplicated and sorted.
pub fn boundaries(views: &[SegmentView<'_>]) -> Vec<f64> {
    let mut out: Vec<f64> = views
        .iter()
        .flat_map(|v| [decimal_year(v.segment.start), decimal_year(v.segment.end)])
        .collect();
    out.sort_by(f64::total_cmp);
    out.dedup();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CleanPoint, CleanSeries, default_segments};
    use crate::series::{select_all, smooth};
    use chrono::NaiveDate;

    fn smoothed() -> SmoothedSeries {
        let start = NaiveDate::from_ymd_opt(2008, 12, 29).unwrap();
        let clean = CleanSeries::from_sorted(
            (0..6)
                .map(|i| CleanPoint {
                    time: start + chrono::Days::new(i),
                    value: 1.0 + i as f64 * 0.1,
                })
                .collect(),
        );
        smooth(&clean, 2).unwrap()
    }

    #[test]
    fn rolling_xy_skips_warmup() {
        let xy = rolling_xy(&smoothed());
        assert_eq!(xy.len(), 5);
        assert!((xy[0].1 - 1.05).abs() < 1e-12);
    }

    #[test]
    fn default_boundaries_are_term_starts() {
        let s = smoothed();
        let segments = default_segments();
        let views = select_all(&s, &segments);
        assert_eq!(boundaries(&views), vec![1999.0, 2009.0, 2017.0, 2021.0]);
    }

    #[test]
    fn y_bounds_pad_or_fall_back() {
        let r = y_bounds(&[(0.0, 1.0), (1.0, 2.0)], 0.0..1.0);
        assert!((r.start - 0.95).abs() < 1e-12 && (r.end - 2.05).abs() < 1e-12);
        assert_eq!(y_bounds(&[], 0.8..1.6), 0.8..1.6);
    }

    #[test]
    fn key_points_keep_configured_ticks_in_range() {
        let r = 1999.5..2021.0;
        assert_eq!(key_points(&r, &year_ticks(&[2021, 1990, 2009])), vec![2009.0, 2021.0]);
        assert_eq!(key_points(&(0.0..1.0), &[]), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(key_points(&(100.0..140.0), &[0.8, 1.6]).len(), AUTO_TICKS);
    }

    #[test]
    fn own_boundaries_are_segment_edges() {
        let s = smoothed();
        let segments = default_segments();
        let views = select_all(&s, &segments);
        assert_eq!(own_boundaries(&views[1]), vec![2009.0, 2017.0]);
    }

    #[test]
    fn x_bounds_span_all_points() {
        let r = x_bounds(&smoothed());
        assert!(r.start < 2009.0 && r.end > 2009.0);
        assert_eq!(x_bounds(&SmoothedSeries::default()), 0.0..1.0);
    }
}
