//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - rolling mean inside segment `i`: `SEGMENT_GLYPHS[i % 4]`
//! - rolling mean outside every segment: `.`

use crate::domain::{SegmentView, SmoothedSeries, decimal_year};

/// Glyphs cycled across segments, in config order.
pub const SEGMENT_GLYPHS: [char; 4] = ['#', '*', '+', 'o'];
const BASE_GLYPH: char = '.';

/// Render the rolling mean with segment highlights.
pub fn render_ascii_plot(
    series: &SmoothedSeries,
    views: &[SegmentView<'_>],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let base: Vec<(f64, f64)> = series
        .rolling()
        .map(|(t, v)| (decimal_year(t), v))
        .collect();

    let Some((x_min, x_max)) = span(base.iter().map(|p| p.0)) else {
        return "Plot: (no rolling values)\n".to_string();
    };
    let (y_min, y_max) = span(base.iter().map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let frame = Frame {
        x_min,
        x_max,
        y_min,
        y_max,
    };

    // Segments first; the base line only fills cells left blank.
    for (i, view) in views.iter().enumerate() {
        let pts: Vec<(f64, f64)> = view.rolling().map(|(t, v)| (decimal_year(t), v)).collect();
        draw_polyline(&mut grid, &pts, &frame, SEGMENT_GLYPHS[i % SEGMENT_GLYPHS.len()]);
    }
    draw_polyline(&mut grid, &base, &frame, BASE_GLYPH);

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: time=[{x_min:.2}, {x_max:.2}] | rolling mean (w={})=[{y_min:.4}, {y_max:.4}]\n",
        series.window()
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    let mut legend: Vec<String> = views
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{} {}", SEGMENT_GLYPHS[i % SEGMENT_GLYPHS.len()], v.segment.legend_label()))
        .collect();
    legend.push(format!("{BASE_GLYPH} other"));
    out.push_str(&format!("Legend: {}\n", legend.join("  ")));

    out
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

/// Min/max of finite values, widened when all values are equal.
fn span(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    if !(min.is_finite() && max.is_finite()) {
        return None;
    }
    if max - min < 1e-12 {
        return Some((min - 0.5, max + 0.5));
    }
    Some((min, max))
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, frame: &Frame, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - frame.x_min) / (frame.x_max - frame.x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, frame: &Frame, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - frame.y_min) / (frame.y_max - frame.y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], pts: &[(f64, f64)], frame: &Frame, ch: char) {
    let height = grid.len();
    let width = grid.first().map_or(0, Vec::len);
    if width == 0 {
        return;
    }

    let mut prev = None;
    for &(x, y) in pts {
        let cx = map_x(x, frame, width);
        let cy = map_y(y, frame, height);
        match prev {
            Some((x0, y0)) => draw_line(grid, x0, y0, cx, cy, ch),
            None => draw_line(grid, cx, cy, cx, cy, ch),
        }
        prev = Some((cx, cy));
    }
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CleanPoint, CleanSeries, default_segments};
    use crate::series::{select_all, smooth};
    use chrono::NaiveDate;

    fn series(points: &[(i32, f64)]) -> SmoothedSeries {
        let clean = CleanSeries::from_sorted(
            points
                .iter()
                .map(|&(y, value)| CleanPoint {
                    time: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
                    value,
                })
                .collect(),
        );
        smooth(&clean, 1).unwrap()
    }

    #[test]
    fn segment_glyphs_mark_endpoints() {
        let smoothed = series(&[(2009, 1.0), (2010, 2.0)]);
        let segments = default_segments();
        let views = select_all(&smoothed, &segments);

        let txt = render_ascii_plot(&smoothed, &views, 10, 5);
        let lines: Vec<&str> = txt.lines().collect();

        assert_eq!(lines.len(), 1 + 5 + 1);
        assert!(lines[0].starts_with("Plot: time=[2009.00, 2010.00]"));
        let grid: Vec<Vec<char>> = lines[1..6].iter().map(|l| l.chars().collect()).collect();
        assert_eq!(grid[4][0], '*');
        assert_eq!(grid[0][9], '*');
        assert!(grid.iter().flatten().all(|&c| c == ' ' || c == '*'));
        assert_eq!(lines[6], "Legend: # Bush  * Obama  + Trump  . other");
    }

    #[test]
    fn points_outside_segments_use_base_glyph() {
        let smoothed = series(&[(1990, 1.0), (1991, 1.5), (1992, 2.0)]);
        let txt = render_ascii_plot(&smoothed, &[], 12, 6);
        let grid: String = txt.lines().skip(1).take(6).collect();
        assert!(grid.contains(BASE_GLYPH));
        assert!(!grid.contains('#'));
    }

    #[test]
    fn no_rolling_values_gives_placeholder() {
        let clean = CleanSeries::from_sorted(vec![CleanPoint {
            time: NaiveDate::from_ymd_opt(2000, 1, 3).unwrap(),
            value: 1.0,
        }]);
        let smoothed = smooth(&clean, 30).unwrap();
        assert_eq!(render_ascii_plot(&smoothed, &[], 20, 5), "Plot: (no rolling values)\n");
    }
}
