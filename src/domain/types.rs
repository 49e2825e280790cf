//! Shared domain types.
//!
//! These types flow through the pipeline left to right:
//!
//! - `RawTable` (strings, as read from disk or generated)
//! - `TypedObservation` (dates parsed, values coerced or absent)
//! - `CleanSeries` / `SmoothedSeries` (immutable, chronologically ordered)
//! - `Segment` (date windows used for presentation)

use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Rolling window used by the reference chart.
pub const DEFAULT_WINDOW: usize = 30;

/// Target column used by the reference chart.
pub const DEFAULT_CURRENCY: &str = "us_dollar";

/// How non-numeric cells that are not the `-` sentinel are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CoercionPolicy {
    /// Treat any unparseable cell as a missing observation.
    #[default]
    Lenient,
    /// Abort the run on the first unparseable cell.
    Strict,
}

/// One raw input row: string cells aligned with `RawTable::headers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// 1-based line number in the source file (header is line 1).
    pub line: usize,
    pub cells: Vec<String>,
}

impl RawRecord {
    pub fn new(line: usize, cells: Vec<String>) -> Self {
        Self { line, cells }
    }

    /// Cell at `idx`, or `""` for short (ragged) rows.
    pub fn cell(&self, idx: usize) -> &str {
        self.cells.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// The loosely typed input table: raw labels plus rows in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// A date with its coerced rate; `value` is `None` for missing observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypedObservation {
    pub time: NaiveDate,
    pub value: Option<f64>,
}

/// An observation that survived cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanPoint {
    pub time: NaiveDate,
    pub value: f64,
}

/// Chronologically ordered observations, every one with a value.
///
/// Only the assembler constructs a `CleanSeries`, which is how the ordering
/// and completeness guarantees are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanSeries {
    points: Vec<CleanPoint>,
}

impl CleanSeries {
    pub(crate) fn from_sorted(points: Vec<CleanPoint>) -> Self {
        debug_assert!(points.windows(2).all(|w| w[0].time <= w[1].time));
        Self { points }
    }

    pub fn points(&self) -> &[CleanPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.time)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.time)
    }
}

/// A clean observation plus its trailing moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SmoothedPoint {
    pub time: NaiveDate,
    pub value: f64,
    pub rolling_value: Option<f64>,
}

/// `CleanSeries` with a rolling mean attached to each point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SmoothedSeries {
    window: usize,
    points: Vec<SmoothedPoint>,
}

impl SmoothedSeries {
    pub(crate) fn new(window: usize, points: Vec<SmoothedPoint>) -> Self {
        Self { window, points }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn points(&self) -> &[SmoothedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(time, rolling_value)` pairs where the rolling value is defined.
    pub fn rolling(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.rolling_value.map(|r| (p.time, r)))
    }
}

/// An sRGB color for a segment trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(0, 0, 255);
    pub const GREEN: Rgb = Rgb(0, 128, 0);
    pub const ORANGE: Rgb = Rgb(255, 165, 0);
    pub const GRAY: Rgb = Rgb(128, 128, 128);
}

/// A named date window `[start, end)` used for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Panel title.
    pub label: String,
    /// Short name for the overlay legend; falls back to `label`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub color: Rgb,
}

impl Segment {
    pub fn legend_label(&self) -> &str {
        self.legend.as_deref().unwrap_or(&self.label)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Read-only view of the smoothed points falling inside one segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentView<'a> {
    pub segment: &'a Segment,
    pub points: &'a [SmoothedPoint],
}

impl SegmentView<'_> {
    pub fn rolling(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.rolling_value.map(|r| (p.time, r)))
    }
}

/// Figure styling handed to the renderers. Nothing here is process-global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub footer: Option<String>,
    /// Color of the faint full-series line drawn behind each segment panel.
    pub base_color: Rgb,
    pub base_opacity: f64,
    /// Rate values labelled on the y axis; ticks outside the data range are skipped.
    pub y_ticks: Vec<f64>,
    /// Years labelled on the x axis of the overlay panel.
    pub x_tick_years: Vec<i32>,
    /// Years labelled on the x axis of the per-segment panels.
    pub panel_x_tick_years: Vec<i32>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            title: "EURO-USD Exchange Rates Under the Presidency of George W. Bush, \
                    Barrack Obama and the First Term of Donald Trump"
                .to_string(),
            footer: None,
            base_color: Rgb::GRAY,
            base_opacity: 0.5,
            y_ticks: vec![0.8, 1.0, 1.2, 1.4, 1.6],
            x_tick_years: vec![2000, 2005, 2009, 2013, 2017, 2021],
            panel_x_tick_years: vec![2000, 2009, 2017, 2021],
        }
    }
}

/// Everything the renderers need besides the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub segments: Vec<Segment>,
    pub style: ChartStyle,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            style: ChartStyle::default(),
        }
    }
}

/// The three presidential terms shown by the reference chart.
pub fn default_segments() -> Vec<Segment> {
    let jan1 = |y: i32| NaiveDate::from_ymd_opt(y, 1, 1).unwrap_or(NaiveDate::MIN);
    vec![
        Segment {
            label: "George Bush (2000 - 2008)".to_string(),
            legend: Some("Bush".to_string()),
            start: jan1(1999),
            end: jan1(2009),
            color: Rgb::BLUE,
        },
        Segment {
            label: "Barrack Obama (2009 - 2016)".to_string(),
            legend: Some("Obama".to_string()),
            start: jan1(2009),
            end: jan1(2017),
            color: Rgb::GREEN,
        },
        Segment {
            label: "Donald Trump (2017 - 2020)".to_string(),
            legend: Some("Trump".to_string()),
            start: jan1(2017),
            end: jan1(2021),
            color: Rgb::ORANGE,
        },
    ]
}

/// Where the raw table comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    File(PathBuf),
    /// Seeded synthetic data in the source file format.
    Sample { seed: u64, start: NaiveDate, days: usize },
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env`).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: InputSource,
    /// Normalized name of the rate column to analyse.
    pub currency: String,
    pub window: usize,
    pub policy: CoercionPolicy,
    pub chart: ChartConfig,
}

/// Date as a fractional year, used as the x coordinate of every chart.
pub fn decimal_year(date: NaiveDate) -> f64 {
    let year = date.year();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366.0
    } else {
        365.0
    };
    year as f64 + date.ordinal0() as f64 / days_in_year
}
