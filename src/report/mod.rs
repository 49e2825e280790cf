//! Reporting utilities: per-segment statistics and formatted terminal output.

use chrono::NaiveDate;

use crate::domain::SegmentView;

pub mod format;

pub use format::*;

/// Summary of the rolling mean inside one segment.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStats {
    pub label: String,
    /// Points inside the segment (with or without a rolling value).
    pub n_points: usize,
    /// Points with a defined rolling value.
    pub n_rolling: usize,
    pub mean: f64,
    pub min: (NaiveDate, f64),
    pub max: (NaiveDate, f64),
    pub first: (NaiveDate, f64),
    pub last: (NaiveDate, f64),
}

impl SegmentStats {
    /// Relative change of the rolling mean from first to last, in percent.
    pub fn change_pct(&self) -> f64 {
        (self.last.1 / self.first.1 - 1.0) * 100.0
    }
}

/// Compute stats for a segment view; `None` if it has no rolling values.
pub fn segment_stats(view: &SegmentView<'_>) -> Option<SegmentStats> {
    let mut rolling = view.rolling();
    let first = rolling.next()?;

    let (mut min, mut max, mut last) = (first, first, first);
    let mut sum = first.1;
    let mut n = 1usize;
    for point in rolling {
        if point.1 < min.1 {
            min = point;
        }
        if point.1 > max.1 {
            max = point;
        }
        sum += point.1;
        n += 1;
        last = point;
    }

    Some(SegmentStats {
        label: view.segment.label.clone(),
        n_points: view.points.len(),
        n_rolling: n,
        mean: sum / n as f64,
        min,
        max,
        first,
        last,
    })
}
