//! Date-range views over a smoothed series.

use crate::domain::{Segment, SegmentView, SmoothedSeries};
use crate::error::PipelineError;

/// Reject segments whose window is empty or inverted.
pub fn validate_segments(segments: &[Segment]) -> Result<(), PipelineError> {
    for seg in segments {
        if seg.start >= seg.end {
            return Err(PipelineError::InvalidSegment {
                label: seg.label.clone(),
                start: seg.start,
                end: seg.end,
            });
        }
    }
    Ok(())
}

/// Borrow the points with `start <= time < end`.
///
/// The series is sorted by time, so the view is one contiguous slice.
pub fn select<'a>(series: &'a SmoothedSeries, segment: &'a Segment) -> SegmentView<'a> {
    let points = series.points();
    let lo = points.partition_point(|p| p.time < segment.start);
    let hi = points.partition_point(|p| p.time < segment.end).max(lo);
    debug_assert!(points[lo..hi].iter().all(|p| segment.contains(p.time)));
    SegmentView {
        segment,
        points: &points[lo..hi],
    }
}

/// One view per segment, in the given order.
pub fn select_all<'a>(series: &'a SmoothedSeries, segments: &'a [Segment]) -> Vec<SegmentView<'a>> {
    segments.iter().map(|seg| select(series, seg)).collect()
}
