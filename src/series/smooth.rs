//! Trailing moving average.
//!
//! Each mean is recomputed from its own window rather than from a running sum,
//! so long series do not accumulate floating-point drift. Windows are
//! independent and read-only, which lets rayon spread them across threads.

use rayon::prelude::*;

use crate::domain::{CleanSeries, SmoothedPoint, SmoothedSeries};
use crate::error::PipelineError;

/// Attach a `window`-observation trailing mean to every point.
///
/// The first `window - 1` points have no rolling value. A series shorter than
/// `window` comes back with no rolling values at all.
pub fn smooth(series: &CleanSeries, window: usize) -> Result<SmoothedSeries, PipelineError> {
    if window == 0 {
        return Err(PipelineError::InvalidWindow);
    }

    let values: Vec<f64> = series.values().collect();
    let means = rolling_means(&values, window);
    let warmup = values.len() - means.len();

    let points = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| SmoothedPoint {
            time: p.time,
            value: p.value,
            rolling_value: i.checked_sub(warmup).map(|j| means[j]),
        })
        .collect();

    log::debug!(
        "smoothed {} points with window {window} ({} defined)",
        values.len(),
        means.len()
    );

    Ok(SmoothedSeries::new(window, points))
}

/// Mean of every full trailing window; `len - window + 1` entries (or none).
pub fn rolling_means(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.len() < window {
        return Vec::new();
    }
    values.par_windows(window).map(mean).collect()
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
