//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{InputSource, RunConfig, SegmentView, SmoothedPoint};
use crate::report::segment_stats;

/// Format the run summary: input, cleaning counts, and head/tail rows.
pub fn format_run_summary(run: &RunOutput, config: &RunConfig, head: usize) -> String {
    let mut out = String::new();
    let assembled = &run.assembled;

    out.push_str("=== exrate - exchange-rate trend ===\n");
    match &config.input {
        InputSource::File(path) => out.push_str(&format!("Input: {}\n", path.display())),
        InputSource::Sample { seed, start, days } => out.push_str(&format!(
            "Input: synthetic sample (seed={seed}, start={start}, days={days})\n"
        )),
    }
    out.push_str(&format!(
        "Column: {} | policy: {:?} | window: {}\n",
        assembled.column,
        config.policy,
        run.smoothed.window()
    ));
    out.push_str(&format!(
        "Rows: read={} used={} dropped={}\n",
        assembled.rows_read,
        assembled.rows_used(),
        assembled.dropped.len()
    ));

    match (assembled.series.first_date(), assembled.series.last_date()) {
        (Some(first), Some(last)) => out.push_str(&format!("Range: {first} .. {last}\n")),
        _ => out.push_str("Range: (no observations)\n"),
    }

    if !assembled.dropped.is_empty() {
        let mut reasons: Vec<(&str, usize)> = Vec::new();
        for d in &assembled.dropped {
            let reason = d.reason.describe();
            match reasons.iter_mut().find(|(r, _)| *r == reason) {
                Some((_, count)) => *count += 1,
                None => reasons.push((reason, 1)),
            }
        }
        let parts: Vec<String> = reasons.iter().map(|(r, n)| format!("{n} x {r}")).collect();
        out.push_str(&format!("Dropped: {}\n", parts.join(", ")));
    }

    let points = run.smoothed.points();
    if head > 0 && !points.is_empty() {
        out.push_str(&format!("\nFirst {} rows:\n", head.min(points.len())));
        out.push_str(&format_rows(&points[..head.min(points.len())], &assembled.column));
        out.push_str(&format!("\nLast {} rows:\n", head.min(points.len())));
        out.push_str(&format_rows(&points[points.len().saturating_sub(head)..], &assembled.column));
    }

    out
}

/// Per-segment statistics table.
pub fn format_segment_table(views: &[SegmentView<'_>]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<30} {:>6} {:>8} {:>8} {:>8} {:>8} {:>8}\n",
            "segment", "n", "mean", "min", "max", "last", "chg%"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!("{:-<30} {:-<6} {:-<8} {:-<8} {:-<8} {:-<8} {:-<8}\n", "", "", "", "", "", "", "")
            .trim_end(),
    );
    out.push('\n');

    for view in views {
        let label = truncate(&view.segment.label, 30);
        match segment_stats(view) {
            Some(s) => out.push_str(&format!(
                "{:<30} {:>6} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>+8.2}\n",
                label,
                s.n_points,
                s.mean,
                s.min.1,
                s.max.1,
                s.last.1,
                s.change_pct()
            )),
            None => out.push_str(&format!("{:<30} {:>6} (no rolling values)\n", label, view.points.len())),
        }
    }

    out
}

fn format_rows(points: &[SmoothedPoint], column: &str) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<12} {:>12} {:>14}\n", "time", truncate(column, 12), "rolling_mean").trim_end());
    out.push('\n');
    for p in points {
        let rolling = p
            .rolling_value
            .map(|v| format!("{v:.6}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!("{:<12} {:>12.4} {:>14}\n", p.time.to_string(), p.value, rolling));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
