//! Export the smoothed series to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{SmoothedPoint, SmoothedSeries};
use crate::error::AppError;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// JSON export schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub column: String,
    pub window: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub points: Vec<SmoothedPoint>,
}

/// Write `series` to `path` in the requested format.
pub fn write_series(
    path: &Path,
    series: &SmoothedSeries,
    column: &str,
    format: ExportFormat,
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export '{}': {e}", path.display())))?;
    match format {
        ExportFormat::Csv => write_series_csv(file, series, column),
        ExportFormat::Json => write_series_json(file, series, column),
    }?;
    log::info!("exported {} rows to {}", series.len(), path.display());
    Ok(())
}

/// CSV with header `time,<column>,rolling_mean`; undefined rolling values are empty.
pub fn write_series_csv<W: Write>(out: W, series: &SmoothedSeries, column: &str) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["time", column, "rolling_mean"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in series.points() {
        writer
            .write_record([
                p.time.to_string(),
                format!("{}", p.value),
                p.rolling_value.map(|v| format!("{v:.10}")).unwrap_or_default(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

pub fn write_series_json<W: Write>(out: W, series: &SmoothedSeries, column: &str) -> Result<(), AppError> {
    let file = SeriesFile {
        tool: "exrate".to_string(),
        column: column.to_string(),
        window: series.window(),
        first_date: series.points().first().map(|p| p.time),
        last_date: series.points().last().map(|p| p.time),
        points: series.points().to_vec(),
    };
    serde_json::to_writer_pretty(out, &file)
        .map_err(|e| AppError::new(2, format!("Failed to write export JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CleanPoint, CleanSeries};
    use crate::series::smooth;

    fn sample() -> SmoothedSeries {
        let d = |day| NaiveDate::from_ymd_opt(1999, 1, day).unwrap();
        let clean = CleanSeries::from_sorted(vec![
            CleanPoint { time: d(4), value: 1.1789 },
            CleanPoint { time: d(6), value: 1.179 },
        ]);
        smooth(&clean, 2).unwrap()
    }

    #[test]
    fn csv_leaves_warmup_rolling_empty() {
        let mut buf = Vec::new();
        write_series_csv(&mut buf, &sample(), "us_dollar").unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "time,us_dollar,rolling_mean");
        assert_eq!(lines[1], "1999-01-04,1.1789,");
        assert_eq!(lines[2], "1999-01-06,1.179,1.1789500000");
    }

    #[test]
    fn json_round_trips() {
        let mut buf = Vec::new();
        write_series_json(&mut buf, &sample(), "us_dollar").unwrap();
        let file: SeriesFile = serde_json::from_slice(&buf).unwrap();
        assert_eq!(file.window, 2);
        assert_eq!(file.points.len(), 2);
        assert_eq!(file.points[0].rolling_value, None);
        assert_eq!(file.last_date, NaiveDate::from_ymd_opt(1999, 1, 6));
    }

    #[test]
    fn writes_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        write_series(&path, &sample(), "us_dollar", ExportFormat::Csv).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("time,"));
    }
}
