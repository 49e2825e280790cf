//! Shared pipeline logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load raw table -> assemble clean series -> smooth -> validate segments
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::data::{SampleConfig, generate_sample};
use crate::domain::{InputSource, RawTable, RunConfig, SegmentView, SmoothedSeries};
use crate::error::AppError;
use crate::series::{Assembled, assemble, select_all, smooth, validate_segments};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub assembled: Assembled,
    pub smoothed: SmoothedSeries,
}

impl RunOutput {
    /// Segment views over the smoothed series, in config order.
    pub fn views<'a>(&'a self, config: &'a RunConfig) -> Vec<SegmentView<'a>> {
        select_all(&self.smoothed, &config.chart.segments)
    }
}

/// Load the configured input and run the full pipeline.
pub fn run_pipeline(config: &RunConfig) -> Result<RunOutput, AppError> {
    let table = load_table(&config.input)?;
    run_pipeline_with_table(config, &table)
}

/// Execute the pipeline on an already-loaded table.
///
/// This is useful for the TUI where we want to re-smooth without re-reading.
pub fn run_pipeline_with_table(config: &RunConfig, table: &RawTable) -> Result<RunOutput, AppError> {
    validate_segments(&config.chart.segments)?;

    let assembled = assemble(table, &config.currency, config.policy)?;
    if assembled.series.is_empty() {
        log::warn!("no `{}` observations remain after cleaning", assembled.column);
    }

    let smoothed = smooth(&assembled.series, config.window)?;

    Ok(RunOutput { assembled, smoothed })
}

/// Read the raw table from a file or generate a synthetic one.
pub fn load_table(input: &InputSource) -> Result<RawTable, AppError> {
    match input {
        InputSource::File(path) => crate::io::read_raw_table(path),
        InputSource::Sample { seed, start, days } => {
            log::info!("generating synthetic sample (seed={seed}, start={start}, days={days})");
            generate_sample(&SampleConfig {
                seed: *seed,
                start: *start,
                days: *days,
                ..SampleConfig::default()
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartConfig, CoercionPolicy, RawRecord};
    use chrono::NaiveDate;

    fn config(input: InputSource) -> RunConfig {
        RunConfig {
            input,
            currency: "us_dollar".to_string(),
            window: 2,
            policy: CoercionPolicy::Lenient,
            chart: ChartConfig::default(),
        }
    }

    fn reference_table() -> RawTable {
        let rows = [("1999-01-06", "1.1790"), ("1999-01-05", "-"), ("1999-01-04", "1.1789")];
        RawTable {
            headers: vec!["Period\\Unit:".to_string(), "[US dollar ]".to_string()],
            records: rows
                .iter()
                .enumerate()
                .map(|(i, (t, v))| RawRecord::new(i + 2, vec![t.to_string(), v.to_string()]))
                .collect(),
        }
    }

    #[test]
    fn reference_scenario_end_to_end() {
        let cfg = config(InputSource::File("unused.csv".into()));
        let run = run_pipeline_with_table(&cfg, &reference_table()).unwrap();

        assert_eq!(run.assembled.rows_used(), 2);
        let rolling: Vec<_> = run.smoothed.points().iter().map(|p| p.rolling_value).collect();
        assert_eq!(rolling[0], None);
        assert!((rolling[1].unwrap() - 1.17895).abs() < 1e-12);

        // All dates are 1999, so only the first default segment sees them.
        let views = run.views(&cfg);
        assert_eq!(views[0].points.len(), 2);
        assert!(views[1].points.is_empty());
    }

    #[test]
    fn headers_only_aborts_with_data_exit_code() {
        let cfg = config(InputSource::File("unused.csv".into()));
        let table = RawTable {
            headers: reference_table().headers,
            records: Vec::new(),
        };
        let err = run_pipeline_with_table(&cfg, &table).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn sample_source_runs_with_default_window() {
        let mut cfg = config(InputSource::Sample {
            seed: 1,
            start: NaiveDate::from_ymd_opt(2008, 6, 2).unwrap(),
            days: 120,
        });
        cfg.window = 30;
        let run = run_pipeline(&cfg).unwrap();
        assert!(run.smoothed.len() > 30);
        assert_eq!(run.smoothed.rolling().count(), run.smoothed.len() - 29);
    }
}
