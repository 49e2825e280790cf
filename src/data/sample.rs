//! Synthetic exchange-rate tables in the source file format.
//!
//! The generator mimics the reference-rate history file closely enough to
//! exercise the whole pipeline without the real dataset:
//! - legacy labels (`Period\Unit:`, `[US dollar ]`, ...)
//! - newest rows first
//! - weekdays only, with `-` on market holidays
//! - a currency that only starts quoting part-way through (empty cells before)

use chrono::{Datelike, Days, NaiveDate, Weekday};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{RawRecord, RawTable};
use crate::error::AppError;

/// `(raw label, starting rate, daily log-vol)` for each generated column.
const CURRENCIES: &[(&str, f64, f64)] = &[
    ("[Australian dollar ]", 1.91, 0.0065),
    ("[Japanese yen ]", 133.73, 0.0068),
    ("[UK pound sterling ]", 0.7111, 0.0050),
    ("[US dollar ]", 1.1789, 0.0055),
];

/// Quoted only after `LATE_START_FRACTION` of the sample period.
const LATE_CURRENCY: (&str, f64, f64) = ("[Icelandic krona ]", 137.5, 0.0080);
const LATE_START_FRACTION: f64 = 0.6;

/// TARGET closing days that every year shows as `-`.
const FIXED_HOLIDAYS: &[(u32, u32)] = &[(1, 1), (5, 1), (12, 25), (12, 26)];

#[derive(Debug, Clone, PartialEq)]
pub struct SampleConfig {
    pub seed: u64,
    pub start: NaiveDate,
    /// Calendar days covered (weekends are skipped, so rows < days).
    pub days: usize,
    /// Probability that a weekday is an unscheduled closing day.
    pub closure_prob: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            start: NaiveDate::from_ymd_opt(1999, 1, 4).unwrap_or(NaiveDate::MIN),
            days: 22 * 365,
            closure_prob: 0.004,
        }
    }
}

/// Generate a raw table (strings only) as the file reader would produce it.
pub fn generate_sample(config: &SampleConfig) -> Result<RawTable, AppError> {
    if config.days == 0 {
        return Err(AppError::new(2, "Sample must cover at least one day."));
    }
    if !(0.0..1.0).contains(&config.closure_prob) {
        return Err(AppError::new(2, "Sample closure probability must be in [0, 1)."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut levels: Vec<f64> = CURRENCIES.iter().map(|c| c.1).collect();
    let mut late_level = LATE_CURRENCY.1;
    let late_start = (config.days as f64 * LATE_START_FRACTION) as usize;

    let mut rows: Vec<Vec<String>> = Vec::new();
    for offset in 0..config.days {
        let Some(date) = config.start.checked_add_days(Days::new(offset as u64)) else {
            break;
        };
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            continue;
        }

        let closed = is_fixed_holiday(date) || rng.r#gen::<f64>() < config.closure_prob;

        let mut row = Vec::with_capacity(CURRENCIES.len() + 2);
        row.push(date.format("%Y-%m-%d").to_string());
        for (level, &(_, _, vol)) in levels.iter_mut().zip(CURRENCIES) {
            row.push(if closed {
                "-".to_string()
            } else {
                *level *= (vol * normal.sample(&mut rng)).exp();
                format_rate(*level)
            });
        }

        row.push(if offset < late_start {
            String::new()
        } else if closed {
            "-".to_string()
        } else {
            late_level *= (LATE_CURRENCY.2 * normal.sample(&mut rng)).exp();
            format_rate(late_level)
        });

        rows.push(row);
    }

    // The published file lists the most recent day first.
    rows.reverse();

    let mut headers = vec!["Period\\Unit:".to_string()];
    headers.extend(CURRENCIES.iter().map(|c| c.0.to_string()));
    headers.push(LATE_CURRENCY.0.to_string());

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(idx, cells)| RawRecord::new(idx + 2, cells))
        .collect();

    Ok(RawTable { headers, records })
}

fn is_fixed_holiday(date: NaiveDate) -> bool {
    FIXED_HOLIDAYS
        .iter()
        .any(|&(m, d)| date.month() == m && date.day() == d)
}

/// Four decimals below 10, two above (as the reference file quotes them).
fn format_rate(v: f64) -> String {
    if v < 10.0 { format!("{v:.4}") } else { format!("{v:.2}") }
}
