//! Raw table → `CleanSeries`.
//!
//! Steps, in order:
//! 1. normalize headers and locate `time` + the target rate column
//! 2. parse every date (any failure aborts the run)
//! 3. stable sort by date
//! 4. coerce rates and drop rows without a value
//!
//! Missing observations (`-` on non-trading days) are excluded rather than
//! interpolated.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::domain::{CleanPoint, CleanSeries, CoercionPolicy, RawTable, TypedObservation};
use crate::error::PipelineError;
use crate::series::coerce::{Absence, Coerced, coerce_value, parse_date};
use crate::series::columns::normalize_columns;

/// Name every time column is normalized to.
pub const TIME_COLUMN: &str = "time";

/// A row excluded by the missing-value policy.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRow {
    pub line: usize,
    pub time: NaiveDate,
    pub raw: String,
    pub reason: Absence,
}

/// Assembler output: the clean series plus what was removed on the way.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub series: CleanSeries,
    /// Normalized name of the projected rate column.
    pub column: String,
    pub rows_read: usize,
    pub dropped: Vec<DroppedRow>,
}

impl Assembled {
    pub fn rows_used(&self) -> usize {
        self.series.len()
    }
}

/// Project, sort, coerce and filter `table` into a `CleanSeries`.
///
/// `target` is compared against normalized column names (e.g. `us_dollar`).
pub fn assemble(
    table: &RawTable,
    target: &str,
    policy: CoercionPolicy,
) -> Result<Assembled, PipelineError> {
    let (column, rows) = typed_rows(table, target, policy)?;

    let mut points = Vec::with_capacity(rows.len());
    let mut dropped = Vec::new();
    for row in rows {
        let TypedObservation { time, value } = row.observation;
        match (value, row.absence) {
            (Some(value), _) => points.push(CleanPoint { time, value }),
            (None, reason) => dropped.push(DroppedRow {
                line: row.line,
                time,
                raw: row.raw.to_string(),
                reason: reason.unwrap_or(Absence::Unparseable),
            }),
        }
    }

    log::info!(
        "assembled `{column}`: {} rows read, {} kept, {} dropped",
        table.records.len(),
        points.len(),
        dropped.len()
    );

    Ok(Assembled {
        series: CleanSeries::from_sorted(points),
        column,
        rows_read: table.records.len(),
        dropped,
    })
}

/// Typed view of the projected column before filtering (dates parsed,
/// values coerced or absent), in sorted order.
pub fn typed_observations(
    table: &RawTable,
    target: &str,
    policy: CoercionPolicy,
) -> Result<Vec<TypedObservation>, PipelineError> {
    let (_, rows) = typed_rows(table, target, policy)?;
    Ok(rows.into_iter().map(|row| row.observation).collect())
}

/// One projected row after typing, with enough provenance to report drops.
struct TypedRow<'t> {
    line: usize,
    raw: &'t str,
    observation: TypedObservation,
    absence: Option<Absence>,
}

/// Shared by `assemble` and `typed_observations`: returns the normalized
/// target column name and the typed rows sorted by date.
fn typed_rows<'t>(
    table: &'t RawTable,
    target: &str,
    policy: CoercionPolicy,
) -> Result<(String, Vec<TypedRow<'t>>), PipelineError> {
    if table.records.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let columns = normalize_columns(&table.headers);
    let time_idx = find_column(&columns, TIME_COLUMN)?;
    let value_idx = find_column(&columns, target)?;
    let column = columns[value_idx].clone();

    // Project to (line, time, raw value). Dates are mandatory.
    let mut projected = table
        .records
        .iter()
        .map(|rec| {
            let time = parse_date(rec.cell(time_idx), rec.line)?;
            Ok((rec.line, time, rec.cell(value_idx)))
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    // `sort_by_key` is stable: equal dates keep their file order.
    projected.sort_by_key(|&(_, time, _)| time);

    // Each cell is independent, so coerce in parallel; `collect` keeps order.
    let rows = projected
        .par_iter()
        .map(|&(line, time, raw)| {
            let coerced = coerce_value(raw, policy, &column, line)?;
            let absence = match coerced {
                Coerced::Value(_) => None,
                Coerced::Absent(reason) => Some(reason),
            };
            Ok(TypedRow {
                line,
                raw,
                observation: TypedObservation { time, value: coerced.value() },
                absence,
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok((column, rows))
}

fn find_column(columns: &[String], name: &str) -> Result<usize, PipelineError> {
    columns
        .iter()
        .position(|c| c == name)
        .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
}
