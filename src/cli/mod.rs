//! Command-line parsing for the exchange-rate trend tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{DEFAULT_CURRENCY, DEFAULT_WINDOW};
use crate::io::ExportFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "exrate", version, about = "Exchange-rate cleaning, smoothing and segment charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean and smooth the series, then print a summary (and optional ASCII plot).
    Summary(SummaryArgs),
    /// Render the multi-panel segment chart to an SVG file.
    Render(RenderArgs),
    /// Export the smoothed series to CSV or JSON.
    Export(ExportArgs),
    /// Browse the segment panels in an interactive terminal UI.
    Tui(InputArgs),
    /// Write the default chart config (segments + style) as an editable template.
    Segments(SegmentsArgs),
}

/// Options shared by every command that runs the pipeline.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// Exchange-rate CSV (first row: raw column labels).
    #[arg(short, long, env = "EXRATE_INPUT", value_name = "CSV", required_unless_present = "sample")]
    pub input: Option<PathBuf>,

    /// Use a synthetic sample instead of an input file.
    ///
    /// Takes precedence over `--input`, so an `EXRATE_INPUT` left in the
    /// environment or `.env` does not block it.
    #[arg(long)]
    pub sample: bool,

    /// Random seed for the synthetic sample.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First calendar day of the synthetic sample.
    #[arg(long, default_value = "1999-01-04")]
    pub sample_start: NaiveDate,

    /// Calendar days covered by the synthetic sample.
    #[arg(long, default_value_t = 8036)]
    pub sample_days: usize,

    /// Normalized name of the rate column (e.g. `us_dollar`, `japanese_yen`).
    #[arg(short, long, env = "EXRATE_CURRENCY", default_value = DEFAULT_CURRENCY)]
    pub currency: String,

    /// Trailing moving-average window (observations).
    #[arg(short, long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Fail on non-numeric cells instead of treating them as missing.
    #[arg(long)]
    pub strict: bool,

    /// Chart config JSON (segments + style). Defaults to the presidential terms.
    #[arg(long, env = "EXRATE_CHART_CONFIG", value_name = "JSON")]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Rows shown from each end of the cleaned series.
    #[arg(long, default_value_t = 5)]
    pub head: usize,

    /// Render an ASCII plot of the rolling mean.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output SVG path.
    #[arg(short, long, default_value = "euro_usd_exchange_rates.svg")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}

#[derive(Debug, Args)]
pub struct SegmentsArgs {
    /// Where to write the template.
    #[arg(short, long, default_value = "chart.json")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn summary_with_sample_uses_defaults() {
        let cli = Cli::try_parse_from(["exrate", "summary", "--sample"]).unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert!(args.input.sample);
        assert_eq!(args.input.window, 30);
        assert_eq!(args.input.currency, "us_dollar");
        assert!(!args.input.strict);
    }

    #[test]
    fn sample_flag_wins_over_input_from_env() {
        // SAFETY: no other test depends on EXRATE_INPUT being unset; explicit
        // `-i` values override the environment.
        unsafe { std::env::set_var("EXRATE_INPUT", "rates.csv") };
        let parsed = Cli::try_parse_from(["exrate", "summary", "--sample"]);
        unsafe { std::env::remove_var("EXRATE_INPUT") };

        let Command::Summary(args) = parsed.unwrap().command else {
            panic!("expected summary");
        };
        assert!(args.input.sample);
        assert_eq!(args.input.input, Some(PathBuf::from("rates.csv")));

        let cfg = crate::app::run_config_from_args(&args.input).unwrap();
        assert!(matches!(cfg.input, crate::domain::InputSource::Sample { .. }));
    }

    #[test]
    fn render_accepts_input_and_output() {
        let cli = Cli::try_parse_from([
            "exrate", "render", "-i", "rates.csv", "-o", "out.svg", "--window", "10", "--strict",
        ])
        .unwrap();
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.input.input, Some(PathBuf::from("rates.csv")));
        assert_eq!(args.output, PathBuf::from("out.svg"));
        assert_eq!(args.input.window, 10);
        assert!(args.input.strict);
    }
}
