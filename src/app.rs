//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initialises logging
//! - parses CLI arguments
//! - runs the cleaning/smoothing pipeline
//! - prints reports/plots, renders charts, writes exports

use std::path::Path;

use clap::Parser;

use crate::cli::{Command, ExportArgs, InputArgs, RenderArgs, SegmentsArgs, SummaryArgs};
use crate::domain::{ChartConfig, CoercionPolicy, InputSource, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `exrate` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // `exrate --sample` should behave like `exrate summary --sample`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Render(args) => handle_render(args),
        Command::Export(args) => handle_export(args),
        Command::Tui(args) => handle_tui(args),
        Command::Segments(args) => handle_segments(args),
    }
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.input)?;
    let run = pipeline::run_pipeline(&config)?;
    let views = run.views(&config);

    println!(
        "{}",
        crate::report::format_run_summary(&run, &config, args.head)
    );
    println!("{}", crate::report::format_segment_table(&views));

    if args.plot {
        let plot = crate::plot::render_ascii_plot(&run.smoothed, &views, args.width, args.height);
        println!("{plot}");
    }

    Ok(())
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.input)?;
    let run = pipeline::run_pipeline(&config)?;
    let views = run.views(&config);

    crate::render::render_figure(&args.output, &run.smoothed, &views, &config.chart.style)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.input)?;
    let run = pipeline::run_pipeline(&config)?;

    crate::io::write_series(&args.output, &run.smoothed, &run.assembled.column, args.format)?;
    println!("Wrote {} rows to {}", run.smoothed.len(), args.output.display());
    Ok(())
}

fn handle_tui(args: InputArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    crate::tui::run(config)
}

fn handle_segments(args: SegmentsArgs) -> Result<(), AppError> {
    crate::io::write_chart_config(&args.output, &ChartConfig::default())?;
    println!("Wrote {}", args.output.display());
    Ok(())
}

pub fn run_config_from_args(args: &InputArgs) -> Result<RunConfig, AppError> {
    let input = match &args.input {
        Some(path) if !args.sample => InputSource::File(path.clone()),
        _ => InputSource::Sample {
            seed: args.seed,
            start: args.sample_start,
            days: args.sample_days,
        },
    };

    let chart = match &args.config {
        Some(path) => crate::io::read_chart_config(path)?,
        None => ChartConfig::default(),
    };

    Ok(RunConfig {
        input,
        currency: args.currency.trim().to_lowercase(),
        window: args.window,
        policy: if args.strict {
            CoercionPolicy::Strict
        } else {
            CoercionPolicy::Lenient
        },
        chart,
    })
}

/// Rewrite argv so `exrate` defaults to `exrate summary`.
///
/// Rules:
/// - `exrate`                      -> `exrate summary --sample`
/// - `exrate -i rates.csv ...`     -> `exrate summary -i rates.csv ...`
/// - `exrate --help/--version/-h`  -> unchanged (show top-level help/version)
/// - `exrate rates.csv`            -> `exrate summary -i rates.csv`
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("summary".to_string());
        argv.push("--sample".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "render" | "export" | "tui" | "segments");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "summary flags".
    if arg1.starts_with('-') {
        argv.insert(1, "summary".to_string());
        return argv;
    }

    // A bare path is the input file.
    if Path::new(&arg1).extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
        argv.splice(1..1, ["summary".to_string(), "-i".to_string()]);
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_sample_summary() {
        assert_eq!(rewrite_args(argv(&["exrate"])), argv(&["exrate", "summary", "--sample"]));
    }

    #[test]
    fn flags_imply_summary() {
        assert_eq!(
            rewrite_args(argv(&["exrate", "-i", "x.csv"])),
            argv(&["exrate", "summary", "-i", "x.csv"])
        );
    }

    #[test]
    fn csv_path_becomes_input() {
        assert_eq!(
            rewrite_args(argv(&["exrate", "rates.CSV", "--plot"])),
            argv(&["exrate", "summary", "-i", "rates.CSV", "--plot"])
        );
    }

    #[test]
    fn subcommands_and_help_untouched() {
        for args in [&["exrate", "render", "--sample"][..], &["exrate", "--help"][..]] {
            assert_eq!(rewrite_args(argv(args)), argv(args));
        }
    }

    #[test]
    fn run_config_prefers_file_and_normalizes_currency() {
        let cli = crate::cli::Cli::try_parse_from([
            "exrate", "export", "-i", "rates.csv", "-o", "o.csv", "-c", " Japanese_Yen ",
        ])
        .unwrap();
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        let cfg = run_config_from_args(&args.input).unwrap();
        assert_eq!(cfg.input, InputSource::File("rates.csv".into()));
        assert_eq!(cfg.currency, "japanese_yen");
        assert_eq!(cfg.policy, CoercionPolicy::Lenient);
        assert_eq!(cfg.chart, ChartConfig::default());
    }
}
