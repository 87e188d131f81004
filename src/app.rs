//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - sets up logging
//! - parses CLI arguments into an `AnalysisConfig`
//! - fetches World Bank data (or reloads a saved CSV)
//! - prints the report, renders charts, and writes the CSV outputs

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, OutputArgs, ReportArgs, RunArgs};
use crate::data::WorldBankClient;
use crate::domain::{AnalysisConfig, DEFAULT_COUNTRIES};
use crate::error::AppError;
use crate::report::format_run_summary;

pub mod pipeline;

/// Entry point for the `macro-report` binary.
pub fn run() -> Result<(), AppError> {
    init_tracing();

    // `macro-report` alone, or with only flags, behaves like `macro-report run`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args, false),
        Command::Tui(args) => handle_run(args, true),
        Command::Report(args) => handle_report(args),
    }
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_tracing() {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_run(args: RunArgs, force_interactive: bool) -> Result<(), AppError> {
    let mut config = config_from_run_args(&args)?;
    config.interactive |= force_interactive;

    let client = WorldBankClient::new(config.api_base.clone());
    let run = pipeline::run_analysis(&config, &client)?;

    let mut files = pipeline::present(&run, &config)?;
    files.extend(pipeline::persist(&run, &config)?);

    println!("{}", format_run_summary(&run.summary(files)));
    Ok(())
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let mut config = AnalysisConfig::default();
    apply_output_args(&mut config, &args.output);

    let table = crate::io::read_tidy_csv(&args.data)?;
    info!(path = %args.data.display(), rows = table.len(), "loaded saved data");
    if let Some((first, last)) = table.year_range() {
        use chrono::Datelike;
        config.start_year = first.year();
        config.end_year = last.year();
    }

    let run = pipeline::analyze_table(table.len(), table);
    let mut files = pipeline::present(&run, &config)?;
    crate::io::write_correlation_csv(&config.corr_csv, &run.correlation)?;
    files.push(config.corr_csv.clone());

    println!("{}", format_run_summary(&run.summary(files)));
    Ok(())
}

/// Build and validate a run configuration from CLI arguments.
pub fn config_from_run_args(args: &RunArgs) -> Result<AnalysisConfig, AppError> {
    let countries = if args.countries.is_empty() {
        DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect()
    } else {
        args.countries.clone()
    };

    let mut config = AnalysisConfig {
        countries,
        start_year: args.start_year,
        end_year: args.end_year,
        api_base: args.api_base.clone(),
        data_csv: args.out_data.clone(),
        ..AnalysisConfig::default()
    };
    apply_output_args(&mut config, &args.output);
    config.validate()
}

fn apply_output_args(config: &mut AnalysisConfig, output: &OutputArgs) {
    config.corr_csv = output.out_corr.clone();
    config.chart_dir = output.chart_dir.clone();
    config.charts = !output.no_charts;
    config.interactive = output.interactive;
    config.preview_rows = output.preview;
}

/// Rewrite argv so a bare invocation defaults to `run`.
///
/// Rules:
/// - `macro-report`                   -> `macro-report run`
/// - `macro-report -c US ...`         -> `macro-report run -c US ...`
/// - `macro-report --help/--version`  -> unchanged
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "report" | "tui");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs() {
        assert_eq!(rewrite_args(argv(&["macro-report"])), argv(&["macro-report", "run"]));
        assert_eq!(
            rewrite_args(argv(&["macro-report", "-c", "US"])),
            argv(&["macro-report", "run", "-c", "US"])
        );
        assert_eq!(rewrite_args(argv(&["macro-report", "--help"])), argv(&["macro-report", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["macro-report", "report", "--data", "x.csv"])),
            argv(&["macro-report", "report", "--data", "x.csv"])
        );
    }

    #[test]
    fn config_uses_default_countries() {
        let cli = Cli::try_parse_from(["macro-report", "run", "--no-charts", "--preview", "3"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        let config = config_from_run_args(&args).unwrap();
        assert_eq!(config.countries, vec!["US", "DE", "IN", "CN", "BR"]);
        assert!(!config.charts);
        assert_eq!(config.preview_rows, 3);
    }

    #[test]
    fn config_rejects_reversed_years() {
        let cli = Cli::try_parse_from(["macro-report", "run", "--start", "2020", "--end", "2010"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(config_from_run_args(&args).unwrap_err().exit_code(), 2);
    }
}
