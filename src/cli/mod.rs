//! Command-line parsing for the World Bank macro report.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! fetch/clean/report code; `app` turns these structs into an `AnalysisConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{
    DEFAULT_API_BASE, DEFAULT_CHART_DIR, DEFAULT_CORR_CSV, DEFAULT_DATA_CSV, DEFAULT_END_YEAR, DEFAULT_START_YEAR,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "macro-report",
    version,
    about = "Inflation, unemployment and GDP report from the World Bank API"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, clean, correlate, chart, and save the data (default).
    Run(RunArgs),
    /// Re-render charts and correlations from a previously saved data CSV.
    Report(ReportArgs),
    /// Like `run`, but always opens the interactive viewer.
    Tui(RunArgs),
}

/// Output options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    /// Correlation matrix CSV path.
    #[arg(long = "out-corr", default_value = DEFAULT_CORR_CSV)]
    pub out_corr: PathBuf,

    /// Directory for the static SVG charts.
    #[arg(long = "chart-dir", default_value = DEFAULT_CHART_DIR)]
    pub chart_dir: PathBuf,

    /// Skip static chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Open the interactive chart viewer before saving.
    #[arg(short = 'i', long)]
    pub interactive: bool,

    /// Rows shown in the console preview.
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

/// Options for fetching and processing a fresh dataset.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Country code to include (repeatable). Defaults to US, DE, IN, CN, BR.
    #[arg(short = 'c', long = "country", value_name = "CODE")]
    pub countries: Vec<String>,

    /// First year of the date range.
    #[arg(long = "start", default_value_t = DEFAULT_START_YEAR)]
    pub start_year: i32,

    /// Last year of the date range.
    #[arg(long = "end", default_value_t = DEFAULT_END_YEAR)]
    pub end_year: i32,

    /// Cleaned data CSV path.
    #[arg(long = "out-data", default_value = DEFAULT_DATA_CSV)]
    pub out_data: PathBuf,

    /// World Bank API root.
    #[arg(long = "api-base", env = "WB_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for reporting on a saved CSV.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    /// Tidy data CSV produced by `run`.
    #[arg(long, value_name = "CSV", default_value = DEFAULT_DATA_CSV)]
    pub data: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_defaults() {
        let cli = Cli::try_parse_from(["macro-report", "run"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(args.countries.is_empty());
        assert_eq!(args.start_year, 2000);
        assert_eq!(args.end_year, 2024);
        assert_eq!(args.out_data, PathBuf::from("macro_data_portfolio.csv"));
        assert_eq!(args.output.out_corr, PathBuf::from("macro_correlation_matrix.csv"));
        assert_eq!(args.output.preview, 5);
        assert!(!args.output.no_charts);
    }

    #[test]
    fn repeatable_countries() {
        let cli = Cli::try_parse_from(["macro-report", "run", "-c", "us", "--country", "JP", "--start", "2010"]).unwrap();
        let Command::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.countries, vec!["us", "JP"]);
        assert_eq!(args.start_year, 2010);
    }

    #[test]
    fn report_takes_data_path() {
        let cli = Cli::try_parse_from(["macro-report", "report", "--data", "saved.csv", "--no-charts"]).unwrap();
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.data, PathBuf::from("saved.csv"));
        assert!(args.output.no_charts);
    }
}
