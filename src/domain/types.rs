//! Shared domain types.
//!
//! These types are intentionally small and plain so the same values flow
//! through fetching, cleaning, reporting and export without conversion layers.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::AppError;

/// Default World Bank API root (v2).
pub const DEFAULT_API_BASE: &str = "https://api.worldbank.org/v2";

/// USA, Germany, India, China, Brazil.
pub const DEFAULT_COUNTRIES: [&str; 5] = ["US", "DE", "IN", "CN", "BR"];

pub const DEFAULT_START_YEAR: i32 = 2000;
pub const DEFAULT_END_YEAR: i32 = 2024;

pub const DEFAULT_DATA_CSV: &str = "macro_data_portfolio.csv";
pub const DEFAULT_CORR_CSV: &str = "macro_correlation_matrix.csv";
pub const DEFAULT_CHART_DIR: &str = "charts";

/// Name of the country column in the tidy table.
pub const COUNTRY_COLUMN: &str = "country";
/// Name of the period column in the tidy table.
pub const YEAR_COLUMN: &str = "Year";

/// A macroeconomic statistic tracked by the report.
///
/// The set is fixed; every tidy row carries one (nullable) value per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Indicator {
    /// Inflation, consumer prices (annual %).
    Inflation,
    /// Unemployment, total (% of labor force).
    Unemployment,
    /// GDP (current US$).
    Gdp,
}

impl Indicator {
    /// Column order used everywhere: tidy CSV, correlation matrix, TUI tabs.
    pub const ALL: [Indicator; 3] = [Indicator::Inflation, Indicator::Unemployment, Indicator::Gdp];

    /// World Bank indicator code.
    pub fn code(self) -> &'static str {
        match self {
            Indicator::Inflation => "FP.CPI.TOTL.ZG",
            Indicator::Unemployment => "SL.UEM.TOTL.ZS",
            Indicator::Gdp => "NY.GDP.MKTP.CD",
        }
    }

    /// Column header in the tidy table and the correlation matrix.
    pub fn column_label(self) -> &'static str {
        match self {
            Indicator::Inflation => "Inflation (%)",
            Indicator::Unemployment => "Unemployment (%)",
            Indicator::Gdp => "GDP (current US$)",
        }
    }

    /// Short name used in chart titles.
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::Inflation => "Inflation",
            Indicator::Unemployment => "Unemployment",
            Indicator::Gdp => "GDP",
        }
    }

    /// Y axis caption for charts.
    pub fn axis_label(self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP (US$)",
            other => other.column_label(),
        }
    }
}

/// One value of one indicator as returned by the provider.
///
/// `period` is kept as the raw provider string (e.g. `"2021"`); the cleaner
/// turns it into a date.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    /// Provider country name, e.g. `United States`.
    pub country: String,
    /// Provider country id, e.g. `US`.
    pub country_code: String,
    pub period: String,
    pub indicator: Indicator,
    pub value: Option<f64>,
}

/// One tidy row: a (country, year) pair with all indicator values.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    /// January 1 of the observation year.
    pub year: NaiveDate,
    pub inflation: Option<f64>,
    pub unemployment: Option<f64>,
    pub gdp: Option<f64>,
}

impl Observation {
    pub fn new(country: impl Into<String>, year: NaiveDate) -> Self {
        Self {
            country: country.into(),
            year,
            inflation: None,
            unemployment: None,
            gdp: None,
        }
    }

    pub fn value(&self, indicator: Indicator) -> Option<f64> {
        match indicator {
            Indicator::Inflation => self.inflation,
            Indicator::Unemployment => self.unemployment,
            Indicator::Gdp => self.gdp,
        }
    }

    pub fn set_value(&mut self, indicator: Indicator, value: Option<f64>) {
        match indicator {
            Indicator::Inflation => self.inflation = value,
            Indicator::Unemployment => self.unemployment = value,
            Indicator::Gdp => self.gdp = value,
        }
    }
}

/// Run configuration passed into each pipeline step.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub countries: Vec<String>,
    pub start_year: i32,
    pub end_year: i32,
    pub api_base: String,

    pub data_csv: PathBuf,
    pub corr_csv: PathBuf,
    pub chart_dir: PathBuf,

    /// Render static SVG charts.
    pub charts: bool,
    /// Open the interactive viewer before writing files.
    pub interactive: bool,
    /// Rows shown in the console preview.
    pub preview_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|c| c.to_string()).collect(),
            start_year: DEFAULT_START_YEAR,
            end_year: DEFAULT_END_YEAR,
            api_base: DEFAULT_API_BASE.to_string(),
            data_csv: PathBuf::from(DEFAULT_DATA_CSV),
            corr_csv: PathBuf::from(DEFAULT_CORR_CSV),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
            charts: true,
            interactive: false,
            preview_rows: 5,
        }
    }
}

impl AnalysisConfig {
    /// Check user-supplied settings and normalise country codes to upper case.
    pub fn validate(mut self) -> Result<Self, AppError> {
        if self.countries.is_empty() {
            return Err(AppError::usage("At least one country code is required."));
        }
        for code in &mut self.countries {
            let trimmed = code.trim();
            let ok = (2..=3).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_alphanumeric());
            if !ok {
                return Err(AppError::usage(format!(
                    "Invalid country code '{code}'. Expected a 2 or 3 letter ISO code."
                )));
            }
            *code = trimmed.to_ascii_uppercase();
        }
        if self.start_year > self.end_year {
            return Err(AppError::usage(format!(
                "Start year {} is after end year {}.",
                self.start_year, self.end_year
            )));
        }
        if self.api_base.trim().is_empty() {
            return Err(AppError::usage("World Bank API base URL is empty."));
        }
        Ok(self)
    }

    /// `2000–2024`, as used in chart titles.
    pub fn year_span_label(&self) -> String {
        format!("{}–{}", self.start_year, self.end_year)
    }
}
