//! The tidy observation table.
//!
//! One row per (country, year), ordered by country then year. The table is
//! immutable once built; every constructor goes through [`TidyTable::new`],
//! which establishes the ordering and rejects duplicate keys.

use chrono::NaiveDate;

use crate::domain::{Indicator, Observation};
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TidyTable {
    rows: Vec<Observation>,
}

impl TidyTable {
    /// Build a table, sorting rows by (country, year).
    ///
    /// Fails if two rows share the same (country, year).
    pub fn new(mut rows: Vec<Observation>) -> Result<Self, AppError> {
        rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));
        for pair in rows.windows(2) {
            if pair[0].country == pair[1].country && pair[0].year == pair[1].year {
                return Err(AppError::data(format!(
                    "Duplicate row for ({}, {}).",
                    pair[0].country,
                    pair[0].year.format("%Y")
                )));
            }
        }
        Ok(Self { rows })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> &[Observation] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Unique countries in row order.
    pub fn countries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if out.last() != Some(&row.country.as_str()) {
                out.push(&row.country);
            }
        }
        out
    }

    /// Rows belonging to one country.
    pub fn subset(&self, country: &str) -> Vec<&Observation> {
        self.rows.iter().filter(|r| r.country == country).collect()
    }

    /// Non-null `(year, value)` points of one indicator for one country.
    pub fn series(&self, country: &str, indicator: Indicator) -> Vec<(NaiveDate, f64)> {
        self.rows
            .iter()
            .filter(|r| r.country == country)
            .filter_map(|r| r.value(indicator).map(|v| (r.year, v)))
            .collect()
    }

    /// All values of one indicator, nulls included, in row order.
    pub fn column(&self, indicator: Indicator) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.value(indicator)).collect()
    }

    /// Earliest and latest year in the table.
    pub fn year_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.year).min()?;
        let max = self.rows.iter().map(|r| r.year).max()?;
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jan1(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap()
    }

    fn row(country: &str, year: i32, inflation: Option<f64>) -> Observation {
        Observation {
            inflation,
            ..Observation::new(country, jan1(year))
        }
    }

    #[test]
    fn new_sorts_by_country_then_year() {
        let table = TidyTable::new(vec![
            row("United States", 2001, Some(3.0)),
            row("Germany", 2001, Some(1.5)),
            row("United States", 2000, Some(2.0)),
        ])
        .unwrap();

        let keys: Vec<(&str, i32)> = table
            .rows()
            .iter()
            .map(|r| (r.country.as_str(), chrono::Datelike::year(&r.year)))
            .collect();
        assert_eq!(
            keys,
            vec![("Germany", 2001), ("United States", 2000), ("United States", 2001)]
        );
        assert_eq!(table.countries(), vec!["Germany", "United States"]);
    }

    #[test]
    fn new_rejects_duplicate_keys() {
        let err = TidyTable::new(vec![row("Brazil", 2000, None), row("Brazil", 2000, Some(1.0))]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn series_skips_nulls() {
        let table = TidyTable::new(vec![
            row("Brazil", 2000, Some(7.0)),
            row("Brazil", 2001, None),
            row("Brazil", 2002, Some(8.4)),
        ])
        .unwrap();

        assert_eq!(table.series("Brazil", Indicator::Inflation), vec![(jan1(2000), 7.0), (jan1(2002), 8.4)]);
        assert_eq!(table.column(Indicator::Inflation), vec![Some(7.0), None, Some(8.4)]);
        assert!(table.series("Brazil", Indicator::Gdp).is_empty());
        assert!(table.subset("India").is_empty());
        assert_eq!(table.head(2).len(), 2);
        assert_eq!(table.head(10).len(), 3);
    }
}
