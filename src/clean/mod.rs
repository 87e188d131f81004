//! Reshape raw provider rows into the tidy table.
//!
//! Raw rows arrive one value per (country, period, indicator). The cleaner
//! outer-joins them on (country, period), so a tidy row exists for every key
//! that at least one indicator series returned. Keys the provider never sent
//! are not invented, and missing values stay `None`.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::{Observation, RawObservation, TidyTable};
use crate::error::AppError;

/// Build the tidy table from raw rows.
///
/// Rows are ordered by country, then year. Each period must be a plain
/// four-digit year and becomes January 1 of that year.
pub fn clean(raw: &[RawObservation]) -> Result<TidyTable, AppError> {
    // Keyed on the parsed year so " 2000" and "2000" land in the same row.
    let mut joined: BTreeMap<(String, NaiveDate), Observation> = BTreeMap::new();

    for obs in raw {
        let year = parse_year(&obs.period)?;
        let row = match joined.entry((obs.country.clone(), year)) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => slot.insert(Observation::new(obs.country.clone(), year)),
        };

        let existing = row.value(obs.indicator);
        let merge = merge_cell(existing, obs.value);
        match merge {
            Merge::Replace => warn!(
                country = %obs.country,
                period = %obs.period,
                indicator = obs.indicator.code(),
                "duplicate value from source; keeping the later one"
            ),
            Merge::KeepExisting => warn!(
                country = %obs.country,
                period = %obs.period,
                indicator = obs.indicator.code(),
                "duplicate null from source; keeping the earlier value"
            ),
            Merge::Fill => {}
        }
        if merge != Merge::KeepExisting {
            row.set_value(obs.indicator, obs.value);
        }
    }

    let rows: Vec<Observation> = joined.into_values().collect();
    debug!(raw = raw.len(), tidy = rows.len(), "cleaned observations");
    TidyTable::new(rows)
}

/// What happens when a value arrives for a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Merge {
    /// Cell was empty.
    Fill,
    /// Cell had a value; the later value replaces it.
    Replace,
    /// Cell had a value and the later one is null.
    KeepExisting,
}

fn merge_cell(existing: Option<f64>, incoming: Option<f64>) -> Merge {
    match (existing, incoming) {
        (None, _) => Merge::Fill,
        (Some(_), Some(_)) => Merge::Replace,
        (Some(_), None) => Merge::KeepExisting,
    }
}

/// Parse a `%Y` period into January 1 of that year.
pub fn parse_year(period: &str) -> Result<NaiveDate, AppError> {
    let trimmed = period.trim();
    let is_year = trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit());
    let year: i32 = if is_year {
        trimmed
            .parse()
            .map_err(|e| AppError::data(format!("Invalid period '{period}': {e}")))?
    } else {
        return Err(AppError::data(format!(
            "Invalid period '{period}'. Expected a four-digit year."
        )));
    };
    NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or_else(|| AppError::data(format!("Invalid period '{period}': year out of range.")))
}
