//! Selectable periods and yearly interpolation between two observed years.

use serde::Serialize;
use std::collections::HashMap;

use crate::modal::Modal;
use crate::types::{CanonicalRow, CanonicalTable, Period};

pub const INTERPOLATED_SOURCE: &str = "interpolated";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub options: Vec<Period>,
    pub default: Option<Period>,
    /// Target of the "jump to most recent" action.
    pub latest: Option<Period>,
}

impl Timeline {
    pub fn from_table(table: &CanonicalTable) -> Self {
        let options = table.periods();
        let default = options.first().copied();
        let latest = options.iter().rev().find(|p| !p.is_benchmark()).copied();
        Self {
            options,
            default,
            latest,
        }
    }

    pub fn contains(&self, period: Period) -> bool {
        self.options.contains(&period)
    }

    /// The option after `current`, if any.
    pub fn next(&self, current: Period) -> Option<Period> {
        let pos = self.options.iter().position(|p| *p == current)?;
        self.options.get(pos + 1).copied()
    }
}

fn lerp(a: Option<f64>, b: Option<f64>, t: f64) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        _ => None,
    }
}

/// Fill the years strictly between `from` and `to` with linearly
/// interpolated rows, for every country observed at both endpoints.
pub fn interpolate_years(table: &CanonicalTable, from: i32, to: i32) -> Vec<CanonicalRow> {
    if to - from < 2 {
        return Vec::new();
    }
    let mut start: HashMap<&str, &CanonicalRow> = HashMap::new();
    let mut end: HashMap<&str, &CanonicalRow> = HashMap::new();
    for row in &table.rows {
        match row.period {
            Period::Year(y) if y == from => {
                start.entry(row.country.as_str()).or_insert(row);
            }
            Period::Year(y) if y == to => {
                end.entry(row.country.as_str()).or_insert(row);
            }
            _ => {}
        }
    }

    let mut countries: Vec<&str> = table
        .countries()
        .iter()
        .filter_map(|c| start.get_key_value(c.as_str()).map(|(k, _)| *k))
        .filter(|c| end.contains_key(c))
        .collect();
    countries.dedup();

    let span = (to - from) as f64;
    let mut out = Vec::new();
    for year in (from + 1)..to {
        let t = (year - from) as f64 / span;
        for country in &countries {
            let (a, b) = (start[country], end[country]);
            let mut row = CanonicalRow::new(country, Period::Year(year), INTERPOLATED_SOURCE);
            for modal in Modal::ALL {
                *row.slot_mut(modal) = lerp(a.share(modal), b.share(modal), t);
            }
            out.push(row);
        }
    }
    out
}
