use serde::Serialize;

use crate::config::Config;
use crate::sort_key::sort_key;
use crate::types::{CanonicalRow, CanonicalTable, Period};
use crate::units::display_value;

/// What the caller wants to see. Passed in explicitly on every query.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub period: Period,
    /// `None` means every country.
    pub countries: Option<Vec<String>>,
}

impl Selection {
    pub fn period(period: Period) -> Self {
        Self {
            period,
            countries: None,
        }
    }

    pub fn with_countries<S: AsRef<str>>(mut self, countries: &[S]) -> Self {
        self.countries = Some(countries.iter().map(|c| c.as_ref().to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub country: String,
    pub period: Period,
    pub source: String,
    pub rail_pct: Option<f64>,
    pub road_pct: Option<f64>,
    pub waterway_pct: Option<f64>,
    pub display_rail: Option<f64>,
    pub display_road: Option<f64>,
    pub display_waterway: Option<f64>,
    /// Present only when all three shares are.
    pub bubble: Option<Bubble>,
}

impl DisplayRow {
    pub fn from_row(row: &CanonicalRow, cfg: &Config) -> Self {
        let shown = |v: Option<f64>| v.map(|v| display_value(v, cfg.display_floor, cfg.display_decimals));
        let (display_rail, display_road, display_waterway) =
            (shown(row.rail_pct), shown(row.road_pct), shown(row.waterway_pct));
        let bubble = match (display_rail, display_road, display_waterway) {
            (Some(x), Some(y), Some(size)) => Some(Bubble { x, y, size }),
            _ => None,
        };
        Self {
            country: row.country.clone(),
            period: row.period,
            source: row.source.clone(),
            rail_pct: row.rail_pct,
            road_pct: row.road_pct,
            waterway_pct: row.waterway_pct,
            display_rail,
            display_road,
            display_waterway,
            bubble,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodView {
    pub period: Period,
    pub title: String,
    pub rows: Vec<DisplayRow>,
    /// Set when there is nothing to draw.
    pub notice: Option<String>,
}

pub fn title_for(period: Period) -> String {
    match period {
        Period::Benchmark => "Benchmark scenario".to_string(),
        Period::Year(y) => format!("Modal split ({})", y),
    }
}

pub fn select(table: &CanonicalTable, selection: &Selection, cfg: &Config) -> PeriodView {
    let mut rows: Vec<DisplayRow> = table
        .for_period(selection.period)
        .into_iter()
        .filter(|r| match &selection.countries {
            Some(wanted) => wanted.iter().any(|c| *c == r.country),
            None => true,
        })
        .map(|r| DisplayRow::from_row(r, cfg))
        .collect();
    rows.sort_by(|a, b| {
        sort_key(&a.country)
            .cmp(&sort_key(&b.country))
            .then_with(|| a.country.cmp(&b.country))
    });

    let notice = if rows.is_empty() {
        Some(match &selection.countries {
            Some(c) if c.is_empty() => "Select at least one country.".to_string(),
            _ => format!("No data for period {}.", selection.period),
        })
    } else {
        None
    };

    PeriodView {
        period: selection.period,
        title: title_for(selection.period),
        rows,
        notice,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, period: Period, shares: (f64, f64, f64)) -> CanonicalRow {
        let mut r = CanonicalRow::new(country, period, "series");
        r.rail_pct = Some(shares.0);
        r.road_pct = Some(shares.1);
        r.waterway_pct = Some(shares.2);
        r
    }

    fn table() -> CanonicalTable {
        CanonicalTable::new(vec![
            row("Reino Unido", Period::Year(2014), (11.6, 88.3, 0.1)),
            row("Bélgica", Period::Year(2014), (11.1, 73.0, 15.9)),
            row("Alemanha", Period::Year(2014), (18.8, 71.3, 9.9)),
            row("Alemanha", Period::Benchmark, (17.5, 62.5, 20.0)),
        ])
    }

    #[test]
    fn test_filters_by_period_and_orders_by_sort_key() {
        let view = select(&table(), &Selection::period(Period::Year(2014)), &Config::default());
        let names: Vec<_> = view.rows.iter().map(|r| r.country.as_str()).collect();
        assert_eq!(names, vec!["Alemanha", "Bélgica", "Reino Unido"]);
        assert!(view.notice.is_none());
        assert_eq!(view.title, "Modal split (2014)");
    }

    #[test]
    fn test_country_filter() {
        let sel = Selection::period(Period::Year(2014)).with_countries(&["Alemanha"]);
        let view = select(&table(), &sel, &Config::default());
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].bubble, Some(Bubble { x: 18.8, y: 71.3, size: 9.9 }));
    }

    #[test]
    fn test_missing_period_is_empty_with_notice() {
        let view = select(&table(), &Selection::period(Period::Year(2030)), &Config::default());
        assert!(view.rows.is_empty());
        assert_eq!(view.notice.as_deref(), Some("No data for period 2030."));
    }

    #[test]
    fn test_empty_country_selection_notice() {
        let sel = Selection::period(Period::Year(2014)).with_countries::<&str>(&[]);
        let view = select(&table(), &sel, &Config::default());
        assert_eq!(view.notice.as_deref(), Some("Select at least one country."));
    }

    #[test]
    fn test_display_floor_only_touches_display_values() {
        let t = CanonicalTable::new(vec![row("Reino Unido", Period::Year(2014), (11.6, 88.35, 0.05))]);
        let view = select(&t, &Selection::period(Period::Year(2014)), &Config::default());
        let r = &view.rows[0];
        assert_eq!(r.waterway_pct, Some(0.05));
        assert_eq!(r.display_waterway, Some(0.1));
    }
}
