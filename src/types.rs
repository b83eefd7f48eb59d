use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::modal::{Modal, ModalLabel};

/// A timeline position: the fixed reference scenario or a calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Benchmark,
    Year(i32),
}

impl Period {
    pub fn year(&self) -> Option<i32> {
        match self {
            Period::Benchmark => None,
            Period::Year(y) => Some(*y),
        }
    }

    pub fn is_benchmark(&self) -> bool {
        matches!(self, Period::Benchmark)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Benchmark => write!(f, "benchmark"),
            Period::Year(y) => write!(f, "{}", y),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "benchmark" | "inicial" | "initial" => return Ok(Period::Benchmark),
            _ => {}
        }
        trimmed
            .parse::<i32>()
            .map(Period::Year)
            .map_err(|_| format!("bad period: {:?}", trimmed))
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Period::Benchmark, Period::Benchmark) => Ordering::Equal,
            (Period::Benchmark, Period::Year(_)) => Ordering::Less,
            (Period::Year(_), Period::Benchmark) => Ordering::Greater,
            (Period::Year(a), Period::Year(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Tabular layout of a source blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceShape {
    /// One row per (country, modal label), one column per year.
    WideYear,
    /// One row per (country, period), one column per modal share.
    Structured,
}

/// One cell of a source table before any interpretation of its label or unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub country: String,
    pub modal_label: String,
    pub period: String,
    pub value: f64,
    /// 1-based line in the source text.
    pub line: usize,
}

/// A percentage share for one (country, period, modal). The modal is still
/// a lookup result here; the pivot decides what to do with unmapped labels.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub period: Period,
    pub modal: ModalLabel,
    pub share_pct: f64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    pub country: String,
    pub period: Period,
    pub rail_pct: Option<f64>,
    pub road_pct: Option<f64>,
    pub waterway_pct: Option<f64>,
    pub source: String,
}

impl CanonicalRow {
    pub fn new(country: &str, period: Period, source: &str) -> Self {
        Self {
            country: country.to_string(),
            period,
            rail_pct: None,
            road_pct: None,
            waterway_pct: None,
            source: source.to_string(),
        }
    }

    pub fn share(&self, modal: Modal) -> Option<f64> {
        match modal {
            Modal::Rail => self.rail_pct,
            Modal::Road => self.road_pct,
            Modal::Waterway => self.waterway_pct,
        }
    }

    pub fn slot_mut(&mut self, modal: Modal) -> &mut Option<f64> {
        match modal {
            Modal::Rail => &mut self.rail_pct,
            Modal::Road => &mut self.road_pct,
            Modal::Waterway => &mut self.waterway_pct,
        }
    }

    /// Sum of the shares that are present.
    pub fn present_sum(&self) -> Option<f64> {
        let shares: Vec<f64> = [self.rail_pct, self.road_pct, self.waterway_pct]
            .into_iter()
            .flatten()
            .collect();
        if shares.is_empty() {
            None
        } else {
            Some(shares.iter().sum())
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CanonicalTable {
    pub rows: Vec<CanonicalRow>,
}

impl CanonicalTable {
    pub fn new(rows: Vec<CanonicalRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn for_period(&self, period: Period) -> Vec<&CanonicalRow> {
        self.rows.iter().filter(|r| r.period == period).collect()
    }

    /// Distinct periods in ascending order (benchmark first).
    pub fn periods(&self) -> Vec<Period> {
        let mut out: Vec<Period> = self.rows.iter().map(|r| r.period).collect();
        out.sort();
        out.dedup();
        out
    }

    /// Distinct country names in first-seen order.
    pub fn countries(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.country) {
                out.push(row.country.clone());
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse_aliases() {
        assert_eq!("benchmark".parse::<Period>().unwrap(), Period::Benchmark);
        assert_eq!(" Inicial ".parse::<Period>().unwrap(), Period::Benchmark);
        assert_eq!("2014".parse::<Period>().unwrap(), Period::Year(2014));
        assert!("20x4".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_ordering_benchmark_first() {
        let mut ps = vec![Period::Year(2023), Period::Benchmark, Period::Year(2014)];
        ps.sort();
        assert_eq!(ps, vec![Period::Benchmark, Period::Year(2014), Period::Year(2023)]);
    }

    #[test]
    fn test_period_serializes_as_string() {
        let v = serde_json::to_value(Period::Year(2014)).unwrap();
        assert_eq!(v, serde_json::json!("2014"));
        let v = serde_json::to_value(Period::Benchmark).unwrap();
        assert_eq!(v, serde_json::json!("benchmark"));
    }

    #[test]
    fn test_present_sum_skips_absent() {
        let mut row = CanonicalRow::new("Brasil", Period::Year(2014), "series");
        assert_eq!(row.present_sum(), None);
        row.rail_pct = Some(20.0);
        row.road_pct = Some(70.0);
        assert_eq!(row.present_sum(), Some(90.0));
    }
}
