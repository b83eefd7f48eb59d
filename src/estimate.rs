//! Geography-based share estimates for the ITF member list, used when no
//! measured table is available. The estimate is written out as a structured
//! CSV so it enters the pipeline through the adapter like any other source.

use anyhow::{anyhow, Context, Result};

use crate::modal::Modal;
use crate::pipeline::SourceText;
use crate::units::rebalance;

pub const ESTIMATED_SOURCE: &str = "estimated";

/// Years the estimate is produced for by default.
pub const ESTIMATED_YEARS: [i32; 2] = [2015, 2023];

pub const ITF_COUNTRIES: [&str; 69] = [
    "Albania", "Argentina", "Armenia", "Australia", "Austria", "Azerbaijan", "Belarus", "Belgium",
    "Bosnia-Herzegovina", "Brazil", "Bulgaria", "Cambodia", "Canada", "Chile", "China", "Colombia",
    "Costa Rica", "Croatia", "Czechia", "Denmark", "Dominican Republic", "Estonia", "Finland", "France",
    "Georgia", "Germany", "Greece", "Hungary", "Iceland", "India", "Ireland", "Israel", "Italy",
    "Japan", "Kazakhstan", "Korea", "Latvia", "Liechtenstein", "Lithuania", "Luxembourg", "Malta",
    "Mexico", "Moldova", "Mongolia", "Montenegro", "Morocco", "Netherlands", "New Zealand", "North Macedonia",
    "Norway", "Oman", "Poland", "Portugal", "Romania", "Russia", "Saudi Arabia", "Serbia", "Slovakia",
    "Slovenia", "Spain", "Sweden", "Switzerland", "Tunisia", "Turkey", "Ukraine", "United Arab Emirates",
    "United Kingdom", "United States", "Uzbekistan",
];

/// Preselected countries when the caller has not chosen any.
pub const SUGGESTED_COUNTRIES: [&str; 8] = [
    "Brazil", "United States", "China", "Germany", "India", "Russia", "Argentina", "France",
];

const RAIL_HEAVY: &[&str] = &[
    "Russia", "Kazakhstan", "Ukraine", "Belarus", "Uzbekistan", "Latvia", "Lithuania", "Estonia",
    "Canada", "United States", "Australia", "China", "India", "Mongolia",
];
const WATER_HEAVY: &[&str] = &[
    "Netherlands", "Belgium", "Romania", "China", "Germany", "United States", "Vietnam", "Cambodia",
];
const ISLANDS: &[&str] = &["Iceland", "Malta", "Cyprus", "Ireland", "New Zealand", "Dominican Republic"];
const LATIN_ROAD: &[&str] = &["Brazil", "Argentina", "Chile", "Colombia", "Mexico", "Costa Rica"];

/// Estimated (rail, road, waterway) percentages for one country and year,
/// summing to exactly 100.
pub fn estimate_shares(country: &str, year: i32) -> (f64, f64, f64) {
    let (mut rail, mut road, mut water) = (20.0, 70.0, 10.0);

    if RAIL_HEAVY.contains(&country) {
        rail += 35.0;
        road -= 30.0;
    }
    if WATER_HEAVY.contains(&country) {
        water += 25.0;
        road -= 15.0;
        rail -= 10.0;
    }
    if ISLANDS.contains(&country) {
        rail = 0.0;
        water += 5.0;
        road = 95.0 - water;
    }
    if LATIN_ROAD.contains(&country) {
        road += 15.0;
        rail = f64::max(5.0, rail - 10.0);
        water = f64::max(1.0, water - 5.0);
        if country == "Brazil" {
            (rail, road, water) = (21.0, 62.0, 17.0);
        }
    }
    // rail held a slightly larger share in 2015
    if year == 2015 {
        rail += 2.0;
        road -= 2.0;
    }

    rebalance(rail, road, water).unwrap_or((rail, road, water))
}

/// Structured CSV with one row per (country, year).
pub fn estimated_csv(countries: &[&str], years: &[i32]) -> Result<String> {
    let mut w = csv::Writer::from_writer(Vec::new());
    let mut header = vec!["País".to_string(), "Ano".to_string()];
    header.extend(Modal::ALL.iter().map(|m| m.heading().to_string()));
    w.write_record(&header)?;
    for year in years {
        for country in countries {
            let (rail, road, water) = estimate_shares(country, *year);
            w.write_record([
                country.to_string(),
                year.to_string(),
                rail.to_string(),
                road.to_string(),
                water.to_string(),
            ])?;
        }
    }
    let bytes = w
        .into_inner()
        .map_err(|e| anyhow!("flushing estimated csv: {}", e.error()))?;
    String::from_utf8(bytes).context("estimated csv is not utf-8")
}

/// The full ITF estimate for [`ESTIMATED_YEARS`] as a series source.
pub fn estimated_source() -> Result<SourceText> {
    let text = estimated_csv(&ITF_COUNTRIES, &ESTIMATED_YEARS)?;
    Ok(SourceText::series(ESTIMATED_SOURCE, &text))
}

/// Suggested countries that are actually present in `available`.
pub fn default_countries<S: AsRef<str>>(available: &[S]) -> Vec<String> {
    SUGGESTED_COUNTRIES
        .iter()
        .filter(|c| available.iter().any(|a| a.as_ref() == **c))
        .map(|c| c.to_string())
        .collect()
}
