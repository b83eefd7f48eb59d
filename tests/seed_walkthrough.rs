//! Walks the embedded seed tables through the same steps a chart front end
//! takes: load, list periods, step the timeline, select and interpolate.

use modalshare::config::Config;
use modalshare::pipeline::{add_interpolated, run, PipelineCache};
use modalshare::query::{select, Selection};
use modalshare::seed;
use modalshare::sort_key::sort_key;
use modalshare::timeline::{interpolate_years, Timeline, INTERPOLATED_SOURCE};
use modalshare::types::Period;

#[test]
fn seed_timeline_starts_at_benchmark_and_ends_at_latest_year() {
    let out = run(&seed::sources(), &Config::default());
    let timeline = Timeline::from_table(&out.table);
    assert_eq!(timeline.default, Some(Period::Benchmark));
    assert_eq!(timeline.latest, Some(Period::Year(2023)));
    assert_eq!(timeline.next(Period::Benchmark), Some(Period::Year(2014)));
    assert_eq!(timeline.next(Period::Year(2023)), None);
}

#[test]
fn every_seed_period_has_all_countries_in_sort_order() {
    let cfg = Config::default();
    let out = run(&seed::sources(), &cfg);
    for period in Timeline::from_table(&out.table).options {
        let view = select(&out.table, &Selection::period(period), &cfg);
        assert_eq!(view.rows.len(), 10, "period {}", period);
        let keys: Vec<String> = view.rows.iter().map(|r| sort_key(&r.country)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert!(view.rows.iter().all(|r| r.bubble.is_some()));
    }
}

#[test]
fn seed_shares_are_percentages() {
    let out = run(&seed::sources(), &Config::default());
    for row in &out.table.rows {
        for v in [row.rail_pct, row.road_pct, row.waterway_pct].into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "{:?}", row);
        }
        let sum = row.present_sum().unwrap();
        assert!((sum - 100.0).abs() < 2.0, "{:?}", row);
    }
}

#[test]
fn interpolation_between_seed_years() {
    let out = run(&seed::sources(), &Config::default());
    let filled = interpolate_years(&out.table, 2014, 2017);
    assert_eq!(filled.len(), 20);
    assert!(filled.iter().all(|r| r.source == INTERPOLATED_SOURCE));
    assert!(filled.iter().all(|r| matches!(r.period, Period::Year(2015) | Period::Year(2016))));
}

#[test]
fn seed_is_cached_across_requests() {
    let mut cache = PipelineCache::new();
    let cfg = Config::default();
    let a = cache.get_or_run(&seed::sources(), &cfg);
    let b = cache.get_or_run(&seed::sources(), &cfg);
    assert_eq!(a.input_hash, b.input_hash);
    assert_eq!(cache.hits, 1);
}

#[test]
fn interpolating_over_observed_years_adds_no_second_rows() {
    let cfg = Config::default();
    let mut out = run(&seed::sources(), &cfg);
    let before = out.diagnostics.len();
    let added = add_interpolated(&mut out, 2014, 2023);
    assert_eq!(added, 0);
    let view = select(&out.table, &Selection::period(Period::Year(2016)), &cfg);
    assert_eq!(view.rows.len(), 10);
    let collisions = out.diagnostics[before..]
        .iter()
        .filter(|d| d.kind() == "cross_source_duplicate")
        .count();
    assert_eq!(collisions, 80);
}

#[test]
fn benchmark_source_listing_years_still_yields_one_row_per_country() {
    let text = "Pais,Ano,Rail,Road,Waterway\nBrasil,2014,20,65,15\nBrasil,2015,30,55,15\n";
    let out = run(&[modalshare::pipeline::SourceText::benchmark("bench", text)], &Config::default());
    assert_eq!(out.table.for_period(Period::Benchmark).len(), 1);
    assert!(out.diagnostics.iter().any(|d| d.kind() == "duplicate_observation"));
}
