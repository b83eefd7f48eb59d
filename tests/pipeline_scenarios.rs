//! End-to-end behaviour of the normalization pipeline on small inputs.

use modalshare::adapter::adapt_tuples;
use modalshare::config::Config;
use modalshare::merge::SourceRole;
use modalshare::modal::Modal;
use modalshare::pipeline::{run, run_adapted, AdaptedSource, SourceText};
use modalshare::query::{select, Selection};
use modalshare::types::{CanonicalRow, Period};

fn close(a: Option<f64>, b: f64) -> bool {
    a.map_or(false, |a| (a - b).abs() < 1e-9)
}

fn only_row<'a>(rows: &[&'a CanonicalRow]) -> &'a CanonicalRow {
    assert_eq!(rows.len(), 1, "expected one row, got {:?}", rows);
    rows[0]
}

#[test]
fn fraction_becomes_percentage() {
    let text = "Pais,Combined measure,2014\nAlemanha,Ferroviario - Freight transport,0.188\n";
    let out = run(&[SourceText::series("s", text)], &Config::default());
    let row = only_row(&out.table.for_period(Period::Year(2014)));
    assert_eq!(row.country, "Alemanha");
    assert!(close(row.rail_pct, 18.8));
    assert_eq!(row.road_pct, None);
}

#[test]
fn zero_is_kept_and_small_values_only_floor_on_display() {
    let text = "Pais,Combined measure,2014
Reino Unido,Ferroviario - Freight transport,0.116
Reino Unido,Rodoviario - Freight transport,0.8835
Reino Unido,Aquaviario - Freight transport,0.0005
Suica,Ferroviario - Freight transport,0.37
Suica,Rodoviario - Freight transport,0.63
Suica,Aquaviario - Freight transport,0.0
";
    let cfg = Config::default();
    let out = run(&[SourceText::series("s", text)], &cfg);
    let view = select(&out.table, &Selection::period(Period::Year(2014)), &cfg);

    let uk = &view.rows[0];
    assert_eq!(uk.country, "Reino Unido");
    assert!(close(uk.waterway_pct, 0.05));
    assert_eq!(uk.display_waterway, Some(0.1));

    let ch = &view.rows[1];
    assert_eq!(ch.waterway_pct, Some(0.0));
    assert_eq!(ch.display_waterway, Some(0.0));
}

#[test]
fn benchmark_and_series_rows_stay_distinct() {
    let bench = "Pais,Rail,Road,Waterway\nBrasil,20.0,67.5,12.5\n";
    let series = "Pais,Ano,Rail,Road,Waterway\nBrasil,2014,16.5,71.4,12.1\n";
    let out = run(
        &[SourceText::benchmark("benchmark", bench), SourceText::series("series", series)],
        &Config::default(),
    );
    assert_eq!(out.table.len(), 2);
    let b = only_row(&out.table.for_period(Period::Benchmark));
    let y = only_row(&out.table.for_period(Period::Year(2014)));
    assert!(close(b.road_pct, 67.5));
    assert_eq!(b.source, "benchmark");
    assert!(close(y.road_pct, 71.4));
    assert_eq!(y.source, "series");
    assert!(out.diagnostics.is_empty(), "{:?}", out.diagnostics);
}

#[test]
fn label_spacing_variants_reach_the_same_modal() {
    let text = "Pais,Combined measure,2014,2015
Hungria,Rodoviario -  Freight transport,0.7,
Hungria,Rodoviario - Freight transport,,0.71
";
    let out = run(&[SourceText::series("s", text)], &Config::default());
    assert!(close(out.table.for_period(Period::Year(2014))[0].road_pct, 70.0));
    assert!(close(out.table.for_period(Period::Year(2015))[0].road_pct, 71.0));
    assert!(!out.diagnostics.iter().any(|d| d.kind() == "unmapped_modal"));
}

#[test]
fn threshold_boundary() {
    let text = "Pais,Ano,Rail,Road,Waterway\nA,2014,1.5,1.5001,0\n";
    let out = run(&[SourceText::series("s", text)], &Config::default());
    let row = &out.table.rows[0];
    assert!(close(row.rail_pct, 100.0));
    assert!(close(row.road_pct, 1.5001));
    assert!(out.diagnostics.iter().any(|d| d.kind() == "out_of_range"));
}

#[test]
fn duplicates_keep_first_and_report() {
    let text = "Pais,Ano,Rail,Road,Waterway\nPeru,2014,10,80,10\nPeru,2014,20,70,10\n";
    let out = run(&[SourceText::series("s", text)], &Config::default());
    assert_eq!(out.table.len(), 1);
    assert!(close(out.table.rows[0].rail_pct, 10.0));
    assert!(out.diagnostics.iter().any(|d| d.kind() == "duplicate_observation"));
}

#[test]
fn overlapping_sources_keep_both_rows_with_warning() {
    let a = "Pais,Ano,Rail,Road,Waterway\nPeru,2014,10,80,10\n";
    let b = "Pais,Ano,Rail,Road,Waterway\nPeru,2014,12,78,10\n";
    let out = run(&[SourceText::series("a", a), SourceText::series("b", b)], &Config::default());
    assert_eq!(out.table.len(), 2);
    assert!(out.diagnostics.iter().any(|d| d.kind() == "cross_source_duplicate"));
}

#[test]
fn unmapped_labels_never_reach_the_table() {
    let text = "Pais,Combined measure,2014
Chile,Ferroviario - Freight transport,0.3
Chile,Aereo - Freight transport,0.01
";
    let out = run(&[SourceText::series("s", text)], &Config::default());
    assert_eq!(out.table.len(), 1);
    assert!(out.diagnostics.iter().any(|d| d.kind() == "unmapped_modal"));
}

#[test]
fn bad_rows_are_reported_not_fatal() {
    let text = "Pais,Combined measure,2014
Chile,Ferroviario - Freight transport,abc
Chile,Rodoviario - Freight transport,0.6
";
    let out = run(&[SourceText::series("s", text)], &Config::default());
    assert_eq!(out.table.len(), 1);
    assert!(out.diagnostics.iter().any(|d| d.kind() == "malformed_row"));
}

#[test]
fn wide_year_values_survive_adapt_and_pivot() {
    let values = [0.188, 0.713, 0.099];
    let text = format!(
        "Pais,Combined measure,2020
Alemanha,Ferroviario - Freight transport,{}
Alemanha,Rodoviario - Freight transport,{}
Alemanha,Aquaviario - Freight transport,{}
",
        values[0], values[1], values[2]
    );
    let out = run(&[SourceText::series("s", &text)], &Config::default());
    let row = &out.table.rows[0];
    for (modal, v) in Modal::ALL.iter().zip(values) {
        assert!(close(row.share(*modal), v * 100.0), "{:?}", modal);
    }
}

#[test]
fn inline_tuples_join_like_any_source() {
    let output = adapt_tuples(&[("Brasil", 20.0, 67.5, 12.5), ("USA", 45.0, 35.0, 20.0)], "benchmark");
    let out = run_adapted(
        vec![AdaptedSource {
            name: "inline".to_string(),
            role: SourceRole::Benchmark,
            output,
        }],
        "inline".to_string(),
        &Config::default(),
    );
    assert_eq!(out.table.for_period(Period::Benchmark).len(), 2);
}
