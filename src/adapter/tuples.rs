use super::types::AdaptOutput;
use crate::diagnostics::RowError;
use crate::modal::Modal;
use crate::types::{RawRecord, SourceShape};

/// (country, rail, road, waterway)
pub type ShareTuple<'a> = (&'a str, f64, f64, f64);

/// Adapt literal tuples for a single period into the same raw records a
/// structured table would produce.
pub fn adapt_tuples(rows: &[ShareTuple<'_>], period: &str) -> AdaptOutput {
    let mut out = AdaptOutput::new(SourceShape::Structured);
    for (i, (country, rail, road, waterway)) in rows.iter().enumerate() {
        let line = i + 1;
        if country.trim().is_empty() {
            out.errors.push(RowError {
                line,
                reason: "blank country".to_string(),
            });
            continue;
        }
        let values = [(Modal::Rail, *rail), (Modal::Road, *road), (Modal::Waterway, *waterway)];
        if let Some((modal, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            out.errors.push(RowError {
                line,
                reason: format!("non-finite {} share", modal),
            });
            continue;
        }
        for (modal, value) in values {
            out.records.push(RawRecord {
                country: country.trim().to_string(),
                modal_label: modal.heading().to_string(),
                period: period.to_string(),
                value,
                line,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::canonicalize;

    #[test]
    fn test_tuples_emit_three_records_each() {
        let out = adapt_tuples(&[("Brasil", 20.0, 65.0, 15.0), ("China", 40.0, 15.0, 45.0)], "benchmark");
        assert_eq!(out.records.len(), 6);
        assert!(out.records.iter().all(|r| canonicalize(&r.modal_label).modal().is_some()));
    }

    #[test]
    fn test_nan_tuple_rejected() {
        let out = adapt_tuples(&[("Brasil", f64::NAN, 65.0, 15.0)], "2014");
        assert!(out.records.is_empty());
        assert_eq!(out.errors.len(), 1);
    }
}
