use std::collections::{BTreeMap, HashMap};

use crate::diagnostics::Diagnostic;
use crate::modal::ModalLabel;
use crate::types::{CanonicalRow, Observation, Period};

#[derive(Debug, Clone, Default)]
pub struct PivotOutput {
    pub rows: Vec<CanonicalRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Group observations into one row per (country, period).
///
/// Rows appear in first-seen order. Unmapped modal labels are rejected and
/// counted; for a repeated (country, period, modal) the first value wins.
/// Rows whose present shares sum outside `100 ± sum_tolerance` are kept and
/// flagged.
pub fn pivot(observations: &[Observation], sum_tolerance: f64) -> PivotOutput {
    let mut out = PivotOutput::default();
    let mut index: HashMap<(String, Period), usize> = HashMap::new();
    let mut unmapped: BTreeMap<(String, String), usize> = BTreeMap::new();

    for obs in observations {
        let modal = match &obs.modal {
            ModalLabel::Canonical(m) => *m,
            ModalLabel::Unmapped(label) => {
                *unmapped
                    .entry((obs.source.clone(), label.clone()))
                    .or_insert(0) += 1;
                continue;
            }
        };

        let key = (obs.country.clone(), obs.period);
        let idx = *index.entry(key).or_insert_with(|| {
            out.rows
                .push(CanonicalRow::new(&obs.country, obs.period, &obs.source));
            out.rows.len() - 1
        });

        let slot = out.rows[idx].slot_mut(modal);
        match *slot {
            Some(kept) => out.diagnostics.push(Diagnostic::DuplicateObservation {
                source: obs.source.clone(),
                country: obs.country.clone(),
                period: obs.period,
                modal,
                kept,
                discarded: obs.share_pct,
            }),
            None => *slot = Some(obs.share_pct),
        }
    }

    for ((source, label), count) in unmapped {
        out.diagnostics
            .push(Diagnostic::UnmappedModal { source, label, count });
    }

    for row in &out.rows {
        if let Some(sum) = row.present_sum() {
            if (sum - 100.0).abs() > sum_tolerance {
                out.diagnostics.push(Diagnostic::ShareSumDrift {
                    source: row.source.clone(),
                    country: row.country.clone(),
                    period: row.period,
                    sum,
                });
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::{canonicalize, Modal};

    fn obs(country: &str, period: Period, label: &str, pct: f64) -> Observation {
        Observation {
            country: country.to_string(),
            period,
            modal: canonicalize(label),
            share_pct: pct,
            source: "series".to_string(),
        }
    }

    #[test]
    fn test_three_modals_fold_into_one_row() {
        let y = Period::Year(2014);
        let out = pivot(
            &[
                obs("Alemanha", y, "Rail", 18.8),
                obs("Alemanha", y, "Road", 71.3),
                obs("Alemanha", y, "Waterway", 9.9),
            ],
            1.0,
        );
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].share(Modal::Rail), Some(18.8));
        assert_eq!(out.rows[0].share(Modal::Waterway), Some(9.9));
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn test_first_seen_wins_on_duplicate() {
        let y = Period::Year(2014);
        let out = pivot(
            &[
                obs("Brasil", y, "Rail", 16.5),
                obs("Brasil", y, "Ferroviario - Freight transport", 19.3),
            ],
            100.0,
        );
        assert_eq!(out.rows[0].rail_pct, Some(16.5));
        assert!(matches!(
            out.diagnostics[0],
            Diagnostic::DuplicateObservation { kept, discarded, .. } if kept == 16.5 && discarded == 19.3
        ));
    }

    #[test]
    fn test_missing_modal_stays_absent_and_zero_kept() {
        let y = Period::Year(2014);
        let out = pivot(
            &[obs("Canada", y, "Rail", 59.8), obs("Canada", y, "Waterway", 0.0)],
            100.0,
        );
        assert_eq!(out.rows[0].road_pct, None);
        assert_eq!(out.rows[0].waterway_pct, Some(0.0));
    }

    #[test]
    fn test_unmapped_labels_counted_not_pivoted() {
        let y = Period::Year(2014);
        let out = pivot(
            &[
                obs("China", y, "Pipeline", 3.0),
                obs("China", y, "Pipeline", 4.0),
                obs("China", y, "Rail", 15.3),
            ],
            100.0,
        );
        assert_eq!(out.rows.len(), 1);
        assert!(out.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::UnmappedModal { label, count: 2, .. } if label == "Pipeline"
        )));
    }

    #[test]
    fn test_sum_drift_flagged_row_kept() {
        let y = Period::Year(2014);
        let out = pivot(
            &[
                obs("Hungria", y, "Rail", 19.8),
                obs("Hungria", y, "Road", 70.0),
                obs("Hungria", y, "Waterway", 3.9),
            ],
            1.0,
        );
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.diagnostics[0].kind(), "share_sum_drift");
    }

    #[test]
    fn test_rows_keep_first_seen_order() {
        let out = pivot(
            &[
                obs("Russia", Period::Year(2015), "Rail", 86.9),
                obs("Alemanha", Period::Year(2014), "Rail", 18.8),
                obs("Russia", Period::Year(2014), "Rail", 86.4),
            ],
            100.0,
        );
        let keys: Vec<_> = out.rows.iter().map(|r| (r.country.as_str(), r.period)).collect();
        assert_eq!(
            keys,
            vec![
                ("Russia", Period::Year(2015)),
                ("Alemanha", Period::Year(2014)),
                ("Russia", Period::Year(2014)),
            ]
        );
    }
}
