use serde::Serialize;
use std::collections::BTreeMap;

use crate::modal::Modal;
use crate::types::Period;

/// A row the adapter could not turn into records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub line: usize,
    pub reason: String,
}

/// Recoverable data problem surfaced next to the table. None of these abort
/// a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    MalformedRow {
        source: String,
        line: usize,
        reason: String,
    },
    BadHeader {
        source: String,
        reason: String,
    },
    UnmappedModal {
        source: String,
        label: String,
        count: usize,
    },
    DuplicateObservation {
        source: String,
        country: String,
        period: Period,
        modal: Modal,
        kept: f64,
        discarded: f64,
    },
    OutOfRange {
        source: String,
        country: String,
        period: Period,
        modal: Modal,
        value: f64,
        clamped_to: f64,
    },
    ShareSumDrift {
        source: String,
        country: String,
        period: Period,
        sum: f64,
    },
    CrossSourceDuplicate {
        country: String,
        period: Period,
        first_source: String,
        second_source: String,
    },
    /// A second row for the same (country, period) from one source; the
    /// later row is discarded.
    DuplicateRow {
        source: String,
        country: String,
        period: Period,
    },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MalformedRow { .. } => "malformed_row",
            Diagnostic::BadHeader { .. } => "bad_header",
            Diagnostic::UnmappedModal { .. } => "unmapped_modal",
            Diagnostic::DuplicateObservation { .. } => "duplicate_observation",
            Diagnostic::OutOfRange { .. } => "out_of_range",
            Diagnostic::ShareSumDrift { .. } => "share_sum_drift",
            Diagnostic::CrossSourceDuplicate { .. } => "cross_source_duplicate",
            Diagnostic::DuplicateRow { .. } => "duplicate_row",
        }
    }

    pub fn malformed(source: &str, err: RowError) -> Self {
        Diagnostic::MalformedRow {
            source: source.to_string(),
            line: err.line,
            reason: err.reason,
        }
    }
}

/// Counts per diagnostic kind, for log lines and CLI summaries.
pub fn summarize(diagnostics: &[Diagnostic]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for d in diagnostics {
        *counts.entry(d.kind()).or_insert(0) += 1;
    }
    counts
}
