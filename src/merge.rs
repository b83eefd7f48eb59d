use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::diagnostics::Diagnostic;
use crate::types::{CanonicalRow, CanonicalTable, Period};

/// What a source contributes to the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceRole {
    /// The reference scenario; every row is re-tagged with `Period::Benchmark`.
    Benchmark,
    Series,
}

#[derive(Debug, Clone)]
pub struct MergePart {
    pub source: String,
    pub role: SourceRole,
    pub rows: Vec<CanonicalRow>,
}

/// Concatenate parts in order. Colliding (country, period) pairs from
/// different sources are all kept and reported; a repeat within one source
/// keeps the first row.
pub fn merge(parts: Vec<MergePart>) -> (CanonicalTable, Vec<Diagnostic>) {
    let mut rows = Vec::new();
    let mut diagnostics = Vec::new();
    let mut seen: HashMap<(String, Period), String> = HashMap::new();

    for part in parts {
        for mut row in part.rows {
            if part.role == SourceRole::Benchmark {
                row.period = Period::Benchmark;
            }
            row.source = part.source.clone();
            let key = (row.country.clone(), row.period);
            match seen.get(&key) {
                Some(first) if *first != row.source => {
                    diagnostics.push(Diagnostic::CrossSourceDuplicate {
                        country: row.country.clone(),
                        period: row.period,
                        first_source: first.clone(),
                        second_source: row.source.clone(),
                    });
                }
                Some(_) => {
                    diagnostics.push(Diagnostic::DuplicateRow {
                        source: row.source,
                        country: row.country,
                        period: row.period,
                    });
                    continue;
                }
                None => {
                    seen.insert(key, row.source.clone());
                }
            }
            rows.push(row);
        }
    }

    (CanonicalTable::new(rows), diagnostics)
}
