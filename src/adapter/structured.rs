use super::types::{parse_cell, AdaptOutput, RawTable};
use super::unified::SourceAdapter;
use crate::diagnostics::RowError;
use crate::modal::canonicalize;
use crate::types::{RawRecord, SourceShape};

/// Rows that already carry one column per modal share.
pub struct StructuredAdapter {
    /// Period used when the table has no period column.
    pub default_period: Option<String>,
}

impl StructuredAdapter {
    pub fn new(default_period: Option<String>) -> Self {
        Self { default_period }
    }

    /// (column index, header label) for every header cell naming a modal.
    pub fn modal_columns(table: &RawTable) -> Vec<(usize, String)> {
        table
            .header
            .iter()
            .enumerate()
            .filter(|(_, h)| canonicalize(h).modal().is_some())
            .map(|(i, h)| (i, h.clone()))
            .collect()
    }
}

impl SourceAdapter for StructuredAdapter {
    fn shape(&self) -> SourceShape {
        SourceShape::Structured
    }

    fn adapt(&self, table: &RawTable) -> Result<AdaptOutput, String> {
        let country_idx = table.country_column().ok_or("missing country column")?;
        let period_idx = table.period_column();
        if period_idx.is_none() && self.default_period.is_none() {
            return Err("missing period column and no default period".to_string());
        }
        let modals = Self::modal_columns(table);
        if modals.is_empty() {
            return Err("no modal share columns".to_string());
        }

        let mut out = AdaptOutput::new(self.shape());
        out.errors.extend(table.errors.iter().cloned());
        let width = table.header.len();

        for (line, cells) in &table.rows {
            if cells.len() != width {
                out.errors.push(RowError {
                    line: *line,
                    reason: format!("expected {} columns, got {}", width, cells.len()),
                });
                continue;
            }
            let country = &cells[country_idx];
            if country.is_empty() {
                out.errors.push(RowError {
                    line: *line,
                    reason: "blank country".to_string(),
                });
                continue;
            }
            let period = period_idx
                .map(|i| cells[i].clone())
                .filter(|p| !p.is_empty())
                .or_else(|| self.default_period.clone());
            let Some(period) = period else {
                out.errors.push(RowError {
                    line: *line,
                    reason: "blank period".to_string(),
                });
                continue;
            };

            let mut row_records = Vec::with_capacity(modals.len());
            let mut bad = None;
            for (idx, label) in &modals {
                match parse_cell(&cells[*idx]) {
                    Ok(Some(value)) => row_records.push(RawRecord {
                        country: country.clone(),
                        modal_label: label.clone(),
                        period: period.clone(),
                        value,
                        line: *line,
                    }),
                    Ok(None) => {}
                    Err(reason) => {
                        bad = Some(format!("{} in column {}", reason, label));
                        break;
                    }
                }
            }
            match bad {
                Some(reason) => out.errors.push(RowError { line: *line, reason }),
                None => out.records.extend(row_records),
            }
        }
        Ok(out)
    }
}
