use super::types::{parse_cell, AdaptOutput, RawTable};
use super::unified::SourceAdapter;
use crate::diagnostics::RowError;
use crate::types::{RawRecord, SourceShape};

/// Unpivots one row per (country, modal label) with a column per year.
pub struct WideYearAdapter;

impl SourceAdapter for WideYearAdapter {
    fn shape(&self) -> SourceShape {
        SourceShape::WideYear
    }

    fn adapt(&self, table: &RawTable) -> Result<AdaptOutput, String> {
        let country_idx = table.country_column().ok_or("missing country column")?;
        let modal_idx = table.modal_column().ok_or("missing modal label column")?;
        let years = table.year_columns();
        if years.is_empty() {
            return Err("no year columns".to_string());
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
            let label = &cells[modal_idx];
            if country.is_empty() || label.is_empty() {
                out.errors.push(RowError {
                    line: *line,
                    reason: "blank country or modal label".to_string(),
                });
                continue;
            }

            let mut row_records = Vec::with_capacity(years.len());
            let mut bad = None;
            for (idx, year) in &years {
                match parse_cell(&cells[*idx]) {
                    Ok(Some(value)) => row_records.push(RawRecord {
                        country: country.clone(),
                        modal_label: label.clone(),
                        period: year.clone(),
                        value,
                        line: *line,
                    }),
                    Ok(None) => {}
                    Err(reason) => {
                        bad = Some(format!("{} in column {}", reason, year));
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
