use csv::{ReaderBuilder, Trim};

use crate::diagnostics::RowError;
use crate::types::{RawRecord, SourceShape};

const COUNTRY_COLUMNS: [&str; 4] = ["pais", "país", "country", "country name"];
const MODAL_COLUMNS: [&str; 5] = ["combined measure", "modal", "mode", "measure", "transport mode"];
const PERIOD_COLUMNS: [&str; 6] = ["ano", "year", "period", "periodo", "período", "time"];

/// A source table split into header and data rows, before interpretation.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    /// (1-based line, cells)
    pub rows: Vec<(usize, Vec<String>)>,
    /// Rows the CSV reader itself could not decode.
    pub errors: Vec<RowError>,
}

impl RawTable {
    pub fn parse(text: &str) -> Result<Self, String> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .comment(Some(b'#'))
            .from_reader(text.as_bytes());

        let mut table = RawTable::default();
        for result in reader.records() {
            match result {
                Ok(record) => {
                    let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
                    let cells: Vec<String> = record.iter().map(|c| c.to_string()).collect();
                    if cells.iter().all(|c| c.is_empty()) {
                        continue;
                    }
                    if table.header.is_empty() {
                        table.header = cells;
                    } else {
                        table.rows.push((line, cells));
                    }
                }
                Err(err) => {
                    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
                    table.errors.push(RowError {
                        line,
                        reason: format!("unreadable row: {}", err),
                    });
                }
            }
        }
        if table.header.is_empty() {
            return Err("missing header".to_string());
        }
        Ok(table)
    }

    pub fn column(&self, aliases: &[&str]) -> Option<usize> {
        self.header
            .iter()
            .position(|h| aliases.contains(&h.trim().to_lowercase().as_str()))
    }

    pub fn country_column(&self) -> Option<usize> {
        self.column(&COUNTRY_COLUMNS)
    }

    pub fn modal_column(&self) -> Option<usize> {
        self.column(&MODAL_COLUMNS)
    }

    pub fn period_column(&self) -> Option<usize> {
        self.column(&PERIOD_COLUMNS)
    }

    /// (column index, year text) for every header cell that is a calendar year.
    pub fn year_columns(&self) -> Vec<(usize, String)> {
        self.header
            .iter()
            .enumerate()
            .filter(|(_, h)| is_year(h))
            .map(|(i, h)| (i, h.trim().to_string()))
            .collect()
    }
}

pub fn is_year(cell: &str) -> bool {
    matches!(cell.trim().parse::<i32>(), Ok(y) if (1900..=2100).contains(&y))
}

/// Parse a numeric cell. `Ok(None)` means the cell is blank.
pub fn parse_cell(cell: &str) -> Result<Option<f64>, String> {
    let trimmed = cell.trim().trim_end_matches('%').trim_end();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let text = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    let value = text
        .parse::<f64>()
        .map_err(|_| format!("non-numeric value {:?}", cell))?;
    if !value.is_finite() {
        return Err(format!("non-finite value {:?}", cell));
    }
    Ok(Some(value))
}

/// Everything one adapter pass produced.
#[derive(Debug, Clone, Default)]
pub struct AdaptOutput {
    pub shape: Option<SourceShape>,
    pub records: Vec<RawRecord>,
    pub errors: Vec<RowError>,
}

impl AdaptOutput {
    pub fn new(shape: SourceShape) -> Self {
        Self {
            shape: Some(shape),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_variants() {
        assert_eq!(parse_cell(" 0.188 ").unwrap(), Some(0.188));
        assert_eq!(parse_cell("18,8").unwrap(), Some(18.8));
        assert_eq!(parse_cell("67.5%").unwrap(), Some(67.5));
        assert_eq!(parse_cell("").unwrap(), None);
        assert!(parse_cell("abc").is_err());
        assert!(parse_cell("inf").is_err());
    }

    #[test]
    fn test_table_skips_comments_and_blank_lines() {
        let text = "# source: workbook\nPais,Combined measure,2014\n\nBrasil,Rail,0.2\n";
        let table = RawTable::parse(text).unwrap();
        assert_eq!(table.header, vec!["Pais", "Combined measure", "2014"]);
        assert_eq!(table.rows.len(), 1);
        assert!(table.rows[0].0 > 1);
    }

    #[test]
    fn test_column_aliases() {
        let table = RawTable::parse("País,Ano,Ferroviário (%)\n").unwrap();
        assert_eq!(table.country_column(), Some(0));
        assert_eq!(table.period_column(), Some(1));
        assert_eq!(table.modal_column(), None);
        assert!(table.year_columns().is_empty());
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(RawTable::parse("\n\n").is_err());
    }
}
