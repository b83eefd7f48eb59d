use super::structured::StructuredAdapter;
use super::types::{AdaptOutput, RawTable};
use super::wide_year::WideYearAdapter;
use crate::types::SourceShape;

pub trait SourceAdapter {
    fn shape(&self) -> SourceShape;
    /// `Err` rejects the whole source (header problems); row problems are
    /// collected in the output instead.
    fn adapt(&self, table: &RawTable) -> Result<AdaptOutput, String>;
}

pub fn detect_shape(table: &RawTable) -> Result<SourceShape, String> {
    if table.country_column().is_none() {
        return Err(format!("no country column in header {:?}", table.header));
    }
    if table.modal_column().is_some() && !table.year_columns().is_empty() {
        return Ok(SourceShape::WideYear);
    }
    if !StructuredAdapter::modal_columns(table).is_empty() {
        return Ok(SourceShape::Structured);
    }
    Err(format!("unrecognised header {:?}", table.header))
}

pub fn adapter_for(shape: SourceShape, default_period: Option<&str>) -> Box<dyn SourceAdapter> {
    match shape {
        SourceShape::WideYear => Box::new(WideYearAdapter),
        SourceShape::Structured => Box::new(StructuredAdapter::new(default_period.map(str::to_string))),
    }
}

/// Parse `text`, pick an adapter (auto-detecting the shape when not given)
/// and run it.
pub fn adapt_text(
    text: &str,
    shape: Option<SourceShape>,
    default_period: Option<&str>,
) -> Result<AdaptOutput, String> {
    let table = RawTable::parse(text)?;
    let shape = match shape {
        Some(s) => s,
        None => detect_shape(&table)?,
    };
    adapter_for(shape, default_period).adapt(&table)
}
