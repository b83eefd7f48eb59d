//! Adapter -> canonicalizer -> unit normalizer -> pivot -> merger.

use serde::Serialize;
use serde_json::json;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::adapter::{adapt_text, AdaptOutput};
use crate::config::Config;
use crate::diagnostics::{summarize, Diagnostic};
use crate::logging::{self, ProfileScope};
use crate::merge::{merge, MergePart, SourceRole};
use crate::modal::canonicalize;
use crate::pivot::pivot;
use crate::timeline::{interpolate_years, INTERPOLATED_SOURCE};
use crate::types::{CanonicalRow, CanonicalTable, Observation, Period, RawRecord, SourceShape};
use crate::units::{normalize, rebalance};

/// One input blob. Transport does not matter here; files, embedded seed
/// text and HTTP bodies all arrive as this.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceText {
    pub name: String,
    pub text: String,
    /// `None` lets the adapter detect the shape from the header.
    pub shape: Option<SourceShape>,
    pub role: SourceRole,
}

impl SourceText {
    pub fn series(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            shape: None,
            role: SourceRole::Series,
        }
    }

    pub fn benchmark(name: &str, text: &str) -> Self {
        Self {
            name: name.to_string(),
            text: text.to_string(),
            shape: None,
            role: SourceRole::Benchmark,
        }
    }

    pub fn with_shape(mut self, shape: SourceShape) -> Self {
        self.shape = Some(shape);
        self
    }
}

/// Records already pulled out of a source by an adapter.
#[derive(Debug, Clone)]
pub struct AdaptedSource {
    pub name: String,
    pub role: SourceRole,
    pub output: AdaptOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineOutput {
    pub input_hash: String,
    pub table: CanonicalTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl PipelineOutput {
    pub fn warning_count(&self) -> usize {
        self.diagnostics.len()
    }
}

/// SHA-256 over every source (name, role, shape, text) and the settings
/// that affect output.
pub fn input_hash(sources: &[SourceText], cfg: &Config) -> String {
    let mut hasher = Sha256::new();
    for s in sources {
        hasher.update(s.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(format!("{:?}/{:?}", s.role, s.shape).as_bytes());
        hasher.update([0u8]);
        hasher.update(s.text.as_bytes());
        hasher.update([0u8]);
    }
    hasher.update(cfg.pipeline_fingerprint().as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonicalize labels, parse periods and scale values to percentages.
pub fn normalize_records(
    source: &str,
    records: &[RawRecord],
) -> (Vec<Observation>, Vec<Diagnostic>) {
    let mut observations = Vec::with_capacity(records.len());
    let mut diagnostics = Vec::new();
    for rec in records {
        let period: Period = match rec.period.parse() {
            Ok(p) => p,
            Err(reason) => {
                diagnostics.push(Diagnostic::MalformedRow {
                    source: source.to_string(),
                    line: rec.line,
                    reason,
                });
                continue;
            }
        };
        let label = canonicalize(&rec.modal_label);
        let scaled = normalize(rec.value);
        if scaled.clamped {
            if let Some(modal) = label.modal() {
                diagnostics.push(Diagnostic::OutOfRange {
                    source: source.to_string(),
                    country: rec.country.clone(),
                    period,
                    modal,
                    value: rec.value,
                    clamped_to: scaled.pct,
                });
            }
        }
        observations.push(Observation {
            country: rec.country.clone(),
            period,
            modal: label,
            share_pct: scaled.pct,
            source: source.to_string(),
        });
    }
    (observations, diagnostics)
}

fn rebalance_row(row: &mut CanonicalRow) {
    if let (Some(rail), Some(road), Some(water)) = (row.rail_pct, row.road_pct, row.waterway_pct) {
        if let Some((rail, road, water)) = rebalance(rail, road, water) {
            row.rail_pct = Some(rail);
            row.road_pct = Some(road);
            row.waterway_pct = Some(water);
        }
    }
}

/// Run everything after the adapter. Never fails: problems end up in
/// `diagnostics`.
pub fn run_adapted(sources: Vec<AdaptedSource>, input_hash: String, cfg: &Config) -> PipelineOutput {
    let mut diagnostics = Vec::new();
    let mut parts = Vec::with_capacity(sources.len());

    for src in sources {
        let _scope = ProfileScope::with_context("source", &[("source", logging::v_str(&src.name))]);
        for err in src.output.errors {
            logging::log_row_rejected(&src.name, err.line, &err.reason);
            diagnostics.push(Diagnostic::malformed(&src.name, err));
        }
        let (mut observations, mut found) = normalize_records(&src.name, &src.output.records);
        diagnostics.append(&mut found);
        // A benchmark source is a single scenario whatever periods it lists,
        // so repeats per country collide in the pivot.
        if src.role == SourceRole::Benchmark {
            observations.iter_mut().for_each(|o| o.period = Period::Benchmark);
        }

        let mut pivoted = pivot(&observations, cfg.sum_tolerance);
        diagnostics.append(&mut pivoted.diagnostics);
        if cfg.rebalance {
            pivoted.rows.iter_mut().for_each(rebalance_row);
        }
        parts.push(MergePart {
            source: src.name,
            role: src.role,
            rows: pivoted.rows,
        });
    }

    let (table, mut merged) = {
        let _scope = ProfileScope::new("merge");
        merge(parts)
    };
    diagnostics.append(&mut merged);

    diagnostics
        .iter()
        .filter(|d| !matches!(d, Diagnostic::MalformedRow { .. }))
        .for_each(logging::log_diagnostic);
    logging::log_pipeline_summary(&input_hash, table.len(), &summarize(&diagnostics));
    PipelineOutput {
        input_hash,
        table,
        diagnostics,
    }
}

/// Adapt each source text, then run the rest of the pipeline. A source
/// whose header cannot be understood is dropped with a `BadHeader`.
pub fn run(sources: &[SourceText], cfg: &Config) -> PipelineOutput {
    let hash = input_hash(sources, cfg);
    let mut adapted = Vec::with_capacity(sources.len());
    let mut rejected = Vec::new();

    for src in sources {
        let default_period = match src.role {
            SourceRole::Benchmark => Some("benchmark"),
            SourceRole::Series => None,
        };
        match adapt_text(&src.text, src.shape, default_period) {
            Ok(output) => {
                let shape = output.shape.map(|s| format!("{:?}", s)).unwrap_or_default();
                logging::log_source_adapted(&src.name, &shape, output.records.len(), output.errors.len());
                adapted.push(AdaptedSource {
                    name: src.name.clone(),
                    role: src.role,
                    output,
                });
            }
            Err(reason) => {
                logging::log_source_rejected(&src.name, &reason);
                rejected.push(Diagnostic::BadHeader {
                    source: src.name.clone(),
                    reason,
                });
            }
        }
    }

    let mut out = run_adapted(adapted, hash, cfg);
    rejected.append(&mut out.diagnostics);
    out.diagnostics = rejected;
    out
}

/// Add linearly interpolated rows for the years between `from` and `to`.
/// Only missing (country, year) pairs are filled; an observed row always
/// wins and the skipped estimate is reported. Returns the rows added.
pub fn add_interpolated(out: &mut PipelineOutput, from: i32, to: i32) -> usize {
    let filled = interpolate_years(&out.table, from, to);
    let present: HashMap<(String, Period), String> = out
        .table
        .rows
        .iter()
        .map(|r| ((r.country.clone(), r.period), r.source.clone()))
        .collect();
    let mut added: HashSet<(String, Period)> = HashSet::new();
    let before = out.table.len();

    for row in filled {
        let key = (row.country.clone(), row.period);
        if let Some(first) = present.get(&key) {
            out.diagnostics.push(Diagnostic::CrossSourceDuplicate {
                country: row.country,
                period: row.period,
                first_source: first.clone(),
                second_source: INTERPOLATED_SOURCE.to_string(),
            });
            continue;
        }
        if added.insert(key) {
            out.table.rows.push(row);
        }
    }
    out.table.len() - before
}

/// Memoizes pipeline output by input hash. Unbounded; inputs are small and
/// fixed.
#[derive(Debug, Default)]
pub struct PipelineCache {
    entries: HashMap<String, Arc<PipelineOutput>>,
    pub hits: u64,
    pub misses: u64,
}

impl PipelineCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_or_run(&mut self, sources: &[SourceText], cfg: &Config) -> Arc<PipelineOutput> {
        if !cfg.cache_enabled {
            return Arc::new(run(sources, cfg));
        }
        let key = input_hash(sources, cfg);
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            logging::log_cache("cache_hit", &key, self.entries.len());
            return Arc::clone(hit);
        }
        self.misses += 1;
        let out = Arc::new(run(sources, cfg));
        self.entries.insert(key.clone(), Arc::clone(&out));
        logging::log_cache("cache_miss", &key, self.entries.len());
        out
    }
}

/// Compact JSON summary of an output, for CLI and server responses.
pub fn summary_json(out: &PipelineOutput) -> serde_json::Value {
    json!({
        "input_hash": out.input_hash,
        "rows": out.table.len(),
        "periods": out.table.periods(),
        "diagnostics": summarize(&out.diagnostics),
    })
}
