//! Structured JSON-lines logging for pipeline runs.
//!
//! Every line carries a run id and a monotonically increasing sequence
//! number so a run can be replayed from its log. Lines go to stderr; when
//! `LOG_DIR` is set they are also written under `$LOG_DIR/<run_id>/`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use crate::diagnostics::Diagnostic;

// =============================================================================
// Log Levels
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    pub fn from_env() -> Self {
        match std::env::var("LOG_LEVEL").as_deref() {
            Ok("trace") => Level::Trace,
            Ok("debug") => Level::Debug,
            Ok("info") => Level::Info,
            Ok("warn") => Level::Warn,
            Ok("error") => Level::Error,
            _ => Level::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
        }
    }
}

// =============================================================================
// Log Domains (categories for filtering)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Adapter, // Source parsing, row rejects
    Modal,   // Label lookup misses
    Units,   // Scaling and clamping
    Pivot,   // Grouping, duplicates
    Merge,   // Cross-source collisions
    Cache,   // Memoization hits/misses
    Feed,    // Remote fetches
    Query,   // Period views
    System,  // Startup, shutdown
    Profile, // Stage timings
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Adapter => "adapter",
            Domain::Modal => "modal",
            Domain::Units => "units",
            Domain::Pivot => "pivot",
            Domain::Merge => "merge",
            Domain::Cache => "cache",
            Domain::Feed => "feed",
            Domain::Query => "query",
            Domain::System => "system",
            Domain::Profile => "profile",
        }
    }

    pub fn is_enabled(&self) -> bool {
        // LOG_DOMAINS: comma-separated list or "all"
        match std::env::var("LOG_DOMAINS").as_deref() {
            Ok("all") | Err(_) => true,
            Ok(domains) => domains.split(',').any(|d| d.trim() == self.as_str()),
        }
    }
}

// =============================================================================
// Run context
// =============================================================================

static LOG_SEQ: AtomicU64 = AtomicU64::new(0);
static RUN_CONTEXT: OnceLock<RunContext> = OnceLock::new();

fn next_seq() -> u64 {
    LOG_SEQ.fetch_add(1, Ordering::SeqCst)
}

#[derive(Debug)]
struct RunContext {
    run_id: String,
    events: Option<Mutex<BufWriter<File>>>,
    trace: Option<Mutex<BufWriter<File>>>,
}

fn open_sink(path: PathBuf) -> Option<Mutex<BufWriter<File>>> {
    match File::create(&path) {
        Ok(f) => Some(Mutex::new(BufWriter::new(f))),
        Err(err) => {
            eprintln!("[log] failed to create {}: {}", path.display(), err);
            None
        }
    }
}

fn ensure_run_context() -> &'static RunContext {
    RUN_CONTEXT.get_or_init(|| {
        let run_id = std::env::var("RUN_ID")
            .unwrap_or_else(|_| format!("r-{}-{}", ts_epoch_ms(), process::id()));
        let Ok(base) = std::env::var("LOG_DIR") else {
            return RunContext {
                run_id,
                events: None,
                trace: None,
            };
        };
        let mut run_dir = PathBuf::from(base);
        run_dir.push(&run_id);
        if let Err(err) = create_dir_all(&run_dir) {
            eprintln!("[log] failed to create run dir: {}", err);
        }
        let _ = std::fs::write(
            run_dir.join("manifest.json"),
            json!({
                "run_id": run_id,
                "ts": ts_now(),
                "pid": process::id(),
                "log_dir": run_dir.to_string_lossy(),
            })
            .to_string(),
        );
        RunContext {
            events: open_sink(run_dir.join("events.jsonl")),
            trace: open_sink(run_dir.join("trace.jsonl")),
            run_id,
        }
    })
}

/// Run id shared by every line of this process; forces sink setup.
pub fn run_id() -> &'static str {
    &ensure_run_context().run_id
}

fn sanitize_fields(mut fields: Map<String, Value>) -> Map<String, Value> {
    let redacted = Value::String("[REDACTED]".to_string());
    for key in ["authorization", "Authorization", "api_key", "token"] {
        if fields.contains_key(key) {
            fields.insert(key.to_string(), redacted.clone());
        }
    }
    fields
}

fn split_fields(mut fields: Map<String, Value>) -> (Map<String, Value>, Map<String, Value>) {
    let mut top = Map::new();
    for key in ["source", "input_hash", "period", "msg"] {
        if let Some(value) = fields.remove(key) {
            top.insert(key.to_string(), value);
        }
    }
    (top, fields)
}

fn write_line(writer: &Option<Mutex<BufWriter<File>>>, line: &str) {
    if let Some(Ok(mut w)) = writer.as_ref().map(|m| m.lock()) {
        let _ = writeln!(w, "{}", line);
        let _ = w.flush();
    }
}

// =============================================================================
// Core logging functions
// =============================================================================

/// RFC3339 timestamp with milliseconds
pub fn ts_now() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn ts_epoch_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}

pub fn ts_epoch_secs() -> u64 {
    Utc::now().timestamp() as u64
}

/// Emit a structured log entry
pub fn log(level: Level, domain: Domain, event: &str, fields: Map<String, Value>) {
    if level < Level::from_env() || !domain.is_enabled() {
        return;
    }
    let line = render(level, domain.as_str(), event, fields);
    let ctx = ensure_run_context();
    match level {
        Level::Trace | Level::Debug => write_line(&ctx.trace, &line),
        _ => write_line(&ctx.events, &line),
    }
    eprintln!("{}", line);
}

fn render(level: Level, component: &str, event: &str, fields: Map<String, Value>) -> String {
    let ctx = ensure_run_context();
    let (mut top, data) = split_fields(sanitize_fields(fields));

    let msg = top.remove("msg").unwrap_or(Value::String(String::new()));
    let mut entry = Map::new();
    entry.insert("ts".to_string(), json!(ts_now()));
    entry.insert("run_id".to_string(), json!(ctx.run_id.clone()));
    entry.insert("seq".to_string(), json!(next_seq()));
    entry.insert("lvl".to_string(), json!(level.as_str().to_uppercase()));
    entry.insert("component".to_string(), json!(component));
    entry.insert("event".to_string(), json!(event));
    entry.insert("msg".to_string(), msg);
    for (k, v) in top {
        entry.insert(k, v);
    }
    entry.insert("data".to_string(), Value::Object(data));
    Value::Object(entry).to_string()
}

// =============================================================================
// Pipeline logs
// =============================================================================

pub fn log_row_rejected(source: &str, line: usize, reason: &str) {
    log(
        Level::Debug,
        Domain::Adapter,
        "row_rejected",
        obj(&[
            ("source", v_str(source)),
            ("line", json!(line)),
            ("reason", v_str(reason)),
        ]),
    );
}

pub fn log_source_rejected(source: &str, reason: &str) {
    log(
        Level::Warn,
        Domain::Adapter,
        "source_rejected",
        obj(&[("source", v_str(source)), ("reason", v_str(reason))]),
    );
}

pub fn log_source_adapted(source: &str, shape: &str, records: usize, bad_rows: usize) {
    log(
        Level::Info,
        Domain::Adapter,
        "source_adapted",
        obj(&[
            ("source", v_str(source)),
            ("shape", v_str(shape)),
            ("records", json!(records)),
            ("bad_rows", json!(bad_rows)),
        ]),
    );
}

pub fn log_pipeline_summary(input_hash: &str, rows: usize, counts: &BTreeMap<&'static str, usize>) {
    let by_kind: Map<String, Value> = counts
        .iter()
        .map(|(k, v)| ((*k).to_string(), json!(v)))
        .collect();
    let level = if counts.is_empty() { Level::Info } else { Level::Warn };
    log(
        level,
        Domain::System,
        "pipeline_summary",
        obj(&[
            ("input_hash", v_str(input_hash)),
            ("rows", json!(rows)),
            ("diagnostics", Value::Object(by_kind)),
        ]),
    );
}

/// Which stage owns a diagnostic.
pub fn diagnostic_domain(diag: &Diagnostic) -> Domain {
    match diag {
        Diagnostic::MalformedRow { .. } | Diagnostic::BadHeader { .. } => Domain::Adapter,
        Diagnostic::UnmappedModal { .. } => Domain::Modal,
        Diagnostic::OutOfRange { .. } => Domain::Units,
        Diagnostic::DuplicateObservation { .. } | Diagnostic::ShareSumDrift { .. } => Domain::Pivot,
        Diagnostic::CrossSourceDuplicate { .. } | Diagnostic::DuplicateRow { .. } => Domain::Merge,
    }
}

pub fn log_diagnostic(diag: &Diagnostic) {
    let fields = match serde_json::to_value(diag) {
        Ok(Value::Object(mut m)) => {
            m.remove("kind");
            m
        }
        _ => Map::new(),
    };
    log(Level::Warn, diagnostic_domain(diag), diag.kind(), fields);
}

pub fn log_cache(event: &str, input_hash: &str, entries: usize) {
    log(
        Level::Debug,
        Domain::Cache,
        event,
        obj(&[("input_hash", v_str(input_hash)), ("entries", json!(entries))]),
    );
}

pub fn log_fetch(url: &str, status: &str, bytes: usize) {
    log(
        Level::Info,
        Domain::Feed,
        "remote_fetch",
        obj(&[
            ("url", v_str(url)),
            ("status", v_str(status)),
            ("bytes", json!(bytes)),
        ]),
    );
}

pub fn log_view(period: &str, rows: usize, notice: Option<&str>) {
    log(
        Level::Debug,
        Domain::Query,
        "period_view",
        obj(&[
            ("period", v_str(period)),
            ("rows", json!(rows)),
            ("notice", notice.map(v_str).unwrap_or(Value::Null)),
        ]),
    );
}

// =============================================================================
// Utility Functions
// =============================================================================

pub fn obj(pairs: &[(&str, Value)]) -> Map<String, Value> {
    let mut map = Map::new();
    for (k, v) in pairs {
        map.insert((*k).to_string(), v.clone());
    }
    map
}

pub fn v_str(s: &str) -> Value {
    Value::String(s.to_string())
}

pub fn v_num(n: f64) -> Value {
    json!(n)
}

// =============================================================================
// Profiling Scope
// =============================================================================

/// Emits the elapsed time of a pipeline stage on drop.
pub struct ProfileScope {
    label: &'static str,
    context: Map<String, Value>,
    started: Instant,
}

impl ProfileScope {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            context: Map::new(),
            started: Instant::now(),
        }
    }

    pub fn with_context(label: &'static str, fields: &[(&str, Value)]) -> Self {
        Self {
            label,
            context: obj(fields),
            started: Instant::now(),
        }
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut fields = std::mem::take(&mut self.context);
        fields.insert("label".to_string(), v_str(self.label));
        fields.insert("elapsed_ms".to_string(), v_num(elapsed_ms));
        log(Level::Trace, Domain::Profile, "profile", fields);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_obj_helper() {
        let m = obj(&[("key", v_str("value")), ("num", v_num(42.0))]);
        assert_eq!(m.get("key").unwrap(), "value");
        assert_eq!(m.get("num").unwrap(), 42.0);
    }

    #[test]
    fn test_seq_increments() {
        let s1 = next_seq();
        let s2 = next_seq();
        assert!(s2 > s1);
    }

    #[test]
    fn test_render_hoists_source_and_redacts() {
        let line = render(
            Level::Info,
            "feed",
            "remote_fetch",
            obj(&[("source", v_str("remote")), ("token", v_str("secret")), ("bytes", json!(10))]),
        );
        let v: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(v["source"], "remote");
        assert_eq!(v["lvl"], "INFO");
        assert_eq!(v["data"]["token"], "[REDACTED]");
        assert_eq!(v["data"]["bytes"], 10);
    }

    #[test]
    fn test_diagnostic_domains() {
        let unmapped = Diagnostic::UnmappedModal {
            source: "s".to_string(),
            label: "Aereo".to_string(),
            count: 2,
        };
        assert_eq!(diagnostic_domain(&unmapped), Domain::Modal);
        let clamp = Diagnostic::OutOfRange {
            source: "s".to_string(),
            country: "A".to_string(),
            period: crate::types::Period::Year(2014),
            modal: crate::modal::Modal::Rail,
            value: 1.5,
            clamped_to: 100.0,
        };
        assert_eq!(diagnostic_domain(&clamp), Domain::Units);
        let dup = Diagnostic::DuplicateRow {
            source: "s".to_string(),
            country: "A".to_string(),
            period: crate::types::Period::Benchmark,
        };
        assert_eq!(diagnostic_domain(&dup), Domain::Merge);
    }
}
