//! Writes `<file>.manifest.json` next to a source table: hash, shape,
//! coverage and every row that would be rejected.

use modalshare::data::{analyze_source, default_manifest_path, validate_schema};
use modalshare::logging::ts_epoch_secs;
use serde_json::json;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    let mut args = env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: dataset_manifest FILE [DEFAULT_PERIOD]");
        std::process::exit(1);
    };
    let default_period = args.next();

    let text = match fs::read_to_string(&path) {
        Ok(t) => t,
        Err(err) => {
            eprintln!("failed to read {}: {}", path, err);
            std::process::exit(1);
        }
    };

    let schema = validate_schema(&text);
    if !schema.ok {
        eprintln!("schema mismatch: {}", schema.message);
        eprintln!("columns: {:?}", schema.columns);
        std::process::exit(2);
    }

    let manifest = match analyze_source(&path, &text, default_period.as_deref(), ts_epoch_secs()) {
        Ok(m) => m,
        Err(err) => {
            eprintln!("analysis failed: {}", err);
            std::process::exit(3);
        }
    };

    let out_path = default_manifest_path(PathBuf::from(&path).as_path());
    let payload = json!({
        "manifest": manifest,
        "schema": schema,
    });
    let body = match serde_json::to_string_pretty(&payload) {
        Ok(b) => b,
        Err(err) => {
            eprintln!("failed to encode manifest: {}", err);
            std::process::exit(4);
        }
    };
    if let Err(err) = fs::write(&out_path, body) {
        eprintln!("failed to write {}: {}", out_path.display(), err);
        std::process::exit(4);
    }
    println!("wrote manifest {}", out_path.display());
}
