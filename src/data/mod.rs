use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::adapter::unified::adapter_for;
use crate::adapter::{detect_shape, RawTable};
use crate::modal::canonicalize;
use crate::types::{Period, SourceShape};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub path: String,
    pub hash_sha256: String,
    pub shape: Option<SourceShape>,
    pub columns: Vec<String>,
    pub row_count: u64,
    pub record_count: u64,
    pub bad_rows: u64,
    pub countries: Vec<String>,
    pub period_min: Option<Period>,
    pub period_max: Option<Period>,
    pub unmapped_labels: Vec<String>,
    pub warnings: Vec<String>,
    pub generated_at_epoch: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaReport {
    pub columns: Vec<String>,
    pub shape: Option<SourceShape>,
    pub ok: bool,
    pub message: String,
}

/// Header check without adapting any rows.
pub fn validate_schema(text: &str) -> SchemaReport {
    let table = match RawTable::parse(text) {
        Ok(t) => t,
        Err(err) => {
            return SchemaReport {
                columns: Vec::new(),
                shape: None,
                ok: false,
                message: err,
            }
        }
    };
    match detect_shape(&table) {
        Ok(shape) => SchemaReport {
            columns: table.header,
            shape: Some(shape),
            ok: true,
            message: format!("schema ok: {:?}", shape),
        },
        Err(err) => SchemaReport {
            columns: table.header,
            shape: None,
            ok: false,
            message: err,
        },
    }
}

/// Describe a source: shape, size, coverage and problems. `default_period`
/// is used for structured sources without a period column.
pub fn analyze_source(
    name: &str,
    text: &str,
    default_period: Option<&str>,
    now_ts: u64,
) -> Result<DatasetManifest, String> {
    let table = RawTable::parse(text)?;
    let mut warnings = Vec::new();

    let shape = match detect_shape(&table) {
        Ok(s) => Some(s),
        Err(err) => {
            warnings.push(format!("bad_header: {}", err));
            None
        }
    };

    let mut manifest = DatasetManifest {
        path: name.to_string(),
        hash_sha256: text_sha256(text),
        shape,
        columns: table.header.clone(),
        row_count: table.rows.len() as u64,
        record_count: 0,
        bad_rows: table.errors.len() as u64,
        countries: Vec::new(),
        period_min: None,
        period_max: None,
        unmapped_labels: Vec::new(),
        warnings,
        generated_at_epoch: now_ts,
    };
    let Some(shape) = shape else {
        return Ok(manifest);
    };

    let output = match adapter_for(shape, default_period).adapt(&table) {
        Ok(o) => o,
        Err(err) => {
            manifest.warnings.push(format!("bad_header: {}", err));
            return Ok(manifest);
        }
    };
    manifest.bad_rows = output.errors.len() as u64;
    manifest.record_count = output.records.len() as u64;
    for err in &output.errors {
        manifest
            .warnings
            .push(format!("bad_row: line {}: {}", err.line, err.reason));
    }
    for rec in &output.records {
        if !manifest.countries.contains(&rec.country) {
            manifest.countries.push(rec.country.clone());
        }
        if canonicalize(&rec.modal_label).modal().is_none()
            && !manifest.unmapped_labels.contains(&rec.modal_label)
        {
            manifest.unmapped_labels.push(rec.modal_label.clone());
        }
        match rec.period.parse::<Period>() {
            Ok(p) => {
                manifest.period_min = Some(manifest.period_min.map_or(p, |m| m.min(p)));
                manifest.period_max = Some(manifest.period_max.map_or(p, |m| m.max(p)));
            }
            Err(err) => manifest.warnings.push(format!("bad_period: line {}: {}", rec.line, err)),
        }
    }
    if manifest.record_count == 0 {
        manifest.warnings.push("no_records".to_string());
    }
    Ok(manifest)
}

pub fn text_sha256(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

pub fn file_sha256(path: &Path) -> Result<String, String> {
    let mut file = File::open(path).map_err(|e| e.to_string())?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).map_err(|e| e.to_string())?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

pub fn default_manifest_path(dataset_path: &Path) -> PathBuf {
    let mut p = dataset_path.to_path_buf();
    let fname = dataset_path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset.csv");
    p.set_file_name(format!("{}.manifest.json", fname));
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_path_sits_next_to_input() {
        let p = default_manifest_path(Path::new("/data/modal.csv"));
        assert_eq!(p, PathBuf::from("/data/modal.csv.manifest.json"));
    }

    #[test]
    fn test_text_hash_is_hex_sha256() {
        let h = text_sha256("abc");
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
