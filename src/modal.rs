//! Transport modes and the fixed lookup from source labels to them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modal {
    Rail,
    Road,
    Waterway,
}

impl Modal {
    pub const ALL: [Modal; 3] = [Modal::Rail, Modal::Road, Modal::Waterway];

    pub fn as_str(&self) -> &'static str {
        match self {
            Modal::Rail => "rail",
            Modal::Road => "road",
            Modal::Waterway => "waterway",
        }
    }

    /// Column heading used when rendering tables.
    pub fn heading(&self) -> &'static str {
        match self {
            Modal::Rail => "Rail (%)",
            Modal::Road => "Road (%)",
            Modal::Waterway => "Waterway (%)",
        }
    }
}

impl fmt::Display for Modal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of looking up a source label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalLabel {
    Canonical(Modal),
    /// No table entry matched; carries the label exactly as given.
    Unmapped(String),
}

impl ModalLabel {
    pub fn modal(&self) -> Option<Modal> {
        match self {
            ModalLabel::Canonical(m) => Some(*m),
            ModalLabel::Unmapped(_) => None,
        }
    }
}

// Keys are stored already folded by `label_key`.
const LABELS: &[(&str, Modal)] = &[
    ("rail", Modal::Rail),
    ("railway", Modal::Rail),
    ("rail (%)", Modal::Rail),
    ("ferroviario", Modal::Rail),
    ("ferroviário", Modal::Rail),
    ("ferroviario (%)", Modal::Rail),
    ("ferroviário (%)", Modal::Rail),
    ("ferroviario - freight transport", Modal::Rail),
    ("ferroviário - freight transport", Modal::Rail),
    ("rail - freight transport", Modal::Rail),
    ("road", Modal::Road),
    ("road (%)", Modal::Road),
    ("rodoviario", Modal::Road),
    ("rodoviário", Modal::Road),
    ("rodoviario (%)", Modal::Road),
    ("rodoviário (%)", Modal::Road),
    ("rodoviario - freight transport", Modal::Road),
    ("rodoviário - freight transport", Modal::Road),
    ("road - freight transport", Modal::Road),
    ("waterway", Modal::Waterway),
    ("waterways", Modal::Waterway),
    ("waterway (%)", Modal::Waterway),
    ("inland waterways", Modal::Waterway),
    ("aquaviario", Modal::Waterway),
    ("aquaviário", Modal::Waterway),
    ("aquaviario (%)", Modal::Waterway),
    ("aquaviário (%)", Modal::Waterway),
    ("hidroviario", Modal::Waterway),
    ("hidroviário", Modal::Waterway),
    ("aquaviario - freight transport", Modal::Waterway),
    ("aquaviário - freight transport", Modal::Waterway),
    ("inland waterways - freight transport", Modal::Waterway),
];

/// Trim, lowercase and collapse whitespace runs. Hyphen spacing is
/// normalised to " - " so "Rail-Freight" and "Rail -  Freight" agree.
pub fn label_key(label: &str) -> String {
    let spaced = label.replace('-', " - ");
    spaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn canonicalize(label: &str) -> ModalLabel {
    let key = label_key(label);
    LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, m)| ModalLabel::Canonical(*m))
        .unwrap_or_else(|| ModalLabel::Unmapped(label.to_string()))
}
