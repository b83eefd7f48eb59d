use crate::units::{DEFAULT_DISPLAY_DECIMALS, DEFAULT_DISPLAY_FLOOR};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Render-time floor for near-zero shares.
    pub display_floor: f64,
    pub display_decimals: u32,
    /// Allowed distance of a row's share sum from 100 before it is flagged.
    pub sum_tolerance: f64,
    /// Renormalise every complete row to sum to exactly 100.
    pub rebalance: bool,
    pub cache_enabled: bool,
    pub remote_url: Option<String>,
    pub remote_timeout_secs: u64,
    pub server_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_floor: DEFAULT_DISPLAY_FLOOR,
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
            sum_tolerance: 1.0,
            rebalance: false,
            cache_enabled: true,
            remote_url: None,
            remote_timeout_secs: 10,
            server_port: 8765,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            display_floor: std::env::var("MODAL_DISPLAY_FLOOR").ok().and_then(|v| v.parse().ok()).unwrap_or(d.display_floor),
            display_decimals: std::env::var("MODAL_DISPLAY_DECIMALS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.display_decimals),
            sum_tolerance: std::env::var("MODAL_SUM_TOLERANCE").ok().and_then(|v| v.parse().ok()).unwrap_or(d.sum_tolerance),
            rebalance: std::env::var("MODAL_REBALANCE").map(|v| v == "1" || v == "true").unwrap_or(d.rebalance),
            cache_enabled: std::env::var("MODAL_CACHE").map(|v| v != "0" && v != "false").unwrap_or(d.cache_enabled),
            remote_url: std::env::var("MODAL_REMOTE_URL").ok().filter(|v| !v.trim().is_empty()),
            remote_timeout_secs: std::env::var("MODAL_REMOTE_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(d.remote_timeout_secs),
            server_port: std::env::var("MODAL_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(d.server_port),
        }
    }

    /// Stable text form of the settings that change pipeline output; part
    /// of the cache key.
    pub fn pipeline_fingerprint(&self) -> String {
        format!("sum_tolerance={};rebalance={}", self.sum_tolerance, self.rebalance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.display_floor, 0.1);
        assert_eq!(cfg.display_decimals, 1);
        assert!(!cfg.rebalance);
        assert!(cfg.remote_url.is_none());
    }

    #[test]
    fn test_fingerprint_tracks_pipeline_settings_only() {
        let a = Config::default();
        let mut b = Config::default();
        b.display_floor = 0.5;
        assert_eq!(a.pipeline_fingerprint(), b.pipeline_fingerprint());
        b.rebalance = true;
        assert_ne!(a.pipeline_fingerprint(), b.pipeline_fingerprint());
    }
}
