//! Planner configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_max_exact_waypoints() -> usize {
    12
}

/// Route planner settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlannerConfig {
    /// Largest number of product stops ordered exactly with Held-Karp.
    /// Memory and time grow as 2^n * n^2 beyond this. The planner never
    /// goes above `HeldKarp::MAX_WAYPOINTS - 1`, whatever is configured.
    #[serde(default = "default_max_exact_waypoints")]
    pub max_exact_waypoints: usize,

    /// Count the last leg to the destination when choosing the order
    #[serde(default)]
    pub close_at_destination: bool,

    /// Where computed path data is persisted, if anywhere
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_exact_waypoints: default_max_exact_waypoints(),
            close_at_destination: false,
            cache_dir: None,
        }
    }
}

impl PlannerConfig {
    /// Loads settings from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn with_max_exact_waypoints(mut self, limit: usize) -> Self {
        self.max_exact_waypoints = limit;
        self
    }

    pub fn with_close_at_destination(mut self, close: bool) -> Self {
        self.close_at_destination = close;
        self
    }

    pub fn with_cache_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"close_at_destination":true}"#).unwrap();
        assert_eq!(config.max_exact_waypoints, 12);
        assert!(config.close_at_destination);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_builders() {
        let config = PlannerConfig::default()
            .with_max_exact_waypoints(4)
            .with_cache_dir("/tmp/paths");
        assert_eq!(config.max_exact_waypoints, 4);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/paths")));
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join("store_path_planner_config_test.json");
        fs::write(&path, r#"{"max_exact_waypoints": 5}"#).unwrap();
        let config = PlannerConfig::from_json_file(&path).unwrap();
        assert_eq!(config.max_exact_waypoints, 5);
        fs::remove_file(&path).ok();
    }
}
