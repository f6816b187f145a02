//! RON configuration for the tracker plus the shared file loading helpers.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse RON {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

/// What happens when a listener panics during dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaultPolicy {
    /// Log the panic, record it, keep notifying the remaining listeners.
    #[default]
    Isolate,
    /// Stop dispatching and re-raise the panic to the `set_phase` caller.
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub journal_capacity: usize,
    pub fault_policy: FaultPolicy,
    pub log_transitions: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self { journal_capacity: 64, fault_policy: FaultPolicy::Isolate, log_transitions: true }
    }
}

impl TrackerConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_ron(path)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<ConfigError>) {
        match Self::load_from_file(&path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn validate(&self) -> Vec<String> {
        let mut w = Vec::new();
        if self.journal_capacity == 0 {
            w.push("tracker.journal_capacity is 0; transitions will not be journaled".into());
        }
        if self.journal_capacity > 100_000 {
            w.push(format!("tracker.journal_capacity {} very high; memory grows with every transition kept", self.journal_capacity));
        }
        w
    }
}

/// Reads and deserializes a RON file.
pub fn read_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    ron::from_str(&data).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tracker.ron");
        fs::write(&path, "(fault_policy: Propagate)").expect("write ron");
        let cfg = TrackerConfig::load_from_file(&path).expect("load");
        assert_eq!(cfg.fault_policy, FaultPolicy::Propagate);
        assert_eq!(cfg.journal_capacity, 64);
        assert!(cfg.log_transitions);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (cfg, err) = TrackerConfig::load_or_default(dir.path().join("absent.ron"));
        assert_eq!(cfg, TrackerConfig::default());
        assert!(matches!(err, Some(ConfigError::Read { .. })));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.ron");
        fs::write(&path, "(journal_capacity: \"lots\")").expect("write ron");
        let err = TrackerConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.ron"));
    }

    #[test]
    fn zero_capacity_warns() {
        let cfg = TrackerConfig { journal_capacity: 0, ..Default::default() };
        assert_eq!(cfg.validate().len(), 1);
        assert!(TrackerConfig::default().validate().is_empty());
    }
}
