//! Configuration for Evermore.

use crate::activity::ActivityDefinition;
use crate::catalog::{standard_definitions, ActivityCatalog};
use crate::error::{Error, Result};
use crate::id::CoupleId;
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvermoreConfig {
    /// Where progress and history are stored
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,

    /// Couple used when none is given on the command line
    #[serde(default)]
    pub couple_id: Option<CoupleId>,

    /// Offset of the couple's local calendar from UTC, in minutes
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,

    /// Activity table override
    #[serde(default)]
    pub catalog: Option<CatalogConfig>,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".evermore")
}

fn default_utc_offset_minutes() -> i32 {
    0
}

impl Default for EvermoreConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            couple_id: None,
            utc_offset_minutes: default_utc_offset_minutes(),
            catalog: None,
        }
    }
}

impl EvermoreConfig {
    /// Load configuration; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let config: Self = serde_json::from_str(&json).map_err(|e| {
                    Error::Configuration(format!("{}: {}", path.display(), e))
                })?;
                config.local_offset()?;
                tracing::debug!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No configuration at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(Error::Configuration(format!("{}: {}", path.display(), e))),
        }
    }

    /// The couple's local calendar offset.
    pub fn local_offset(&self) -> Result<FixedOffset> {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "utc_offset_minutes out of range: {}",
                    self.utc_offset_minutes
                ))
            })
    }

    /// Activity catalog from the override, or the built-in table.
    pub fn activity_catalog(&self) -> Result<ActivityCatalog> {
        match &self.catalog {
            Some(catalog) => ActivityCatalog::from_config(catalog),
            None => Ok(ActivityCatalog::standard()),
        }
    }
}

/// Externalized activity table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// One entry per activity kind
    pub activities: Vec<ActivityDefinition>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            activities: standard_definitions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityKind;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EvermoreConfig::load(dir.path().join("evermore.json")).unwrap();
        assert_eq!(config, EvermoreConfig::default());
        assert_eq!(config.storage_path, PathBuf::from(".evermore"));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evermore.json");
        std::fs::write(&path, r#"{"couple_id":"demo-couple-123","utc_offset_minutes":-300}"#).unwrap();

        let config = EvermoreConfig::load(&path).unwrap();
        assert_eq!(config.couple_id, Some(CoupleId::new("demo-couple-123")));
        assert_eq!(config.local_offset().unwrap().local_minus_utc(), -300 * 60);
        assert_eq!(config.storage_path, PathBuf::from(".evermore"));
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("evermore.json");
        for raw in ["100000", "40000000", "-40000000"] {
            std::fs::write(&path, format!(r#"{{"utc_offset_minutes":{}}}"#, raw)).unwrap();
            assert!(matches!(EvermoreConfig::load(&path), Err(Error::Configuration(_))));
        }
    }

    #[test]
    fn test_catalog_override_round_trip() {
        let mut catalog = CatalogConfig::default();
        catalog.activities[0].title = "Morning Coffee".to_string();
        let config = EvermoreConfig {
            catalog: Some(catalog),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let loaded: EvermoreConfig = serde_json::from_str(&json).unwrap();
        let built = loaded.activity_catalog().unwrap();
        assert_eq!(built.lookup(ActivityKind::DailyRitual).unwrap().title, "Morning Coffee");
    }

    #[test]
    fn test_incomplete_catalog_override_rejected() {
        let mut catalog = CatalogConfig::default();
        catalog.activities.pop();
        let config = EvermoreConfig {
            catalog: Some(catalog),
            ..Default::default()
        };
        assert!(matches!(config.activity_catalog(), Err(Error::Configuration(_))));
    }
}
