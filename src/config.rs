//! # Configuration
//!
//! Settings are read from `<config dir>/ticketdash/config.json`. Every field
//! has a default, so the file may list only the values it overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DashboardError, Result};

/// Names of the columns the pipeline reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub reference: String,
    pub status: String,
    pub logged: String,
    pub resolved: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            reference: "Reference".to_string(),
            status: "Status".to_string(),
            logged: "Date/Time Logged".to_string(),
            resolved: "Date Resolved".to_string(),
        }
    }
}

/// Dashboard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sheet every uploaded workbook must contain
    pub sheet_name: String,
    pub columns: ColumnNames,
    /// Statuses in priority order, highest first
    pub status_priority: Vec<String>,
    /// `chrono` formats tried, in order, on textual timestamps
    pub date_formats: Vec<String>,
    /// Number of distinct upload sets kept parsed in memory
    pub ingest_cache_capacity: usize,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            sheet_name: "-".to_string(),
            columns: ColumnNames::default(),
            status_priority: vec![
                "CLOSED".to_string(),
                "RESOLVED".to_string(),
                "OPEN".to_string(),
            ],
            date_formats: [
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d",
                "%m/%d/%Y %H:%M:%S",
                "%m/%d/%Y %H:%M",
                "%m/%d/%Y",
                "%Y/%m/%d %H:%M:%S",
                "%Y/%m/%d",
                "%d %b %Y %H:%M",
                "%d %b %Y",
            ]
            .iter()
            .map(|f| f.to_string())
            .collect(),
            ingest_cache_capacity: 8,
            chart_width: 1000,
            chart_height: 420,
        }
    }
}

impl DashboardConfig {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ticketdash").join("config.json"))
    }

    /// Load from the default location. A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
            .map_err(|e| DashboardError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.status_priority.is_empty() {
            return Err(DashboardError::Config(
                "status_priority must list at least one status".to_string(),
            ));
        }
        if self.ingest_cache_capacity == 0 {
            return Err(DashboardError::Config(
                "ingest_cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(DashboardError::Config(
                "chart dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
