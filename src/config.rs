use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DashboardError;

/// Dashboard settings, read from a TOML file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Rows shown in the data preview and by "First Few Records".
    pub preview_rows: usize,
    /// Fixed histogram bin count; Sturges' rule when unset.
    pub histogram_bins: Option<usize>,
    /// Number of parsed uploads kept in memory.
    pub cache_capacity: usize,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub cors_permissive: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            histogram_bins: None,
            cache_capacity: 1,
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 200 * 1024 * 1024,
            cors_permissive: false,
        }
    }
}

impl DashboardConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, DashboardError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.preview_rows == 0 {
            return Err(DashboardError::Config(
                "preview_rows must be at least 1".to_string(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(DashboardError::Config(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if self.histogram_bins == Some(0) {
            return Err(DashboardError::Config(
                "histogram_bins must be at least 1".to_string(),
            ));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(DashboardError::Config(
                "server.max_upload_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
