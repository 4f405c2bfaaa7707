//! Configuration schema (schemaview.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Graph layout direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDir {
    /// Left to right
    #[default]
    LR,

    /// Top to bottom
    TB,
}

impl std::fmt::Display for RankDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LR => write!(f, "LR"),
            Self::TB => write!(f, "TB"),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (mysql://... or pgsql://...)
    #[serde(default)]
    pub url: Option<String>,

    /// Per-query timeout; an expired query is reported as a connection error
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,

    /// Use TLS for PostgreSQL connections
    #[serde(default)]
    pub tls: bool,
}

fn default_query_timeout_secs() -> u64 {
    30
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            query_timeout_secs: default_query_timeout_secs(),
            tls: false,
        }
    }
}

impl DatabaseConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

/// Diagram output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Cluster metadata JSON file
    #[serde(default)]
    pub clusters: Option<PathBuf>,

    /// Output file stem; the format is appended as extension
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Graphviz output format (png, svg, pdf, ...)
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub rankdir: RankDir,

    /// Fill colour for tables outside every cluster
    #[serde(default = "default_unclustered_colour")]
    pub unclustered_colour: String,
}

fn default_output() -> PathBuf {
    PathBuf::from("table_diagram")
}

fn default_format() -> String {
    "png".to_string()
}

fn default_unclustered_colour() -> String {
    "grey".to_string()
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            clusters: None,
            output: default_output(),
            format: default_format(),
            rankdir: RankDir::default(),
            unclustered_colour: default_unclustered_colour(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub diagram: DiagramConfig,

    /// Directory the config was loaded from (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::from_toml(&contents)?;

        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Resolve a path from the config relative to the config file location
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() && !self.project_root.as_os_str().is_empty() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}
