//! Cluster metadata and table-to-cluster resolution
//!
//! Metadata is a JSON object keyed by cluster name:
//!
//! ```json
//! {
//!   "Pipeline": { "tables": ["analysis_base", "dataflow_rule"], "table_colour": "#8fbc8f", "tone_colour": "#e0eee0" },
//!   "Jobs":     { "tables": ["job", "accu"],                    "table_colour": "#87ceeb", "tone_colour": "#e0f0f8" }
//! }
//! ```
//!
//! Declaration order matters: a table claimed by several clusters goes to the
//! first one listed.

use indexmap::{IndexMap, IndexSet};
use schemaview_core::DatabaseSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One named group of tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    /// Member table names
    pub tables: IndexSet<String>,

    /// Fill colour for member tables
    pub table_colour: String,

    /// Background colour of the cluster box
    pub tone_colour: String,
}

/// All cluster definitions in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterMetadata {
    clusters: IndexMap<String, ClusterSpec>,
}

impl ClusterMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> Result<Self, ClusterError> {
        serde_json::from_str(json).map_err(|e| ClusterError::ParseError(e.to_string()))
    }

    /// Append a cluster; redefining a name replaces it in place
    pub fn with_cluster(mut self, name: impl Into<String>, spec: ClusterSpec) -> Self {
        self.clusters.insert(name.into(), spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ClusterSpec> {
        self.clusters.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClusterSpec)> {
        self.clusters.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Cluster metadata loading errors
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("IO error reading {path}: {message}")]
    IoError { path: PathBuf, message: String },

    #[error("Invalid cluster metadata: {0}")]
    ParseError(String),
}

/// Somewhere cluster metadata can be loaded from
pub trait ClusterSource {
    fn load(&self) -> Result<ClusterMetadata, ClusterError>;
}

/// Metadata from a JSON file on disk
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ClusterSource for JsonFileSource {
    fn load(&self) -> Result<ClusterMetadata, ClusterError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| ClusterError::IoError {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        let metadata = ClusterMetadata::from_json(&contents)?;
        tracing::debug!(path = %self.path.display(), clusters = metadata.len(), "loaded cluster metadata");
        Ok(metadata)
    }
}

/// Metadata embedded as a JSON string
#[derive(Debug, Clone, Copy)]
pub struct JsonStrSource<'a>(pub &'a str);

impl ClusterSource for JsonStrSource<'_> {
    fn load(&self) -> Result<ClusterMetadata, ClusterError> {
        ClusterMetadata::from_json(self.0)
    }
}

/// No clustering at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoClusters;

impl ClusterSource for NoClusters {
    fn load(&self) -> Result<ClusterMetadata, ClusterError> {
        Ok(ClusterMetadata::new())
    }
}

/// Where one table ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Unclustered,
    Clustered { cluster: String, table_colour: String },
}

/// Table name -> placement, for every table of a schema
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterAssignment {
    placements: IndexMap<String, Placement>,
}

impl ClusterAssignment {
    /// Placement of a table; tables never seen resolve to unclustered
    pub fn placement(&self, table: &str) -> &Placement {
        self.placements.get(table).unwrap_or(&Placement::Unclustered)
    }

    pub fn cluster_of(&self, table: &str) -> Option<&str> {
        match self.placement(table) {
            Placement::Clustered { cluster, .. } => Some(cluster),
            Placement::Unclustered => None,
        }
    }

    /// Tables assigned to a cluster, in schema order
    pub fn members<'a>(&'a self, cluster: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.placements.iter().filter_map(move |(table, placement)| match placement {
            Placement::Clustered { cluster: c, .. } if c == cluster => Some(table.as_str()),
            _ => None,
        })
    }
}

/// Assigns each table to at most one cluster
pub struct ClusterResolver<'a> {
    metadata: &'a ClusterMetadata,
}

impl<'a> ClusterResolver<'a> {
    pub fn new(metadata: &'a ClusterMetadata) -> Self {
        Self { metadata }
    }

    /// Resolve every table of the schema
    ///
    /// First declared cluster wins when a table is listed more than once.
    /// Member names that aren't in the schema are ignored.
    pub fn resolve(&self, schema: &DatabaseSchema) -> ClusterAssignment {
        let mut claimed: IndexMap<&str, (&str, &ClusterSpec)> = IndexMap::new();

        for (name, spec) in self.metadata.iter() {
            for table in &spec.tables {
                if !schema.contains(table) {
                    tracing::debug!(cluster = name, table = %table, "cluster member not in schema");
                    continue;
                }
                match claimed.get(table.as_str()) {
                    Some((winner, _)) => {
                        if *winner != name {
                            tracing::warn!(
                                table = %table,
                                kept = winner,
                                ignored = name,
                                "table listed in several clusters, keeping the first"
                            );
                        }
                    }
                    None => {
                        claimed.insert(table.as_str(), (name, spec));
                    }
                }
            }
        }

        let placements = schema
            .table_names()
            .map(|table| {
                let placement = match claimed.get(table) {
                    Some((cluster, spec)) => Placement::Clustered {
                        cluster: cluster.to_string(),
                        table_colour: spec.table_colour.clone(),
                    },
                    None => Placement::Unclustered,
                };
                (table.to_string(), placement)
            })
            .collect();

        ClusterAssignment { placements }
    }
}
