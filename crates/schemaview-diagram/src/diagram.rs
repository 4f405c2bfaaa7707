//! Render-ready view of a schema with its cluster colouring applied

use crate::cluster::{ClusterAssignment, ClusterMetadata, Placement};
use schemaview_core::{ColumnName, DatabaseSchema, DiagramConfig, ForeignKeyEdge, RankDir};

/// Fill used for a clustered table whose cluster gives no colour
pub const FALLBACK_TABLE_COLOUR: &str = "brown";

/// Presentation knobs that don't come from cluster metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramStyle {
    pub rankdir: RankDir,
    pub unclustered_colour: String,
}

impl Default for DiagramStyle {
    fn default() -> Self {
        Self {
            rankdir: RankDir::LR,
            unclustered_colour: "grey".to_string(),
        }
    }
}

impl From<&DiagramConfig> for DiagramStyle {
    fn from(config: &DiagramConfig) -> Self {
        Self {
            rankdir: config.rankdir,
            unclustered_colour: config.unclustered_colour.clone(),
        }
    }
}

/// One table box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub table: String,
    pub columns: Vec<ColumnName>,
    pub fill_colour: String,
    pub cluster: Option<String>,
}

/// A cluster that ended up with at least one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramCluster {
    pub name: String,
    pub tone_colour: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagram {
    pub nodes: Vec<DiagramNode>,
    pub edges: Vec<ForeignKeyEdge>,
    pub clusters: Vec<DiagramCluster>,
    pub rankdir: RankDir,
}

impl Diagram {
    /// Lay out nodes in schema order and clusters in declaration order
    ///
    /// Clusters with no member in the schema are left out.
    pub fn build(
        schema: &DatabaseSchema,
        assignment: &ClusterAssignment,
        metadata: &ClusterMetadata,
        style: &DiagramStyle,
    ) -> Self {
        let nodes: Vec<DiagramNode> = schema
            .tables()
            .map(|table| {
                let (fill_colour, cluster) = match assignment.placement(&table.name) {
                    Placement::Unclustered => (style.unclustered_colour.clone(), None),
                    Placement::Clustered { cluster, table_colour } => {
                        let fill = if table_colour.is_empty() {
                            FALLBACK_TABLE_COLOUR.to_string()
                        } else {
                            table_colour.clone()
                        };
                        (fill, Some(cluster.clone()))
                    }
                };
                DiagramNode {
                    table: table.name.clone(),
                    columns: table.columns.clone(),
                    fill_colour,
                    cluster,
                }
            })
            .collect();

        let clusters = metadata
            .iter()
            .filter(|(name, _)| nodes.iter().any(|n| n.cluster.as_deref() == Some(*name)))
            .map(|(name, spec)| DiagramCluster {
                name: name.to_string(),
                tone_colour: spec.tone_colour.clone(),
            })
            .collect();

        Self {
            nodes,
            edges: schema.edges().cloned().collect(),
            clusters,
            rankdir: style.rankdir,
        }
    }

    /// Nodes belonging to the named cluster
    pub fn members<'a>(&'a self, cluster: &'a str) -> impl Iterator<Item = &'a DiagramNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.cluster.as_deref() == Some(cluster))
    }

    /// Nodes outside every cluster
    pub fn unclustered(&self) -> impl Iterator<Item = &DiagramNode> {
        self.nodes.iter().filter(|n| n.cluster.is_none())
    }
}
