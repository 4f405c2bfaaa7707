//! Cluster resolution and Graphviz rendering for schema diagrams
//!
//! [`ClusterResolver`] maps tables to colour groups read from external
//! metadata, [`Diagram`] combines that with a
//! [`DatabaseSchema`](schemaview_core::DatabaseSchema), and
//! [`to_dot`] / [`GraphvizRenderer`] turn the result into DOT text or an
//! image.

pub mod cluster;
pub mod diagram;
pub mod dot;
pub mod render;

pub use cluster::{
    ClusterAssignment, ClusterError, ClusterMetadata, ClusterResolver, ClusterSource, ClusterSpec,
    JsonFileSource, JsonStrSource, NoClusters, Placement,
};
pub use diagram::{Diagram, DiagramCluster, DiagramNode, DiagramStyle, FALLBACK_TABLE_COLOUR};
pub use dot::to_dot;
pub use render::{GraphvizRenderer, RenderError};
