//! schemaview core
//!
//! Dialect-agnostic schema model, connection URL dispatch and the error
//! taxonomy shared by every schemaview crate.

pub mod config;
pub mod error;
pub mod schema;
pub mod target;

pub use config::{Config, ConfigError, DatabaseConfig, DiagramConfig, RankDir};
pub use error::IntrospectError;
pub use schema::{ColumnName, DatabaseSchema, ForeignKeyEdge, TableSchema};
pub use target::{ConnectionTarget, Dialect};
