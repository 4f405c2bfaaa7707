//! Catalog introspection for MySQL and PostgreSQL
//!
//! Adapters query each dialect's `information_schema` and hand back raw rows;
//! the normalizer folds those rows into a dialect-agnostic
//! [`DatabaseSchema`](schemaview_core::DatabaseSchema).
//!
//! ## Example
//!
//! ```rust,ignore
//! use schemaview_catalog::{connect, introspect, ConnectOptions};
//! use schemaview_core::ConnectionTarget;
//!
//! let target = ConnectionTarget::parse("mysql://ensro@mysql-host:3306/ehive_pipeline")?;
//! let adapter = connect(&target, &ConnectOptions::default()).await?;
//! let schema = introspect(adapter.as_ref(), &target).await?;
//! ```

pub mod adapter;
pub mod introspect;
pub mod mock;
pub mod mysql;
pub mod normalize;
pub mod postgres;

pub use adapter::{connect, CatalogAdapter, ConnectOptions, ForeignKeyRow};
pub use introspect::introspect;
pub use mock::{MockAdapter, MockAdapterBuilder};
pub use mysql::MySqlAdapter;
pub use normalize::{normalize, RawTable};
pub use postgres::PostgresAdapter;
