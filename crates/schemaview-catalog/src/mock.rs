//! Mock catalog adapter for testing
//!
//! Serves tables, columns and foreign keys from memory without a database.
//! It's useful for:
//! - Unit testing the normalizer and the introspection driver
//! - Exercising both dialects without live servers
//! - Simulating connection failures, missing catalogs and per-table errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use schemaview_catalog::{MockAdapter, ForeignKeyRow};
//! use schemaview_core::Dialect;
//!
//! let adapter = MockAdapter::new(Dialect::MySql);
//! adapter.add_table("job", &["job_id", "analysis_id"]).await;
//! adapter.add_table("analysis_base", &["analysis_id", "logic_name"]).await;
//! adapter
//!     .add_foreign_key("job", ForeignKeyRow::new("analysis_id", "analysis_base", "analysis_id"))
//!     .await;
//! ```

use crate::adapter::{CatalogAdapter, ForeignKeyRow};
use schemaview_core::{ColumnName, Dialect, IntrospectError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct MockCatalog {
    /// Listing order; may deliberately contain repeats
    tables: Vec<String>,
    columns: HashMap<String, Vec<ColumnName>>,
    foreign_keys: HashMap<String, Vec<ForeignKeyRow>>,
    errors: HashMap<String, IntrospectError>,
}

/// Mock catalog adapter for testing
///
/// Clones share the same catalog and query counter.
#[derive(Clone)]
pub struct MockAdapter {
    catalog: Arc<RwLock<MockCatalog>>,
    queries: Arc<AtomicUsize>,
    dialect: Dialect,
    fail_connection: bool,
    missing_catalog: bool,
    latency_ms: u64,
}

impl MockAdapter {
    /// Create an empty mock catalog for a dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            catalog: Arc::new(RwLock::new(MockCatalog::default())),
            queries: Arc::new(AtomicUsize::new(0)),
            dialect,
            fail_connection: false,
            missing_catalog: false,
            latency_ms: 0,
        }
    }

    /// Register a table with its columns in declaration order
    pub async fn add_table(&self, name: &str, columns: &[&str]) {
        let mut catalog = self.catalog.write().await;
        catalog.tables.push(name.to_string());
        catalog
            .columns
            .insert(name.to_string(), columns.iter().map(|c| c.to_string()).collect());
    }

    /// Declare a foreign key on a table
    pub async fn add_foreign_key(&self, table: &str, row: ForeignKeyRow) {
        self.catalog
            .write()
            .await
            .foreign_keys
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    /// Make every query touching this table fail with the given error
    pub async fn add_error_for_table(&self, table: &str, error: IntrospectError) {
        self.catalog.write().await.errors.insert(table.to_string(), error);
    }

    /// Fail every query as if the connection dropped
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Fail the table listing as if `information_schema` did not exist
    pub fn with_missing_catalog(mut self) -> Self {
        self.missing_catalog = true;
        self
    }

    /// Delay every query by the given number of milliseconds
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Number of catalog queries served so far
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub async fn table_count(&self) -> usize {
        self.catalog.read().await.tables.len()
    }

    async fn begin_query(&self) -> Result<(), IntrospectError> {
        self.queries.fetch_add(1, Ordering::SeqCst);

        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }

        if self.fail_connection {
            return Err(IntrospectError::Connection(
                "Simulated connection failure".to_string(),
            ));
        }
        Ok(())
    }

    async fn table_error(&self, table: &str) -> Result<(), IntrospectError> {
        match self.catalog.read().await.errors.get(table) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for MockAdapter {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn dialect(&self) -> Dialect {
        self.dialect
    }

    async fn list_tables(&self, _database: &str) -> Result<Vec<String>, IntrospectError> {
        self.begin_query().await?;

        if self.missing_catalog {
            return Err(IntrospectError::DialectQuery(
                "information_schema.tables does not exist".to_string(),
            ));
        }

        Ok(self.catalog.read().await.tables.clone())
    }

    async fn list_columns(&self, _database: &str, table: &str) -> Result<Vec<ColumnName>, IntrospectError> {
        self.begin_query().await?;
        self.table_error(table).await?;

        self.catalog
            .read()
            .await
            .columns
            .get(table)
            .cloned()
            .ok_or_else(|| IntrospectError::DialectQuery(format!("Table '{}' doesn't exist", table)))
    }

    async fn list_foreign_keys(
        &self,
        _database: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyRow>, IntrospectError> {
        self.begin_query().await?;
        self.table_error(table).await?;

        Ok(self
            .catalog
            .read()
            .await
            .foreign_keys
            .get(table)
            .cloned()
            .unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<(), IntrospectError> {
        self.begin_query().await
    }
}

/// Builder for creating a MockAdapter with a whole catalog at once
///
/// # Example
///
/// ```rust,ignore
/// let adapter = MockAdapterBuilder::new(Dialect::Postgres)
///     .with_table("job", &["job_id", "analysis_id"])
///     .with_table("analysis_base", &["analysis_id", "logic_name"])
///     .with_foreign_key("job", "analysis_id", "analysis_base", "analysis_id")
///     .build();
/// ```
pub struct MockAdapterBuilder {
    catalog: MockCatalog,
    dialect: Dialect,
}

impl MockAdapterBuilder {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            catalog: MockCatalog::default(),
            dialect,
        }
    }

    pub fn with_table(mut self, name: &str, columns: &[&str]) -> Self {
        self.catalog.tables.push(name.to_string());
        self.catalog
            .columns
            .insert(name.to_string(), columns.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_foreign_key(
        mut self,
        table: &str,
        column: &str,
        referenced_table: &str,
        referenced_column: &str,
    ) -> Self {
        self.catalog
            .foreign_keys
            .entry(table.to_string())
            .or_default()
            .push(ForeignKeyRow::new(column, referenced_table, referenced_column));
        self
    }

    pub fn with_error(mut self, table: &str, error: IntrospectError) -> Self {
        self.catalog.errors.insert(table.to_string(), error);
        self
    }

    pub fn build(self) -> MockAdapter {
        MockAdapter {
            catalog: Arc::new(RwLock::new(self.catalog)),
            ..MockAdapter::new(self.dialect)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_tables_in_insertion_order() {
        let adapter = MockAdapter::new(Dialect::MySql);
        adapter.add_table("job", &["job_id"]).await;
        adapter.add_table("analysis_base", &["analysis_id"]).await;

        let tables = adapter.list_tables("db").await.unwrap();
        assert_eq!(tables, vec!["job", "analysis_base"]);
        assert_eq!(adapter.query_count(), 1);
    }

    #[tokio::test]
    async fn unknown_table_columns_is_query_error() {
        let adapter = MockAdapter::new(Dialect::Postgres);
        let result = adapter.list_columns("db", "nope").await;
        assert!(matches!(result, Err(IntrospectError::DialectQuery(_))));
    }

    #[tokio::test]
    async fn table_without_foreign_keys() {
        let adapter = MockAdapterBuilder::new(Dialect::MySql)
            .with_table("meta", &["meta_key", "meta_value"])
            .build();
        assert!(adapter.list_foreign_keys("db", "meta").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn connection_failure() {
        let adapter = MockAdapter::new(Dialect::MySql).with_connection_failure();
        assert!(matches!(
            adapter.test_connection().await,
            Err(IntrospectError::Connection(_))
        ));
        assert!(matches!(
            adapter.list_tables("db").await,
            Err(IntrospectError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn missing_catalog() {
        let adapter = MockAdapter::new(Dialect::Postgres).with_missing_catalog();
        assert!(matches!(
            adapter.list_tables("db").await,
            Err(IntrospectError::DialectQuery(_))
        ));
    }

    #[tokio::test]
    async fn per_table_error() {
        let adapter = MockAdapterBuilder::new(Dialect::MySql)
            .with_table("job", &["job_id"])
            .with_error("job", IntrospectError::Connection("reset by peer".into()))
            .build();

        assert!(matches!(
            adapter.list_columns("db", "job").await,
            Err(IntrospectError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn clones_share_catalog_and_counter() {
        let adapter = MockAdapter::new(Dialect::MySql);
        let cloned = adapter.clone();

        cloned.add_table("job", &["job_id"]).await;
        assert_eq!(adapter.table_count().await, 1);

        adapter.list_tables("db").await.unwrap();
        assert_eq!(cloned.query_count(), 1);
    }

    #[tokio::test]
    async fn builder_keeps_dialect() {
        let adapter = MockAdapterBuilder::new(Dialect::Postgres).build();
        assert_eq!(adapter.dialect(), Dialect::Postgres);
        assert_eq!(adapter.name(), "Mock");
    }
}
