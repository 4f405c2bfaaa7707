//! Catalog adapter trait for reading tables, columns and foreign keys

use crate::mysql::MySqlAdapter;
use crate::postgres::PostgresAdapter;
use schemaview_core::{ColumnName, ConnectionTarget, Dialect, IntrospectError};
use std::future::Future;
use std::time::Duration;

/// One foreign-key row as the catalog reports it for a given table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ForeignKeyRow {
    /// Local column
    pub column: ColumnName,

    /// Referenced table
    pub referenced_table: String,

    /// Referenced column
    pub referenced_column: ColumnName,
}

impl ForeignKeyRow {
    pub fn new(
        column: impl Into<ColumnName>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<ColumnName>,
    ) -> Self {
        Self {
            column: column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }
}

/// Connection settings shared by both drivers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Upper bound for connecting and for every single catalog query
    pub query_timeout: Duration,

    /// Wrap PostgreSQL connections in TLS
    pub tls: bool,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(30),
            tls: false,
        }
    }
}

/// Dialect-specific access to the system catalog
///
/// Implementations are read-only and issue exactly one query per call.
/// Missing catalog objects surface as [`IntrospectError::DialectQuery`],
/// transport failures as [`IntrospectError::Connection`].
#[async_trait::async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Adapter name (e.g., "MySQL", "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Dialect whose catalog conventions this adapter speaks
    fn dialect(&self) -> Dialect;

    /// Base tables of the given database/catalog
    async fn list_tables(&self, database: &str) -> Result<Vec<String>, IntrospectError>;

    /// Column names of one table in declaration order
    async fn list_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnName>, IntrospectError>;

    /// Foreign-key rows declared on one table
    async fn list_foreign_keys(&self, database: &str, table: &str)
        -> Result<Vec<ForeignKeyRow>, IntrospectError>;

    /// Check that the connection can execute a trivial query
    async fn test_connection(&self) -> Result<(), IntrospectError>;
}

/// Open a connection for the target's dialect
pub async fn connect(
    target: &ConnectionTarget,
    options: &ConnectOptions,
) -> Result<Box<dyn CatalogAdapter>, IntrospectError> {
    let url = target.driver_url();
    match target.dialect() {
        Dialect::MySql => Ok(Box::new(MySqlAdapter::connect(&url, options).await?)),
        Dialect::Postgres => Ok(Box::new(PostgresAdapter::connect(&url, options).await?)),
    }
}

/// Run a query future under a deadline; expiry is a connection error
pub(crate) async fn with_timeout<T, F>(
    timeout: Duration,
    what: &str,
    fut: F,
) -> Result<T, IntrospectError>
where
    F: Future<Output = Result<T, IntrospectError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(IntrospectError::Connection(format!(
            "{} timed out after {}s",
            what,
            timeout.as_secs_f32()
        ))),
    }
}
