//! MySQL catalog adapter
//!
//! Tables come from `information_schema.tables`, columns from `DESCRIBE`
//! (physical order), foreign keys from `information_schema.KEY_COLUMN_USAGE`
//! rows that carry a referenced table. Primary-key and unique entries in that
//! view have a NULL `REFERENCED_TABLE_NAME` and are filtered out.
//!
//! The pool is capped at a single connection so every query of one
//! introspection runs over the same session.

use crate::adapter::{with_timeout, CatalogAdapter, ConnectOptions, ForeignKeyRow};
use schemaview_core::{ColumnName, Dialect, IntrospectError};
use sqlx::mysql::{MySqlPoolOptions, MySqlRow};
use sqlx::{MySql, Pool, Row};
use std::time::Duration;

// information_schema identifiers are CAST to CHAR: MySQL 8 reports some of
// them with a binary collation, which the driver refuses to decode as text.
pub(crate) const LIST_TABLES_SQL: &str = "SELECT CAST(TABLE_NAME AS CHAR) AS table_name \
     FROM information_schema.tables \
     WHERE table_type = 'BASE TABLE' AND table_schema = ? \
     ORDER BY table_name";

pub(crate) const LIST_FOREIGN_KEYS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR) AS column_name, \
            CAST(REFERENCED_TABLE_NAME AS CHAR) AS referenced_table, \
            CAST(REFERENCED_COLUMN_NAME AS CHAR) AS referenced_column \
     FROM information_schema.KEY_COLUMN_USAGE \
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND REFERENCED_TABLE_NAME IS NOT NULL \
     ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION";

/// MySQL catalog adapter
pub struct MySqlAdapter {
    pool: Pool<MySql>,
    query_timeout: Duration,
}

impl MySqlAdapter {
    /// Connect using a `mysql://` URL
    pub async fn connect(url: &str, options: &ConnectOptions) -> Result<Self, IntrospectError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(options.query_timeout)
            .connect(url)
            .await
            .map_err(|e| IntrospectError::Connection(format!("Failed to connect to MySQL: {}", e)))?;

        tracing::debug!("connected to MySQL");

        Ok(Self {
            pool,
            query_timeout: options.query_timeout,
        })
    }

    /// Build the `DESCRIBE` statement for a table
    ///
    /// Identifiers can't be bound as parameters, so they are backtick-quoted
    /// with embedded backticks doubled.
    pub fn describe_sql(database: &str, table: &str) -> String {
        format!("DESCRIBE {}.{}", quote_ident(database), quote_ident(table))
    }
}

fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Read a text column, falling back to bytes for binary-collated columns
fn text(row: &MySqlRow, column: &str) -> Result<String, sqlx::Error> {
    match row.try_get::<String, _>(column) {
        Ok(value) => Ok(value),
        Err(sqlx::Error::ColumnDecode { .. }) => identifier_from_bytes(row.try_get(column)?),
        Err(e) => Err(e),
    }
}

/// Identifiers are passed on exactly, so bytes that aren't UTF-8 are an error
fn identifier_from_bytes(bytes: Vec<u8>) -> Result<String, sqlx::Error> {
    String::from_utf8(bytes).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}

/// Classify a driver error
///
/// Anything the server answered with (unknown table, denied access, bad
/// syntax) or a result we could not read is a catalog problem; the rest is
/// transport.
pub(crate) fn map_sqlx_error(context: &str, err: sqlx::Error) -> IntrospectError {
    match err {
        sqlx::Error::Database(db) => {
            IntrospectError::DialectQuery(format!("{}: {}", context, db))
        }
        e @ (sqlx::Error::RowNotFound
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)) => IntrospectError::DialectQuery(format!("{}: {}", context, e)),
        other => IntrospectError::Connection(format!("{}: {}", context, other)),
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for MySqlAdapter {
    fn name(&self) -> &'static str {
        "MySQL"
    }

    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, IntrospectError> {
        tracing::debug!(database, "listing MySQL base tables");
        with_timeout(self.query_timeout, "listing tables", async {
            let rows = sqlx::query(LIST_TABLES_SQL)
                .bind(database)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("listing tables", e))?;

            rows.iter()
                .map(|row| text(row, "table_name"))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| map_sqlx_error("reading table names", e))
        })
        .await
    }

    async fn list_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnName>, IntrospectError> {
        let sql = Self::describe_sql(database, table);
        tracing::debug!(table, "describing MySQL table");
        with_timeout(self.query_timeout, "describing table", async {
            let rows = sqlx::query(&sql)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(&format!("describing {}", table), e))?;

            rows.iter()
                .map(|row| text(row, "Field"))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| map_sqlx_error(&format!("reading columns of {}", table), e))
        })
        .await
    }

    async fn list_foreign_keys(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyRow>, IntrospectError> {
        tracing::debug!(table, "listing MySQL foreign keys");
        with_timeout(self.query_timeout, "listing foreign keys", async {
            let rows = sqlx::query(LIST_FOREIGN_KEYS_SQL)
                .bind(database)
                .bind(table)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error(&format!("foreign keys of {}", table), e))?;

            rows.iter()
                .map(|row| {
                    Ok(ForeignKeyRow {
                        column: text(row, "column_name")?,
                        referenced_table: text(row, "referenced_table")?,
                        referenced_column: text(row, "referenced_column")?,
                    })
                })
                .collect::<Result<Vec<_>, sqlx::Error>>()
                .map_err(|e| map_sqlx_error(&format!("reading foreign keys of {}", table), e))
        })
        .await
    }

    async fn test_connection(&self) -> Result<(), IntrospectError> {
        with_timeout(self.query_timeout, "connection test", async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("connection test", e))?;
            Ok(())
        })
        .await
    }
}
