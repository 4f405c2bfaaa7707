//! PostgreSQL catalog adapter for the `public` schema
//!
//! Only the `public` schema of the connected catalog is inspected:
//! - tables from `information_schema.tables` (`BASE TABLE` only)
//! - columns from `information_schema.columns` ordered by `ordinal_position`
//! - foreign keys from `pg_constraint`, one row per column pair of each
//!   constraint declared on the table, in key order
//!
//! ## Usage
//!
//! ```rust,ignore
//! // Plain connection
//! let adapter = PostgresAdapter::connect(
//!     "postgresql://postgres@localhost:5432/long_mult",
//!     &ConnectOptions::default(),
//! ).await?;
//!
//! // With TLS
//! let options = ConnectOptions { tls: true, ..Default::default() };
//! let adapter = PostgresAdapter::connect("postgresql://db.example.com/long_mult", &options).await?;
//! ```
//!
//! Reference: https://www.postgresql.org/docs/current/catalog-pg-constraint.html

use crate::adapter::{with_timeout, CatalogAdapter, ConnectOptions, ForeignKeyRow};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use schemaview_core::{ColumnName, Dialect, IntrospectError};
use std::time::Duration;
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls};

/// Schema every PostgreSQL query is pinned to
pub const PUBLIC_SCHEMA: &str = "public";

pub(crate) const LIST_TABLES_SQL: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_type = 'BASE TABLE'
      AND table_schema = 'public'
      AND table_catalog = $1::text
    ORDER BY table_name
"#;

pub(crate) const LIST_COLUMNS_SQL: &str = r#"
    SELECT column_name::text
    FROM information_schema.columns
    WHERE table_schema = 'public'
      AND table_catalog = $1::text
      AND table_name = $2::text
    ORDER BY ordinal_position
"#;

// Foreign-key names are only unique per table, so constraints are matched by
// relation oid. conkey/confkey are parallel arrays: unnesting them together
// pairs composite-key columns by position.
pub(crate) const LIST_FOREIGN_KEYS_SQL: &str = r#"
    SELECT src.attname::text AS column_name,
           ref_class.relname::text AS foreign_table_name,
           ref.attname::text AS foreign_column_name
    FROM pg_catalog.pg_constraint AS con
    JOIN pg_catalog.pg_class AS src_class ON src_class.oid = con.conrelid
    JOIN pg_catalog.pg_namespace AS ns ON ns.oid = src_class.relnamespace
    JOIN pg_catalog.pg_class AS ref_class ON ref_class.oid = con.confrelid
    CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
        WITH ORDINALITY AS k(src_attnum, ref_attnum, ord)
    JOIN pg_catalog.pg_attribute AS src
      ON src.attrelid = con.conrelid AND src.attnum = k.src_attnum
    JOIN pg_catalog.pg_attribute AS ref
      ON ref.attrelid = con.confrelid AND ref.attnum = k.ref_attnum
    WHERE con.contype = 'f'
      AND ns.nspname = 'public'
      AND current_database() = $1::text
      AND src_class.relname = $2::text
    ORDER BY con.conname, k.ord
"#;

/// PostgreSQL catalog adapter
pub struct PostgresAdapter {
    client: Client,
    query_timeout: Duration,
}

impl PostgresAdapter {
    /// Connect using a `postgresql://` URL or a key/value connection string
    ///
    /// The connection task is spawned on the current runtime and lives as
    /// long as the client.
    pub async fn connect(url: &str, options: &ConnectOptions) -> Result<Self, IntrospectError> {
        let client = if options.tls {
            let connector = TlsConnector::builder().build().map_err(|e| {
                IntrospectError::Connection(format!("Failed to create TLS connector: {}", e))
            })?;
            let tls = MakeTlsConnector::new(connector);

            let (client, connection) = with_timeout(options.query_timeout, "connecting", async {
                tokio_postgres::connect(url, tls).await.map_err(|e| {
                    IntrospectError::Connection(format!("Failed to connect to PostgreSQL with TLS: {}", e))
                })
            })
            .await?;

            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::error!("PostgreSQL TLS connection error: {}", e);
                }
            });
            client
        } else {
            let (client, connection) = with_timeout(options.query_timeout, "connecting", async {
                tokio_postgres::connect(url, NoTls).await.map_err(|e| {
                    IntrospectError::Connection(format!("Failed to connect to PostgreSQL: {}", e))
                })
            })
            .await?;

            tokio::spawn(async move {
                if let Err(e) = connection.await {
                    tracing::error!("PostgreSQL connection error: {}", e);
                }
            });
            client
        };

        tracing::debug!(tls = options.tls, "connected to PostgreSQL");

        Ok(Self {
            client,
            query_timeout: options.query_timeout,
        })
    }

    async fn query_strings(
        &self,
        what: &str,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Vec<String>>, IntrospectError> {
        with_timeout(self.query_timeout, what, async {
            let rows = self
                .client
                .query(sql, params)
                .await
                .map_err(|e| map_postgres_error(what, e))?;

            rows.iter()
                .map(|row| {
                    (0..row.len())
                        .map(|i| row.try_get::<_, String>(i))
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| IntrospectError::DialectQuery(format!("{}: {}", what, e)))
        })
        .await
    }
}

/// Classify a driver error
///
/// Server-side errors (undefined table, permission denied) mean the catalog
/// can't be read on this server; everything else is transport.
pub(crate) fn map_postgres_error(context: &str, err: tokio_postgres::Error) -> IntrospectError {
    if err.code() == Some(&SqlState::UNDEFINED_TABLE) {
        return IntrospectError::DialectQuery(format!("{}: catalog not supported: {}", context, err));
    }

    if err.is_closed() || err.as_db_error().is_none() {
        IntrospectError::Connection(format!("{}: {}", context, err))
    } else {
        IntrospectError::DialectQuery(format!("{}: {}", context, err))
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for PostgresAdapter {
    fn name(&self) -> &'static str {
        "PostgreSQL"
    }

    fn dialect(&self) -> Dialect {
        Dialect::Postgres
    }

    async fn list_tables(&self, database: &str) -> Result<Vec<String>, IntrospectError> {
        tracing::debug!(database, schema = PUBLIC_SCHEMA, "listing PostgreSQL base tables");
        let rows = self
            .query_strings("listing tables", LIST_TABLES_SQL, &[&database])
            .await?;
        Ok(rows.into_iter().filter_map(|row| row.into_iter().next()).collect())
    }

    async fn list_columns(&self, database: &str, table: &str) -> Result<Vec<ColumnName>, IntrospectError> {
        tracing::debug!(table, "listing PostgreSQL columns");
        let rows = self
            .query_strings("listing columns", LIST_COLUMNS_SQL, &[&database, &table])
            .await?;
        Ok(rows.into_iter().filter_map(|row| row.into_iter().next()).collect())
    }

    async fn list_foreign_keys(
        &self,
        database: &str,
        table: &str,
    ) -> Result<Vec<ForeignKeyRow>, IntrospectError> {
        tracing::debug!(table, "listing PostgreSQL foreign keys");
        let rows = self
            .query_strings("listing foreign keys", LIST_FOREIGN_KEYS_SQL, &[&database, &table])
            .await?;

        rows.into_iter()
            .map(|row| match <[String; 3]>::try_from(row) {
                Ok([column, referenced_table, referenced_column]) => Ok(ForeignKeyRow {
                    column,
                    referenced_table,
                    referenced_column,
                }),
                Err(row) => Err(IntrospectError::DialectQuery(format!(
                    "foreign key row for {} has {} fields, expected 3",
                    table,
                    row.len()
                ))),
            })
            .collect()
    }

    async fn test_connection(&self) -> Result<(), IntrospectError> {
        self.query_strings("connection test", "SELECT 'ok'::text", &[])
            .await
            .map(|_| ())
    }
}
