//! Drive an adapter through a whole catalog
//!
//! One table listing, then one column query and one foreign-key query per
//! table, strictly in sequence. Large catalogs pay for this N+1 pattern in
//! round trips.

use crate::adapter::CatalogAdapter;
use crate::normalize::{normalize, RawTable};
use schemaview_core::{ConnectionTarget, DatabaseSchema, IntrospectError};
use std::collections::HashSet;

/// Read the target's catalog and normalize it
///
/// All-or-nothing: the first failing query aborts and nothing is returned.
/// Duplicate names in the listing are rejected before any per-table query
/// runs.
pub async fn introspect(
    adapter: &dyn CatalogAdapter,
    target: &ConnectionTarget,
) -> Result<DatabaseSchema, IntrospectError> {
    if adapter.dialect() != target.dialect() {
        tracing::warn!(
            adapter = adapter.name(),
            expected = %target.dialect(),
            actual = %adapter.dialect(),
            "adapter dialect does not match connection URL"
        );
    }

    let database = target.database_name();
    let tables = adapter.list_tables(database).await?;
    tracing::info!(database, tables = tables.len(), "listed base tables");

    let mut seen = HashSet::new();
    if let Some(dup) = tables.iter().find(|t| !seen.insert(t.as_str())) {
        return Err(IntrospectError::DuplicateTable { table: dup.clone() });
    }

    let mut raw = Vec::with_capacity(tables.len());
    for table in tables {
        let columns = adapter.list_columns(database, &table).await?;
        let foreign_keys = adapter.list_foreign_keys(database, &table).await?;
        tracing::debug!(
            table = %table,
            columns = columns.len(),
            foreign_keys = foreign_keys.len(),
            "introspected table"
        );
        raw.push(RawTable::new(table, columns, foreign_keys));
    }

    let schema = normalize(raw)?;

    for edge in schema.dangling_edges() {
        tracing::warn!(
            source = %edge.source_table,
            column = %edge.source_column,
            target = %edge.target_table,
            "foreign key references a table outside the introspected set"
        );
    }

    tracing::info!(
        tables = schema.len(),
        columns = schema.column_count(),
        foreign_keys = schema.foreign_key_count(),
        "schema introspected"
    );

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAdapter, MockAdapterBuilder};
    use schemaview_core::Dialect;

    fn target() -> ConnectionTarget {
        ConnectionTarget::parse("mysql://u@h/ehive").unwrap()
    }

    #[tokio::test]
    async fn issues_one_listing_plus_two_queries_per_table() {
        let adapter = MockAdapterBuilder::new(Dialect::MySql)
            .with_table("job", &["job_id"])
            .with_table("analysis_base", &["analysis_id"])
            .with_table("meta", &["meta_key"])
            .build();

        introspect(&adapter, &target()).await.unwrap();
        assert_eq!(adapter.query_count(), 1 + 2 * 3);
    }

    #[tokio::test]
    async fn duplicate_listing_stops_before_table_queries() {
        let adapter = MockAdapter::new(Dialect::MySql);
        adapter.add_table("job", &["job_id"]).await;
        adapter.add_table("job", &["job_id"]).await;

        let result = introspect(&adapter, &target()).await;
        assert_eq!(result, Err(IntrospectError::DuplicateTable { table: "job".into() }));
        assert_eq!(adapter.query_count(), 1);
    }

    #[tokio::test]
    async fn failure_mid_way_returns_nothing() {
        let adapter = MockAdapterBuilder::new(Dialect::MySql)
            .with_table("job", &["job_id"])
            .with_table("broken", &["id"])
            .with_error("broken", IntrospectError::Connection("server has gone away".into()))
            .build();

        let result = introspect(&adapter, &target()).await;
        assert!(matches!(result, Err(IntrospectError::Connection(_))));
    }

    #[tokio::test]
    async fn missing_catalog_is_not_an_empty_schema() {
        let adapter = MockAdapter::new(Dialect::MySql).with_missing_catalog();
        let result = introspect(&adapter, &target()).await;
        assert!(matches!(result, Err(IntrospectError::DialectQuery(_))));
    }

    #[tokio::test]
    async fn empty_catalog_is_an_empty_schema() {
        let adapter = MockAdapter::new(Dialect::MySql);
        let schema = introspect(&adapter, &target()).await.unwrap();
        assert!(schema.is_empty());
    }
}
