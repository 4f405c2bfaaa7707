//! Fold raw catalog rows into the canonical schema model

use crate::adapter::ForeignKeyRow;
use schemaview_core::{ColumnName, DatabaseSchema, ForeignKeyEdge, IntrospectError, TableSchema};

/// The three raw result sets gathered for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub columns: Vec<ColumnName>,
    pub foreign_keys: Vec<ForeignKeyRow>,
}

impl RawTable {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnName>, foreign_keys: Vec<ForeignKeyRow>) -> Self {
        Self {
            name: name.into(),
            columns,
            foreign_keys,
        }
    }

    fn into_table_schema(self) -> TableSchema {
        let foreign_keys = self
            .foreign_keys
            .into_iter()
            .map(|row| ForeignKeyEdge {
                source_table: self.name.clone(),
                source_column: row.column,
                target_table: row.referenced_table,
                target_column: row.referenced_column,
            })
            .collect();

        TableSchema {
            name: self.name,
            columns: self.columns,
            foreign_keys,
        }
    }
}

/// Build a [`DatabaseSchema`] from raw per-table rows
///
/// Columns keep their query order and every foreign-key row becomes one edge
/// sourced at its table. Names are passed through untouched. A table name
/// seen twice fails with [`IntrospectError::DuplicateTable`].
pub fn normalize(raw: Vec<RawTable>) -> Result<DatabaseSchema, IntrospectError> {
    DatabaseSchema::try_from_tables(raw.into_iter().map(RawTable::into_table_schema))
}
