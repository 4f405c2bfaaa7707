//! Canonical, dialect-agnostic schema model

use crate::error::IntrospectError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Column identifier, passed through exactly as the catalog returned it
pub type ColumnName = String;

/// A single declared foreign-key reference
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignKeyEdge {
    pub source_table: String,
    pub source_column: ColumnName,
    pub target_table: String,
    pub target_column: ColumnName,
}

impl ForeignKeyEdge {
    pub fn new(
        source_table: impl Into<String>,
        source_column: impl Into<ColumnName>,
        target_table: impl Into<String>,
        target_column: impl Into<ColumnName>,
    ) -> Self {
        Self {
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: target_table.into(),
            target_column: target_column.into(),
        }
    }

    /// True when the edge points back at its own table
    pub fn is_self_reference(&self) -> bool {
        self.source_table == self.target_table
    }
}

/// One base table with its columns in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,

    /// Ordered as declared in the catalog
    pub columns: Vec<ColumnName>,

    /// Edges originating from this table
    pub foreign_keys: Vec<ForeignKeyEdge>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnName>) -> Self {
        Self {
            name: name.into(),
            columns,
            foreign_keys: Vec::new(),
        }
    }

    pub fn with_foreign_keys(mut self, foreign_keys: Vec<ForeignKeyEdge>) -> Self {
        self.foreign_keys = foreign_keys;
        self
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// All introspected tables, keyed by name, in catalog listing order
///
/// Built once from catalog rows and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseSchema {
    tables: IndexMap<String, TableSchema>,
}

impl DatabaseSchema {
    /// Build a schema from tables, rejecting repeated names
    pub fn try_from_tables<I>(tables: I) -> Result<Self, IntrospectError>
    where
        I: IntoIterator<Item = TableSchema>,
    {
        let mut map = IndexMap::new();
        for table in tables {
            if map.contains_key(&table.name) {
                return Err(IntrospectError::DuplicateTable { table: table.name });
            }
            map.insert(table.name.clone(), table);
        }
        Ok(Self { tables: map })
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Tables in catalog listing order
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Every foreign-key edge, grouped by source table
    pub fn edges(&self) -> impl Iterator<Item = &ForeignKeyEdge> {
        self.tables.values().flat_map(|t| t.foreign_keys.iter())
    }

    pub fn column_count(&self) -> usize {
        self.tables.values().map(|t| t.columns.len()).sum()
    }

    pub fn foreign_key_count(&self) -> usize {
        self.tables.values().map(|t| t.foreign_keys.len()).sum()
    }

    /// Edges whose target table was not part of the introspected set
    pub fn dangling_edges(&self) -> Vec<&ForeignKeyEdge> {
        self.edges()
            .filter(|edge| !self.tables.contains_key(&edge.target_table))
            .collect()
    }

    /// The renderer-facing shape: table -> columns and FK triples
    pub fn to_canonical(&self) -> IndexMap<String, CanonicalTable> {
        self.tables
            .iter()
            .map(|(name, table)| {
                let canonical = CanonicalTable {
                    columns: table.columns.clone(),
                    foreign_keys: table
                        .foreign_keys
                        .iter()
                        .map(|fk| {
                            (
                                fk.source_column.clone(),
                                fk.target_table.clone(),
                                fk.target_column.clone(),
                            )
                        })
                        .collect(),
                };
                (name.clone(), canonical)
            })
            .collect()
    }

    /// Canonical form as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_canonical())
    }
}

/// Canonical per-table output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTable {
    pub columns: Vec<ColumnName>,

    /// (column, referenced_table, referenced_column)
    pub foreign_keys: Vec<(ColumnName, String, ColumnName)>,
}
