//! Normalized tables, columns and declared foreign keys.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::types::DataCategory;
use crate::semantic::error::{SemanticError, SemanticResult};

/// Schema-qualified table name; the identity of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QualifiedName {
    pub schema: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A column of a normalized table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Owning table.
    pub table: QualifiedName,
    /// Column name.
    pub name: String,
    /// Ordinal position, unique within the table.
    pub ordinal: u32,
    /// Declared type as reported by the database.
    pub declared_type: String,
    /// Semantic category of the declared type.
    pub category: DataCategory,
    pub nullable: bool,
    pub has_default: bool,
    /// Part of the table's primary key.
    pub primary_key: bool,
}

impl Column {
    /// Get fully qualified name (schema.table.column).
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }
}

/// A normalized table. Immutable once built by the normalizer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: QualifiedName,
    /// Columns ordered by ordinal position.
    pub columns: Vec<Column>,
    /// Primary key columns in declared order (empty when none).
    pub primary_key: Vec<String>,
    /// Declared unique constraints.
    pub unique_constraints: Vec<Vec<String>>,
    /// Planner row estimate, advisory only.
    pub row_estimate: Option<u64>,
}

impl Table {
    /// Look up a column by exact name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// The primary key column when the key has exactly one column.
    pub fn single_primary_key(&self) -> Option<&Column> {
        match self.primary_key.as_slice() {
            [only] => self.column(only),
            _ => None,
        }
    }

    /// Whether `columns` (as a set) is exactly the primary key or a declared
    /// unique constraint.
    pub fn is_unique_set(&self, columns: &[String]) -> bool {
        let same_set = |key: &[String]| {
            key.len() == columns.len() && columns.iter().all(|c| key.contains(c))
        };
        (!self.primary_key.is_empty() && same_set(&self.primary_key))
            || self.unique_constraints.iter().any(|u| same_set(u))
    }

    /// Whether a single column is unique on its own.
    pub fn is_individually_unique(&self, column: &str) -> bool {
        self.is_unique_set(&[column.to_string()])
    }
}

/// A declared foreign key, resolved against the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclaredForeignKey {
    pub name: Option<String>,
    /// Referencing table.
    pub table: QualifiedName,
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub references: QualifiedName,
    /// Referenced columns, positionally matched with `columns`.
    pub referenced_columns: Vec<String>,
}

/// The canonical in-memory schema produced by the normalizer.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchemaModel {
    /// Tables in the order the snapshot supplied them.
    pub tables: Vec<Table>,
    /// Declared foreign keys, in table order then constraint order.
    pub foreign_keys: Vec<DeclaredForeignKey>,
    #[serde(skip)]
    index: HashMap<QualifiedName, usize>,
}

impl SchemaModel {
    /// Build a model; table names must already be unique.
    pub(crate) fn new(tables: Vec<Table>, foreign_keys: Vec<DeclaredForeignKey>) -> Self {
        let index = tables
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();
        Self {
            tables,
            foreign_keys,
            index,
        }
    }

    /// Look up a table by qualified name.
    pub fn table(&self, name: &QualifiedName) -> Option<&Table> {
        self.index.get(name).map(|&i| &self.tables[i])
    }

    /// Look up a column of a table.
    pub fn column(&self, table: &QualifiedName, column: &str) -> Option<&Column> {
        self.table(table).and_then(|t| t.column(column))
    }

    /// Resolve a user-supplied table reference.
    ///
    /// Accepts `schema.table` or a bare table name; a bare name must be
    /// unique across schemas.
    pub fn resolve_table(&self, reference: &str) -> SemanticResult<&Table> {
        if let Some((schema, name)) = reference.split_once('.') {
            return self
                .table(&QualifiedName::new(schema, name))
                .ok_or_else(|| SemanticError::UnknownTable(reference.to_string()));
        }

        let matches: Vec<&Table> = self
            .tables
            .iter()
            .filter(|t| t.name.name == reference)
            .collect();

        match matches.as_slice() {
            [] => Err(SemanticError::UnknownTable(reference.to_string())),
            [only] => Ok(only),
            many => Err(SemanticError::AmbiguousTable {
                name: reference.to_string(),
                candidates: many.iter().map(|t| t.name.to_string()).collect(),
            }),
        }
    }

    /// Display label for a table: the bare name when it is unique across
    /// schemas, the qualified name otherwise.
    pub fn label(&self, name: &QualifiedName) -> String {
        let shared = self
            .tables
            .iter()
            .filter(|t| t.name.name == name.name)
            .take(2)
            .count();
        if shared > 1 {
            name.to_string()
        } else {
            name.name.clone()
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
