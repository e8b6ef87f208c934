//! Introspection descriptors.
//!
//! These types mirror what the introspection collaborator delivers: one
//! descriptor per table, each carrying its columns and declared constraints.
//! They are loosely typed on purpose (the data type is a free-form string)
//! and are converted into the strongly-typed [`crate::model`] by the
//! normalizer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema used when a descriptor omits one.
pub const DEFAULT_SCHEMA: &str = "public";

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_true() -> bool {
    true
}

/// A complete, already-collected metadata snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// Tables in the order the collaborator supplied them.
    #[serde(default)]
    pub tables: Vec<TableDescriptor>,
}

impl SchemaSnapshot {
    /// Create a snapshot from a list of table descriptors.
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        Self { tables }
    }

    /// Builder: append a table.
    pub fn with_table(mut self, table: TableDescriptor) -> Self {
        self.tables.push(table);
        self
    }

    /// Parse a snapshot from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Raw description of one table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Schema name.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// Table name.
    pub name: String,
    /// Columns, each carrying its ordinal position.
    #[serde(default)]
    pub columns: Vec<ColumnDescriptor>,
    /// Declared constraints.
    #[serde(default)]
    pub constraints: Vec<ConstraintDescriptor>,
    /// Planner row estimate, advisory only.
    #[serde(default)]
    pub row_estimate: Option<u64>,
}

impl TableDescriptor {
    /// Create an empty table descriptor.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
            row_estimate: None,
        }
    }

    /// Builder: append a column at the next ordinal position.
    pub fn column(mut self, name: &str, data_type: &str, is_nullable: bool) -> Self {
        let ordinal = self.columns.len() as u32 + 1;
        self.columns.push(ColumnDescriptor {
            name: name.to_string(),
            ordinal,
            data_type: data_type.to_string(),
            is_nullable,
            has_default: false,
        });
        self
    }

    /// Builder: append a fully specified column.
    pub fn with_column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    /// Builder: declare the primary key.
    pub fn primary_key(mut self, columns: &[&str]) -> Self {
        self.constraints
            .push(ConstraintDescriptor::new(ConstraintKind::PrimaryKey, columns));
        self
    }

    /// Builder: declare a unique constraint.
    pub fn unique(mut self, columns: &[&str]) -> Self {
        self.constraints
            .push(ConstraintDescriptor::new(ConstraintKind::Unique, columns));
        self
    }

    /// Builder: declare a foreign key into a table of the same schema.
    pub fn foreign_key(mut self, columns: &[&str], table: &str, referenced: &[&str]) -> Self {
        let mut constraint = ConstraintDescriptor::new(ConstraintKind::ForeignKey, columns);
        constraint.references = Some(ReferenceTarget {
            schema: None,
            table: table.to_string(),
            columns: referenced.iter().map(|c| c.to_string()).collect(),
        });
        self.constraints.push(constraint);
        self
    }

    /// Builder: set the row estimate.
    pub fn with_row_estimate(mut self, rows: u64) -> Self {
        self.row_estimate = Some(rows);
        self
    }
}

/// Raw description of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Ordinal position (1-based), unique within its table.
    pub ordinal: u32,
    /// Database-specific type name, e.g. `character varying(255)`.
    pub data_type: String,
    /// Whether NULL values are allowed.
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    /// Whether the column has a default expression.
    #[serde(default)]
    pub has_default: bool,
}

/// Kind of a declared constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    PrimaryKey,
    Unique,
    ForeignKey,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PrimaryKey => write!(f, "primary key"),
            Self::Unique => write!(f, "unique"),
            Self::ForeignKey => write!(f, "foreign key"),
        }
    }
}

/// A declared constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDescriptor {
    /// Constraint name, if the database reported one.
    #[serde(default)]
    pub name: Option<String>,
    /// Constraint kind.
    pub kind: ConstraintKind,
    /// Constrained columns of the owning table (ordered).
    pub columns: Vec<String>,
    /// Referenced target, required for foreign keys.
    #[serde(default)]
    pub references: Option<ReferenceTarget>,
}

impl ConstraintDescriptor {
    /// Create an unnamed constraint without a reference target.
    pub fn new(kind: ConstraintKind, columns: &[&str]) -> Self {
        Self {
            name: None,
            kind,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            references: None,
        }
    }

    /// Builder: set the constraint name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Target of a foreign key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceTarget {
    /// Referenced schema; defaults to the referencing table's schema.
    #[serde(default)]
    pub schema: Option<String>,
    /// Referenced table name.
    pub table: String,
    /// Referenced columns, positionally matched with the constrained columns.
    pub columns: Vec<String>,
}
