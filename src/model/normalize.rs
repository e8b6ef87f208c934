//! Metadata normalizer.
//!
//! Pure structural translation from [`SchemaSnapshot`] descriptors into the
//! [`SchemaModel`]. Nothing is inferred here. Any inconsistency in the
//! snapshot aborts the run with a [`MalformedMetadataError`].

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use super::table::{Column, DeclaredForeignKey, QualifiedName, SchemaModel, Table};
use super::types::DataCategory;
use crate::metadata::{ConstraintDescriptor, ConstraintKind, SchemaSnapshot, TableDescriptor};
use crate::semantic::error::{Diagnostic, MalformedMetadataError, UnsupportedTypeWarning};

/// Output of the normalizer.
#[derive(Debug, Clone)]
pub struct NormalizedSchema {
    pub model: SchemaModel,
    /// One `UnsupportedType` diagnostic per unmapped column type.
    pub diagnostics: Vec<Diagnostic>,
}

/// Normalize a snapshot into the canonical schema model.
pub fn normalize(snapshot: &SchemaSnapshot) -> Result<NormalizedSchema, MalformedMetadataError> {
    // Pass 1: table identities, so foreign keys can be checked against the
    // whole snapshot regardless of order.
    let mut columns_by_table: HashMap<QualifiedName, HashSet<&str>> = HashMap::new();
    for desc in &snapshot.tables {
        let name = QualifiedName::new(&desc.schema, &desc.name);
        if columns_by_table.contains_key(&name) {
            return Err(MalformedMetadataError::DuplicateTable { table: name });
        }
        let names = desc.columns.iter().map(|c| c.name.as_str()).collect();
        columns_by_table.insert(name, names);
    }

    // Pass 2: build tables and resolve constraints.
    let mut tables = Vec::with_capacity(snapshot.tables.len());
    let mut foreign_keys = Vec::new();
    let mut diagnostics = Vec::new();

    for desc in &snapshot.tables {
        let name = QualifiedName::new(&desc.schema, &desc.name);
        let mut table = build_table(&name, desc, &mut diagnostics)?;

        let mut primary_key: Option<Vec<String>> = None;
        for constraint in &desc.constraints {
            check_constraint_columns(&name, &table, constraint)?;

            match constraint.kind {
                ConstraintKind::PrimaryKey => {
                    if primary_key.is_some() {
                        return Err(MalformedMetadataError::MultiplePrimaryKeys { table: name });
                    }
                    primary_key = Some(constraint.columns.clone());
                }
                ConstraintKind::Unique => {
                    table.unique_constraints.push(constraint.columns.clone());
                }
                ConstraintKind::ForeignKey => {
                    let fk = resolve_foreign_key(&name, constraint, &columns_by_table)?;
                    foreign_keys.push(fk);
                }
            }
        }

        if let Some(pk) = primary_key {
            for column in &mut table.columns {
                column.primary_key = pk.contains(&column.name);
            }
            table.primary_key = pk;
        }

        tables.push(table);
    }

    debug!(
        tables = tables.len(),
        foreign_keys = foreign_keys.len(),
        unsupported_types = diagnostics.len(),
        "normalized schema snapshot"
    );

    Ok(NormalizedSchema {
        model: SchemaModel::new(tables, foreign_keys),
        diagnostics,
    })
}

/// Build a table's columns, ordered by ordinal position.
fn build_table(
    name: &QualifiedName,
    desc: &TableDescriptor,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<Table, MalformedMetadataError> {
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut seen_ordinals: HashMap<u32, &str> = HashMap::new();
    let mut columns = Vec::with_capacity(desc.columns.len());

    for col in &desc.columns {
        if !seen_names.insert(col.name.as_str()) {
            return Err(MalformedMetadataError::DuplicateColumn {
                table: name.clone(),
                column: col.name.clone(),
            });
        }
        if let Some(first) = seen_ordinals.insert(col.ordinal, col.name.as_str()) {
            return Err(MalformedMetadataError::DuplicateOrdinal {
                table: name.clone(),
                ordinal: col.ordinal,
                first: first.to_string(),
                second: col.name.clone(),
            });
        }

        let category = match DataCategory::classify(&col.data_type) {
            Some(category) => category,
            None => {
                warn!(
                    table = %name,
                    column = %col.name,
                    declared_type = %col.data_type,
                    "unsupported column type, defaulting to other"
                );
                diagnostics.push(Diagnostic::UnsupportedType(UnsupportedTypeWarning {
                    table: name.clone(),
                    column: col.name.clone(),
                    declared_type: col.data_type.clone(),
                }));
                DataCategory::Other
            }
        };

        columns.push(Column {
            table: name.clone(),
            name: col.name.clone(),
            ordinal: col.ordinal,
            declared_type: col.data_type.clone(),
            category,
            nullable: col.is_nullable,
            has_default: col.has_default,
            primary_key: false,
        });
    }

    columns.sort_by_key(|c| c.ordinal);

    Ok(Table {
        name: name.clone(),
        columns,
        primary_key: Vec::new(),
        unique_constraints: Vec::new(),
        row_estimate: desc.row_estimate,
    })
}

/// Every constraint must name at least one existing column of its table.
fn check_constraint_columns(
    name: &QualifiedName,
    table: &Table,
    constraint: &ConstraintDescriptor,
) -> Result<(), MalformedMetadataError> {
    if constraint.columns.is_empty() {
        return Err(MalformedMetadataError::EmptyConstraint {
            table: name.clone(),
            kind: constraint.kind,
        });
    }
    if let Some(missing) = constraint.columns.iter().find(|c| table.column(c).is_none()) {
        return Err(MalformedMetadataError::UnknownConstraintColumn {
            table: name.clone(),
            kind: constraint.kind,
            column: missing.clone(),
        });
    }
    Ok(())
}

fn resolve_foreign_key(
    name: &QualifiedName,
    constraint: &ConstraintDescriptor,
    columns_by_table: &HashMap<QualifiedName, HashSet<&str>>,
) -> Result<DeclaredForeignKey, MalformedMetadataError> {
    let target = constraint
        .references
        .as_ref()
        .ok_or_else(|| MalformedMetadataError::MissingReference { table: name.clone() })?;

    let referenced = QualifiedName::new(
        target.schema.as_deref().unwrap_or(&name.schema),
        &target.table,
    );
    let referenced_columns =
        columns_by_table
            .get(&referenced)
            .ok_or_else(|| MalformedMetadataError::DanglingTable {
                table: name.clone(),
                referenced: referenced.clone(),
            })?;

    if target.columns.len() != constraint.columns.len() {
        return Err(MalformedMetadataError::ArityMismatch {
            table: name.clone(),
            local: constraint.columns.len(),
            remote: target.columns.len(),
        });
    }
    if let Some(missing) = target
        .columns
        .iter()
        .find(|c| !referenced_columns.contains(c.as_str()))
    {
        return Err(MalformedMetadataError::DanglingColumn {
            table: name.clone(),
            referenced,
            column: missing.clone(),
        });
    }

    Ok(DeclaredForeignKey {
        name: constraint.name.clone(),
        table: name.clone(),
        columns: constraint.columns.clone(),
        references: referenced,
        referenced_columns: target.columns.clone(),
    })
}
