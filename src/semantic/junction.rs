//! Junction table classification.
//!
//! A table is a junction candidate when some of its outgoing edges reach at
//! least two distinct other tables and their referencing columns together form
//! exactly the primary key or a unique constraint. Other columns, foreign keys
//! included, are payload; tables carrying more than a few of them are reported
//! as relationship tables with payload.
//!
//! Only a linking key made of non-null columns is labelled many-to-many.
//!
//! Verdicts are advisory. They describe a structural shape, not a declared
//! schema fact.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::inference::RelationshipEdge;
use crate::model::{QualifiedName, SchemaModel, Table};

/// Cardinality of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::OneToOne => "one-to-one",
            Cardinality::OneToMany => "one-to-many",
            Cardinality::ManyToMany => "many-to-many",
        }
    }
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Junction classifier settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JunctionConfig {
    /// Most extra columns (beyond the foreign keys and an optional surrogate
    /// key) a pure junction may carry.
    pub max_payload_columns: usize,
}

impl Default for JunctionConfig {
    fn default() -> Self {
        Self {
            max_payload_columns: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JunctionKind {
    /// Association table with few or no extra columns.
    Junction,
    /// Association shape, but with substantial business attributes.
    WithPayload,
}

/// Verdict for one junction-shaped table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JunctionVerdict {
    pub table: QualifiedName,
    /// True only for [`JunctionKind::Junction`].
    pub is_junction: bool,
    pub kind: JunctionKind,
    /// Bridged tables, in edge order.
    pub bridges: Vec<QualifiedName>,
    pub foreign_key_columns: Vec<String>,
    /// Surrogate single-column primary key outside the foreign-key set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surrogate_key: Option<String>,
    pub payload_columns: Vec<String>,
    pub cardinality: Cardinality,
    /// For one-to-many: the bridged table on the "one" side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub one_side: Option<QualifiedName>,
}

#[derive(Debug, Clone, Default)]
pub struct JunctionClassifier {
    config: JunctionConfig,
}

impl JunctionClassifier {
    pub fn new(config: JunctionConfig) -> Self {
        Self { config }
    }

    /// Classify every table; returns verdicts for junction-shaped tables only,
    /// in table order.
    pub fn classify(&self, model: &SchemaModel, edges: &[RelationshipEdge]) -> Vec<JunctionVerdict> {
        let verdicts: Vec<_> = model
            .tables
            .iter()
            .filter_map(|table| self.classify_table(table, edges))
            .collect();
        debug!(
            junctions = verdicts.iter().filter(|v| v.is_junction).count(),
            with_payload = verdicts.iter().filter(|v| !v.is_junction).count(),
            "classified junction tables"
        );
        verdicts
    }

    fn classify_table(&self, table: &Table, edges: &[RelationshipEdge]) -> Option<JunctionVerdict> {
        let outgoing: Vec<&RelationshipEdge> = edges
            .iter()
            .filter(|e| e.from_table == table.name && !e.is_self_reference())
            .collect();
        if outgoing.len() < 2 {
            return None;
        }

        let (key, linking) = Self::linking_edges(table, &outgoing)?;
        let foreign_key_columns: Vec<String> = linking.iter().map(|e| e.from_column.clone()).collect();

        let surrogate_key = match table.primary_key.as_slice() {
            [only] if !foreign_key_columns.contains(only) => Some(only.clone()),
            _ => None,
        };
        // Foreign keys outside the linking key count as payload.
        let payload_columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| &c.name)
            .filter(|name| !foreign_key_columns.contains(name) && surrogate_key.as_ref() != Some(name))
            .cloned()
            .collect();

        let kind = if payload_columns.len() <= self.config.max_payload_columns {
            JunctionKind::Junction
        } else {
            JunctionKind::WithPayload
        };

        let non_unique: Vec<&&RelationshipEdge> = linking
            .iter()
            .filter(|e| !table.is_individually_unique(&e.from_column))
            .collect();
        let mandatory = linking.iter().all(|e| !e.nullable);
        let (cardinality, one_side) = match non_unique.as_slice() {
            [] => (Cardinality::OneToOne, None),
            all if all.len() == linking.len() && mandatory => (Cardinality::ManyToMany, None),
            // A nullable pair links each bridged row to many optional rows.
            all if all.len() == linking.len() => (Cardinality::OneToMany, None),
            [first, ..] => (Cardinality::OneToMany, Some(first.to_table.clone())),
        };
        debug!(table = %table.name, key = ?key, %cardinality, "junction-shaped table");

        Some(JunctionVerdict {
            table: table.name.clone(),
            is_junction: kind == JunctionKind::Junction,
            kind,
            bridges: linking.iter().map(|e| e.to_table.clone()).collect(),
            foreign_key_columns,
            surrogate_key,
            payload_columns,
            cardinality,
            one_side,
        })
    }

    /// Pick the outgoing edges whose columns form the primary key, or else the
    /// first unique constraint, exactly. Each key column must carry one edge
    /// and the edges must reach at least two distinct tables.
    fn linking_edges<'t, 'e>(
        table: &'t Table,
        outgoing: &[&'e RelationshipEdge],
    ) -> Option<(&'t [String], Vec<&'e RelationshipEdge>)> {
        std::iter::once(&table.primary_key)
            .chain(table.unique_constraints.iter())
            .filter(|key| key.len() >= 2)
            .find_map(|key| {
                let linking: Vec<&RelationshipEdge> = outgoing
                    .iter()
                    .copied()
                    .filter(|e| key.contains(&e.from_column))
                    .collect();
                let columns: HashSet<&str> = linking.iter().map(|e| e.from_column.as_str()).collect();
                let targets: HashSet<&QualifiedName> = linking.iter().map(|e| &e.to_table).collect();
                let exact = linking.len() == key.len() && columns.len() == key.len();
                let distinct = targets.len() == linking.len();
                (exact && distinct).then_some((key.as_slice(), linking))
            })
    }
}

/// Cardinality marker for a single edge, seen from the referenced table.
///
/// Edges leaving a pure many-to-many junction are many-to-many; an edge whose
/// referencing column is unique on its own is one-to-one; anything else is
/// one-to-many.
pub fn edge_cardinality(
    edge: &RelationshipEdge,
    model: &SchemaModel,
    verdicts: &[JunctionVerdict],
) -> Cardinality {
    let from_junction = verdicts.iter().any(|v| {
        v.table == edge.from_table && v.is_junction && v.cardinality == Cardinality::ManyToMany
    });
    if from_junction {
        return Cardinality::ManyToMany;
    }

    let unique = model
        .table(&edge.from_table)
        .is_some_and(|t| t.is_individually_unique(&edge.from_column));
    if unique {
        Cardinality::OneToOne
    } else {
        Cardinality::OneToMany
    }
}
