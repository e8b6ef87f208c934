//! Relationship graph over resolved edges.
//!
//! Tables are nodes; every resolved edge is a directed `petgraph` edge from
//! the referencing table to the referenced table, weighted with its edge id.
//! Used for inbound/outbound lookups and join path search.

mod path;

pub use path::{JoinPath, JoinStep};

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use super::advisor::{advise_all, JoinRecommendation};
use super::inference::RelationshipEdge;
use crate::model::{QualifiedName, SchemaModel};

#[derive(Debug, Clone)]
pub struct RelationshipGraph {
    graph: DiGraph<QualifiedName, usize>,
    node_indices: HashMap<QualifiedName, NodeIndex>,
    edges: Vec<RelationshipEdge>,
    joins: Vec<JoinRecommendation>,
}

impl RelationshipGraph {
    /// Build from a model and its resolved edges. Tables without edges are
    /// still nodes.
    pub fn build(model: &SchemaModel, edges: &[RelationshipEdge]) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();

        for table in &model.tables {
            let idx = graph.add_node(table.name.clone());
            node_indices.insert(table.name.clone(), idx);
        }

        for edge in edges {
            if let (Some(&from), Some(&to)) = (
                node_indices.get(&edge.from_table),
                node_indices.get(&edge.to_table),
            ) {
                graph.add_edge(from, to, edge.id);
            }
        }

        Self {
            graph,
            node_indices,
            edges: edges.to_vec(),
            joins: advise_all(edges),
        }
    }

    pub fn contains(&self, table: &QualifiedName) -> bool {
        self.node_indices.contains_key(table)
    }

    pub fn edge(&self, id: usize) -> Option<&RelationshipEdge> {
        self.edges.get(id)
    }

    pub fn recommendation(&self, edge_id: usize) -> Option<&JoinRecommendation> {
        self.joins.get(edge_id)
    }

    /// Edges leaving `table`, in resolution order.
    pub fn outbound(&self, table: &QualifiedName) -> Vec<&RelationshipEdge> {
        self.edges.iter().filter(|e| &e.from_table == table).collect()
    }

    /// Edges arriving at `table`, in resolution order.
    pub fn inbound(&self, table: &QualifiedName) -> Vec<&RelationshipEdge> {
        self.edges.iter().filter(|e| &e.to_table == table).collect()
    }

    pub fn table_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
