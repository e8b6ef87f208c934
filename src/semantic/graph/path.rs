//! Join path search.
//!
//! Breadth-first search with parent pointers. Edges are traversable in
//! either direction; neighbours are visited in edge-id order so the chosen
//! path is stable across runs.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::Serialize;

use super::RelationshipGraph;
use crate::model::QualifiedName;
use crate::semantic::advisor::JoinRecommendation;
use crate::semantic::error::{SemanticError, SemanticResult};
use crate::semantic::inference::RelationshipEdge;

/// One hop of a join path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinStep {
    pub edge: RelationshipEdge,
    /// Walked from the referenced table to the referencing one.
    pub reversed: bool,
    pub recommendation: JoinRecommendation,
}

impl JoinStep {
    /// Table this hop starts from.
    pub fn from(&self) -> &QualifiedName {
        if self.reversed {
            &self.edge.to_table
        } else {
            &self.edge.from_table
        }
    }

    /// Table this hop joins in.
    pub fn to(&self) -> &QualifiedName {
        if self.reversed {
            &self.edge.from_table
        } else {
            &self.edge.to_table
        }
    }
}

/// Shortest chain of relationships between two tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinPath {
    pub from: QualifiedName,
    pub to: QualifiedName,
    pub steps: Vec<JoinStep>,
}

impl JoinPath {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Tables along the path, start and end included.
    pub fn tables(&self) -> Vec<&QualifiedName> {
        let mut result = vec![&self.from];
        result.extend(self.steps.iter().map(JoinStep::to));
        result
    }
}

impl fmt::Display for JoinPath {
    /// Renders as a SQL `FROM` clause.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FROM {}", self.from)?;
        for step in &self.steps {
            write!(
                f,
                "\n  {} {} ON {}",
                step.recommendation.keyword(),
                step.to(),
                step.recommendation.condition
            )?;
        }
        Ok(())
    }
}

struct ParentInfo {
    parent: NodeIndex,
    edge_id: usize,
    reversed: bool,
}

impl RelationshipGraph {
    /// Find the shortest join path between two tables.
    ///
    /// A table joined to itself is an empty path.
    pub fn join_path(&self, from: &QualifiedName, to: &QualifiedName) -> SemanticResult<JoinPath> {
        let from_idx = *self
            .node_indices
            .get(from)
            .ok_or_else(|| SemanticError::UnknownTable(from.to_string()))?;
        let to_idx = *self
            .node_indices
            .get(to)
            .ok_or_else(|| SemanticError::UnknownTable(to.to_string()))?;

        if from_idx == to_idx {
            return Ok(JoinPath {
                from: from.clone(),
                to: to.clone(),
                steps: Vec::new(),
            });
        }

        let mut visited: HashSet<NodeIndex> = HashSet::new();
        let mut parents: HashMap<NodeIndex, ParentInfo> = HashMap::new();
        let mut queue: VecDeque<NodeIndex> = VecDeque::new();

        queue.push_back(from_idx);
        visited.insert(from_idx);

        while let Some(current) = queue.pop_front() {
            for (edge_id, neighbor, reversed) in self.neighbors(current) {
                if !visited.insert(neighbor) {
                    continue;
                }
                parents.insert(
                    neighbor,
                    ParentInfo {
                        parent: current,
                        edge_id,
                        reversed,
                    },
                );
                if neighbor == to_idx {
                    return Ok(self.reconstruct_path(from, to, from_idx, to_idx, &parents));
                }
                queue.push_back(neighbor);
            }
        }

        Err(SemanticError::NoPath {
            from: from.to_string(),
            to: to.to_string(),
        })
    }

    /// Check if any chain of relationships connects two tables.
    pub fn has_path(&self, from: &QualifiedName, to: &QualifiedName) -> bool {
        self.join_path(from, to).is_ok()
    }

    /// Adjacent tables in both directions, sorted by edge id.
    fn neighbors(&self, node: NodeIndex) -> Vec<(usize, NodeIndex, bool)> {
        let mut out: Vec<_> = self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|e| (*e.weight(), e.target(), false))
            .chain(
                self.graph
                    .edges_directed(node, Direction::Incoming)
                    .map(|e| (*e.weight(), e.source(), true)),
            )
            .collect();
        out.sort_by_key(|&(id, _, reversed)| (id, reversed));
        out
    }

    fn reconstruct_path(
        &self,
        from: &QualifiedName,
        to: &QualifiedName,
        from_idx: NodeIndex,
        to_idx: NodeIndex,
        parents: &HashMap<NodeIndex, ParentInfo>,
    ) -> JoinPath {
        let mut steps = Vec::new();
        let mut current = to_idx;

        while current != from_idx {
            let Some(info) = parents.get(&current) else {
                break;
            };
            if let (Some(edge), Some(rec)) = (self.edge(info.edge_id), self.recommendation(info.edge_id)) {
                steps.push(JoinStep {
                    edge: edge.clone(),
                    reversed: info.reversed,
                    recommendation: rec.clone(),
                });
            }
            current = info.parent;
        }

        steps.reverse();
        JoinPath {
            from: from.clone(),
            to: to.clone(),
            steps,
        }
    }
}
