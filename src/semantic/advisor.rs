//! Join advisory: INNER vs LEFT per relationship edge.
//!
//! Inferred edges always get LEFT, whatever the column's nullability. A
//! NULL-padded row is preferred over rows silently dropped by a wrong guess.

use serde::Serialize;

use super::inference::RelationshipEdge;

/// Reason strings attached to recommendations.
pub mod reasons {
    pub const INFERRED: &str = "relationship is inferred, not guaranteed — LEFT join avoids silently dropping rows if the guess is wrong";
    pub const NULLABLE: &str =
        "referencing column is nullable — rows without a match would be excluded by INNER join";
    pub const MANDATORY: &str = "foreign key is mandatory";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JoinType {
    Inner,
    Left,
}

impl JoinType {
    /// SQL keyword for this join.
    pub fn keyword(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
        }
    }
}

impl std::fmt::Display for JoinType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
            JoinType::Left => write!(f, "LEFT"),
        }
    }
}

/// Recommended join for one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinRecommendation {
    pub edge_id: usize,
    pub join_type: JoinType,
    pub reason: &'static str,
    /// Join condition, `referencing.column = referenced.column`.
    pub condition: String,
}

impl JoinRecommendation {
    pub fn keyword(&self) -> &'static str {
        self.join_type.keyword()
    }
}

/// Recommend a join for a single edge.
pub fn advise(edge: &RelationshipEdge) -> JoinRecommendation {
    let (join_type, reason) = if edge.is_inferred() {
        (JoinType::Left, reasons::INFERRED)
    } else if edge.nullable {
        (JoinType::Left, reasons::NULLABLE)
    } else {
        (JoinType::Inner, reasons::MANDATORY)
    };

    JoinRecommendation {
        edge_id: edge.id,
        join_type,
        reason,
        condition: format!(
            "{}.{} = {}.{}",
            edge.from_table, edge.from_column, edge.to_table, edge.to_column
        ),
    }
}

/// Recommendations for every edge, in edge order.
pub fn advise_all(edges: &[RelationshipEdge]) -> Vec<JoinRecommendation> {
    edges.iter().map(advise).collect()
}
