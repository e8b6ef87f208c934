//! Relationship resolution: declared foreign keys plus name-based inference.
//!
//! # Architecture
//!
//! Resolution works in two phases:
//!
//! 1. **Declared seeding** - every declared foreign-key column pair becomes a
//!    `declared` edge. A column keeps at most one declared edge.
//! 2. **Implicit-FK detection** - every other non-key column is matched
//!    against tables with a single-column primary key by naming rule
//!    ([`rules`]), checked for type compatibility, scored ([`scoring`]) and
//!    reduced to at most one winner.
//!
//! # Example
//!
//! ```ignore
//! use schemasight::semantic::inference::{InferenceConfig, RelationshipResolver};
//!
//! let resolution = RelationshipResolver::new(InferenceConfig::default()).resolve(&model);
//! for edge in &resolution.edges {
//!     println!("{} -> {} ({})", edge.from_table, edge.to_table, edge.origin);
//! }
//! ```

mod engine;
mod inflection;
mod rules;
mod scoring;

pub use engine::{InferenceConfig, RelationshipResolver, Resolution};
pub use inflection::{is_inflection_of, pluralize, singularize};
pub use rules::{match_target, strip_key_suffix, MatchRule, NameMatch};
pub use scoring::{ConfidenceScore, InferenceWeights, ScoreAdjustment};

use serde::Serialize;

use crate::model::QualifiedName;

/// Default scores and adjustments. Every value is overridable through
/// [`InferenceConfig`].
pub mod thresholds {
    /// Confidence levels.
    pub mod confidence {
        /// Confidence of an edge backed by a declared constraint.
        pub const DECLARED: f64 = 1.0;
        /// Maximum confidence for inferred edges (never certain).
        pub const INFERENCE_CAP: f64 = 0.95;
        /// Inferred candidates below this are discarded.
        pub const MIN_CONFIDENCE: f64 = 0.50;
    }

    /// Base scores per naming rule.
    pub mod score {
        pub const EXACT_TABLE: f64 = 0.70;
        pub const INFLECTED_TABLE: f64 = 0.60;
        pub const PRIMARY_KEY_NAME: f64 = 0.55;
    }

    /// Score adjustments.
    pub mod adjustment {
        pub const PRIMARY_KEY_NAME_BONUS: f64 = 0.20;
        pub const UNVERIFIED_TYPE_PENALTY: f64 = 0.10;
    }
}

/// Where an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipOrigin {
    /// Backed by an explicit foreign-key constraint.
    Declared,
    /// Hypothesized from naming conventions.
    Inferred,
}

impl std::fmt::Display for RelationshipOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Declared => write!(f, "declared"),
            Self::Inferred => write!(f, "inferred"),
        }
    }
}

/// A directed edge from a referencing column to a referenced column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipEdge {
    /// Position in resolution order.
    pub id: usize,
    pub from_table: QualifiedName,
    pub from_column: String,
    pub to_table: QualifiedName,
    pub to_column: String,
    pub origin: RelationshipOrigin,
    /// Nullability of the referencing column.
    pub nullable: bool,
    /// 1.0 for declared edges.
    pub confidence: f64,
    /// Constraint name of a declared edge, when the snapshot provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraint_name: Option<String>,
    /// Naming rule of an inferred edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<MatchRule>,
}

impl RelationshipEdge {
    pub fn is_inferred(&self) -> bool {
        self.origin == RelationshipOrigin::Inferred
    }

    pub fn is_self_reference(&self) -> bool {
        self.from_table == self.to_table
    }

    pub fn key(&self) -> RelationshipKey {
        RelationshipKey::new(&self.from_table, &self.from_column, &self.to_table, &self.to_column)
    }
}

/// Identifies a relationship by its endpoints, ignoring origin and score.
#[derive(Debug, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct RelationshipKey {
    pub from_table: QualifiedName,
    pub from_column: String,
    pub to_table: QualifiedName,
    pub to_column: String,
}

impl RelationshipKey {
    #[must_use]
    pub fn new(
        from_table: &QualifiedName,
        from_column: &str,
        to_table: &QualifiedName,
        to_column: &str,
    ) -> Self {
        Self {
            from_table: from_table.clone(),
            from_column: from_column.to_string(),
            to_table: to_table.clone(),
            to_column: to_column.to_string(),
        }
    }
}

impl std::fmt::Display for RelationshipKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{} -> {}.{}",
            self.from_table, self.from_column, self.to_table, self.to_column
        )
    }
}
