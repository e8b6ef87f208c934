//! # schemasight
//!
//! Turns relational-database introspection data into a navigable logical
//! model: how tables relate, which tables are many-to-many junctions, which
//! joins are safe as INNER and which need LEFT, plus deterministic Mermaid
//! and Markdown renderings of the result.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            SchemaSnapshot (introspection data)           │
//! │        (tables, columns, constraints; JSON or code)      │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [model::normalize]
//! ┌─────────────────────────────────────────────────────────┐
//! │          SchemaModel (typed tables and columns)          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [semantic::inference]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Relationship edges (declared + inferred)           │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [semantic::junction, semantic::advisor]
//! ┌─────────────────────────────────────────────────────────┐
//! │       Junction verdicts + INNER/LEFT recommendations     │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │      ER diagram, flowchart, Markdown documentation       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! [`analysis::analyze`] runs the whole pipeline; [`cache::AnalysisCache`]
//! memoizes it by snapshot fingerprint.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod metadata;
pub mod model;
pub mod render;
pub mod semantic;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::analysis::{analyze, AnalysisOptions, AnalysisReport};
    pub use crate::cache::AnalysisCache;
    pub use crate::config::Settings;
    pub use crate::metadata::{
        ColumnDescriptor, ConstraintDescriptor, ConstraintKind, JsonSnapshotFile, SchemaSnapshot,
        SnapshotSource, TableDescriptor,
    };
    pub use crate::model::{DataCategory, QualifiedName, SchemaModel};
    pub use crate::render::{RenderOptions, TableOrder};
    pub use crate::semantic::{
        Cardinality, Diagnostic, InferenceConfig, JoinType, JunctionConfig, RelationshipEdge,
        RelationshipOrigin,
    };
}
