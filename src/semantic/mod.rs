//! Semantic layer: relationships, junctions and join advice.
//!
//! Each stage consumes the previous stage's output and produces a new view:
//!
//! 1. **Resolve** - declared and inferred relationship edges ([`inference`])
//! 2. **Classify** - junction-shaped tables ([`junction`])
//! 3. **Advise** - INNER vs LEFT per edge ([`advisor`])
//!
//! [`graph`] indexes the resolved edges for lookups and join path search.

pub mod advisor;
pub mod error;
pub mod graph;
pub mod inference;
pub mod junction;

pub use advisor::{advise, advise_all, JoinRecommendation, JoinType};
pub use error::{
    AmbiguousInferenceWarning, AnalysisError, AnalysisResult, Diagnostic, DiscardReason,
    MalformedMetadataError, RedundantForeignKeyWarning, SemanticError, SemanticResult,
    UnsupportedTypeWarning,
};
pub use graph::{JoinPath, JoinStep, RelationshipGraph};
pub use inference::{
    InferenceConfig, InferenceWeights, RelationshipEdge, RelationshipOrigin, RelationshipResolver,
    Resolution,
};
pub use junction::{
    edge_cardinality, Cardinality, JunctionClassifier, JunctionConfig, JunctionKind,
    JunctionVerdict,
};
