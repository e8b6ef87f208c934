//! Error and diagnostic types for the analysis pipeline.
//!
//! Three families:
//! - [`MalformedMetadataError`]: the snapshot is internally inconsistent.
//!   Fatal; the run is aborted.
//! - [`Diagnostic`]: non-fatal findings reported next to the output.
//! - [`SemanticError`]: lookups against an already-built model (unknown
//!   table, no join path).

use std::fmt;

use serde::Serialize;

use crate::metadata::ConstraintKind;
use crate::model::QualifiedName;

/// Result type for lookups against a built model.
pub type SemanticResult<T> = Result<T, SemanticError>;

/// Result type for a full analysis run.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// The snapshot contradicts itself.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedMetadataError {
    #[error("table '{table}' appears more than once in the snapshot")]
    DuplicateTable { table: QualifiedName },

    #[error("column '{column}' appears more than once in table '{table}'")]
    DuplicateColumn { table: QualifiedName, column: String },

    #[error("ordinal position {ordinal} is used by both '{first}' and '{second}' in table '{table}'")]
    DuplicateOrdinal {
        table: QualifiedName,
        ordinal: u32,
        first: String,
        second: String,
    },

    #[error("{kind} constraint on '{table}' has no columns")]
    EmptyConstraint {
        table: QualifiedName,
        kind: ConstraintKind,
    },

    #[error("{kind} constraint on '{table}' names unknown column '{column}'")]
    UnknownConstraintColumn {
        table: QualifiedName,
        kind: ConstraintKind,
        column: String,
    },

    #[error("table '{table}' declares more than one primary key")]
    MultiplePrimaryKeys { table: QualifiedName },

    #[error("foreign key on '{table}' has no referenced target")]
    MissingReference { table: QualifiedName },

    #[error("foreign key on '{table}' references table '{referenced}', which is absent from the snapshot")]
    DanglingTable {
        table: QualifiedName,
        referenced: QualifiedName,
    },

    #[error("foreign key on '{table}' references column '{column}', which is absent from '{referenced}'")]
    DanglingColumn {
        table: QualifiedName,
        referenced: QualifiedName,
        column: String,
    },

    #[error("foreign key on '{table}' maps {local} column(s) onto {remote} referenced column(s)")]
    ArityMismatch {
        table: QualifiedName,
        local: usize,
        remote: usize,
    },
}

/// Failure of a complete analysis run.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Malformed(#[from] MalformedMetadataError),

    #[error("Failed to fingerprint snapshot: {0}")]
    Fingerprint(#[from] serde_json::Error),
}

/// Errors from queries against a built model.
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    /// Referenced a table that doesn't exist.
    UnknownTable(String),

    /// A bare table name matches tables in several schemas.
    AmbiguousTable {
        name: String,
        candidates: Vec<String>,
    },

    /// No chain of relationships connects the two tables.
    NoPath { from: String, to: String },
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticError::UnknownTable(name) => {
                write!(f, "Unknown table: '{}'", name)
            }
            SemanticError::AmbiguousTable { name, candidates } => {
                write!(
                    f,
                    "Ambiguous table '{}' - exists as: {}. Qualify it with a schema.",
                    name,
                    candidates.join(", ")
                )
            }
            SemanticError::NoPath { from, to } => {
                write!(f, "No relationship path from '{}' to '{}'", from, to)
            }
        }
    }
}

impl std::error::Error for SemanticError {}

// ============================================================================
// Diagnostics
// ============================================================================

/// A declared type did not map to a known category and was treated as
/// `other`; type-aware heuristics were skipped for this column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnsupportedTypeWarning {
    pub table: QualifiedName,
    pub column: String,
    pub declared_type: String,
}

/// Why an inference candidate was dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscardReason {
    /// Confidence below the configured minimum.
    BelowThreshold { threshold: f64 },
    /// A better-scoring candidate won for the same column.
    Outranked { winner: QualifiedName },
}

/// An inference candidate that was considered and discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmbiguousInferenceWarning {
    pub table: QualifiedName,
    pub column: String,
    pub candidate_table: QualifiedName,
    pub candidate_column: String,
    pub confidence: f64,
    pub reason: DiscardReason,
}

/// A column carries more than one declared foreign key; only the first is
/// kept.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedundantForeignKeyWarning {
    pub table: QualifiedName,
    pub column: String,
    pub kept: QualifiedName,
    pub ignored: QualifiedName,
}

/// Non-fatal finding reported alongside successful output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    UnsupportedType(UnsupportedTypeWarning),
    AmbiguousInference(AmbiguousInferenceWarning),
    RedundantForeignKey(RedundantForeignKeyWarning),
}

impl Diagnostic {
    /// Table and column the finding is about.
    pub fn location(&self) -> (&QualifiedName, &str) {
        match self {
            Diagnostic::UnsupportedType(w) => (&w.table, &w.column),
            Diagnostic::AmbiguousInference(w) => (&w.table, &w.column),
            Diagnostic::RedundantForeignKey(w) => (&w.table, &w.column),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::UnsupportedType(_) => "unsupported_type",
            Diagnostic::AmbiguousInference(_) => "ambiguous_inference",
            Diagnostic::RedundantForeignKey(_) => "redundant_foreign_key",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnsupportedType(w) => write!(
                f,
                "unsupported type '{}' on {}.{}; treated as other",
                w.declared_type, w.table, w.column
            ),
            Diagnostic::AmbiguousInference(w) => match &w.reason {
                DiscardReason::BelowThreshold { threshold } => write!(
                    f,
                    "discarded candidate {}.{} -> {}.{} (confidence {:.2} below {:.2})",
                    w.table, w.column, w.candidate_table, w.candidate_column, w.confidence, threshold
                ),
                DiscardReason::Outranked { winner } => write!(
                    f,
                    "discarded candidate {}.{} -> {}.{} (confidence {:.2}, outranked by {})",
                    w.table, w.column, w.candidate_table, w.candidate_column, w.confidence, winner
                ),
            },
            Diagnostic::RedundantForeignKey(w) => write!(
                f,
                "ignored second foreign key on {}.{} to {} (kept {})",
                w.table, w.column, w.ignored, w.kept
            ),
        }
    }
}
