//! Relationship resolver.
//!
//! Seeds edges from declared foreign keys, then runs implicit-FK detection
//! over every remaining column. Candidates are sorted explicitly before a
//! winner is picked, so the result never depends on iteration order.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::rules::{match_target, MatchRule};
use super::scoring::{ConfidenceScore, InferenceWeights};
use super::{thresholds, RelationshipEdge, RelationshipOrigin};
use crate::model::{Column, QualifiedName, SchemaModel, Table};
use crate::semantic::error::{
    AmbiguousInferenceWarning, Diagnostic, DiscardReason, RedundantForeignKeyWarning,
};

/// Configuration for implicit-FK detection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceConfig {
    /// Run implicit-FK detection at all. Declared edges are always kept.
    pub enabled: bool,
    /// Candidates scoring below this are discarded.
    pub min_confidence: f64,
    pub weights: InferenceWeights,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_confidence: thresholds::confidence::MIN_CONFIDENCE,
            weights: InferenceWeights::default(),
        }
    }
}

impl InferenceConfig {
    /// Only declared foreign keys; no inference.
    pub fn declared_only() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Builder: set minimum confidence.
    pub fn with_min_confidence(mut self, threshold: f64) -> Self {
        self.min_confidence = threshold.clamp(0.0, 1.0);
        self
    }

    /// Builder: set scoring weights.
    pub fn with_weights(mut self, weights: InferenceWeights) -> Self {
        self.weights = weights;
        self
    }
}

/// Resolved edge set plus the diagnostics produced while resolving.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Declared edges first, then inferred edges; ids follow this order.
    pub edges: Vec<RelationshipEdge>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A scored inference candidate for one referencing column.
#[derive(Debug)]
struct Candidate<'a> {
    target: &'a Table,
    target_column: &'a Column,
    rule: MatchRule,
    score: ConfidenceScore,
    /// Edit distance from the stripped column prefix to the target table name.
    distance: usize,
}

impl Candidate<'_> {
    /// Best first: higher score, then closer name, then qualified name.
    fn rank(&self, other: &Self) -> Ordering {
        other
            .score
            .confidence
            .total_cmp(&self.score.confidence)
            .then_with(|| self.distance.cmp(&other.distance))
            .then_with(|| self.target.name.cmp(&other.target.name))
    }
}

/// Produces the authoritative relationship edge set for a model.
#[derive(Debug, Clone, Default)]
pub struct RelationshipResolver {
    config: InferenceConfig,
}

impl RelationshipResolver {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Resolve declared and inferred edges.
    pub fn resolve(&self, model: &SchemaModel) -> Resolution {
        let mut resolution = Resolution::default();
        let mut covered: HashSet<(QualifiedName, String)> = HashSet::new();

        self.seed_declared(model, &mut covered, &mut resolution);
        let declared = resolution.edges.len();

        if self.config.enabled {
            for table in &model.tables {
                for column in &table.columns {
                    if column.primary_key
                        || covered.contains(&(table.name.clone(), column.name.clone()))
                    {
                        continue;
                    }
                    self.infer_column(model, column, &mut resolution);
                }
            }
        }

        for (id, edge) in resolution.edges.iter_mut().enumerate() {
            edge.id = id;
        }

        debug!(
            declared,
            inferred = resolution.edges.len() - declared,
            discarded = resolution.diagnostics.len(),
            "resolved relationships"
        );
        resolution
    }

    fn seed_declared(
        &self,
        model: &SchemaModel,
        covered: &mut HashSet<(QualifiedName, String)>,
        resolution: &mut Resolution,
    ) {
        for fk in &model.foreign_keys {
            for (column, referenced) in fk.columns.iter().zip(&fk.referenced_columns) {
                let key = (fk.table.clone(), column.clone());
                if covered.contains(&key) {
                    let kept = resolution
                        .edges
                        .iter()
                        .find(|e| e.from_table == fk.table && &e.from_column == column)
                        .map(|e| e.to_table.clone())
                        .unwrap_or_else(|| fk.references.clone());
                    warn!(
                        table = %fk.table,
                        column = %column,
                        ignored = %fk.references,
                        "column carries more than one declared foreign key"
                    );
                    resolution
                        .diagnostics
                        .push(Diagnostic::RedundantForeignKey(RedundantForeignKeyWarning {
                            table: fk.table.clone(),
                            column: column.clone(),
                            kept,
                            ignored: fk.references.clone(),
                        }));
                    continue;
                }

                let nullable = model
                    .column(&fk.table, column)
                    .map(|c| c.nullable)
                    .unwrap_or(true);

                resolution.edges.push(RelationshipEdge {
                    id: 0,
                    from_table: fk.table.clone(),
                    from_column: column.clone(),
                    to_table: fk.references.clone(),
                    to_column: referenced.clone(),
                    origin: RelationshipOrigin::Declared,
                    nullable,
                    confidence: thresholds::confidence::DECLARED,
                    constraint_name: fk.name.clone(),
                    rule: None,
                });
                covered.insert(key);
            }
        }
    }

    fn infer_column(&self, model: &SchemaModel, column: &Column, resolution: &mut Resolution) {
        let mut candidates = self.candidates(model, column);
        if candidates.is_empty() {
            return;
        }
        candidates.sort_by(|a, b| a.rank(b));

        let threshold = self.config.min_confidence;
        let mut iter = candidates.into_iter();
        let Some(best) = iter.next() else {
            return;
        };

        let winner = if best.score.confidence >= threshold {
            trace!(
                column = %column.qualified_name(),
                target = %best.target.name,
                confidence = best.score.confidence,
                rule = best.rule.name(),
                "inferred relationship"
            );
            resolution.edges.push(RelationshipEdge {
                id: 0,
                from_table: column.table.clone(),
                from_column: column.name.clone(),
                to_table: best.target.name.clone(),
                to_column: best.target_column.name.clone(),
                origin: RelationshipOrigin::Inferred,
                nullable: column.nullable,
                confidence: best.score.confidence,
                constraint_name: None,
                rule: Some(best.rule),
            });
            Some(best.target.name.clone())
        } else {
            discard(column, &best, DiscardReason::BelowThreshold { threshold }, resolution);
            None
        };

        for candidate in iter {
            let reason = match &winner {
                Some(winner) if candidate.score.confidence >= threshold => DiscardReason::Outranked {
                    winner: winner.clone(),
                },
                _ => DiscardReason::BelowThreshold { threshold },
            };
            discard(column, &candidate, reason, resolution);
        }
    }

    /// All targets whose name matches `column` and whose key type is compatible.
    fn candidates<'a>(&self, model: &'a SchemaModel, column: &Column) -> Vec<Candidate<'a>> {
        let prefix = super::rules::strip_key_suffix(&column.name)
            .unwrap_or_else(|| column.name.to_lowercase());

        model
            .tables
            .iter()
            .filter_map(|target| {
                let target_column = target.single_primary_key()?;
                let name_match = match_target(column, target, target_column)?;

                let type_verified = match column.category.compatible_with(&target_column.category) {
                    Some(true) => true,
                    Some(false) => {
                        trace!(
                            column = %column.qualified_name(),
                            target = %target_column.qualified_name(),
                            "type categories differ, not a candidate"
                        );
                        return None;
                    }
                    None => false,
                };

                let score = ConfidenceScore::calculate(&name_match, type_verified, &self.config.weights);
                Some(Candidate {
                    target,
                    target_column,
                    rule: name_match.rule,
                    score,
                    distance: strsim::levenshtein(&prefix, &target.name.name.to_lowercase()),
                })
            })
            .collect()
    }
}

fn discard(column: &Column, candidate: &Candidate<'_>, reason: DiscardReason, resolution: &mut Resolution) {
    trace!(
        column = %column.qualified_name(),
        target = %candidate.target.name,
        confidence = candidate.score.confidence,
        "discarded inference candidate"
    );
    resolution
        .diagnostics
        .push(Diagnostic::AmbiguousInference(AmbiguousInferenceWarning {
            table: column.table.clone(),
            column: column.name.clone(),
            candidate_table: candidate.target.name.clone(),
            candidate_column: candidate.target_column.name.clone(),
            confidence: candidate.score.confidence,
            reason,
        }));
}
