//! Confidence scoring for inferred relationships.
//!
//! A candidate's score is the base score of the naming rule that matched,
//! adjusted by a primary-key-name bonus and an unverified-type penalty, and
//! capped below certainty.

use serde::Serialize;

use super::rules::{MatchRule, NameMatch};
use super::thresholds;

/// Tunable weights for candidate scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceWeights {
    /// Base score when the stripped column name equals the table name.
    pub exact_table: f64,
    /// Base score when it equals the table name up to singular/plural.
    pub inflected_table: f64,
    /// Base score when only the primary-key column name matches.
    pub primary_key_name: f64,
    /// Added when a table-name match also matches the primary-key name.
    pub primary_key_name_bonus: f64,
    /// Subtracted when the type check was skipped (either side is `other`).
    pub unverified_type_penalty: f64,
    /// Upper bound for any inferred score.
    pub cap: f64,
}

impl Default for InferenceWeights {
    fn default() -> Self {
        Self {
            exact_table: thresholds::score::EXACT_TABLE,
            inflected_table: thresholds::score::INFLECTED_TABLE,
            primary_key_name: thresholds::score::PRIMARY_KEY_NAME,
            primary_key_name_bonus: thresholds::adjustment::PRIMARY_KEY_NAME_BONUS,
            unverified_type_penalty: thresholds::adjustment::UNVERIFIED_TYPE_PENALTY,
            cap: thresholds::confidence::INFERENCE_CAP,
        }
    }
}

impl InferenceWeights {
    /// Base score for a naming rule.
    pub fn base_score(&self, rule: MatchRule) -> f64 {
        match rule {
            MatchRule::ExactTableName => self.exact_table,
            MatchRule::InflectedTableName => self.inflected_table,
            MatchRule::PrimaryKeyName => self.primary_key_name,
        }
    }
}

/// Computed confidence score with breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceScore {
    /// Final confidence, rounded to two decimals.
    pub confidence: f64,
    /// Base score from the matching rule.
    pub base: f64,
    pub adjustments: Vec<ScoreAdjustment>,
}

/// A single adjustment to the confidence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreAdjustment {
    pub reason: &'static str,
    /// Amount added (or subtracted if negative).
    pub delta: f64,
}

impl ConfidenceScore {
    /// Score a name match. `type_verified` is false when the category check
    /// was skipped.
    #[must_use]
    pub fn calculate(name_match: &NameMatch, type_verified: bool, weights: &InferenceWeights) -> Self {
        let base = weights.base_score(name_match.rule);
        let mut adjustments = Vec::new();

        if name_match.primary_key_name && name_match.rule != MatchRule::PrimaryKeyName {
            adjustments.push(ScoreAdjustment {
                reason: "Column name equals the referenced primary key",
                delta: weights.primary_key_name_bonus,
            });
        }

        if !type_verified {
            adjustments.push(ScoreAdjustment {
                reason: "Type compatibility could not be verified",
                delta: -weights.unverified_type_penalty,
            });
        }

        let raw = base + adjustments.iter().map(|a| a.delta).sum::<f64>();
        // Rounded so threshold comparisons don't hinge on float noise.
        let confidence = (raw.clamp(0.0, weights.cap) * 100.0).round() / 100.0;

        ConfidenceScore {
            confidence,
            base,
            adjustments,
        }
    }
}
