//! Naming rules for implicit foreign-key detection.
//!
//! A column is matched against a target table by name only; type checks and
//! scoring happen in the engine.

use serde::Serialize;

use super::inflection::is_inflection_of;
use crate::model::{Column, Table};

/// Key suffixes, checked in order. Matching is case-insensitive.
const KEY_SUFFIXES: &[&str] = &["_id", "id"];

/// Shortest prefix a bare `id` suffix may leave when no case boundary marks
/// it, so that `paid` and `valid` stay ordinary words.
const MIN_BARE_PREFIX: usize = 4;

/// Which naming rule produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Stripped column name equals the table name (`customer_id` -> `customer`).
    ExactTableName,
    /// Stripped column name equals the table name up to singular/plural
    /// (`customer_id` -> `customers`).
    InflectedTableName,
    /// Column name equals the target's primary-key column name
    /// (`sku` -> `products.sku`), with no table-name match.
    PrimaryKeyName,
}

impl MatchRule {
    /// Rule identifier used in output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ExactTableName => "exact_table_name",
            Self::InflectedTableName => "inflected_table_name",
            Self::PrimaryKeyName => "primary_key_name",
        }
    }
}

/// A successful name match against one target table.
#[derive(Debug, Clone, PartialEq)]
pub struct NameMatch {
    pub rule: MatchRule,
    /// The column name also equals the target's primary-key column name.
    pub primary_key_name: bool,
}

/// Strip a conventional key suffix from a column name.
///
/// Returns the lowercase prefix, or `None` when the name carries no key
/// suffix or nothing is left after stripping (a bare `id`). A bare `id`
/// suffix counts only after a case boundary (`CustomerID`) or when at least
/// four characters precede it.
///
/// ```ignore
/// assert_eq!(strip_key_suffix("customer_id"), Some("customer".into()));
/// assert_eq!(strip_key_suffix("CustomerID"), Some("customer".into()));
/// assert_eq!(strip_key_suffix("valid"), None);
/// assert_eq!(strip_key_suffix("id"), None);
/// ```
pub fn strip_key_suffix(column: &str) -> Option<String> {
    let lower = column.to_lowercase();
    KEY_SUFFIXES.iter().find_map(|suffix| {
        let prefix = lower.strip_suffix(suffix)?;
        if *suffix == "id" && !has_case_boundary(column) && prefix.chars().count() < MIN_BARE_PREFIX {
            return None;
        }
        Some(prefix.trim_end_matches('_'))
            .filter(|prefix| !prefix.is_empty())
            .map(str::to_string)
    })
}

/// `...xId` or `...xID`: a capital `I` right after a lowercase letter or digit.
fn has_case_boundary(column: &str) -> bool {
    let chars: Vec<char> = column.chars().collect();
    match chars.as_slice() {
        [.., before, 'I', 'd' | 'D'] => before.is_ascii_lowercase() || before.is_ascii_digit(),
        _ => false,
    }
}

/// Try to match `column` against `target`, whose single primary-key column
/// is `target_pk`.
pub fn match_target(column: &Column, target: &Table, target_pk: &Column) -> Option<NameMatch> {
    let column_lower = column.name.to_lowercase();
    let prefix = strip_key_suffix(&column.name);
    let table_lower = target.name.name.to_lowercase();
    let pk_lower = target_pk.name.to_lowercase();

    // A bare `id` key says nothing about which table it belongs to.
    let primary_key_name = pk_lower != "id"
        && (column_lower == pk_lower || prefix.as_deref() == Some(pk_lower.as_str()));

    let table_rule = prefix.as_deref().and_then(|p| {
        if p == table_lower {
            Some(MatchRule::ExactTableName)
        } else if is_inflection_of(p, &table_lower) {
            Some(MatchRule::InflectedTableName)
        } else {
            None
        }
    });

    match (table_rule, primary_key_name) {
        (Some(rule), pk) => Some(NameMatch {
            rule,
            primary_key_name: pk,
        }),
        (None, true) => Some(NameMatch {
            rule: MatchRule::PrimaryKeyName,
            primary_key_name: true,
        }),
        (None, false) => None,
    }
}
