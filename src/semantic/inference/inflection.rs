//! Singular/plural forms for table-name matching.
//!
//! Wraps the `inflector` crate with a short list of irregular plurals that
//! show up as table names.

use inflector::Inflector;

/// Irregular plurals that inflector gets wrong or that are common in schemas.
static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("half", "halves"),
    ("analysis", "analyses"),
    ("basis", "bases"),
    ("crisis", "crises"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
];

/// Plural form of a lowercase word.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();

    if let Some((_, plural)) = IRREGULAR_PLURALS
        .iter()
        .find(|(s, p)| *s == lower || *p == lower)
    {
        return plural.to_string();
    }

    lower.to_plural()
}

/// Singular form of a lowercase word.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    let lower = word.to_lowercase();

    if let Some((singular, _)) = IRREGULAR_PLURALS
        .iter()
        .find(|(s, p)| *s == lower || *p == lower)
    {
        return singular.to_string();
    }

    lower.to_singular()
}

/// Whether `candidate` is `word` up to singular/plural normalization
/// (and is not identical to it).
pub fn is_inflection_of(word: &str, candidate: &str) -> bool {
    if word == candidate {
        return false;
    }
    pluralize(word) == candidate || singularize(word) == candidate
}
