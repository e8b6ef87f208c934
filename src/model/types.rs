//! Semantic data-type categories.
//!
//! Free-form database type strings are mapped once, at the normalizer
//! boundary, into a closed set of categories. Everything downstream compares
//! categories, never raw strings.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Semantic category of a column's declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataCategory {
    Integer,
    Text,
    Numeric,
    Temporal,
    Boolean,
    Other,
}

/// Known type names and their category.
///
/// Types listed as `Other` are recognized (no warning) but carry no
/// type-aware semantics.
static TYPE_CATEGORIES: &[(&str, DataCategory)] = &[
    // Integers
    ("smallint", DataCategory::Integer),
    ("integer", DataCategory::Integer),
    ("int", DataCategory::Integer),
    ("int2", DataCategory::Integer),
    ("int4", DataCategory::Integer),
    ("int8", DataCategory::Integer),
    ("bigint", DataCategory::Integer),
    ("tinyint", DataCategory::Integer),
    ("mediumint", DataCategory::Integer),
    ("smallserial", DataCategory::Integer),
    ("serial", DataCategory::Integer),
    ("serial4", DataCategory::Integer),
    ("bigserial", DataCategory::Integer),
    ("serial8", DataCategory::Integer),
    // Exact and approximate numerics
    ("numeric", DataCategory::Numeric),
    ("decimal", DataCategory::Numeric),
    ("real", DataCategory::Numeric),
    ("float", DataCategory::Numeric),
    ("float4", DataCategory::Numeric),
    ("float8", DataCategory::Numeric),
    ("double", DataCategory::Numeric),
    ("double precision", DataCategory::Numeric),
    ("money", DataCategory::Numeric),
    // Text
    ("text", DataCategory::Text),
    ("varchar", DataCategory::Text),
    ("character varying", DataCategory::Text),
    ("char", DataCategory::Text),
    ("character", DataCategory::Text),
    ("bpchar", DataCategory::Text),
    ("nchar", DataCategory::Text),
    ("nvarchar", DataCategory::Text),
    ("citext", DataCategory::Text),
    ("name", DataCategory::Text),
    ("string", DataCategory::Text),
    ("clob", DataCategory::Text),
    // Temporal
    ("date", DataCategory::Temporal),
    ("time", DataCategory::Temporal),
    ("timetz", DataCategory::Temporal),
    ("time without time zone", DataCategory::Temporal),
    ("time with time zone", DataCategory::Temporal),
    ("timestamp", DataCategory::Temporal),
    ("timestamptz", DataCategory::Temporal),
    ("timestamp without time zone", DataCategory::Temporal),
    ("timestamp with time zone", DataCategory::Temporal),
    ("datetime", DataCategory::Temporal),
    ("datetime2", DataCategory::Temporal),
    ("smalldatetime", DataCategory::Temporal),
    ("interval", DataCategory::Temporal),
    ("year", DataCategory::Temporal),
    // Boolean
    ("boolean", DataCategory::Boolean),
    ("bool", DataCategory::Boolean),
    ("bit", DataCategory::Boolean),
    // Recognized, no semantics
    ("uuid", DataCategory::Other),
    ("uniqueidentifier", DataCategory::Other),
    ("json", DataCategory::Other),
    ("jsonb", DataCategory::Other),
    ("xml", DataCategory::Other),
    ("bytea", DataCategory::Other),
    ("blob", DataCategory::Other),
    ("binary", DataCategory::Other),
    ("varbinary", DataCategory::Other),
    ("inet", DataCategory::Other),
    ("cidr", DataCategory::Other),
    ("macaddr", DataCategory::Other),
    ("tsvector", DataCategory::Other),
    ("array", DataCategory::Other),
    ("user-defined", DataCategory::Other),
];

/// Type modifiers such as `(255)` or `(10, 2)`.
static TYPE_MODIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("type modifier pattern is valid"));

impl DataCategory {
    /// Classify a declared type string.
    ///
    /// Returns `None` when the type is not in the lookup table; callers
    /// default to [`DataCategory::Other`] and record a warning.
    pub fn classify(declared: &str) -> Option<Self> {
        let normalized = normalize_type_name(declared);
        if normalized.ends_with("[]") {
            return Some(Self::Other);
        }
        let normalized = normalized.trim_end_matches(" unsigned");

        TYPE_CATEGORIES
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, category)| *category)
    }

    /// Classify a declared type string, falling back to `Other`.
    pub fn from_declared(declared: &str) -> Self {
        Self::classify(declared).unwrap_or(Self::Other)
    }

    /// Lowercase name used in rendered output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Numeric => "numeric",
            Self::Temporal => "temporal",
            Self::Boolean => "boolean",
            Self::Other => "other",
        }
    }

    /// Whether two categories can back the same relationship.
    ///
    /// Returns `None` when either side is `Other`: no type-aware judgement
    /// is possible.
    pub fn compatible_with(&self, other: &Self) -> Option<bool> {
        if *self == Self::Other || *other == Self::Other {
            None
        } else {
            Some(self == other)
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercase, drop modifiers and collapse whitespace.
fn normalize_type_name(declared: &str) -> String {
    let lower = declared.trim().to_lowercase();
    let stripped = TYPE_MODIFIER.replace_all(&lower, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
