//! Content hashing for cache keys.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::analysis::AnalysisOptions;
use crate::metadata::SchemaSnapshot;

/// SHA-256 fingerprint of an analysis input, as 64 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compute SHA256 hash of a serializable value.
///
/// The value is serialized to JSON before hashing, so struct field order
/// fixes the byte stream.
///
/// # Errors
/// Returns an error if the value cannot be serialized to JSON.
pub fn compute_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(value)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Fingerprint a snapshot together with the options it is analyzed with.
///
/// Table order is part of the fingerprint: it changes render order.
pub fn fingerprint(
    snapshot: &SchemaSnapshot,
    options: &AnalysisOptions,
) -> Result<Fingerprint, serde_json::Error> {
    #[derive(Serialize)]
    struct Input<'a> {
        snapshot: &'a SchemaSnapshot,
        options: &'a AnalysisOptions,
    }
    compute_hash(&Input { snapshot, options }).map(Fingerprint)
}
