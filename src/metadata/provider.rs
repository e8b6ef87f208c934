//! Snapshot sources.
//!
//! The engine never talks to a database. Whatever collects the metadata
//! hands it over through [`SnapshotSource`], which lets the CLI read a JSON
//! dump while library callers pass an in-memory snapshot.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::SchemaSnapshot;

/// Errors raised while obtaining a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for snapshot loading.
pub type MetadataResult<T> = Result<T, SnapshotError>;

/// Anything that can produce a complete metadata snapshot.
pub trait SnapshotSource {
    /// Produce the snapshot. Each call yields an independent value.
    fn load_snapshot(&self) -> MetadataResult<SchemaSnapshot>;
}

impl SnapshotSource for SchemaSnapshot {
    fn load_snapshot(&self) -> MetadataResult<SchemaSnapshot> {
        Ok(self.clone())
    }
}

/// A snapshot stored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    /// Point at a JSON snapshot file.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for JsonSnapshotFile {
    fn load_snapshot(&self) -> MetadataResult<SchemaSnapshot> {
        let content = fs::read_to_string(&self.path).map_err(|source| SnapshotError::Io {
            path: self.path.clone(),
            source,
        })?;
        let snapshot = SchemaSnapshot::from_json(&content)?;
        debug!(
            path = %self.path.display(),
            tables = snapshot.tables.len(),
            "loaded schema snapshot"
        );
        Ok(snapshot)
    }
}
