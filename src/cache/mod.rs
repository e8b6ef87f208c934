//! In-memory analysis cache.
//!
//! Reports are keyed by the [`Fingerprint`] of the snapshot plus options, so
//! a changed snapshot can never be served a stale report. Entries live until
//! explicitly invalidated or cleared; nothing is written to disk.
//!
//! # Example
//!
//! ```ignore
//! let cache = AnalysisCache::new();
//! let report = cache.get_or_analyze(&snapshot, &options)?;
//! let again = cache.get_or_analyze(&snapshot, &options)?; // hit
//! assert!(Arc::ptr_eq(&report, &again));
//! ```

mod hash;
pub use hash::{compute_hash, fingerprint, Fingerprint};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::analysis::{analyze, AnalysisOptions, AnalysisReport};
use crate::metadata::SchemaSnapshot;
use crate::semantic::AnalysisResult;

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Fingerprint-keyed cache of analysis reports. Safe to share across threads.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    entries: DashMap<Fingerprint, Arc<AnalysisReport>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached report for this input, analyzing on a miss.
    ///
    /// Concurrent misses on the same fingerprint may both analyze; the
    /// results are identical and the last insert wins.
    pub fn get_or_analyze(
        &self,
        snapshot: &SchemaSnapshot,
        options: &AnalysisOptions,
    ) -> AnalysisResult<Arc<AnalysisReport>> {
        let key = fingerprint(snapshot, options)?;

        if let Some(report) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(fingerprint = %key, "analysis cache hit");
            return Ok(Arc::clone(report.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!(fingerprint = %key, "analysis cache miss");
        let report = Arc::new(analyze(snapshot, options)?);
        self.entries.insert(key, Arc::clone(&report));
        Ok(report)
    }

    /// Cached report for a fingerprint, without analyzing.
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<AnalysisReport>> {
        self.entries.get(key).map(|r| Arc::clone(r.value()))
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &Fingerprint) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry for a snapshot analyzed with `options`.
    pub fn invalidate_snapshot(
        &self,
        snapshot: &SchemaSnapshot,
        options: &AnalysisOptions,
    ) -> AnalysisResult<bool> {
        Ok(self.invalidate(&fingerprint(snapshot, options)?))
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
