//! Metadata input contract.
//!
//! This module defines the raw descriptors delivered by the introspection
//! collaborator and the [`SnapshotSource`] seam through which a snapshot
//! reaches the engine.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  Introspection collaborator  │  (connections, catalog queries)
//! └──────────────────────────────┘
//!                │  SchemaSnapshot (JSON or in-memory)
//!                ▼
//! ┌──────────────────────────────┐
//! │        SnapshotSource        │  - JsonSnapshotFile
//! │                              │  - SchemaSnapshot (itself)
//! └──────────────────────────────┘
//!                │
//!                ▼
//!        model::normalize()
//! ```
//!
//! # Example
//!
//! ```ignore
//! use schemasight::metadata::{JsonSnapshotFile, SnapshotSource};
//!
//! let snapshot = JsonSnapshotFile::new("./snapshot.json").load_snapshot()?;
//! ```

mod provider;
mod types;

pub use provider::{JsonSnapshotFile, MetadataResult, SnapshotError, SnapshotSource};
pub use types::*;
