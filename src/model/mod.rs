//! Canonical schema model.
//!
//! Tables, columns and declared foreign keys as produced by the
//! [`normalize`] stage. The model is immutable after construction; later
//! stages derive new views from it rather than modifying it.

mod normalize;
mod table;
mod types;

pub use normalize::{normalize, NormalizedSchema};
pub use table::{Column, DeclaredForeignKey, QualifiedName, SchemaModel, Table};
pub use types::DataCategory;
