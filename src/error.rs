//! Error types for lineage binding.

use thiserror::Error;

pub use crate::binder::BindError;
pub use crate::catalog::CatalogError;

/// Result type alias using [`LineageError`].
pub type Result<T> = std::result::Result<T, LineageError>;

/// Crate-level error.
#[derive(Debug, Error)]
pub enum LineageError {
    /// Name resolution failed for a statement.
    #[error("Bind error: {0}")]
    Bind(#[from] BindError),

    /// Catalog failure outside of a binding.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Source and target columns of a binding cannot be paired into edges.
    #[error("Lineage mismatch: {sources} source columns for {targets} target columns")]
    LineageMismatch { sources: usize, targets: usize },

    /// Lineage graph could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
