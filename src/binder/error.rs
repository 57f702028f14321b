//! Binding failures.

use thiserror::Error;

use crate::catalog::{CatalogError, SearchKeys};

/// Errors that abort the binding of one statement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The statement carries no target table reference.
    #[error("Statement has no target table")]
    MissingTarget,

    /// Catalog lookup for the target table found nothing.
    #[error("Target table not found: {0}")]
    TargetTableNotFound(SearchKeys),

    /// Catalog lookup for the target table found several tables.
    #[error("Ambiguous target table {keys}: {matches} matches")]
    AmbiguousTargetTable { keys: SearchKeys, matches: usize },

    /// An explicitly named target column does not exist on the target table.
    #[error("'{column}' column is not found in target table {table}")]
    MissingTargetColumn { table: String, column: String },

    /// Catalog lookup for a source table found nothing.
    #[error("Source table not found: {0}")]
    SourceTableNotFound(SearchKeys),

    /// Catalog lookup for a source table found several tables.
    #[error("Ambiguous source table {keys}: {matches} matches")]
    AmbiguousSourceTable { keys: SearchKeys, matches: usize },

    /// A source column matched no column. `table` is None for unqualified
    /// references, which are searched in every source table.
    #[error(
        "{column} not found in {}",
        .table.as_ref().map_or_else(|| "any source table".to_string(), |t| format!("table {t}"))
    )]
    SourceColumnNotFound {
        column: String,
        table: Option<String>,
    },

    /// A source column matched more than one column.
    #[error("Ambiguous column name {column}. Multiple matches found: {}", .candidates.join(", "))]
    AmbiguousSourceColumn {
        column: String,
        candidates: Vec<String>,
    },

    /// The same alias is defined twice in one FROM scope.
    #[error("Table alias '{0}' is defined more than once")]
    DuplicateAlias(String),

    /// A qualified source column names a table that is not a source of the
    /// statement.
    #[error("{column} references {table}, which is not a source of the statement")]
    UntracedSourceColumn { column: String, table: String },

    /// A common table expression cannot be substituted.
    #[error("Unsupported common table expression '{name}': {reason}")]
    UnsupportedCte { name: String, reason: String },

    /// A column reference has no segments, a misplaced star, or too many
    /// qualifier segments.
    #[error("Invalid column reference '{0}'")]
    InvalidColumnReference(String),

    /// Catalog failure while reading columns.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl BindError {
    /// Maps a failed target table search into the target taxonomy.
    #[must_use]
    pub fn for_target(err: CatalogError) -> Self {
        match err {
            CatalogError::TableNotFound(keys) => BindError::TargetTableNotFound(keys),
            CatalogError::AmbiguousTable { keys, matches } => {
                BindError::AmbiguousTargetTable { keys, matches }
            }
            other => BindError::Catalog(other),
        }
    }

    /// Maps a failed source table search into the source taxonomy.
    #[must_use]
    pub fn for_source(err: CatalogError) -> Self {
        match err {
            CatalogError::TableNotFound(keys) => BindError::SourceTableNotFound(keys),
            CatalogError::AmbiguousTable { keys, matches } => {
                BindError::AmbiguousSourceTable { keys, matches }
            }
            other => BindError::Catalog(other),
        }
    }
}
