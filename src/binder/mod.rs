//! Binder module for DML lineage statements.
//!
//! The binder maps the table and column references of one statement to
//! catalog entities:
//! - Target table and target columns (explicit list or all columns)
//! - Source tables, with CTE references expanded to their body's tables
//! - Projected source columns, with star expansion and ambiguity checks
//!
//! The output is a [`BindingResult`] ready for lineage construction.

mod dml;
mod error;
mod extract;
mod result;
mod scope;
mod statement;

use serde::{Deserialize, Serialize};

use crate::catalog::SearchKeys;

pub use dml::{DmlBinder, ResolvedBinder, SourceRef};
pub use error::BindError;
pub use extract::{ColumnTarget, SourceRefs, StatementBodyVisitor, UnboundColumn, UnboundTable};
pub use result::BindingResult;
pub use scope::{AliasMap, AliasTarget, BoundCte, CteRegistry, ResolvedCte};
pub use statement::{DmlKind, DmlVisitor};

/// How unqualified source columns are checked for ambiguity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmbiguityCheck {
    /// Stop at the second matching table.
    FirstDuplicate,
    /// Scan every source table and report all candidates.
    #[default]
    Exhaustive,
}

/// Configuration for binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinderConfig {
    /// Schema used for table references that carry none (default: none).
    pub default_schema: Option<String>,
    /// Database used for table references that carry none (default: none).
    pub default_database: Option<String>,
    /// Ambiguity check for unqualified columns (default: exhaustive).
    pub ambiguity_check: AmbiguityCheck,
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            default_schema: None,
            default_database: None,
            ambiguity_check: AmbiguityCheck::Exhaustive,
        }
    }
}

impl BinderConfig {
    /// Creates a new binder configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default schema.
    #[must_use]
    pub fn with_default_schema(mut self, schema: impl Into<String>) -> Self {
        self.default_schema = Some(schema.into());
        self
    }

    /// Sets the default database.
    #[must_use]
    pub fn with_default_database(mut self, database: impl Into<String>) -> Self {
        self.default_database = Some(database.into());
        self
    }

    /// Sets the ambiguity check.
    #[must_use]
    pub fn with_ambiguity_check(mut self, check: AmbiguityCheck) -> Self {
        self.ambiguity_check = check;
        self
    }

    pub(crate) fn apply_defaults(&self, keys: &SearchKeys) -> SearchKeys {
        keys.or_defaults(
            self.default_schema.as_deref(),
            self.default_database.as_deref(),
        )
    }
}
