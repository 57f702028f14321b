//! Bound lineage record of one statement.

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogColumn, CatalogTable};

/// Column-level binding of one DML statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingResult {
    target_table: CatalogTable,
    target_columns: Vec<CatalogColumn>,
    /// Deduplicated by identity, in first-reference order.
    source_tables: Vec<CatalogTable>,
    source_columns: Vec<CatalogColumn>,
}

impl BindingResult {
    pub(crate) fn new(
        target_table: CatalogTable,
        target_columns: Vec<CatalogColumn>,
        source_tables: Vec<CatalogTable>,
        source_columns: Vec<CatalogColumn>,
    ) -> Self {
        BindingResult {
            target_table,
            target_columns,
            source_tables,
            source_columns,
        }
    }

    #[must_use]
    pub fn target_table(&self) -> &CatalogTable {
        &self.target_table
    }

    #[must_use]
    pub fn target_columns(&self) -> &[CatalogColumn] {
        &self.target_columns
    }

    #[must_use]
    pub fn source_tables(&self) -> &[CatalogTable] {
        &self.source_tables
    }

    #[must_use]
    pub fn source_columns(&self) -> &[CatalogColumn] {
        &self.source_columns
    }

    /// Returns false for statements that read no table, such as COPY FROM.
    #[must_use]
    pub fn has_sources(&self) -> bool {
        !self.source_tables.is_empty()
    }
}
