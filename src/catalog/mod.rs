//! Metadata catalog contract and the in-memory reference catalog.
//!
//! The binder only talks to a catalog through [`MetadataCatalog`]. Catalog
//! entities ([`CatalogTable`], [`CatalogColumn`]) are immutable values whose
//! identity is the catalog-assigned id.

mod schema;
mod shared;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use schema::{Catalog, ColumnDef, TableSchema};
pub use shared::SharedCatalog;

/// Errors reported by a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No table matches the search keys.
    #[error("Table not found: {0}")]
    TableNotFound(SearchKeys),

    /// More than one table matches the search keys.
    #[error("Ambiguous table {keys}: {matches} matches")]
    AmbiguousTable { keys: SearchKeys, matches: usize },

    /// A table handle does not belong to this catalog.
    #[error("Unknown table id {0}")]
    UnknownTable(u32),

    /// A table with the same qualified name is already registered.
    #[error("Table '{0}' already exists")]
    DuplicateTable(String),

    /// Invalid table or column definition.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Snapshot could not be encoded, decoded, read or written.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

/// Lookup keys for a table search. Aliases are never part of the keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchKeys {
    /// Database (catalog) name.
    pub database: Option<String>,
    /// Schema name.
    pub schema: Option<String>,
    /// Table name.
    pub table: String,
}

impl SearchKeys {
    /// Keys matching any table named `table`.
    #[must_use]
    pub fn table(table: impl Into<String>) -> Self {
        SearchKeys {
            database: None,
            schema: None,
            table: table.into(),
        }
    }

    /// Restricts the search to `schema`.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Restricts the search to `database`.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Returns true if no schema or database qualifier is present.
    #[must_use]
    pub fn is_unqualified(&self) -> bool {
        self.schema.is_none() && self.database.is_none()
    }

    /// Fills absent qualifiers from the given defaults.
    #[must_use]
    pub fn or_defaults(&self, schema: Option<&str>, database: Option<&str>) -> Self {
        SearchKeys {
            database: self.database.clone().or_else(|| database.map(String::from)),
            schema: self.schema.clone().or_else(|| schema.map(String::from)),
            table: self.table.clone(),
        }
    }
}

impl fmt::Display for SearchKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(database) = &self.database {
            write!(f, "{database}.")?;
        }
        if let Some(schema) = &self.schema {
            write!(f, "{schema}.")?;
        }
        write!(f, "{}", self.table)
    }
}

/// A table known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogTable {
    /// Catalog-assigned identity.
    pub id: u32,
    pub database: String,
    pub schema: String,
    pub name: String,
}

impl CatalogTable {
    /// Fully-qualified identity `(database, schema, table)`.
    #[must_use]
    pub fn fqdn(&self) -> (&str, &str, &str) {
        (&self.database, &self.schema, &self.name)
    }
}

impl fmt::Display for CatalogTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.name)
    }
}

/// A column known to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CatalogColumn {
    /// Catalog-assigned identity.
    pub id: u32,
    /// Identity of the owning table.
    pub table_id: u32,
    pub database: String,
    pub schema: String,
    pub table: String,
    pub name: String,
    pub data_type: String,
    /// Position within the table, starting at 0.
    pub sort_order: u32,
}

impl CatalogColumn {
    /// Fully-qualified identity `(database, schema, table, column)`.
    #[must_use]
    pub fn fqdn(&self) -> (&str, &str, &str, &str) {
        (&self.database, &self.schema, &self.table, &self.name)
    }
}

impl fmt::Display for CatalogColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.database, self.schema, self.table, self.name
        )
    }
}

/// Read-only catalog contract used by the binder.
///
/// Implementations must be safe to query from several threads at once and
/// must give read-consistent answers for the duration of one binding.
pub trait MetadataCatalog: Sync {
    /// Finds exactly one table matching `keys`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::TableNotFound`] on zero matches and
    /// [`CatalogError::AmbiguousTable`] on more than one.
    fn search_table(&self, keys: &SearchKeys) -> Result<CatalogTable, CatalogError>;

    /// Returns the columns of `table` in catalog order, restricted to
    /// `column_names` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if `table` is not known to this catalog.
    fn get_columns_for_table(
        &self,
        table: &CatalogTable,
        column_names: Option<&[String]>,
    ) -> Result<Vec<CatalogColumn>, CatalogError>;
}
