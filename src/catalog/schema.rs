//! In-memory catalog of databases, schemas, tables and columns.

use std::collections::HashSet;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{CatalogColumn, CatalogError, CatalogTable, MetadataCatalog, SearchKeys};

/// Central registry of all table schemas known to the binder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Table schemas in registration order.
    tables: Vec<TableSchema>,
    /// Next table ID for auto-increment.
    #[serde(default)]
    next_table_id: u32,
    /// Next column ID for auto-increment.
    #[serde(default)]
    next_column_id: u32,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Catalog {
            tables: Vec::new(),
            next_table_id: 0,
            next_column_id: 0,
        }
    }

    fn next_table_id(&mut self) -> u32 {
        let id = self.next_table_id;
        self.next_table_id += 1;
        id
    }

    fn next_column_id(&mut self) -> u32 {
        let id = self.next_column_id;
        self.next_column_id += 1;
        id
    }

    /// Registers a table schema and assigns table and column ids.
    ///
    /// # Errors
    ///
    /// Returns an error if a table with the same database, schema and name
    /// already exists.
    pub fn create_table(&mut self, mut schema: TableSchema) -> Result<CatalogTable, CatalogError> {
        if self
            .get_table(&schema.database, &schema.schema, &schema.name)
            .is_some()
        {
            return Err(CatalogError::DuplicateTable(schema.qualified_name()));
        }

        schema.table_id = self.next_table_id();
        for column in &mut schema.columns {
            column.column_id = self.next_column_id();
        }

        let table = schema.to_catalog_table();
        debug!("Registered table {table} with {} columns", schema.columns.len());
        self.tables.push(schema);
        Ok(table)
    }

    /// Retrieves a table schema by its qualified name.
    #[must_use]
    pub fn get_table(&self, database: &str, schema: &str, name: &str) -> Option<&TableSchema> {
        self.tables
            .iter()
            .find(|t| t.database == database && t.schema == schema && t.name == name)
    }

    /// Retrieves a table schema by its ID.
    #[must_use]
    pub fn get_table_by_id(&self, table_id: u32) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.table_id == table_id)
    }

    /// Checks if a table exists in the catalog.
    #[must_use]
    pub fn table_exists(&self, database: &str, schema: &str, name: &str) -> bool {
        self.get_table(database, schema, name).is_some()
    }

    /// Returns all tables as catalog entities, in registration order.
    #[must_use]
    pub fn tables(&self) -> Vec<CatalogTable> {
        self.tables.iter().map(TableSchema::to_catalog_table).collect()
    }

    /// Returns the number of registered tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if no table is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Serializes the catalog to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>, CatalogError> {
        bincode::serialize(self)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to serialize catalog: {e}")))
    }

    /// Deserializes a catalog from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self, CatalogError> {
        bincode::deserialize(data)
            .map_err(|e| CatalogError::Snapshot(format!("Failed to deserialize catalog: {e}")))
    }

    /// Writes a snapshot of the catalog to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let bytes = self.serialize()?;
        std::fs::write(path, bytes).map_err(|e| {
            CatalogError::Snapshot(format!("Failed to write {}: {e}", path.display()))
        })
    }

    /// Reads a catalog snapshot from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let bytes = std::fs::read(path).map_err(|e| {
            CatalogError::Snapshot(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::deserialize(&bytes)
    }
}

impl MetadataCatalog for Catalog {
    fn search_table(&self, keys: &SearchKeys) -> Result<CatalogTable, CatalogError> {
        let mut matches = self.tables.iter().filter(|t| t.matches(keys));
        match (matches.next(), matches.next()) {
            (Some(table), None) => Ok(table.to_catalog_table()),
            (None, _) => Err(CatalogError::TableNotFound(keys.clone())),
            (Some(_), Some(_)) => Err(CatalogError::AmbiguousTable {
                keys: keys.clone(),
                matches: 2 + matches.count(),
            }),
        }
    }

    fn get_columns_for_table(
        &self,
        table: &CatalogTable,
        column_names: Option<&[String]>,
    ) -> Result<Vec<CatalogColumn>, CatalogError> {
        // Ids are only unique within one catalog, so a handle from another
        // snapshot must also match by name.
        let schema = self
            .get_table_by_id(table.id)
            .filter(|schema| schema.is(table))
            .ok_or(CatalogError::UnknownTable(table.id))?;

        Ok(schema
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| column_names.map_or(true, |names| names.contains(&c.name)))
            .map(|(position, c)| schema.to_catalog_column(c, position as u32))
            .collect())
    }
}

/// Schema definition for a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// Internal table ID.
    pub table_id: u32,
    /// Database (source) name.
    pub database: String,
    /// Schema name.
    pub schema: String,
    /// Table name.
    pub name: String,
    /// Ordered list of column definitions.
    pub columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Creates a new table schema with validation.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is empty or column names are duplicated.
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: Vec<ColumnDef>,
    ) -> Result<Self, CatalogError> {
        let schema = TableSchema {
            table_id: 0, // Will be set by catalog
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
            columns,
        };
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.database.is_empty() || self.schema.is_empty() || self.name.is_empty() {
            return Err(CatalogError::Schema(format!(
                "Table name parts cannot be empty: '{}'",
                self.qualified_name()
            )));
        }

        let mut seen = HashSet::new();
        for col in &self.columns {
            if !seen.insert(&col.name) {
                return Err(CatalogError::Schema(format!(
                    "Duplicate column name '{}' in table '{}'",
                    col.name,
                    self.qualified_name()
                )));
            }
        }

        Ok(())
    }

    /// Returns `database.schema.name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.name)
    }

    /// Finds a column definition by name.
    #[must_use]
    pub fn get_column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn matches(&self, keys: &SearchKeys) -> bool {
        self.name == keys.table
            && keys.schema.as_ref().map_or(true, |s| *s == self.schema)
            && keys.database.as_ref().map_or(true, |d| *d == self.database)
    }

    fn is(&self, table: &CatalogTable) -> bool {
        self.database == table.database && self.schema == table.schema && self.name == table.name
    }

    fn to_catalog_table(&self) -> CatalogTable {
        CatalogTable {
            id: self.table_id,
            database: self.database.clone(),
            schema: self.schema.clone(),
            name: self.name.clone(),
        }
    }

    fn to_catalog_column(&self, column: &ColumnDef, position: u32) -> CatalogColumn {
        CatalogColumn {
            id: column.column_id,
            table_id: self.table_id,
            database: self.database.clone(),
            schema: self.schema.clone(),
            table: self.name.clone(),
            name: column.name.clone(),
            data_type: column.data_type.clone(),
            sort_order: position,
        }
    }
}

/// Definition of a single column in a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Internal column ID.
    pub column_id: u32,
    /// Column name.
    pub name: String,
    /// Column data type as reported by the source system.
    pub data_type: String,
}

impl ColumnDef {
    /// Creates a new column definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the column name is empty.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Result<Self, CatalogError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CatalogError::Schema("Column name cannot be empty".into()));
        }
        Ok(ColumnDef {
            column_id: 0, // Will be set by catalog
            name,
            data_type: data_type.into(),
        })
    }
}
