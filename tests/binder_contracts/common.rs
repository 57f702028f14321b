//! Shared fixtures for binder contract tests.

use lineage_binder::ast::Node;
use lineage_binder::binder::{BindError, BinderConfig, BindingResult, DmlKind, DmlVisitor};
use lineage_binder::catalog::{
    Catalog, CatalogColumn, CatalogError, CatalogTable, ColumnDef, MetadataCatalog, SearchKeys,
    TableSchema,
};
use parking_lot::Mutex;

/// Creates the warehouse catalog used by every contract.
///
/// `events` exists in two schemas so that unqualified lookups of it are
/// ambiguous.
pub fn create_test_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    let tables: &[(&str, &str, &[&str])] = &[
        ("public", "orders", &["id", "customer_id", "amount", "created_at"]),
        ("public", "customers", &["id", "name", "email"]),
        ("public", "customer_orders", &["name", "amount"]),
        ("public", "daily_totals", &["day", "total"]),
        ("public", "a", &["x", "y"]),
        ("public", "b", &["x", "z"]),
        ("public", "c", &["x", "w"]),
        ("public", "t", &["col", "other"]),
        ("public", "imports", &["id", "line"]),
        ("public", "events", &["id", "payload"]),
        ("audit", "events", &["id", "actor"]),
        ("staging", "raw_orders", &["id", "amount"]),
    ];
    for (schema, name, columns) in tables {
        let columns = columns
            .iter()
            .map(|c| ColumnDef::new(*c, "text").unwrap())
            .collect();
        catalog
            .create_table(TableSchema::new("warehouse", *schema, *name, columns).unwrap())
            .unwrap();
    }
    catalog
}

/// Collects, resolves and binds `node` with the default configuration.
pub fn bind(node: &Node, catalog: &dyn MetadataCatalog) -> Result<BindingResult, BindError> {
    bind_with(node, catalog, &BinderConfig::default())
}

pub fn bind_with(
    node: &Node,
    catalog: &dyn MetadataCatalog,
    config: &BinderConfig,
) -> Result<BindingResult, BindError> {
    let kind = DmlKind::classify(node).expect("statement carries lineage");
    DmlVisitor::collect(kind, "contract", node)
        .resolve()?
        .bind_with_config(catalog, config)
}

/// `table.column` for each column.
pub fn names(columns: &[CatalogColumn]) -> Vec<String> {
    columns
        .iter()
        .map(|c| format!("{}.{}", c.table, c.name))
        .collect()
}

pub fn table_names(tables: &[CatalogTable]) -> Vec<String> {
    tables
        .iter()
        .map(|t| format!("{}.{}", t.schema, t.name))
        .collect()
}

/// Records every table search before delegating.
pub struct RecordingCatalog<'a> {
    inner: &'a Catalog,
    searches: Mutex<Vec<SearchKeys>>,
}

impl<'a> RecordingCatalog<'a> {
    pub fn new(inner: &'a Catalog) -> Self {
        RecordingCatalog {
            inner,
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn searched_tables(&self) -> Vec<String> {
        self.searches.lock().iter().map(|k| k.table.clone()).collect()
    }
}

impl MetadataCatalog for RecordingCatalog<'_> {
    fn search_table(&self, keys: &SearchKeys) -> Result<CatalogTable, CatalogError> {
        self.searches.lock().push(keys.clone());
        self.inner.search_table(keys)
    }

    fn get_columns_for_table(
        &self,
        table: &CatalogTable,
        column_names: Option<&[String]>,
    ) -> Result<Vec<CatalogColumn>, CatalogError> {
        self.inner.get_columns_for_table(table, column_names)
    }
}
