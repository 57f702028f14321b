//! lineage-binder - column-level lineage for SQL DML statements
//!
//! Binds the table and column references of INSERT ... SELECT, SELECT ... INTO
//! and COPY ... FROM statements to a metadata catalog, and turns the bindings
//! into lineage edges.

pub mod ast;
pub mod binder;
pub mod catalog;
pub mod error;
pub mod lineage;

use log::{debug, warn};
use rayon::prelude::*;

pub use binder::{
    AmbiguityCheck, BindError, BinderConfig, BindingResult, DmlBinder, DmlKind, DmlVisitor,
    ResolvedBinder,
};
pub use catalog::{
    Catalog, CatalogColumn, CatalogError, CatalogTable, MetadataCatalog, SearchKeys, SharedCatalog,
};
pub use error::{LineageError, Result};
pub use lineage::{ColumnLineage, JobExecution, LineageEdge, LineageGraph};

use ast::Node;

/// Binds one statement.
///
/// Returns `Ok(None)` for statements that write no table, such as a plain
/// SELECT or COPY ... TO.
///
/// # Errors
///
/// Returns an error if any reference of the statement cannot be bound.
pub fn bind_statement<C>(
    name: &str,
    node: &Node,
    catalog: &C,
    config: &BinderConfig,
) -> Result<Option<BindingResult>>
where
    C: MetadataCatalog + ?Sized,
{
    let Some(kind) = DmlKind::classify(node) else {
        debug!("Skipping statement {name}: no lineage");
        return Ok(None);
    };

    let binder = DmlVisitor::collect(kind, name, node);
    let resolved = binder.resolve()?;
    let result = resolved.bind_with_config(catalog, config)?;
    debug!(
        "Bound {kind} statement {name}: {} source tables, {} source columns",
        result.source_tables().len(),
        result.source_columns().len()
    );
    Ok(Some(result))
}

/// Binds many statements in parallel, one result per statement in input
/// order. A failing statement does not stop the others.
pub fn bind_statements<C, S>(
    statements: &[(S, Node)],
    catalog: &C,
    config: &BinderConfig,
) -> Vec<Result<Option<BindingResult>>>
where
    C: MetadataCatalog + ?Sized,
    S: AsRef<str> + Sync,
{
    statements
        .par_iter()
        .map(|(name, node)| {
            let name = name.as_ref();
            let result = bind_statement(name, node, catalog, config);
            if let Err(err) = &result {
                warn!("Failed to bind statement {name}: {err}");
            }
            result
        })
        .collect()
}
