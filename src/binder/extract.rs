//! Catalog-free extraction of unbound references from syntax nodes.

use std::fmt;

use crate::ast::visitor::Visitor;
use crate::ast::{ColumnField, ColumnRef, JoinExpr, RangeSubselect, RangeVar, SelectStmt};
use crate::catalog::SearchKeys;

use super::error::BindError;

/// Table reference extracted from a [`RangeVar`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnboundTable {
    database: Option<String>,
    schema: Option<String>,
    name: String,
    alias: Option<String>,
}

impl UnboundTable {
    #[must_use]
    pub fn from_range_var(node: &RangeVar) -> Self {
        UnboundTable {
            database: node.catalogname.clone(),
            schema: node.schemaname.clone(),
            name: node.relname.clone(),
            alias: node.alias.clone(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Catalog lookup keys. The alias is not part of them.
    #[must_use]
    pub fn search_keys(&self) -> SearchKeys {
        SearchKeys {
            database: self.database.clone(),
            schema: self.schema.clone(),
            table: self.name.clone(),
        }
    }

    /// Pre-catalog identity `(schema, name)`.
    #[must_use]
    pub fn fqdn(&self) -> (Option<&str>, &str) {
        (self.schema.as_deref(), &self.name)
    }

    /// Returns true if neither schema nor database was written.
    #[must_use]
    pub fn is_unqualified(&self) -> bool {
        self.schema.is_none() && self.database.is_none()
    }
}

/// What a column reference selects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnTarget {
    Named(String),
    Star,
}

/// Column reference extracted from a [`ColumnRef`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnboundColumn {
    qualifier: Vec<String>,
    target: ColumnTarget,
}

impl UnboundColumn {
    /// Splits `node` into qualifier segments and the selected column.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::InvalidColumnReference`] if the reference is empty
    /// or a star appears before the last segment.
    pub fn from_column_ref(node: &ColumnRef) -> Result<Self, BindError> {
        let invalid = || BindError::InvalidColumnReference(render_fields(&node.fields));

        let (last, leading) = node.fields.split_last().ok_or_else(invalid)?;
        let qualifier = leading
            .iter()
            .map(|field| match field {
                ColumnField::Name(name) => Ok(name.clone()),
                ColumnField::Star => Err(invalid()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let target = match last {
            ColumnField::Name(name) => ColumnTarget::Named(name.clone()),
            ColumnField::Star => ColumnTarget::Star,
        };

        Ok(UnboundColumn { qualifier, target })
    }

    /// Name segments: `[column]` or `[qualifier.., column]`, a star shown as `*`.
    #[must_use]
    pub fn name(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.qualifier.iter().map(String::as_str).collect();
        segments.push(match &self.target {
            ColumnTarget::Named(name) => name.as_str(),
            ColumnTarget::Star => "*",
        });
        segments
    }

    #[must_use]
    pub fn qualifier(&self) -> &[String] {
        &self.qualifier
    }

    #[must_use]
    pub fn target(&self) -> &ColumnTarget {
        &self.target
    }

    #[must_use]
    pub fn is_qualified(&self) -> bool {
        !self.qualifier.is_empty()
    }

    #[must_use]
    pub fn is_star(&self) -> bool {
        self.target == ColumnTarget::Star
    }
}

impl fmt::Display for UnboundColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name().join("."))
    }
}

fn render_fields(fields: &[ColumnField]) -> String {
    fields
        .iter()
        .map(|field| match field {
            ColumnField::Name(name) => name.as_str(),
            ColumnField::Star => "*",
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Unbound references reachable from one select body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceRefs {
    /// Table references in FROM items, joins and FROM subqueries.
    pub tables: Vec<RangeVar>,
    /// Column references in the projected target list.
    pub columns: Vec<ColumnRef>,
}

/// Collects the source tables and projected columns of a select body.
///
/// WHERE predicates, join conditions and the body's own WITH list are not
/// walked: they do not contribute projected lineage, and CTEs are registered
/// by the statement visitor.
///
/// Tables inside a FROM subquery are collected without their alias, since
/// those aliases are only visible inside the subquery.
#[derive(Debug, Default)]
pub struct StatementBodyVisitor {
    refs: SourceRefs,
    /// Nesting level of FROM subqueries.
    depth: usize,
}

impl StatementBodyVisitor {
    /// Walks `body` once and returns what it references.
    #[must_use]
    pub fn collect(body: &SelectStmt) -> SourceRefs {
        let mut visitor = StatementBodyVisitor::default();
        visitor.visit_select_stmt(body);
        visitor.refs
    }
}

impl Visitor for StatementBodyVisitor {
    fn visit_select_stmt(&mut self, node: &SelectStmt) {
        for target in &node.target_list {
            self.visit_res_target(target);
        }
        for item in &node.from_clause {
            self.visit(item);
        }
    }

    fn visit_range_var(&mut self, node: &RangeVar) {
        let mut table = node.clone();
        if self.depth > 0 {
            table.alias = None;
        }
        self.refs.tables.push(table);
    }

    fn visit_range_subselect(&mut self, node: &RangeSubselect) {
        // Only the subquery's sources; its projections are internal to it.
        self.depth += 1;
        for item in &node.subquery.from_clause {
            self.visit(item);
        }
        self.depth -= 1;
    }

    fn visit_join_expr(&mut self, node: &JoinExpr) {
        self.visit(&node.larg);
        self.visit(&node.rarg);
    }

    fn visit_column_ref(&mut self, node: &ColumnRef) {
        self.refs.columns.push(node.clone());
    }
}
