//! Statement-kind specializations of the collecting visitor.

use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::ast::visitor::{walk_copy_stmt, walk_into_clause, Visitor};
use crate::ast::{CommonTableExpr, CopyStmt, InsertStmt, Node, RangeVar, ResTarget, SelectStmt};

use super::dml::DmlBinder;
use super::extract::StatementBodyVisitor;

/// DML statements that carry column lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DmlKind {
    /// `INSERT INTO t [(cols)] SELECT ...`
    SelectSource,
    /// `SELECT ... INTO t FROM ...`
    SelectInto,
    /// `COPY t FROM ...`
    CopyFrom,
}

impl DmlKind {
    /// Picks the specialization for a statement, or None if the statement
    /// writes no table (plain SELECT, COPY TO, non-statement nodes).
    #[must_use]
    pub fn classify(node: &Node) -> Option<DmlKind> {
        match node {
            Node::InsertStmt(_) => Some(DmlKind::SelectSource),
            Node::SelectStmt(select) if select.into_clause.is_some() => Some(DmlKind::SelectInto),
            Node::CopyStmt(copy) if copy.is_from => Some(DmlKind::CopyFrom),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DmlKind::SelectSource => "select_source",
            DmlKind::SelectInto => "select_into",
            DmlKind::CopyFrom => "copy_from",
        }
    }
}

impl fmt::Display for DmlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Walks one statement and fills a [`DmlBinder`].
///
/// Table references reached by this visitor are target references; source
/// references are gathered by [`StatementBodyVisitor`] per select body.
pub struct DmlVisitor {
    kind: DmlKind,
    binder: DmlBinder,
}

impl DmlVisitor {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: DmlKind) -> Self {
        DmlVisitor {
            kind,
            binder: DmlBinder::new(name, kind),
        }
    }

    /// Collects the references of `node` as a statement of `kind`.
    ///
    /// A node that does not match `kind` leaves the binder without a target,
    /// which [`DmlBinder::resolve`] reports.
    #[must_use]
    pub fn collect(kind: DmlKind, name: impl Into<String>, node: &Node) -> DmlBinder {
        let mut visitor = DmlVisitor::new(name, kind);
        visitor.visit(node);
        trace!(
            "Collected {} statement {}: {} source tables, {} source columns, {} CTEs",
            kind,
            visitor.binder.name(),
            visitor.binder.source_tables().len(),
            visitor.binder.source_columns().len(),
            visitor.binder.cte_names().len()
        );
        visitor.binder
    }

    fn register_select(&mut self, node: &SelectStmt) {
        for cte in &node.with_clause {
            self.visit_common_table_expr(cte);
        }
        self.binder.set_sources(StatementBodyVisitor::collect(node));
    }
}

impl Visitor for DmlVisitor {
    fn visit_insert_stmt(&mut self, node: &InsertStmt) {
        if self.kind != DmlKind::SelectSource {
            return;
        }
        self.visit_range_var(&node.relation);
        for col in &node.cols {
            self.visit_res_target(col);
        }
        for cte in &node.with_clause {
            self.visit_common_table_expr(cte);
        }
        if let Some(select) = &node.select_stmt {
            self.register_select(select);
        }
    }

    fn visit_select_stmt(&mut self, node: &SelectStmt) {
        match self.kind {
            DmlKind::SelectSource => self.register_select(node),
            DmlKind::SelectInto => {
                if let Some(into) = &node.into_clause {
                    walk_into_clause(self, into);
                }
                self.register_select(node);
            }
            DmlKind::CopyFrom => {}
        }
    }

    fn visit_copy_stmt(&mut self, node: &CopyStmt) {
        if self.kind == DmlKind::CopyFrom && node.is_from {
            walk_copy_stmt(self, node);
        }
    }

    fn visit_range_var(&mut self, node: &RangeVar) {
        trace!("Target table reference: {}", node.relname);
        self.binder.set_target_table(node);
    }

    fn visit_res_target(&mut self, node: &ResTarget) {
        if let Some(name) = &node.name {
            self.binder.push_target_column(name);
        }
    }

    fn visit_common_table_expr(&mut self, node: &CommonTableExpr) {
        if self.kind == DmlKind::CopyFrom {
            return;
        }
        self.binder
            .add_cte(&node.ctename, StatementBodyVisitor::collect(&node.ctequery));
    }
}
