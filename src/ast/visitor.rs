//! Tree walker over [`Node`].
//!
//! [`Visitor::visit`] dispatches on the node kind. Every `visit_*` handler
//! defaults to the matching `walk_*` function, which recurses into the node's
//! children. A visitor that overrides a handler takes over that subtree: the
//! children are only visited if the override calls `walk_*` (or visits them
//! one by one) itself. Statement handlers rely on this to stop descent at the
//! scope boundary they own.

use super::{
    AExpr, ColumnRef, CommonTableExpr, Constant, CopyStmt, FuncCall, InsertStmt, IntoClause,
    JoinExpr, Node, RangeSubselect, RangeVar, ResTarget, SelectStmt,
};

/// Kind-dispatching visitor with default child traversal.
pub trait Visitor {
    /// Dispatches `node` to the handler for its kind.
    fn visit(&mut self, node: &Node) {
        match node {
            Node::InsertStmt(n) => self.visit_insert_stmt(n),
            Node::SelectStmt(n) => self.visit_select_stmt(n),
            Node::CopyStmt(n) => self.visit_copy_stmt(n),
            Node::RangeVar(n) => self.visit_range_var(n),
            Node::RangeSubselect(n) => self.visit_range_subselect(n),
            Node::JoinExpr(n) => self.visit_join_expr(n),
            Node::ColumnRef(n) => self.visit_column_ref(n),
            Node::ResTarget(n) => self.visit_res_target(n),
            Node::CommonTableExpr(n) => self.visit_common_table_expr(n),
            Node::IntoClause(n) => self.visit_into_clause(n),
            Node::FuncCall(n) => self.visit_func_call(n),
            Node::AExpr(n) => self.visit_a_expr(n),
            Node::Constant(n) => self.visit_constant(n),
        }
    }

    fn visit_insert_stmt(&mut self, node: &InsertStmt) {
        walk_insert_stmt(self, node);
    }

    fn visit_select_stmt(&mut self, node: &SelectStmt) {
        walk_select_stmt(self, node);
    }

    fn visit_copy_stmt(&mut self, node: &CopyStmt) {
        walk_copy_stmt(self, node);
    }

    fn visit_range_var(&mut self, _node: &RangeVar) {}

    fn visit_range_subselect(&mut self, node: &RangeSubselect) {
        walk_range_subselect(self, node);
    }

    fn visit_join_expr(&mut self, node: &JoinExpr) {
        walk_join_expr(self, node);
    }

    fn visit_column_ref(&mut self, _node: &ColumnRef) {}

    fn visit_res_target(&mut self, node: &ResTarget) {
        walk_res_target(self, node);
    }

    fn visit_common_table_expr(&mut self, node: &CommonTableExpr) {
        walk_common_table_expr(self, node);
    }

    fn visit_into_clause(&mut self, node: &IntoClause) {
        walk_into_clause(self, node);
    }

    fn visit_func_call(&mut self, node: &FuncCall) {
        walk_func_call(self, node);
    }

    fn visit_a_expr(&mut self, node: &AExpr) {
        walk_a_expr(self, node);
    }

    fn visit_constant(&mut self, _node: &Constant) {}
}

pub fn walk_insert_stmt<V: Visitor + ?Sized>(visitor: &mut V, node: &InsertStmt) {
    visitor.visit_range_var(&node.relation);
    for col in &node.cols {
        visitor.visit_res_target(col);
    }
    if let Some(select) = &node.select_stmt {
        visitor.visit_select_stmt(select);
    }
    for cte in &node.with_clause {
        visitor.visit_common_table_expr(cte);
    }
}

pub fn walk_select_stmt<V: Visitor + ?Sized>(visitor: &mut V, node: &SelectStmt) {
    for target in &node.target_list {
        visitor.visit_res_target(target);
    }
    if let Some(into) = &node.into_clause {
        visitor.visit_into_clause(into);
    }
    for item in &node.from_clause {
        visitor.visit(item);
    }
    if let Some(predicate) = &node.where_clause {
        visitor.visit(predicate);
    }
    for cte in &node.with_clause {
        visitor.visit_common_table_expr(cte);
    }
}

pub fn walk_copy_stmt<V: Visitor + ?Sized>(visitor: &mut V, node: &CopyStmt) {
    if let Some(relation) = &node.relation {
        visitor.visit_range_var(relation);
    }
    if let Some(query) = &node.query {
        visitor.visit_select_stmt(query);
    }
}

pub fn walk_range_subselect<V: Visitor + ?Sized>(visitor: &mut V, node: &RangeSubselect) {
    visitor.visit_select_stmt(&node.subquery);
}

pub fn walk_join_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &JoinExpr) {
    visitor.visit(&node.larg);
    visitor.visit(&node.rarg);
    if let Some(quals) = &node.quals {
        visitor.visit(quals);
    }
}

pub fn walk_res_target<V: Visitor + ?Sized>(visitor: &mut V, node: &ResTarget) {
    if let Some(val) = &node.val {
        visitor.visit(val);
    }
}

pub fn walk_common_table_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &CommonTableExpr) {
    visitor.visit_select_stmt(&node.ctequery);
}

pub fn walk_into_clause<V: Visitor + ?Sized>(visitor: &mut V, node: &IntoClause) {
    visitor.visit_range_var(&node.rel);
}

pub fn walk_func_call<V: Visitor + ?Sized>(visitor: &mut V, node: &FuncCall) {
    for arg in &node.args {
        visitor.visit(arg);
    }
}

pub fn walk_a_expr<V: Visitor + ?Sized>(visitor: &mut V, node: &AExpr) {
    if let Some(lexpr) = &node.lexpr {
        visitor.visit(lexpr);
    }
    if let Some(rexpr) = &node.rexpr {
        visitor.visit(rexpr);
    }
}
