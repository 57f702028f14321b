//! Syntax tree node definitions for DML statements.
//!
//! The tree is produced by an external SQL parser and is read-only to the
//! binder. Only the node kinds and fields the binder consumes are modeled;
//! the kind set is closed and matched exhaustively by [`visitor::Visitor`].

pub mod visitor;

pub use visitor::Visitor;

/// A syntax tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// `INSERT INTO ... [SELECT ...]`.
    InsertStmt(InsertStmt),
    /// `SELECT ...`, optionally with an `INTO` clause.
    SelectStmt(SelectStmt),
    /// `COPY ... FROM | TO ...`.
    CopyStmt(CopyStmt),
    /// Table reference.
    RangeVar(RangeVar),
    /// Subquery in a FROM clause.
    RangeSubselect(RangeSubselect),
    /// Join between two FROM items.
    JoinExpr(JoinExpr),
    /// Column reference.
    ColumnRef(ColumnRef),
    /// Target item of a select list or an insert column list.
    ResTarget(ResTarget),
    /// Named subquery of a WITH clause.
    CommonTableExpr(CommonTableExpr),
    /// `INTO` clause of a SELECT.
    IntoClause(IntoClause),
    /// Function call.
    FuncCall(FuncCall),
    /// Operator expression.
    AExpr(AExpr),
    /// Literal constant.
    Constant(Constant),
}

/// `INSERT INTO relation [(cols)] select_stmt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStmt {
    /// Target relation.
    pub relation: RangeVar,
    /// Explicit target columns (empty means all columns).
    pub cols: Vec<ResTarget>,
    /// Source query (None for `DEFAULT VALUES`).
    pub select_stmt: Option<Box<SelectStmt>>,
    /// `WITH` list written before `INSERT`.
    pub with_clause: Vec<CommonTableExpr>,
}

impl InsertStmt {
    /// Creates an insert into `relation` with no columns and no query.
    #[must_use]
    pub fn new(relation: RangeVar) -> Self {
        InsertStmt {
            relation,
            cols: Vec::new(),
            select_stmt: None,
            with_clause: Vec::new(),
        }
    }

    /// Sets the explicit target column list.
    #[must_use]
    pub fn with_columns<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cols = cols.into_iter().map(ResTarget::name).collect();
        self
    }

    /// Sets the source query.
    #[must_use]
    pub fn with_select(mut self, select: SelectStmt) -> Self {
        self.select_stmt = Some(Box::new(select));
        self
    }

    /// Appends a common table expression to the `WITH` list.
    #[must_use]
    pub fn with_cte(mut self, cte: CommonTableExpr) -> Self {
        self.with_clause.push(cte);
        self
    }
}

impl From<InsertStmt> for Node {
    fn from(stmt: InsertStmt) -> Self {
        Node::InsertStmt(stmt)
    }
}

/// `SELECT target_list [INTO into_clause] FROM from_clause [WHERE ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectStmt {
    /// Projected items.
    pub target_list: Vec<ResTarget>,
    /// FROM items: table references, joins, subqueries.
    pub from_clause: Vec<Node>,
    /// WHERE predicate.
    pub where_clause: Option<Box<Node>>,
    /// `INTO` target of a SELECT-INTO.
    pub into_clause: Option<IntoClause>,
    /// `WITH` list.
    pub with_clause: Vec<CommonTableExpr>,
}

impl SelectStmt {
    /// Creates an empty select statement.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a projected expression.
    #[must_use]
    pub fn project(mut self, value: impl Into<Node>) -> Self {
        self.target_list.push(ResTarget::value(value));
        self
    }

    /// Appends a FROM item.
    #[must_use]
    pub fn from(mut self, item: impl Into<Node>) -> Self {
        self.from_clause.push(item.into());
        self
    }

    /// Sets the WHERE predicate.
    #[must_use]
    pub fn filter(mut self, predicate: impl Into<Node>) -> Self {
        self.where_clause = Some(Box::new(predicate.into()));
        self
    }

    /// Sets the `INTO` target.
    #[must_use]
    pub fn into_table(mut self, rel: RangeVar) -> Self {
        self.into_clause = Some(IntoClause { rel });
        self
    }

    /// Appends a common table expression to the `WITH` list.
    #[must_use]
    pub fn with_cte(mut self, cte: CommonTableExpr) -> Self {
        self.with_clause.push(cte);
        self
    }
}

impl From<SelectStmt> for Node {
    fn from(stmt: SelectStmt) -> Self {
        Node::SelectStmt(stmt)
    }
}

/// `COPY relation FROM | TO ...` or `COPY (query) TO ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyStmt {
    /// Copied table.
    pub relation: Option<RangeVar>,
    /// Copied query (only valid with `TO`).
    pub query: Option<Box<SelectStmt>>,
    /// True for `COPY ... FROM` (data flows into the table).
    pub is_from: bool,
    /// File name, None for STDIN/STDOUT.
    pub filename: Option<String>,
}

impl CopyStmt {
    /// `COPY relation FROM STDIN`.
    #[must_use]
    pub fn from_stdin(relation: RangeVar) -> Self {
        CopyStmt {
            relation: Some(relation),
            query: None,
            is_from: true,
            filename: None,
        }
    }

    /// `COPY relation TO STDOUT`.
    #[must_use]
    pub fn to_stdout(relation: RangeVar) -> Self {
        CopyStmt {
            relation: Some(relation),
            query: None,
            is_from: false,
            filename: None,
        }
    }
}

impl From<CopyStmt> for Node {
    fn from(stmt: CopyStmt) -> Self {
        Node::CopyStmt(stmt)
    }
}

/// Table reference: `[database.][schema.]name [AS alias]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RangeVar {
    /// Database (catalog) name.
    pub catalogname: Option<String>,
    /// Schema name.
    pub schemaname: Option<String>,
    /// Table name.
    pub relname: String,
    /// Alias.
    pub alias: Option<String>,
}

impl RangeVar {
    /// Creates an unqualified, unaliased table reference.
    #[must_use]
    pub fn new(relname: impl Into<String>) -> Self {
        RangeVar {
            catalogname: None,
            schemaname: None,
            relname: relname.into(),
            alias: None,
        }
    }

    /// Sets the schema qualifier.
    #[must_use]
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schemaname = Some(schema.into());
        self
    }

    /// Sets the database qualifier.
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.catalogname = Some(database.into());
        self
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

impl From<RangeVar> for Node {
    fn from(rel: RangeVar) -> Self {
        Node::RangeVar(rel)
    }
}

/// `(subquery) [AS alias]` in a FROM clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSubselect {
    pub subquery: Box<SelectStmt>,
    pub alias: Option<String>,
}

impl RangeSubselect {
    #[must_use]
    pub fn new(subquery: SelectStmt, alias: Option<&str>) -> Self {
        RangeSubselect {
            subquery: Box::new(subquery),
            alias: alias.map(String::from),
        }
    }
}

impl From<RangeSubselect> for Node {
    fn from(sub: RangeSubselect) -> Self {
        Node::RangeSubselect(sub)
    }
}

/// `larg JOIN rarg [ON quals]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinExpr {
    pub larg: Box<Node>,
    pub rarg: Box<Node>,
    pub quals: Option<Box<Node>>,
}

impl JoinExpr {
    #[must_use]
    pub fn new(larg: impl Into<Node>, rarg: impl Into<Node>) -> Self {
        JoinExpr {
            larg: Box::new(larg.into()),
            rarg: Box::new(rarg.into()),
            quals: None,
        }
    }

    /// Sets the join condition.
    #[must_use]
    pub fn on(mut self, quals: impl Into<Node>) -> Self {
        self.quals = Some(Box::new(quals.into()));
        self
    }
}

impl From<JoinExpr> for Node {
    fn from(join: JoinExpr) -> Self {
        Node::JoinExpr(join)
    }
}

/// One segment of a column reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnField {
    /// Identifier segment.
    Name(String),
    /// `*`.
    Star,
}

/// Column reference: `[qualifier.]column`, `*` or `qualifier.*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnRef {
    /// Ordered segments; a star can only be last.
    pub fields: Vec<ColumnField>,
}

impl ColumnRef {
    /// Creates a reference from dotted name segments, e.g. `["a", "x"]`.
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnRef {
            fields: segments
                .into_iter()
                .map(|s| ColumnField::Name(s.into()))
                .collect(),
        }
    }

    /// `*`.
    #[must_use]
    pub fn star() -> Self {
        ColumnRef {
            fields: vec![ColumnField::Star],
        }
    }

    /// `qualifier.*`.
    #[must_use]
    pub fn qualified_star(qualifier: impl Into<String>) -> Self {
        ColumnRef {
            fields: vec![ColumnField::Name(qualifier.into()), ColumnField::Star],
        }
    }
}

impl From<ColumnRef> for Node {
    fn from(col: ColumnRef) -> Self {
        Node::ColumnRef(col)
    }
}

/// Target item. In an insert column list only `name` is set; in a select
/// list `val` holds the projected expression and `name` the output alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResTarget {
    pub name: Option<String>,
    pub val: Option<Box<Node>>,
}

impl ResTarget {
    /// Insert-list target column.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        ResTarget {
            name: Some(name.into()),
            val: None,
        }
    }

    /// Unaliased select-list item.
    #[must_use]
    pub fn value(val: impl Into<Node>) -> Self {
        ResTarget {
            name: None,
            val: Some(Box::new(val.into())),
        }
    }

    /// Sets the output alias.
    #[must_use]
    pub fn alias(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl From<ResTarget> for Node {
    fn from(target: ResTarget) -> Self {
        Node::ResTarget(target)
    }
}

/// `name AS (query)` inside a WITH list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonTableExpr {
    pub ctename: String,
    pub ctequery: Box<SelectStmt>,
}

impl CommonTableExpr {
    #[must_use]
    pub fn new(ctename: impl Into<String>, ctequery: SelectStmt) -> Self {
        CommonTableExpr {
            ctename: ctename.into(),
            ctequery: Box::new(ctequery),
        }
    }
}

impl From<CommonTableExpr> for Node {
    fn from(cte: CommonTableExpr) -> Self {
        Node::CommonTableExpr(cte)
    }
}

/// `INTO rel` of a SELECT-INTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntoClause {
    pub rel: RangeVar,
}

impl From<IntoClause> for Node {
    fn from(into: IntoClause) -> Self {
        Node::IntoClause(into)
    }
}

/// `name(args)`, `count(*)` when `agg_star` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncCall {
    pub funcname: String,
    pub args: Vec<Node>,
    pub agg_star: bool,
}

impl FuncCall {
    #[must_use]
    pub fn new(funcname: impl Into<String>, args: Vec<Node>) -> Self {
        FuncCall {
            funcname: funcname.into(),
            args,
            agg_star: false,
        }
    }
}

impl From<FuncCall> for Node {
    fn from(call: FuncCall) -> Self {
        Node::FuncCall(call)
    }
}

/// `lexpr op rexpr`; either side may be absent for prefix/postfix operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AExpr {
    pub op: String,
    pub lexpr: Option<Box<Node>>,
    pub rexpr: Option<Box<Node>>,
}

impl AExpr {
    /// Binary operator expression.
    #[must_use]
    pub fn binary(op: impl Into<String>, lexpr: impl Into<Node>, rexpr: impl Into<Node>) -> Self {
        AExpr {
            op: op.into(),
            lexpr: Some(Box::new(lexpr.into())),
            rexpr: Some(Box::new(rexpr.into())),
        }
    }
}

impl From<AExpr> for Node {
    fn from(expr: AExpr) -> Self {
        Node::AExpr(expr)
    }
}

/// Literal constant, kept in its source text form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub value: String,
}

impl Constant {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Constant {
            value: value.into(),
        }
    }
}

impl From<Constant> for Node {
    fn from(constant: Constant) -> Self {
        Node::Constant(constant)
    }
}
