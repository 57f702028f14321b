//! Contract tests for common table expression substitution.

use lineage_binder::ast::{ColumnRef, CommonTableExpr, InsertStmt, Node, RangeVar, SelectStmt};
use lineage_binder::binder::BindError;

use super::common::{bind, create_test_catalog, names, table_names, RecordingCatalog};

fn cte_over_t() -> CommonTableExpr {
    CommonTableExpr::new(
        "w",
        SelectStmt::new()
            .project(ColumnRef::new(["col"]))
            .from(RangeVar::new("t")),
    )
}

fn insert(select: SelectStmt) -> Node {
    InsertStmt::new(RangeVar::new("customer_orders"))
        .with_columns(["name"])
        .with_select(select)
        .into()
}

#[test]
fn test_star_over_cte_binds_to_underlying_columns() {
    // Contract: WITH w AS (SELECT col FROM t) SELECT * FROM w binds to t.col
    // and never asks the catalog for `w`
    let catalog = create_test_catalog();
    let recording = RecordingCatalog::new(&catalog);
    let node = insert(
        SelectStmt::new()
            .project(ColumnRef::star())
            .from(RangeVar::new("w"))
            .with_cte(cte_over_t()),
    );

    let result = bind(&node, &recording).unwrap();

    assert_eq!(table_names(result.source_tables()), vec!["public.t"]);
    assert_eq!(names(result.source_columns()), vec!["t.col"]);
    assert!(!recording.searched_tables().contains(&"w".to_string()));
    assert!(recording.searched_tables().contains(&"t".to_string()));
}

#[test]
fn test_insert_level_with_clause() {
    let catalog = create_test_catalog();
    let node: Node = InsertStmt::new(RangeVar::new("customer_orders"))
        .with_columns(["name"])
        .with_select(
            SelectStmt::new()
                .project(ColumnRef::new(["col"]))
                .from(RangeVar::new("w")),
        )
        .with_cte(cte_over_t())
        .into();

    let result = bind(&node, &catalog).unwrap();
    assert_eq!(names(result.source_columns()), vec!["t.col"]);
}

#[test]
fn test_cte_columns_by_name_alias_and_cte_name() {
    let catalog = create_test_catalog();
    let node = insert(
        SelectStmt::new()
            .project(ColumnRef::new(["col"]))
            .project(ColumnRef::new(["r", "col"]))
            .from(RangeVar::new("w").with_alias("r"))
            .with_cte(cte_over_t()),
    );
    let result = bind(&node, &catalog).unwrap();
    assert_eq!(names(result.source_columns()), vec!["t.col", "t.col"]);

    let by_name = insert(
        SelectStmt::new()
            .project(ColumnRef::new(["w", "col"]))
            .from(RangeVar::new("w"))
            .with_cte(cte_over_t()),
    );
    let result = bind(&by_name, &catalog).unwrap();
    assert_eq!(names(result.source_columns()), vec!["t.col"]);
}

#[test]
fn test_cte_hides_columns_it_does_not_project() {
    let catalog = create_test_catalog();
    let node = insert(
        SelectStmt::new()
            .project(ColumnRef::new(["other"]))
            .from(RangeVar::new("w"))
            .with_cte(cte_over_t()),
    );

    assert_eq!(
        bind(&node, &catalog).unwrap_err(),
        BindError::SourceColumnNotFound {
            column: "other".into(),
            table: None,
        }
    );
}

#[test]
fn test_cte_mixed_with_catalog_table() {
    let catalog = create_test_catalog();
    let node = insert(
        SelectStmt::new()
            .project(ColumnRef::new(["c", "name"]))
            .project(ColumnRef::new(["w", "amount"]))
            .from(RangeVar::new("customers").with_alias("c"))
            .from(RangeVar::new("w"))
            .with_cte(CommonTableExpr::new(
                "w",
                SelectStmt::new()
                    .project(ColumnRef::new(["amount"]))
                    .from(RangeVar::new("orders")),
            )),
    );

    let result = bind(&node, &catalog).unwrap();

    assert_eq!(
        table_names(result.source_tables()),
        vec!["public.customers", "public.orders"]
    );
    assert_eq!(
        names(result.source_columns()),
        vec!["customers.name", "orders.amount"]
    );
}

#[test]
fn test_unused_cte_is_still_bound() {
    let catalog = create_test_catalog();

    let unused = insert(
        SelectStmt::new()
            .project(ColumnRef::new(["y"]))
            .from(RangeVar::new("a"))
            .with_cte(cte_over_t()),
    );
    let result = bind(&unused, &catalog).unwrap();
    assert_eq!(table_names(result.source_tables()), vec!["public.a"]);

    let broken = insert(
        SelectStmt::new()
            .project(ColumnRef::new(["y"]))
            .from(RangeVar::new("a"))
            .with_cte(CommonTableExpr::new(
                "w",
                SelectStmt::new()
                    .project(ColumnRef::star())
                    .from(RangeVar::new("missing")),
            )),
    );
    assert!(matches!(
        bind(&broken, &catalog),
        Err(BindError::SourceTableNotFound(_))
    ));
}

#[test]
fn test_cte_referencing_another_cte_is_unsupported() {
    let catalog = create_test_catalog();
    let node = insert(
        SelectStmt::new()
            .project(ColumnRef::star())
            .from(RangeVar::new("v"))
            .with_cte(cte_over_t())
            .with_cte(CommonTableExpr::new(
                "v",
                SelectStmt::new()
                    .project(ColumnRef::star())
                    .from(RangeVar::new("w")),
            )),
    );

    let err = bind(&node, &catalog).unwrap_err();
    assert!(matches!(err, BindError::UnsupportedCte { ref name, .. } if name == "v"));
}

#[test]
fn test_schema_qualified_name_is_not_a_cte() {
    let catalog = create_test_catalog();
    let recording = RecordingCatalog::new(&catalog);
    let node = insert(
        SelectStmt::new()
            .project(ColumnRef::star())
            .from(RangeVar::new("w").with_schema("public"))
            .with_cte(cte_over_t()),
    );

    let err = bind(&node, &recording).unwrap_err();
    assert!(matches!(err, BindError::SourceTableNotFound(ref keys) if keys.table == "w"));
    assert!(recording.searched_tables().contains(&"w".to_string()));
}

#[test]
fn test_select_into_with_cte() {
    let catalog = create_test_catalog();
    let node: Node = SelectStmt::new()
        .project(ColumnRef::new(["col"]))
        .from(RangeVar::new("w"))
        .into_table(RangeVar::new("customer_orders"))
        .with_cte(cte_over_t())
        .into();

    let result = bind(&node, &catalog).unwrap();
    assert_eq!(table_names(result.source_tables()), vec!["public.t"]);
    assert_eq!(names(result.source_columns()), vec!["t.col"]);
}
