//! Contract tests for target table and target column binding.

use lineage_binder::ast::{ColumnRef, InsertStmt, Node, RangeVar, SelectStmt};
use lineage_binder::binder::{BindError, BinderConfig};
use lineage_binder::catalog::SearchKeys;

use super::common::{bind, bind_with, create_test_catalog, names};

fn insert_from_orders(target: RangeVar, columns: &[&str]) -> Node {
    InsertStmt::new(target)
        .with_columns(columns.iter().copied())
        .with_select(
            SelectStmt::new()
                .project(ColumnRef::new(["created_at"]))
                .project(ColumnRef::new(["amount"]))
                .from(RangeVar::new("orders")),
        )
        .into()
}

#[test]
fn test_no_explicit_columns_binds_all_in_catalog_order() {
    // Contract: without a column list the target columns are the full
    // column list of the target table
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("daily_totals"), &[]);

    let result = bind(&node, &catalog).unwrap();

    assert_eq!(result.target_table().name, "daily_totals");
    assert_eq!(
        names(result.target_columns()),
        vec!["daily_totals.day", "daily_totals.total"]
    );
}

#[test]
fn test_explicit_columns_keep_request_order() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("daily_totals"), &["total", "day"]);

    let result = bind(&node, &catalog).unwrap();

    assert_eq!(result.target_columns().len(), 2);
    assert_eq!(
        names(result.target_columns()),
        vec!["daily_totals.total", "daily_totals.day"]
    );
}

#[test]
fn test_missing_target_column_is_named() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("daily_totals"), &["day", "week"]);

    let err = bind(&node, &catalog).unwrap_err();

    assert_eq!(
        err,
        BindError::MissingTargetColumn {
            table: "warehouse.public.daily_totals".into(),
            column: "week".into(),
        }
    );
}

#[test]
fn test_repeated_target_column_is_missing_the_second_time() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("daily_totals"), &["day", "day"]);

    let err = bind(&node, &catalog).unwrap_err();
    assert!(matches!(err, BindError::MissingTargetColumn { ref column, .. } if column == "day"));
}

#[test]
fn test_target_table_not_found() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("weekly_totals"), &[]);

    assert_eq!(
        bind(&node, &catalog).unwrap_err(),
        BindError::TargetTableNotFound(SearchKeys::table("weekly_totals"))
    );
}

#[test]
fn test_ambiguous_target_table() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("events"), &["id"]);

    let err = bind(&node, &catalog).unwrap_err();
    assert_eq!(
        err,
        BindError::AmbiguousTargetTable {
            keys: SearchKeys::table("events"),
            matches: 2,
        }
    );
}

#[test]
fn test_schema_qualified_target() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("events").with_schema("audit"), &["actor"]);

    let result = bind(&node, &catalog).unwrap();
    assert_eq!(result.target_table().schema, "audit");
    assert_eq!(names(result.target_columns()), vec!["events.actor"]);
}

#[test]
fn test_default_schema_applies_to_unqualified_target() {
    let catalog = create_test_catalog();
    let node = insert_from_orders(RangeVar::new("events"), &["payload"]);
    let config = BinderConfig::new().with_default_schema("public");

    let result = bind_with(&node, &catalog, &config).unwrap();
    assert_eq!(result.target_table().schema, "public");
}

#[test]
fn test_select_into_target_comes_from_into_clause() {
    let catalog = create_test_catalog();
    let node: Node = SelectStmt::new()
        .project(ColumnRef::new(["name"]))
        .project(ColumnRef::new(["email"]))
        .from(RangeVar::new("customers"))
        .into_table(RangeVar::new("customer_orders"))
        .into();

    let result = bind(&node, &catalog).unwrap();

    assert_eq!(result.target_table().name, "customer_orders");
    assert_eq!(
        names(result.target_columns()),
        vec!["customer_orders.name", "customer_orders.amount"]
    );
    assert_eq!(
        names(result.source_columns()),
        vec!["customers.name", "customers.email"]
    );
}
