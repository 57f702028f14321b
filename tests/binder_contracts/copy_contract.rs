//! Contract tests for COPY statements.

use lineage_binder::ast::{CopyStmt, Node, RangeVar};
use lineage_binder::binder::{BindError, DmlKind, DmlVisitor};
use lineage_binder::{bind_statement, BinderConfig};

use super::common::{bind, create_test_catalog, names};

#[test]
fn test_copy_from_binds_target_without_sources() {
    let catalog = create_test_catalog();
    let node: Node = CopyStmt::from_stdin(RangeVar::new("imports")).into();

    let result = bind(&node, &catalog).unwrap();

    assert_eq!(result.target_table().name, "imports");
    assert_eq!(
        names(result.target_columns()),
        vec!["imports.id", "imports.line"]
    );
    assert!(result.source_tables().is_empty());
    assert!(result.source_columns().is_empty());
    assert!(!result.has_sources());
}

#[test]
fn test_copy_to_is_not_bound() {
    let catalog = create_test_catalog();
    let node: Node = CopyStmt::to_stdout(RangeVar::new("imports")).into();

    assert_eq!(DmlKind::classify(&node), None);
    let result = bind_statement("unload", &node, &catalog, &BinderConfig::default()).unwrap();
    assert!(result.is_none());

    // Forcing the copy-from specialization collects no target.
    let binder = DmlVisitor::collect(DmlKind::CopyFrom, "unload", &node);
    assert_eq!(binder.resolve().unwrap_err(), BindError::MissingTarget);
}

#[test]
fn test_copy_from_unknown_table() {
    let catalog = create_test_catalog();
    let node: Node = CopyStmt::from_stdin(RangeVar::new("exports")).into();

    assert!(matches!(
        bind(&node, &catalog),
        Err(BindError::TargetTableNotFound(_))
    ));
}
