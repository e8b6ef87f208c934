//! Normalizer tests: structural translation, type categories and the
//! malformed-snapshot failures.

#[path = "../common/mod.rs"]
mod common;

use common::{keyed, shop_snapshot};
use schemasight::metadata::{
    ColumnDescriptor, ConstraintDescriptor, ConstraintKind, ReferenceTarget, SchemaSnapshot,
    TableDescriptor,
};
use schemasight::model::{normalize, DataCategory, QualifiedName};
use schemasight::semantic::{Diagnostic, MalformedMetadataError};

fn column(name: &str, ordinal: u32, data_type: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        name: name.to_string(),
        ordinal,
        data_type: data_type.to_string(),
        is_nullable: true,
        has_default: false,
    }
}

#[test]
fn test_shop_normalizes_in_supplied_order() {
    let normalized = normalize(&shop_snapshot()).unwrap();
    let names: Vec<String> = normalized
        .model
        .tables
        .iter()
        .map(|t| t.name.to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "public.customers",
            "public.orders",
            "public.products",
            "public.order_lines",
            "public.invoices",
            "public.employees",
        ]
    );
    assert_eq!(normalized.model.foreign_keys.len(), 2);
}

#[test]
fn test_unsupported_type_is_reported_once() {
    let normalized = normalize(&shop_snapshot()).unwrap();
    assert_eq!(normalized.diagnostics.len(), 1);
    match &normalized.diagnostics[0] {
        Diagnostic::UnsupportedType(w) => {
            assert_eq!(w.table, QualifiedName::new("public", "customers"));
            assert_eq!(w.column, "region");
            assert_eq!(w.declared_type, "geography");
        }
        other => panic!("unexpected diagnostic: {:?}", other),
    }

    let region = normalized
        .model
        .column(&QualifiedName::new("public", "customers"), "region")
        .unwrap();
    assert_eq!(region.category, DataCategory::Other);
    assert_eq!(region.declared_type, "geography");
}

#[test]
fn test_declared_types_map_to_categories() {
    let cases = [
        ("integer", DataCategory::Integer),
        ("BIGINT", DataCategory::Integer),
        ("character varying(255)", DataCategory::Text),
        ("numeric(10,2)", DataCategory::Numeric),
        ("timestamp with time zone", DataCategory::Temporal),
        ("boolean", DataCategory::Boolean),
        ("uuid", DataCategory::Other),
    ];
    for (declared, expected) in cases {
        assert_eq!(DataCategory::from_declared(declared), expected, "{}", declared);
    }
}

#[test]
fn test_column_flags_survive_normalization() {
    let snapshot = SchemaSnapshot::new(vec![TableDescriptor::new("public", "accounts")
        .with_column(ColumnDescriptor {
            name: "id".into(),
            ordinal: 1,
            data_type: "serial".into(),
            is_nullable: false,
            has_default: true,
        })
        .with_column(column("nickname", 2, "text"))
        .primary_key(&["id"])
        .unique(&["nickname"])]);

    let normalized = normalize(&snapshot).unwrap();
    let table = &normalized.model.tables[0];
    let id = table.column("id").unwrap();
    assert!(id.primary_key);
    assert!(id.has_default);
    assert!(!id.nullable);
    assert!(table.column("nickname").unwrap().nullable);
    assert!(table.is_individually_unique("nickname"));
    assert!(normalized.diagnostics.is_empty());
}

#[test]
fn test_table_without_primary_key() {
    let snapshot = SchemaSnapshot::new(vec![
        TableDescriptor::new("public", "events").column("payload", "jsonb", true)
    ]);
    let normalized = normalize(&snapshot).unwrap();
    let table = &normalized.model.tables[0];
    assert!(table.primary_key.is_empty());
    assert!(table.single_primary_key().is_none());
}

#[test]
fn test_empty_snapshot() {
    let normalized = normalize(&SchemaSnapshot::new(vec![])).unwrap();
    assert!(normalized.model.is_empty());
    assert!(normalized.diagnostics.is_empty());
}

// ============================================================================
// Malformed snapshots
// ============================================================================

#[test]
fn test_duplicate_table() {
    let snapshot = SchemaSnapshot::new(vec![keyed("users"), keyed("users")]);
    let err = normalize(&snapshot).unwrap_err();
    assert_eq!(
        err,
        MalformedMetadataError::DuplicateTable {
            table: QualifiedName::new("public", "users")
        }
    );
}

#[test]
fn test_same_name_in_two_schemas_is_not_a_duplicate() {
    let snapshot = SchemaSnapshot::new(vec![
        TableDescriptor::new("sales", "users").column("id", "integer", false),
        TableDescriptor::new("crm", "users").column("id", "integer", false),
    ]);
    assert!(normalize(&snapshot).is_ok());
}

#[test]
fn test_duplicate_column() {
    let snapshot = SchemaSnapshot::new(vec![TableDescriptor::new("public", "users")
        .with_column(column("email", 1, "text"))
        .with_column(column("email", 2, "text"))]);
    let err = normalize(&snapshot).unwrap_err();
    assert!(matches!(
        err,
        MalformedMetadataError::DuplicateColumn { ref column, .. } if column == "email"
    ));
}

#[test]
fn test_duplicate_ordinal() {
    let snapshot = SchemaSnapshot::new(vec![TableDescriptor::new("public", "users")
        .with_column(column("id", 1, "integer"))
        .with_column(column("email", 1, "text"))]);
    let err = normalize(&snapshot).unwrap_err();
    assert_eq!(
        err,
        MalformedMetadataError::DuplicateOrdinal {
            table: QualifiedName::new("public", "users"),
            ordinal: 1,
            first: "id".to_string(),
            second: "email".to_string(),
        }
    );
}

#[test]
fn test_multiple_primary_keys() {
    let snapshot = SchemaSnapshot::new(vec![keyed("users")
        .column("email", "text", false)
        .primary_key(&["email"])]);
    let err = normalize(&snapshot).unwrap_err();
    assert!(matches!(err, MalformedMetadataError::MultiplePrimaryKeys { .. }));
}

#[test]
fn test_constraint_without_columns() {
    let mut desc = keyed("users");
    desc.constraints
        .push(ConstraintDescriptor::new(ConstraintKind::Unique, &[]));
    let err = normalize(&SchemaSnapshot::new(vec![desc])).unwrap_err();
    assert_eq!(
        err,
        MalformedMetadataError::EmptyConstraint {
            table: QualifiedName::new("public", "users"),
            kind: ConstraintKind::Unique,
        }
    );
}

#[test]
fn test_foreign_key_without_target() {
    let mut desc = keyed("orders").column("customer_id", "integer", false);
    desc.constraints
        .push(ConstraintDescriptor::new(ConstraintKind::ForeignKey, &["customer_id"]));
    let err = normalize(&SchemaSnapshot::new(vec![desc])).unwrap_err();
    assert!(matches!(err, MalformedMetadataError::MissingReference { .. }));
}

#[test]
fn test_dangling_table_reference() {
    let snapshot = SchemaSnapshot::new(vec![keyed("orders")
        .column("customer_id", "integer", false)
        .foreign_key(&["customer_id"], "customers", &["id"])]);
    let err = normalize(&snapshot).unwrap_err();
    assert_eq!(
        err.to_string(),
        "foreign key on 'public.orders' references table 'public.customers', which is absent from the snapshot"
    );
}

#[test]
fn test_dangling_column_reference() {
    let snapshot = SchemaSnapshot::new(vec![
        keyed("customers"),
        keyed("orders")
            .column("customer_id", "integer", false)
            .foreign_key(&["customer_id"], "customers", &["customer_id"]),
    ]);
    let err = normalize(&snapshot).unwrap_err();
    assert_eq!(
        err,
        MalformedMetadataError::DanglingColumn {
            table: QualifiedName::new("public", "orders"),
            referenced: QualifiedName::new("public", "customers"),
            column: "customer_id".to_string(),
        }
    );
}

#[test]
fn test_cross_schema_reference() {
    let mut orders = TableDescriptor::new("sales", "orders")
        .column("id", "integer", false)
        .column("customer_id", "integer", false)
        .primary_key(&["id"]);
    let mut fk = ConstraintDescriptor::new(ConstraintKind::ForeignKey, &["customer_id"])
        .named("orders_customer_fk");
    fk.references = Some(ReferenceTarget {
        schema: Some("crm".to_string()),
        table: "customers".to_string(),
        columns: vec!["id".to_string()],
    });
    orders.constraints.push(fk);

    let snapshot = SchemaSnapshot::new(vec![
        orders,
        TableDescriptor::new("crm", "customers")
            .column("id", "integer", false)
            .primary_key(&["id"]),
    ]);
    let normalized = normalize(&snapshot).unwrap();
    let fk = &normalized.model.foreign_keys[0];
    assert_eq!(fk.references, QualifiedName::new("crm", "customers"));
    assert_eq!(fk.name.as_deref(), Some("orders_customer_fk"));
}

#[test]
fn test_foreign_key_arity_mismatch() {
    let snapshot = SchemaSnapshot::new(vec![
        keyed("customers"),
        keyed("orders")
            .column("customer_id", "integer", false)
            .foreign_key(&["customer_id"], "customers", &["id", "id"]),
    ]);
    let err = normalize(&snapshot).unwrap_err();
    assert_eq!(
        err,
        MalformedMetadataError::ArityMismatch {
            table: QualifiedName::new("public", "orders"),
            local: 1,
            remote: 2,
        }
    );
}
