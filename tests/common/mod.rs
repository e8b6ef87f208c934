//! Shared snapshot fixtures for integration tests.

#![allow(dead_code)]

use schemasight::metadata::{SchemaSnapshot, TableDescriptor};

/// Table with an integer `id` primary key.
pub fn keyed(name: &str) -> TableDescriptor {
    TableDescriptor::new("public", name)
        .column("id", "integer", false)
        .primary_key(&["id"])
}

/// `users`, `products` and the `order_items` junction between them.
pub fn order_items_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        keyed("users").column("email", "varchar(255)", false),
        keyed("products").column("title", "text", false),
        TableDescriptor::new("public", "order_items")
            .column("user_id", "integer", false)
            .column("product_id", "integer", false)
            .primary_key(&["user_id", "product_id"])
            .foreign_key(&["user_id"], "users", &["id"])
            .foreign_key(&["product_id"], "products", &["id"]),
    ])
}

/// `employees` with a nullable self-referencing `manager_id`.
pub fn employees_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![keyed("employees")
        .column("manager_id", "integer", true)
        .foreign_key(&["manager_id"], "employees", &["id"])])
}

/// `invoices.customer_id` with no declared constraint.
pub fn invoices_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        keyed("customers").column("email", "text", false).unique(&["email"]),
        keyed("invoices")
            .column("customer_id", "integer", false)
            .column("total", "numeric(10,2)", true),
    ])
}

/// A small shop touching every stage: declared and inferred edges, a
/// junction, a self reference, an unmatched `status_id` and an unsupported
/// type.
pub fn shop_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new(vec![
        keyed("customers")
            .column("email", "text", false)
            .column("region", "geography", true)
            .unique(&["email"]),
        keyed("orders")
            .column("customer_id", "integer", false)
            .column("status_id", "integer", true)
            .column("placed_at", "timestamptz", false)
            .foreign_key(&["customer_id"], "customers", &["id"])
            .with_row_estimate(120_000),
        keyed("products").column("sku", "text", false).unique(&["sku"]),
        keyed("order_lines")
            .column("order_id", "integer", false)
            .column("product_id", "integer", false)
            .column("quantity", "integer", false)
            .unique(&["order_id", "product_id"]),
        keyed("invoices")
            .column("order_id", "integer", true)
            .column("customer_id", "integer", false),
        keyed("employees")
            .column("manager_id", "integer", true)
            .foreign_key(&["manager_id"], "employees", &["id"]),
    ])
}

/// Same tables as `snapshot`, in reverse order.
pub fn reversed(snapshot: &SchemaSnapshot) -> SchemaSnapshot {
    let mut tables = snapshot.tables.clone();
    tables.reverse();
    SchemaSnapshot::new(tables)
}
