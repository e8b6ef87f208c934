//! Renderer tests: Mermaid ER diagram, flowchart and Markdown documentation.

#[path = "../common/mod.rs"]
mod common;

use common::{employees_snapshot, invoices_snapshot, keyed, order_items_snapshot, reversed, shop_snapshot};
use insta::assert_snapshot;
use schemasight::analysis::{analyze, AnalysisOptions, AnalysisReport};
use schemasight::metadata::{SchemaSnapshot, TableDescriptor};
use schemasight::render::{RenderOptions, TableOrder};

fn report(snapshot: &SchemaSnapshot) -> AnalysisReport {
    analyze(snapshot, &AnalysisOptions::default()).unwrap()
}

fn alphabetical() -> AnalysisOptions {
    AnalysisOptions {
        render: RenderOptions {
            table_order: TableOrder::Alphabetical,
            ..RenderOptions::default()
        },
        ..AnalysisOptions::default()
    }
}

#[test]
fn test_er_diagram_for_inferred_edge() {
    let report = report(&invoices_snapshot());
    assert_snapshot!(report.rendered.er_diagram, @r#"
    erDiagram
        customers {
            integer id PK
            text email UK
        }
        invoices {
            integer id PK
            integer customer_id FK
            numeric total
        }
        customers ||--o{ invoices : "customer_id (inferred)"
    "#);
}

#[test]
fn test_er_diagram_marks_junction_edges_many_to_many() {
    let report = report(&order_items_snapshot());
    assert_snapshot!(report.rendered.er_diagram, @r#"
    erDiagram
        users {
            integer id PK
            text email
        }
        products {
            integer id PK
            text title
        }
        order_items {
            integer user_id PK, FK
            integer product_id PK, FK
        }
        users }o--o{ order_items : "user_id"
        products }o--o{ order_items : "product_id"
    "#);
}

#[test]
fn test_flowchart_dashes_inferred_edges() {
    let report = report(&invoices_snapshot());
    assert_snapshot!(report.rendered.flowchart, @r#"
    flowchart LR
        customers["customers"]
        invoices["invoices"]
        invoices -.->|"LEFT JOIN on customer_id"| customers
    "#);
}

#[test]
fn test_flowchart_labels_declared_edges_with_join_advice() {
    let report = report(&shop_snapshot());
    let flowchart = &report.rendered.flowchart;
    assert!(flowchart.contains(r#"    orders -->|"INNER JOIN on customer_id"| customers"#));
    assert!(flowchart.contains(r#"    employees -->|"LEFT JOIN on manager_id"| employees"#));
    assert!(flowchart.contains(r#"    order_lines -.->|"LEFT JOIN on product_id"| products"#));
}

#[test]
fn test_table_document_for_self_reference() {
    let report = report(&employees_snapshot());
    assert_snapshot!(report.table_document("employees").unwrap(), @r"
    ## employees

    | Column | Type | Category | Nullable | Default | Key |
    | --- | --- | --- | --- | --- | --- |
    | `id` | integer | integer | no | no | PK |
    | `manager_id` | integer | integer | yes | no | FK |

    Outbound relationships:

    - `manager_id` -> `employees.id`: declared, LEFT JOIN (referencing column is nullable — rows without a match would be excluded by INNER join)

    Inbound relationships:

    - `employees.manager_id` -> `id`: declared, LEFT JOIN (referencing column is nullable — rows without a match would be excluded by INNER join)
    ");
}

#[test]
fn test_table_document_shows_junction_verdict_and_row_estimate() {
    let report = report(&shop_snapshot());

    let lines = report.table_document("order_lines").unwrap();
    assert!(lines.contains(
        "- `order_id` -> `orders.id`: inferred (confidence 0.60), LEFT JOIN (relationship is inferred, not guaranteed"
    ));
    assert!(lines.ends_with(
        "\nJunction verdict (advisory): junction table, many-to-many, bridging `orders`, `products`\n"
    ));

    let orders = report.table_document("orders").unwrap();
    assert!(orders.contains("\nRow estimate: 120000\n"));
    assert!(orders.contains("| `status_id` | integer | integer | yes | no |  |"));
    assert!(orders.contains("- `order_lines.order_id` -> `id`: inferred (confidence 0.60)"));
}

#[test]
fn test_document_header_and_diagnostics() {
    let report = report(&shop_snapshot());
    let document = &report.rendered.document;
    assert!(document.starts_with(
        "# Schema documentation\n\n- Tables: 6\n- Relationships: 6 (2 declared, 4 inferred)\n- Junction tables: 1\n\n## customers\n"
    ));
    assert!(document.ends_with(
        "\n## Diagnostics\n\n- unsupported type 'geography' on public.customers.region; treated as other\n"
    ));
}

#[test]
fn test_diagnostics_section_can_be_disabled() {
    let options = AnalysisOptions {
        render: RenderOptions {
            include_diagnostics: false,
            ..RenderOptions::default()
        },
        ..AnalysisOptions::default()
    };
    let report = analyze(&shop_snapshot(), &options).unwrap();
    assert!(!report.rendered.document.contains("## Diagnostics"));
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn test_unsafe_names_are_quoted_and_sanitized() {
    let snapshot = SchemaSnapshot::new(vec![
        keyed("end"),
        TableDescriptor::new("public", "order items")
            .column("unit price", "numeric", false)
            .column("say \"hi\"", "text", true)
            .column("a|b", "text", true),
        keyed("order_items"),
    ]);
    let report = report(&snapshot);

    let er = &report.rendered.er_diagram;
    assert!(er.contains("    \"order items\" {\n"));
    assert!(er.contains("        numeric unit_price \"unit price\"\n"));
    assert!(er.contains("        text say__hi_ \"say #quot;hi#quot;\"\n"));

    assert_snapshot!(report.rendered.flowchart, @r#"
    flowchart LR
        end_table["end"]
        order_items["order items"]
        order_items_2["order_items"]
    "#);

    let document = report.table_document("order items").unwrap();
    assert!(document.contains("| `a\\|b` | text | text | yes | no |  |"));
}

#[test]
fn test_sanitized_attribute_names_do_not_collide() {
    let snapshot = SchemaSnapshot::new(vec![TableDescriptor::new("public", "notes")
        .column("a b", "text", true)
        .column("a_b", "text", true)
        .column("a.b", "text", true)]);
    let report = report(&snapshot);
    assert_snapshot!(report.rendered.er_diagram, @r#"
    erDiagram
        notes {
            text a_b_2 "a b"
            text a_b
            text a_b_3 "a.b"
        }
    "#);
}

#[test]
fn test_alphabetical_order() {
    let report = analyze(&shop_snapshot(), &alphabetical()).unwrap();
    assert_eq!(
        report.table_names(),
        vec!["customers", "employees", "invoices", "order_lines", "orders", "products"]
    );
}

#[test]
fn test_alphabetical_rendering_ignores_supplied_order() {
    let shop = shop_snapshot();
    let forward = analyze(&shop, &alphabetical()).unwrap();
    let backward = analyze(&reversed(&shop), &alphabetical()).unwrap();
    assert_eq!(forward.rendered, backward.rendered);

    let spatial = SchemaSnapshot::new(vec![
        keyed("beta").column("area", "geometry", true),
        keyed("alpha").column("shape", "geography", true),
    ]);
    let forward = analyze(&spatial, &alphabetical()).unwrap();
    let backward = analyze(&reversed(&spatial), &alphabetical()).unwrap();
    assert_eq!(forward.diagnostics.len(), 2);
    assert_eq!(forward.rendered.document, backward.rendered.document);
    assert!(forward.rendered.document.ends_with(
        "\n## Diagnostics\n\n\
         - unsupported type 'geography' on public.alpha.shape; treated as other\n\
         - unsupported type 'geometry' on public.beta.area; treated as other\n"
    ));
}

#[test]
fn test_rendering_is_byte_identical_across_runs() {
    let shop = shop_snapshot();
    assert_eq!(report(&shop).rendered, report(&shop).rendered);
}

#[test]
fn test_schema_qualified_labels_when_names_collide() {
    let snapshot = SchemaSnapshot::new(vec![
        TableDescriptor::new("sales", "users").column("id", "integer", false),
        TableDescriptor::new("crm", "users").column("id", "integer", false),
    ]);
    let report = report(&snapshot);
    assert_snapshot!(report.rendered.flowchart, @r#"
    flowchart LR
        sales_users["sales.users"]
        crm_users["crm.users"]
    "#);
    assert!(report.rendered.er_diagram.contains("    \"sales.users\" {\n"));
}
