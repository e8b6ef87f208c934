//! Mermaid ER diagram.
//!
//! ```text
//! erDiagram
//!     customers {
//!         integer id PK
//!     }
//!     orders {
//!         integer id PK
//!         integer customer_id FK
//!     }
//!     customers ||--o{ orders : "customer_id"
//! ```

use std::collections::HashSet;

use super::format::{claim_unique, er_entity_name, escape_mermaid, is_safe_er_name, sanitize_identifier, IndentWriter};
use super::RenderContext;
use crate::model::{Column, Table};
use crate::semantic::Cardinality;

/// Connector for a cardinality, read from the referenced side.
pub fn cardinality_marker(cardinality: Cardinality) -> &'static str {
    match cardinality {
        Cardinality::OneToOne => "||--||",
        Cardinality::OneToMany => "||--o{",
        Cardinality::ManyToMany => "}o--o{",
    }
}

/// Render the ER diagram.
pub fn render_er_diagram(ctx: &RenderContext<'_>) -> String {
    let mut w = IndentWriter::default();
    w.write_line("erDiagram");
    w.indent();

    for table in ctx.tables() {
        write_entity(&mut w, ctx, table);
    }

    for edge in ctx.edges() {
        let mut label = edge.from_column.clone();
        if edge.is_inferred() {
            label.push_str(" (inferred)");
        }
        w.write_line(&format!(
            "{} {} {} : \"{}\"",
            er_entity_name(&ctx.label(&edge.to_table)),
            cardinality_marker(ctx.cardinality(edge)),
            er_entity_name(&ctx.label(&edge.from_table)),
            escape_mermaid(&label)
        ));
    }

    w.into_string()
}

fn write_entity(w: &mut IndentWriter, ctx: &RenderContext<'_>, table: &Table) {
    let name = er_entity_name(&ctx.label(&table.name));
    if table.columns.is_empty() {
        w.write_line(&name);
        return;
    }

    w.write_line(&format!("{} {{", name));
    w.indent();
    // Safe names keep their spelling; sanitized ones yield on collision.
    let mut used: HashSet<String> = table
        .columns
        .iter()
        .filter(|c| is_safe_er_name(&c.name))
        .map(|c| c.name.clone())
        .collect();
    for column in &table.columns {
        let attribute = if is_safe_er_name(&column.name) {
            column.name.clone()
        } else {
            claim_unique(sanitize_identifier(&column.name), &mut used)
        };
        w.write_line(&attribute_line(ctx, table, column, &attribute));
    }
    w.dedent();
    w.write_line("}");
}

/// `type name [keys] ["comment"]`. When `attribute` differs from the column
/// name, the original is kept as the comment.
fn attribute_line(ctx: &RenderContext<'_>, table: &Table, column: &Column, attribute: &str) -> String {
    let mut keys = Vec::new();
    if column.primary_key {
        keys.push("PK");
    }
    if ctx.is_referencing(&table.name, &column.name) {
        keys.push("FK");
    }
    if !column.primary_key && table.is_individually_unique(&column.name) {
        keys.push("UK");
    }

    let mut line = format!("{} {}", column.category, attribute);
    if !keys.is_empty() {
        line.push(' ');
        line.push_str(&keys.join(", "));
    }
    if attribute != column.name {
        line.push_str(&format!(" \"{}\"", escape_mermaid(&column.name)));
    }
    line
}
