//! Mermaid flowchart: one node per table, one arrow per edge labelled with
//! the recommended join. Declared edges are solid, inferred edges dashed.

use std::collections::{HashMap, HashSet};

use super::format::{claim_unique, escape_mermaid, is_mermaid_reserved, is_safe_node_id, sanitize_identifier, IndentWriter};
use super::RenderContext;
use crate::model::QualifiedName;

/// Assign a unique node id to every table, in traversal order.
fn node_ids(ctx: &RenderContext<'_>) -> HashMap<QualifiedName, String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut ids = HashMap::new();

    for table in ctx.tables() {
        let label = ctx.label(&table.name);
        let base = if is_safe_node_id(&label) {
            label
        } else {
            let sanitized = sanitize_identifier(&label);
            if is_mermaid_reserved(&sanitized) {
                format!("{}_table", sanitized)
            } else {
                sanitized
            }
        };

        ids.insert(table.name.clone(), claim_unique(base, &mut used));
    }
    ids
}

/// Render the flowchart.
pub fn render_flowchart(ctx: &RenderContext<'_>) -> String {
    let ids = node_ids(ctx);
    let mut w = IndentWriter::default();
    w.write_line("flowchart LR");
    w.indent();

    for table in ctx.tables() {
        if let Some(id) = ids.get(&table.name) {
            w.write_line(&format!(
                "{}[\"{}\"]",
                id,
                escape_mermaid(&ctx.label(&table.name))
            ));
        }
    }

    for edge in ctx.edges() {
        let (Some(from), Some(to)) = (ids.get(&edge.from_table), ids.get(&edge.to_table)) else {
            continue;
        };
        let keyword = ctx
            .recommendation(edge)
            .map(|r| r.keyword())
            .unwrap_or("JOIN");
        let arrow = if edge.is_inferred() { "-.->" } else { "-->" };
        w.write_line(&format!(
            "{} {}|\"{} on {}\"| {}",
            from,
            arrow,
            keyword,
            escape_mermaid(&edge.from_column),
            to
        ));
    }

    w.into_string()
}
