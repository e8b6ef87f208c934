//! Markdown documentation.
//!
//! One section per table: column table, outbound and inbound relationships
//! with their join advice, and the junction verdict when there is one.

use std::fmt::Write as _;

use super::format::{code_span, escape_markdown};
use super::RenderContext;
use crate::model::Table;
use crate::semantic::{JunctionKind, JunctionVerdict, RelationshipEdge, RelationshipOrigin};

/// Render the full document.
pub fn render_document(ctx: &RenderContext<'_>) -> String {
    let mut out = String::new();
    let declared = ctx
        .edges
        .iter()
        .filter(|e| e.origin == RelationshipOrigin::Declared)
        .count();
    let junctions = ctx.junctions.iter().filter(|v| v.is_junction).count();

    out.push_str("# Schema documentation\n\n");
    let _ = writeln!(out, "- Tables: {}", ctx.model.len());
    let _ = writeln!(
        out,
        "- Relationships: {} ({} declared, {} inferred)",
        ctx.edges.len(),
        declared,
        ctx.edges.len() - declared
    );
    let _ = writeln!(out, "- Junction tables: {}", junctions);

    for table in ctx.tables() {
        out.push('\n');
        out.push_str(&render_table_document(ctx, table));
    }

    if ctx.options.include_diagnostics && !ctx.diagnostics.is_empty() {
        out.push_str("\n## Diagnostics\n\n");
        for diagnostic in ctx.diagnostics() {
            let _ = writeln!(out, "- {}", escape_markdown(&diagnostic.to_string()));
        }
    }

    out
}

/// Render the section for a single table.
pub fn render_table_document(ctx: &RenderContext<'_>, table: &Table) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "## {}\n", escape_markdown(&ctx.label(&table.name)));

    if table.columns.is_empty() {
        out.push_str("No columns.\n");
    } else {
        out.push_str("| Column | Type | Category | Nullable | Default | Key |\n");
        out.push_str("| --- | --- | --- | --- | --- | --- |\n");
        for column in &table.columns {
            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} |",
                code_span(&column.name),
                escape_markdown(&column.declared_type),
                column.category,
                yes_no(column.nullable),
                yes_no(column.has_default),
                key_flags(ctx, table, &column.name)
            );
        }
    }

    if let Some(rows) = table.row_estimate {
        let _ = writeln!(out, "\nRow estimate: {}", rows);
    }

    out.push_str("\nOutbound relationships:\n\n");
    let outbound = ctx.outbound(&table.name);
    if outbound.is_empty() {
        out.push_str("- none\n");
    }
    for edge in outbound {
        let target = format!("{}.{}", ctx.label(&edge.to_table), edge.to_column);
        let _ = writeln!(
            out,
            "- {} -> {}: {}",
            code_span(&edge.from_column),
            code_span(&target),
            describe_edge(ctx, edge)
        );
    }

    out.push_str("\nInbound relationships:\n\n");
    let inbound = ctx.inbound(&table.name);
    if inbound.is_empty() {
        out.push_str("- none\n");
    }
    for edge in inbound {
        let source = format!("{}.{}", ctx.label(&edge.from_table), edge.from_column);
        let _ = writeln!(
            out,
            "- {} -> {}: {}",
            code_span(&source),
            code_span(&edge.to_column),
            describe_edge(ctx, edge)
        );
    }

    if let Some(verdict) = ctx.junction(&table.name) {
        let _ = writeln!(out, "\nJunction verdict (advisory): {}", describe_verdict(ctx, verdict));
    }

    out
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn key_flags(ctx: &RenderContext<'_>, table: &Table, column: &str) -> String {
    let mut keys = Vec::new();
    if table.primary_key.iter().any(|c| c == column) {
        keys.push("PK");
    }
    if ctx.is_referencing(&table.name, column) {
        keys.push("FK");
    }
    if !table.primary_key.iter().any(|c| c == column) && table.is_individually_unique(column) {
        keys.push("UK");
    }
    keys.join(", ")
}

/// `declared, INNER JOIN (foreign key is mandatory)`
fn describe_edge(ctx: &RenderContext<'_>, edge: &RelationshipEdge) -> String {
    let mut text = match edge.origin {
        RelationshipOrigin::Declared => "declared".to_string(),
        RelationshipOrigin::Inferred => format!("inferred (confidence {:.2})", edge.confidence),
    };
    if let Some(rec) = ctx.recommendation(edge) {
        let _ = write!(text, ", {} ({})", rec.keyword(), rec.reason);
    }
    text
}

fn describe_verdict(ctx: &RenderContext<'_>, verdict: &JunctionVerdict) -> String {
    let bridges: Vec<String> = verdict
        .bridges
        .iter()
        .map(|t| code_span(&ctx.label(t)))
        .collect();

    let mut text = match verdict.kind {
        JunctionKind::Junction => "junction table".to_string(),
        JunctionKind::WithPayload => {
            let payload: Vec<String> = verdict.payload_columns.iter().map(|c| code_span(c)).collect();
            format!("relationship table with payload ({})", payload.join(", "))
        }
    };
    let _ = write!(text, ", {}, bridging {}", verdict.cardinality, bridges.join(", "));
    if let Some(one_side) = &verdict.one_side {
        let _ = write!(text, " (one side: {})", code_span(&ctx.label(one_side)));
    }
    text
}
