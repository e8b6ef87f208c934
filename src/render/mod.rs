//! Notation renderer.
//!
//! Serializes a resolved model into three independent text outputs:
//!
//! - [`er`]: Mermaid `erDiagram`
//! - [`flowchart`]: Mermaid `flowchart LR`
//! - [`document`]: Markdown documentation, one section per table
//!
//! All three walk tables and edges in the same order, fixed by
//! [`RenderOptions::table_order`]. Rendering is pure; identical input gives
//! byte-identical output.

pub mod document;
pub mod er;
pub mod flowchart;
pub mod format;

pub use document::{render_document, render_table_document};
pub use er::render_er_diagram;
pub use flowchart::render_flowchart;

use serde::{Deserialize, Serialize};

use crate::model::{QualifiedName, SchemaModel, Table};
use crate::semantic::{
    edge_cardinality, Cardinality, Diagnostic, JoinRecommendation, JunctionVerdict,
    RelationshipEdge,
};

/// Traversal order for tables and edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOrder {
    /// Tables as supplied, edges in resolution order.
    #[default]
    Supplied,
    /// Tables by qualified name, edges by endpoints.
    Alphabetical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOptions {
    pub table_order: TableOrder,
    /// Append diagnostics to the document.
    pub include_diagnostics: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            table_order: TableOrder::Supplied,
            include_diagnostics: true,
        }
    }
}

/// Everything a renderer reads.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub model: &'a SchemaModel,
    pub edges: &'a [RelationshipEdge],
    /// Indexed by edge id.
    pub joins: &'a [JoinRecommendation],
    pub junctions: &'a [JunctionVerdict],
    pub diagnostics: &'a [Diagnostic],
    pub options: &'a RenderOptions,
}

impl<'a> RenderContext<'a> {
    /// Tables in traversal order.
    pub fn tables(&self) -> Vec<&'a Table> {
        let mut tables: Vec<&Table> = self.model.tables.iter().collect();
        if self.options.table_order == TableOrder::Alphabetical {
            tables.sort_by(|a, b| a.name.cmp(&b.name));
        }
        tables
    }

    /// Edges in traversal order.
    pub fn edges(&self) -> Vec<&'a RelationshipEdge> {
        let mut edges: Vec<&RelationshipEdge> = self.edges.iter().collect();
        if self.options.table_order == TableOrder::Alphabetical {
            edges.sort_by(|a, b| a.key().cmp(&b.key()));
        }
        edges
    }

    /// Diagnostics in traversal order: by table, column and kind when
    /// alphabetical.
    pub fn diagnostics(&self) -> Vec<&'a Diagnostic> {
        let mut diagnostics: Vec<&Diagnostic> = self.diagnostics.iter().collect();
        if self.options.table_order == TableOrder::Alphabetical {
            diagnostics.sort_by(|a, b| {
                (a.location(), a.kind(), a.to_string()).cmp(&(b.location(), b.kind(), b.to_string()))
            });
        }
        diagnostics
    }

    pub fn outbound(&self, table: &QualifiedName) -> Vec<&'a RelationshipEdge> {
        self.edges().into_iter().filter(|e| &e.from_table == table).collect()
    }

    pub fn inbound(&self, table: &QualifiedName) -> Vec<&'a RelationshipEdge> {
        self.edges().into_iter().filter(|e| &e.to_table == table).collect()
    }

    pub fn recommendation(&self, edge: &RelationshipEdge) -> Option<&'a JoinRecommendation> {
        self.joins.iter().find(|j| j.edge_id == edge.id)
    }

    pub fn junction(&self, table: &QualifiedName) -> Option<&'a JunctionVerdict> {
        self.junctions.iter().find(|v| &v.table == table)
    }

    pub fn cardinality(&self, edge: &RelationshipEdge) -> Cardinality {
        edge_cardinality(edge, self.model, self.junctions)
    }

    pub fn label(&self, table: &QualifiedName) -> String {
        self.model.label(table)
    }

    /// Whether a column carries any resolved outgoing edge.
    pub fn is_referencing(&self, table: &QualifiedName, column: &str) -> bool {
        self.edges
            .iter()
            .any(|e| &e.from_table == table && e.from_column == column)
    }
}

/// The three text outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedOutput {
    pub er_diagram: String,
    pub flowchart: String,
    pub document: String,
}

/// Render all three notations.
pub fn render_all(ctx: &RenderContext<'_>) -> RenderedOutput {
    RenderedOutput {
        er_diagram: render_er_diagram(ctx),
        flowchart: render_flowchart(ctx),
        document: render_document(ctx),
    }
}
