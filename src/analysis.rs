//! Full analysis pipeline.
//!
//! ```text
//! SchemaSnapshot ─► normalize ─► resolve ─► classify ─► advise ─► render
//! ```
//!
//! [`analyze`] runs every stage on one immutable snapshot and returns an
//! [`AnalysisReport`] holding both the machine-readable model and the three
//! rendered texts. Nothing is shared between runs.

use serde::Serialize;
use tracing::debug;

use crate::metadata::SchemaSnapshot;
use crate::model::{normalize, QualifiedName, SchemaModel, Table};
use crate::render::{render_all, render_table_document, RenderContext, RenderOptions, RenderedOutput};
use crate::semantic::{
    advise_all, AnalysisResult, Diagnostic, InferenceConfig, JoinPath, JoinRecommendation,
    JunctionClassifier, JunctionConfig, JunctionVerdict, RelationshipEdge, RelationshipGraph,
    RelationshipResolver, SemanticResult,
};

/// Settings for every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisOptions {
    pub inference: InferenceConfig,
    pub junction: JunctionConfig,
    pub render: RenderOptions,
}

/// Output of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub model: SchemaModel,
    /// Resolved edges; an edge's id is its index.
    pub relationships: Vec<RelationshipEdge>,
    pub junctions: Vec<JunctionVerdict>,
    /// One per edge, in edge order.
    pub joins: Vec<JoinRecommendation>,
    /// Normalizer diagnostics first, then resolver diagnostics.
    pub diagnostics: Vec<Diagnostic>,
    pub rendered: RenderedOutput,
    #[serde(skip)]
    render_options: RenderOptions,
}

/// Run the whole pipeline on a snapshot.
pub fn analyze(snapshot: &SchemaSnapshot, options: &AnalysisOptions) -> AnalysisResult<AnalysisReport> {
    let normalized = normalize(snapshot)?;
    let model = normalized.model;
    let mut diagnostics = normalized.diagnostics;

    let resolution = RelationshipResolver::new(options.inference.clone()).resolve(&model);
    diagnostics.extend(resolution.diagnostics);
    let relationships = resolution.edges;

    let junctions = JunctionClassifier::new(options.junction.clone()).classify(&model, &relationships);
    let joins = advise_all(&relationships);

    let rendered = render_all(&RenderContext {
        model: &model,
        edges: &relationships,
        joins: &joins,
        junctions: &junctions,
        diagnostics: &diagnostics,
        options: &options.render,
    });

    debug!(
        tables = model.len(),
        relationships = relationships.len(),
        junctions = junctions.len(),
        diagnostics = diagnostics.len(),
        "analysis complete"
    );

    Ok(AnalysisReport {
        model,
        relationships,
        junctions,
        joins,
        diagnostics,
        rendered,
        render_options: options.render.clone(),
    })
}

impl AnalysisReport {
    fn render_context(&self) -> RenderContext<'_> {
        RenderContext {
            model: &self.model,
            edges: &self.relationships,
            joins: &self.joins,
            junctions: &self.junctions,
            diagnostics: &self.diagnostics,
            options: &self.render_options,
        }
    }

    /// Tables in render order.
    pub fn tables(&self) -> Vec<&Table> {
        self.render_context().tables()
    }

    /// Table labels in render order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables()
            .into_iter()
            .map(|t| self.model.label(&t.name))
            .collect()
    }

    /// Resolve a `schema.table` or bare table reference.
    pub fn table(&self, reference: &str) -> SemanticResult<&Table> {
        self.model.resolve_table(reference)
    }

    /// Documentation section for one table.
    pub fn table_document(&self, reference: &str) -> SemanticResult<String> {
        let table = self.table(reference)?;
        Ok(render_table_document(&self.render_context(), table))
    }

    pub fn junction(&self, table: &QualifiedName) -> Option<&JunctionVerdict> {
        self.junctions.iter().find(|v| &v.table == table)
    }

    pub fn recommendation(&self, edge_id: usize) -> Option<&JoinRecommendation> {
        self.joins.iter().find(|j| j.edge_id == edge_id)
    }

    pub fn graph(&self) -> RelationshipGraph {
        RelationshipGraph::build(&self.model, &self.relationships)
    }

    /// Shortest join path between two table references.
    pub fn join_path(&self, from: &str, to: &str) -> SemanticResult<JoinPath> {
        let from = self.table(from)?.name.clone();
        let to = self.table(to)?.name.clone();
        self.graph().join_path(&from, &to)
    }

    /// Machine-readable report as pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
